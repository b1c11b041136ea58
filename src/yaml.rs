//! Main module for yamlite functionality

pub mod ast;
pub mod config;
pub mod error;
pub mod lexing;
pub mod parsing;
pub mod pipeline;
pub mod source;
pub mod testing;
pub mod token;
