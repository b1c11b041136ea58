//! Parsing
//!
//!     Turns the tokenizer's per-line token batches into documents. The work is split the way
//!     an indentation-sensitive grammar naturally splits:
//!
//!         - [indentation]: the stack of open indentation levels and the rules for pushing
//!           onto it (monotonic levels, one indentation unit per document, children only
//!           under block containers).
//!         - [grammar]: the declarative productions, the token trie built from them and the
//!           classifier that walks a line's tokens until its node kind is known.
//!         - [frame]: one open node under construction, consuming the tokens of its line and
//!           whatever lines it absorbs.
//!         - [flow]: the combinator parser for `[..]` and `{..}` collections.
//!         - [stack]: open frames paired one to one with indentation entries.
//!         - [builder]: the state machine that ties the above together, one line at a time.
//!
//! Line Lifecycle
//!
//!     A complete line is classified first, then its indentation is compared with the open
//!     levels: deeper lines open a child, equal lines close the frames at that level, and
//!     shallower lines close everything down to the matching ancestor. The new frame then
//!     consumes the line. Frames stay open until a later line (or the end of the document)
//!     closes them, at which point the finished node is attached to the frame below, or to
//!     the document.
//!
//!     Nothing here recovers from errors: the first [ParseError](crate::yaml::error::ParseError)
//!     ends the parse.

pub mod builder;
pub mod flow;
pub mod frame;
pub mod grammar;
pub mod indentation;
pub mod stack;

pub use builder::{BuilderState, StructuralBuilder};
pub use grammar::{Classification, NodeTypeClassifier, Production};
pub use indentation::{Indentation, IndentationError, IndentationManager, Relationship};
