//! Concurrent pipeline
//!
//!     The same stages as the synchronous pipeline, each running as its own tokio task and
//!     joined by bounded channels:
//!
//!         line source ──[lines]──▶ tokenizer task ──[token batches]──▶ builder task
//!
//!     Channels carry `Result`s, so an error travels downstream in stream order: the builder
//!     sees batches for every earlier line before it sees the failure, which keeps the
//!     reported error identical to the synchronous one. Whichever stage stops first drops
//!     its end of the channel and the stage on the other side stops on its next send or
//!     receive. A builder that fails also aborts the tokenizer, which may otherwise wait
//!     forever on a line source that is still open.
//!
//!     Bounded channels give backpressure; a slow builder stalls the tokenizer, which in
//!     turn stalls the line source.

use std::io::BufRead;

use tokio::sync::mpsc;
use tokio::task::JoinError;

use crate::yaml::ast::AbstractSyntaxTree;
use crate::yaml::config::ParserConfig;
use crate::yaml::error::{internal_violation, ParseError};
use crate::yaml::lexing::Tokenizer;
use crate::yaml::parsing::StructuralBuilder;
use crate::yaml::source::ReaderLines;
use crate::yaml::token::Token;

/// Capacity of each channel between stages.
pub const CHANNEL_CAPACITY: usize = 64;

pub type LineResult = Result<String, ParseError>;
pub type TokenBatch = Result<Vec<Token>, ParseError>;

/// Parse the lines arriving on `lines` until the sender side is dropped.
pub async fn parse_stream(
    lines: mpsc::Receiver<LineResult>,
    config: ParserConfig,
) -> Result<AbstractSyntaxTree, ParseError> {
    let (batch_tx, batch_rx) = mpsc::channel(CHANNEL_CAPACITY);
    log::debug!("starting tokenizer and builder tasks");

    let tokenizer = tokio::spawn(tokenize_lines(lines, batch_tx));
    let builder = tokio::spawn(build_tree(batch_rx, config));

    let tree = builder.await.unwrap_or_else(|err| rethrow(err));
    if tree.is_err() {
        tokenizer.abort();
    }
    match tokenizer.await {
        Ok(()) => {}
        Err(err) if err.is_cancelled() => log::trace!("tokenizer task aborted after a build error"),
        Err(err) => rethrow(err),
    }
    tree
}

/// Read `reader` on the blocking pool and deliver its lines over a channel.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<LineResult>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::task::spawn_blocking(move || {
        for line in ReaderLines::new(reader) {
            if tx.blocking_send(line).is_err() {
                log::trace!("line reader stopped, the parser is gone");
                break;
            }
        }
    });
    rx
}

/// Deliver in-memory lines over a channel.
pub fn spawn_line_feeder<I>(lines: I) -> mpsc::Receiver<LineResult>
where
    I: IntoIterator<Item = String> + Send + 'static,
    I::IntoIter: Send,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(async move {
        for line in lines {
            if tx.send(Ok(line)).await.is_err() {
                break;
            }
        }
    });
    rx
}

async fn tokenize_lines(mut lines: mpsc::Receiver<LineResult>, batches: mpsc::Sender<TokenBatch>) {
    let mut tokenizer = Tokenizer::new();
    let mut line_number = 0;
    while let Some(line) = lines.recv().await {
        line_number += 1;
        let batch = line.and_then(|line| tokenizer.tokenize(&line, line_number));
        let failed = batch.is_err();
        if batches.send(batch).await.is_err() || failed {
            break;
        }
    }
    log::trace!("tokenizer task done after {} line(s)", line_number);
}

async fn build_tree(
    mut batches: mpsc::Receiver<TokenBatch>,
    config: ParserConfig,
) -> Result<AbstractSyntaxTree, ParseError> {
    let mut builder = StructuralBuilder::new(config);
    while let Some(batch) = batches.recv().await {
        builder.feed(batch?)?;
    }
    let tree = builder.finish()?;
    log::debug!("builder task done with {} document(s)", tree.len());
    Ok(tree)
}

/// A stage panicked: continue the panic on the caller's task.
fn rethrow(err: JoinError) -> ! {
    if err.is_panic() {
        std::panic::resume_unwind(err.into_panic());
    }
    internal_violation(format_args!("pipeline task was cancelled: {}", err))
}
