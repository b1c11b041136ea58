//! Structural builder
//!
//!     The [StructuralBuilder] receives token batches from the tokenizer and assembles the
//!     documents of one stream. Batches may end anywhere: tokens after the last line end are
//!     held until the rest of their line arrives.
//!
//! States
//!
//!     Idle              nothing open, nothing pending
//!     Accumulating      part of a line is held, its node kind not yet known
//!     Building          frames are open
//!     DocumentBoundary  a `---` or `...` marker was just processed
//!
//! Lines
//!
//!     A complete line goes, in order:
//!
//!         1. to document handling, when it is a marker: open frames are closed into the
//!            current document, which is then closed and/or a new one opened
//!         2. to the top frame, when that frame claims it (block scalar content, the rest of
//!            an open flow collection)
//!         3. nowhere, when it is blank or only a comment
//!         4. to the classifier, then to the indentation stack to find where it goes
//!            relative to the open frames, and finally to a new frame of its own
//!
//!     Closing a frame builds its node and attaches it to the frame below, or to the
//!     document when no frame is left. Anchors are registered as their frame closes, so an
//!     alias can only name an anchor whose node is complete. Aliases take the node bound at
//!     the moment they are read.

use std::sync::Arc;

use crate::yaml::ast::{AbstractSyntaxTree, AnchorTable, Document, Node, Position};
use crate::yaml::config::ParserConfig;
use crate::yaml::error::{internal_violation, ErrorKind, ParseError};
use crate::yaml::token::{Token, TokenType};

use super::frame::{BlockBody, ConsumeContext, Consumed, Frame};
use super::grammar::{Classification, NodeTypeClassifier, Production};
use super::indentation::Relationship;
use super::stack::FrameStack;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    Idle,
    Accumulating,
    Building,
    DocumentBoundary,
}

#[derive(Debug, Clone)]
struct OpenDocument {
    explicit: bool,
    body: BlockBody,
}

impl OpenDocument {
    fn new(explicit: bool) -> Self {
        Self {
            explicit,
            body: BlockBody::Empty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StructuralBuilder {
    config: ParserConfig,
    classifier: NodeTypeClassifier,
    stack: FrameStack,
    anchors: AnchorTable,
    document: Option<OpenDocument>,
    tree: AbstractSyntaxTree,
    partial: Vec<Token>,
    state: BuilderState,
}

impl Default for StructuralBuilder {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl StructuralBuilder {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            classifier: NodeTypeClassifier::new(),
            stack: FrameStack::new(config.max_nesting_depth),
            anchors: AnchorTable::new(),
            document: None,
            tree: AbstractSyntaxTree::new(),
            partial: Vec::new(),
            state: BuilderState::Idle,
        }
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Documents closed so far.
    pub fn tree(&self) -> &AbstractSyntaxTree {
        &self.tree
    }

    pub fn feed(&mut self, tokens: Vec<Token>) -> Result<(), ParseError> {
        let mut line = Vec::new();
        for token in tokens {
            let ends_line = matches!(
                token.kind,
                TokenType::Newline | TokenType::DocumentStart | TokenType::DocumentEnd
            );
            line.push(token);
            if ends_line {
                self.complete_line(std::mem::take(&mut line))?;
            }
        }
        if !line.is_empty() {
            self.hold(line)?;
        }
        self.settle();
        Ok(())
    }

    /// Close everything and return the tree.
    pub fn finish(mut self) -> Result<AbstractSyntaxTree, ParseError> {
        let pending = if self.classifier.has_pending() {
            self.classifier.pending().first()
        } else {
            self.partial.first()
        };
        if let Some(token) = pending {
            return Err(ParseError::at(
                ErrorKind::IncompleteNodeAtEndOfInput,
                token,
                "input ends in the middle of a line",
            ));
        }

        self.unwind_all()?;
        if let Some(document) = self.document.take() {
            self.close_document(document);
        }
        log::debug!("parsed {} document(s)", self.tree.len());
        Ok(self.tree)
    }

    fn settle(&mut self) {
        self.state = if self.classifier.has_pending() || !self.partial.is_empty() {
            BuilderState::Accumulating
        } else if !self.stack.is_empty() {
            BuilderState::Building
        } else if self.state == BuilderState::DocumentBoundary {
            BuilderState::DocumentBoundary
        } else {
            BuilderState::Idle
        };
    }

    /// Keep the start of a line until its end arrives.
    fn hold(&mut self, tokens: Vec<Token>) -> Result<(), ParseError> {
        let absorbing = self.stack.top().is_some_and(Frame::absorbs_lines);
        if absorbing || !self.partial.is_empty() {
            self.partial.extend(tokens);
            return Ok(());
        }
        let significant: Vec<Token> = tokens
            .into_iter()
            .filter(|token| !token.is(TokenType::Comment))
            .collect();
        self.classifier.classify(&significant)?;
        Ok(())
    }

    fn complete_line(&mut self, tokens: Vec<Token>) -> Result<(), ParseError> {
        let mut line = if self.classifier.has_pending() {
            self.classifier.take()
        } else {
            std::mem::take(&mut self.partial)
        };
        line.extend(tokens);
        self.process_line(line)
    }

    fn process_line(&mut self, line: Vec<Token>) -> Result<(), ParseError> {
        if let Some(marker) = line.last().filter(|t| t.kind.is_document_marker()) {
            if line.len() > 1 {
                return Err(ParseError::at(
                    ErrorKind::UnexpectedTokenType,
                    marker,
                    "document marker in the middle of a line",
                ));
            }
            let explicit_start = marker.is(TokenType::DocumentStart);
            return self.document_marker(explicit_start, marker.line);
        }

        let ctx = ConsumeContext {
            anchors: &self.anchors,
            max_nesting_depth: self.config.max_nesting_depth,
        };
        if let Some(frame) = self.stack.top_mut() {
            if frame.wants_line(&line) {
                return frame.absorb(line, ctx);
            }
        }

        let line: Vec<Token> = line
            .into_iter()
            .filter(|token| !token.is(TokenType::Comment))
            .collect();
        if line
            .iter()
            .all(|t| matches!(t.kind, TokenType::Indentation | TokenType::Newline))
        {
            return Ok(());
        }

        let production = self.classify_line(&line)?;
        let line = self.classifier.take();
        self.open_line(production, line)
    }

    fn classify_line(&mut self, line: &[Token]) -> Result<Production, ParseError> {
        match self.classifier.classify(line)? {
            Classification::Determined { production, .. } => Ok(production),
            Classification::Undetermined => {
                let last = line.last().map(Token::position).unwrap_or(Position::new(1, 1));
                self.classifier.reset();
                Err(ParseError::new(
                    ErrorKind::UnexpectedTokenType,
                    last,
                    "line ends before its node kind is known",
                ))
            }
        }
    }

    fn open_line(&mut self, production: Production, line: Vec<Token>) -> Result<(), ParseError> {
        let (relationship, level) = self.stack.indentation().find_indentation(&line);
        match relationship {
            Relationship::Child => {}
            Relationship::Sibling => self.close_level(level)?,
            Relationship::ParentLevel(depth) => self.unwind(depth)?,
            Relationship::Unknown => {
                let open: Vec<String> = self
                    .stack
                    .indentation()
                    .levels()
                    .map(|level| level.to_string())
                    .collect();
                return Err(ParseError::new(
                    ErrorKind::IndentationAmbiguous,
                    start_of(&line),
                    format!(
                        "indentation of {} matches none of the open levels ({})",
                        level,
                        open.join(", ")
                    ),
                ));
            }
        }
        self.open_frame(production, level, line, false)
    }

    /// Open a frame for `tokens` at `level`. `compact` marks the content of a compact entry,
    /// which starts at its own column rather than on the indentation unit.
    fn open_frame(
        &mut self,
        production: Production,
        level: usize,
        tokens: Vec<Token>,
        compact: bool,
    ) -> Result<(), ParseError> {
        self.ensure_document(&tokens);
        let frame = Frame::new(production, level, start_of(&tokens));
        if compact {
            self.stack.push_compact(frame)?;
        } else {
            self.stack.push(frame)?;
        }

        let ctx = ConsumeContext {
            anchors: &self.anchors,
            max_nesting_depth: self.config.max_nesting_depth,
        };
        let consumed = match self.stack.top_mut() {
            Some(frame) => frame.consume(tokens, ctx)?,
            None => internal_violation(format_args!("no frame after a successful push")),
        };

        match consumed {
            Consumed::Done => Ok(()),
            Consumed::Refeed { level, tokens } => {
                let compact = self
                    .stack
                    .top()
                    .map_or(false, |frame| frame.production().head.is_compact());
                let production = self.classify_line(&tokens)?;
                let tokens = self.classifier.take();
                self.open_frame(production, level, tokens, compact)
            }
        }
    }

    /// Close every frame sitting at `level`.
    fn close_level(&mut self, level: usize) -> Result<(), ParseError> {
        while self
            .stack
            .top()
            .is_some_and(|frame| frame.indentation_level == level)
        {
            self.pop_and_attach()?;
        }
        Ok(())
    }

    fn unwind(&mut self, depth: usize) -> Result<(), ParseError> {
        if depth > self.stack.len() {
            internal_violation(format_args!(
                "unwinding {} frames with only {} open",
                depth,
                self.stack.len()
            ));
        }
        for _ in 0..depth {
            self.pop_and_attach()?;
        }
        Ok(())
    }

    fn unwind_all(&mut self) -> Result<(), ParseError> {
        self.unwind(self.stack.len())
    }

    fn pop_and_attach(&mut self) -> Result<(), ParseError> {
        let frame = match self.stack.pop() {
            Some(frame) => frame,
            None => internal_violation(format_args!("popping an empty frame stack")),
        };
        let role = frame.role();
        let node = frame.finish()?;

        if let Node::Anchor(anchor) = &node {
            if self
                .anchors
                .insert(anchor.name.clone(), Arc::clone(&anchor.node))
                .is_some()
            {
                log::debug!(
                    "anchor &{} redefined at {}, earlier aliases keep the previous node",
                    anchor.name,
                    anchor.position
                );
            }
        }

        match self.stack.top_mut() {
            Some(parent) => {
                if let Some(kind) = parent.attach(node, role)? {
                    self.stack.retag_top(kind);
                }
            }
            None => {
                let document = match self.document.as_mut() {
                    Some(document) => document,
                    None => internal_violation(format_args!("closing a frame outside a document")),
                };
                if let Some(replaced) = document.body.add(node, role)? {
                    log::debug!(
                        "duplicate key {:?} at {}, keeping the later value",
                        replaced.key().unwrap_or_default(),
                        replaced.position()
                    );
                }
            }
        }
        Ok(())
    }

    fn ensure_document(&mut self, tokens: &[Token]) {
        if self.document.is_none() {
            log::debug!("implicit document starts at line {}", start_of(tokens).line);
            self.document = Some(OpenDocument::new(false));
        }
    }

    fn document_marker(&mut self, explicit_start: bool, line: usize) -> Result<(), ParseError> {
        self.unwind_all()?;
        self.stack.reset();

        let current = self.document.take();
        if explicit_start {
            match current {
                Some(document) if !document.body.is_empty() => self.close_document(document),
                _ => {}
            }
            log::debug!("document starts at line {}", line);
            self.document = Some(OpenDocument::new(true));
        } else if let Some(document) = current {
            self.close_document(document);
        }
        self.state = BuilderState::DocumentBoundary;
        Ok(())
    }

    fn close_document(&mut self, document: OpenDocument) {
        let document = Document {
            explicit: document.explicit,
            layout: document.body.layout(),
            nodes: document.body.into_nodes(),
            anchors: std::mem::take(&mut self.anchors),
        };
        log::debug!(
            "document {} closed with {} node(s)",
            self.tree.len() + 1,
            document.nodes.len()
        );
        self.tree.push(document);
    }
}

/// Position of the first token that is not indentation.
fn start_of(tokens: &[Token]) -> Position {
    tokens
        .iter()
        .find(|token| !token.is(TokenType::Indentation))
        .or_else(|| tokens.first())
        .map(Token::position)
        .unwrap_or(Position::new(1, 1))
}
