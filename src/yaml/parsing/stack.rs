//! Frame stack
//!
//! Open frames, kept in lockstep with the [IndentationManager]: every frame pushed is one
//! indentation entry pushed, every frame popped is one entry popped.

use crate::yaml::ast::{NodeKind, Position};
use crate::yaml::error::{internal_violation, ErrorKind, ParseError};

use super::frame::Frame;
use super::indentation::{IndentationError, IndentationManager};

#[derive(Debug, Clone)]
pub struct FrameStack {
    frames: Vec<Frame>,
    indentation: IndentationManager,
}

impl FrameStack {
    pub fn new(max_nesting_depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            indentation: IndentationManager::new(max_nesting_depth),
        }
    }

    /// Push a frame after its indentation entry was accepted.
    pub fn push(&mut self, frame: Frame) -> Result<(), ParseError> {
        self.indentation
            .push(frame.indentation_level, frame.node_kind)
            .map_err(|err| indentation_error(err, frame.position()))?;
        self.open(frame);
        Ok(())
    }

    /// Push the content of a compact entry; see [IndentationManager::push_compact].
    pub fn push_compact(&mut self, frame: Frame) -> Result<(), ParseError> {
        self.indentation
            .push_compact(frame.indentation_level, frame.node_kind)
            .map_err(|err| indentation_error(err, frame.position()))?;
        self.open(frame);
        Ok(())
    }

    fn open(&mut self, frame: Frame) {
        log::trace!(
            "open {} at level {} ({} open)",
            frame.node_kind,
            frame.indentation_level,
            self.frames.len() + 1
        );
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        let frame = self.frames.pop()?;
        self.indentation.pop();
        log::trace!(
            "close {} at level {}",
            frame.node_kind,
            frame.indentation_level
        );
        Some(frame)
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn indentation(&self) -> &IndentationManager {
        &self.indentation
    }

    pub fn retag_top(&mut self, node_kind: NodeKind) {
        self.indentation.retag_top(node_kind);
    }

    /// Forget every frame and the document's indentation unit. Callers unwind first.
    pub fn reset(&mut self) {
        if !self.frames.is_empty() {
            internal_violation(format_args!(
                "resetting the frame stack with {} open frames",
                self.frames.len()
            ));
        }
        self.indentation.reset();
    }
}

fn indentation_error(err: IndentationError, position: Position) -> ParseError {
    let kind = match err {
        IndentationError::BelowCurrentLevel { .. } => {
            internal_violation(format_args!("{} (the stack was not unwound)", err))
        }
        IndentationError::InconsistentUnit { .. } => ErrorKind::InconsistentIndentationUnit,
        IndentationError::NonNestableParent { .. } => {
            ErrorKind::IndentationTooDeepForNonNestableParent
        }
        IndentationError::TooDeep { .. } => ErrorKind::NestingTooDeep,
    };
    ParseError::new(kind, position, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::parsing::grammar::{Head, Prefix, Production};
    use crate::yaml::parsing::indentation::Relationship;

    fn frame(head: Head, level: usize, line: usize) -> Frame {
        Frame::new(
            Production::new(Prefix::Keyed, head),
            level,
            Position::new(line, level + 1),
        )
    }

    #[test]
    fn test_frames_and_levels_move_together() {
        let mut stack = FrameStack::new(50);
        stack.push(frame(Head::Block, 0, 1)).unwrap();
        stack.push(frame(Head::Scalar, 2, 2)).unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.indentation().depth(), 2);

        assert!(stack.pop().is_some());
        assert_eq!(stack.indentation().depth(), 1);
        assert_eq!(
            stack.indentation().determine_relationship(0),
            Relationship::Sibling
        );
    }

    #[test]
    fn test_indentation_errors_are_positioned() {
        let mut stack = FrameStack::new(50);
        stack.push(frame(Head::Block, 0, 1)).unwrap();
        stack.push(frame(Head::Scalar, 2, 2)).unwrap();
        let err = stack.push(frame(Head::Scalar, 3, 3)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InconsistentIndentationUnit);
        assert_eq!(err.position(), Position::new(3, 4));
        assert_eq!(stack.len(), 2);

        let err = stack.push(frame(Head::Scalar, 4, 3)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IndentationTooDeepForNonNestableParent);
    }

    #[test]
    fn test_compact_content_off_the_unit() {
        let mut stack = FrameStack::new(50);
        stack.push(frame(Head::Block, 0, 1)).unwrap();
        stack.push(frame(Head::CompactMapping, 4, 2)).unwrap();
        stack.push_compact(frame(Head::Scalar, 6, 2)).unwrap();
        assert!(stack.pop().is_some());

        stack.push(frame(Head::Scalar, 6, 3)).unwrap();
        assert_eq!(stack.len(), 3);
        assert!(stack.pop().is_some());
        let err = stack.push(frame(Head::Scalar, 7, 4)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InconsistentIndentationUnit);
    }

    #[test]
    fn test_depth_limit() {
        let mut stack = FrameStack::new(1);
        stack.push(frame(Head::Block, 0, 1)).unwrap();
        let err = stack.push(frame(Head::Block, 2, 2)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NestingTooDeep);
    }

    #[test]
    #[should_panic(expected = "internal parser invariant violated")]
    fn test_push_below_top_is_a_bug() {
        let mut stack = FrameStack::new(50);
        stack.push(frame(Head::Block, 0, 1)).unwrap();
        stack.push(frame(Head::Block, 2, 2)).unwrap();
        let _ = stack.push(frame(Head::Block, 0, 3));
    }
}
