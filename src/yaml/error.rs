//! Error types
//!
//!     Every failure the parser reports is a [ParseError]: a kind from a closed taxonomy, the
//!     position where it was detected and a human readable message. There is no recovery; the
//!     first error aborts the parse and no partial tree is returned.
//!
//!     Kinds fall into categories:
//!
//!         Lexical     InvalidCharacter, InconsistentIndentationCharacter,
//!                     MalformedDocumentMarker, UnterminatedQuotedScalar
//!         Structural  IndentationAmbiguous, InconsistentIndentationUnit,
//!                     IndentationTooDeepForNonNestableParent, UnexpectedIndentation,
//!                     NestingTooDeep
//!         Grammar     UnexpectedTokenType, IncompleteNodeAtEndOfInput
//!         Reference   UnknownAnchor
//!         Source      Io
//!
//!     Duplicate mapping keys are not an error: the last value wins and the overwrite is
//!     logged at debug level.
//!
//!     Broken builder invariants are not input errors and never become a ParseError; they
//!     go through [internal_violation] and abort the current thread.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::yaml::ast::Position;
use crate::yaml::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCategory {
    Lexical,
    Structural,
    Grammar,
    Reference,
    Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    InvalidCharacter,
    InconsistentIndentationCharacter,
    MalformedDocumentMarker,
    UnterminatedQuotedScalar,
    IndentationAmbiguous,
    InconsistentIndentationUnit,
    IndentationTooDeepForNonNestableParent,
    UnexpectedIndentation,
    NestingTooDeep,
    UnexpectedTokenType,
    IncompleteNodeAtEndOfInput,
    UnknownAnchor,
    Io,
}

impl ErrorKind {
    pub fn category(self) -> ErrorCategory {
        match self {
            ErrorKind::InvalidCharacter
            | ErrorKind::InconsistentIndentationCharacter
            | ErrorKind::MalformedDocumentMarker
            | ErrorKind::UnterminatedQuotedScalar => ErrorCategory::Lexical,
            ErrorKind::IndentationAmbiguous
            | ErrorKind::InconsistentIndentationUnit
            | ErrorKind::IndentationTooDeepForNonNestableParent
            | ErrorKind::UnexpectedIndentation
            | ErrorKind::NestingTooDeep => ErrorCategory::Structural,
            ErrorKind::UnexpectedTokenType | ErrorKind::IncompleteNodeAtEndOfInput => {
                ErrorCategory::Grammar
            }
            ErrorKind::UnknownAnchor => ErrorCategory::Reference,
            ErrorKind::Io => ErrorCategory::Source,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidCharacter => "invalid character",
            ErrorKind::InconsistentIndentationCharacter => "inconsistent indentation character",
            ErrorKind::MalformedDocumentMarker => "malformed document marker",
            ErrorKind::UnterminatedQuotedScalar => "unterminated quoted scalar",
            ErrorKind::IndentationAmbiguous => "ambiguous indentation",
            ErrorKind::InconsistentIndentationUnit => "inconsistent indentation unit",
            ErrorKind::IndentationTooDeepForNonNestableParent => {
                "indentation too deep for non-nestable parent"
            }
            ErrorKind::UnexpectedIndentation => "unexpected indentation",
            ErrorKind::NestingTooDeep => "nesting too deep",
            ErrorKind::UnexpectedTokenType => "unexpected token",
            ErrorKind::IncompleteNodeAtEndOfInput => "incomplete node at end of input",
            ErrorKind::UnknownAnchor => "unknown anchor",
            ErrorKind::Io => "read error",
        };
        write!(f, "{}", name)
    }
}

/// A positioned, fatal parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind} at {line}:{column}: {message}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ErrorKind, position: Position, message: impl Into<String>) -> Self {
        Self {
            kind,
            line: position.line,
            column: position.column,
            message: message.into(),
        }
    }

    /// An error positioned at the start of `token`.
    pub fn at(kind: ErrorKind, token: &Token, message: impl Into<String>) -> Self {
        Self::new(kind, token.position(), message)
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

/// Abort on a broken builder invariant.
///
/// These are bugs in the parser, not problems with the input, so they are never turned
/// into a [ParseError].
#[track_caller]
pub(crate) fn internal_violation(message: fmt::Arguments<'_>) -> ! {
    panic!("internal parser invariant violated: {}", message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::token::TokenType;

    #[test]
    fn test_display_includes_position() {
        let err = ParseError::new(
            ErrorKind::UnknownAnchor,
            Position::new(3, 8),
            "alias '*base' has no anchor",
        );
        assert_eq!(
            err.to_string(),
            "unknown anchor at 3:8: alias '*base' has no anchor"
        );
    }

    #[test]
    fn test_at_token_uses_token_position() {
        let token = Token::new(TokenType::Data, "x", 5, 12);
        let err = ParseError::at(ErrorKind::UnexpectedTokenType, &token, "boom");
        assert_eq!(err.position(), Position::new(5, 12));
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            ErrorKind::MalformedDocumentMarker.category(),
            ErrorCategory::Lexical
        );
        assert_eq!(
            ErrorKind::InconsistentIndentationUnit.category(),
            ErrorCategory::Structural
        );
        assert_eq!(
            ErrorKind::IncompleteNodeAtEndOfInput.category(),
            ErrorCategory::Grammar
        );
        assert_eq!(ErrorKind::UnknownAnchor.category(), ErrorCategory::Reference);
    }

    #[test]
    #[should_panic(expected = "internal parser invariant violated")]
    fn test_internal_violation_panics() {
        internal_violation(format_args!("popped {} frames from {}", 3, 1));
    }
}
