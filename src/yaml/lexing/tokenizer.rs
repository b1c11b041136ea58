//! Per-line tokenizer
//!
//!     Turns one line at a time into the tokens the builder consumes. Each call sees a single
//!     line without its terminator and returns that line's tokens, always ending with a
//!     Newline token unless the line is a document marker. Every token starts and ends on the
//!     line it came from.
//!
//! State Kept Across Lines
//!
//!     Only document-local facts survive from one line to the next:
//!
//!         - the indentation character (space or tab) first seen in the document
//!         - how many flow collections (`[`, `{`) are still open
//!         - whether the previous lines opened a block scalar (`|`, `>`) whose content lines
//!           must be passed through raw
//!
//!     A document marker resets all of it.
//!
//! Line Algorithm
//!
//!     1. Leading whitespace becomes one Indentation token (column 1) after its character is
//!        checked against the document's indentation character.
//!     2. A line starting at column 1 with `--` or `..` must be exactly `---` or `...`.
//!     3. Left to right: quotes open quoted builds, `#` starts a comment, indicator characters
//!        become zero-text symbol tokens, everything else gathers into Data runs. Plain
//!        whitespace between tokens is dropped.
//!
//!     Quoted builds close on a quote that leaves an even count of unescaped quotes and is
//!     followed by whitespace, end of line, `:` or (in flow context) a flow delimiter. A
//!     backslash escapes the next character in double quotes. The quoted content is kept
//!     verbatim in a Data token right after the quote marker token.

use super::base_tokenization::{self, RawPiece, RawToken};
use crate::yaml::ast::Position;
use crate::yaml::error::{ErrorKind, ParseError};
use crate::yaml::token::{Token, TokenType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockScalarState {
    /// Content must be indented deeper than this.
    parent_level: usize,
    /// Fixed by the first content line.
    content_level: Option<usize>,
}

/// Stateful line tokenizer; one instance per input stream.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    indentation_char: Option<char>,
    flow_depth: usize,
    block_scalar: Option<BlockScalarState>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of flow collections left open by the lines seen so far.
    pub fn flow_depth(&self) -> usize {
        self.flow_depth
    }

    /// Tokenize one line. `line_number` is 1-based.
    pub fn tokenize(&mut self, line: &str, line_number: usize) -> Result<Vec<Token>, ParseError> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let pieces = base_tokenization::tokenize(line).map_err(|err| {
            ParseError::new(
                ErrorKind::InvalidCharacter,
                Position::new(line_number, err.column),
                format!("invalid character {:?}", err.character),
            )
        })?;
        let end_column = line.chars().count() + 1;

        if pieces.iter().all(|piece| piece.kind.is_whitespace()) {
            return Ok(vec![Token::symbol(TokenType::Newline, line_number, end_column)]);
        }

        if let Some(tokens) = self.block_scalar_line(line, &pieces, line_number, end_column)? {
            return Ok(tokens);
        }

        let mut scan = LineScan {
            line,
            pieces: &pieces,
            line_number,
            pos: 0,
            tokens: Vec::new(),
        };

        if let Some(indent) = pieces.first().filter(|piece| piece.kind.is_whitespace()) {
            self.check_indentation_char(indent, line_number)?;
            scan.tokens
                .push(Token::new(TokenType::Indentation, indent.text, line_number, 1));
            scan.pos = 1;
        } else if let Some(marker) = self.document_marker(line, &pieces, line_number)? {
            return Ok(vec![marker]);
        }

        while let Some(piece) = scan.peek(0) {
            match piece.kind {
                RawToken::Spaces | RawToken::Tabs => scan.pos += 1,
                RawToken::Hash => {
                    let comment = &line[piece.span.end..];
                    scan.push(TokenType::Comment, comment, piece.column);
                    scan.pos = pieces.len();
                }
                RawToken::SingleQuote | RawToken::DoubleQuote => self.quoted(&mut scan)?,
                RawToken::Dash | RawToken::QuestionMark if scan.ends_token(1) => {
                    let kind = if piece.kind == RawToken::Dash {
                        TokenType::Dash
                    } else {
                        TokenType::QuestionMark
                    };
                    scan.symbol(kind, piece.column);
                }
                RawToken::Colon if self.colon_is_indicator(&scan, 1) => {
                    scan.symbol(TokenType::Colon, piece.column)
                }
                RawToken::OpenBracket | RawToken::OpenBrace => {
                    let kind = if piece.kind == RawToken::OpenBracket {
                        TokenType::OpenBracket
                    } else {
                        TokenType::OpenBrace
                    };
                    self.flow_depth += 1;
                    scan.symbol(kind, piece.column);
                }
                RawToken::CloseBracket | RawToken::CloseBrace => {
                    let kind = if piece.kind == RawToken::CloseBracket {
                        TokenType::CloseBracket
                    } else {
                        TokenType::CloseBrace
                    };
                    self.flow_depth = self.flow_depth.saturating_sub(1);
                    scan.symbol(kind, piece.column);
                }
                RawToken::Comma if self.flow_depth > 0 => {
                    scan.symbol(TokenType::Comma, piece.column)
                }
                RawToken::Pipe | RawToken::GreaterThan => {
                    let kind = if piece.kind == RawToken::Pipe {
                        TokenType::Pipe
                    } else {
                        TokenType::GreaterThan
                    };
                    scan.symbol(kind, piece.column);
                    self.attached_run(&mut scan);
                }
                RawToken::Ampersand | RawToken::Asterisk | RawToken::ExclamationMark => {
                    let kind = match piece.kind {
                        RawToken::Ampersand => TokenType::Ampersand,
                        RawToken::Asterisk => TokenType::Asterisk,
                        _ => TokenType::ExclamationMark,
                    };
                    scan.symbol(kind, piece.column);
                    self.attached_run(&mut scan);
                }
                _ => self.data_run(&mut scan),
            }
        }

        scan.push(TokenType::Newline, "", end_column);
        let tokens = scan.tokens;
        self.block_scalar = self.block_scalar_header(&tokens);
        Ok(tokens)
    }

    fn check_indentation_char(
        &mut self,
        indent: &RawPiece<'_>,
        line_number: usize,
    ) -> Result<(), ParseError> {
        let found = match indent.text.chars().next() {
            Some(c) => c,
            None => return Ok(()),
        };
        match self.indentation_char {
            None => {
                self.indentation_char = Some(found);
                Ok(())
            }
            Some(expected) if expected == found => Ok(()),
            Some(expected) => Err(ParseError::new(
                ErrorKind::InconsistentIndentationCharacter,
                Position::line_start(line_number),
                format!(
                    "indented with {} but this document indents with {}",
                    whitespace_name(found),
                    whitespace_name(expected)
                ),
            )),
        }
    }

    fn document_marker(
        &mut self,
        line: &str,
        pieces: &[RawPiece<'_>],
        line_number: usize,
    ) -> Result<Option<Token>, ParseError> {
        let kind = match pieces {
            [first, second, ..] if first.kind == second.kind => match first.kind {
                RawToken::Dash => TokenType::DocumentStart,
                RawToken::Period => TokenType::DocumentEnd,
                _ => return Ok(None),
            },
            _ => return Ok(None),
        };
        let expected = if kind == TokenType::DocumentStart {
            "---"
        } else {
            "..."
        };
        if line != expected {
            return Err(ParseError::new(
                ErrorKind::MalformedDocumentMarker,
                Position::line_start(line_number),
                format!("document marker must be exactly '{}', found {:?}", expected, line),
            ));
        }

        *self = Self::default();
        Ok(Some(Token::new(kind, line, line_number, 1)))
    }

    /// Raw pass-through of block scalar content lines.
    fn block_scalar_line(
        &mut self,
        line: &str,
        pieces: &[RawPiece<'_>],
        line_number: usize,
        end_column: usize,
    ) -> Result<Option<Vec<Token>>, ParseError> {
        let state = match self.block_scalar {
            Some(state) => state,
            None => return Ok(None),
        };
        let indent = match pieces.first().filter(|piece| piece.kind.is_whitespace()) {
            Some(indent) => indent,
            None => {
                self.block_scalar = None;
                return Ok(None);
            }
        };
        let level = indent.text.chars().count();
        let threshold = state.content_level.unwrap_or(state.parent_level + 1);
        if level < threshold {
            self.block_scalar = None;
            return Ok(None);
        }

        self.check_indentation_char(indent, line_number)?;
        if state.content_level.is_none() {
            self.block_scalar = Some(BlockScalarState {
                content_level: Some(level),
                ..state
            });
        }

        Ok(Some(vec![
            Token::new(TokenType::Indentation, indent.text, line_number, 1),
            Token::new(
                TokenType::Data,
                &line[indent.span.end..],
                line_number,
                level + 1,
            ),
            Token::symbol(TokenType::Newline, line_number, end_column),
        ]))
    }

    /// Detects a line ending in `|` or `>` (plus indicator) and works out how deep its
    /// content must be indented.
    fn block_scalar_header(&self, tokens: &[Token]) -> Option<BlockScalarState> {
        if self.flow_depth > 0 {
            return None;
        }
        let significant: Vec<&Token> = tokens
            .iter()
            .filter(|t| !matches!(t.kind, TokenType::Newline | TokenType::Comment))
            .collect();
        let header = match significant.as_slice() {
            [.., header] if matches!(header.kind, TokenType::Pipe | TokenType::GreaterThan) => {
                significant.len() - 1
            }
            [.., header, indicator]
                if matches!(header.kind, TokenType::Pipe | TokenType::GreaterThan)
                    && indicator.kind == TokenType::Data =>
            {
                significant.len() - 2
            }
            _ => return None,
        };

        let before = &significant[..header];
        let node_column = if let Some(colon) = before.iter().rposition(|t| t.is(TokenType::Colon))
        {
            // the key, or its quote marker when quoted
            let mut key = colon.saturating_sub(1);
            if key > 0 && before[key - 1].kind.is_quote() {
                key -= 1;
            }
            before.get(key).map(|t| t.column)
        } else if let Some(dash) = before.iter().rposition(|t| t.is(TokenType::Dash)) {
            Some(before[dash].column)
        } else {
            None
        };
        let parent_level = match node_column {
            Some(column) => column - 1,
            None => tokens.first().map(Token::indentation_level).unwrap_or(0),
        };

        Some(BlockScalarState {
            parent_level,
            content_level: None,
        })
    }

    fn colon_is_indicator(&self, scan: &LineScan<'_, '_>, offset: usize) -> bool {
        match scan.peek(offset) {
            None => true,
            Some(next) => {
                next.kind.is_whitespace() || (self.flow_depth > 0 && next.kind.is_flow_delimiter())
            }
        }
    }

    /// The run glued to an indicator: anchor/alias/tag names and block scalar indicators.
    fn attached_run(&self, scan: &mut LineScan<'_, '_>) {
        let start = scan.pos;
        while let Some(piece) = scan.peek(0) {
            if piece.kind.is_whitespace() || (self.flow_depth > 0 && piece.kind.is_flow_delimiter())
            {
                break;
            }
            scan.pos += 1;
        }
        if scan.pos > start {
            scan.push_slice(TokenType::Data, start, scan.pos);
        }
    }

    /// A plain scalar: everything up to a structural terminator, trailing spaces trimmed.
    fn data_run(&self, scan: &mut LineScan<'_, '_>) {
        let pieces = scan.pieces;
        let start = scan.pos;
        let mut end = start;
        let mut pos = start;
        while let Some(piece) = pieces.get(pos) {
            match piece.kind {
                RawToken::Spaces | RawToken::Tabs => {
                    if pieces.get(pos + 1).map(|next| next.kind) == Some(RawToken::Hash) {
                        break;
                    }
                }
                RawToken::Colon if self.colon_is_indicator(scan, pos + 1 - scan.pos) => break,
                kind if self.flow_depth > 0 && kind.is_flow_delimiter() => break,
                _ => end = pos + 1,
            }
            pos += 1;
        }
        // the first piece always belongs to the run
        let end = end.max(start + 1);
        scan.push_slice(TokenType::Data, start, end);
        scan.pos = end;
    }

    fn quoted(&self, scan: &mut LineScan<'_, '_>) -> Result<(), ParseError> {
        let pieces = scan.pieces;
        let open = &pieces[scan.pos];
        let quote = open.kind;
        let mut count = 1;
        let mut escaped = false;
        let mut pos = scan.pos + 1;

        let close = loop {
            let piece = match pieces.get(pos) {
                Some(piece) => piece,
                None => {
                    return Err(ParseError::new(
                        ErrorKind::UnterminatedQuotedScalar,
                        Position::new(scan.line_number, open.column),
                        "quoted scalar is not closed on this line",
                    ))
                }
            };
            if escaped {
                escaped = false;
            } else if quote == RawToken::DoubleQuote && piece.kind == RawToken::Backslash {
                escaped = true;
            } else if piece.kind == quote {
                count += 1;
                if count % 2 == 0 && self.quote_may_close(pieces.get(pos + 1)) {
                    break pos;
                }
            }
            pos += 1;
        };

        let kind = if quote == RawToken::SingleQuote {
            TokenType::SingleQuote
        } else {
            TokenType::DoubleQuote
        };
        let content = &scan.line[open.span.end..pieces[close].span.start];
        scan.push(kind, "", open.column);
        scan.push(TokenType::Data, content, open.column + 1);
        scan.pos = close + 1;
        Ok(())
    }

    fn quote_may_close(&self, next: Option<&RawPiece<'_>>) -> bool {
        match next {
            None => true,
            Some(next) => {
                next.kind.is_whitespace()
                    || next.kind == RawToken::Colon
                    || (self.flow_depth > 0
                        && matches!(
                            next.kind,
                            RawToken::Comma | RawToken::CloseBracket | RawToken::CloseBrace
                        ))
            }
        }
    }
}

/// Cursor over one line's raw pieces plus the tokens produced so far.
struct LineScan<'l, 'p> {
    line: &'l str,
    pieces: &'p [RawPiece<'l>],
    line_number: usize,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'l, 'p> LineScan<'l, 'p> {
    fn peek(&self, offset: usize) -> Option<&'p RawPiece<'l>> {
        self.pieces.get(self.pos + offset)
    }

    /// True if the piece at `offset` is whitespace or past the end of the line.
    fn ends_token(&self, offset: usize) -> bool {
        self.peek(offset)
            .map(|piece| piece.kind.is_whitespace())
            .unwrap_or(true)
    }

    fn push(&mut self, kind: TokenType, text: &str, column: usize) {
        self.tokens
            .push(Token::new(kind, text, self.line_number, column));
    }

    /// Push a symbol and move past it.
    fn symbol(&mut self, kind: TokenType, column: usize) {
        self.push(kind, "", column);
        self.pos += 1;
    }

    fn push_slice(&mut self, kind: TokenType, start: usize, end: usize) {
        let first = &self.pieces[start];
        let text = &self.line[first.span.start..self.pieces[end - 1].span.end];
        let column = first.column;
        self.push(kind, text, column);
    }
}

fn whitespace_name(c: char) -> &'static str {
    if c == '\t' {
        "tabs"
    } else {
        "spaces"
    }
}

/// Tokenize a whole source string with a fresh tokenizer, concatenating line tokens.
pub fn tokenize_str(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokenizer = Tokenizer::new();
    let mut tokens = Vec::new();
    for (index, line) in crate::yaml::source::lines(source).enumerate() {
        tokens.extend(tokenizer.tokenize(line, index + 1)?);
    }
    Ok(tokens)
}
