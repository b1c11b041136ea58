//! Frames
//!
//!     A [Frame] is one node under construction. It is opened for a classified line, consumes
//!     that line's tokens through its [GrammarCursor], and then waits on the frame stack until
//!     a later line closes it. While open it may:
//!
//!         - take children (block containers, and anchors taking the node they name)
//!         - absorb whole lines (block scalars, flow collections spanning lines)
//!         - hand part of its line back to the builder as a new frame (anchors and compact
//!           `- key: value` / `- - item` entries)
//!
//!     Keyed frames read their key on the way: a Data token before the Colon is the key, the
//!     quote marker in front of it (if any) says how to decode it.
//!
//! Block Bodies
//!
//!     Whether a block container is a mapping or a sequence is decided by its first child:
//!     keyed children make a mapping, `-` entries a sequence. A single bare child (a value on
//!     its own deeper line) becomes the container's value. Mixing these is an error. A block
//!     container that never gets a child is a null scalar.
//!
//! Block Scalars
//!
//!     `|` and `>` frames absorb every following line that is blank or indented deeper than
//!     the frame. The first content line fixes the content indentation, deeper lines keep the
//!     extra indentation as leading spaces. Lines are joined when the frame closes:
//!
//!         literal (`|`)  lines joined with line breaks
//!         folded (`>`)   lines joined with spaces; blank lines and more indented lines keep
//!                        their line breaks
//!
//!     followed by chomping: clip keeps one final line break, `-` strips it, `+` keeps every
//!     trailing blank line. Explicit indentation indicators (digits) are accepted and ignored.

use std::sync::Arc;

use crate::yaml::ast::{
    scalar, AliasNode, AnchorNode, AnchorTable, Chomping, CollectionStyle, DocumentLayout,
    MappingNode, Node, NodeKind, Position, ScalarNode, ScalarStyle, ScalarValue, SequenceNode,
    TextBlockNode,
};
use crate::yaml::ast::node::insert_keyed;
use crate::yaml::error::{internal_violation, ErrorKind, ParseError};
use crate::yaml::token::{describe, to_grammar_string, Token, TokenType};

use super::flow::{self, style_of};
use super::grammar::{GrammarSymbol, Head, Prefix, Production};

/// What the builder lends a frame while it consumes tokens.
#[derive(Debug, Clone, Copy)]
pub struct ConsumeContext<'a> {
    pub anchors: &'a AnchorTable,
    pub max_nesting_depth: usize,
}

/// How a finished node joins its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRole {
    /// `key: ...`
    Key,
    /// `- ...`
    Item,
    /// A node standing on its own.
    Value,
}

impl From<Prefix> for EntryRole {
    fn from(prefix: Prefix) -> Self {
        match prefix {
            Prefix::Keyed => EntryRole::Key,
            Prefix::Entry => EntryRole::Item,
            Prefix::Bare => EntryRole::Value,
        }
    }
}

/// Children collected by a block container or a document.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BlockBody {
    #[default]
    Empty,
    Mapping(Vec<Node>),
    Sequence(Vec<Node>),
    Single(Node),
}

impl BlockBody {
    /// Add a child. A keyed child replacing an earlier one with the same key returns the
    /// replaced node.
    pub fn add(&mut self, node: Node, role: EntryRole) -> Result<Option<Node>, ParseError> {
        match self {
            BlockBody::Empty => {
                *self = match role {
                    EntryRole::Key => BlockBody::Mapping(vec![node]),
                    EntryRole::Item => BlockBody::Sequence(vec![node]),
                    EntryRole::Value => BlockBody::Single(node),
                };
                Ok(None)
            }
            BlockBody::Mapping(entries) if role == EntryRole::Key => {
                Ok(insert_keyed(entries, node))
            }
            BlockBody::Sequence(items) if role == EntryRole::Item => {
                items.push(node);
                Ok(None)
            }
            BlockBody::Sequence(_) if role == EntryRole::Key => Err(ParseError::new(
                ErrorKind::UnexpectedTokenType,
                node.position(),
                format!(
                    "mapping entry '{}' where a sequence entry was expected",
                    node.key().unwrap_or_default()
                ),
            )),
            BlockBody::Mapping(_) if role == EntryRole::Item => Err(ParseError::new(
                ErrorKind::UnexpectedTokenType,
                node.position(),
                "sequence entry where a mapping entry was expected",
            )),
            _ => Err(ParseError::new(
                ErrorKind::UnexpectedTokenType,
                node.position(),
                "a second value where only one is allowed",
            )),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, BlockBody::Empty)
    }

    pub fn layout(&self) -> DocumentLayout {
        match self {
            BlockBody::Empty => DocumentLayout::Empty,
            BlockBody::Mapping(_) => DocumentLayout::Mapping,
            BlockBody::Sequence(_) => DocumentLayout::Sequence,
            BlockBody::Single(_) => DocumentLayout::Single,
        }
    }

    pub fn into_nodes(self) -> Vec<Node> {
        match self {
            BlockBody::Empty => Vec::new(),
            BlockBody::Mapping(nodes) | BlockBody::Sequence(nodes) => nodes,
            BlockBody::Single(node) => vec![node],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Consumed,
    Rejected,
    /// Every symbol is matched; the token belongs to whatever follows.
    Exhausted,
}

/// Position within a production's symbol list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarCursor {
    symbols: Vec<GrammarSymbol>,
    position: usize,
}

impl GrammarCursor {
    pub fn new(symbols: Vec<GrammarSymbol>) -> Self {
        Self {
            symbols,
            position: 0,
        }
    }

    pub fn advance(&mut self, kind: TokenType) -> Step {
        while let Some(symbol) = self.symbols.get(self.position) {
            if symbol.matches(kind) {
                self.position += 1;
                return Step::Consumed;
            }
            if !symbol.optional {
                return Step::Rejected;
            }
            self.position += 1;
        }
        Step::Exhausted
    }

    pub fn is_exhausted(&self) -> bool {
        self.symbols[self.position..].iter().all(|s| s.optional)
    }

    /// Token types acceptable at the current position.
    pub fn expected(&self) -> Vec<TokenType> {
        let mut expected = Vec::new();
        for symbol in &self.symbols[self.position..] {
            expected.extend_from_slice(symbol.accepts);
            if !symbol.optional {
                break;
            }
        }
        expected
    }
}

/// Result of feeding a frame its line.
#[derive(Debug, Clone, PartialEq)]
pub enum Consumed {
    Done,
    /// Open these tokens as a new frame at `level`, on top of this one.
    Refeed { level: usize, tokens: Vec<Token> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeBuilder {
    Scalar {
        value: Option<(String, ScalarStyle)>,
    },
    Block {
        body: BlockBody,
    },
    Flow {
        tokens: Vec<Token>,
        depth: usize,
        parsed: Option<Node>,
    },
    Anchor {
        name: Option<String>,
        node: Option<Node>,
    },
    Alias {
        name: Option<String>,
        position: Option<Position>,
        target: Option<Arc<Node>>,
    },
    TextBlock {
        folded: bool,
        chomping: Chomping,
        content_level: Option<usize>,
        lines: Vec<String>,
    },
}

impl NodeBuilder {
    fn for_head(head: Head) -> Self {
        match head {
            Head::Scalar => NodeBuilder::Scalar { value: None },
            Head::Block | Head::CompactMapping | Head::CompactSequence => NodeBuilder::Block {
                body: BlockBody::Empty,
            },
            Head::FlowSequence | Head::FlowMapping => NodeBuilder::Flow {
                tokens: Vec::new(),
                depth: 0,
                parsed: None,
            },
            Head::Anchor => NodeBuilder::Anchor {
                name: None,
                node: None,
            },
            Head::Alias => NodeBuilder::Alias {
                name: None,
                position: None,
                target: None,
            },
            Head::Literal | Head::Folded => NodeBuilder::TextBlock {
                folded: head == Head::Folded,
                chomping: Chomping::Clip,
                content_level: None,
                lines: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub node_kind: NodeKind,
    pub indentation_level: usize,
    pub builder: NodeBuilder,
    pub grammar_position: GrammarCursor,
    production: Production,
    position: Position,
    key: Option<String>,
    seen_colon: bool,
    quote: Option<Token>,
}

impl Frame {
    pub fn new(production: Production, indentation_level: usize, position: Position) -> Self {
        Self {
            node_kind: production.node_kind(),
            indentation_level,
            builder: NodeBuilder::for_head(production.head),
            grammar_position: GrammarCursor::new(production.consumed_symbols()),
            production,
            position,
            key: None,
            seen_colon: false,
            quote: None,
        }
    }

    pub fn production(&self) -> Production {
        self.production
    }

    pub fn role(&self) -> EntryRole {
        self.production.prefix.into()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Consume the tokens of the line that opened this frame.
    pub fn consume(
        &mut self,
        tokens: Vec<Token>,
        ctx: ConsumeContext<'_>,
    ) -> Result<Consumed, ParseError> {
        let mut tokens = tokens.into_iter().peekable();
        let mut leading = true;
        while let Some(token) = tokens.next_if(|t| t.is(TokenType::Indentation)) {
            if !leading || self.has_scalar_value() {
                return Err(self.stray_indentation(&token));
            }
            leading = false;
        }

        let mut rest = Vec::new();
        for token in tokens.by_ref() {
            if token.is(TokenType::Indentation) {
                return Err(self.stray_indentation(&token));
            }
            match self.grammar_position.advance(token.kind) {
                Step::Consumed => self.accept(token),
                Step::Rejected => {
                    return Err(ParseError::at(
                        ErrorKind::UnexpectedTokenType,
                        &token,
                        format!(
                            "unexpected {}, expected {}",
                            describe(&token),
                            to_grammar_string(&self.grammar_position.expected())
                        ),
                    ))
                }
                Step::Exhausted => {
                    rest.push(token);
                    break;
                }
            }
        }
        rest.extend(tokens);

        if !self.grammar_position.is_exhausted() {
            return Err(ParseError::new(
                ErrorKind::UnexpectedTokenType,
                self.position,
                format!(
                    "line ends before the {} is complete, expected {}",
                    self.node_kind,
                    to_grammar_string(&self.grammar_position.expected())
                ),
            ));
        }
        self.tail(rest, ctx)
    }

    fn has_scalar_value(&self) -> bool {
        matches!(self.builder, NodeBuilder::Scalar { value: Some(_) })
    }

    fn stray_indentation(&self, token: &Token) -> ParseError {
        if self.has_scalar_value() {
            ParseError::at(
                ErrorKind::UnexpectedIndentation,
                token,
                "indentation after a complete scalar",
            )
        } else {
            ParseError::at(
                ErrorKind::UnexpectedTokenType,
                token,
                "indentation in the middle of a line",
            )
        }
    }

    fn accept(&mut self, token: Token) {
        match token.kind {
            TokenType::SingleQuote | TokenType::DoubleQuote => self.quote = Some(token),
            TokenType::Colon => self.seen_colon = true,
            TokenType::Data if self.production.prefix == Prefix::Keyed && !self.seen_colon => {
                let style = style_of(self.quote.take().as_ref());
                self.key = Some(scalar::decode(&token.text, style));
            }
            _ => {
                let quote = self.quote.take();
                match &mut self.builder {
                    NodeBuilder::Scalar { value } if token.is(TokenType::Data) => {
                        *value = Some((token.text, style_of(quote.as_ref())));
                    }
                    NodeBuilder::Flow { tokens, depth, .. }
                        if matches!(token.kind, TokenType::OpenBracket | TokenType::OpenBrace) =>
                    {
                        *depth += 1;
                        tokens.push(token);
                    }
                    NodeBuilder::Anchor { name, .. } if token.is(TokenType::Data) => {
                        *name = Some(token.text);
                    }
                    NodeBuilder::Alias { position, .. } if token.is(TokenType::Asterisk) => {
                        *position = Some(token.position());
                    }
                    NodeBuilder::Alias { name, .. } if token.is(TokenType::Data) => {
                        *name = Some(token.text);
                    }
                    _ => {}
                }
            }
        }
    }

    /// Tokens left after the production's own part.
    fn tail(&mut self, rest: Vec<Token>, ctx: ConsumeContext<'_>) -> Result<Consumed, ParseError> {
        if self.production.head.is_compact() || matches!(self.builder, NodeBuilder::Anchor { .. })
        {
            let level = if self.production.head.is_compact() {
                rest.first().map_or(self.indentation_level, |t| t.column - 1)
            } else {
                self.indentation_level
            };
            return Ok(Consumed::Refeed {
                level,
                tokens: rest,
            });
        }

        if matches!(self.builder, NodeBuilder::Flow { .. }) {
            self.absorb_flow(rest, ctx)?;
            return Ok(Consumed::Done);
        }
        match &mut self.builder {
            NodeBuilder::TextBlock { chomping, .. } => {
                *chomping = block_scalar_header(&rest, self.node_kind)?;
            }
            NodeBuilder::Alias {
                name,
                position,
                target,
            } => {
                if let Some(token) = rest.first() {
                    return Err(unexpected_after(token, self.node_kind));
                }
                let name = name.as_deref().unwrap_or_default();
                match ctx.anchors.get(name) {
                    Some(node) => *target = Some(Arc::clone(node)),
                    None => {
                        return Err(ParseError::new(
                            ErrorKind::UnknownAnchor,
                            position.unwrap_or(self.position),
                            format!("alias '*{}' has no anchor", name),
                        ))
                    }
                }
            }
            _ => {
                if let Some(token) = rest.first() {
                    return Err(unexpected_after(token, self.node_kind));
                }
            }
        }
        Ok(Consumed::Done)
    }

    /// Whether the frame claims following lines (an open flow collection, a block scalar).
    pub fn absorbs_lines(&self) -> bool {
        match &self.builder {
            NodeBuilder::Flow { parsed, .. } => parsed.is_none(),
            NodeBuilder::TextBlock { .. } => true,
            _ => false,
        }
    }

    /// Whether a complete line belongs to this frame rather than being a node of its own.
    pub fn wants_line(&self, tokens: &[Token]) -> bool {
        match &self.builder {
            NodeBuilder::Flow { parsed, .. } => parsed.is_none(),
            NodeBuilder::TextBlock { content_level, .. } => match tokens {
                [newline] => newline.is(TokenType::Newline),
                [indent, newline] => indent.is(TokenType::Indentation) && newline.is(TokenType::Newline),
                [indent, data, newline] => {
                    let level = indent.indentation_level();
                    indent.is(TokenType::Indentation)
                        && data.is(TokenType::Data)
                        && newline.is(TokenType::Newline)
                        && level > self.indentation_level
                        && content_level.map_or(true, |content| level >= content)
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Take a line claimed through [Frame::wants_line].
    pub fn absorb(&mut self, tokens: Vec<Token>, ctx: ConsumeContext<'_>) -> Result<(), ParseError> {
        if matches!(self.builder, NodeBuilder::Flow { .. }) {
            return self.absorb_flow(tokens, ctx);
        }
        match &mut self.builder {
            NodeBuilder::TextBlock {
                content_level,
                lines,
                ..
            } => {
                match tokens.as_slice() {
                    [indent, data, _] if data.is(TokenType::Data) => {
                        let level = indent.indentation_level();
                        let content = *content_level.get_or_insert(level);
                        let mut line = " ".repeat(level.saturating_sub(content));
                        line.push_str(&data.text);
                        lines.push(line);
                    }
                    _ => lines.push(String::new()),
                }
                Ok(())
            }
            _ => internal_violation(format_args!(
                "{} frame asked to absorb a line",
                self.node_kind
            )),
        }
    }

    fn absorb_flow(&mut self, incoming: Vec<Token>, ctx: ConsumeContext<'_>) -> Result<(), ParseError> {
        let (tokens, depth, parsed) = match &mut self.builder {
            NodeBuilder::Flow {
                tokens,
                depth,
                parsed,
            } => (tokens, depth, parsed),
            _ => internal_violation(format_args!("{} frame is not a flow collection", self.node_kind)),
        };
        for token in incoming {
            if matches!(
                token.kind,
                TokenType::Indentation | TokenType::Newline | TokenType::Comment
            ) {
                continue;
            }
            if parsed.is_some() {
                return Err(unexpected_after(&token, self.node_kind));
            }
            match token.kind {
                TokenType::OpenBracket | TokenType::OpenBrace => {
                    *depth += 1;
                    if *depth > ctx.max_nesting_depth {
                        return Err(ParseError::at(
                            ErrorKind::NestingTooDeep,
                            &token,
                            format!(
                                "flow collections nested deeper than {} levels",
                                ctx.max_nesting_depth
                            ),
                        ));
                    }
                }
                TokenType::CloseBracket | TokenType::CloseBrace => {
                    *depth = depth.saturating_sub(1);
                }
                _ => {}
            }
            tokens.push(token);
            if *depth == 0 {
                *parsed = Some(flow::parse_flow(std::mem::take(tokens), ctx.anchors)?);
            }
        }
        Ok(())
    }

    /// Attach a finished child. Returns the frame's new kind when the child decided it.
    pub fn attach(&mut self, node: Node, role: EntryRole) -> Result<Option<NodeKind>, ParseError> {
        match &mut self.builder {
            NodeBuilder::Block { body } => {
                if let Some(replaced) = body.add(node, role)? {
                    log::debug!(
                        "duplicate key {:?} at {}, keeping the later value",
                        replaced.key().unwrap_or_default(),
                        replaced.position()
                    );
                }
                if matches!(body, BlockBody::Sequence(_))
                    && self.node_kind != NodeKind::SequenceBlock
                {
                    self.node_kind = NodeKind::SequenceBlock;
                    return Ok(Some(self.node_kind));
                }
                Ok(None)
            }
            NodeBuilder::Anchor { node: slot, .. } if slot.is_none() => {
                *slot = Some(node);
                Ok(None)
            }
            _ => internal_violation(format_args!(
                "{} frame at level {} cannot take a child",
                self.node_kind, self.indentation_level
            )),
        }
    }

    /// Build the node. Fails only for a flow collection that never closed.
    pub fn finish(self) -> Result<Node, ParseError> {
        let Frame {
            node_kind,
            builder,
            position,
            key,
            ..
        } = self;
        let node = match builder {
            NodeBuilder::Scalar { value } => {
                let (raw, style) = value.unwrap_or_else(|| {
                    internal_violation(format_args!("scalar at {} without a value", position))
                });
                Node::Scalar(ScalarNode {
                    key,
                    value: scalar::resolve(&raw, style),
                    style,
                    position,
                })
            }
            NodeBuilder::Block { body } => match body {
                BlockBody::Empty => Node::Scalar(ScalarNode {
                    key,
                    value: ScalarValue::Null,
                    style: ScalarStyle::Plain,
                    position,
                }),
                BlockBody::Mapping(entries) => Node::Mapping(MappingNode {
                    key,
                    style: CollectionStyle::Block,
                    entries,
                    position,
                }),
                BlockBody::Sequence(items) => Node::Sequence(SequenceNode {
                    key,
                    style: CollectionStyle::Block,
                    items,
                    position,
                }),
                BlockBody::Single(mut node) => {
                    node.set_key(key);
                    node
                }
            },
            NodeBuilder::Flow { parsed, .. } => match parsed {
                Some(mut node) => {
                    node.set_key(key);
                    node
                }
                None => {
                    return Err(ParseError::new(
                        ErrorKind::IncompleteNodeAtEndOfInput,
                        position,
                        format!("{} is never closed", node_kind),
                    ))
                }
            },
            NodeBuilder::Anchor { name, node } => match (name, node) {
                (Some(name), Some(node)) => Node::Anchor(AnchorNode {
                    key,
                    name,
                    node: Arc::new(node),
                    position,
                }),
                _ => internal_violation(format_args!("anchor at {} without its node", position)),
            },
            NodeBuilder::Alias { name, target, .. } => match (name, target) {
                (Some(name), Some(target)) => Node::Alias(AliasNode {
                    key,
                    name,
                    position,
                    target,
                }),
                _ => internal_violation(format_args!("alias at {} was never bound", position)),
            },
            NodeBuilder::TextBlock {
                folded,
                chomping,
                lines,
                ..
            } => {
                let block = TextBlockNode {
                    key,
                    text: join_block_lines(&lines, folded, chomping),
                    chomping,
                    position,
                };
                if folded {
                    Node::FoldedString(block)
                } else {
                    Node::MultilineString(block)
                }
            }
        };
        Ok(node)
    }
}

fn unexpected_after(token: &Token, kind: NodeKind) -> ParseError {
    ParseError::at(
        ErrorKind::UnexpectedTokenType,
        token,
        format!("unexpected {} after {}", describe(token), kind),
    )
}

/// Chomping from the tokens after `|` or `>`: an optional indicator, then the line end.
fn block_scalar_header(rest: &[Token], kind: NodeKind) -> Result<Chomping, ParseError> {
    let (indicator, end) = match rest {
        [indicator, end] if indicator.is(TokenType::Data) => (Some(indicator), end),
        [end] => (None, end),
        [] => return Ok(Chomping::Clip),
        [first, ..] => return Err(unexpected_after(first, kind)),
    };
    if !end.is(TokenType::Newline) {
        return Err(unexpected_after(end, kind));
    }

    let mut chomping = Chomping::Clip;
    if let Some(indicator) = indicator {
        for c in indicator.text.chars() {
            chomping = match (c, chomping) {
                ('-', Chomping::Clip) => Chomping::Strip,
                ('+', Chomping::Clip) => Chomping::Keep,
                ('1'..='9', current) => current,
                _ => {
                    return Err(ParseError::at(
                        ErrorKind::UnexpectedTokenType,
                        indicator,
                        format!("invalid block scalar indicator {:?}", indicator.text),
                    ))
                }
            };
        }
    }
    Ok(chomping)
}

fn join_block_lines(lines: &[String], folded: bool, chomping: Chomping) -> String {
    let content_end = lines
        .iter()
        .rposition(|line| !line.is_empty())
        .map_or(0, |index| index + 1);
    let (body, trailing) = lines.split_at(content_end);

    let mut text = if folded {
        fold_lines(body)
    } else {
        body.join("\n")
    };
    if !body.is_empty() && chomping != Chomping::Strip {
        text.push('\n');
    }
    if chomping == Chomping::Keep {
        text.extend(trailing.iter().map(|_| '\n'));
    }
    text
}

fn fold_lines(lines: &[String]) -> String {
    let mut text = String::new();
    let mut previous: Option<&str> = None;
    let mut blanks = 0;
    for line in lines {
        if line.is_empty() {
            blanks += 1;
            continue;
        }
        match previous {
            Some(previous) => {
                let indented = previous.starts_with(' ') || line.starts_with(' ');
                let breaks = if indented { blanks + 1 } else { blanks };
                if breaks == 0 {
                    text.push(' ');
                } else {
                    text.extend(std::iter::repeat('\n').take(breaks));
                }
            }
            None => text.extend(std::iter::repeat('\n').take(blanks)),
        }
        blanks = 0;
        text.push_str(line);
        previous = Some(line);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::lexing::Tokenizer;
    use crate::yaml::testing::factories::mk_token;

    fn ctx(anchors: &AnchorTable) -> ConsumeContext<'_> {
        ConsumeContext {
            anchors,
            max_nesting_depth: 50,
        }
    }

    fn open(line: &str, prefix: Prefix, head: Head) -> (Frame, Result<Consumed, ParseError>) {
        let anchors = AnchorTable::new();
        let tokens = Tokenizer::new().tokenize(line, 1).unwrap();
        let mut frame = Frame::new(Production::new(prefix, head), 0, Position::new(1, 1));
        let consumed = frame.consume(tokens, ctx(&anchors));
        (frame, consumed)
    }

    #[test]
    fn test_keyed_scalar() {
        let (frame, consumed) = open("'my key': \"v\\tx\"", Prefix::Keyed, Head::Scalar);
        assert_eq!(consumed, Ok(Consumed::Done));
        assert_eq!(frame.key(), Some("my key"));
        let node = frame.finish().unwrap();
        assert_eq!(node.as_str(), Some("v\tx"));
    }

    #[test]
    fn test_scalar_rejects_indentation_after_value() {
        let anchors = AnchorTable::new();
        let mut frame = Frame::new(
            Production::new(Prefix::Keyed, Head::Scalar),
            0,
            Position::new(1, 1),
        );
        let tokens = vec![
            mk_token(TokenType::Data, "a", 1, 1),
            mk_token(TokenType::Colon, "", 1, 2),
            mk_token(TokenType::Data, "b", 1, 4),
            mk_token(TokenType::Indentation, "  ", 1, 5),
            mk_token(TokenType::Newline, "", 1, 7),
        ];
        let err = frame.consume(tokens, ctx(&anchors)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedIndentation);
        assert_eq!(err.column, 5);
    }

    #[test]
    fn test_anchor_refeeds_rest_at_same_level() {
        let (frame, consumed) = open("base: &shared value", Prefix::Keyed, Head::Anchor);
        match consumed.unwrap() {
            Consumed::Refeed { level, tokens } => {
                assert_eq!(level, 0);
                assert_eq!(tokens[0].text, "value");
            }
            other => panic!("expected a refeed, got {:?}", other),
        }
        assert_eq!(frame.key(), Some("base"));
    }

    #[test]
    fn test_compact_mapping_refeeds_at_key_column() {
        let (_, consumed) = open("-   name: x", Prefix::Entry, Head::CompactMapping);
        match consumed.unwrap() {
            Consumed::Refeed { level, tokens } => {
                assert_eq!(level, 4);
                assert_eq!(tokens[0].text, "name");
            }
            other => panic!("expected a refeed, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_alias() {
        let (_, consumed) = open("copy: *nowhere", Prefix::Keyed, Head::Alias);
        let err = consumed.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownAnchor);
        assert_eq!(err.column, 7);
    }

    #[test]
    fn test_alias_binds_the_node_anchored_when_read() {
        let mut anchors = AnchorTable::new();
        let first = Arc::new(Node::Scalar(ScalarNode {
            key: None,
            value: ScalarValue::Integer(1),
            style: ScalarStyle::Plain,
            position: Position::new(1, 7),
        }));
        anchors.insert("x", Arc::clone(&first));
        let tokens = Tokenizer::new().tokenize("copy: *x", 2).unwrap();
        let mut frame = Frame::new(
            Production::new(Prefix::Keyed, Head::Alias),
            0,
            Position::new(2, 1),
        );
        assert_eq!(frame.consume(tokens, ctx(&anchors)), Ok(Consumed::Done));

        // rebinding the name afterwards leaves the alias alone
        anchors.insert("x", Arc::new(Node::Scalar(ScalarNode {
            key: None,
            value: ScalarValue::Integer(2),
            style: ScalarStyle::Plain,
            position: Position::new(3, 7),
        })));
        let node = frame.finish().unwrap();
        assert_eq!(node.key(), Some("copy"));
        assert_eq!(node.resolve(), first.as_ref());
    }

    #[test]
    fn test_block_body_decided_by_first_child() {
        let mut frame = Frame::new(
            Production::new(Prefix::Keyed, Head::Block),
            0,
            Position::new(1, 1),
        );
        let item = Node::Scalar(ScalarNode {
            key: None,
            value: ScalarValue::Integer(1),
            style: ScalarStyle::Plain,
            position: Position::new(2, 5),
        });
        assert_eq!(
            frame.attach(item.clone(), EntryRole::Item),
            Ok(Some(NodeKind::SequenceBlock))
        );
        assert_eq!(frame.attach(item.clone(), EntryRole::Item), Ok(None));
        let mut keyed = item;
        keyed.set_key(Some("k".into()));
        let err = frame.attach(keyed, EntryRole::Key).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedTokenType);
        assert_eq!(err.position(), Position::new(2, 5));
    }

    #[test]
    fn test_empty_block_is_null() {
        let (frame, _) = open("key:", Prefix::Keyed, Head::Block);
        let node = frame.finish().unwrap();
        assert_eq!(node.key(), Some("key"));
        assert_eq!(node.as_scalar(), Some(&ScalarValue::Null));
    }

    #[test]
    fn test_flow_spanning_lines() {
        let anchors = AnchorTable::new();
        let mut tokenizer = Tokenizer::new();
        let mut frame = Frame::new(
            Production::new(Prefix::Keyed, Head::FlowSequence),
            0,
            Position::new(1, 1),
        );
        frame
            .consume(tokenizer.tokenize("tags: [a,", 1).unwrap(), ctx(&anchors))
            .unwrap();
        assert!(frame.absorbs_lines());
        let next = tokenizer.tokenize("  b]", 2).unwrap();
        assert!(frame.wants_line(&next));
        frame.absorb(next, ctx(&anchors)).unwrap();
        assert!(!frame.absorbs_lines());
        assert_eq!(frame.finish().unwrap().children().len(), 2);
    }

    #[test]
    fn test_unclosed_flow_is_incomplete() {
        let (frame, _) = open("tags: [a,", Prefix::Keyed, Head::FlowSequence);
        let err = frame.finish().unwrap_err();
        assert_eq!(err.kind, ErrorKind::IncompleteNodeAtEndOfInput);
    }

    #[test]
    fn test_flow_nesting_limit() {
        let anchors = AnchorTable::new();
        let tokens = Tokenizer::new().tokenize("[[[a]]]", 1).unwrap();
        let mut frame = Frame::new(
            Production::new(Prefix::Bare, Head::FlowSequence),
            0,
            Position::new(1, 1),
        );
        let err = frame
            .consume(
                tokens,
                ConsumeContext {
                    anchors: &anchors,
                    max_nesting_depth: 2,
                },
            )
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NestingTooDeep);
        assert_eq!(err.column, 3);
    }

    #[test]
    fn test_block_scalar_header() {
        let header = |line: &str| {
            let tokens = Tokenizer::new().tokenize(line, 1).unwrap();
            block_scalar_header(&tokens[1..], NodeKind::MultilineString)
        };
        assert_eq!(header("|"), Ok(Chomping::Clip));
        assert_eq!(header("|-"), Ok(Chomping::Strip));
        assert_eq!(header(">+2"), Ok(Chomping::Keep));
        assert_eq!(header("|+-").unwrap_err().kind, ErrorKind::UnexpectedTokenType);
    }

    #[test]
    fn test_join_literal() {
        let lines: Vec<String> = ["a", "  b", "", "c", "", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(join_block_lines(&lines, false, Chomping::Clip), "a\n  b\n\nc\n");
        assert_eq!(join_block_lines(&lines, false, Chomping::Strip), "a\n  b\n\nc");
        assert_eq!(join_block_lines(&lines, false, Chomping::Keep), "a\n  b\n\nc\n\n\n");
    }

    #[test]
    fn test_fold() {
        let lines: Vec<String> = ["one", "two", "", "three", "  indented", "four"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            join_block_lines(&lines, true, Chomping::Clip),
            "one two\nthree\n  indented\nfour\n"
        );
    }
}
