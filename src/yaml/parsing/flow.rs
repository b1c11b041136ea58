//! Flow collections
//!
//!     A flow collection (`[a, b]`, `{k: v}`) is collected by its frame until the brackets
//!     balance, possibly across several lines, and then parsed here in one go with chumsky over
//!     the collected tokens. Indentation and Newline tokens are dropped before the tokens
//!     reach this parser.
//!
//!         value    := sequence | mapping | alias | scalar
//!         sequence := '[' (value (',' value)* ','?)? ']'
//!         mapping  := '{' (entry (',' entry)* ','?)? '}'
//!         entry    := quote? data ':' value?
//!         alias    := '*' data
//!         scalar   := quote? data
//!
//!     Anchors, tags and block constructs are not part of the flow grammar.

use chumsky::prelude::*;
use std::sync::Arc;

use crate::yaml::ast::{
    scalar, AliasNode, AnchorTable, CollectionStyle, MappingNode, Node, Position, ScalarNode,
    ScalarStyle, ScalarValue, SequenceNode,
};
use crate::yaml::error::{ErrorKind, ParseError};
use crate::yaml::token::{describe, Token, TokenType};

type ParserError = Simple<Token>;

fn token(kind: TokenType) -> impl Parser<Token, Token, Error = ParserError> + Clone {
    filter(move |t: &Token| t.kind == kind)
}

fn quote() -> impl Parser<Token, Option<Token>, Error = ParserError> + Clone {
    token(TokenType::SingleQuote)
        .or(token(TokenType::DoubleQuote))
        .or_not()
}

/// Style of a scalar introduced by an optional quote marker token.
pub(crate) fn style_of(quote: Option<&Token>) -> ScalarStyle {
    match quote.map(|t| t.kind) {
        Some(TokenType::SingleQuote) => ScalarStyle::SingleQuoted,
        Some(TokenType::DoubleQuote) => ScalarStyle::DoubleQuoted,
        _ => ScalarStyle::Plain,
    }
}

fn scalar_node(quote: Option<Token>, data: Token) -> Node {
    let style = style_of(quote.as_ref());
    let position = quote.as_ref().unwrap_or(&data).position();
    Node::Scalar(ScalarNode {
        key: None,
        value: scalar::resolve(&data.text, style),
        style,
        position,
    })
}

fn flow_value(anchors: &AnchorTable) -> impl Parser<Token, Node, Error = ParserError> + Clone + '_ {
    recursive(move |value| {
        let sequence = token(TokenType::OpenBracket)
            .then(
                value
                    .clone()
                    .separated_by(token(TokenType::Comma))
                    .allow_trailing(),
            )
            .then_ignore(token(TokenType::CloseBracket))
            .map(|(open, items)| {
                let mut sequence = SequenceNode::new(None, CollectionStyle::Flow, open.position());
                sequence.items = items;
                Node::Sequence(sequence)
            });

        let entry = quote()
            .then(token(TokenType::Data))
            .then_ignore(token(TokenType::Colon))
            .then(value.or_not())
            .map(|((quote, key), value): ((Option<Token>, Token), Option<Node>)| {
                let style = style_of(quote.as_ref());
                let position = quote.as_ref().unwrap_or(&key).position();
                let mut node = value.unwrap_or_else(|| {
                    Node::Scalar(ScalarNode {
                        key: None,
                        value: ScalarValue::Null,
                        style: ScalarStyle::Plain,
                        position,
                    })
                });
                node.set_key(Some(scalar::decode(&key.text, style)));
                node
            });

        let mapping = token(TokenType::OpenBrace)
            .then(entry.separated_by(token(TokenType::Comma)).allow_trailing())
            .then_ignore(token(TokenType::CloseBrace))
            .map(|(open, entries)| {
                let mut mapping = MappingNode::new(None, CollectionStyle::Flow, open.position());
                for entry in entries {
                    if let Some(replaced) = mapping.insert(entry) {
                        log::debug!(
                            "duplicate key {:?} in flow mapping at {}, keeping the later value",
                            replaced.key().unwrap_or_default(),
                            open.position()
                        );
                    }
                }
                Node::Mapping(mapping)
            });

        let alias = token(TokenType::Asterisk)
            .then(token(TokenType::Data))
            .try_map(move |(star, name): (Token, Token), span| {
                let target = anchors
                    .get(&name.text)
                    .ok_or_else(|| Simple::custom(span, "alias without an anchor"))?;
                Ok(Node::Alias(AliasNode {
                    key: None,
                    name: name.text,
                    position: star.position(),
                    target: Arc::clone(target),
                }))
            });

        let plain = quote()
            .then(token(TokenType::Data))
            .map(|(quote, data)| scalar_node(quote, data));

        choice((sequence, mapping, alias, plain))
    })
}

/// Parse a complete flow collection. `tokens` must start with its opening bracket and hold
/// nothing after the closing one.
///
/// Aliases bind to the node their anchor names at this point; an unknown name fails before
/// any syntax error does.
pub fn parse_flow(tokens: Vec<Token>, anchors: &AnchorTable) -> Result<Node, ParseError> {
    if let Some((star, name)) = unknown_alias(&tokens, anchors) {
        return Err(ParseError::new(
            ErrorKind::UnknownAnchor,
            star.position(),
            format!("alias '*{}' has no anchor", name.text),
        ));
    }
    flow_value(anchors)
        .then_ignore(end())
        .parse(tokens.clone())
        .map_err(|errors| convert_errors(errors, &tokens))
}

fn unknown_alias<'t>(
    tokens: &'t [Token],
    anchors: &AnchorTable,
) -> Option<(&'t Token, &'t Token)> {
    tokens.windows(2).find_map(|pair| match pair {
        [star, name]
            if star.is(TokenType::Asterisk)
                && name.is(TokenType::Data)
                && !anchors.contains(&name.text) =>
        {
            Some((star, name))
        }
        _ => None,
    })
}

fn convert_errors(errors: Vec<ParserError>, tokens: &[Token]) -> ParseError {
    let first = errors.into_iter().min_by_key(|e| e.span().start);
    let fallback = tokens
        .last()
        .map(Token::position)
        .unwrap_or(Position::new(1, 1));
    match first {
        Some(error) => match error.found() {
            Some(found) => ParseError::at(
                ErrorKind::UnexpectedTokenType,
                found,
                format!("unexpected {} in flow collection", describe(found)),
            ),
            None => ParseError::new(
                ErrorKind::UnexpectedTokenType,
                tokens
                    .get(error.span().start)
                    .map(Token::position)
                    .unwrap_or(fallback),
                "flow collection ended early",
            ),
        },
        None => ParseError::new(
            ErrorKind::UnexpectedTokenType,
            fallback,
            "malformed flow collection",
        ),
    }
}
