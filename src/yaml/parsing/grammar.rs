//! Grammar and node classification
//!
//!     Every node kind starts with a recognizable run of tokens. Those runs are declared here
//!     as [Production]s: a prefix saying how the node is introduced, and a head saying what
//!     kind of node follows.
//!
//!     Prefixes:
//!
//!         Keyed     <quote>? <data> <colon>       key: ...
//!         Entry     <dash>                        - ...
//!         Bare      (nothing)                     ...
//!
//!     Heads (all prefixes):
//!
//!         Scalar          <quote>? <data> <newline>
//!         Block           <newline>
//!         FlowSequence    <open-bracket>
//!         FlowMapping     <open-brace>
//!         Anchor          <ampersand> <data>
//!         Alias           <asterisk> <data> <newline>
//!         Literal         <pipe>
//!         Folded          <greater-than>
//!
//!     Heads (entries only):
//!
//!         CompactMapping  <quote>? <data> <colon>     - key: ...
//!         CompactSequence <dash>                      - - ...
//!
//!     Optional symbols are expanded into every concrete path and the paths are stored in a
//!     [TokenTrie]. A trie path ending at a node with a single way forward is decided early:
//!     the rest of the path is implied, and any token that strays from it is rejected by the
//!     frame that consumes the line instead of by the classifier.
//!
//!     Tags (`!`) and explicit keys (`?`) appear in no production, so lines using them are
//!     rejected with `UnexpectedTokenType`.

use std::sync::Arc;

use crate::yaml::ast::NodeKind;
use crate::yaml::error::{internal_violation, ErrorKind, ParseError};
use crate::yaml::token::{describe, to_grammar_string, Token, TokenType};

/// One position of a production: the token types accepted there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrammarSymbol {
    pub accepts: &'static [TokenType],
    pub optional: bool,
}

impl GrammarSymbol {
    pub fn matches(&self, kind: TokenType) -> bool {
        self.accepts.contains(&kind)
    }
}

const fn required(accepts: &'static [TokenType]) -> GrammarSymbol {
    GrammarSymbol {
        accepts,
        optional: false,
    }
}

const QUOTE: GrammarSymbol = GrammarSymbol {
    accepts: &[TokenType::SingleQuote, TokenType::DoubleQuote],
    optional: true,
};
const DATA: GrammarSymbol = required(&[TokenType::Data]);
const COLON: GrammarSymbol = required(&[TokenType::Colon]);
const DASH: GrammarSymbol = required(&[TokenType::Dash]);
const NEWLINE: GrammarSymbol = required(&[TokenType::Newline]);
const OPEN_BRACKET: GrammarSymbol = required(&[TokenType::OpenBracket]);
const OPEN_BRACE: GrammarSymbol = required(&[TokenType::OpenBrace]);
const AMPERSAND: GrammarSymbol = required(&[TokenType::Ampersand]);
const ASTERISK: GrammarSymbol = required(&[TokenType::Asterisk]);
const PIPE: GrammarSymbol = required(&[TokenType::Pipe]);
const GREATER_THAN: GrammarSymbol = required(&[TokenType::GreaterThan]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    Keyed,
    Entry,
    Bare,
}

impl Prefix {
    fn symbols(self) -> &'static [GrammarSymbol] {
        match self {
            Prefix::Keyed => &[QUOTE, DATA, COLON],
            Prefix::Entry => &[DASH],
            Prefix::Bare => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Head {
    Scalar,
    Block,
    FlowSequence,
    FlowMapping,
    Anchor,
    Alias,
    Literal,
    Folded,
    CompactMapping,
    CompactSequence,
}

impl Head {
    const SHARED: [Head; 8] = [
        Head::Scalar,
        Head::Block,
        Head::FlowSequence,
        Head::FlowMapping,
        Head::Anchor,
        Head::Alias,
        Head::Literal,
        Head::Folded,
    ];

    fn symbols(self) -> &'static [GrammarSymbol] {
        match self {
            Head::Scalar => &[QUOTE, DATA, NEWLINE],
            Head::Block => &[NEWLINE],
            Head::FlowSequence => &[OPEN_BRACKET],
            Head::FlowMapping => &[OPEN_BRACE],
            Head::Anchor => &[AMPERSAND, DATA],
            Head::Alias => &[ASTERISK, DATA, NEWLINE],
            Head::Literal => &[PIPE],
            Head::Folded => &[GREATER_THAN],
            Head::CompactMapping => &[QUOTE, DATA, COLON],
            Head::CompactSequence => &[DASH],
        }
    }

    pub fn node_kind(self) -> NodeKind {
        match self {
            Head::Scalar => NodeKind::Scalar,
            Head::Block | Head::CompactMapping => NodeKind::MappingBlock,
            Head::CompactSequence => NodeKind::SequenceBlock,
            Head::FlowSequence => NodeKind::SequenceFlow,
            Head::FlowMapping => NodeKind::MappingFlow,
            Head::Anchor => NodeKind::Anchor,
            Head::Alias => NodeKind::Alias,
            Head::Literal => NodeKind::MultilineString,
            Head::Folded => NodeKind::FoldedString,
        }
    }

    /// Compact heads only identify the node; their tokens belong to the child re-fed after
    /// the dash.
    pub fn is_compact(self) -> bool {
        matches!(self, Head::CompactMapping | Head::CompactSequence)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Production {
    pub prefix: Prefix,
    pub head: Head,
}

impl Production {
    pub fn new(prefix: Prefix, head: Head) -> Self {
        Self { prefix, head }
    }

    /// Every production of the grammar.
    pub fn all() -> Vec<Production> {
        let mut productions = Vec::new();
        for prefix in [Prefix::Keyed, Prefix::Entry, Prefix::Bare] {
            for head in Head::SHARED {
                productions.push(Production::new(prefix, head));
            }
        }
        productions.push(Production::new(Prefix::Entry, Head::CompactMapping));
        productions.push(Production::new(Prefix::Entry, Head::CompactSequence));
        productions
    }

    pub fn node_kind(&self) -> NodeKind {
        self.head.node_kind()
    }

    /// The full symbol list used to recognize the production.
    pub fn symbols(&self) -> Vec<GrammarSymbol> {
        self.prefix
            .symbols()
            .iter()
            .chain(self.head.symbols())
            .copied()
            .collect()
    }

    /// The symbols a frame consumes from its own line; for compact heads only the dash.
    pub fn consumed_symbols(&self) -> Vec<GrammarSymbol> {
        if self.head.is_compact() {
            self.prefix.symbols().to_vec()
        } else {
            self.symbols()
        }
    }
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: Vec<(TokenType, usize)>,
    leaf: Option<Production>,
    /// The production this node leads to when only one path continues from it.
    decided: Option<Production>,
}

/// Token-type trie over every concrete path of the grammar. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct TokenTrie {
    nodes: Vec<TrieNode>,
}

impl TokenTrie {
    pub fn build(productions: &[Production]) -> Self {
        let mut trie = Self {
            nodes: vec![TrieNode::default()],
        };
        for production in productions {
            for path in expand(&production.symbols()) {
                trie.insert(&path, *production);
            }
        }
        trie.decide();
        trie
    }

    fn insert(&mut self, path: &[TokenType], production: Production) {
        let mut node = 0;
        for kind in path {
            if self.nodes[node].leaf.is_some() {
                internal_violation(format_args!(
                    "{:?} extends the complete path of another production",
                    production
                ));
            }
            node = match self.step(node, *kind) {
                Some(next) => next,
                None => {
                    self.nodes.push(TrieNode::default());
                    let next = self.nodes.len() - 1;
                    self.nodes[node].children.push((*kind, next));
                    next
                }
            };
        }
        let target = &mut self.nodes[node];
        if !target.children.is_empty() || target.leaf.is_some_and(|leaf| leaf != production) {
            internal_violation(format_args!(
                "{:?} is ambiguous with another production",
                production
            ));
        }
        target.leaf = Some(production);
    }

    // Children always sit at higher indices than their parent, so a reverse sweep sees every
    // child before its parent.
    fn decide(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            let decided = match (&self.nodes[index].leaf, self.nodes[index].children.as_slice()) {
                (Some(leaf), _) => Some(*leaf),
                (None, [(_, only)]) => self.nodes[*only].decided,
                _ => None,
            };
            self.nodes[index].decided = decided;
        }
    }

    pub fn root(&self) -> usize {
        0
    }

    pub fn step(&self, node: usize, kind: TokenType) -> Option<usize> {
        self.nodes[node]
            .children
            .iter()
            .find(|(child_kind, _)| *child_kind == kind)
            .map(|(_, child)| *child)
    }

    pub fn leaf(&self, node: usize) -> Option<Production> {
        self.nodes[node].leaf
    }

    pub fn decided(&self, node: usize) -> Option<Production> {
        self.nodes[node].decided
    }

    pub fn expected(&self, node: usize) -> Vec<TokenType> {
        let mut kinds: Vec<TokenType> = self.nodes[node].children.iter().map(|(k, _)| *k).collect();
        kinds.sort();
        kinds
    }
}

fn expand(symbols: &[GrammarSymbol]) -> Vec<Vec<TokenType>> {
    let mut paths = vec![Vec::new()];
    for symbol in symbols {
        let mut next = Vec::new();
        for path in &paths {
            if symbol.optional {
                next.push(path.clone());
            }
            for kind in symbol.accepts {
                let mut extended = path.clone();
                extended.push(*kind);
                next.push(extended);
            }
        }
        paths = next;
    }
    paths
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Keep feeding tokens.
    Undetermined,
    Determined {
        production: Production,
        /// Tokens (Indentation included) up to and including the deciding one.
        consumed: usize,
    },
}

impl Classification {
    pub fn production(&self) -> Option<Production> {
        match self {
            Classification::Determined { production, .. } => Some(*production),
            Classification::Undetermined => None,
        }
    }
}

/// Walks a line's tokens through the trie.
///
/// Tokens fed while the kind is still undetermined are kept and the next call continues
/// from them, so a line may arrive in several batches.
#[derive(Debug, Clone)]
pub struct NodeTypeClassifier {
    trie: Arc<TokenTrie>,
    pending: Vec<Token>,
    node: usize,
    scanned: usize,
    resolved: Option<Classification>,
}

impl Default for NodeTypeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTypeClassifier {
    pub fn new() -> Self {
        Self::with_trie(Arc::new(TokenTrie::build(&Production::all())))
    }

    pub fn with_trie(trie: Arc<TokenTrie>) -> Self {
        Self {
            trie,
            pending: Vec::new(),
            node: 0,
            scanned: 0,
            resolved: None,
        }
    }

    pub fn classify(&mut self, tokens: &[Token]) -> Result<Classification, ParseError> {
        self.pending.extend_from_slice(tokens);
        if let Some(resolved) = self.resolved {
            return Ok(resolved);
        }

        while let Some(token) = self.pending.get(self.scanned) {
            self.scanned += 1;
            if token.is(TokenType::Indentation) {
                continue;
            }
            let next = match self.trie.step(self.node, token.kind) {
                Some(next) => next,
                None => {
                    let expected = self.trie.expected(self.node);
                    let err = ParseError::at(
                        ErrorKind::UnexpectedTokenType,
                        token,
                        format!(
                            "unexpected {}, expected {}",
                            describe(token),
                            to_grammar_string(&expected)
                        ),
                    );
                    self.reset();
                    return Err(err);
                }
            };
            self.node = next;
            if let Some(production) = self.trie.decided(next) {
                let resolved = Classification::Determined {
                    production,
                    consumed: self.scanned,
                };
                log::trace!("classified {:?} after {} tokens", production, self.scanned);
                self.resolved = Some(resolved);
                return Ok(resolved);
            }
        }
        Ok(Classification::Undetermined)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> &[Token] {
        &self.pending
    }

    /// Hand back every token fed since the last reset and start over.
    pub fn take(&mut self) -> Vec<Token> {
        let pending = std::mem::take(&mut self.pending);
        self.reset();
        pending
    }

    pub fn reset(&mut self) {
        self.pending.clear();
        self.node = self.trie.root();
        self.scanned = 0;
        self.resolved = None;
    }

    pub fn trie(&self) -> &Arc<TokenTrie> {
        &self.trie
    }
}
