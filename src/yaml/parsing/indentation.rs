//! Indentation stack
//!
//!     The [IndentationManager] tracks one entry per open node: the level (count of leading
//!     indentation characters) and the kind of node sitting there. The bottom entry is a
//!     sentinel for the document root at level 0 and is never popped.
//!
//! Push Rules
//!
//!     Checked in this order, before anything is mutated:
//!
//!         1. the stack may not grow past the configured depth
//!         2. a level below the current top is refused; callers unwind first
//!         3. once the first nested level fixed the indentation unit, every step deeper than
//!            the top must be a multiple of it
//!         4. a deeper level needs a nestable (block container) top
//!
//!     Equal levels are always accepted: they model a node continued on the same line level,
//!     such as an anchor followed by the node it names.
//!
//! Compact Entries
//!
//!     The content of `- key: value` starts at the key's column, which need not sit a whole
//!     unit past the dash. [IndentationManager::push_compact] records that column as the
//!     content level of the entry on top. Pushes at a container's content level skip rule 3,
//!     and compact pushes never fix the unit.
//!
//!     Levels are `usize`, so negative levels cannot be expressed at all.

use serde::Serialize;
use thiserror::Error;

use crate::yaml::ast::NodeKind;
use crate::yaml::token::{Token, TokenType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Indentation {
    pub level: usize,
    pub node_kind: NodeKind,
    /// Column-derived level of a compact entry's content, once known.
    pub content_level: Option<usize>,
}

/// Where a line at some level sits relative to the open levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    Child,
    Sibling,
    /// Pop this many entries; the lowest one popped sits at the new level.
    ParentLevel(usize),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndentationError {
    #[error("level {level} is below the current level {current}")]
    BelowCurrentLevel { level: usize, current: usize },
    #[error("level {level} is not a multiple of the indentation unit {unit}")]
    InconsistentUnit { level: usize, unit: usize },
    #[error("level {level} is deeper than the {parent} at level {parent_level}, which cannot hold children")]
    NonNestableParent {
        level: usize,
        parent: NodeKind,
        parent_level: usize,
    },
    #[error("nesting deeper than {limit} levels")]
    TooDeep { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentationManager {
    stack: Vec<Indentation>,
    modulo_factor: Option<usize>,
    max_depth: usize,
}

const ROOT: Indentation = Indentation {
    level: 0,
    node_kind: NodeKind::Document,
    content_level: None,
};

impl IndentationManager {
    pub fn new(max_depth: usize) -> Self {
        Self {
            stack: vec![ROOT],
            modulo_factor: None,
            max_depth,
        }
    }

    pub fn peek(&self) -> Indentation {
        *self.stack.last().unwrap_or(&ROOT)
    }

    /// Remove the top entry. The root sentinel stays; popping it is a no-op.
    pub fn pop(&mut self) -> Option<Indentation> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    pub fn can_push(&self, level: usize) -> Result<(), IndentationError> {
        self.check(level, false)
    }

    fn check(&self, level: usize, compact: bool) -> Result<(), IndentationError> {
        if self.depth() >= self.max_depth {
            return Err(IndentationError::TooDeep {
                limit: self.max_depth,
            });
        }
        let top = self.peek();
        if level < top.level {
            return Err(IndentationError::BelowCurrentLevel {
                level,
                current: top.level,
            });
        }
        let at_content = compact || top.content_level == Some(level);
        if let Some(unit) = self.modulo_factor.filter(|_| !at_content) {
            if (level - top.level) % unit != 0 {
                return Err(IndentationError::InconsistentUnit { level, unit });
            }
        }
        if level > top.level && !top.node_kind.is_nestable() {
            return Err(IndentationError::NonNestableParent {
                level,
                parent: top.node_kind,
                parent_level: top.level,
            });
        }
        Ok(())
    }

    pub fn push(&mut self, level: usize, node_kind: NodeKind) -> Result<(), IndentationError> {
        self.check(level, false)?;
        let top = self.peek();
        let at_content = top.content_level == Some(level);
        if self.modulo_factor.is_none() && level > top.level && !at_content {
            self.modulo_factor = Some(level - top.level);
        }
        self.stack.push(Indentation {
            level,
            node_kind,
            content_level: None,
        });
        Ok(())
    }

    /// Push the first node of a compact entry's content, at the column it starts on. The
    /// entry on top remembers that level for the siblings that follow.
    pub fn push_compact(
        &mut self,
        level: usize,
        node_kind: NodeKind,
    ) -> Result<(), IndentationError> {
        self.check(level, true)?;
        if self.stack.len() > 1 {
            if let Some(top) = self.stack.last_mut() {
                top.content_level = Some(level);
            }
        }
        self.stack.push(Indentation {
            level,
            node_kind,
            content_level: None,
        });
        Ok(())
    }

    /// Pure query: how a line at `level` relates to the open levels.
    pub fn determine_relationship(&self, level: usize) -> Relationship {
        let top = self.peek().level;
        if level > top {
            return Relationship::Child;
        }
        if level == top {
            return Relationship::Sibling;
        }
        match self.stack.iter().skip(1).position(|entry| entry.level == level) {
            Some(index) => Relationship::ParentLevel(self.depth() - index),
            None if level == 0 => Relationship::ParentLevel(self.depth()),
            None => Relationship::Unknown,
        }
    }

    /// Level of a line (its leading Indentation token, or 0) and its relationship.
    pub fn find_indentation(&self, tokens: &[Token]) -> (Relationship, usize) {
        let level = tokens
            .first()
            .filter(|token| token.is(TokenType::Indentation))
            .map(Token::indentation_level)
            .unwrap_or(0);
        (self.determine_relationship(level), level)
    }

    /// Record that the top node turned out to be of another kind (a block whose first
    /// child was a sequence entry).
    pub fn retag_top(&mut self, node_kind: NodeKind) {
        if self.stack.len() > 1 {
            if let Some(top) = self.stack.last_mut() {
                top.node_kind = node_kind;
            }
        }
    }

    /// Back to the bare root, forgetting the indentation unit.
    pub fn reset(&mut self) {
        self.stack.truncate(1);
        self.modulo_factor = None;
    }

    pub fn modulo_factor(&self) -> Option<usize> {
        self.modulo_factor
    }

    /// Entries above the root sentinel.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn levels(&self) -> impl Iterator<Item = usize> + '_ {
        self.stack.iter().map(|entry| entry.level)
    }

    pub fn entries(&self) -> &[Indentation] {
        &self.stack
    }
}
