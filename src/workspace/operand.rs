use serde::{Deserialize, Serialize};

use crate::history::{Favorite, HistoryEntry};
use crate::pattern::{Pattern, Primitive};

/// Label used in an entry's operation string for operands that did not come
/// from the history list (primitives, favorites, fallbacks).
pub const NON_HISTORY_LABEL: &str = "_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandKind {
    Primitive,
    History,
    Favorite,
    Workspace,
}

/// Where an operand pattern came from, together with a snapshot of it.
///
/// `index` is the zero-based history position and is only set for
/// [`OperandKind::History`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperandSource {
    pub kind: OperandKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub pattern: Pattern,
    pub origin: String,
}

impl OperandSource {
    pub fn primitive(primitive: &Primitive) -> Self {
        Self {
            kind: OperandKind::Primitive,
            index: None,
            pattern: primitive.generate(),
            origin: primitive.label(),
        }
    }

    /// The blank operand pre-filled into slot A when a trial starts.
    pub fn default_blank() -> Self {
        Self {
            kind: OperandKind::Primitive,
            index: None,
            pattern: Pattern::blank(),
            origin: "default_blank".into(),
        }
    }

    pub fn history(index: usize, entry: &HistoryEntry, origin: &str) -> Self {
        Self {
            kind: OperandKind::History,
            index: Some(index),
            pattern: entry.pattern,
            origin: origin.into(),
        }
    }

    pub fn favorite(favorite: &Favorite) -> Self {
        Self {
            kind: OperandKind::Favorite,
            index: None,
            pattern: favorite.pattern,
            origin: format!("favorite:{}", favorite.id),
        }
    }

    pub fn workspace(pattern: Pattern, origin: &str) -> Self {
        Self {
            kind: OperandKind::Workspace,
            index: None,
            pattern,
            origin: origin.into(),
        }
    }

    /// 1-based history position, or the placeholder for non-history sources.
    pub fn label(&self) -> String {
        match (self.kind, self.index) {
            (OperandKind::History, Some(index)) => (index + 1).to_string(),
            _ => NON_HISTORY_LABEL.to_string(),
        }
    }

    pub fn history_index(&self) -> Option<usize> {
        match self.kind {
            OperandKind::History => self.index,
            _ => None,
        }
    }
}
