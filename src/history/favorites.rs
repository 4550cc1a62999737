use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pattern::{Operator, Pattern};
use crate::workspace::operand::OperandSource;

use super::entry::HistoryEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteMeta {
    pub op_fn: Operator,
    pub operands: Vec<OperandSource>,
}

/// A pinned pattern snapshot, reusable as an operand in later trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    pub pattern: Pattern,
    pub op: String,
    pub meta: FavoriteMeta,
    pub created_at: DateTime<Utc>,
}

/// Session-scoped set of favorites, unique by pattern content.
///
/// Favorites only leave the store through [`FavoritesStore::remove_by_id`].
#[derive(Debug, Clone, Default)]
pub struct FavoritesStore {
    items: Vec<Favorite>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the store from a persisted array, dropping content duplicates
    /// that an older writer may have left behind.
    pub fn from_items(items: Vec<Favorite>) -> Self {
        let mut store = Self::new();
        for item in items {
            if !store.is_pattern_favorited(&item.pattern) {
                store.items.push(item);
            }
        }
        store
    }

    pub fn is_pattern_favorited(&self, pattern: &Pattern) -> bool {
        self.items.iter().any(|item| item.pattern == *pattern)
    }

    /// Pins the entry's pattern. Returns `None` when an equal pattern is
    /// already pinned.
    pub fn add_from_entry(&mut self, entry: &HistoryEntry, now: DateTime<Utc>) -> Option<Favorite> {
        if self.is_pattern_favorited(&entry.pattern) {
            return None;
        }

        let favorite = Favorite {
            id: Uuid::new_v4().to_string(),
            pattern: entry.pattern,
            op: entry.operation.clone(),
            meta: FavoriteMeta {
                op_fn: entry.op_fn,
                operands: entry.operands.clone(),
            },
            created_at: now,
        };
        self.items.push(favorite.clone());
        Some(favorite)
    }

    pub fn remove_by_id(&mut self, id: &str) -> Option<Favorite> {
        let position = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(position))
    }

    pub fn get(&self, id: &str) -> Option<&Favorite> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[Favorite] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
