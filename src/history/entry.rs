use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pattern::{Operator, Pattern};
use crate::workspace::operand::{OperandKind, OperandSource};

/// A committed build step. Entries are never edited once pushed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub operation: String,
    pub pattern: Pattern,
    pub op_fn: Operator,
    pub operands: Vec<OperandSource>,
    pub helper_used: bool,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(
        op_fn: Operator,
        operands: Vec<OperandSource>,
        pattern: Pattern,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let helper_used = operands
            .iter()
            .any(|operand| operand.kind == OperandKind::Favorite);
        Self {
            operation: format_operation(op_fn, &operands),
            pattern,
            op_fn,
            operands,
            helper_used,
            timestamp,
        }
    }
}

/// Display label for a step, e.g. `subtract(1, 2)` or `invert(_)`.
pub fn format_operation(op_fn: Operator, operands: &[OperandSource]) -> String {
    let labels: Vec<String> = operands.iter().map(OperandSource::label).collect();
    format!("{}({})", op_fn, labels.join(", "))
}

/// The ordered list of committed steps for the active trial.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OperationHistory {
    entries: Vec<HistoryEntry>,
}

impl OperationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and returns its zero-based index.
    pub fn push(&mut self, entry: HistoryEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    /// Removes every entry, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// The most recent committed pattern, or blank when nothing is committed.
    pub fn last_pattern(&self) -> Pattern {
        self.entries
            .last()
            .map(|entry| entry.pattern)
            .unwrap_or_else(Pattern::blank)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
