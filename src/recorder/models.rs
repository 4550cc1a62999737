//! Log record types attached to a [`TrialRecord`](super::TrialRecord).
//!
//! Field names serialize in camelCase so exported logs line up with the
//! browser-side analysis scripts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pattern::{Operator, Pattern};
use crate::workspace::{OperandSource, PendingStatus, WorkflowAction};

/// A committed step plus the latency since the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub step: usize,
    pub operation: String,
    pub op_fn: Operator,
    pub operands: Vec<OperandSource>,
    pub pattern: Pattern,
    pub helper_used: bool,
    pub timestamp: DateTime<Utc>,
    pub interval_from_last: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonClickRecord {
    pub button: String,
    pub outcome: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationAction {
    Armed,
    Rejected,
    OperandStaged,
    OperandRejected,
}

/// Operator arming and operand staging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    pub action: OperationAction,
    pub operator: Option<String>,
    pub previous: Option<String>,
    pub source: Option<OperandSource>,
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FavoriteAction {
    Add,
    AddDuplicate,
    Remove,
    Use,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteActionRecord {
    pub action: FavoriteAction,
    pub favorite_id: Option<String>,
    pub pattern: Option<Pattern>,
    pub op: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRecord {
    pub action: WorkflowAction,
    pub index: usize,
    pub blocked: bool,
    pub mode: PendingStatus,
    pub selection: Vec<usize>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreviewAction {
    Confirm,
    ConfirmRejected,
    Cancel,
    ToggleOff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRecord {
    pub action: PreviewAction,
    pub operator: Option<String>,
    pub preview: Option<Pattern>,
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryAction {
    Undo,
    UndoEmpty,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryActionRecord {
    pub action: HistoryAction,
    pub removed_count: usize,
    /// Label of the undone step; unset for resets.
    pub removed_operation: Option<String>,
    pub remaining: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub attempt: u32,
    pub correct: bool,
    pub submitted: Pattern,
    pub points_awarded: u32,
    pub timestamp: DateTime<Utc>,
}
