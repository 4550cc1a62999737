use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::history::Favorite;
use crate::notice::Notice;
use crate::pattern::{Operator, Pattern};
use crate::recorder::TrialRecord;
use crate::workspace::PendingView;

use super::{SequencerStatus, SessionMode};

/// One row of the history panel. `step` is the 1-based label the participant
/// sees.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItemView {
    pub step: usize,
    pub operation: String,
    pub op_fn: Operator,
    pub pattern: Pattern,
    pub favorited: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrialSummary {
    pub trial_index: usize,
    pub target_name: String,
    pub success: bool,
    pub points_awarded: u32,
    pub steps: usize,
    pub submissions: usize,
    pub blocked_interactions: usize,
}

impl From<&TrialRecord> for TrialSummary {
    fn from(record: &TrialRecord) -> Self {
        Self {
            trial_index: record.trial_index,
            target_name: record.target_name.clone(),
            success: record.success,
            points_awarded: record.points_awarded,
            steps: record.steps.len(),
            submissions: record.submissions.len(),
            blocked_interactions: record.blocked_interactions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSummary {
    pub session_id: String,
    pub total_points: u32,
    pub successful_trials: usize,
    pub trial_count: usize,
    pub trials: Vec<TrialSummary>,
}

/// Everything the rendering collaborator draws after a command.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: SequencerStatus,
    pub mode: SessionMode,
    /// Position in the trial order, 0-based.
    pub trial_index: Option<usize>,
    pub trial_count: usize,
    pub target_name: Option<String>,
    pub target: Option<Pattern>,
    pub hint: Option<String>,
    pub workspace: Pattern,
    pub preview: Option<Pattern>,
    pub recalled: Option<Pattern>,
    pub pending: PendingView,
    pub history: Vec<HistoryItemView>,
    pub selection: Vec<usize>,
    pub favorites: Vec<Favorite>,
    pub score: u32,
    pub advance_due_at: Option<DateTime<Utc>>,
    pub summary: Option<CompletionSummary>,
    pub notices: Vec<Notice>,
}
