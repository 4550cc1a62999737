use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SequencerStatus {
    NotStarted,
    TrialActive,
    /// A correct answer is in; the workspace is frozen until the advance.
    Submitted,
    Completed,
}

impl Default for SequencerStatus {
    fn default() -> Self {
        SequencerStatus::NotStarted
    }
}

impl SequencerStatus {
    pub fn has_trial(&self) -> bool {
        matches!(self, SequencerStatus::TrialActive | SequencerStatus::Submitted)
    }
}

/// Feedback-delay advance waiting to fire. Only honoured while the trial it
/// was scheduled for is still the current one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledAdvance {
    pub trial_index: usize,
    pub due_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResult {
    pub correct: bool,
    pub points_awarded: u32,
}
