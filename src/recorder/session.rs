use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::trials::SessionMode;

use super::trial::TrialRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    pub points_per_trial: u32,
    pub feedback_delay_ms: u64,
}

/// Leading record of every stored session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub mode: SessionMode,
    pub randomized: bool,
    pub trial_order: Vec<String>,
    pub scoring: ScoringConfig,
}

/// One element of a stored session array: the metadata header first, then
/// one entry per trial in the order they were run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "recordType", rename_all = "camelCase")]
pub enum SessionLogEntry {
    Metadata(SessionMetadata),
    Trial(TrialRecord),
}

/// All trial records of one run. Trials are appended when they are left;
/// records already in the list are never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    metadata: SessionMetadata,
    trials: Vec<TrialRecord>,
}

impl SessionRecord {
    pub fn new(
        mode: SessionMode,
        randomized: bool,
        trial_order: Vec<String>,
        scoring: ScoringConfig,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            metadata: SessionMetadata {
                session_id: Uuid::new_v4().to_string(),
                started_at,
                completed_at: None,
                mode,
                randomized,
                trial_order,
                scoring,
            },
            trials: Vec::new(),
        }
    }

    pub fn metadata(&self) -> &SessionMetadata {
        &self.metadata
    }

    pub fn trials(&self) -> &[TrialRecord] {
        &self.trials
    }

    pub fn push_trial(&mut self, trial: TrialRecord) {
        self.trials.push(trial);
    }

    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        self.metadata.completed_at = Some(at);
    }

    pub fn total_points(&self) -> u32 {
        self.trials.iter().map(|trial| trial.points_awarded).sum()
    }

    /// Serializable form, optionally followed by the still-open trial.
    pub fn to_log(&self, active: Option<&TrialRecord>) -> Vec<SessionLogEntry> {
        std::iter::once(SessionLogEntry::Metadata(self.metadata.clone()))
            .chain(self.trials.iter().cloned().map(SessionLogEntry::Trial))
            .chain(active.cloned().map(SessionLogEntry::Trial))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;

    #[test]
    fn log_starts_with_metadata_header() {
        let mut session = SessionRecord::new(
            SessionMode::Scored,
            true,
            vec!["cross".into(), "frame".into()],
            ScoringConfig {
                points_per_trial: 10,
                feedback_delay_ms: 1500,
            },
            Utc::now(),
        );
        session.push_trial(TrialRecord::new(0, "cross", Pattern::blank(), SessionMode::Scored, Utc::now()));
        let active = TrialRecord::new(1, "frame", Pattern::blank(), SessionMode::Scored, Utc::now());

        let log = session.to_log(Some(&active));
        assert_eq!(log.len(), 3);
        assert!(matches!(log[0], SessionLogEntry::Metadata(_)));

        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json[0]["recordType"], "metadata");
        assert_eq!(json[0]["randomized"], true);
        assert_eq!(json[1]["recordType"], "trial");
        assert_eq!(json[2]["targetName"], "frame");

        let back: Vec<SessionLogEntry> = serde_json::from_value(json).unwrap();
        assert_eq!(back.len(), 3);
    }
}
