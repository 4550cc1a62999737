use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::Favorite;
use crate::notice::ActionOutcome;
use crate::pattern::{Operator, Pattern};
use crate::trials::SessionMode;
use crate::workspace::WorkspaceEvent;

use super::models::{
    ButtonClickRecord, FavoriteAction, FavoriteActionRecord, HistoryAction, HistoryActionRecord,
    OperationAction, OperationRecord, PreviewAction, PreviewRecord, StepRecord, SubmissionRecord,
    WorkflowRecord,
};

/// Everything that happened during one trial.
///
/// Created when the trial loads, finalized on the first correct submission
/// and kept in the session afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialRecord {
    pub trial_index: usize,
    pub target_name: String,
    pub target: Pattern,
    pub mode: SessionMode,
    pub seeded_operator: Option<Operator>,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub success: bool,
    pub points_awarded: u32,
    pub steps: Vec<StepRecord>,
    pub button_clicks: Vec<ButtonClickRecord>,
    pub operation_log: Vec<OperationRecord>,
    pub favorite_actions: Vec<FavoriteActionRecord>,
    pub workflow_interactions: Vec<WorkflowRecord>,
    pub preview_actions: Vec<PreviewRecord>,
    pub history_actions: Vec<HistoryActionRecord>,
    pub submissions: Vec<SubmissionRecord>,
    #[serde(skip)]
    last_step_at: Option<DateTime<Utc>>,
}

impl TrialRecord {
    pub fn new(
        trial_index: usize,
        target_name: impl Into<String>,
        target: Pattern,
        mode: SessionMode,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            trial_index,
            target_name: target_name.into(),
            target,
            mode,
            seeded_operator: None,
            started_at,
            submitted_at: None,
            success: false,
            points_awarded: 0,
            steps: Vec::new(),
            button_clicks: Vec::new(),
            operation_log: Vec::new(),
            favorite_actions: Vec::new(),
            workflow_interactions: Vec::new(),
            preview_actions: Vec::new(),
            history_actions: Vec::new(),
            submissions: Vec::new(),
            last_step_at: None,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.submitted_at.is_some()
    }

    pub fn blocked_interactions(&self) -> usize {
        self.workflow_interactions
            .iter()
            .filter(|record| record.blocked)
            .count()
    }

    pub fn record_events(&mut self, events: &[WorkspaceEvent], at: DateTime<Utc>) {
        for event in events {
            self.record_event(event, at);
        }
    }

    pub fn record_event(&mut self, event: &WorkspaceEvent, at: DateTime<Utc>) {
        match event {
            WorkspaceEvent::OperatorArmed { op, previous } => {
                self.operation_log.push(OperationRecord {
                    action: OperationAction::Armed,
                    operator: Some(op.to_string()),
                    previous: previous.map(|prev| prev.to_string()),
                    source: None,
                    detail: None,
                    timestamp: at,
                });
            }
            WorkspaceEvent::OperatorRejected { name } => {
                self.operation_log.push(OperationRecord {
                    action: OperationAction::Rejected,
                    operator: Some(name.clone()),
                    previous: None,
                    source: None,
                    detail: Some("unknown operator".into()),
                    timestamp: at,
                });
            }
            WorkspaceEvent::OperandStaged { op, slot, source } => {
                self.operation_log.push(OperationRecord {
                    action: OperationAction::OperandStaged,
                    operator: Some(op.to_string()),
                    previous: None,
                    source: Some(source.clone()),
                    detail: slot.map(|slot| format!("{slot:?}")),
                    timestamp: at,
                });
            }
            WorkspaceEvent::OperandRejected { source, reason } => {
                self.operation_log.push(OperationRecord {
                    action: OperationAction::OperandRejected,
                    operator: None,
                    previous: None,
                    source: Some(source.clone()),
                    detail: Some(reason.clone()),
                    timestamp: at,
                });
            }
            WorkspaceEvent::OperatorToggledOff { op } => {
                self.push_preview(PreviewAction::ToggleOff, Some(*op), None, None, at);
            }
            WorkspaceEvent::Workflow {
                action,
                index,
                status,
                selection,
            } => {
                self.workflow_interactions.push(WorkflowRecord {
                    action: *action,
                    index: *index,
                    blocked: action.is_blocked(),
                    mode: *status,
                    selection: selection.clone(),
                    timestamp: at,
                });
            }
            WorkspaceEvent::Committed { index, entry } => {
                let since = self.last_step_at.unwrap_or(self.started_at);
                self.steps.push(StepRecord {
                    step: index + 1,
                    operation: entry.operation.clone(),
                    op_fn: entry.op_fn,
                    operands: entry.operands.clone(),
                    pattern: entry.pattern,
                    helper_used: entry.helper_used,
                    timestamp: at,
                    interval_from_last: (at - since).num_milliseconds().max(0),
                });
                self.last_step_at = Some(at);
                self.push_preview(
                    PreviewAction::Confirm,
                    Some(entry.op_fn),
                    Some(entry.pattern),
                    Some(entry.operation.clone()),
                    at,
                );
            }
            WorkspaceEvent::ConfirmRejected { op, reason } => {
                self.push_preview(PreviewAction::ConfirmRejected, *op, None, Some(reason.clone()), at);
            }
            WorkspaceEvent::PendingCancelled { op, preview } => {
                self.push_preview(PreviewAction::Cancel, Some(*op), *preview, None, at);
            }
            WorkspaceEvent::Undone { removed, remaining } => {
                self.history_actions.push(HistoryActionRecord {
                    action: HistoryAction::Undo,
                    removed_count: 1,
                    removed_operation: Some(removed.operation.clone()),
                    remaining: *remaining,
                    timestamp: at,
                });
            }
            WorkspaceEvent::UndoRejected => {
                self.history_actions.push(HistoryActionRecord {
                    action: HistoryAction::UndoEmpty,
                    removed_count: 0,
                    removed_operation: None,
                    remaining: 0,
                    timestamp: at,
                });
            }
            WorkspaceEvent::HistoryReset { removed } => {
                self.history_actions.push(HistoryActionRecord {
                    action: HistoryAction::Reset,
                    removed_count: *removed,
                    removed_operation: None,
                    remaining: 0,
                    timestamp: at,
                });
            }
        }
    }

    pub fn record_button(&mut self, button: &str, outcome: ActionOutcome, at: DateTime<Utc>) {
        self.button_clicks.push(ButtonClickRecord {
            button: button.to_string(),
            outcome: outcome.as_str().to_string(),
            timestamp: at,
        });
    }

    /// An operand the participant asked for that could not be built.
    pub fn record_operand_rejection(&mut self, detail: String, at: DateTime<Utc>) {
        self.operation_log.push(OperationRecord {
            action: OperationAction::OperandRejected,
            operator: None,
            previous: None,
            source: None,
            detail: Some(detail),
            timestamp: at,
        });
    }

    pub fn record_favorite(
        &mut self,
        action: FavoriteAction,
        favorite_id: Option<&str>,
        favorite: Option<&Favorite>,
        at: DateTime<Utc>,
    ) {
        self.favorite_actions.push(FavoriteActionRecord {
            action,
            favorite_id: favorite_id
                .map(str::to_string)
                .or_else(|| favorite.map(|fav| fav.id.clone())),
            pattern: favorite.map(|fav| fav.pattern),
            op: favorite.map(|fav| fav.op.clone()),
            timestamp: at,
        });
    }

    pub fn record_submission(
        &mut self,
        correct: bool,
        submitted: Pattern,
        points_awarded: u32,
        at: DateTime<Utc>,
    ) {
        let attempt = self.submissions.len() as u32 + 1;
        self.submissions.push(SubmissionRecord {
            attempt,
            correct,
            submitted,
            points_awarded,
            timestamp: at,
        });
        self.points_awarded += points_awarded;
        if correct && !self.is_finalized() {
            self.success = true;
            self.submitted_at = Some(at);
        }
    }

    fn push_preview(
        &mut self,
        action: PreviewAction,
        op: Option<Operator>,
        preview: Option<Pattern>,
        detail: Option<String>,
        at: DateTime<Utc>,
    ) {
        self.preview_actions.push(PreviewRecord {
            action,
            operator: op.map(|op| op.to_string()),
            preview,
            detail,
            timestamp: at,
        });
    }
}
