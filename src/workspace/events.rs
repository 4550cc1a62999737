use serde::{Deserialize, Serialize};

use crate::history::HistoryEntry;
use crate::pattern::{Operator, Pattern};

use super::operand::OperandSource;
use super::state::{OperandSlot, PendingStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowAction {
    Select,
    Bind,
    Recall,
    ClearRecall,
    BlockedThirdOperand,
    BlockedDeselect,
    BlockedInvalidIndex,
    BlockedNoOperation,
}

impl WorkflowAction {
    pub fn is_blocked(&self) -> bool {
        matches!(
            self,
            WorkflowAction::BlockedThirdOperand
                | WorkflowAction::BlockedDeselect
                | WorkflowAction::BlockedInvalidIndex
                | WorkflowAction::BlockedNoOperation
        )
    }
}

/// Everything the workspace did in response to one participant action.
/// The trial recorder turns these into log records.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceEvent {
    OperatorArmed {
        op: Operator,
        previous: Option<Operator>,
    },
    OperatorToggledOff {
        op: Operator,
    },
    OperatorRejected {
        name: String,
    },
    OperandStaged {
        op: Operator,
        slot: Option<OperandSlot>,
        source: OperandSource,
    },
    OperandRejected {
        source: OperandSource,
        reason: String,
    },
    Workflow {
        action: WorkflowAction,
        index: usize,
        status: PendingStatus,
        selection: Vec<usize>,
    },
    Committed {
        index: usize,
        entry: HistoryEntry,
    },
    ConfirmRejected {
        op: Option<Operator>,
        reason: String,
    },
    PendingCancelled {
        op: Operator,
        preview: Option<Pattern>,
    },
    Undone {
        removed: HistoryEntry,
        remaining: usize,
    },
    UndoRejected,
    HistoryReset {
        removed: usize,
    },
}
