use serde::{Deserialize, Serialize};

use crate::pattern::{BinaryOp, Operator, Pattern, UnaryOp};

use super::operand::OperandSource;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PendingStatus {
    Idle,
    BinaryArmed,
    UnaryArmed,
}

impl Default for PendingStatus {
    fn default() -> Self {
        PendingStatus::Idle
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OperandSlot {
    A,
    B,
}

/// Explicit operand picks for a binary operation. Workflow selections are
/// kept on the controller and merged in by the resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinaryStaging {
    pub staged_a: Option<OperandSource>,
    pub staged_b: Option<OperandSource>,
    pub history_a: Option<usize>,
    pub history_b: Option<usize>,
}

impl BinaryStaging {
    pub fn set_staged(&mut self, slot: OperandSlot, source: OperandSource) {
        match slot {
            OperandSlot::A => {
                self.staged_a = Some(source);
                self.history_a = None;
            }
            OperandSlot::B => {
                self.staged_b = Some(source);
                self.history_b = None;
            }
        }
    }

    pub fn bind_history(&mut self, slot: OperandSlot, index: usize) {
        match slot {
            OperandSlot::A => {
                self.history_a = Some(index);
                self.staged_a = None;
            }
            OperandSlot::B => {
                self.history_b = Some(index);
                self.staged_b = None;
            }
        }
    }

    pub fn is_bound(&self, index: usize) -> bool {
        self.history_a == Some(index) || self.history_b == Some(index)
    }

    /// Drops history bindings that point at or past `len`.
    pub fn forget_missing(&mut self, len: usize) {
        if self.history_a.is_some_and(|index| index >= len) {
            self.history_a = None;
        }
        if self.history_b.is_some_and(|index| index >= len) {
            self.history_b = None;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryPending {
    pub op: BinaryOp,
    pub staging: BinaryStaging,
    pub preview: Option<Pattern>,
    /// Workspace as it was when the operation was armed.
    pub backup: Pattern,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryPending {
    pub op: UnaryOp,
    pub staged: Option<OperandSource>,
    /// Set on arming and cleared by the first operand event, so a fresh unary
    /// operation never previews on a pattern the participant did not pick.
    pub just_armed: bool,
    pub preview: Option<Pattern>,
    pub backup: Pattern,
}

/// The single armed-operation slot. Binary and unary staging can never be
/// live at the same time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PendingState {
    #[default]
    Idle,
    BinaryArmed(BinaryPending),
    UnaryArmed(UnaryPending),
}

impl PendingState {
    pub fn binary(op: BinaryOp, backup: Pattern) -> Self {
        PendingState::BinaryArmed(BinaryPending {
            op,
            staging: BinaryStaging::default(),
            preview: None,
            backup,
        })
    }

    pub fn unary(op: UnaryOp, backup: Pattern, just_armed: bool) -> Self {
        PendingState::UnaryArmed(UnaryPending {
            op,
            staged: None,
            just_armed,
            preview: None,
            backup,
        })
    }

    pub fn status(&self) -> PendingStatus {
        match self {
            PendingState::Idle => PendingStatus::Idle,
            PendingState::BinaryArmed(_) => PendingStatus::BinaryArmed,
            PendingState::UnaryArmed(_) => PendingStatus::UnaryArmed,
        }
    }

    pub fn operator(&self) -> Option<Operator> {
        match self {
            PendingState::Idle => None,
            PendingState::BinaryArmed(pending) => Some(Operator::Binary(pending.op)),
            PendingState::UnaryArmed(pending) => Some(Operator::Unary(pending.op)),
        }
    }

    pub fn preview(&self) -> Option<&Pattern> {
        match self {
            PendingState::Idle => None,
            PendingState::BinaryArmed(pending) => pending.preview.as_ref(),
            PendingState::UnaryArmed(pending) => pending.preview.as_ref(),
        }
    }

    pub fn backup(&self) -> Option<&Pattern> {
        match self {
            PendingState::Idle => None,
            PendingState::BinaryArmed(pending) => Some(&pending.backup),
            PendingState::UnaryArmed(pending) => Some(&pending.backup),
        }
    }

    pub fn is_armed(&self) -> bool {
        !matches!(self, PendingState::Idle)
    }
}
