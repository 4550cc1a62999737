use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::history::{HistoryEntry, OperationHistory};
use crate::notice::{ActionOutcome, Notice};
use crate::pattern::{BinaryOp, Operator, Pattern};
use crate::{log_debug, log_info, log_warn};

use super::events::{WorkflowAction, WorkspaceEvent};
use super::operand::OperandSource;
use super::resolver::{resolve_binary_operand_sources, resolve_unary_operand_source, BinaryOperands};
use super::state::{BinaryStaging, OperandSlot, PendingState, PendingStatus};

const ENABLE_LOGS: bool = true;

/// What the rendering collaborator needs to draw the operation panel.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingView {
    pub status: PendingStatus,
    pub operator: Option<Operator>,
    pub operand_a: Option<OperandSource>,
    pub operand_b: Option<OperandSource>,
    pub preview: Option<Pattern>,
    pub can_confirm: bool,
}

/// Owns the live workspace, the committed history of the active trial, the
/// workflow selection and the armed operation.
///
/// Every mutating method appends [`WorkspaceEvent`]s for the recorder and, for
/// rejected actions, a [`Notice`]. A rejected action never changes state.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceController {
    workspace: Pattern,
    history: OperationHistory,
    selection: Vec<usize>,
    pending: PendingState,
    events: Vec<WorkspaceEvent>,
    notices: Vec<Notice>,
}

impl WorkspaceController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pattern currently shown in the workspace, preview included.
    pub fn workspace(&self) -> &Pattern {
        &self.workspace
    }

    pub fn committed_pattern(&self) -> Pattern {
        self.history.last_pattern()
    }

    pub fn preview(&self) -> Option<&Pattern> {
        self.pending.preview()
    }

    pub fn pending(&self) -> &PendingState {
        &self.pending
    }

    pub fn status(&self) -> PendingStatus {
        self.pending.status()
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn history(&self) -> &OperationHistory {
        &self.history
    }

    /// Entry picked for passive recall while no operation is armed.
    pub fn recalled(&self) -> Option<&Pattern> {
        match (&self.pending, self.selection.as_slice()) {
            (PendingState::Idle, [index]) => self.history.get(*index).map(|entry| &entry.pattern),
            _ => None,
        }
    }

    pub fn can_confirm(&self) -> bool {
        self.pending.preview().is_some()
    }

    pub fn resolved_binary(&self) -> Option<BinaryOperands> {
        match &self.pending {
            PendingState::BinaryArmed(pending) => Some(resolve_binary_operand_sources(
                &pending.staging,
                &self.selection,
                &self.history,
            )),
            _ => None,
        }
    }

    pub fn resolved_unary(&self) -> Option<OperandSource> {
        match &self.pending {
            PendingState::UnaryArmed(pending) => resolve_unary_operand_source(
                pending.staged.as_ref(),
                pending.just_armed,
                &self.selection,
                &self.history,
                &pending.backup,
            ),
            _ => None,
        }
    }

    pub fn pending_view(&self) -> PendingView {
        let (operand_a, operand_b) = match &self.pending {
            PendingState::Idle => (None, None),
            PendingState::BinaryArmed(_) => {
                let operands = self.resolved_binary().unwrap_or_default();
                (operands.a, operands.b)
            }
            PendingState::UnaryArmed(_) => (self.resolved_unary(), None),
        };
        PendingView {
            status: self.pending.status(),
            operator: self.pending.operator(),
            operand_a,
            operand_b,
            preview: self.pending.preview().copied(),
            can_confirm: self.can_confirm(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<WorkspaceEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Clears everything for a new trial. Emits no events: the trial
    /// boundary is recorded by the sequencer.
    pub fn reset_for_trial(&mut self) {
        *self = Self::default();
    }

    /// Arms `add` with a blank pattern already in slot A.
    pub fn seed_default_operation(&mut self) {
        let mut pending = PendingState::binary(BinaryOp::Add, self.history.last_pattern());
        if let PendingState::BinaryArmed(binary) = &mut pending {
            binary
                .staging
                .set_staged(OperandSlot::A, OperandSource::default_blank());
        }
        self.pending = pending;
        self.selection.clear();
        self.recompute_preview();
    }

    pub fn arm_operator_by_name(&mut self, name: &str) -> ActionOutcome {
        match name.parse::<Operator>() {
            Ok(op) => self.arm_operator(op),
            Err(err) => {
                log_warn!("Rejected operator selection: {err}");
                self.events.push(WorkspaceEvent::OperatorRejected {
                    name: name.to_string(),
                });
                self.notices
                    .push(Notice::warning(format!("Unknown operation '{name}'")));
                ActionOutcome::Rejected
            }
        }
    }

    pub fn arm_operator(&mut self, op: Operator) -> ActionOutcome {
        let previous = self.pending.operator();

        if previous == Some(op) && self.holds_default_seed() {
            log_debug!("Operator {op} kept armed with its default operand");
            self.events
                .push(WorkspaceEvent::OperatorArmed { op, previous });
            return ActionOutcome::Applied;
        }

        if previous == Some(op) {
            self.pending = PendingState::Idle;
            self.selection.clear();
            self.workspace = self.history.last_pattern();
            log_info!("Operator {op} toggled off");
            self.events.push(WorkspaceEvent::OperatorToggledOff { op });
            return ActionOutcome::Applied;
        }

        let backup = self
            .pending
            .backup()
            .copied()
            .unwrap_or_else(|| self.history.last_pattern());

        self.selection.clear();
        self.pending = match op {
            Operator::Binary(binary) => PendingState::binary(binary, backup),
            // A freshly armed unary operator waits for an explicit operand.
            Operator::Unary(unary) => PendingState::unary(unary, backup, true),
        };

        log_info!(
            "Armed {op}{}",
            previous
                .map(|prev| format!(" (was {prev})"))
                .unwrap_or_default()
        );
        self.events
            .push(WorkspaceEvent::OperatorArmed { op, previous });
        self.recompute_preview();
        ActionOutcome::Applied
    }

    /// Stages an ephemeral operand (primitive or favorite). Without an explicit
    /// slot it takes the first free one; when both are taken it replaces B.
    pub fn stage_operand(&mut self, source: OperandSource, slot: Option<OperandSlot>) -> ActionOutcome {
        let operands = self.resolved_binary();

        match &mut self.pending {
            PendingState::Idle => {
                self.events.push(WorkspaceEvent::OperandRejected {
                    source,
                    reason: "no operation armed".into(),
                });
                self.notices
                    .push(Notice::warning("Choose an operation before adding a shape"));
                return ActionOutcome::Blocked;
            }
            PendingState::BinaryArmed(pending) => {
                let operands = operands.unwrap_or_default();
                let target =
                    slot.unwrap_or_else(|| first_free_slot(&pending.staging, &operands));
                pending.staging.set_staged(target, source.clone());
            }
            PendingState::UnaryArmed(pending) => {
                pending.staged = Some(source.clone());
                pending.just_armed = false;
                self.selection.clear();
            }
        }

        self.prune_selection();

        if let Some(op) = self.pending.operator() {
            log_debug!("Staged {} for {op}", source.origin);
            self.events
                .push(WorkspaceEvent::OperandStaged { op, slot, source });
        }
        self.recompute_preview();
        ActionOutcome::Applied
    }

    /// Handles a click on a history entry.
    pub fn toggle_history_selection(&mut self, index: usize) -> ActionOutcome {
        if self.history.get(index).is_none() {
            return self.block_workflow(
                WorkflowAction::BlockedInvalidIndex,
                index,
                format!("There is no step {}", index + 1),
            );
        }

        match &self.pending {
            PendingState::Idle => {
                let action = if self.selection == [index] {
                    self.selection.clear();
                    WorkflowAction::ClearRecall
                } else {
                    self.selection = vec![index];
                    WorkflowAction::Recall
                };
                self.push_workflow(action, index);
                ActionOutcome::Applied
            }
            PendingState::BinaryArmed(pending) => {
                if self.selection.contains(&index) || pending.staging.is_bound(index) {
                    return self.block_workflow(
                        WorkflowAction::BlockedDeselect,
                        index,
                        "Operands are locked while an operation is pending; reset to change them",
                    );
                }
                let operands =
                    resolve_binary_operand_sources(&pending.staging, &self.selection, &self.history);
                if operands.is_complete() {
                    return self.block_workflow(
                        WorkflowAction::BlockedThirdOperand,
                        index,
                        "Both operands are already selected",
                    );
                }
                self.selection.push(index);
                self.push_workflow(WorkflowAction::Select, index);
                self.recompute_preview();
                ActionOutcome::Applied
            }
            PendingState::UnaryArmed(pending) => {
                if self.selection.contains(&index) {
                    return self.block_workflow(
                        WorkflowAction::BlockedDeselect,
                        index,
                        "Operands are locked while an operation is pending; reset to change them",
                    );
                }
                if pending.staged.is_some() || !self.selection.is_empty() {
                    return self.block_workflow(
                        WorkflowAction::BlockedThirdOperand,
                        index,
                        "This operation takes a single operand",
                    );
                }
                self.selection.push(index);
                if let PendingState::UnaryArmed(pending) = &mut self.pending {
                    pending.just_armed = false;
                }
                self.push_workflow(WorkflowAction::Select, index);
                self.recompute_preview();
                ActionOutcome::Applied
            }
        }
    }

    /// Binds a history entry to a specific binary slot.
    pub fn bind_history_operand(&mut self, slot: OperandSlot, index: usize) -> ActionOutcome {
        if self.history.get(index).is_none() {
            return self.block_workflow(
                WorkflowAction::BlockedInvalidIndex,
                index,
                format!("There is no step {}", index + 1),
            );
        }

        match &mut self.pending {
            PendingState::Idle => self.block_workflow(
                WorkflowAction::BlockedNoOperation,
                index,
                "Choose an operation before picking operands",
            ),
            PendingState::UnaryArmed(_) => self.toggle_history_selection(index),
            PendingState::BinaryArmed(pending) => {
                if self.selection.contains(&index) || pending.staging.is_bound(index) {
                    return self.block_workflow(
                        WorkflowAction::BlockedDeselect,
                        index,
                        "That step is already an operand",
                    );
                }
                pending.staging.bind_history(slot, index);
                self.prune_selection();
                self.push_workflow(WorkflowAction::Bind, index);
                self.recompute_preview();
                ActionOutcome::Applied
            }
        }
    }

    /// Commits the preview as a new history entry and returns to idle with
    /// the new entry selected.
    pub fn confirm(&mut self, now: DateTime<Utc>) -> ActionOutcome {
        let op = self.pending.operator();
        let has_preview = self.pending.preview().is_some();

        let candidate = match &self.pending {
            PendingState::Idle => None,
            PendingState::BinaryArmed(pending) => {
                let operands =
                    resolve_binary_operand_sources(&pending.staging, &self.selection, &self.history);
                match (operands.a, operands.b) {
                    (Some(a), Some(b)) if has_preview => {
                        let result = pending.op.apply(&a.pattern, &b.pattern);
                        Some((Operator::Binary(pending.op), vec![a, b], result))
                    }
                    _ => None,
                }
            }
            PendingState::UnaryArmed(pending) => self
                .resolved_unary()
                .filter(|_| has_preview)
                .map(|source| {
                    let result = pending.op.apply(&source.pattern);
                    (Operator::Unary(pending.op), vec![source], result)
                }),
        };

        let Some((op_fn, operands, result)) = candidate else {
            let reason = match op {
                None => "no operation armed",
                Some(Operator::Binary(_)) => "two operands are required",
                Some(Operator::Unary(_)) => "an operand is required",
            };
            log_warn!("Confirm rejected: {reason}");
            self.events.push(WorkspaceEvent::ConfirmRejected {
                op,
                reason: reason.to_string(),
            });
            self.notices
                .push(Notice::warning(format!("Nothing to confirm: {reason}")));
            return ActionOutcome::Rejected;
        };

        let entry = HistoryEntry::new(op_fn, operands, result, now);
        let index = self.history.push(entry.clone());
        self.pending = PendingState::Idle;
        self.selection = vec![index];
        self.workspace = result;

        log_info!("Committed step {}: {}", index + 1, entry.operation);
        self.events
            .push(WorkspaceEvent::Committed { index, entry });
        ActionOutcome::Applied
    }

    /// Drops the armed operation and restores the pre-arming workspace.
    pub fn cancel_pending(&mut self) -> ActionOutcome {
        let Some(op) = self.pending.operator() else {
            return ActionOutcome::Ignored;
        };
        let preview = self.pending.preview().copied();
        let backup = self
            .pending
            .backup()
            .copied()
            .unwrap_or_else(|| self.history.last_pattern());

        self.pending = PendingState::Idle;
        self.selection.clear();
        self.workspace = backup;

        log_info!("Pending {op} cancelled");
        self.events
            .push(WorkspaceEvent::PendingCancelled { op, preview });
        ActionOutcome::Applied
    }

    pub fn undo(&mut self) -> ActionOutcome {
        let Some(removed) = self.history.pop() else {
            self.events.push(WorkspaceEvent::UndoRejected);
            self.notices.push(Notice::info("Nothing to undo"));
            return ActionOutcome::Blocked;
        };

        let remaining = self.history.len();
        let last = self.history.last_pattern();
        self.selection.retain(|&index| index < remaining);

        match &mut self.pending {
            PendingState::Idle => self.workspace = last,
            PendingState::BinaryArmed(pending) => {
                pending.staging.forget_missing(remaining);
                pending.backup = last;
            }
            PendingState::UnaryArmed(pending) => {
                if pending
                    .staged
                    .as_ref()
                    .and_then(OperandSource::history_index)
                    .is_some_and(|index| index >= remaining)
                {
                    pending.staged = None;
                }
                pending.backup = last;
            }
        }

        log_info!("Undid {} ({} steps left)", removed.operation, remaining);
        self.events
            .push(WorkspaceEvent::Undone { removed, remaining });
        if self.pending.is_armed() {
            self.recompute_preview();
        }
        ActionOutcome::Applied
    }

    /// Clears every committed step and any pending work.
    pub fn reset_history(&mut self) -> ActionOutcome {
        let removed = self.history.clear();
        self.pending = PendingState::Idle;
        self.selection.clear();
        self.workspace = Pattern::blank();

        log_info!("History reset ({removed} steps removed)");
        self.events.push(WorkspaceEvent::HistoryReset { removed });
        ActionOutcome::Applied
    }

    /// True while the trial's seeded `add` still holds only its blank slot A.
    fn holds_default_seed(&self) -> bool {
        let PendingState::BinaryArmed(binary) = &self.pending else {
            return false;
        };
        let seeded = BinaryStaging {
            staged_a: Some(OperandSource::default_blank()),
            ..BinaryStaging::default()
        };
        binary.op == BinaryOp::Add && binary.staging == seeded && self.selection.is_empty()
    }

    fn recompute_preview(&mut self) {
        let committed = self.history.last_pattern();
        let preview = match &self.pending {
            PendingState::Idle => None,
            PendingState::BinaryArmed(pending) => {
                resolve_binary_operand_sources(&pending.staging, &self.selection, &self.history)
                    .both()
                    .map(|(a, b)| pending.op.apply(&a.pattern, &b.pattern))
            }
            PendingState::UnaryArmed(pending) => resolve_unary_operand_source(
                pending.staged.as_ref(),
                pending.just_armed,
                &self.selection,
                &self.history,
                &pending.backup,
            )
            .map(|source| pending.op.apply(&source.pattern)),
        };

        match &mut self.pending {
            PendingState::Idle => {}
            PendingState::BinaryArmed(pending) => pending.preview = preview,
            PendingState::UnaryArmed(pending) => pending.preview = preview,
        }
        self.workspace = preview.unwrap_or(committed);
        log_debug!("Preview {}", if preview.is_some() { "ready" } else { "cleared" });
    }

    /// Keeps only selections that still feed a binary slot.
    fn prune_selection(&mut self) {
        if let PendingState::BinaryArmed(pending) = &self.pending {
            let used =
                resolve_binary_operand_sources(&pending.staging, &self.selection, &self.history)
                    .history_indices();
            self.selection.retain(|index| used.contains(index));
        }
    }

    fn push_workflow(&mut self, action: WorkflowAction, index: usize) {
        self.events.push(WorkspaceEvent::Workflow {
            action,
            index,
            status: self.pending.status(),
            selection: self.selection.clone(),
        });
    }

    fn block_workflow(
        &mut self,
        action: WorkflowAction,
        index: usize,
        message: impl Into<String>,
    ) -> ActionOutcome {
        let message = message.into();
        log_warn!("Blocked workflow click on step {}: {message}", index + 1);
        self.push_workflow(action, index);
        self.notices.push(Notice::warning(message));
        ActionOutcome::Blocked
    }
}

/// Picks the staging slot for an operand added without an explicit slot.
///
/// Workflow selections fill whichever raw slots are empty, A first, so the new
/// operand goes to the next raw slot they leave free. When everything is
/// taken it replaces B.
fn first_free_slot(staging: &BinaryStaging, operands: &BinaryOperands) -> OperandSlot {
    if operands.is_complete() {
        return OperandSlot::B;
    }
    let a_taken = staging.staged_a.is_some() || staging.history_a.is_some();
    let b_taken = staging.staged_b.is_some() || staging.history_b.is_some();
    let raw_count = usize::from(a_taken) + usize::from(b_taken);
    let filled_by_selection = operands.count().saturating_sub(raw_count);

    let free: Vec<OperandSlot> = [(OperandSlot::A, a_taken), (OperandSlot::B, b_taken)]
        .into_iter()
        .filter(|(_, taken)| !taken)
        .map(|(slot, _)| slot)
        .collect();

    free.get(filled_by_selection)
        .copied()
        .unwrap_or(OperandSlot::B)
}
