//! Pure operand resolution for the armed operation.
//!
//! Binary slots are filled in precedence order: staged ephemeral operands
//! (primitives, favorites), then history indices bound to a slot, then
//! workflow selections in click order. A lone operand always lands in slot A.
//!
//! A unary operand is the staged source if there is one. Right after arming
//! nothing else counts; after that the chain is first selection, latest
//! history entry, committed workspace, blank.

use crate::history::OperationHistory;
use crate::pattern::Pattern;

use super::operand::OperandSource;
use super::state::BinaryStaging;

pub const ORIGIN_BOUND: &str = "history_binding";
pub const ORIGIN_SELECTION: &str = "workflow_selection";
pub const ORIGIN_IMPLICIT_LAST: &str = "implicit_last";
pub const ORIGIN_WORKSPACE: &str = "workspace";
pub const ORIGIN_BLANK: &str = "blank_fallback";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinaryOperands {
    pub a: Option<OperandSource>,
    pub b: Option<OperandSource>,
}

impl BinaryOperands {
    pub fn count(&self) -> usize {
        usize::from(self.a.is_some()) + usize::from(self.b.is_some())
    }

    pub fn is_complete(&self) -> bool {
        self.count() == 2
    }

    pub fn both(&self) -> Option<(&OperandSource, &OperandSource)> {
        match (&self.a, &self.b) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    /// History indices currently feeding either slot.
    pub fn history_indices(&self) -> Vec<usize> {
        [&self.a, &self.b]
            .into_iter()
            .flatten()
            .filter_map(OperandSource::history_index)
            .collect()
    }
}

pub fn resolve_binary_operand_sources(
    staging: &BinaryStaging,
    selection: &[usize],
    history: &OperationHistory,
) -> BinaryOperands {
    let from_history = |index: usize, origin: &str| {
        history
            .get(index)
            .map(|entry| OperandSource::history(index, entry, origin))
    };

    let mut a = staging
        .staged_a
        .clone()
        .or_else(|| staging.history_a.and_then(|index| from_history(index, ORIGIN_BOUND)));
    let mut b = staging
        .staged_b
        .clone()
        .or_else(|| staging.history_b.and_then(|index| from_history(index, ORIGIN_BOUND)));

    let mut used: Vec<usize> = [&a, &b]
        .into_iter()
        .flatten()
        .filter_map(OperandSource::history_index)
        .collect();

    for &index in selection {
        if a.is_some() && b.is_some() {
            break;
        }
        if used.contains(&index) {
            continue;
        }
        let Some(source) = from_history(index, ORIGIN_SELECTION) else {
            continue;
        };
        used.push(index);
        if a.is_none() {
            a = Some(source);
        } else {
            b = Some(source);
        }
    }

    if a.is_none() {
        a = b.take();
    }

    BinaryOperands { a, b }
}

pub fn resolve_unary_operand_source(
    staged: Option<&OperandSource>,
    just_armed: bool,
    selection: &[usize],
    history: &OperationHistory,
    committed_workspace: &Pattern,
) -> Option<OperandSource> {
    if let Some(source) = staged {
        return Some(source.clone());
    }
    if just_armed {
        return None;
    }

    if let Some(source) = selection.first().and_then(|&index| {
        history
            .get(index)
            .map(|entry| OperandSource::history(index, entry, ORIGIN_SELECTION))
    }) {
        return Some(source);
    }

    if let Some(entry) = history.last() {
        return Some(OperandSource::history(
            history.len() - 1,
            entry,
            ORIGIN_IMPLICIT_LAST,
        ));
    }

    if !committed_workspace.is_blank() {
        return Some(OperandSource::workspace(*committed_workspace, ORIGIN_WORKSPACE));
    }

    Some(OperandSource::workspace(Pattern::blank(), ORIGIN_BLANK))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::history::HistoryEntry;
    use crate::pattern::{primitives, Operator, Primitive, PrimitiveKind, UnaryOp};
    use crate::workspace::operand::OperandKind;
    use crate::workspace::state::OperandSlot;

    fn history_of(patterns: &[Pattern]) -> OperationHistory {
        let mut history = OperationHistory::new();
        for pattern in patterns {
            history.push(HistoryEntry::new(
                Operator::Unary(UnaryOp::Invert),
                vec![OperandSource::workspace(*pattern, "test")],
                *pattern,
                Utc::now(),
            ));
        }
        history
    }

    #[test]
    fn lone_operand_staged_in_b_moves_to_a() {
        let mut staging = BinaryStaging::default();
        staging.set_staged(
            OperandSlot::B,
            OperandSource::primitive(&Primitive::new(PrimitiveKind::Diagonal)),
        );

        let operands = resolve_binary_operand_sources(&staging, &[], &OperationHistory::new());
        assert_eq!(operands.count(), 1);
        assert_eq!(operands.a.unwrap().pattern, primitives::diagonal());
        assert!(operands.b.is_none());
    }

    #[test]
    fn lone_bound_history_in_b_moves_to_a() {
        let history = history_of(&[primitives::triangle()]);
        let mut staging = BinaryStaging::default();
        staging.bind_history(OperandSlot::B, 0);

        let operands = resolve_binary_operand_sources(&staging, &[], &history);
        let a = operands.a.unwrap();
        assert_eq!(a.kind, OperandKind::History);
        assert_eq!(a.index, Some(0));
        assert!(operands.b.is_none());
    }

    #[test]
    fn selections_fill_empty_slots_in_click_order() {
        let history = history_of(&[
            primitives::triangle(),
            primitives::diagonal(),
            primitives::square_border(),
        ]);
        let operands =
            resolve_binary_operand_sources(&BinaryStaging::default(), &[2, 0], &history);
        assert_eq!(operands.a.as_ref().unwrap().index, Some(2));
        assert_eq!(operands.b.as_ref().unwrap().index, Some(0));
        assert_eq!(operands.history_indices(), vec![2, 0]);
    }

    #[test]
    fn staged_operand_takes_precedence_over_selection() {
        let history = history_of(&[primitives::triangle()]);
        let mut staging = BinaryStaging::default();
        staging.set_staged(OperandSlot::A, OperandSource::default_blank());

        let operands = resolve_binary_operand_sources(&staging, &[0], &history);
        assert_eq!(operands.a.unwrap().origin, "default_blank");
        assert_eq!(operands.b.unwrap().index, Some(0));
    }

    #[test]
    fn selection_already_bound_is_not_reused() {
        let history = history_of(&[primitives::triangle(), primitives::diagonal()]);
        let mut staging = BinaryStaging::default();
        staging.bind_history(OperandSlot::A, 0);

        let operands = resolve_binary_operand_sources(&staging, &[0], &history);
        assert_eq!(operands.count(), 1);
    }

    #[test]
    fn unary_returns_nothing_right_after_arming() {
        let history = history_of(&[primitives::triangle()]);
        let resolved =
            resolve_unary_operand_source(None, true, &[0], &history, &primitives::triangle());
        assert!(resolved.is_none());
    }

    #[test]
    fn unary_fallback_chain() {
        let history = history_of(&[primitives::triangle(), primitives::diagonal()]);

        let selected = resolve_unary_operand_source(None, false, &[0], &history, &Pattern::blank())
            .unwrap();
        assert_eq!(selected.origin, ORIGIN_SELECTION);
        assert_eq!(selected.index, Some(0));

        let implicit =
            resolve_unary_operand_source(None, false, &[], &history, &Pattern::blank()).unwrap();
        assert_eq!(implicit.origin, ORIGIN_IMPLICIT_LAST);
        assert_eq!(implicit.index, Some(1));

        let empty = OperationHistory::new();
        let workspace = resolve_unary_operand_source(
            None,
            false,
            &[],
            &empty,
            &primitives::square_border(),
        )
        .unwrap();
        assert_eq!(workspace.kind, OperandKind::Workspace);
        assert_eq!(workspace.pattern, primitives::square_border());

        let blank =
            resolve_unary_operand_source(None, false, &[], &empty, &Pattern::blank()).unwrap();
        assert_eq!(blank.origin, ORIGIN_BLANK);
        assert!(blank.pattern.is_blank());
    }
}
