//! Property tests for the pattern algebra and the undo stack.

use chrono::Utc;
use patternlab_lib::pattern::{ops, Pattern, Primitive, PrimitiveKind, GRID_SIZE};
use patternlab_lib::workspace::{OperandSource, WorkspaceController};
use proptest::prelude::*;

fn pattern_strategy() -> impl Strategy<Value = Pattern> {
    prop::collection::vec(any::<bool>(), GRID_SIZE * GRID_SIZE)
        .prop_map(|bits| Pattern::from_fn(|r, c| bits[r * GRID_SIZE + c]))
}

fn primitive_strategy() -> impl Strategy<Value = PrimitiveKind> {
    prop::sample::select(PrimitiveKind::ALL.to_vec())
}

fn binary_name_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["add", "subtract", "union"])
}

proptest! {
    #[test]
    fn subtract_self_is_blank(a in pattern_strategy()) {
        prop_assert!(ops::subtract(&a, &a).is_blank());
    }

    #[test]
    fn add_with_inverse_fills_everything(a in pattern_strategy()) {
        prop_assert_eq!(ops::add(&a, &ops::invert(&a)), Pattern::filled());
    }

    #[test]
    fn union_with_inverse_is_blank(a in pattern_strategy()) {
        prop_assert!(ops::union(&a, &ops::invert(&a)).is_blank());
    }

    #[test]
    fn unary_operators_are_involutions(a in pattern_strategy()) {
        prop_assert_eq!(ops::invert(&ops::invert(&a)), a);
        prop_assert_eq!(ops::reflect_horizontal(&ops::reflect_horizontal(&a)), a);
        prop_assert_eq!(ops::reflect_vertical(&ops::reflect_vertical(&a)), a);
        prop_assert_eq!(ops::reflect_diag(&ops::reflect_diag(&a)), a);
    }

    #[test]
    fn arming_twice_restores_the_workspace(
        shapes in prop::collection::vec(primitive_strategy(), 0..4),
        op in binary_name_strategy(),
    ) {
        let mut ws = WorkspaceController::new();
        for kind in shapes {
            ws.arm_operator_by_name("add");
            ws.stage_operand(OperandSource::primitive(&Primitive::new(kind)), None);
            ws.stage_operand(OperandSource::primitive(&Primitive::new(kind)), None);
            ws.confirm(Utc::now());
        }
        let before = *ws.workspace();

        ws.arm_operator_by_name(op);
        ws.arm_operator_by_name(op);

        prop_assert_eq!(*ws.workspace(), before);
        prop_assert!(!ws.pending().is_armed());
    }

    #[test]
    fn undoing_every_commit_returns_to_blank(
        shapes in prop::collection::vec(primitive_strategy(), 0..8),
    ) {
        let mut ws = WorkspaceController::new();
        let mut commits = 0;
        for kind in shapes {
            ws.arm_operator_by_name("invert");
            ws.stage_operand(OperandSource::primitive(&Primitive::new(kind)), None);
            if ws.confirm(Utc::now()).is_applied() {
                commits += 1;
            }
        }
        prop_assert_eq!(ws.history().len(), commits);

        for _ in 0..commits {
            prop_assert!(ws.undo().is_applied());
        }
        prop_assert!(ws.history().is_empty());
        prop_assert!(ws.workspace().is_blank());
        prop_assert!(ws.selection().is_empty());
    }
}
