//! Full session scenarios driven through the command surface.

use chrono::{Duration, Utc};
use patternlab_lib::commands::{dispatch, parse_command};
use patternlab_lib::db::Database;
use patternlab_lib::notice::NoticeLevel;
use patternlab_lib::pattern::{ops, primitives, Operator, UnaryOp};
use patternlab_lib::settings::ExperimentSettings;
use patternlab_lib::trials::{SequencerStatus, SessionMode, SessionSnapshot, TargetCatalog, TrialSequencer};
use patternlab_lib::workspace::PendingStatus;

fn sequencer_with(db: Database, trials: &[&str], mode: SessionMode) -> TrialSequencer {
    let settings = ExperimentSettings {
        mode,
        trials: trials.iter().map(|name| name.to_string()).collect(),
        ..ExperimentSettings::default()
    };
    TrialSequencer::new(&settings, TargetCatalog::builtin(), db, Utc::now())
}

fn started(trials: &[&str]) -> TrialSequencer {
    let mut seq = sequencer_with(Database::in_memory().unwrap(), trials, SessionMode::Scored);
    send(&mut seq, r#"{"command":"start"}"#);
    seq
}

fn send(seq: &mut TrialSequencer, line: &str) -> SessionSnapshot {
    let command = parse_command(line).unwrap();
    dispatch(seq, command, Utc::now()).unwrap()
}

/// Commits `add(_, primitive)` on top of whatever is armed after load or idle.
fn commit_shape(seq: &mut TrialSequencer, primitive: &str) -> SessionSnapshot {
    if seq.workspace().status() == PendingStatus::Idle {
        send(seq, r#"{"command":"armOperator","op":"add"}"#);
        send(seq, r#"{"command":"applyPrimitive","primitive":"blank"}"#);
    }
    send(
        seq,
        &format!(r#"{{"command":"applyPrimitive","primitive":"{primitive}"}}"#),
    );
    send(seq, r#"{"command":"confirm"}"#)
}

#[test]
fn horizontal_line_scores_once() {
    let mut seq = started(&["horizontal_line"]);

    let armed = send(&mut seq, r#"{"command":"armOperator","op":"add"}"#);
    assert_eq!(armed.pending.status, PendingStatus::BinaryArmed);
    send(&mut seq, r#"{"command":"applyPrimitive","primitive":"line_horizontal"}"#);
    let snapshot = send(&mut seq, r#"{"command":"confirm"}"#);
    assert_eq!(Some(snapshot.workspace), snapshot.target);
    assert_eq!(snapshot.history[0].operation, "add(_, _)");
    assert_eq!(snapshot.selection, vec![0]);

    let first = send(&mut seq, r#"{"command":"submit"}"#);
    assert_eq!(first.score, 10);
    assert_eq!(first.status, SequencerStatus::Submitted);
    assert!(first.advance_due_at.is_some());

    let second = send(&mut seq, r#"{"command":"submit"}"#);
    assert_eq!(second.score, 10);

    let record = seq.active_trial().unwrap();
    assert!(record.success);
    assert_eq!(record.submissions.len(), 2);
    assert_eq!(record.steps.len(), 1);
    assert_eq!(
        record
            .button_clicks
            .iter()
            .filter(|click| click.button == "submit")
            .count(),
        2
    );
}

#[test]
fn subtract_binds_history_entries_in_click_order() {
    let mut seq = started(&["frame"]);
    commit_shape(&mut seq, "square_border");
    commit_shape(&mut seq, "diagonal");

    send(&mut seq, r#"{"command":"armOperator","op":"subtract"}"#);
    send(&mut seq, r#"{"command":"selectHistory","index":0}"#);
    let armed = send(&mut seq, r#"{"command":"selectHistory","index":1}"#);
    assert!(armed.pending.can_confirm);

    let snapshot = send(&mut seq, r#"{"command":"confirm"}"#);
    let history = &snapshot.history;
    assert_eq!(history.len(), 3);
    assert_eq!(history[2].operation, "subtract(1, 2)");
    assert_eq!(
        history[2].pattern,
        ops::subtract(&history[0].pattern, &history[1].pattern)
    );
    assert_eq!(snapshot.selection, vec![2]);
    assert_eq!(snapshot.pending.status, PendingStatus::Idle);
}

#[test]
fn third_operand_click_is_blocked_and_logged() {
    let mut seq = started(&["frame"]);
    commit_shape(&mut seq, "square_border");
    commit_shape(&mut seq, "diagonal");
    commit_shape(&mut seq, "triangle");

    send(&mut seq, r#"{"command":"armOperator","op":"union"}"#);
    send(&mut seq, r#"{"command":"selectHistory","index":0}"#);
    send(&mut seq, r#"{"command":"selectHistory","index":1}"#);
    let snapshot = send(&mut seq, r#"{"command":"selectHistory","index":2}"#);

    assert_eq!(snapshot.selection, vec![0, 1]);
    assert_eq!(snapshot.history.len(), 3);
    assert!(snapshot
        .notices
        .iter()
        .any(|notice| notice.level == NoticeLevel::Warning));
    assert_eq!(seq.active_trial().unwrap().blocked_interactions(), 1);
}

#[test]
fn deselecting_a_locked_operand_is_blocked() {
    let mut seq = started(&["frame"]);
    commit_shape(&mut seq, "square_border");

    send(&mut seq, r#"{"command":"armOperator","op":"add"}"#);
    send(&mut seq, r#"{"command":"selectHistory","index":0}"#);
    let snapshot = send(&mut seq, r#"{"command":"selectHistory","index":0}"#);

    assert_eq!(snapshot.selection, vec![0]);
    assert_eq!(seq.active_trial().unwrap().blocked_interactions(), 1);
}

#[test]
fn equal_patterns_are_favorited_once() {
    let mut seq = started(&["horizontal_line"]);
    send(&mut seq, r#"{"command":"applyPrimitive","primitive":"line_horizontal"}"#);
    send(&mut seq, r#"{"command":"confirm"}"#);

    // Mirroring left-right leaves a horizontal line unchanged.
    send(&mut seq, r#"{"command":"armOperator","op":"reflect_vertical"}"#);
    send(&mut seq, r#"{"command":"selectHistory","index":0}"#);
    let snapshot = send(&mut seq, r#"{"command":"confirm"}"#);
    assert_eq!(snapshot.history[1].operation, "reflect_vertical(1)");
    assert_eq!(snapshot.history[0].pattern, snapshot.history[1].pattern);

    send(&mut seq, r#"{"command":"addFavorite","index":0}"#);
    let snapshot = send(&mut seq, r#"{"command":"addFavorite","index":1}"#);

    assert_eq!(snapshot.favorites.len(), 1);
    assert!(snapshot.history.iter().all(|item| item.favorited));
    assert_eq!(seq.active_trial().unwrap().favorite_actions.len(), 2);
}

#[test]
fn favorite_operands_mark_the_step_as_helped() {
    let mut seq = started(&["horizontal_line"]);
    send(&mut seq, r#"{"command":"applyPrimitive","primitive":"diagonal"}"#);
    send(&mut seq, r#"{"command":"confirm"}"#);
    let snapshot = send(&mut seq, r#"{"command":"addFavorite","index":0}"#);
    let id = snapshot.favorites[0].id.clone();

    send(&mut seq, r#"{"command":"armOperator","op":"invert"}"#);
    send(
        &mut seq,
        &format!(r#"{{"command":"useFavorite","id":"{id}"}}"#),
    );
    let snapshot = send(&mut seq, r#"{"command":"confirm"}"#);

    assert_eq!(snapshot.history[1].pattern, ops::invert(&primitives::diagonal()));
    assert_eq!(snapshot.history[1].op_fn, Operator::Unary(UnaryOp::Invert));
    let record = seq.active_trial().unwrap();
    assert!(record.steps[1].helper_used);
    assert!(!record.steps[0].helper_used);

    let snapshot = send(
        &mut seq,
        &format!(r#"{{"command":"removeFavorite","id":"{id}"}}"#),
    );
    assert!(snapshot.favorites.is_empty());
}

#[test]
fn unary_confirm_without_operand_changes_nothing() {
    let mut seq = started(&["horizontal_line"]);

    let armed = send(&mut seq, r#"{"command":"armOperator","op":"invert"}"#);
    assert_eq!(armed.pending.status, PendingStatus::UnaryArmed);
    assert_eq!(armed.preview, None);

    let snapshot = send(&mut seq, r#"{"command":"confirm"}"#);
    assert!(snapshot.history.is_empty());
    assert!(snapshot.workspace.is_blank());
    assert_eq!(snapshot.pending.status, PendingStatus::UnaryArmed);
    assert!(snapshot
        .notices
        .iter()
        .any(|notice| notice.level == NoticeLevel::Warning));
}

#[test]
fn unknown_operator_leaves_the_armed_state_alone() {
    let mut seq = started(&["horizontal_line"]);
    let snapshot = send(&mut seq, r#"{"command":"armOperator","op":"spin"}"#);

    assert_eq!(snapshot.pending.status, PendingStatus::BinaryArmed);
    assert_eq!(snapshot.notices.len(), 1);
    assert_eq!(seq.active_trial().unwrap().operation_log.len(), 1);
}

#[test]
fn unknown_primitive_is_logged_as_a_rejected_click() {
    let mut seq = started(&["horizontal_line"]);
    let before = seq.workspace().pending().clone();

    let snapshot = send(&mut seq, r#"{"command":"applyPrimitive","primitive":"circle"}"#);
    assert_eq!(seq.workspace().pending(), &before);
    assert!(snapshot
        .notices
        .iter()
        .any(|notice| notice.level == NoticeLevel::Warning && notice.message.contains("circle")));

    let record = seq.active_trial().unwrap();
    let click = record.button_clicks.last().unwrap();
    assert_eq!(click.button, "apply_primitive");
    assert_eq!(click.outcome, "rejected");
    assert_eq!(record.operation_log.len(), 1);
    assert!(record.operation_log[0]
        .detail
        .as_deref()
        .is_some_and(|detail| detail.contains("circle")));
}

#[test]
fn session_runs_to_completion_and_is_stored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patternlab.sqlite3");
    let start = Utc::now();

    {
        let db = Database::new(path.clone()).unwrap();
        let mut seq = sequencer_with(db, &["horizontal_line", "cross"], SessionMode::Scored);
        send(&mut seq, r#"{"command":"start"}"#);

        send(&mut seq, r#"{"command":"applyPrimitive","primitive":"line_horizontal"}"#);
        send(&mut seq, r#"{"command":"confirm"}"#);
        send(&mut seq, r#"{"command":"addFavorite","index":0}"#);
        send(&mut seq, r#"{"command":"submit"}"#);

        let later = start + Duration::seconds(10);
        let snapshot = dispatch(&mut seq, parse_command(r#"{"command":"tick"}"#).unwrap(), later).unwrap();
        assert_eq!(snapshot.target_name.as_deref(), Some("cross"));
        assert!(snapshot.history.is_empty());
        assert_eq!(snapshot.favorites.len(), 1);

        send(&mut seq, r#"{"command":"applyPrimitive","primitive":"line_horizontal"}"#);
        send(&mut seq, r#"{"command":"confirm"}"#);
        send(&mut seq, r#"{"command":"armOperator","op":"add"}"#);
        send(&mut seq, r#"{"command":"selectHistory","index":0}"#);
        send(&mut seq, r#"{"command":"applyPrimitive","primitive":"line_vertical"}"#);
        send(&mut seq, r#"{"command":"confirm"}"#);
        let solved = send(&mut seq, r#"{"command":"submit"}"#);
        assert_eq!(solved.score, 20);

        let done = send(&mut seq, r#"{"command":"advance"}"#);
        assert_eq!(done.status, SequencerStatus::Completed);
        let summary = done.summary.unwrap();
        assert_eq!(summary.successful_trials, 2);
        assert_eq!(summary.trials[1].steps, 2);
    }

    let db = Database::new(path).unwrap();
    assert_eq!(db.load_favorites().unwrap().len(), 1);
    let sessions = db.load_sessions().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].len(), 3);
    assert_eq!(db.load_checkpoint().unwrap(), None);
}

#[test]
fn unfinished_session_is_recovered_on_next_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patternlab.sqlite3");

    {
        let db = Database::new(path.clone()).unwrap();
        let mut seq = sequencer_with(db, &["horizontal_line", "cross"], SessionMode::Tutorial);
        send(&mut seq, r#"{"command":"start"}"#);
        send(&mut seq, r#"{"command":"applyPrimitive","primitive":"line_horizontal"}"#);
        send(&mut seq, r#"{"command":"confirm"}"#);
        send(&mut seq, r#"{"command":"submit"}"#);
        send(&mut seq, r#"{"command":"advance"}"#);
    }

    let db = Database::new(path).unwrap();
    let recovered = db.recover_checkpoint().unwrap().unwrap();
    assert_eq!(recovered.trials, 1);
    assert_eq!(db.load_sessions().unwrap().len(), 1);
}
