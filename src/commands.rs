use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notice::{ActionOutcome, Notice};
use crate::trials::{SessionSnapshot, TrialSequencer};
use crate::workspace::OperandSlot;

/// A participant or timer action, as sent by the web view.
///
/// History indices are 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum UiCommand {
    Start,
    ArmOperator {
        op: String,
    },
    ApplyPrimitive {
        primitive: String,
        #[serde(default)]
        param: Option<usize>,
        #[serde(default)]
        slot: Option<OperandSlot>,
    },
    UseFavorite {
        id: String,
        #[serde(default)]
        slot: Option<OperandSlot>,
    },
    SelectHistory {
        index: usize,
    },
    BindHistory {
        slot: OperandSlot,
        index: usize,
    },
    Confirm,
    CancelPending,
    Undo,
    ResetHistory,
    AddFavorite {
        index: usize,
    },
    RemoveFavorite {
        id: String,
    },
    Submit,
    Advance,
    Tick,
    Snapshot,
}

impl UiCommand {
    /// Button name recorded in the trial's click log.
    pub fn name(&self) -> &'static str {
        match self {
            UiCommand::Start => "start",
            UiCommand::ArmOperator { .. } => "arm_operator",
            UiCommand::ApplyPrimitive { .. } => "apply_primitive",
            UiCommand::UseFavorite { .. } => "use_favorite",
            UiCommand::SelectHistory { .. } => "select_history",
            UiCommand::BindHistory { .. } => "bind_history",
            UiCommand::Confirm => "confirm",
            UiCommand::CancelPending => "cancel_pending",
            UiCommand::Undo => "undo",
            UiCommand::ResetHistory => "reset_history",
            UiCommand::AddFavorite { .. } => "add_favorite",
            UiCommand::RemoveFavorite { .. } => "remove_favorite",
            UiCommand::Submit => "submit",
            UiCommand::Advance => "advance",
            UiCommand::Tick => "tick",
            UiCommand::Snapshot => "snapshot",
        }
    }

    /// Timer and polling commands are not participant clicks.
    fn is_click(&self) -> bool {
        !matches!(self, UiCommand::Tick | UiCommand::Snapshot)
    }
}

/// Applies one command and returns the resulting snapshot.
pub fn dispatch(
    sequencer: &mut TrialSequencer,
    command: UiCommand,
    now: DateTime<Utc>,
) -> Result<SessionSnapshot, String> {
    let button = command.name();
    let is_click = command.is_click();

    let outcome = match command {
        UiCommand::Start => sequencer.start(now),
        UiCommand::ArmOperator { op } => sequencer.arm_operator(&op, now),
        UiCommand::ApplyPrimitive {
            primitive,
            param,
            slot,
        } => sequencer.apply_primitive(&primitive, param, slot, now),
        UiCommand::UseFavorite { id, slot } => sequencer.use_favorite(&id, slot, now),
        UiCommand::SelectHistory { index } => sequencer.toggle_history(index, now),
        UiCommand::BindHistory { slot, index } => sequencer.bind_history(slot, index, now),
        UiCommand::Confirm => sequencer.confirm(now),
        UiCommand::CancelPending => sequencer.cancel_pending(now),
        UiCommand::Undo => sequencer.undo(now),
        UiCommand::ResetHistory => sequencer.reset_history(now),
        UiCommand::AddFavorite { index } => sequencer.add_favorite(index, now),
        UiCommand::RemoveFavorite { id } => sequencer.remove_favorite(&id, now),
        UiCommand::Submit => match sequencer.submit(now) {
            Some(_) => ActionOutcome::Applied,
            None => ActionOutcome::Ignored,
        },
        UiCommand::Advance => sequencer.advance(now),
        UiCommand::Tick => {
            sequencer.tick(now);
            ActionOutcome::Applied
        }
        UiCommand::Snapshot => ActionOutcome::Applied,
    };

    if is_click {
        sequencer.record_button(button, outcome, now);
    }
    Ok(sequencer.snapshot())
}

/// Decodes one JSON command line. Malformed input becomes a warning notice
/// rather than a failure of the loop.
pub fn parse_command(line: &str) -> Result<UiCommand, Notice> {
    serde_json::from_str(line).map_err(|err| {
        log::warn!("Ignoring malformed command {line:?}: {err}");
        Notice::warning(format!("Unrecognised command: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_decode_from_tagged_json() {
        let command: UiCommand =
            serde_json::from_str(r#"{"command":"applyPrimitive","primitive":"line_vertical","param":2}"#)
                .unwrap();
        assert_eq!(
            command,
            UiCommand::ApplyPrimitive {
                primitive: "line_vertical".into(),
                param: Some(2),
                slot: None,
            }
        );

        let command: UiCommand =
            serde_json::from_str(r#"{"command":"bindHistory","slot":"b","index":0}"#).unwrap();
        assert_eq!(
            command,
            UiCommand::BindHistory {
                slot: OperandSlot::B,
                index: 0
            }
        );
        assert_eq!(parse_command(r#"{"command":"confirm"}"#), Ok(UiCommand::Confirm));
    }

    #[test]
    fn malformed_lines_become_notices() {
        let notice = parse_command(r#"{"command":"explode"}"#).unwrap_err();
        assert!(notice.message.starts_with("Unrecognised command"));
    }
}
