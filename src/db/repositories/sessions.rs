use anyhow::{Context, Result};
use log::warn;

use crate::db::{
    repositories::storage::{delete_raw, read_raw, write_raw, CORRUPT_CHECKPOINT_KEY},
    Database, SESSIONS_KEY, SESSION_CHECKPOINT_KEY,
};
use crate::recorder::SessionLogEntry;

/// One stored session: its metadata header followed by its trial records.
pub type StoredSession = Vec<SessionLogEntry>;

/// A checkpoint left behind by a run that never reached completion.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveredSession {
    pub session_id: Option<String>,
    pub trials: usize,
}

fn summarize(session: &StoredSession) -> RecoveredSession {
    let session_id = session.iter().find_map(|entry| match entry {
        SessionLogEntry::Metadata(meta) => Some(meta.session_id.clone()),
        SessionLogEntry::Trial(_) => None,
    });
    let trials = session
        .iter()
        .filter(|entry| matches!(entry, SessionLogEntry::Trial(_)))
        .count();
    RecoveredSession { session_id, trials }
}

fn decode_sessions(raw: Option<String>) -> Result<Vec<serde_json::Value>> {
    match raw {
        Some(value) => serde_json::from_str(&value).context("stored sessions are malformed"),
        None => Ok(Vec::new()),
    }
}

impl Database {
    pub fn load_sessions(&self) -> Result<Vec<StoredSession>> {
        Ok(self.read_json(SESSIONS_KEY)?.unwrap_or_default())
    }

    /// Appends a finished session and drops the checkpoint in one transaction.
    /// Earlier sessions are carried over untouched.
    pub fn append_session(&self, session: &[SessionLogEntry]) -> Result<()> {
        let entry = serde_json::to_value(session).context("failed to serialize session log")?;
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            let mut sessions = decode_sessions(read_raw(&tx, SESSIONS_KEY)?)?;
            sessions.push(entry);
            write_raw(&tx, SESSIONS_KEY, &serde_json::to_string(&sessions)?)?;
            delete_raw(&tx, SESSION_CHECKPOINT_KEY)?;
            tx.commit().context("failed to commit session append")?;
            Ok(())
        })
    }

    pub fn save_checkpoint(&self, session: &[SessionLogEntry]) -> Result<()> {
        self.write_json(SESSION_CHECKPOINT_KEY, session)
    }

    pub fn load_checkpoint(&self) -> Result<Option<StoredSession>> {
        self.read_json(SESSION_CHECKPOINT_KEY)
    }

    /// Moves a leftover checkpoint into the session list, as-is. A checkpoint
    /// that no longer decodes is moved under [`CORRUPT_CHECKPOINT_KEY`] so the
    /// next start is not blocked by it.
    pub fn recover_checkpoint(&self) -> Result<Option<RecoveredSession>> {
        let Some(raw) = self.execute(|conn| read_raw(conn, SESSION_CHECKPOINT_KEY))? else {
            return Ok(None);
        };

        let checkpoint: StoredSession = match serde_json::from_str(&raw) {
            Ok(checkpoint) => checkpoint,
            Err(err) => {
                warn!("Setting aside unreadable session checkpoint: {err}");
                self.set_aside_checkpoint(raw)?;
                return Ok(None);
            }
        };

        let recovered = summarize(&checkpoint);
        self.append_session(&checkpoint)?;
        Ok(Some(recovered))
    }

    fn set_aside_checkpoint(&self, raw: String) -> Result<()> {
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            write_raw(&tx, CORRUPT_CHECKPOINT_KEY, &raw)?;
            delete_raw(&tx, SESSION_CHECKPOINT_KEY)?;
            tx.commit().context("failed to set aside session checkpoint")?;
            Ok(())
        })
    }
}
