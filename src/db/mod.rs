use std::{
    path::PathBuf,
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use rusqlite::Connection;

mod migrations;
mod repositories;

pub use repositories::sessions::{RecoveredSession, StoredSession};
pub use repositories::storage::{FAVORITES_KEY, SESSIONS_KEY, SESSION_CHECKPOINT_KEY};

use migrations::run_migrations;

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct DatabaseInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(DbCommand::Shutdown) {
                error!("Failed to send shutdown to DB thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join DB thread: {join_err:?}");
            }
        }
    }
}

/// Handle to the SQLite connection owned by a dedicated worker thread.
///
/// Clones share the same worker. Tasks run one at a time in submission order
/// and [`Database::execute`] blocks until its task has finished.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let path_for_thread = db_path.clone();
        let inner = spawn_worker(move || {
            let conn = Connection::open(&path_for_thread)?;
            if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                error!("Failed to enable WAL mode: {err}");
            }
            Ok(conn)
        })?;

        info!("Database initialized at {}", db_path.display());

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// A private database that disappears with the last handle.
    pub fn in_memory() -> Result<Self> {
        let inner = spawn_worker(|| Ok(Connection::open_in_memory()?))?;
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    pub fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = mpsc::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("DB caller dropped before receiving result");
            }
        }));

        self.inner
            .sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to DB thread: {err}"))?;

        reply_rx
            .recv()
            .map_err(|_| anyhow!("database thread terminated unexpectedly"))?
    }
}

fn spawn_worker<F>(open: F) -> Result<DatabaseInner>
where
    F: FnOnce() -> Result<Connection> + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
    let (ready_tx, ready_rx) = mpsc::channel();

    let worker = thread::Builder::new()
        .name("patternlab-db".into())
        .spawn(move || {
            let mut conn = match open().context("failed to open SQLite database") {
                Ok(connection) => connection,
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                    return;
                }
            };

            let init_result =
                run_migrations(&mut conn).context("failed to run database migrations");
            if ready_tx.send(init_result).is_err() {
                error!("DB initialization receiver dropped before ready signal");
                return;
            }

            while let Ok(command) = command_rx.recv() {
                match command {
                    DbCommand::Execute(task) => task(&mut conn),
                    DbCommand::Shutdown => break,
                }
            }

            info!("Database thread shutting down");
        })
        .context("failed to spawn database worker thread")?;

    ready_rx
        .recv()
        .context("database worker exited before signaling readiness")??;

    Ok(DatabaseInner {
        sender: command_tx,
        worker: Mutex::new(Some(worker)),
    })
}
