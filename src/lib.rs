pub mod commands;
pub mod db;
pub mod history;
pub mod notice;
pub mod pattern;
pub mod recorder;
pub mod settings;
pub mod trials;
pub mod utils;
pub mod workspace;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::{self, Instant},
};

use commands::{dispatch, parse_command, UiCommand};
use db::Database;
use settings::SettingsStore;
use trials::{SessionSnapshot, TargetCatalog, TrialSequencer};

const DATA_DIR_ENV: &str = "PATTERNLAB_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "./patternlab-data";

fn emit(snapshot: &SessionSnapshot) -> Result<()> {
    let line = serde_json::to_string(snapshot).context("failed to serialize snapshot")?;
    println!("{line}");
    Ok(())
}

/// Runs the headless driver: JSON commands in on stdin, snapshots out on
/// stdout. An optional first argument carries launch parameters such as
/// `randomize=true`.
pub async fn run() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("PatternLab starting up...");

    let data_dir = std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let settings_store = SettingsStore::new(data_dir.join("settings.json"))?;
    let mut settings = settings_store.settings();
    if let Some(query) = std::env::args().nth(1) {
        settings.apply_query(&query);
    }

    let database = Database::new(data_dir.join("patternlab.sqlite3"))?;

    // Sessions cut short by a crash are kept as they were left.
    match database.recover_checkpoint() {
        Ok(Some(recovered)) => warn!(
            "Recovered unfinished session {} with {} trials",
            recovered.session_id.as_deref().unwrap_or("<unknown>"),
            recovered.trials
        ),
        Ok(None) => {}
        Err(err) => warn!("Failed to recover unfinished session: {err:#}"),
    }

    let mut sequencer =
        TrialSequencer::new(&settings, TargetCatalog::builtin(), database, Utc::now());
    emit(&sequencer.snapshot())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let deadline = sequencer.scheduled_advance().map(|scheduled| {
            let wait = (scheduled.due_at - Utc::now()).to_std().unwrap_or_default();
            Instant::now() + wait
        });

        let command = tokio::select! {
            line = lines.next_line() => {
                match line.context("failed to read command")? {
                    Some(line) if line.trim().is_empty() => continue,
                    Some(line) => match parse_command(&line) {
                        Ok(command) => command,
                        Err(notice) => {
                            let mut snapshot = sequencer.snapshot();
                            snapshot.notices.push(notice);
                            emit(&snapshot)?;
                            continue;
                        }
                    },
                    None => break,
                }
            }
            _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                UiCommand::Tick
            }
        };

        match dispatch(&mut sequencer, command, Utc::now()) {
            Ok(snapshot) => emit(&snapshot)?,
            Err(err) => {
                warn!("Command failed: {err}");
                let mut snapshot = sequencer.snapshot();
                snapshot.notices.push(notice::Notice::warning(err));
                emit(&snapshot)?;
            }
        }
    }

    if sequencer.status() != trials::SequencerStatus::Completed {
        info!("Input closed before the session completed; checkpoint kept for recovery");
    }
    Ok(())
}
