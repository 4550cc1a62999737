use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use crate::trials::SessionMode;

/// Experiment configuration, stored as `settings.json` in the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperimentSettings {
    pub mode: SessionMode,
    pub points_per_trial: u32,
    pub feedback_delay_ms: u64,
    pub randomize: bool,
    pub shuffle_seed: Option<u64>,
    /// Target names to run, in order. Empty means the whole catalog.
    pub trials: Vec<String>,
}

impl Default for ExperimentSettings {
    fn default() -> Self {
        Self {
            mode: SessionMode::Scored,
            points_per_trial: 10,
            feedback_delay_ms: 1500,
            randomize: false,
            shuffle_seed: None,
            trials: Vec::new(),
        }
    }
}

impl ExperimentSettings {
    /// Applies launch parameters such as `randomize=true&mode=practice`.
    pub fn apply_query(&mut self, query: &str) {
        for (key, value) in query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
        {
            match key {
                "randomize" => self.randomize = value.eq_ignore_ascii_case("true"),
                "mode" => match value.parse() {
                    Ok(mode) => self.mode = mode,
                    Err(err) => log::warn!("Ignoring launch parameter: {err}"),
                },
                _ => {}
            }
        }
    }
}

pub struct SettingsStore {
    data: RwLock<ExperimentSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("Invalid settings in {}: {err}; using defaults", path.display());
                ExperimentSettings::default()
            })
        } else {
            let defaults = ExperimentSettings::default();
            persist(&path, &defaults)?;
            log::info!("Wrote default settings to {}", path.display());
            defaults
        };

        Ok(Self {
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> ExperimentSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

fn persist(path: &Path, data: &ExperimentSettings) -> Result<()> {
    let serialized = serde_json::to_string_pretty(data)?;
    fs::write(path, serialized)
        .with_context(|| format!("Failed to write settings to {}", path.display()))
}
