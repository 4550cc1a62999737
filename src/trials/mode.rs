use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// How a session treats submissions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionMode {
    /// Points are awarded and the next trial loads after the feedback delay.
    Scored,
    /// No points; trials still advance on their own.
    Practice,
    /// No points, hints are shown and the participant advances manually.
    Tutorial,
}

impl Default for SessionMode {
    fn default() -> Self {
        SessionMode::Scored
    }
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Scored => "scored",
            SessionMode::Practice => "practice",
            SessionMode::Tutorial => "tutorial",
        }
    }

    pub fn awards_points(&self) -> bool {
        matches!(self, SessionMode::Scored)
    }

    pub fn auto_advances(&self) -> bool {
        !matches!(self, SessionMode::Tutorial)
    }

    pub fn shows_hints(&self) -> bool {
        matches!(self, SessionMode::Tutorial)
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "scored" => Ok(SessionMode::Scored),
            "practice" => Ok(SessionMode::Practice),
            "tutorial" => Ok(SessionMode::Tutorial),
            other => Err(anyhow!("unknown session mode '{other}'")),
        }
    }
}
