//! Canonical shapes the participant can drop into an operand slot.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

use super::grid::{Pattern, GRID_SIZE};

/// Row (or column) used by the line primitives when no parameter is given.
pub const DEFAULT_LINE_INDEX: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Blank,
    LineHorizontal,
    LineVertical,
    Diagonal,
    SquareBorder,
    Triangle,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 6] = [
        PrimitiveKind::Blank,
        PrimitiveKind::LineHorizontal,
        PrimitiveKind::LineVertical,
        PrimitiveKind::Diagonal,
        PrimitiveKind::SquareBorder,
        PrimitiveKind::Triangle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::Blank => "blank",
            PrimitiveKind::LineHorizontal => "line_horizontal",
            PrimitiveKind::LineVertical => "line_vertical",
            PrimitiveKind::Diagonal => "diagonal",
            PrimitiveKind::SquareBorder => "square_border",
            PrimitiveKind::Triangle => "triangle",
        }
    }

    pub fn takes_parameter(&self) -> bool {
        matches!(
            self,
            PrimitiveKind::LineHorizontal | PrimitiveKind::LineVertical
        )
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| anyhow!("unknown primitive '{value}'"))
    }
}

/// A primitive plus its optional line index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Primitive {
    pub kind: PrimitiveKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<usize>,
}

impl Primitive {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self { kind, param: None }
    }

    pub fn with_param(kind: PrimitiveKind, param: usize) -> Result<Self> {
        if !kind.takes_parameter() {
            bail!("primitive '{kind}' takes no parameter");
        }
        if param >= GRID_SIZE {
            bail!("line index {param} is outside the {GRID_SIZE}x{GRID_SIZE} grid");
        }
        Ok(Self {
            kind,
            param: Some(param),
        })
    }

    /// Display name used as the operand's provenance tag, e.g. `line_vertical(2)`.
    pub fn label(&self) -> String {
        match self.param {
            Some(param) if self.kind.takes_parameter() => format!("{}({param})", self.kind),
            _ => self.kind.to_string(),
        }
    }

    pub fn generate(&self) -> Pattern {
        let index = self
            .param
            .unwrap_or(DEFAULT_LINE_INDEX)
            .min(GRID_SIZE - 1);
        match self.kind {
            PrimitiveKind::Blank => Pattern::blank(),
            PrimitiveKind::LineHorizontal => line_horizontal(index),
            PrimitiveKind::LineVertical => line_vertical(index),
            PrimitiveKind::Diagonal => diagonal(),
            PrimitiveKind::SquareBorder => square_border(),
            PrimitiveKind::Triangle => triangle(),
        }
    }
}

pub fn line_horizontal(row: usize) -> Pattern {
    Pattern::from_fn(|r, _| r == row)
}

pub fn line_vertical(col: usize) -> Pattern {
    Pattern::from_fn(|_, c| c == col)
}

/// Main diagonal, top-left to bottom-right.
pub fn diagonal() -> Pattern {
    Pattern::from_fn(|r, c| r == c)
}

pub fn square_border() -> Pattern {
    let last = GRID_SIZE - 1;
    Pattern::from_fn(|r, c| r == 0 || c == 0 || r == last || c == last)
}

/// Lower-left triangle including the diagonal.
pub fn triangle() -> Pattern {
    Pattern::from_fn(|r, c| c <= r)
}
