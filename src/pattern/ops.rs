//! Unary and binary operators over [`Pattern`]s.
//!
//! `union` is a cell-wise AND. The name is what participants saw in the task
//! and what recorded data carries, so it stays even though it computes an
//! intersection.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use super::grid::{Pattern, GRID_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Invert,
    ReflectHorizontal,
    ReflectVertical,
    ReflectDiag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Subtract,
    Union,
}

/// Any operator the participant can arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operator {
    Unary(UnaryOp),
    Binary(BinaryOp),
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 4] = [
        UnaryOp::Invert,
        UnaryOp::ReflectHorizontal,
        UnaryOp::ReflectVertical,
        UnaryOp::ReflectDiag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Invert => "invert",
            UnaryOp::ReflectHorizontal => "reflect_horizontal",
            UnaryOp::ReflectVertical => "reflect_vertical",
            UnaryOp::ReflectDiag => "reflect_diag",
        }
    }

    pub fn apply(&self, pattern: &Pattern) -> Pattern {
        match self {
            UnaryOp::Invert => invert(pattern),
            UnaryOp::ReflectHorizontal => reflect_horizontal(pattern),
            UnaryOp::ReflectVertical => reflect_vertical(pattern),
            UnaryOp::ReflectDiag => reflect_diag(pattern),
        }
    }
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 3] = [BinaryOp::Add, BinaryOp::Subtract, BinaryOp::Union];

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Union => "union",
        }
    }

    pub fn apply(&self, a: &Pattern, b: &Pattern) -> Pattern {
        match self {
            BinaryOp::Add => add(a, b),
            BinaryOp::Subtract => subtract(a, b),
            BinaryOp::Union => union(a, b),
        }
    }
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Unary(op) => op.as_str(),
            Operator::Binary(op) => op.as_str(),
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Operator::Binary(_))
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        if let Some(op) = BinaryOp::ALL.into_iter().find(|op| op.as_str() == value) {
            return Ok(Operator::Binary(op));
        }
        UnaryOp::ALL
            .into_iter()
            .find(|op| op.as_str() == value)
            .map(Operator::Unary)
            .ok_or_else(|| anyhow!("unknown operator '{value}'"))
    }
}

pub fn invert(pattern: &Pattern) -> Pattern {
    Pattern::from_fn(|r, c| !pattern.get(r, c))
}

/// Reverses the row order (top becomes bottom).
pub fn reflect_horizontal(pattern: &Pattern) -> Pattern {
    Pattern::from_fn(|r, c| pattern.get(GRID_SIZE - 1 - r, c))
}

/// Reverses the column order within each row.
pub fn reflect_vertical(pattern: &Pattern) -> Pattern {
    Pattern::from_fn(|r, c| pattern.get(r, GRID_SIZE - 1 - c))
}

/// Transpose.
pub fn reflect_diag(pattern: &Pattern) -> Pattern {
    Pattern::from_fn(|r, c| pattern.get(c, r))
}

pub fn add(a: &Pattern, b: &Pattern) -> Pattern {
    a.zip_with(b, |x, y| x || y)
}

/// Cells set in `a` and clear in `b`.
pub fn subtract(a: &Pattern, b: &Pattern) -> Pattern {
    a.zip_with(b, |x, y| x && !y)
}

pub fn union(a: &Pattern, b: &Pattern) -> Pattern {
    a.zip_with(b, |x, y| x && y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::primitives::{diagonal, line_horizontal, line_vertical, triangle};

    #[test]
    fn union_is_cellwise_and() {
        let cross = union(&line_horizontal(3), &line_vertical(4));
        assert_eq!(cross.count_filled(), 1);
        assert!(cross.get(3, 4));
    }

    #[test]
    fn subtract_removes_overlap_only() {
        let result = subtract(&line_horizontal(0), &line_vertical(0));
        assert!(!result.get(0, 0));
        assert!(result.get(0, 1));
        assert_eq!(result.count_filled(), GRID_SIZE - 1);
    }

    #[test]
    fn reflections_move_cells_where_expected() {
        let corner = Pattern::from_fn(|r, c| r == 0 && c == 1);
        assert!(reflect_horizontal(&corner).get(GRID_SIZE - 1, 1));
        assert!(reflect_vertical(&corner).get(0, GRID_SIZE - 2));
        assert!(reflect_diag(&corner).get(1, 0));
        assert_eq!(reflect_diag(&diagonal()), diagonal());
        assert_ne!(reflect_vertical(&triangle()), triangle());
    }

    #[test]
    fn operator_names_round_trip_through_parse() {
        for op in BinaryOp::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), Operator::Binary(op));
        }
        for op in UnaryOp::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), Operator::Unary(op));
        }
        assert!("intersect".parse::<Operator>().is_err());
    }
}
