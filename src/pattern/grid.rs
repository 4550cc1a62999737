use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Side length of every grid in the task.
pub const GRID_SIZE: usize = 10;

pub type Cells = [[u8; GRID_SIZE]; GRID_SIZE];

/// A fixed-size binary grid, row-major. Cells are always `0` or `1`.
///
/// Patterns are values: operators take `&Pattern` and return a fresh one, so a
/// result never aliases its inputs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Pattern {
    cells: Cells,
}

impl Pattern {
    pub fn blank() -> Self {
        Self {
            cells: [[0; GRID_SIZE]; GRID_SIZE],
        }
    }

    pub fn filled() -> Self {
        Self {
            cells: [[1; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Builds a pattern cell by cell from a predicate over `(row, col)`.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut cells = [[0; GRID_SIZE]; GRID_SIZE];
        for (r, row) in cells.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = u8::from(f(r, c));
            }
        }
        Self { cells }
    }

    /// Decodes externally supplied rows; anything that is not a 10x10 grid of
    /// 0/1 values is rejected.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        if rows.len() != GRID_SIZE {
            bail!("expected {GRID_SIZE} rows, got {}", rows.len());
        }
        let mut cells = [[0; GRID_SIZE]; GRID_SIZE];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != GRID_SIZE {
                bail!("row {r} has {} cells, expected {GRID_SIZE}", row.len());
            }
            for (c, &value) in row.iter().enumerate() {
                if value > 1 {
                    bail!("cell ({r}, {c}) holds {value}; cells must be 0 or 1");
                }
                cells[r][c] = value;
            }
        }
        Ok(Self { cells })
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row][col] == 1
    }

    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells.iter().map(|row| row.to_vec()).collect()
    }

    pub fn count_filled(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| cell == 1)
            .count()
    }

    pub fn is_blank(&self) -> bool {
        self.count_filled() == 0
    }

    /// Combines two patterns cell by cell.
    pub(crate) fn zip_with(&self, other: &Pattern, f: impl Fn(bool, bool) -> bool) -> Pattern {
        Pattern::from_fn(|r, c| f(self.get(r, c), other.get(r, c)))
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::blank()
    }
}

impl TryFrom<Vec<Vec<u8>>> for Pattern {
    type Error = anyhow::Error;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self> {
        Pattern::from_rows(&rows)
    }
}

impl From<Pattern> for Vec<Vec<u8>> {
    fn from(pattern: Pattern) -> Self {
        pattern.to_rows()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pattern(")?;
        for row in &self.cells {
            let line: String = row
                .iter()
                .map(|&cell| if cell == 1 { '#' } else { '.' })
                .collect();
            writeln!(f, "  {line}")?;
        }
        write!(f, ")")
    }
}
