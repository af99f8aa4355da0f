//! Periodic table grid
//!
//! 10 rows x 18 columns: periods 1-7, a spacer row, then the
//! lanthanide and actinide series pulled out below the main body.

use crate::consts::ELEMENT_COUNT;

pub const ROWS: usize = 10;
pub const COLUMNS: usize = 18;

/// Column headers
pub const FAMILY_LABELS: [&str; COLUMNS] = [
    "1A", "2A", "3B", "4B", "5B", "6B", "7B", "8B", "8B", "8B", "1B", "2B", "3A", "4A", "5A", "6A",
    "7A", "8A",
];

/// 0 = gap, 1 = element, 2 = series placeholder
const SHAPE: [[u8; COLUMNS]; ROWS] = [
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1],
    [1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
];

/// Lanthanum and Actinium indices (first of each pulled-out series)
const LANTHANIDE_START: usize = 56;
const ACTINIDE_START: usize = 88;
/// Elements per pulled-out series
const SERIES_LEN: usize = 15;

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Element catalog index
    Element(usize),
    Gap,
    /// Placeholder for the series shown below the table
    Series(&'static str),
}

/// Build the full grid
pub fn grid() -> [[Cell; COLUMNS]; ROWS] {
    let mut cells = [[Cell::Gap; COLUMNS]; ROWS];
    let mut next = 0;

    for (r, row) in SHAPE.iter().enumerate() {
        match r {
            8 => next = LANTHANIDE_START,
            9 => next = ACTINIDE_START,
            _ => {}
        }
        for (c, kind) in row.iter().enumerate() {
            cells[r][c] = match kind {
                1 if next < ELEMENT_COUNT => {
                    let cell = Cell::Element(next);
                    next += 1;
                    cell
                }
                2 => {
                    let label = if next < ACTINIDE_START { "57-71" } else { "89-103" };
                    next += SERIES_LEN;
                    Cell::Series(label)
                }
                _ => Cell::Gap,
            };
        }
    }
    cells
}

/// Grid position of an element index
pub fn position_of(index: usize) -> Option<(usize, usize)> {
    let cells = grid();
    (0..ROWS)
        .flat_map(|r| (0..COLUMNS).map(move |c| (r, c)))
        .find(|&(r, c)| cells[r][c] == Cell::Element(index))
}

/// Table cell size step, 0 (smallest) ..= 9
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct TableSize(u8);

impl TryFrom<u8> for TableSize {
    type Error = String;

    fn try_from(step: u8) -> Result<Self, Self::Error> {
        if step > Self::MAX {
            return Err(format!("table size {} above {}", step, Self::MAX));
        }
        Ok(Self(step))
    }
}

impl From<TableSize> for u8 {
    fn from(size: TableSize) -> u8 {
        size.0
    }
}

impl Default for TableSize {
    fn default() -> Self {
        Self(6)
    }
}

impl TableSize {
    pub const MAX: u8 = 9;

    pub fn new(step: u8) -> Self {
        Self(step.min(Self::MAX))
    }

    pub fn step(&self) -> u8 {
        self.0
    }

    /// Pick a size that fits the viewport
    pub fn from_viewport_width(width: f64) -> Self {
        let step = (0.00545 * width - 2.18).floor().clamp(0.0, Self::MAX as f64);
        Self(step as u8)
    }

    /// Text input keeps only the last digit typed
    pub fn from_input(raw: &str) -> Option<Self> {
        raw.chars()
            .filter_map(|c| c.to_digit(10))
            .last()
            .map(|d| Self(d as u8))
    }

    /// Cell edge in CSS pixels
    pub fn cell_px(&self) -> u32 {
        const EDGES: [u32; 10] = [40, 42, 44, 46, 48, 52, 56, 60, 64, 68];
        EDGES[self.0.min(Self::MAX) as usize]
    }
}
