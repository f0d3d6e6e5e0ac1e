//! # Worksheet Grid Abstraction
//!
//! The table-discovery pipeline never touches a spreadsheet file directly; it
//! consumes a [`Grid`]: a read-only, 1-indexed view of a worksheet exposing a
//! cell's value, number format, fill, and borders. Two implementations ship
//! with the crate: [`MemoryGrid`] for in-memory fakes and tests, and the real
//! `.xlsx` loader in [`xlsx`].

pub mod cell;
pub mod memory;
pub mod reference;
pub mod xlsx;

pub use cell::{Cell, CellKind};
pub use memory::MemoryGrid;

/// Background color of a cell's pattern fill.
///
/// Unstyled cells carry the palette default `Indexed(64)`, which is what the
/// spreadsheet file itself reports for cells without an explicit fill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fill {
    /// ARGB hex color, e.g. "FF002060"
    Rgb(String),
    /// Indexed palette color
    Indexed(u32),
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Indexed(64)
    }
}

/// Border styles on the four sides of a cell; `None` means no border.
/// Only presence matters to table discovery, but the style name is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Border {
    pub top: Option<String>,
    pub left: Option<String>,
    pub right: Option<String>,
    pub bottom: Option<String>,
}

impl Border {
    /// Returns true if any side has a border.
    pub fn is_visible(&self) -> bool {
        self.top.is_some() || self.left.is_some() || self.right.is_some() || self.bottom.is_some()
    }
}

/// A 1-indexed cell position on a grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
}

impl CellRef {
    pub fn new(row: usize, column: usize) -> Self {
        CellRef { row, column }
    }

    /// Excel-style reference, e.g. "B7".
    pub fn reference(&self) -> String {
        reference::index_to_reference(self.row, self.column)
    }
}

/// Read-only view of one worksheet.
///
/// Rows and columns are 1-indexed. Positions without a stored cell return
/// `None` and are treated as blank, border-less cells by all consumers.
/// Implementations must not mutate underneath a scan.
pub trait Grid {
    /// Looks up the cell at the given position.
    fn cell(&self, row: usize, column: usize) -> Option<&Cell>;

    /// Largest row index holding any cell; 0 for an empty sheet.
    fn max_row(&self) -> usize;

    /// Largest column index holding any cell; 0 for an empty sheet.
    fn max_column(&self) -> usize;
}
