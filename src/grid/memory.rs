use crate::grid::Cell;
use crate::grid::Grid;
use std::collections::HashMap;

/// An in-memory [`Grid`] built cell by cell.
///
/// The discovery pipeline is tested against this fake so no spreadsheet file
/// is needed; it is also the natural adapter for callers that already hold
/// parsed worksheet data.
#[derive(Debug, Default)]
pub struct MemoryGrid {
    cells: Vec<Cell>,
    /// Index mapping from (row, column) to cell vector position
    indexes: HashMap<(usize, usize), usize>,
    max_row: usize,
    max_column: usize,
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a cell, replacing any previous cell at the same position.
    pub fn insert(&mut self, cell: Cell) {
        self.max_row = self.max_row.max(cell.row);
        self.max_column = self.max_column.max(cell.column);
        match self.indexes.get(&(cell.row, cell.column)) {
            Some(index) => self.cells[*index] = cell,
            None => {
                self.indexes.insert((cell.row, cell.column), self.cells.len());
                self.cells.push(cell);
            }
        }
    }

    /// Builder-style [`MemoryGrid::insert`].
    pub fn with(mut self, cell: Cell) -> Self {
        self.insert(cell);
        self
    }
}

impl Grid for MemoryGrid {
    fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.indexes
            .get(&(row, column))
            .and_then(|index| self.cells.get(*index))
    }

    fn max_row(&self) -> usize {
        self.max_row
    }

    fn max_column(&self) -> usize {
        self.max_column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_initial() {
        let grid = MemoryGrid::new();
        assert_eq!(grid.max_row(), 0);
        assert_eq!(grid.max_column(), 0);
        assert!(grid.cell(1, 1).is_none());
    }

    #[test]
    fn grid_lookup_and_bounds() {
        let grid = MemoryGrid::new()
            .with(Cell::text(1, 1, "a"))
            .with(Cell::text(3, 2, "b"));

        assert_eq!(grid.max_row(), 3);
        assert_eq!(grid.max_column(), 2);
        assert_eq!(grid.cell(1, 1).map(|cell| cell.value.as_str()), Some("a"));
        assert_eq!(grid.cell(3, 2).map(|cell| cell.value.as_str()), Some("b"));
        assert!(grid.cell(2, 2).is_none());
    }

    #[test]
    fn grid_insert_replaces() {
        let grid = MemoryGrid::new()
            .with(Cell::text(1, 1, "old"))
            .with(Cell::text(1, 1, "new"));
        assert_eq!(grid.cell(1, 1).map(|cell| cell.value.as_str()), Some("new"));
    }
}
