//! Style predicates used by the boundary scanner.
//!
//! Tables in the supported worksheets are delimited purely by formatting: a
//! header row is painted with a designated fill and framed with borders, and
//! the bottom-right corner closes the rectangle with bottom+right borders.

use crate::grid::Fill;
use crate::grid::Grid;
use std::collections::HashMap;

/// ARGB fill color marking header cells.
pub const HEADER_FILL_RGB: &str = "FF002060";
/// Indexed palette fill marking header cells. 64 is also the palette default
/// reported for cells without an explicit fill, so unfilled bordered cells
/// satisfy the fill half of the header test.
pub const HEADER_FILL_INDEXED: u32 = 64;

/// Per-sheet style classifier.
///
/// The scanner re-queries the same neighbors repeatedly, so the header test
/// is memoized per position. Positions without a stored cell satisfy none of
/// the predicates.
pub struct CellStyles<'a, G: Grid> {
    grid: &'a G,
    header_styled: HashMap<(usize, usize), bool>,
}

impl<'a, G: Grid> CellStyles<'a, G> {
    pub fn new(grid: &'a G) -> Self {
        CellStyles {
            grid,
            header_styled: HashMap::new(),
        }
    }

    /// True when the cell carries the header fill and a top border plus a
    /// left or right border.
    pub fn is_header_styled(&mut self, row: usize, column: usize) -> bool {
        if let Some(answer) = self.header_styled.get(&(row, column)) {
            return *answer;
        }
        let answer = self
            .grid
            .cell(row, column)
            .map(|cell| {
                let header_fill = match &cell.fill {
                    Fill::Rgb(rgb) => rgb == HEADER_FILL_RGB,
                    Fill::Indexed(index) => *index == HEADER_FILL_INDEXED,
                };
                let header_borders = cell.border.top.is_some()
                    && (cell.border.left.is_some() || cell.border.right.is_some());
                header_fill && header_borders
            })
            .unwrap_or(false);
        self.header_styled.insert((row, column), answer);
        answer
    }

    pub fn has_right_border(&self, row: usize, column: usize) -> bool {
        self.grid
            .cell(row, column)
            .map(|cell| cell.border.right.is_some())
            .unwrap_or(false)
    }

    pub fn has_bottom_right_borders(&self, row: usize, column: usize) -> bool {
        self.grid
            .cell(row, column)
            .map(|cell| cell.border.bottom.is_some() && cell.border.right.is_some())
            .unwrap_or(false)
    }

    pub fn has_value(&self, row: usize, column: usize) -> bool {
        self.grid
            .cell(row, column)
            .map(|cell| !cell.is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Border;
    use crate::grid::Cell;
    use crate::grid::MemoryGrid;

    fn header_border() -> Border {
        Border {
            top: Some("thin".to_owned()),
            left: Some("thin".to_owned()),
            right: None,
            bottom: None,
        }
    }

    #[test]
    fn header_requires_fill_and_borders() {
        let grid = MemoryGrid::new()
            .with(
                Cell::text(1, 1, "Month")
                    .with_fill(Fill::Rgb(HEADER_FILL_RGB.to_owned()))
                    .with_border(header_border()),
            )
            // Right fill, no borders
            .with(Cell::text(1, 2, "Savings").with_fill(Fill::Rgb(HEADER_FILL_RGB.to_owned())))
            // Right borders, wrong fill
            .with(
                Cell::text(1, 3, "Total")
                    .with_fill(Fill::Rgb("FFFFFFFF".to_owned()))
                    .with_border(header_border()),
            )
            // Default indexed fill counts as the header fill
            .with(Cell::text(1, 4, "Notes").with_border(header_border()));

        let mut styles = CellStyles::new(&grid);
        assert!(styles.is_header_styled(1, 1));
        assert!(!styles.is_header_styled(1, 2));
        assert!(!styles.is_header_styled(1, 3));
        assert!(styles.is_header_styled(1, 4));
    }

    #[test]
    fn absent_cell_satisfies_nothing() {
        let grid = MemoryGrid::new();
        let mut styles = CellStyles::new(&grid);
        assert!(!styles.is_header_styled(5, 5));
        assert!(!styles.has_right_border(5, 5));
        assert!(!styles.has_bottom_right_borders(5, 5));
        assert!(!styles.has_value(5, 5));
    }

    #[test]
    fn border_predicates() {
        let grid = MemoryGrid::new()
            .with(Cell::text(1, 1, "a").with_border(Border {
                right: Some("thin".to_owned()),
                ..Border::default()
            }))
            .with(Cell::text(1, 2, "b").with_border(Border {
                right: Some("thin".to_owned()),
                bottom: Some("thin".to_owned()),
                ..Border::default()
            }));

        let styles = CellStyles::new(&grid);
        assert!(styles.has_right_border(1, 1));
        assert!(!styles.has_bottom_right_borders(1, 1));
        assert!(styles.has_bottom_right_borders(1, 2));
    }
}
