//! Table boundary discovery.
//!
//! One row-major pass over the grid finds every rectangular table region.
//! A header-styled cell opens a candidate; the scan then looks forward for a
//! top-right corner and down that column for a bottom-right corner. Emitted
//! regions never overlap and arrive in row-major order of their top-left
//! cells. A candidate that never closes is dropped silently at end of sheet;
//! odd formatting degrades to fewer regions, never to an error.

use crate::grid::CellRef;
use crate::grid::Grid;
use crate::tables::style::CellStyles;

/// An axis-aligned rectangle on the grid believed to contain one table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TableRegion {
    pub top_left: CellRef,
    pub bottom_right: CellRef,
}

impl TableRegion {
    /// Excel-style range reference, e.g. "A1:C4".
    pub fn reference(&self) -> String {
        format!("{}:{}", self.top_left.reference(), self.bottom_right.reference())
    }

    pub fn overlaps(&self, other: &TableRegion) -> bool {
        self.top_left.row <= other.bottom_right.row
            && other.top_left.row <= self.bottom_right.row
            && self.top_left.column <= other.bottom_right.column
            && other.top_left.column <= self.bottom_right.column
    }
}

/// Finds all table regions on the grid, in discovery order.
pub fn identify_tables<G: Grid>(grid: &G) -> Vec<TableRegion> {
    let mut regions = Vec::new();
    let mut styles = CellStyles::new(grid);
    let mut start: Option<CellRef> = None;
    let mut last_bottom_right: Option<CellRef> = None;

    for row in 1..=grid.max_row() {
        for column in 1..=grid.max_column() {
            // Cells dominated by the previous region's corner are part of an
            // already-emitted table
            if let Some(last) = last_bottom_right {
                if row <= last.row && column <= last.column {
                    continue;
                }
            }

            if start.is_none() && styles.is_header_styled(row, column) {
                start = Some(CellRef::new(row, column));
            }
            let Some(top_left) = start else { continue };

            // The opening cell itself may already be the top-right corner of
            // a single-column table
            if !is_top_right(grid, &mut styles, row, column) {
                continue;
            }
            if let Some(bottom_right) = find_bottom_right(grid, &styles, top_left.row, column) {
                log::debug!(
                    "table region {}:{}",
                    top_left.reference(),
                    bottom_right.reference()
                );
                regions.push(TableRegion { top_left, bottom_right });
                last_bottom_right = Some(bottom_right);
                start = None;
            }
        }
    }

    regions
}

/// A valueless non-header cell never closes the header row. Otherwise the
/// grid's last column always does, and a header cell does when its right
/// neighbor is not header-styled.
fn is_top_right<G: Grid>(grid: &G, styles: &mut CellStyles<G>, row: usize, column: usize) -> bool {
    if !styles.has_value(row, column) && !styles.is_header_styled(row, column) {
        return false;
    }
    if column == grid.max_column() {
        return true;
    }
    styles.is_header_styled(row, column) && !styles.is_header_styled(row, column + 1)
}

/// Scans down the top-right corner's column, starting at the top-left row,
/// for the cell closing the rectangle.
fn find_bottom_right<G: Grid>(
    grid: &G,
    styles: &CellStyles<G>,
    start_row: usize,
    column: usize,
) -> Option<CellRef> {
    (start_row..=grid.max_row())
        .find(|row| is_bottom_right(grid, styles, *row, column))
        .map(|row| CellRef::new(row, column))
}

/// A valueless cell without bottom+right borders never closes a region.
/// Otherwise the grid's last cell always does, and a bottom+right-bordered
/// cell does when the cell below lacks a right border and the cell to the
/// right lacks bottom+right borders.
fn is_bottom_right<G: Grid>(grid: &G, styles: &CellStyles<G>, row: usize, column: usize) -> bool {
    if !styles.has_value(row, column) && !styles.has_bottom_right_borders(row, column) {
        return false;
    }
    if row == grid.max_row() && column == grid.max_column() {
        return true;
    }
    styles.has_bottom_right_borders(row, column)
        && !styles.has_right_border(row + 1, column)
        && !styles.has_bottom_right_borders(row, column + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Border;
    use crate::grid::Cell;
    use crate::grid::Fill;
    use crate::grid::MemoryGrid;
    use crate::tables::style::HEADER_FILL_RGB;

    fn header(row: usize, column: usize, value: &str) -> Cell {
        Cell::text(row, column, value)
            .with_fill(Fill::Rgb(HEADER_FILL_RGB.to_owned()))
            .with_border(Border {
                top: Some("thin".to_owned()),
                left: Some("thin".to_owned()),
                right: Some("thin".to_owned()),
                bottom: None,
            })
    }

    fn closing(row: usize, column: usize, value: &str) -> Cell {
        Cell::text(row, column, value).with_border(Border {
            bottom: Some("thin".to_owned()),
            right: Some("thin".to_owned()),
            ..Border::default()
        })
    }

    fn two_by_three_table() -> MemoryGrid {
        MemoryGrid::new()
            .with(header(1, 1, "Month"))
            .with(header(1, 2, "Savings"))
            .with(Cell::text(2, 1, "January"))
            .with(Cell::number(2, 2, "250"))
            .with(Cell::text(3, 1, "February"))
            .with(closing(3, 2, "80"))
    }

    #[test]
    fn single_table() {
        let regions = identify_tables(&two_by_three_table());
        assert_eq!(
            regions,
            vec![TableRegion {
                top_left: CellRef::new(1, 1),
                bottom_right: CellRef::new(3, 2),
            }]
        );
    }

    #[test]
    fn single_cell_region() {
        let grid = MemoryGrid::new().with(
            header(1, 1, "Total").with_border(Border {
                top: Some("thin".to_owned()),
                left: Some("thin".to_owned()),
                right: Some("thin".to_owned()),
                bottom: Some("thin".to_owned()),
            }),
        );
        let regions = identify_tables(&grid);
        assert_eq!(
            regions,
            vec![TableRegion {
                top_left: CellRef::new(1, 1),
                bottom_right: CellRef::new(1, 1),
            }]
        );
    }

    #[test]
    fn empty_grid_yields_no_regions() {
        assert!(identify_tables(&MemoryGrid::new()).is_empty());
    }

    #[test]
    fn unstyled_cells_yield_no_regions() {
        let grid = MemoryGrid::new()
            .with(Cell::text(1, 1, "just"))
            .with(Cell::text(2, 2, "text"));
        assert!(identify_tables(&grid).is_empty());
    }

    #[test]
    fn candidate_without_closing_corner_is_dropped() {
        // Header row opens a candidate but no cell ever closes the
        // rectangle: nothing carries bottom+right borders and the grid's
        // last cell holds neither value nor borders
        let grid = MemoryGrid::new()
            .with(header(1, 1, "Month"))
            .with(header(1, 2, "Savings"))
            .with(Cell::text(1, 3, "stray"))
            .with(Cell::text(2, 1, "January"))
            .with(Cell::number(2, 2, "250"))
            .with(Cell::text(3, 1, "note"));
        assert!(identify_tables(&grid).is_empty());
    }

    #[test]
    fn two_stacked_tables() {
        let grid = two_by_three_table()
            .with(header(5, 1, "Quarter"))
            .with(header(5, 2, "Total"))
            .with(Cell::text(6, 1, "Q1"))
            .with(closing(6, 2, "330"));

        let regions = identify_tables(&grid);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].top_left, CellRef::new(1, 1));
        assert_eq!(regions[1].top_left, CellRef::new(5, 1));
        assert_eq!(regions[1].bottom_right, CellRef::new(6, 2));
        assert!(!regions[0].overlaps(&regions[1]));
    }

    #[test]
    fn regions_arrive_in_row_major_order_and_rescan_is_identical() {
        let grid = two_by_three_table()
            .with(header(5, 1, "Quarter"))
            .with(header(5, 2, "Total"))
            .with(Cell::text(6, 1, "Q1"))
            .with(closing(6, 2, "330"));

        let first = identify_tables(&grid);
        let second = identify_tables(&grid);
        assert_eq!(first, second);
        for pair in first.windows(2) {
            let earlier = &pair[0].top_left;
            let later = &pair[1].top_left;
            assert!(earlier.row < later.row || (earlier.row == later.row && earlier.column < later.column));
        }
    }

    #[test]
    fn region_reference() {
        let region = TableRegion {
            top_left: CellRef::new(1, 1),
            bottom_right: CellRef::new(4, 3),
        };
        assert_eq!(region.reference(), "A1:C4");
    }
}
