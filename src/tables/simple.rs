//! Flat table decoding.

use crate::grid::Grid;
use crate::tables::value::serialize_cell;
use crate::tables::FlatRecord;
use crate::tables::TableRegion;

/// Decodes a region with one header row into ordered flat records.
///
/// The decoded columns start one left of the region when possible, to pick up
/// a leading label column whose header sits outside the header-styled span.
/// Rows whose cells all serialize empty are skipped, and a record drops a
/// pair only when its key and value are both empty.
pub fn decode_simple<G: Grid>(grid: &G, region: &TableRegion) -> Vec<FlatRecord> {
    let top_left = region.top_left;
    let bottom_right = region.bottom_right;
    let first_column = top_left.column.saturating_sub(1).max(1);

    let headers: Vec<String> = (first_column..=bottom_right.column)
        .map(|column| serialize_cell(grid.cell(top_left.row, column)))
        .collect();

    let mut records = Vec::new();
    for row in top_left.row + 1..=bottom_right.row {
        let values: Vec<String> = (first_column..=bottom_right.column)
            .map(|column| serialize_cell(grid.cell(row, column)))
            .collect();
        if values.iter().all(String::is_empty) {
            continue;
        }
        let mut record: FlatRecord = headers.iter().cloned().zip(values).collect();
        record.retain(|key, value| !key.is_empty() || !value.is_empty());
        records.push(record);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::grid::CellRef;
    use crate::grid::MemoryGrid;

    fn region(top_left: (usize, usize), bottom_right: (usize, usize)) -> TableRegion {
        TableRegion {
            top_left: CellRef::new(top_left.0, top_left.1),
            bottom_right: CellRef::new(bottom_right.0, bottom_right.1),
        }
    }

    fn record(pairs: &[(&str, &str)]) -> FlatRecord {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn month_savings_table() {
        let grid = MemoryGrid::new()
            .with(Cell::text(1, 1, "Month"))
            .with(Cell::text(1, 2, "Savings"))
            .with(Cell::text(2, 1, "January"))
            .with(Cell::number(2, 2, "250"))
            .with(Cell::text(3, 1, "February"))
            .with(Cell::number(3, 2, "80"));

        assert_eq!(
            decode_simple(&grid, &region((1, 1), (3, 2))),
            vec![
                record(&[("Month", "January"), ("Savings", "250")]),
                record(&[("Month", "February"), ("Savings", "80")]),
            ]
        );
    }

    #[test]
    fn leading_label_column_left_of_region() {
        // Region starts at column 2; the decode picks up column 1 too
        let grid = MemoryGrid::new()
            .with(Cell::text(1, 2, "Month"))
            .with(Cell::text(1, 3, "Savings"))
            .with(Cell::text(2, 1, "note"))
            .with(Cell::text(2, 2, "January"))
            .with(Cell::number(2, 3, "250"))
            .with(Cell::text(3, 2, "February"))
            .with(Cell::number(3, 3, "80"));

        assert_eq!(
            decode_simple(&grid, &region((1, 2), (3, 3))),
            vec![
                // Empty key with non-empty value is retained
                record(&[("", "note"), ("Month", "January"), ("Savings", "250")]),
                // Both sides empty, so the pair is dropped
                record(&[("Month", "February"), ("Savings", "80")]),
            ]
        );
    }

    #[test]
    fn all_empty_rows_are_skipped() {
        let grid = MemoryGrid::new()
            .with(Cell::text(1, 1, "Month"))
            .with(Cell::text(1, 2, "Savings"))
            .with(Cell::text(3, 1, "March"))
            .with(Cell::number(3, 2, "420"));

        assert_eq!(
            decode_simple(&grid, &region((1, 1), (3, 2))),
            vec![record(&[("Month", "March"), ("Savings", "420")])]
        );
    }

    #[test]
    fn formatted_values_keep_their_annotation() {
        let grid = MemoryGrid::new()
            .with(Cell::text(1, 1, "Item"))
            .with(Cell::text(1, 2, "Price"))
            .with(Cell::text(2, 1, "Widget"))
            .with(Cell::number(2, 2, "1234.5").with_format("$#,##0.00"));

        assert_eq!(
            decode_simple(&grid, &region((1, 1), (2, 2))),
            vec![record(&[
                ("Item", "Widget"),
                ("Price", "1234.5 (cell format: $#,##0.00)"),
            ])]
        );
    }
}
