//! Indentation-encoded hierarchical table decoding.
//!
//! The region's first column carries row labels whose leading spaces encode
//! tree depth. The decoder infers how many spaces make one level, walks the
//! rows while maintaining the current root-to-node path, and attaches a leaf
//! mapping of column header to value for every row that actually holds data.
//! Rows without data act purely as category nodes.

use crate::grid::Grid;
use crate::tables::value::serialize_cell;
use crate::tables::Hierarchy;
use crate::tables::HierarchyValue;
use crate::tables::TableRegion;

/// Decodes a hierarchical region into a nested mapping.
pub fn decode_hierarchical<G: Grid>(grid: &G, region: &TableRegion) -> Hierarchy {
    let top_left = region.top_left;
    let bottom_right = region.bottom_right;
    let first_data_column = top_left.column + 1;

    let column_headers: Vec<String> = (first_data_column..=bottom_right.column)
        .map(|column| serialize_cell(grid.cell(top_left.row, column)))
        .collect();
    let row_headers: Vec<String> = (top_left.row + 1..=bottom_right.row)
        .map(|row| serialize_cell(grid.cell(row, top_left.column)))
        .collect();
    let unit = leading_spaces_per_level(&row_headers);

    let mut tree = Hierarchy::new();
    let mut path = Vec::<String>::new();

    for (offset, row_header) in row_headers.iter().enumerate() {
        let row = top_left.row + 1 + offset;
        let level = leading_spaces(row_header) / unit;
        path.truncate(level);
        path.push(row_header.trim().to_owned());

        let has_data = (first_data_column..=bottom_right.column)
            .any(|column| grid.cell(row, column).map(|cell| !cell.is_empty()).unwrap_or(false));
        if has_data {
            attach_row(&mut tree, &path, &column_headers, grid, row, first_data_column);
        }
    }

    // Top-level pairs follow the same drop rule as flat records
    tree.retain(|key, value| !key.is_empty() || !value.is_empty());
    tree
}

fn leading_spaces(label: &str) -> usize {
    label.chars().take_while(|character| character.is_whitespace()).count()
}

/// Infers the indentation unit from the first adjacent pair of row headers
/// whose leading-space counts differ. A flat list, or a first difference
/// that shrinks, yields a unit of 1.
fn leading_spaces_per_level(row_headers: &[String]) -> usize {
    for pair in row_headers.windows(2) {
        let current = leading_spaces(&pair[0]);
        let next = leading_spaces(&pair[1]);
        if next != current {
            return if next > current { next - current } else { 1 };
        }
    }
    1
}

/// Walks the tree along `path`, creating missing category nodes, and sets the
/// leaf mapping for the row at the final segment. Only non-empty data cells
/// enter the leaf.
fn attach_row<G: Grid>(
    tree: &mut Hierarchy,
    path: &[String],
    column_headers: &[String],
    grid: &G,
    row: usize,
    first_data_column: usize,
) {
    let Some((leaf_label, parents)) = path.split_last() else {
        return;
    };

    let mut node = tree;
    for segment in parents {
        node = node
            .entry(segment.to_owned())
            .or_insert_with(|| {
                log::debug!("creating missing category node '{segment}'");
                HierarchyValue::Node(Hierarchy::new())
            })
            .make_node();
    }

    let mut leaf = Hierarchy::new();
    for (offset, header) in column_headers.iter().enumerate() {
        let value = serialize_cell(grid.cell(row, first_data_column + offset));
        if !value.is_empty() {
            leaf.insert(header.to_owned(), HierarchyValue::Text(value));
        }
    }
    node.insert(leaf_label.to_owned(), HierarchyValue::Node(leaf));
}
