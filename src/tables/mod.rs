//! # Table Discovery & Decoding
//!
//! Finds every visually-delimited table on a worksheet grid and decodes each
//! one into structured data. Boundaries are signalled only by formatting, so
//! discovery is a styling-driven scan rather than a schema lookup:
//!
//! 1. [`scanner`] sweeps the grid for rectangular regions using the fill and
//!    border predicates in [`style`].
//! 2. Each region is shape-classified by its top-left cell: a blank corner
//!    marks an indentation-encoded hierarchical table, anything else a flat
//!    table with one header row.
//! 3. [`simple`] and [`hierarchy`] decode the two shapes, both serializing
//!    cells through [`value`].
//!
//! The whole pass is read-only and best-effort; worksheets that defeat the
//! heuristics produce fewer regions, never an error.

pub mod hierarchy;
pub mod scanner;
pub mod simple;
pub mod style;
pub mod value;

pub use hierarchy::decode_hierarchical;
pub use scanner::{identify_tables, TableRegion};
pub use simple::decode_simple;
pub use value::serialize_cell;

use crate::grid::Grid;
use indexmap::IndexMap;
use serde::Serialize;

/// One decoded row of a flat table, in header order.
pub type FlatRecord = IndexMap<String, String>;

/// A decoded hierarchical table, or one subtree of it.
pub type Hierarchy = IndexMap<String, HierarchyValue>;

/// A value inside a [`Hierarchy`]: either a serialized cell or a nested
/// subtree. Leaf rows are subtrees mapping column headers to cell text.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HierarchyValue {
    Text(String),
    Node(Hierarchy),
}

impl HierarchyValue {
    pub fn is_empty(&self) -> bool {
        match self {
            HierarchyValue::Text(text) => text.is_empty(),
            HierarchyValue::Node(node) => node.is_empty(),
        }
    }

    /// Returns the nested subtree, converting a text value into an empty one
    /// when a category node turns out to be needed at this label.
    pub(crate) fn make_node(&mut self) -> &mut Hierarchy {
        if let HierarchyValue::Text(text) = self {
            log::warn!("category node replaces existing value '{text}'");
            *self = HierarchyValue::Node(Hierarchy::new());
        }
        match self {
            HierarchyValue::Node(node) => node,
            HierarchyValue::Text(_) => unreachable!("converted above"),
        }
    }
}

/// The two table shapes a region can decode as.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TableShape {
    Simple,
    Hierarchical,
}

/// The decoded content of one table region.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedTable {
    Records(Vec<FlatRecord>),
    Hierarchy(Hierarchy),
}

/// Picks the decoder for a region. A blank top-left corner (the row/column
/// header intersection) is the sole signal of a hierarchical table.
pub fn classify<G: Grid>(grid: &G, region: &TableRegion) -> TableShape {
    let corner = serialize_cell(grid.cell(region.top_left.row, region.top_left.column));
    if corner.is_empty() {
        TableShape::Hierarchical
    } else {
        TableShape::Simple
    }
}

/// Runs the full pass over one grid: discovery, shape classification, and
/// decoding, returning the tables in discovery order.
pub fn extract_tables<G: Grid>(grid: &G) -> Vec<DecodedTable> {
    identify_tables(grid)
        .iter()
        .map(|region| match classify(grid, region) {
            TableShape::Simple => DecodedTable::Records(decode_simple(grid, region)),
            TableShape::Hierarchical => DecodedTable::Hierarchy(decode_hierarchical(grid, region)),
        })
        .collect()
}
