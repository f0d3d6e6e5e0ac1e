//! # Sheet Tables
//!
//! Extracts structured records from semi-free-form Excel worksheets that hold
//! one or more visually-delimited tables at unknown positions. Table
//! boundaries are signalled only by cell formatting (a designated header fill
//! plus borders), not by a fixed schema.
//!
//! ## Features
//!
//! - **Boundary discovery**: A row-major scan over the styled grid finds
//!   every rectangular table region, non-overlapping and in discovery order
//! - **Shape classification**: Each region decodes as a flat record table or
//!   as an indentation-encoded hierarchical table, decided by its corner cell
//! - **Hierarchy decoding**: Leading spaces in the first column encode tree
//!   depth; the indentation unit is inferred from the labels themselves
//! - **Format-preserving values**: Cells with a number format other than
//!   "General" serialize with the format appended, so currency and date
//!   intent survives the plain-text output
//! - **Best-effort extraction**: Malformed sheets degrade to fewer regions
//!   instead of failing
//! - **Grid abstraction**: The pipeline runs against a [`Grid`] trait, so it
//!   is testable on in-memory fakes and independent of the `.xlsx` loader
//!
//! ## Example
//!
//! ```no_run
//! use sheet_tables::{extract_tables, XlsxWorkbook};
//!
//! # fn main() -> Result<(), sheet_tables::ExtractError> {
//! let mut workbook = XlsxWorkbook::open("report.xlsx")?;
//! for sheet_name in workbook.sheet_names() {
//!     let grid = workbook.load_grid(&sheet_name)?;
//!     let tables = extract_tables(&grid);
//!     println!("{sheet_name}: {} tables", tables.len());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod helpers;

pub mod grid;
pub mod tables;

pub use error::ExtractError;
pub use grid::xlsx::{WorkbookError, XlsxWorkbook};
pub use helpers::xml::XmlError;
pub use grid::{Cell, CellKind, CellRef, Grid, MemoryGrid};
pub use tables::{extract_tables, DecodedTable, FlatRecord, Hierarchy, HierarchyValue, TableRegion};
