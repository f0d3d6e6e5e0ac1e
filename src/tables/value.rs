//! Cell value serialization shared by both decoders.

use crate::grid::cell::FORMAT_GENERAL;
use crate::grid::Cell;

/// Serializes a cell to the canonical string form.
///
/// Absent and valueless cells become the empty string. Everything else is
/// the cell's display text; when the cell carries a number format other than
/// "General" the format string is appended so formatting intent survives the
/// untyped string output, e.g. `1234.5 (cell format: $#,##0.00)`.
pub fn serialize_cell(cell: Option<&Cell>) -> String {
    let Some(cell) = cell else {
        return String::new();
    };
    if cell.is_empty() {
        return String::new();
    }
    let text = cell.to_string();
    if cell.number_format == FORMAT_GENERAL {
        text
    } else {
        format!("{text} (cell format: {})", cell.number_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellKind;

    #[test]
    fn absent_and_empty_cells_serialize_empty() {
        assert_eq!(serialize_cell(None), "");
        assert_eq!(serialize_cell(Some(&Cell::text(1, 1, ""))), "");
    }

    #[test]
    fn general_format_is_plain_text() {
        assert_eq!(serialize_cell(Some(&Cell::text(1, 1, "January"))), "January");
        assert_eq!(serialize_cell(Some(&Cell::number(1, 1, "250"))), "250");
    }

    #[test]
    fn non_general_format_is_annotated() {
        let cell = Cell::number(1, 1, "1234.5").with_format("$#,##0.00");
        assert_eq!(serialize_cell(Some(&cell)), "1234.5 (cell format: $#,##0.00)");
    }

    #[test]
    fn date_cells_render_their_date_form() {
        let mut cell = Cell::number(1, 1, "45199").with_format("mm-dd-yy");
        cell.kind = CellKind::Date1900;
        assert_eq!(serialize_cell(Some(&cell)), "2023-09-30 (cell format: mm-dd-yy)");
    }
}
