use crate::grid::reference::index_to_reference;
use crate::grid::Border;
use crate::grid::Fill;
use chrono::Duration;
use chrono::NaiveDate;
use std::fmt::Display;

/// Sentinel number format meaning "no special formatting".
pub const FORMAT_GENERAL: &str = "General";

/// Types of cell data in spreadsheet files.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CellKind {
    #[default]
    Empty,
    /// Boolean values (true/false)
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    DateTime1900,
    /// Date values stored as numbers from 1900 epoch
    Date1900,
    /// Date/time values stored as numbers from 1904 epoch
    DateTime1904,
    /// Date values stored as numbers from 1904 epoch
    Date1904,
    /// Time values stored as day fractions
    Time,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Plain text values
    Text,
    /// Error values, e.g. "#REF!"
    Error,
}

impl CellKind {
    /// Maps built-in Excel number format IDs to date/time cell kinds.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::DateTime1904 } else { Self::DateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::Date1904 } else { Self::Date1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(Self::Time),
            _ => None,
        }
    }

    /// Classifies a custom number format string by scanning its format codes
    /// for date and time patterns, skipping escapes, literals, and color tags.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_date = false;
        let mut is_time = false;
        let mut is_color = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' if !is_escaped => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_literal && !is_color => is_literal = true,

                ']' if is_color => is_color = false,
                '[' if !is_color && !is_literal => is_color = true,
                _ if is_literal || is_color => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        if is_date {
            if is_1904 {
                if is_time { Self::DateTime1904 } else { Self::Date1904 }
            } else if is_time {
                Self::DateTime1900
            } else {
                Self::Date1900
            }
        } else if is_time {
            Self::Time
        } else {
            Self::Number
        }
    }
}

/// Format strings of the built-in Excel number formats, as a workbook's
/// styles part refers to them by ID without spelling them out.
pub(crate) fn builtin_number_format(id: &str) -> Option<&'static str> {
    match id {
        "0" => Some(FORMAT_GENERAL),
        "1" => Some("0"),
        "2" => Some("0.00"),
        "3" => Some("#,##0"),
        "4" => Some("#,##0.00"),
        "9" => Some("0%"),
        "10" => Some("0.00%"),
        "11" => Some("0.00E+00"),
        "12" => Some("# ?/?"),
        "13" => Some("# ??/??"),
        "14" => Some("mm-dd-yy"),
        "15" => Some("d-mmm-yy"),
        "16" => Some("d-mmm"),
        "17" => Some("mmm-yy"),
        "18" => Some("h:mm AM/PM"),
        "19" => Some("h:mm:ss AM/PM"),
        "20" => Some("h:mm"),
        "21" => Some("h:mm:ss"),
        "22" => Some("m/d/yy h:mm"),
        "37" => Some("#,##0 ;(#,##0)"),
        "38" => Some("#,##0 ;[Red](#,##0)"),
        "39" => Some("#,##0.00;(#,##0.00)"),
        "40" => Some("#,##0.00;[Red](#,##0.00)"),
        "41" => Some(r#"_(* #,##0_);_(* \(#,##0\);_(* "-"_);_(@_)"#),
        "42" => Some(r#"_("$"* #,##0_);_("$"* \(#,##0\);_("$"* "-"_);_(@_)"#),
        "43" => Some(r#"_(* #,##0.00_);_(* \(#,##0.00\);_(* "-"??_);_(@_)"#),
        "44" => Some(r#"_("$"* #,##0.00_);_("$"* \(#,##0.00\);_("$"* "-"??_);_(@_)"#),
        "45" => Some("mm:ss"),
        "46" => Some("[h]:mm:ss"),
        "47" => Some("mmss.0"),
        "48" => Some("##0.0E+0"),
        "49" => Some("@"),
        _ => None,
    }
}

/// A single worksheet cell: 1-indexed position, typed lexical value, and the
/// style attributes table discovery depends on.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    /// Row index (1-based)
    pub row: usize,
    /// Column index (1-based)
    pub column: usize,
    /// Cell data type
    pub kind: CellKind,
    /// Cell value as found in the file
    pub value: String,
    /// Number format string, `FORMAT_GENERAL` when unformatted
    pub number_format: String,
    /// Pattern fill background color
    pub fill: Fill,
    /// Border styles
    pub border: Border,
}

impl Cell {
    /// Creates a text cell; style attributes start at their defaults.
    pub fn text(row: usize, column: usize, value: &str) -> Self {
        Cell {
            row,
            column,
            kind: if value.is_empty() { CellKind::Empty } else { CellKind::Text },
            value: value.to_owned(),
            number_format: FORMAT_GENERAL.to_owned(),
            fill: Fill::default(),
            border: Border::default(),
        }
    }

    /// Creates a numeric cell from its lexical form, e.g. "250" or "1234.5".
    pub fn number(row: usize, column: usize, value: &str) -> Self {
        Cell {
            kind: CellKind::Number,
            ..Cell::text(row, column, value)
        }
    }

    pub fn with_format(mut self, number_format: &str) -> Self {
        self.number_format = number_format.to_owned();
        self
    }

    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    /// Excel-style cell reference (e.g., "A1", "B2").
    pub fn reference(&self) -> String {
        index_to_reference(self.row, self.column)
    }

    /// Returns true if the cell holds no value. Styled but valueless cells
    /// exist in a grid because borders of blank cells delimit tables.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self.kind {
            CellKind::Boolean => if self.value == "1" { "true" } else { "false" }.to_owned(),
            // Unparseable serials degrade to the raw lexical value; discovery
            // is best-effort and never fails on odd cell content.
            CellKind::DateTime1900 => {
                to_datetime_string(&self.value, false).unwrap_or_else(|| self.value.to_owned())
            }
            CellKind::Date1900 => {
                to_date_string(&self.value, false).unwrap_or_else(|| self.value.to_owned())
            }
            CellKind::DateTime1904 => {
                to_datetime_string(&self.value, true).unwrap_or_else(|| self.value.to_owned())
            }
            CellKind::Date1904 => {
                to_date_string(&self.value, true).unwrap_or_else(|| self.value.to_owned())
            }
            CellKind::Time => {
                to_time_string(&self.value).unwrap_or_else(|| self.value.to_owned())
            }
            CellKind::IsoDateTime => self.value.replace('T', " "),
            _ => self.value.to_owned(),
        };
        write!(f, "{}", value)
    }
}

/// Converts an Excel numeric date to an ISO date string.
/// Handles the Lotus 1-2-3 leap year bug for the 1900 epoch.
fn to_date_string(value: &str, is_1904: bool) -> Option<String> {
    let days = value.parse::<f64>().ok()?.trunc() as i64;
    let duration = Duration::days(
        days + if is_1904 {
            1462
        } else if days < 60 {
            1
        } else {
            0
        },
    );
    let date = NaiveDate::from_ymd_opt(1899, 12, 30).expect("NaiveDate Literal") + duration;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Converts an Excel day fraction to an ISO time string.
fn to_time_string(value: &str) -> Option<String> {
    let factor = value.parse::<f64>().ok()?;
    let mut hours = (factor.fract() * 86_400_000f64).round() as i64;
    let milliseconds = hours % 1_000; hours /= 1_000;
    let seconds = hours % 60; hours /= 60;
    let minutes = hours % 60; hours /= 60;
    let timestamp = if milliseconds > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{milliseconds:03}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    };
    Some(timestamp)
}

/// Converts an Excel numeric datetime to an ISO datetime string.
fn to_datetime_string(value: &str, is_1904: bool) -> Option<String> {
    if let Some(index) = value.find('.') {
        let date = to_date_string(&value[..index], is_1904)?;
        let time = to_time_string(&value[index..])?;
        Some(format!("{date} {time}"))
    } else {
        let date = to_date_string(value, is_1904)?;
        Some(format!("{date} 00:00:00"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_plain_values() {
        assert_eq!(Cell::text(1, 1, "Month").to_string(), "Month");
        assert_eq!(Cell::number(1, 1, "250").to_string(), "250");
        assert_eq!(Cell::number(1, 1, "1234.5").to_string(), "1234.5");
    }

    #[test]
    fn display_boolean() {
        let mut cell = Cell::number(1, 1, "1");
        cell.kind = CellKind::Boolean;
        assert_eq!(cell.to_string(), "true");
        cell.value = "0".to_owned();
        assert_eq!(cell.to_string(), "false");
    }

    #[test]
    fn display_date_serial_1900() {
        let mut cell = Cell::number(1, 1, "45199");
        cell.kind = CellKind::Date1900;
        assert_eq!(cell.to_string(), "2023-09-30");
    }

    #[test]
    fn display_datetime_serial_1900() {
        let mut cell = Cell::number(1, 1, "45199.5");
        cell.kind = CellKind::DateTime1900;
        assert_eq!(cell.to_string(), "2023-09-30 12:00:00");
    }

    #[test]
    fn display_time_fraction() {
        let mut cell = Cell::number(1, 1, "0.75");
        cell.kind = CellKind::Time;
        assert_eq!(cell.to_string(), "18:00:00");
    }

    #[test]
    fn display_bad_serial_degrades_to_raw() {
        let mut cell = Cell::text(1, 1, "not a number");
        cell.kind = CellKind::Date1900;
        assert_eq!(cell.to_string(), "not a number");
    }

    #[test]
    fn custom_format_classification() {
        assert_eq!(CellKind::parse_custom_number_format("$#,##0.00", false), CellKind::Number);
        assert_eq!(CellKind::parse_custom_number_format("yyyy-mm-dd", false), CellKind::Date1900);
        assert_eq!(CellKind::parse_custom_number_format("yyyy-mm-dd hh:mm", false), CellKind::DateTime1900);
        assert_eq!(CellKind::parse_custom_number_format("hh:mm:ss", false), CellKind::Time);
        // Literal and color sections must not trigger date detection
        assert_eq!(CellKind::parse_custom_number_format("[Red]0.00\"days\"", false), CellKind::Number);
    }
}
