//! Excel (.xlsx) workbook loader.
//!
//! Parses workbook structure, shared strings, and styles with quick-xml over
//! the zip archive, and materializes one worksheet at a time as a [`SheetGrid`].
//! Unlike a plain value reader, the loader keeps per-cell style attributes
//! (number format string, fill background, borders) and stores styled but
//! valueless cells, because table-boundary discovery reads the borders of
//! blank cells.

use crate::error::ExtractError;
use crate::error::ResultMessage;
use crate::grid::cell::builtin_number_format;
use crate::grid::cell::FORMAT_GENERAL;
use crate::grid::reference::reference_to_index;
use crate::grid::Border;
use crate::grid::Cell;
use crate::grid::CellKind;
use crate::grid::Fill;
use crate::grid::Grid;
use crate::helpers::xml::XmlAttributeHelper;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use thiserror::Error;

// XML tag names for parsing the XLSX format
const TAG_RELATIONSHIP: &[u8] = b"Relationship";          // Workbook part relationship
const TAG_SHEET: QName = QName(b"sheet");                 // Worksheet definition
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr"); // Workbook properties
const TAG_CUSTOM_FORMAT: QName = QName(b"numFmt");        // Individual custom number format
const TAG_FILLS: QName = QName(b"fills");                 // Fill definitions container
const TAG_FILL: QName = QName(b"fill");                   // Individual fill definition
const TAG_BACKGROUND_COLOR: QName = QName(b"bgColor");    // Pattern fill background color
const TAG_BORDERS: QName = QName(b"borders");             // Border definitions container
const TAG_BORDER: QName = QName(b"border");               // Individual border definition
const TAG_FORMAT_INDEXES: QName = QName(b"cellXfs");      // Cell format indexes container
const TAG_FORMAT_INDEX: QName = QName(b"xf");             // Individual cell format index
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");       // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");           // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                      // Text content within strings
const TAG_ROW: QName = QName(b"row");                     // Row in worksheet
const TAG_CELL: QName = QName(b"c");                      // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");            // Inline string value
const TAG_VALUE: QName = QName(b"v");                     // Cell value content

/// Errors for workbook structure problems
#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Missing '{0}' in workbook archive")]
    MissingArchiveFile(String),

    #[error("Workbook '{0}' has no worksheets")]
    EmptyWorkbook(String),

    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),
}

/// Type alias for the buffered workbook file reader
type WorkbookReader = BufReader<File>;

/// Resolved style attributes for one cell format index
#[derive(Clone, Debug)]
struct CellStyle {
    number_format: String,
    kind_hint: Option<CellKind>,
    fill: Fill,
    border: Border,
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle {
            number_format: FORMAT_GENERAL.to_owned(),
            kind_hint: None,
            fill: Fill::default(),
            border: Border::default(),
        }
    }
}

/// An opened XLSX workbook with parsed styles and worksheet catalog.
pub struct XlsxWorkbook {
    /// File name of the workbook
    name: String,
    /// ZIP archive containing the XLSX file contents
    zip: zip::ZipArchive<WorkbookReader>,
    /// Resolved cell styles indexed by format index
    styles: Vec<CellStyle>,
    /// List of worksheets with (name, zip_path) pairs
    sheets: Vec<(String, String)>,
}

impl XlsxWorkbook {
    /// Opens an XLSX workbook and parses its structure.
    pub fn open(file_name: &str) -> Result<XlsxWorkbook, ExtractError> {
        let file = File::open(file_name)
            .map_err(ExtractError::IoError)
            .with_prefix(file_name)?;
        let mut zip = zip::ZipArchive::new(BufReader::new(file))?;
        let (sheets, is_1904) = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(WorkbookError::EmptyWorkbook(file_name.to_owned()))?;
        }
        let styles = load_styles(&mut zip, is_1904)?;
        Ok(XlsxWorkbook {
            name: file_name.to_owned(),
            zip,
            styles,
            sheets,
        })
    }

    /// Returns the file name of this workbook.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the names of all worksheets, in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.to_owned()).collect()
    }

    /// Loads one worksheet as a queryable grid.
    pub fn load_grid(&mut self, sheet_name: &str) -> Result<SheetGrid, ExtractError> {
        let zip_path = self
            .sheets
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, path)| path.to_owned())
            .ok_or_else(|| WorkbookError::SheetNotFound(sheet_name.to_owned()))?;
        let shared_strings = self.load_shared_strings()?;
        let styles = &self.styles;
        let mut reader = self
            .zip
            .xml_reader(&zip_path)?
            .ok_or_else(|| WorkbookError::MissingArchiveFile(zip_path.to_owned()))?;
        read_sheet_cells(&mut reader, sheet_name, &shared_strings, styles)
    }

    /// Loads the shared string table; absent table means no shared strings.
    fn load_shared_strings(&mut self) -> Result<Vec<String>, ExtractError> {
        let mut shared_strings = Vec::<String>::new();
        let mut reader = match self.zip.xml_reader("xl/sharedStrings.xml")? {
            Some(reader) => reader,
            None => return Ok(shared_strings),
        };
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
                let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                shared_strings.push(string);
            }
        });
        Ok(shared_strings)
    }
}

/// One materialized worksheet: sparse cells with an index for fast lookup.
#[derive(Debug)]
pub struct SheetGrid {
    /// Sheet name
    pub name: String,
    /// All stored cells in document order
    cells: Vec<Cell>,
    /// Index mapping from (row, column) to cell vector position
    indexes: HashMap<(usize, usize), usize>,
    max_row: usize,
    max_column: usize,
}

impl Grid for SheetGrid {
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

/// Loads worksheet names, their zip paths, and the workbook's date system.
fn load_workbook(
    zip: &mut zip::ZipArchive<WorkbookReader>,
) -> Result<(Vec<(String, String)>, bool), ExtractError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip
        .xml_reader("xl/workbook.xml")?
        .ok_or_else(|| WorkbookError::MissingArchiveFile("xl/workbook.xml".to_owned()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.get_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.get_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(&id.to_string()) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event.get_attribute_value("date1904")?
                .map(|value| value.eq("1") || value.eq("true"))
                .unwrap_or(false);
        }
    });
    Ok((sheets, is_1904))
}

/// Loads worksheet relationships mapping relationship IDs to zip paths.
fn load_relationships(
    zip: &mut zip::ZipArchive<WorkbookReader>,
    path: &str,
) -> Result<HashMap<String, String>, ExtractError> {
    let mut reader = zip
        .xml_reader(path)?
        .ok_or_else(|| WorkbookError::MissingArchiveFile(path.to_owned()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only process worksheet relationships
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Normalizes a relationship target to a path within the zip archive.
fn to_zip_path(path: Cow<'_, str>) -> String {
    if path.starts_with("/xl/") {
        path[1..].to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}

/// Loads the styles part: custom number formats, fills, borders, and the
/// cell format index table resolving each format index to its attributes.
fn load_styles(
    zip: &mut zip::ZipArchive<WorkbookReader>,
    is_1904: bool,
) -> Result<Vec<CellStyle>, ExtractError> {
    let mut reader = match zip.xml_reader("xl/styles.xml")? {
        Some(reader) => reader,
        None => return Ok(Vec::new()),
    };
    parse_styles(&mut reader, is_1904)
}

/// Parses the styles XML; split from [`load_styles`] so tests can feed
/// fixture documents without a zip archive.
fn parse_styles<R: BufRead>(
    reader: &mut XmlReader<R>,
    is_1904: bool,
) -> Result<Vec<CellStyle>, ExtractError> {
    let mut custom_formats = HashMap::<String, String>::new();
    let mut fills = Vec::<Fill>::new();
    let mut fills_context = false;
    let mut borders = Vec::<Border>::new();
    let mut borders_context = false;
    let mut styles = Vec::<CellStyle>::new();
    let mut format_indexes_context = false;

    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_CUSTOM_FORMAT => {
            let id = event.get_attribute_value("numFmtId")?;
            let code = event.get_attribute_value("formatCode")?;
            if let Some((id, code)) = id.zip(code) {
                custom_formats.insert(id.to_string(), code.to_string());
            }
        }

        Event::Start(event) if event.name() == TAG_FILLS => fills_context = true,
        Event::End(event) if event.name() == TAG_FILLS => fills_context = false,
        Event::Start(event) if fills_context && event.name() == TAG_FILL => {
            fills.push(Fill::default());
        }
        Event::Start(event) if fills_context && event.name() == TAG_BACKGROUND_COLOR => {
            if let Some(fill) = fills.last_mut() {
                if let Some(rgb) = event.get_attribute_value("rgb")? {
                    *fill = Fill::Rgb(rgb.to_string());
                } else if let Some(indexed) = event.get_attribute_value("indexed")? {
                    *fill = Fill::Indexed(indexed.parse()?);
                }
            }
        }

        Event::Start(event) if event.name() == TAG_BORDERS => borders_context = true,
        Event::End(event) if event.name() == TAG_BORDERS => borders_context = false,
        Event::Start(event) if borders_context && event.name() == TAG_BORDER => {
            borders.push(Border::default());
        }
        Event::Start(event) if borders_context
            && matches!(event.name().as_ref(), b"top" | b"left" | b"right" | b"bottom") =>
        {
            let side = event.name().as_ref().to_owned();
            let style = event.get_attribute_value("style")?.map(Cow::into_owned);
            if let Some(border) = borders.last_mut() {
                match side.as_slice() {
                    b"top" => border.top = style,
                    b"left" => border.left = style,
                    b"right" => border.right = style,
                    _ => border.bottom = style,
                }
            }
        }

        Event::Start(event) if event.name() == TAG_FORMAT_INDEXES => format_indexes_context = true,
        Event::End(event) if event.name() == TAG_FORMAT_INDEXES => format_indexes_context = false,
        Event::Start(event) if format_indexes_context && event.name() == TAG_FORMAT_INDEX => {
            let format_id = event.get_attribute_value("numFmtId")?
                .map(Cow::into_owned)
                .unwrap_or_else(|| "0".to_owned());
            let number_format = custom_formats.get(&format_id).cloned()
                .or_else(|| builtin_number_format(&format_id).map(str::to_owned))
                .unwrap_or_else(|| FORMAT_GENERAL.to_owned());
            let kind_hint = custom_formats.get(&format_id)
                .map(|code| CellKind::parse_custom_number_format(code, is_1904))
                .or_else(|| CellKind::parse_builtin_number_format_id(&format_id, is_1904))
                .filter(|kind| *kind != CellKind::Number);
            let fill = event.get_attribute_value("fillId")?
                .and_then(|id| id.parse::<usize>().ok())
                .and_then(|id| fills.get(id))
                .cloned()
                .unwrap_or_default();
            let border = event.get_attribute_value("borderId")?
                .and_then(|id| id.parse::<usize>().ok())
                .and_then(|id| borders.get(id))
                .cloned()
                .unwrap_or_default();
            styles.push(CellStyle { number_format, kind_hint, fill, border });
        }
    });

    Ok(styles)
}

/// Reads worksheet cells into a [`SheetGrid`].
///
/// Cells are stored when they carry a value or any border; bare positions
/// are left sparse. Missing `r` attributes fall back to running counters.
fn read_sheet_cells<R: BufRead>(
    reader: &mut XmlReader<R>,
    sheet_name: &str,
    shared_strings: &[String],
    styles: &[CellStyle],
) -> Result<SheetGrid, ExtractError> {
    let mut cells = Vec::<Cell>::new();
    let mut indexes = HashMap::<(usize, usize), usize>::new();
    let mut max_row = 0usize;
    let mut max_column = 0usize;

    let mut row_count = 1usize;
    let mut col_count = 1usize;
    let mut row = 1usize;
    let mut col = 1usize;
    let mut kind = CellKind::default();
    let mut is_shared = false;
    let mut style = CellStyle::default();
    let mut value = String::new();

    match_xml_events!(reader => {
        Event::End(event) if event.name() == TAG_ROW => {
            row_count += 1;
            col_count = 1;
        }
        Event::Start(event) if event.name() == TAG_CELL => {
            (row, col) = event.get_attribute_value("r")?
                .and_then(|reference| reference_to_index(&reference))
                .unwrap_or((row_count, col_count));
            row_count = row;
            col_count = col + 1;
            is_shared = false;
            kind = event.get_attribute_value("t")?.map(|t| {
                match t.as_ref() {
                    "s" => {
                        is_shared = true;
                        CellKind::Text
                    }
                    "inlineStr" | "str" => CellKind::Text,
                    "b" => CellKind::Boolean,
                    "d" => CellKind::IsoDateTime,
                    "e" => CellKind::Error,
                    _ => CellKind::Number,
                }
            }).unwrap_or(CellKind::Number);
            style = event.get_attribute_value("s")?
                .and_then(|id| id.parse::<usize>().ok())
                .and_then(|id| styles.get(id))
                .cloned()
                .unwrap_or_default();
            if kind == CellKind::Number {
                if let Some(hint) = style.kind_hint {
                    kind = hint;
                }
            }
            value.clear();
        }
        Event::Start(event) if event.name() == TAG_INLINE_STRING => {
            value = read_string_value(reader, TAG_INLINE_STRING, false)?;
        }
        Event::Start(event) if event.name() == TAG_VALUE => {
            value = read_string_value(reader, TAG_VALUE, true)?;
        }
        Event::End(event) if event.name() == TAG_CELL => {
            if is_shared {
                if let Ok(index) = value.parse::<usize>() {
                    value = shared_strings.get(index).cloned().unwrap_or_default();
                }
            }
            if !value.is_empty() || style.border.is_visible() {
                indexes.insert((row, col), cells.len());
                cells.push(Cell {
                    row,
                    column: col,
                    kind: if value.is_empty() { CellKind::Empty } else { kind },
                    value: value.to_owned(),
                    number_format: style.number_format.to_owned(),
                    fill: style.fill.to_owned(),
                    border: style.border.to_owned(),
                });
                max_row = max_row.max(row);
                max_column = max_column.max(col);
                value.clear();
            }
        }
    });

    Ok(SheetGrid {
        name: sheet_name.to_owned(),
        cells,
        indexes,
        max_row,
        max_column,
    })
}

/// Reads string content from XML, skipping phonetic text annotations and
/// handling text nodes, CDATA sections, and entity references.
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, ExtractError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}
