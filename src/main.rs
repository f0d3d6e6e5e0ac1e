//! Command-line front end: extracts every table from a workbook and prints
//! the result as JSON, one entry per processed sheet.

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use indexmap::IndexMap;
use sheet_tables::extract_tables;
use sheet_tables::DecodedTable;
use sheet_tables::XlsxWorkbook;
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let arguments: Vec<String> = env::args().skip(1).collect();
    let Some((file_name, sheet_patterns)) = arguments.split_first() else {
        bail!("usage: sheet-tables <workbook.xlsx> [sheet-name-pattern...]");
    };
    let patterns = sheet_patterns
        .iter()
        .map(|pattern| glob::Pattern::new(pattern).with_context(|| format!("invalid sheet pattern '{pattern}'")))
        .collect::<Result<Vec<_>>>()?;

    let mut workbook =
        XlsxWorkbook::open(file_name).with_context(|| format!("failed to open '{file_name}'"))?;

    let mut sheets = IndexMap::<String, Vec<DecodedTable>>::new();
    for sheet_name in workbook.sheet_names() {
        if !patterns.is_empty() && !patterns.iter().any(|pattern| pattern.matches(&sheet_name)) {
            continue;
        }
        let grid = workbook
            .load_grid(&sheet_name)
            .with_context(|| format!("failed to load sheet '{sheet_name}'"))?;
        let tables = extract_tables(&grid);
        log::info!("sheet '{sheet_name}': {} tables", tables.len());
        sheets.insert(sheet_name, tables);
    }

    println!("{}", serde_json::to_string_pretty(&sheets)?);
    Ok(())
}
