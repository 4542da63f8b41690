// Excel ingestion (xlsx, xls, xlsb, ods) via calamine. One-way: the
// first worksheet's data rows, rendered to strings.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

/// Read all data rows (header row excluded) from the first worksheet.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("{}: {e}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| format!("{}: workbook has no sheets", path.display()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("failed to read sheet '{sheet_name}': {e}"))?;

    Ok(range
        .rows()
        .skip(1)
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

/// Render one cell the way the mapping layer expects: integral floats
/// without the trailing `.0` (spreadsheets store integers as floats),
/// booleans lowercase, empty and error cells as `""`.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}
