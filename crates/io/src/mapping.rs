use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use entsync_engine::{model::Fields, Record};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Field→column mapping, loaded from a JSON config file:
///
/// ```json
/// {
///   "fieldMappings": {
///     "externalid": { "index": 0, "datatype": "string" },
///     "externaldisabled": { "index": 3, "datatype": "boolean" }
///   }
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingConfig {
    #[serde(default)]
    pub field_mappings: HashMap<String, FieldMapping>,
}

/// Declared datatypes are open strings so an unknown value still
/// loads; it coerces as string with a warning.
#[derive(Debug, Deserialize)]
pub struct FieldMapping {
    /// Zero-based column index in the input row.
    pub index: usize,
    #[serde(default)]
    pub datatype: String,
}

impl MappingConfig {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("mapping config: {e}"))
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Apply the mapping to one row. Mappings whose column index is beyond
/// the row are skipped. Returns the record plus per-field warnings for
/// the caller to surface.
pub fn normalize(config: &MappingConfig, row: &[String]) -> (Record, Vec<String>) {
    let mut fields = Fields::new();
    let mut warnings = Vec::new();

    for (field, mapping) in &config.field_mappings {
        let Some(cell) = row.get(mapping.index) else {
            continue;
        };

        let value = match mapping.datatype.as_str() {
            "string" => Value::String(cell.clone()),
            "number" => match parse_number(cell) {
                Some(n) => Value::from(n),
                None => {
                    warnings.push(format!(
                        "field {field}: cannot parse '{cell}' as number, skipped",
                    ));
                    continue;
                }
            },
            "boolean" => Value::Bool(parse_boolean(cell)),
            other => {
                warnings.push(format!(
                    "unknown datatype '{other}' for field {field}, treating as string",
                ));
                Value::String(cell.clone())
            }
        };
        fields.insert(field.clone(), value);
    }

    (Record::from_fields(fields), warnings)
}

/// Integer parse tolerating the `.0` tail spreadsheets put on
/// integer-valued floats.
fn parse_number(cell: &str) -> Option<i64> {
    let trimmed = cell.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() < 9e15 => Some(f as i64),
        _ => None,
    }
}

/// `1` and any case form of `true` are true; everything else is false.
fn parse_boolean(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed == "1" || trimmed.eq_ignore_ascii_case("true")
}
