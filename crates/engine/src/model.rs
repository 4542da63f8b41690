use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name → scalar value, preserving input order.
pub type Fields = Map<String, Value>;

// Reserved field names consumed by the engine.
pub const EXTERNAL_ID: &str = "externalid";
pub const EXTERNAL_PARENT_ID: &str = "externalparentid";
pub const EXTERNAL_DISABLED: &str = "externaldisabled";
pub const DISPLAY_NAME_FIELD: &str = "name_nb_no";

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One normalized input row: a flat field → value document.
///
/// Produced by the mapping layer, consumed by one or two reconciliation
/// attempts (first pass, optional second pass), then discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Fields,
}

impl Record {
    pub fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: &str, value: Value) {
        self.fields.insert(field.to_string(), value);
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Stable external key, `""` when the record carries none.
    pub fn external_id(&self) -> &str {
        self.fields
            .get(EXTERNAL_ID)
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// External parent reference, or `None` for a root record.
    ///
    /// Absent, `""`, `"0"`, and the integer `0` all mean root.
    pub fn parent_ref(&self) -> Option<String> {
        match self.fields.get(EXTERNAL_PARENT_ID) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() || s == "0" => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) if n.as_i64() == Some(0) => None,
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(other) => Some(other.to_string()),
        }
    }

    /// Source-of-truth disabled flag, default false.
    pub fn is_disabled(&self) -> bool {
        matches!(self.fields.get(EXTERNAL_DISABLED), Some(Value::Bool(true)))
    }

    /// Display name, `""` when the source field is absent.
    pub fn display_name(&self) -> &str {
        self.fields
            .get(DISPLAY_NAME_FIELD)
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// The store's persisted JSON document for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity {
    fields: Fields,
}

impl Entity {
    pub fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: &str, value: Value) {
        self.fields.insert(field.to_string(), value);
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Internally assigned id, `""` before assignment.
    pub fn id(&self) -> &str {
        self.fields.get("id").and_then(Value::as_str).unwrap_or("")
    }

    pub fn set_id(&mut self, id: &str) {
        self.insert("id", Value::String(id.to_string()));
    }

    /// `parentid` is an internal id or `"0"` for root, never an
    /// external reference.
    pub fn set_parent_id(&mut self, id: &str) {
        self.insert("parentid", Value::String(id.to_string()));
    }

    /// Every write this pipeline makes is flagged as externally owned.
    pub fn mark_external(&mut self) {
        self.insert("isexternalentity", Value::Bool(true));
    }

    /// Whether `disabled` currently holds a value. Absent, `null`, and
    /// `""` all count as not set.
    pub fn disabled_is_set(&self) -> bool {
        match self.fields.get("disabled") {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Bool(b)) => *b,
            Some(_) => true,
        }
    }

    /// `Some(stamp)` marks the disablement instant; `None` writes JSON
    /// `null` (enabled).
    pub fn set_disabled(&mut self, stamp: Option<String>) {
        let value = match stamp {
            Some(s) => Value::String(s),
            None => Value::Null,
        };
        self.insert("disabled", value);
    }
}

/// Overlay every record field onto a copy of the existing entity.
///
/// Record values win; fields absent from the record keep their existing
/// value. Returns a new document so a no-op update can be detected by
/// comparing the result against `existing`.
pub fn merge(existing: &Entity, record: &Record) -> Entity {
    let mut merged = existing.clone();
    for (field, value) in record.fields() {
        merged.fields.insert(field.clone(), value.clone());
    }
    merged
}

/// Disablement timestamp: fixed-precision UTC, seven fractional digits
/// with a constant trailing zero (`YYYY-MM-DDTHH:MM:SS.ffffff0Z`).
pub fn disabled_stamp(now: DateTime<Utc>) -> String {
    format!("{}0Z", now.format("%Y-%m-%dT%H:%M:%S%.6f"))
}

// ---------------------------------------------------------------------------
// Disposition
// ---------------------------------------------------------------------------

/// Outcome of one reconciliation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Written (or verified unchanged); nothing left to do.
    Committed,
    /// Created with a temporary root link; replay once more parents
    /// have been committed.
    NeedsRetry,
    /// Update abandoned: the declared parent does not exist. Carries
    /// the unresolved external parent id for the warning.
    Rejected { missing_parent: String },
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Committed => write!(f, "committed"),
            Self::NeedsRetry => write!(f, "needs-retry"),
            Self::Rejected { missing_parent } => {
                write!(f, "rejected (missing parent {missing_parent})")
            }
        }
    }
}
