use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CatalogError;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One cataloged targhetta, kept as the raw JSON object so locale-specific
/// field names survive round-tripping into reports.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct CatalogRecord {
    pub fields: Map<String, Value>,
}

impl CatalogRecord {
    /// Office code identifying the record. Accepts the key variants found
    /// in the wild; trimmed, `None` when absent or empty.
    pub fn ufficio(&self) -> Option<String> {
        for key in ["Targhetta Ufficio", "Ufficio", "ufficio"] {
            if let Some(s) = self.get_display(key) {
                if !s.trim().is_empty() {
                    return Some(s.trim().to_string());
                }
            }
        }
        None
    }

    /// Optional disambiguating qualifier. Whitespace-only counts as absent.
    pub fn extra(&self) -> Option<String> {
        for key in ["Extra", "extra"] {
            if let Some(s) = self.get_display(key) {
                if !s.trim().is_empty() {
                    return Some(s.trim().to_string());
                }
            }
        }
        None
    }

    pub fn descrizione(&self) -> Option<String> {
        for key in ["Descrizione", "Targhetta Tipo"] {
            if let Some(s) = self.get_display(key) {
                if !s.is_empty() {
                    return Some(s);
                }
            }
        }
        None
    }

    pub fn localita(&self) -> Option<String> {
        self.get_display("Località").filter(|s| !s.is_empty())
    }

    /// Field value coerced to display form (office codes appear both as
    /// strings and as bare numbers in the catalogs).
    fn get_display(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Load a catalog JSON file (array of objects). Non-object array elements
/// are skipped.
pub fn load_records(path: &Path) -> Result<Vec<CatalogRecord>, CatalogError> {
    if !path.is_file() {
        return Err(CatalogError::CatalogNotFound(path.display().to_string()));
    }
    let data = std::fs::read_to_string(path).map_err(|e| CatalogError::Io(e.to_string()))?;
    let parsed: Value = serde_json::from_str(&data).map_err(|e| CatalogError::JsonParse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let array = match parsed {
        Value::Array(items) => items,
        other => {
            return Err(CatalogError::JsonParse {
                path: path.display().to_string(),
                message: format!("expected a JSON array, found {}", json_kind(&other)),
            })
        }
    };
    Ok(array
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(fields) => Some(CatalogRecord { fields }),
            _ => None,
        })
        .collect())
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Reconciliation output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MissingEntry {
    pub filename: String,
    pub record_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_description: Option<String>,
    pub records: Vec<CatalogRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreferencedImage {
    pub filename: String,
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionStats {
    pub total_catalogati: usize,
    pub images_present: usize,
    pub images_pct: f64,
}

impl SectionStats {
    pub fn empty() -> Self {
        Self { total_catalogati: 0, images_present: 0, images_pct: 0.0 }
    }
}

/// Completion percentage rounded to one decimal; 0.0 when total is 0.
pub fn completion_pct(present: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (present as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Everything the reconciler produces for one section.
#[derive(Debug, Clone, Serialize)]
pub struct SectionOutcome {
    pub section: String,
    pub total_records: usize,
    pub unique_expected: usize,
    pub missing: Vec<MissingEntry>,
    pub unreferenced: Vec<UnreferencedImage>,
    pub stats: SectionStats,
}

impl SectionOutcome {
    /// Records affected by at least one missing filename.
    pub fn affected_records(&self) -> usize {
        self.missing.iter().map(|m| m.record_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> CatalogRecord {
        CatalogRecord { fields: serde_json::from_str(json).unwrap() }
    }

    #[test]
    fn ufficio_key_variants() {
        assert_eq!(record(r#"{"Targhetta Ufficio": "123"}"#).ufficio().as_deref(), Some("123"));
        assert_eq!(record(r#"{"Ufficio": "45"}"#).ufficio().as_deref(), Some("45"));
        assert_eq!(record(r#"{"ufficio": " 7 "}"#).ufficio().as_deref(), Some("7"));
        assert_eq!(record(r#"{"Descrizione": "x"}"#).ufficio(), None);
    }

    #[test]
    fn numeric_ufficio_coerced() {
        assert_eq!(record(r#"{"Targhetta Ufficio": 123}"#).ufficio().as_deref(), Some("123"));
    }

    #[test]
    fn blank_extra_is_absent() {
        assert_eq!(record(r#"{"extra": "  "}"#).extra(), None);
        assert_eq!(record(r#"{"Extra": "A"}"#).extra().as_deref(), Some("A"));
    }

    #[test]
    fn descrizione_falls_back_to_tipo() {
        let r = record(r#"{"Targhetta Tipo": "ondulato"}"#);
        assert_eq!(r.descrizione().as_deref(), Some("ondulato"));
    }

    #[test]
    fn completion_pct_rounds_to_one_decimal() {
        assert_eq!(completion_pct(2, 3), 66.7);
        assert_eq!(completion_pct(1, 3), 33.3);
        assert_eq!(completion_pct(3, 3), 100.0);
        assert_eq!(completion_pct(0, 0), 0.0);
    }
}
