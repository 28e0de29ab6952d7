//! Report emitters: JSON and CSV files, sequential writes, plain overwrite.

use std::path::Path;

use serde::Serialize;

use crate::error::CatalogError;
use crate::model::{SectionOutcome, UnreferencedImage};
use crate::stats::SiteStats;

/// File format for a report, chosen from the output path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    /// `.json` (any case) selects JSON; everything else is CSV, matching
    /// the historical behavior of the site scripts.
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.to_string_lossy().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub tool: String,
    pub version: String,
    pub generated_at: String,
}

impl ReportMeta {
    pub fn now() -> Self {
        Self {
            tool: "targhette".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MissingSummary {
    pub total_records: usize,
    pub unique_expected: usize,
    pub missing_filenames: usize,
    pub records_affected: usize,
}

/// JSON shape of the missing-images report.
#[derive(Debug, Clone, Serialize)]
pub struct MissingReport<'a> {
    pub meta: ReportMeta,
    pub section: &'a str,
    pub summary: MissingSummary,
    pub missing: &'a [crate::model::MissingEntry],
}

impl<'a> MissingReport<'a> {
    pub fn from_outcome(outcome: &'a SectionOutcome) -> Self {
        Self {
            meta: ReportMeta::now(),
            section: &outcome.section,
            summary: MissingSummary {
                total_records: outcome.total_records,
                unique_expected: outcome.unique_expected,
                missing_filenames: outcome.missing.len(),
                records_affected: outcome.affected_records(),
            },
            missing: &outcome.missing,
        }
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        serde_json::to_string_pretty(self).map_err(|e| CatalogError::Io(e.to_string()))
    }
}

/// JSON shape of the unreferenced-images report.
#[derive(Debug, Clone, Serialize)]
pub struct UnreferencedReport<'a> {
    pub meta: ReportMeta,
    pub section: &'a str,
    pub unreferenced_count: usize,
    pub unreferenced: &'a [UnreferencedImage],
}

impl<'a> UnreferencedReport<'a> {
    pub fn from_outcome(outcome: &'a SectionOutcome) -> Self {
        Self {
            meta: ReportMeta::now(),
            section: &outcome.section,
            unreferenced_count: outcome.unreferenced.len(),
            unreferenced: &outcome.unreferenced,
        }
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        serde_json::to_string_pretty(self).map_err(|e| CatalogError::Io(e.to_string()))
    }
}

/// Write the missing report to `path`, format chosen by extension.
/// The CSV variant always writes its header, even with nothing missing.
pub fn write_missing(path: &Path, outcome: &SectionOutcome) -> Result<(), CatalogError> {
    match OutputFormat::from_path(path) {
        OutputFormat::Json => {
            let json = MissingReport::from_outcome(outcome).to_json()?;
            std::fs::write(path, json).map_err(|e| CatalogError::Io(e.to_string()))
        }
        OutputFormat::Csv => {
            let mut writer =
                csv::Writer::from_path(path).map_err(|e| CatalogError::Io(e.to_string()))?;
            writer
                .write_record(["filename", "count", "sample_descr"])
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            for entry in &outcome.missing {
                writer
                    .write_record([
                        entry.filename.as_str(),
                        &entry.record_count.to_string(),
                        entry.sample_description.as_deref().unwrap_or(""),
                    ])
                    .map_err(|e| CatalogError::Io(e.to_string()))?;
            }
            writer.flush().map_err(|e| CatalogError::Io(e.to_string()))
        }
    }
}

/// Write the unreferenced report to `path`, format chosen by extension.
pub fn write_unreferenced(path: &Path, outcome: &SectionOutcome) -> Result<(), CatalogError> {
    match OutputFormat::from_path(path) {
        OutputFormat::Json => {
            let json = UnreferencedReport::from_outcome(outcome).to_json()?;
            std::fs::write(path, json).map_err(|e| CatalogError::Io(e.to_string()))
        }
        OutputFormat::Csv => {
            let mut writer =
                csv::Writer::from_path(path).map_err(|e| CatalogError::Io(e.to_string()))?;
            writer
                .write_record(["filename", "paths"])
                .map_err(|e| CatalogError::Io(e.to_string()))?;
            for image in &outcome.unreferenced {
                writer
                    .write_record([image.filename.as_str(), &image.paths.join(";")])
                    .map_err(|e| CatalogError::Io(e.to_string()))?;
            }
            writer.flush().map_err(|e| CatalogError::Io(e.to_string()))
        }
    }
}

/// Write `site_stats.json` in the exact legacy shape the frontend reads.
pub fn write_site_stats(path: &Path, stats: &SiteStats) -> Result<(), CatalogError> {
    let json =
        serde_json::to_string_pretty(stats).map_err(|e| CatalogError::Io(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| CatalogError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MissingEntry, SectionStats};

    fn outcome() -> SectionOutcome {
        SectionOutcome {
            section: "Regno".into(),
            total_records: 2,
            unique_expected: 2,
            missing: vec![MissingEntry {
                filename: "prev_3.jpeg".into(),
                record_count: 1,
                sample_description: Some("terza, con virgola".into()),
                records: vec![],
            }],
            unreferenced: vec![UnreferencedImage {
                filename: "prev_999.jpeg".into(),
                paths: vec!["jpg/prev_999.jpeg".into()],
            }],
            stats: SectionStats { total_catalogati: 2, images_present: 1, images_pct: 50.0 },
        }
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("out.JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("out.csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Csv);
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing.csv");
        write_missing(&out, &outcome()).unwrap();
        let body = std::fs::read_to_string(&out).unwrap();
        let mut lines = body.lines();
        assert_eq!(lines.next(), Some("filename,count,sample_descr"));
        assert_eq!(lines.next(), Some("prev_3.jpeg,1,\"terza, con virgola\""));
    }

    #[test]
    fn empty_missing_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing.csv");
        let mut clean = outcome();
        clean.missing.clear();
        write_missing(&out, &clean).unwrap();
        let body = std::fs::read_to_string(&out).unwrap();
        assert_eq!(body.trim(), "filename,count,sample_descr");
    }

    #[test]
    fn json_report_shape() {
        let outcome = outcome();
        let report = MissingReport::from_outcome(&outcome);
        let val: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(val["section"], "Regno");
        assert_eq!(val["summary"]["missing_filenames"], 1);
        assert_eq!(val["missing"][0]["filename"], "prev_3.jpeg");
        assert!(val["meta"]["generated_at"].is_string());
    }

    #[test]
    fn unreferenced_csv_joins_paths() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("unref.csv");
        write_unreferenced(&out, &outcome()).unwrap();
        let body = std::fs::read_to_string(&out).unwrap();
        assert!(body.contains("prev_999.jpeg,jpg/prev_999.jpeg"));
    }
}
