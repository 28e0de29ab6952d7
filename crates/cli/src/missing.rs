//! The `missing` and `unreferenced` subcommands: record vs. image audits.

use std::path::PathBuf;

use targhette_catalog::config::SectionConfig;
use targhette_catalog::model::load_records;
use targhette_catalog::report::{write_missing, write_unreferenced, MissingReport, UnreferencedReport};
use targhette_catalog::{reconcile_section, AuditConfig, CatalogError, CatalogRecord, ImageIndex, SectionOutcome};

use crate::{load_config, truncate, CliError};

/// Resolved inputs for one section audit: config, section, catalog path,
/// image directory.
struct SectionPaths {
    config: AuditConfig,
    section: SectionConfig,
    catalog: PathBuf,
    img_dir: PathBuf,
}

fn resolve_paths(
    catalog: Option<PathBuf>,
    img_dir: Option<PathBuf>,
    section_name: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<SectionPaths, CliError> {
    let config = load_config(config_path.as_ref())?;
    let section = match &section_name {
        Some(name) => config
            .section(name)
            .map_err(|e| {
                let names: Vec<&str> =
                    config.sections.iter().map(|s| s.name.as_str()).collect();
                CliError::catalog(e)
                    .with_hint(format!("configured sections: {}", names.join(", ")))
            })?
            .clone(),
        None => config.sections[0].clone(),
    };
    let catalog =
        catalog.unwrap_or_else(|| PathBuf::from(&section.folder).join(&section.catalog));
    let img_dir =
        img_dir.unwrap_or_else(|| PathBuf::from(&section.folder).join(&section.image_dir));
    Ok(SectionPaths { config, section, catalog, img_dir })
}

/// Load records, tolerating a malformed catalog (warning + empty set) but
/// not an absent one.
fn load_records_lenient(path: &PathBuf) -> Result<Vec<CatalogRecord>, CliError> {
    match load_records(path) {
        Ok(records) => Ok(records),
        Err(e @ CatalogError::JsonParse { .. }) => {
            eprintln!("warning: {e}; treating catalog as empty");
            Ok(Vec::new())
        }
        Err(e) => Err(CliError::catalog(e)),
    }
}

fn run_section_audit(
    catalog: Option<PathBuf>,
    img_dir: Option<PathBuf>,
    section_name: Option<String>,
    config_path: Option<PathBuf>,
    try_exts: bool,
) -> Result<SectionOutcome, CliError> {
    let paths = resolve_paths(catalog, img_dir, section_name, config_path)?;
    let records = load_records_lenient(&paths.catalog)?;
    let index = ImageIndex::scan(&paths.img_dir, &paths.config).map_err(CliError::catalog)?;
    Ok(reconcile_section(&paths.config, &paths.section, &records, &index, try_exts))
}

pub fn cmd_missing(
    catalog: Option<PathBuf>,
    img_dir: Option<PathBuf>,
    out: Option<PathBuf>,
    try_exts: bool,
    section_name: Option<String>,
    config_path: Option<PathBuf>,
    json_output: bool,
) -> Result<(), CliError> {
    let outcome = run_section_audit(catalog, img_dir, section_name, config_path, try_exts)?;

    // Human summary on stderr; stdout carries only report JSON.
    eprintln!("Scan summary:");
    eprintln!("  JSON records:         {}", outcome.total_records);
    eprintln!("  Unique expected img:  {}", outcome.unique_expected);
    eprintln!("  Missing filenames:    {}", outcome.missing.len());
    eprintln!("  Records affected:     {}", outcome.affected_records());

    if !outcome.missing.is_empty() {
        eprintln!();
        eprintln!("Missing filenames (first 200 chars of sample record):");
        for entry in &outcome.missing {
            let sample = entry.sample_description.as_deref().unwrap_or("");
            eprintln!(
                " - {}  ({} record(s))  sample: {}",
                entry.filename,
                entry.record_count,
                truncate(sample, 200),
            );
        }
    }

    if let Some(ref path) = out {
        write_missing(path, &outcome)
            .map_err(|e| CliError::write(format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        let report = MissingReport::from_outcome(&outcome);
        println!("{}", report.to_json().map_err(CliError::catalog)?);
    }

    Ok(())
}

pub fn cmd_unreferenced(
    catalog: Option<PathBuf>,
    img_dir: Option<PathBuf>,
    out: Option<PathBuf>,
    section_name: Option<String>,
    config_path: Option<PathBuf>,
    json_output: bool,
) -> Result<(), CliError> {
    let outcome = run_section_audit(catalog, img_dir, section_name, config_path, false)?;

    eprintln!(
        "{} unreferenced image(s) in section '{}':",
        outcome.unreferenced.len(),
        outcome.section,
    );
    for image in &outcome.unreferenced {
        eprintln!(" - {}  ({})", image.filename, image.paths.join(", "));
    }

    if let Some(ref path) = out {
        write_unreferenced(path, &outcome)
            .map_err(|e| CliError::write(format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        let report = UnreferencedReport::from_outcome(&outcome);
        println!("{}", report.to_json().map_err(CliError::catalog)?);
    }

    Ok(())
}
