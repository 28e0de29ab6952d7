//! The `stats` subcommand: site statistics, written as `site_stats.json`.

use std::path::PathBuf;

use targhette_catalog::report::write_site_stats;
use targhette_catalog::stats::compute_site_stats;
use targhette_catalog::ImageIndex;

use crate::{load_config, CliError};

pub fn cmd_stats(
    root: PathBuf,
    out: Option<PathBuf>,
    config_path: Option<PathBuf>,
    json_output: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_ref())?;

    let index = ImageIndex::scan(&root, &config).map_err(CliError::catalog)?;
    let (stats, warnings) = compute_site_stats(&config, &root, &index);
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    let out = out.unwrap_or_else(|| root.join("site_stats.json"));
    write_site_stats(&out, &stats)
        .map_err(|e| CliError::write(format!("cannot write {}: {e}", out.display())))?;

    eprintln!("site statistics written to {}", out.display());
    eprintln!("  total pages:    {}", stats.total_pages);
    eprintln!("  total images:   {}", stats.total_images);
    eprintln!("  total targhette: {}", stats.total_targhette);
    eprintln!("  unique localita: {}", stats.total_localita);
    eprintln!("  sections:");
    for (name, section) in &stats.sections {
        eprintln!(
            "    - {}: catalogati={}, immagini={}, {}%",
            name, section.total_catalogati, section.images_present, section.images_pct,
        );
    }

    if json_output {
        let json = serde_json::to_string_pretty(&stats)
            .map_err(|e| CliError::write(e.to_string()))?;
        println!("{json}");
    }

    Ok(())
}
