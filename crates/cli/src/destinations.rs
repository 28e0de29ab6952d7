//! The `destinations` subcommand: destination-map JSON from image filenames.

use std::path::PathBuf;

use targhette_catalog::destinations::{generate_destinations, Gazetteer};

use crate::CliError;

pub fn cmd_destinations(
    img_dir: PathBuf,
    out: PathBuf,
    gazetteer_path: Option<PathBuf>,
    url_prefix: &str,
    json_output: bool,
) -> Result<(), CliError> {
    let gazetteer = match gazetteer_path {
        Some(path) => {
            let toml_str = std::fs::read_to_string(&path)
                .map_err(|e| CliError::usage(format!("cannot read gazetteer: {e}")))?;
            Gazetteer::from_toml(&toml_str).map_err(CliError::catalog)?
        }
        None => Gazetteer::builtin(),
    };

    let outcome =
        generate_destinations(&img_dir, &gazetteer, url_prefix).map_err(CliError::catalog)?;

    let json = serde_json::to_string_pretty(&outcome.destinations)
        .map_err(|e| CliError::write(e.to_string()))?;
    std::fs::write(&out, &json)
        .map_err(|e| CliError::write(format!("cannot write {}: {e}", out.display())))?;

    eprintln!(
        "generated {} with {} destinations ({}/{} files mapped)",
        out.display(),
        outcome.destinations.len(),
        outcome.destinations.len(),
        outcome.total_files,
    );

    if !outcome.skipped.is_empty() {
        eprintln!("warning: {} file(s) without coordinates:", outcome.skipped.len());
        for name in outcome.skipped.iter().take(10) {
            eprintln!("  - {name}");
        }
        if outcome.skipped.len() > 10 {
            eprintln!("  ... and {} more", outcome.skipped.len() - 10);
        }
    }

    if json_output {
        println!("{json}");
    }

    Ok(())
}
