// targhette CLI - maintenance tooling for the targhette catalog site

mod destinations;
mod exit_codes;
mod missing;
mod stats;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_INPUT_MISSING, EXIT_SUCCESS, EXIT_USAGE, EXIT_WRITE};
use targhette_catalog::{AuditConfig, CatalogError};

#[derive(Parser)]
#[command(name = "targhette")]
#[command(about = "Audit the targhette catalog: missing images, stats, destinations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report cataloged targhette with no matching preview image
    #[command(after_help = "\
Examples:
  targhette missing
  targhette missing --try-exts --out missing.csv
  targhette missing --section 'Trieste A' --out missing.json
  targhette missing --catalog regno/targhetteRegno.json --img-dir regno/jpg")]
    Missing {
        /// Catalog JSON file (default: the section's configured path)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Directory containing images (default: the section's configured path)
        #[arg(long)]
        img_dir: Option<PathBuf>,

        /// Output report file (.json for JSON, anything else for CSV)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also try .jpg and .png when the .jpeg file is missing
        #[arg(long)]
        try_exts: bool,

        /// Section name from the audit config (default: first section)
        #[arg(long)]
        section: Option<String>,

        /// Audit config TOML file (default: built-in site layout)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,
    },

    /// Report indexed preview images no catalog record expects
    #[command(after_help = "\
Examples:
  targhette unreferenced
  targhette unreferenced --section 'Trieste A' --out unreferenced.csv")]
    Unreferenced {
        /// Catalog JSON file (default: the section's configured path)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Directory containing images (default: the section's configured path)
        #[arg(long)]
        img_dir: Option<PathBuf>,

        /// Output report file (.json for JSON, anything else for CSV)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Section name from the audit config (default: first section)
        #[arg(long)]
        section: Option<String>,

        /// Audit config TOML file (default: built-in site layout)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,
    },

    /// Compute site statistics and write site_stats.json
    #[command(after_help = "\
Examples:
  targhette stats
  targhette stats --root /srv/targhette --out /srv/targhette/site_stats.json")]
    Stats {
        /// Site root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Output file (default: <root>/site_stats.json)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Audit config TOML file (default: built-in site layout)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the stats JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Generate destination-map JSON from destination images
    #[command(after_help = "\
Examples:
  targhette destinations
  targhette destinations --img-dir static/jpeg/destinazioni --out destinazioni_data.json
  targhette destinations --gazetteer places.toml")]
    Destinations {
        /// Directory of destination images
        #[arg(long, default_value = "static/jpeg/destinazioni")]
        img_dir: PathBuf,

        /// Output JSON file
        #[arg(long, default_value = "destinazioni_data.json")]
        out: PathBuf,

        /// Gazetteer TOML file (default: built-in coordinate table)
        #[arg(long)]
        gazetteer: Option<PathBuf>,

        /// URL prefix recorded in each entry's `immagine` field
        #[arg(long, default_value = "/static/jpeg/destinazioni")]
        url_prefix: String,

        /// Print the destinations JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Validate an audit config file without running
    #[command(after_help = "\
Examples:
  targhette validate-config audit.toml")]
    ValidateConfig {
        /// Path to the audit config TOML file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Missing { catalog, img_dir, out, try_exts, section, config, json } => {
            missing::cmd_missing(catalog, img_dir, out, try_exts, section, config, json)
        }
        Commands::Unreferenced { catalog, img_dir, out, section, config, json } => {
            missing::cmd_unreferenced(catalog, img_dir, out, section, config, json)
        }
        Commands::Stats { root, out, config, json } => stats::cmd_stats(root, out, config, json),
        Commands::Destinations { img_dir, out, gazetteer, url_prefix, json } => {
            destinations::cmd_destinations(img_dir, out, gazetteer, &url_prefix, json)
        }
        Commands::ValidateConfig { config } => cmd_validate_config(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self { code: EXIT_WRITE, message: msg.into(), hint: None }
    }

    /// Map an engine error to its exit code. Absent input paths keep the
    /// original scripts' friendly one-line message.
    pub fn catalog(err: CatalogError) -> Self {
        let code = match &err {
            CatalogError::CatalogNotFound(_) | CatalogError::ImageDirNotFound(_) => {
                EXIT_INPUT_MISSING
            }
            CatalogError::ConfigParse(_)
            | CatalogError::ConfigValidation(_)
            | CatalogError::UnknownSection(_) => EXIT_USAGE,
            _ => EXIT_ERROR,
        };
        Self { code, message: err.to_string(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Load the audit config: from `--config` when given, built-in otherwise.
pub fn load_config(path: Option<&PathBuf>) -> Result<AuditConfig, CliError> {
    match path {
        Some(path) => {
            let config_str = std::fs::read_to_string(path)
                .map_err(|e| CliError::usage(format!("cannot read config: {e}")))?;
            AuditConfig::from_toml(&config_str).map_err(CliError::catalog)
        }
        None => Ok(AuditConfig::default()),
    }
}

fn cmd_validate_config(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::usage(format!("cannot read config: {e}")))?;

    match AuditConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: {} section(s), prefix '{}'",
                config.sections.len(),
                config.prefix,
            );
            for section in &config.sections {
                eprintln!(
                    "  - {}: {}/{} (images: {}{})",
                    section.name,
                    section.folder,
                    section.catalog,
                    section.image_dir,
                    section
                        .fallback_slug
                        .as_deref()
                        .map(|slug| format!(", fallback slug '{slug}'"))
                        .unwrap_or_default(),
                );
            }
            Ok(())
        }
        Err(e) => Err(CliError::catalog(e)),
    }
}

/// Truncate to `max` characters for one-line display.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}
