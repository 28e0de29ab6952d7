//! Site-wide statistics: page counts, image counts, per-section completion.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;

use crate::config::{AuditConfig, PageRules};
use crate::index::ImageIndex;
use crate::model::{load_records, SectionStats};
use crate::reconcile::reconcile_section;

/// The `site_stats.json` payload. Field names and order are fixed by the
/// site frontend; do not rename.
#[derive(Debug, Clone, Serialize)]
pub struct SiteStats {
    pub total_pages: usize,
    pub total_images: usize,
    pub sections: BTreeMap<String, SectionStats>,
    pub total_targhette: usize,
    pub total_localita: usize,
}

/// Assemble site statistics from the shared index. Sections whose catalog
/// is absent contribute zeros; malformed catalogs contribute zeros and a
/// warning (the run continues either way).
pub fn compute_site_stats(
    config: &AuditConfig,
    root: &Path,
    index: &ImageIndex,
) -> (SiteStats, Vec<String>) {
    let mut warnings = Vec::new();
    let mut sections = BTreeMap::new();
    let mut total_targhette = 0usize;
    let mut localita: BTreeSet<String> = BTreeSet::new();

    for section in &config.sections {
        let catalog_path = root.join(&section.folder).join(&section.catalog);
        let records = match load_records(&catalog_path) {
            Ok(records) => records,
            Err(crate::CatalogError::CatalogNotFound(_)) => Vec::new(),
            Err(e) => {
                warnings.push(e.to_string());
                Vec::new()
            }
        };

        for record in &records {
            if let Some(loc) = record.localita() {
                localita.insert(loc);
            }
        }

        let outcome = reconcile_section(config, section, &records, index, false);
        total_targhette += outcome.stats.total_catalogati;
        sections.insert(section.name.clone(), outcome.stats);
    }

    let stats = SiteStats {
        total_pages: count_pages(index.html_pages(), &config.pages),
        total_images: index.total_images(),
        sections,
        total_targhette,
        total_localita: localita.len(),
    };
    (stats, warnings)
}

/// Count HTML pages, dropping excluded shell fragments and collapsing a
/// counted-as-one template group to a single page when all members exist.
pub fn count_pages(html_pages: &[String], rules: &PageRules) -> usize {
    let filtered: Vec<&String> = html_pages
        .iter()
        .filter(|page| {
            let name = basename(page);
            !rules.exclude.iter().any(|ex| ex == name)
        })
        .collect();

    let mut total = filtered.len();
    if !rules.counted_as_one.is_empty() {
        let all_present = rules
            .counted_as_one
            .iter()
            .all(|member| filtered.iter().any(|page| basename(page) == member));
        if all_present {
            total -= rules.counted_as_one.len() - 1;
        }
    }
    total
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
