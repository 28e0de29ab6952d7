//! Record ↔ image reconciliation for one catalog section.

use std::collections::{BTreeMap, HashSet};

use crate::config::{AuditConfig, SectionConfig};
use crate::index::ImageIndex;
use crate::model::{
    completion_pct, CatalogRecord, MissingEntry, SectionOutcome, SectionStats, UnreferencedImage,
};
use crate::naming::{expected_filename, fallback_filename, strip_extension};

const DEFAULT_EXT: &str = "jpeg";

/// Reconcile a section's records against the image index.
///
/// Resolution order per expected filename, fixed and tested:
/// 1. primary `prev_<office>[_<extra>].jpeg`
/// 2. alternate extensions (only with `try_exts`)
/// 3. section scheme `prev_<slug>_<office>[_<extra>].jpeg` (only with a slug)
/// 4. section scheme with alternate extensions (`try_exts` + slug)
/// 5. prefix scan for `prev_<slug>_<office>`, first basename in sorted
///    order, first path in sorted order
pub fn reconcile_section(
    config: &AuditConfig,
    section: &SectionConfig,
    records: &[CatalogRecord],
    index: &ImageIndex,
    try_exts: bool,
) -> SectionOutcome {
    // Expected filename -> records referencing it. Multiple records may
    // collide on the same filename; kept as a list like the site catalogs do.
    let mut expected: BTreeMap<String, Vec<CatalogRecord>> = BTreeMap::new();
    for record in records {
        let uff = match record.ufficio() {
            Some(uff) => uff,
            None => continue,
        };
        let extra = record.extra();
        if let Some(fname) =
            expected_filename(&config.prefix, &uff, extra.as_deref(), DEFAULT_EXT)
        {
            expected.entry(fname).or_default().push(record.clone());
        }
    }

    // Every name a record could legitimately claim, for unreferenced
    // detection: primary + alternate extensions + section-scheme variants.
    let mut expected_names: HashSet<String> = HashSet::new();
    // Names actually consumed by a match (covers prefix-scan hits too).
    let mut matched_names: HashSet<String> = HashSet::new();

    let mut missing = Vec::new();
    let mut present_records = 0usize;

    for (fname, recs) in &expected {
        let uff = recs[0].ufficio().unwrap_or_default();
        let extra = recs[0].extra();

        expected_names.insert(fname.to_lowercase());
        let base = strip_extension(fname);
        for ext in &config.alternate_extensions {
            expected_names.insert(format!("{base}.{ext}").to_lowercase());
        }
        if let Some(slug) = section.fallback_slug.as_deref() {
            if let Some(fb) =
                fallback_filename(&config.prefix, slug, &uff, extra.as_deref(), DEFAULT_EXT)
            {
                let fb_base = strip_extension(&fb).to_string();
                expected_names.insert(fb.to_lowercase());
                for ext in &config.alternate_extensions {
                    expected_names.insert(format!("{fb_base}.{ext}").to_lowercase());
                }
            }
        }

        match resolve(config, section, index, fname, &uff, extra.as_deref(), try_exts) {
            Some(matched) => {
                matched_names.insert(matched);
                present_records += recs.len();
            }
            None => {
                missing.push(MissingEntry {
                    filename: fname.clone(),
                    record_count: recs.len(),
                    sample_description: recs[0].descrizione(),
                    records: recs.clone(),
                });
            }
        }
    }

    let unreferenced: Vec<UnreferencedImage> = index
        .entries_with_prefix(&config.prefix)
        .filter(|(name, _)| !expected_names.contains(*name) && !matched_names.contains(*name))
        .map(|(name, paths)| UnreferencedImage {
            filename: name.to_string(),
            paths: paths.to_vec(),
        })
        .collect();

    let stats = SectionStats {
        total_catalogati: records.len(),
        images_present: present_records,
        images_pct: completion_pct(present_records, records.len()),
    };

    SectionOutcome {
        section: section.name.clone(),
        total_records: records.len(),
        unique_expected: expected.len(),
        missing,
        unreferenced,
        stats,
    }
}

/// Resolve one expected filename against the index. Returns the lowercased
/// basename that satisfied the match.
fn resolve(
    config: &AuditConfig,
    section: &SectionConfig,
    index: &ImageIndex,
    fname: &str,
    ufficio: &str,
    extra: Option<&str>,
    try_exts: bool,
) -> Option<String> {
    if index.contains(fname) {
        return Some(fname.to_lowercase());
    }

    if try_exts {
        let base = strip_extension(fname);
        for ext in &config.alternate_extensions {
            let cand = format!("{base}.{ext}");
            if index.contains(&cand) {
                return Some(cand.to_lowercase());
            }
        }
    }

    let slug = section.fallback_slug.as_deref()?;
    let fb = fallback_filename(&config.prefix, slug, ufficio, extra, DEFAULT_EXT)?;
    if index.contains(&fb) {
        return Some(fb.to_lowercase());
    }
    if try_exts {
        let fb_base = strip_extension(&fb).to_string();
        for ext in &config.alternate_extensions {
            let cand = format!("{fb_base}.{ext}");
            if index.contains(&cand) {
                return Some(cand.to_lowercase());
            }
        }
    }

    // Last resort: any indexed image whose basename starts with the
    // section-scheme stem for this office. The stem must end at a `_` or
    // `.` boundary so office "9" never claims office "91"'s images.
    let stem = format!("{}{}_{}", config.prefix, slug, ufficio.trim()).to_lowercase();
    index
        .entries_with_prefix(&stem)
        .find(|(name, _)| matches!(name.as_bytes().get(stem.len()), None | Some(b'.') | Some(b'_')))
        .map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ufficio: &str, extra: Option<&str>, descr: &str) -> CatalogRecord {
        let mut fields = serde_json::Map::new();
        fields.insert("Targhetta Ufficio".into(), ufficio.into());
        if let Some(ex) = extra {
            fields.insert("extra".into(), ex.into());
        }
        fields.insert("Descrizione".into(), descr.into());
        CatalogRecord { fields }
    }

    fn section(slug: Option<&str>) -> SectionConfig {
        SectionConfig {
            name: "Regno".into(),
            folder: "regno".into(),
            catalog: "targhetteRegno.json".into(),
            image_dir: "jpg".into(),
            fallback_slug: slug.map(String::from),
        }
    }

    fn index_with(files: &[&str]) -> (tempfile::TempDir, ImageIndex) {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            let path = dir.path().join(f);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, b"x").unwrap();
        }
        let index = ImageIndex::scan(dir.path(), &AuditConfig::default()).unwrap();
        (dir, index)
    }

    #[test]
    fn end_to_end_two_of_three_matched() {
        let config = AuditConfig::default();
        let records = vec![
            record("1", None, "prima"),
            record("2", Some("A"), "seconda"),
            record("3", None, "terza"),
        ];
        let (_dir, index) = index_with(&["prev_1.jpeg", "prev_2_A.jpeg"]);

        let out = reconcile_section(&config, &section(None), &records, &index, false);
        assert_eq!(out.missing.len(), 1);
        assert_eq!(out.missing[0].filename, "prev_3.jpeg");
        assert_eq!(out.missing[0].record_count, 1);
        assert_eq!(out.missing[0].sample_description.as_deref(), Some("terza"));
        assert_eq!(out.stats.images_present, 2);
        assert_eq!(out.stats.images_pct, 66.7);
        assert_eq!(out.unique_expected, 3);
    }

    #[test]
    fn try_exts_accepts_alternates() {
        let config = AuditConfig::default();
        let records = vec![record("123", None, "")];
        let (_dir, index) = index_with(&["prev_123.png"]);

        let strict = reconcile_section(&config, &section(None), &records, &index, false);
        assert_eq!(strict.missing.len(), 1);

        let lenient = reconcile_section(&config, &section(None), &records, &index, true);
        assert!(lenient.missing.is_empty());
        assert_eq!(lenient.stats.images_present, 1);
    }

    #[test]
    fn colliding_records_tracked_as_list() {
        let config = AuditConfig::default();
        let records = vec![record("5", None, "a"), record(" 5 ", None, "b")];
        let (_dir, index) = index_with(&[]);

        let out = reconcile_section(&config, &section(None), &records, &index, false);
        assert_eq!(out.unique_expected, 1);
        assert_eq!(out.missing.len(), 1);
        assert_eq!(out.missing[0].record_count, 2);
        assert_eq!(out.affected_records(), 2);
    }

    #[test]
    fn section_scheme_fallback() {
        let config = AuditConfig::default();
        let records = vec![record("9", None, "")];
        let (_dir, index) = index_with(&["prev_triestea_9.jpeg"]);

        // Without a slug the record stays missing.
        let plain = reconcile_section(&config, &section(None), &records, &index, false);
        assert_eq!(plain.missing.len(), 1);

        let fb = reconcile_section(&config, &section(Some("triestea")), &records, &index, false);
        assert!(fb.missing.is_empty());
        assert_eq!(fb.stats.images_present, 1);
    }

    #[test]
    fn prefix_scan_takes_first_sorted_basename() {
        let config = AuditConfig::default();
        let records = vec![record("9", Some("X"), "")];
        // Neither the primary nor the exact section-scheme name exists, but
        // two files share the scanned stem.
        let (_dir, index) = index_with(&["prev_triestea_9_b.jpeg", "prev_triestea_9_a.jpeg"]);

        let out = reconcile_section(&config, &section(Some("triestea")), &records, &index, false);
        assert!(out.missing.is_empty());
        // prev_triestea_9_a.jpeg sorts first and is the one consumed; the
        // other file stays unreferenced.
        assert_eq!(out.unreferenced.len(), 1);
        assert_eq!(out.unreferenced[0].filename, "prev_triestea_9_b.jpeg");
    }

    #[test]
    fn prefix_scan_respects_office_boundary() {
        let config = AuditConfig::default();
        let records = vec![record("9", None, "")];
        // Office 91's image must not satisfy office 9.
        let (_dir, index) = index_with(&["prev_triestea_91.jpeg"]);

        let out = reconcile_section(&config, &section(Some("triestea")), &records, &index, false);
        assert_eq!(out.missing.len(), 1);
        assert_eq!(out.unreferenced.len(), 1);
    }

    #[test]
    fn unreferenced_listed_exactly_once() {
        let config = AuditConfig::default();
        let records = vec![record("1", None, "")];
        let (_dir, index) = index_with(&[
            "prev_1.jpeg",
            "prev_999.jpeg",
            "sub/prev_999.jpeg",
            "logo.png",
        ]);

        let out = reconcile_section(&config, &section(None), &records, &index, false);
        // One entry for prev_999.jpeg with both paths; logo.png is not a
        // preview and never appears.
        assert_eq!(out.unreferenced.len(), 1);
        assert_eq!(out.unreferenced[0].filename, "prev_999.jpeg");
        assert_eq!(out.unreferenced[0].paths, ["prev_999.jpeg", "sub/prev_999.jpeg"]);
    }

    #[test]
    fn alternate_extension_not_flagged_unreferenced() {
        let config = AuditConfig::default();
        let records = vec![record("7", None, "")];
        let (_dir, index) = index_with(&["prev_7.jpg"]);

        // Even without try_exts, prev_7.jpg belongs to record 7's expected
        // name set and must not show up as unreferenced.
        let out = reconcile_section(&config, &section(None), &records, &index, false);
        assert_eq!(out.missing.len(), 1);
        assert!(out.unreferenced.is_empty());
    }

    #[test]
    fn records_without_office_are_skipped() {
        let config = AuditConfig::default();
        let mut no_office = serde_json::Map::new();
        no_office.insert("Descrizione".into(), "orphan".into());
        let records = vec![record("1", None, ""), CatalogRecord { fields: no_office }];
        let (_dir, index) = index_with(&["prev_1.jpeg"]);

        let out = reconcile_section(&config, &section(None), &records, &index, false);
        assert_eq!(out.unique_expected, 1);
        assert!(out.missing.is_empty());
        // The skipped record still counts toward the catalog total.
        assert_eq!(out.stats.total_catalogati, 2);
        assert_eq!(out.stats.images_present, 1);
        assert_eq!(out.stats.images_pct, 50.0);
    }

    #[test]
    fn empty_catalog_has_zero_pct() {
        let config = AuditConfig::default();
        let (_dir, index) = index_with(&[]);
        let out = reconcile_section(&config, &section(None), &[], &index, false);
        assert_eq!(out.stats.images_pct, 0.0);
        assert!(out.missing.is_empty());
    }
}
