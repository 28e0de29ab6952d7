use std::collections::BTreeMap;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::AuditConfig;
use crate::error::CatalogError;

/// Index of one recursive directory scan, shared by every report generator
/// in a run so nothing walks the tree twice.
///
/// Basenames are keyed lowercased; lookups are case-insensitive. A basename
/// can occur at several relative paths (tracked as a sorted list).
#[derive(Debug)]
pub struct ImageIndex {
    by_basename: BTreeMap<String, Vec<String>>,
    total_images: usize,
    html_pages: Vec<String>,
}

impl ImageIndex {
    /// Walk `root` once, collecting image files and HTML pages.
    pub fn scan(root: &Path, config: &AuditConfig) -> Result<Self, CatalogError> {
        if !root.is_dir() {
            return Err(CatalogError::ImageDirNotFound(root.display().to_string()));
        }

        let mut by_basename: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut total_images = 0usize;
        let mut html_pages = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let ext = match path.extension() {
                Some(ext) => ext.to_string_lossy().to_lowercase(),
                None => continue,
            };
            let rel = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");

            if ext == "html" {
                html_pages.push(rel);
                continue;
            }
            if !config.is_image_extension(&ext) {
                continue;
            }
            total_images += 1;
            let basename = match path.file_name() {
                Some(name) => name.to_string_lossy().to_lowercase(),
                None => continue,
            };
            by_basename.entry(basename).or_default().push(rel);
        }

        for paths in by_basename.values_mut() {
            paths.sort();
        }
        html_pages.sort();

        Ok(Self { by_basename, total_images, html_pages })
    }

    /// Case-insensitive lookup of a basename; paths in sorted order.
    pub fn lookup(&self, basename: &str) -> Option<&[String]> {
        self.by_basename.get(&basename.to_lowercase()).map(Vec::as_slice)
    }

    pub fn contains(&self, basename: &str) -> bool {
        self.by_basename.contains_key(&basename.to_lowercase())
    }

    /// All indexed basenames starting with `prefix` (case-insensitive),
    /// in sorted basename order; each entry's paths are sorted too.
    pub fn entries_with_prefix<'a>(
        &'a self,
        prefix: &str,
    ) -> impl Iterator<Item = (&'a str, &'a [String])> + 'a {
        let prefix = prefix.to_lowercase();
        self.by_basename
            .iter()
            .filter(move |(name, _)| name.starts_with(&prefix))
            .map(|(name, paths)| (name.as_str(), paths.as_slice()))
    }

    /// Count of all recognized image files under the root.
    pub fn total_images(&self) -> usize {
        self.total_images
    }

    /// Relative paths of every `.html` file under the root, sorted.
    pub fn html_pages(&self) -> &[String] {
        &self.html_pages
    }
}
