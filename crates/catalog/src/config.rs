use serde::Deserialize;

use crate::error::CatalogError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Audit configuration. Immutable once loaded; passed by reference into
/// every function that needs it.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Preview-image basename prefix.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Recognized image extensions (lowercase, no leading dot).
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
    /// Extensions tried in order when `try_exts` is requested.
    #[serde(default = "default_alternate_extensions")]
    pub alternate_extensions: Vec<String>,
    #[serde(default)]
    pub pages: PageRules,
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            image_extensions: default_image_extensions(),
            alternate_extensions: default_alternate_extensions(),
            pages: PageRules::default(),
            sections: default_sections(),
        }
    }
}

impl AuditConfig {
    pub fn from_toml(s: &str) -> Result<Self, CatalogError> {
        let mut config: Self =
            toml::from_str(s).map_err(|e| CatalogError::ConfigParse(e.to_string()))?;
        if config.sections.is_empty() {
            config.sections = default_sections();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.prefix.is_empty() {
            return Err(CatalogError::ConfigValidation("prefix must not be empty".into()));
        }
        let mut seen = std::collections::HashSet::new();
        for section in &self.sections {
            if section.name.trim().is_empty() {
                return Err(CatalogError::ConfigValidation("section name must not be empty".into()));
            }
            if section.catalog.trim().is_empty() {
                return Err(CatalogError::ConfigValidation(format!(
                    "section '{}': catalog file must not be empty",
                    section.name
                )));
            }
            if !seen.insert(section.name.clone()) {
                return Err(CatalogError::ConfigValidation(format!(
                    "duplicate section name: '{}'",
                    section.name
                )));
            }
        }
        Ok(())
    }

    pub fn section(&self, name: &str) -> Result<&SectionConfig, CatalogError> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| CatalogError::UnknownSection(name.to_string()))
    }

    /// True when `ext` (lowercase, no dot) is a recognized image extension.
    pub fn is_image_extension(&self, ext: &str) -> bool {
        self.image_extensions.iter().any(|e| e == ext)
    }
}

fn default_prefix() -> String {
    "prev_".into()
}

fn default_image_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "svg", "webp", "bmp", "tiff", "tif"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_alternate_extensions() -> Vec<String> {
    ["jpeg", "jpg", "png"].into_iter().map(String::from).collect()
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// One catalog grouping with its own JSON file and image subtree.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionConfig {
    /// Display name, e.g. "Regno" or "Trieste A".
    pub name: String,
    /// Folder under the site root holding the catalog and images.
    pub folder: String,
    /// Catalog JSON filename inside `folder`.
    pub catalog: String,
    /// Image subtree, relative to `folder`.
    #[serde(default = "default_image_dir")]
    pub image_dir: String,
    /// Slug enabling the secondary `prev_<slug>_<office>` naming scheme.
    #[serde(default)]
    pub fallback_slug: Option<String>,
}

fn default_image_dir() -> String {
    "jpg".into()
}

fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig {
            name: "Regno".into(),
            folder: "regno".into(),
            catalog: "targhetteRegno.json".into(),
            image_dir: "jpg".into(),
            fallback_slug: None,
        },
        SectionConfig {
            name: "Trieste A".into(),
            folder: "triestea".into(),
            catalog: "targhetteTriesteA.json".into(),
            image_dir: "jpg".into(),
            fallback_slug: Some("triestea".into()),
        },
    ]
}

// ---------------------------------------------------------------------------
// Page counting rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PageRules {
    /// Shell fragments excluded from the page count.
    #[serde(default = "default_page_exclude")]
    pub exclude: Vec<String>,
    /// Template pages that together render one logical page: when all
    /// members are present, the group counts once.
    #[serde(default = "default_counted_as_one")]
    pub counted_as_one: Vec<String>,
}

impl Default for PageRules {
    fn default() -> Self {
        Self {
            exclude: default_page_exclude(),
            counted_as_one: default_counted_as_one(),
        }
    }
}

fn default_page_exclude() -> Vec<String> {
    vec!["navbar.html".into(), "footer.html".into()]
}

fn default_counted_as_one() -> Vec<String> {
    vec!["cittaDettaglio.html".into(), "ufficioDettaglio.html".into()]
}
