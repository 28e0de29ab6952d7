use std::fmt;

#[derive(Debug)]
pub enum CatalogError {
    /// TOML parse / deserialization error in the audit config.
    ConfigParse(String),
    /// Config validation error (duplicate section, empty field, etc.).
    ConfigValidation(String),
    /// Catalog JSON file does not exist.
    CatalogNotFound(String),
    /// Image directory does not exist.
    ImageDirNotFound(String),
    /// Catalog JSON exists but cannot be parsed.
    JsonParse { path: String, message: String },
    /// A referenced section name does not exist in the config.
    UnknownSection(String),
    /// IO error (file read, directory walk, report write).
    Io(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::CatalogNotFound(path) => write!(f, "JSON file not found: {path}"),
            Self::ImageDirNotFound(path) => write!(f, "image directory not found: {path}"),
            Self::JsonParse { path, message } => {
                write!(f, "cannot parse {path}: {message}")
            }
            Self::UnknownSection(name) => write!(f, "unknown section: {name}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}
