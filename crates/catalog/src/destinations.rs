//! Destination-map data generator.
//!
//! Scans a directory of destination images named `<Paese>[_<Città>][ n].ext`
//! and resolves each to map coordinates through a [`Gazetteer`]: an
//! immutable lookup table passed into the generator, never a process-wide
//! global.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

// ---------------------------------------------------------------------------
// Gazetteer
// ---------------------------------------------------------------------------

/// Coordinate table plus classification rules. Loadable from TOML; the
/// built-in table reproduces the site's historical data.
#[derive(Debug, Clone, Deserialize)]
pub struct Gazetteer {
    /// Place name (city or country, underscore style) → `[lat, lon]`.
    #[serde(default)]
    pub coordinates: BTreeMap<String, [f64; 2]>,
    #[serde(default)]
    pub rules: DestinationRules,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DestinationRules {
    /// Countries classified as European foreign destinations.
    #[serde(default = "default_europe_countries")]
    pub europe_countries: Vec<String>,
    /// Cities that force the European classification on their own.
    #[serde(default = "default_europe_cities")]
    pub europe_cities: Vec<String>,
    /// Countries classified as colonial destinations.
    #[serde(default = "default_colonial_countries")]
    pub colonial_countries: Vec<String>,
}

impl Default for DestinationRules {
    fn default() -> Self {
        Self {
            europe_countries: default_europe_countries(),
            europe_cities: default_europe_cities(),
            colonial_countries: default_colonial_countries(),
        }
    }
}

impl Gazetteer {
    pub fn from_toml(s: &str) -> Result<Self, CatalogError> {
        let gazetteer: Self =
            toml::from_str(s).map_err(|e| CatalogError::ConfigParse(e.to_string()))?;
        Ok(gazetteer)
    }

    /// The coordinate table the site has always shipped with.
    pub fn builtin() -> Self {
        let coordinates = BUILTIN_COORDINATES
            .iter()
            .map(|(name, lat, lon)| (name.to_string(), [*lat, *lon]))
            .collect();
        Self { coordinates, rules: DestinationRules::default() }
    }

    /// Coordinates for a destination: the city entry wins over the country.
    pub fn coordinates_for(&self, paese: &str, citta: Option<&str>) -> Option<[f64; 2]> {
        if let Some(citta) = citta {
            if let Some(coords) = self.coordinates.get(citta) {
                return Some(*coords);
            }
        }
        self.coordinates.get(paese).copied()
    }

    pub fn kind_for(&self, paese: &str, citta: Option<&str>) -> DestinationKind {
        let city_is_european = citta
            .map(|c| self.rules.europe_cities.iter().any(|e| e == c))
            .unwrap_or(false);
        if self.rules.europe_countries.iter().any(|e| e == paese) || city_is_european {
            DestinationKind::EsteroEuropa
        } else if self.rules.colonial_countries.iter().any(|e| e == paese) {
            DestinationKind::Coloniale
        } else {
            DestinationKind::EsteroMondo
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationKind {
    EsteroEuropa,
    Coloniale,
    EsteroMondo,
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Destination {
    pub nome: String,
    pub coords: [f64; 2],
    pub tipo: DestinationKind,
    pub descrizione: String,
    pub immagine: String,
    pub paese: String,
    pub citta: Option<String>,
}

#[derive(Debug)]
pub struct DestinationsOutcome {
    pub destinations: Vec<Destination>,
    /// Filenames with no gazetteer entry, in scan order.
    pub skipped: Vec<String>,
    pub total_files: usize,
}

/// Parse `<Paese>[_<Città>][ n]` from an image basename. Trailing digits
/// (photo counters) and whitespace are stripped from the city part.
pub fn parse_basename(filename: &str) -> (String, Option<String>) {
    let stem = crate::naming::strip_extension(filename);
    match stem.split_once('_') {
        Some((paese, rest)) => {
            let citta = strip_trailing_counter(rest);
            if citta.is_empty() {
                (paese.to_string(), None)
            } else {
                (paese.to_string(), Some(citta))
            }
        }
        None => (strip_trailing_counter(stem), None),
    }
}

fn strip_trailing_counter(s: &str) -> String {
    s.trim_end_matches(|c: char| c.is_ascii_digit())
        .trim_end()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Build destination entries from the images in `img_dir` (one level, like
/// the site's destination folder). Hidden files are skipped; files without
/// a gazetteer entry are reported in `skipped` and excluded.
pub fn generate_destinations(
    img_dir: &Path,
    gazetteer: &Gazetteer,
    image_url_prefix: &str,
) -> Result<DestinationsOutcome, CatalogError> {
    if !img_dir.is_dir() {
        return Err(CatalogError::ImageDirNotFound(img_dir.display().to_string()));
    }

    let mut files: Vec<String> = std::fs::read_dir(img_dir)
        .map_err(|e| CatalogError::Io(e.to_string()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| {
            let lower = name.to_lowercase();
            !name.starts_with('.')
                && (lower.ends_with(".jpeg") || lower.ends_with(".jpg") || lower.ends_with(".png"))
        })
        .collect();
    files.sort();

    let total_files = files.len();
    let mut destinations = Vec::new();
    let mut skipped = Vec::new();

    for filename in files {
        let (paese, citta) = parse_basename(&filename);
        let coords = match gazetteer.coordinates_for(&paese, citta.as_deref()) {
            Some(coords) => coords,
            None => {
                skipped.push(filename);
                continue;
            }
        };

        let paese_display = paese.replace('_', " ");
        let (nome, descrizione) = match &citta {
            Some(citta) => {
                let citta_display = citta.replace('_', " ");
                (citta_display.clone(), format!("{paese_display} - {citta_display}"))
            }
            None => (paese_display.clone(), paese_display.clone()),
        };

        destinations.push(Destination {
            nome,
            coords,
            tipo: gazetteer.kind_for(&paese, citta.as_deref()),
            descrizione,
            immagine: format!("{image_url_prefix}/{filename}"),
            paese,
            citta,
        });
    }

    Ok(DestinationsOutcome { destinations, skipped, total_files })
}

// ---------------------------------------------------------------------------
// Built-in data
// ---------------------------------------------------------------------------

fn default_europe_countries() -> Vec<String> {
    [
        "Albania", "Bulgaria", "Grecia", "Norvegia", "Svezia", "Polonia",
        "Principato_di_Monaco", "Monaco", "Liechtenstein", "Ungheria", "Yugoslavia",
        "Estonia", "Lettonia", "Finlandia", "Spagna",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_europe_cities() -> Vec<String> {
    ["Atene", "Sofia", "Oslo", "Stoccolma"].into_iter().map(String::from).collect()
}

fn default_colonial_countries() -> Vec<String> {
    [
        "Libia", "Egitto", "Tunisia", "Senegal", "Kenya", "Nigeria", "Congo_Belga",
        "SudAfrica", "Togoland",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

const BUILTIN_COORDINATES: &[(&str, f64, f64)] = &[
    // Asia
    ("Bagdad", 33.3152, 44.3661),
    ("Baghdad", 33.3152, 44.3661),
    ("Tsingtau", 36.0671, 120.3826),
    ("Hankow", 30.5928, 114.3055),
    ("Shanghai", 31.2304, 121.4737),
    ("Tiensin", 39.1422, 117.1767),
    ("Allahabad", 25.4358, 81.8463),
    ("Bombay", 19.0760, 72.8777),
    ("Ceylon", 7.8731, 80.7718),
    ("Madras", 13.0827, 80.2707),
    ("Karachi", 24.8607, 67.0011),
    // Medio Oriente
    ("Istanbul", 41.0082, 28.9784),
    ("Costantinopoli", 41.0082, 28.9784),
    ("Ankara", 39.9334, 32.8597),
    ("Smirne", 38.4237, 27.1428),
    ("Chio", 38.3677, 26.1360),
    ("Tel_Aviv", 32.0853, 34.7818),
    ("Haifa", 32.7940, 34.9896),
    ("Palestina", 31.9522, 35.2332),
    // Europa
    ("Sofia", 42.6977, 23.3219),
    ("Atene", 37.9838, 23.7275),
    ("Patrasso", 38.2466, 21.7346),
    ("Salonicco", 40.6401, 22.9444),
    ("Riga", 56.9496, 24.1052),
    ("Oslo", 59.9139, 10.7522),
    ("Kristania", 59.9139, 10.7522),
    ("Porzan", 52.4064, 16.9252),
    ("Montecarlo", 43.7384, 7.4246),
    ("Monaco", 43.7384, 7.4246),
    ("Lund", 55.7047, 13.1910),
    ("Stoccolma", 59.3293, 18.0686),
    ("Zagabria", 45.8150, 15.9819),
    ("Fiume", 45.3271, 14.4422),
    ("Barcellona", 41.3851, 2.1734),
    ("LasPalmas", 28.1235, -15.4363),
    ("La_Valletta", 35.8989, 14.5146),
    ("Malta", 35.8989, 14.5146),
    ("Cipro", 35.1264, 33.4299),
    ("Vaticano", 41.9029, 12.4534),
    ("SanMarino", 43.9424, 12.4578),
    ("Liechtenstein", 47.1660, 9.5554),
    // Africa
    ("Bengasi", 32.1191, 20.0869),
    ("Alessandria", 31.2001, 29.9187),
    ("Cairo", 30.0444, 31.2357),
    ("Nairobi", 1.2921, 36.8219),
    ("Dakar", 14.6937, -17.4441),
    ("Elisabethville", -11.6795, 27.5069),
    ("CapeTown", -33.9249, 18.4241),
    ("Zinder", 13.8069, 8.9881),
    // Americhe
    ("BuenosAires", -34.6037, -58.3816),
    ("Quito", -0.1807, -78.4678),
    ("Lima", -12.0464, -77.0428),
    ("Callao", -12.0566, -77.1181),
    ("Montevideo", -34.9011, -56.1645),
    ("NewYork", 40.7128, -74.0060),
    ("New_York", 40.7128, -74.0060),
    ("Chicago", 41.8781, -87.6298),
    ("Easton", 40.6884, -75.2207),
    ("Berkley", 37.8715, -122.2730),
    ("Newtonville", 42.3370, -71.2092),
    ("Ontario", 43.6532, -79.3832),
    ("Winnipeg", 49.8951, -97.1384),
    // Oceania
    ("Perth", -31.9505, 115.8605),
    ("Wellington", -41.2865, 174.7762),
];
