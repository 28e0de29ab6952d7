//! Expected-filename derivation: `prev_<office>[_<extra>].<ext>`.

/// Derive the canonical preview filename for a record.
///
/// Returns `None` when the office code is empty after trimming. An empty or
/// whitespace-only extra is treated as absent.
pub fn expected_filename(
    prefix: &str,
    ufficio: &str,
    extra: Option<&str>,
    ext: &str,
) -> Option<String> {
    let uff = ufficio.trim();
    if uff.is_empty() {
        return None;
    }
    let ex = extra.map(str::trim).unwrap_or("");
    if ex.is_empty() {
        Some(format!("{prefix}{uff}.{ext}"))
    } else {
        Some(format!("{prefix}{uff}_{ex}.{ext}"))
    }
}

/// Section-specific secondary scheme: `prev_<slug>_<office>[_<extra>].<ext>`.
pub fn fallback_filename(
    prefix: &str,
    slug: &str,
    ufficio: &str,
    extra: Option<&str>,
    ext: &str,
) -> Option<String> {
    let uff = ufficio.trim();
    if uff.is_empty() {
        return None;
    }
    expected_filename(prefix, &format!("{slug}_{uff}"), extra, ext)
}

/// Basename with its final extension removed (`prev_123.jpeg` → `prev_123`).
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_extra() {
        assert_eq!(
            expected_filename("prev_", "123", None, "jpeg").as_deref(),
            Some("prev_123.jpeg")
        );
    }

    #[test]
    fn with_extra() {
        assert_eq!(
            expected_filename("prev_", "123", Some("A"), "jpeg").as_deref(),
            Some("prev_123_A.jpeg")
        );
    }

    #[test]
    fn trims_both_fields() {
        assert_eq!(
            expected_filename("prev_", " 123 ", Some(" A "), "jpeg").as_deref(),
            Some("prev_123_A.jpeg")
        );
    }

    #[test]
    fn blank_extra_treated_as_absent() {
        assert_eq!(
            expected_filename("prev_", "123", Some("   "), "jpeg").as_deref(),
            Some("prev_123.jpeg")
        );
    }

    #[test]
    fn empty_office_yields_none() {
        assert_eq!(expected_filename("prev_", "  ", None, "jpeg"), None);
        assert_eq!(fallback_filename("prev_", "triestea", "", None, "jpeg"), None);
    }

    #[test]
    fn section_scheme() {
        assert_eq!(
            fallback_filename("prev_", "triestea", "9", Some("B"), "jpeg").as_deref(),
            Some("prev_triestea_9_B.jpeg")
        );
    }

    #[test]
    fn strip_extension_basic() {
        assert_eq!(strip_extension("prev_123.jpeg"), "prev_123");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension(".hidden"), ".hidden");
    }
}
