//! Mapping from human-readable language names to synthesis language codes

/// Language code used for anything not in the table
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("English", "en"),
    ("Hindi", "hi"),
    ("Spanish", "es"),
    ("French", "fr"),
    ("Chinese", "zh-CN"),
];

/// Map a language name (as sent by the client) to a provider language code
///
/// Exact names match first, then a case-insensitive match on the trimmed
/// name. Unrecognized names fall back to English.
///
/// # Examples
///
/// ```
/// use learnify::speech::language::language_code;
///
/// assert_eq!(language_code("Hindi"), "hi");
/// assert_eq!(language_code("chinese"), "zh-CN");
/// assert_eq!(language_code("Klingon"), "en");
/// ```
pub fn language_code(language: &str) -> &'static str {
    if let Some((_, code)) = LANGUAGE_CODES.iter().find(|(name, _)| *name == language) {
        return code;
    }

    let trimmed = language.trim();
    LANGUAGE_CODES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        .map(|(_, code)| *code)
        .unwrap_or(DEFAULT_LANGUAGE_CODE)
}
