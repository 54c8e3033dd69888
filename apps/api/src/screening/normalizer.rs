//! Text Normalizer — lowercases and keeps only `a-z` and spaces.
//!
//! Removed characters are dropped, not replaced: `"C++/Go"` becomes `"cgo"`.
//! Tabs and newlines are removed as well; only the literal space survives.

/// Lowercases `text` and strips every character outside `a-z` and `' '`.
///
/// Lowercasing happens first, so Unicode letters whose lowercase form is an
/// ASCII letter (e.g. the Kelvin sign) are kept; every other non-ASCII
/// letter is removed.
pub fn clean_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == ' ')
        .collect()
}

/// Builds the attribute string the classifiers are fed: `"{skills} {education} {experience}"`.
pub fn attribute_text(skills: &str, education: &str, experience: u32) -> String {
    format!("{skills} {education} {experience}")
}
