use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Comparison key for names that must be unique regardless of case and accents.
///
/// Two strings collide when their keys are equal: "León", "LEON" and "leon"
/// all share the key `leon`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollationKey(String);

impl CollationKey {
    pub fn new(value: &str) -> Self {
        // Lowercasing can itself produce combining marks ("İ" becomes "i" + U+0307)
        let folded = value
            .trim()
            .to_lowercase()
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect::<String>();
        Self(folded)
    }

    /// Rebuild from a key that was already folded (e.g. read from storage)
    pub fn from_folded(folded: String) -> Self {
        Self(folded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CollationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_is_ignored() {
        assert_eq!(CollationKey::new("Rex"), CollationKey::new("rex"));
        assert_eq!(CollationKey::new("REX"), CollationKey::new("rEx"));
    }

    #[test]
    fn test_diacritics_are_ignored() {
        assert_eq!(CollationKey::new("León"), CollationKey::new("leon"));
        assert_eq!(CollationKey::new("Zoë"), CollationKey::new("zoe"));
        assert_eq!(CollationKey::new("Ñandú").as_str(), "nandu");
    }

    #[test]
    fn test_precomposed_and_decomposed_forms_match() {
        // U+00E9 vs "e" + U+0301
        assert_eq!(CollationKey::new("caf\u{e9}"), CollationKey::new("cafe\u{301}"));
    }

    #[test]
    fn test_marks_introduced_by_lowercasing_are_dropped() {
        assert_eq!(CollationKey::new("\u{130}zmir"), CollationKey::new("izmir"));
        assert_eq!(CollationKey::new("\u{130}zmir").as_str(), "izmir");
    }

    #[test]
    fn test_distinct_names_stay_distinct() {
        assert_ne!(CollationKey::new("Rex"), CollationKey::new("Rexy"));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(CollationKey::new("  Rex "), CollationKey::new("rex"));
    }
}
