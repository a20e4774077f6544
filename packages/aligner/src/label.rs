//! Label normalization for cross-variant matching.
//!
//! A unit's label ("Artikel 5", "Chapitre III") is reduced to the value of
//! its first embedded numeral. Only the first numeral counts, so a label
//! carrying an amendment reference is numbered by its primary locator.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// First numeral in a label: an uppercase roman run, or digits.
///
/// A roman run must end the word, or be followed by a French ordinal suffix
/// ("Ier", "IIe") or a single letter suffix ("IIA"). Otherwise capitals
/// inside words ("CHAPITRE") would be read as numerals. Suffixes only apply
/// to runs of I, V and X so that words like "De" or "LA" stay unkeyed. Digit
/// runs need no boundary so that "5a" still yields 5.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NUMERAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:([IVXLCDM]+)|([IVX]+)(?:er|re|e|[A-Z]))\b|(\d+)").expect("valid regex")
});

/// Comparable key derived from a structural unit's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelKey(u32);

impl LabelKey {
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extract the normalized key from a raw label.
///
/// Roman and arabic numerals compare by value, so "Artikel 5" and
/// "Article V" produce the same key.
///
/// # Examples
/// ```
/// use lexlink_aligner::label::{normalize_label, LabelKey};
///
/// assert_eq!(normalize_label("Artikel 5"), Some(LabelKey::new(5)));
/// assert_eq!(normalize_label("Chapitre III"), Some(LabelKey::new(3)));
/// assert_eq!(normalize_label("Slotbepalingen"), None);
/// ```
#[must_use]
pub fn normalize_label(label: &str) -> Option<LabelKey> {
    let caps = NUMERAL_PATTERN.captures(label)?;

    if let Some(roman) = caps.get(1).or_else(|| caps.get(2)) {
        return roman_to_u32(roman.as_str()).map(LabelKey);
    }

    caps.get(3)
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
        .map(LabelKey)
}

/// Convert an uppercase roman numeral to its value.
///
/// Uses the subtractive rule (a smaller symbol before a larger one is
/// subtracted). Non-canonical forms such as "IIII" are accepted.
fn roman_to_u32(roman: &str) -> Option<u32> {
    let values: Vec<u32> = roman
        .chars()
        .map(|c| match c {
            'I' => Some(1),
            'V' => Some(5),
            'X' => Some(10),
            'L' => Some(50),
            'C' => Some(100),
            'D' => Some(500),
            'M' => Some(1000),
            _ => None,
        })
        .collect::<Option<_>>()?;

    let mut total: i64 = 0;
    for (i, value) in values.iter().enumerate() {
        let next = values.get(i + 1).copied().unwrap_or(0);
        if *value < next {
            total -= i64::from(*value);
        } else {
            total += i64::from(*value);
        }
    }
    u32::try_from(total).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arabic_labels() {
        assert_eq!(normalize_label("Artikel 1"), Some(LabelKey::new(1)));
        assert_eq!(normalize_label("Article 27"), Some(LabelKey::new(27)));
        assert_eq!(normalize_label("Artikel 5a"), Some(LabelKey::new(5)));
        assert_eq!(normalize_label("12"), Some(LabelKey::new(12)));
    }

    #[test]
    fn test_roman_labels() {
        assert_eq!(normalize_label("Hoofdstuk I"), Some(LabelKey::new(1)));
        assert_eq!(normalize_label("Chapitre IV"), Some(LabelKey::new(4)));
        assert_eq!(normalize_label("CHAPITRE IX"), Some(LabelKey::new(9)));
        assert_eq!(normalize_label("Kapitel XIV"), Some(LabelKey::new(14)));
        assert_eq!(normalize_label("Deel MCMXC"), Some(LabelKey::new(1990)));
    }

    #[test]
    fn test_french_ordinal_suffixes() {
        assert_eq!(normalize_label("Chapitre Ier"), Some(LabelKey::new(1)));
        assert_eq!(normalize_label("Titre Ire"), Some(LabelKey::new(1)));
        assert_eq!(normalize_label("Chapitre IIe"), Some(LabelKey::new(2)));
        assert_eq!(normalize_label("Hoofdstuk I"), normalize_label("Chapitre Ier"));
    }

    #[test]
    fn test_letter_suffixes() {
        assert_eq!(normalize_label("Hoofdstuk IIA"), Some(LabelKey::new(2)));
        assert_eq!(normalize_label("Chapitre XIVB"), Some(LabelKey::new(14)));
    }

    #[test]
    fn test_suffix_does_not_key_ordinary_words() {
        assert_eq!(normalize_label("De slotbepalingen"), None);
        assert_eq!(normalize_label("Mer territoriale"), None);
        assert_eq!(normalize_label("LA CONVENTION"), None);
    }

    #[test]
    fn test_roman_and_arabic_compare_by_value() {
        assert_eq!(normalize_label("Artikel 5"), normalize_label("Article V"));
        assert_ne!(normalize_label("Hoofdstuk II"), normalize_label("Chapitre III"));
    }

    #[test]
    fn test_first_numeral_wins() {
        assert_eq!(normalize_label("Artikel 3 (gewijzigd bij artikel 7)"), Some(LabelKey::new(3)));
        assert_eq!(normalize_label("Hoofdstuk II, artikel 9"), Some(LabelKey::new(2)));
    }

    #[test]
    fn test_capitals_inside_words_are_not_numerals() {
        assert_eq!(normalize_label("CHAPITRE"), None);
        assert_eq!(normalize_label("MIDDEL"), None);
        assert_eq!(normalize_label("Slotbepalingen"), None);
        assert_eq!(normalize_label(""), None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let first = normalize_label("Chapitre VI");
        let second = normalize_label("Chapitre VI");
        assert_eq!(first, second);
    }

    #[test]
    fn test_roman_to_u32() {
        assert_eq!(roman_to_u32("I"), Some(1));
        assert_eq!(roman_to_u32("IV"), Some(4));
        assert_eq!(roman_to_u32("IX"), Some(9));
        assert_eq!(roman_to_u32("XL"), Some(40));
        assert_eq!(roman_to_u32("XCIX"), Some(99));
        assert_eq!(roman_to_u32("IIII"), Some(4));
        assert_eq!(roman_to_u32("A"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(LabelKey::new(14).to_string(), "14");
    }
}
