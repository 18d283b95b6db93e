//! # Text Normalizer Module
//!
//! ## Purpose
//! Case- and diacritic-insensitive string canonicalization, so that
//! "São Paulo" and "sao paulo" compare equal everywhere a query is held
//! against record text.
//!
//! ## Input/Output Specification
//! - **Input**: Arbitrary UTF-8 strings
//! - **Output**: Lowercased strings with combining diacritical marks removed
//! - **Properties**: Pure, total, idempotent

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a string for matching: NFD-decompose, strip combining
/// marks, lowercase.
pub fn normalize(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics_and_case() {
        assert_eq!(normalize("São"), "sao");
        assert_eq!(normalize("SAO"), "sao");
        assert_eq!(normalize("sao"), "sao");
        assert_eq!(normalize("Publicação Jurídica"), "publicacao juridica");
    }

    #[test]
    fn is_idempotent() {
        for input in ["São Paulo", "TRIBUNAL", "açaí", "", "11/02/2026"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn leaves_digits_and_separators_alone() {
        assert_eq!(normalize("0001234-56.2026"), "0001234-56.2026");
    }
}
