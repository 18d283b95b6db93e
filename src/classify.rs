//! # Query Classifier Module
//!
//! ## Purpose
//! Assigns every raw query string to the decision class that determines
//! which matcher handles it: nothing, the synchronous local matcher, or the
//! debounced remote dispatcher.
//!
//! ## Input/Output Specification
//! - **Input**: Raw query string (trimmed internally)
//! - **Output**: A `QueryClass`
//! - **Determinism**: Pure function of the input string; re-classifying
//!   after every keystroke always yields the same class for the same text
//!
//! Routing policy: any text of three or more characters that is neither
//! date-like nor tribunal-like goes to the remote matcher. The narrower
//! "six or more digits" policy from an earlier revision of the UI is not
//! used here; the two must not be mixed.

use crate::normalize::normalize;
use regex::Regex;
use std::sync::OnceLock;

/// Tribunal keywords recognized by default (lowercase, diacritic-free)
pub const DEFAULT_TRIBUNAL_KEYWORDS: &[&str] = &["tjsp", "trf", "trt", "tst", "stj", "stf"];

/// Decision class assigned to a raw query
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryClass {
    /// Zero-length after trimming; no filtering at all
    Empty,
    /// Fewer than three characters; never filtered, to keep the list from
    /// collapsing mid-keystroke
    ShortToken,
    /// Contains '/' or is a bare 1-2 digit day/month fragment; resolved by
    /// the local date-range matcher
    DateLike,
    /// Contains a known tribunal keyword; resolved locally
    TribunalLike,
    /// Anything else of length >= 3; dispatched to the remote matcher
    RemoteCandidate,
}

impl QueryClass {
    /// Whether this class routes to the debounced remote dispatcher
    pub fn is_remote(&self) -> bool {
        matches!(self, QueryClass::RemoteCandidate)
    }

    /// Whether the composer filters the visible list for this class
    pub fn filters_locally(&self) -> bool {
        matches!(self, QueryClass::DateLike | QueryClass::TribunalLike)
    }
}

fn bare_day_fragment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,2}$").expect("valid day fragment regex"))
}

/// Classify a raw query using the default tribunal keywords.
pub fn classify(raw: &str) -> QueryClass {
    classify_with(raw, DEFAULT_TRIBUNAL_KEYWORDS.iter().copied())
}

/// Classify a raw query against a caller-supplied tribunal keyword set.
///
/// Precedence is fixed: empty, short token, date-like, tribunal-like,
/// remote candidate. A bare "11" therefore lands in `ShortToken`, which the
/// composer leaves unfiltered; the date-range matcher still sees such
/// fragments through the local path when a '/' arrives.
pub fn classify_with<'a, I>(raw: &str, tribunal_keywords: I) -> QueryClass
where
    I: IntoIterator<Item = &'a str>,
{
    let query = raw.trim();

    if query.is_empty() {
        return QueryClass::Empty;
    }

    if query.chars().count() < 3 {
        return QueryClass::ShortToken;
    }

    if query.contains('/') || bare_day_fragment().is_match(query) {
        return QueryClass::DateLike;
    }

    let normalized = normalize(query);
    if tribunal_keywords
        .into_iter()
        .any(|keyword| normalized.contains(keyword))
    {
        return QueryClass::TribunalLike;
    }

    QueryClass::RemoteCandidate
}
