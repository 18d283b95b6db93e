//! # Local Matcher Module
//!
//! ## Purpose
//! Synchronous matching of a query against in-memory records: date-fragment
//! candidates, formatted-date substrings, tribunal codes and the record id.
//! No suspension, no state; the composer calls this for date-like and
//! tribunal-like classifications.

use crate::dates;
use crate::normalize::normalize;
use crate::SearchRecord;

/// Does this record match the query under local rules?
///
/// The checks are a disjunction; classification decides *whether* the local
/// matcher runs, not which of its checks apply.
pub fn record_matches(record: &SearchRecord, query: &str) -> bool {
    let normalized = normalize(query.trim());
    if normalized.is_empty() {
        return true;
    }

    if dates::date_fragment_matches(&normalized, record.period_start, record.period_end) {
        return true;
    }

    if dates::formatted_dates_contain(record, &normalized) {
        return true;
    }

    if record
        .tribunals
        .iter()
        .any(|t| normalize(t).contains(&normalized))
    {
        return true;
    }

    record.id.to_string().contains(&normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn record(id: i64, tribunals: &[&str]) -> SearchRecord {
        SearchRecord {
            id,
            executed_at: Utc.with_ymd_and_hms(2026, 3, 10, 14, 30, 0).unwrap(),
            period_start: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            tribunals: tribunals.iter().map(|t| t.to_string()).collect(),
            total_results: 12,
            total_new: 3,
            duration_seconds: 7.0,
        }
    }

    #[test]
    fn matches_on_date_fragment() {
        let rec = record(7, &["TJSP"]);
        assert!(record_matches(&rec, "03/03"));
        assert!(!record_matches(&rec, "09/09"));
    }

    #[test]
    fn matches_tribunal_codes_insensitively() {
        let rec = record(7, &["TRT2", "TRT15"]);
        assert!(record_matches(&rec, "trt"));
        assert!(record_matches(&rec, "TRT15"));
        assert!(!record_matches(&rec, "tjsp"));
    }

    #[test]
    fn matches_id_digits() {
        let rec = record(4821, &["TJSP"]);
        assert!(record_matches(&rec, "482"));
        assert!(!record_matches(&rec, "999"));
    }

    #[test]
    fn blank_query_matches_everything() {
        let rec = record(1, &["TJSP"]);
        assert!(record_matches(&rec, "  "));
    }
}
