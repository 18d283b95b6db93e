//! # Date-Range Fuzzy Matcher Module
//!
//! ## Purpose
//! Decides whether an under-specified date fragment ("11", "11/", "11/02",
//! "11/02/2026") is consistent with a record's `[period_start, period_end]`
//! window, filling missing month/year parts from the window itself.
//!
//! ## Input/Output Specification
//! - **Input**: Query fragment, record date window, formatted timestamps
//! - **Output**: Boolean match decision
//! - **Heuristic**: The plain-substring fallback deliberately accepts false
//!   positives (typing "11" also matches an execution minute of "11"); the
//!   short-token path relies on this, so it must not be tightened.

use crate::normalize::normalize;
use crate::SearchRecord;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Render a date the way the UI shows it (Brazilian convention).
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Render an execution timestamp the way the UI shows it.
pub fn format_date_time(ts: DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y %H:%M").to_string()
}

/// Try to place a partially-typed date inside `[start, end]`.
///
/// The fragment is split on '/' into up to day/month/year. The day must
/// parse as an integer; missing month and year fall back to the window's
/// start. When the window spans a month boundary a second candidate is
/// built from the end month, so "02/" finds a window running from late
/// January into early February. A supplied but non-numeric month or year
/// invalidates the candidate outright.
pub fn date_fragment_matches(query: &str, start: NaiveDate, end: NaiveDate) -> bool {
    let mut parts = query.splitn(3, '/').map(str::trim);
    let day_part = parts.next().unwrap_or("");
    let month_part = parts.next().filter(|p| !p.is_empty());
    let year_part = parts.next().filter(|p| !p.is_empty());

    let Ok(day) = day_part.parse::<u32>() else {
        return false;
    };

    let month = match month_part.map(str::parse::<u32>) {
        None => None,
        Some(Ok(m)) => Some(m),
        Some(Err(_)) => return false,
    };
    let year = match year_part.map(str::parse::<i32>) {
        None => None,
        Some(Ok(y)) => Some(y),
        Some(Err(_)) => return false,
    };

    let in_range = |candidate: Option<NaiveDate>| {
        candidate.is_some_and(|d| d >= start && d <= end)
    };

    let first = NaiveDate::from_ymd_opt(
        year.unwrap_or(start.year()),
        month.unwrap_or(start.month()),
        day,
    );
    if in_range(first) {
        return true;
    }

    // A window crossing a month boundary gets a second chance against the
    // end month: the typed day may only make sense there.
    let spans_months = (start.year(), start.month()) != (end.year(), end.month());
    if spans_months {
        let second = NaiveDate::from_ymd_opt(
            year.unwrap_or(end.year()),
            month.unwrap_or(end.month()),
            day,
        );
        if in_range(second) {
            return true;
        }
    }

    false
}

/// Plain substring check against the record's formatted start date, end
/// date and execution timestamp. Always applied in addition to the
/// candidate dates; `normalized_query` must already be normalized.
pub fn formatted_dates_contain(record: &SearchRecord, normalized_query: &str) -> bool {
    if normalized_query.is_empty() {
        return false;
    }
    format_date(record.period_start).contains(normalized_query)
        || format_date(record.period_end).contains(normalized_query)
        || format_date_time(record.executed_at).contains(normalized_query)
}

/// Full §-style date decision for one record: fuzzy candidates OR the
/// formatted-substring fallback.
pub fn record_date_matches(record: &SearchRecord, query: &str) -> bool {
    let normalized = normalize(query);
    date_fragment_matches(&normalized, record.period_start, record.period_end)
        || formatted_dates_contain(record, &normalized)
}
