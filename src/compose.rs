//! # Result Composer Module
//!
//! ## Purpose
//! Merges the classification, local matcher outcome and remote dispatcher
//! state into the visible record list and the highlight-id set. Pure: the
//! caller decides when to recompute and re-render.
//!
//! ## Input/Output Specification
//! - **Input**: The record page and a `QueryState` snapshot
//! - **Output**: `Composition { visible_records, highlight_ids }`
//! - **No-flicker contract**: for remote-candidate queries the visible set
//!   is always the full zero-filtered list, whether the request is pending,
//!   failed or returned nothing; only the highlight set changes. Records
//!   are never hidden on the basis of a remote query.

use crate::classify::QueryClass;
use crate::engine::QueryState;
use crate::local;
use crate::{RecordId, SearchRecord};
use std::collections::HashSet;

/// Composed view of the history list for one query state.
#[derive(Debug, Clone)]
pub struct Composition {
    /// Records the UI should render, in input order
    pub visible_records: Vec<SearchRecord>,
    /// Records to badge as remote matches; never used for exclusion
    pub highlight_ids: HashSet<RecordId>,
}

/// Compose the visible list and highlight set for the given state.
///
/// Records with zero results are dropped unconditionally first; a search
/// that found nothing is never shown in history, independent of the query.
pub fn compose_results(records: &[SearchRecord], state: &QueryState) -> Composition {
    let with_results = records
        .iter()
        .filter(|r| r.total_results > 0)
        .cloned()
        .collect::<Vec<_>>();

    match state.class {
        QueryClass::Empty | QueryClass::ShortToken => Composition {
            visible_records: with_results,
            highlight_ids: HashSet::new(),
        },
        QueryClass::DateLike | QueryClass::TribunalLike => Composition {
            visible_records: with_results
                .into_iter()
                .filter(|r| local::record_matches(r, &state.raw))
                .collect(),
            highlight_ids: HashSet::new(),
        },
        QueryClass::RemoteCandidate => Composition {
            visible_records: with_results,
            highlight_ids: state.match_ids.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn record(id: i64, start: (i32, u32, u32), end: (i32, u32, u32), total: u32) -> SearchRecord {
        SearchRecord {
            id,
            executed_at: Utc.with_ymd_and_hms(2026, 3, 10, 14, 30, 0).unwrap(),
            period_start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            period_end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            tribunals: vec!["TJSP".to_string(), "TRT2".to_string()],
            total_results: total,
            total_new: 0,
            duration_seconds: 1.0,
        }
    }

    fn state(raw: &str, match_ids: HashSet<RecordId>, pending: bool) -> QueryState {
        QueryState {
            class: classify(raw),
            raw: raw.trim().to_string(),
            pending,
            match_ids,
        }
    }

    fn ids(composition: &Composition) -> Vec<i64> {
        composition.visible_records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn zero_result_records_never_appear() {
        let records = vec![
            record(1, (2026, 1, 28), (2026, 2, 3), 5),
            record(2, (2026, 3, 1), (2026, 3, 5), 0),
        ];
        for raw in ["", "02/", "trt", "silva"] {
            let composition = compose_results(&records, &state(raw, HashSet::new(), false));
            assert!(
                !ids(&composition).contains(&2),
                "zero-result record leaked for query {raw:?}"
            );
        }
    }

    #[test]
    fn short_queries_leave_the_list_whole() {
        let records = vec![
            record(1, (2026, 1, 28), (2026, 2, 3), 5),
            record(2, (2026, 3, 1), (2026, 3, 5), 8),
        ];
        for raw in ["", " ", "1", "ab"] {
            let composition = compose_results(&records, &state(raw, HashSet::new(), false));
            assert_eq!(ids(&composition), vec![1, 2]);
            assert!(composition.highlight_ids.is_empty());
        }
    }

    #[test]
    fn date_like_filters_by_fuzzy_window() {
        // Day 2 only fits record 1's window via the end-month fallback.
        let records = vec![
            record(1, (2026, 1, 28), (2026, 2, 3), 5),
            record(2, (2026, 3, 1), (2026, 3, 5), 0),
        ];
        let composition = compose_results(&records, &state("02/", HashSet::new(), false));
        assert_eq!(ids(&composition), vec![1]);
        assert!(composition.highlight_ids.is_empty());
    }

    #[test]
    fn tribunal_like_filters_locally() {
        let mut records = vec![
            record(1, (2026, 1, 28), (2026, 2, 3), 5),
            record(2, (2026, 3, 1), (2026, 3, 5), 4),
        ];
        records[1].tribunals = vec!["STJ".to_string()];
        let composition = compose_results(&records, &state("trt", HashSet::new(), false));
        assert_eq!(ids(&composition), vec![1]);
    }

    #[test]
    fn remote_candidate_visible_set_is_invariant() {
        let records = vec![
            record(1, (2026, 1, 28), (2026, 2, 3), 5),
            record(2, (2026, 3, 1), (2026, 3, 5), 4),
        ];

        // Pending: all non-zero records, no highlights yet.
        let pending = compose_results(&records, &state("00012345678", HashSet::new(), true));
        assert_eq!(ids(&pending), vec![1, 2]);
        assert!(pending.highlight_ids.is_empty());

        // Resolved with matches: same visible set, highlights populated.
        let resolved =
            compose_results(&records, &state("00012345678", HashSet::from([2]), false));
        assert_eq!(ids(&resolved), ids(&pending));
        assert_eq!(resolved.highlight_ids, HashSet::from([2]));

        // Resolved with nothing: still the same visible set.
        let empty = compose_results(&records, &state("00012345678", HashSet::new(), false));
        assert_eq!(ids(&empty), ids(&pending));
        assert!(empty.highlight_ids.is_empty());
    }
}
