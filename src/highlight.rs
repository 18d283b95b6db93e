//! # Detail Highlight Propagator Module
//!
//! ## Purpose
//! Applies the digit-substring matching idea to the line items inside one
//! opened record: the query's digits must appear contiguously inside an
//! item's process-reference digits for the item to be flagged.
//!
//! ## Input/Output Specification
//! - **Input**: A record's line items and the highlight query (meaningful
//!   only when that query classified as a remote candidate)
//! - **Output**: Ordered ids of matching items; nothing is removed from the
//!   detail view, items are only flagged

use crate::{ItemId, LineItem};

fn digits_of(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Return the ids of line items whose process reference contains the
/// query's digit string. Item order is preserved; an empty digit query
/// flags nothing.
pub fn propagate_highlight(items: &[LineItem], query: &str) -> Vec<ItemId> {
    let query_digits = digits_of(query);
    if query_digits.is_empty() {
        return Vec::new();
    }

    items
        .iter()
        .filter(|item| {
            item.process_reference
                .as_deref()
                .is_some_and(|reference| digits_of(reference).contains(&query_digits))
        })
        .map(|item| item.id)
        .collect()
}
