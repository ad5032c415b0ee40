// file: src/query/filter.rs
// description: in-memory filtering of a message batch
// reference: internal query layer

use crate::models::{FilterState, Message};

pub fn matches(message: &Message, filters: &FilterState, needle_lowercase: &str) -> bool {
    filters.date_range.contains(&message.datetime)
        && filters.level.is_none_or(|level| message.triage_level == level)
        && filters
            .category
            .is_none_or(|category| message.triage_category == category)
        && (needle_lowercase.is_empty() || message.matches_text(needle_lowercase))
}

/// Messages satisfying every criterion, in their original order.
pub fn filter_messages<'a>(messages: &'a [Message], filters: &FilterState) -> Vec<&'a Message> {
    let needle = filters.search_query.trim().to_lowercase();

    messages
        .iter()
        .filter(|message| matches(message, filters, &needle))
        .collect()
}
