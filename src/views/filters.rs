use crate::models::{Event, EventFilters};

const ALL_TYPES: &str = "All";

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Narrow an event listing the way the browse page does.
pub fn filter_events(events: &[Event], filters: &EventFilters) -> Vec<Event> {
    let search = non_empty(&filters.search);
    let event_type = non_empty(&filters.event_type).filter(|t| *t != ALL_TYPES);
    let location = non_empty(&filters.location);

    events
        .iter()
        .filter(|event| {
            search.map_or(true, |q| {
                contains_ignore_case(&event.name, q) || contains_ignore_case(&event.description, q)
            })
        })
        .filter(|event| event_type.map_or(true, |t| event.event_type == t))
        .filter(|event| location.map_or(true, |l| contains_ignore_case(&event.location, l)))
        .filter(|event| filters.date_from.map_or(true, |from| event.date >= from))
        .filter(|event| filters.date_to.map_or(true, |to| event.date <= to))
        .cloned()
        .collect()
}
