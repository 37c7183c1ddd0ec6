//! Day-of-month grouping of events
//!
//! The index does not filter by month; callers pass an already
//! month-scoped set (see [`crate::grid::month_events`]).

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::models::Event;

/// Events grouped by `date.day()`, input order preserved within each day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayBucketIndex {
    buckets: BTreeMap<u32, Vec<Event>>,
}

impl DayBucketIndex {
    /// Group events by day of month. Undated events are skipped.
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut buckets: BTreeMap<u32, Vec<Event>> = BTreeMap::new();
        for event in events {
            let Some(date) = event.date else {
                tracing::trace!(event_id = %event.id, "skipping undated event");
                continue;
            };
            buckets.entry(date.day()).or_default().push(event.clone());
        }
        Self { buckets }
    }

    /// Events on `day`, or an empty slice
    pub fn lookup(&self, day: u32) -> &[Event] {
        self.buckets.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn event_count(&self, day: u32) -> usize {
        self.lookup(day).len()
    }

    /// Days that have at least one event, ascending
    pub fn days(&self) -> Vec<u32> {
        self.buckets.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Remove and return the bucket for `day`
    pub(crate) fn take(&mut self, day: u32) -> Vec<Event> {
        self.buckets.remove(&day).unwrap_or_default()
    }
}

/// Free-function form of [`DayBucketIndex::from_events`]
pub fn index_by_day(events: &[Event]) -> DayBucketIndex {
    DayBucketIndex::from_events(events)
}
