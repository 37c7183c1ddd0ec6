//! Event filtering and display ordering
//!
//! Filtering and ordering are separate steps. The public listing composes
//! `filter` with `sort_for_display(.., Some(city))`; the admin table uses
//! `filter` alone.
//!
//! Text matching lowercases both sides with `str::to_lowercase` and does a
//! plain substring test. No locale-aware collation or accent folding is done,
//! so "sao" does not match "São".

use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};
use crate::geo::haversine_km;
use crate::models::Event;

/// Filter criteria; every `None` field is unconstrained
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub name_contains: Option<String>,
    pub city_contains: Option<String>,
    /// Inclusive lower bound on `Event::date`
    pub on_or_after: Option<NaiveDate>,
    pub user_latitude: Option<f64>,
    pub user_longitude: Option<f64>,
    pub max_distance_km: Option<f64>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.name_contains.is_none()
            && self.city_contains.is_none()
            && self.on_or_after.is_none()
            && self.distance_bound().is_none()
    }

    /// `((lat, lon), max_km)` only when all three geo fields are present
    pub fn distance_bound(&self) -> Option<((f64, f64), f64)> {
        match (self.user_latitude, self.user_longitude, self.max_distance_km) {
            (Some(lat), Some(lon), Some(km)) => Some(((lat, lon), km)),
            _ => None,
        }
    }
}

/// Criteria with needles lowercased once per call
struct Matcher<'a> {
    criteria: &'a FilterCriteria,
    name: Option<String>,
    city: Option<String>,
    distance: Option<((f64, f64), f64)>,
}

impl<'a> Matcher<'a> {
    fn new(criteria: &'a FilterCriteria) -> Self {
        Self {
            criteria,
            name: criteria.name_contains.as_deref().map(str::to_lowercase),
            city: criteria.city_contains.as_deref().map(str::to_lowercase),
            distance: criteria.distance_bound(),
        }
    }

    /// `Err` only when a date bound meets an undated event
    fn check(&self, event: &Event) -> CalendarResult<bool> {
        if let Some(needle) = &self.name {
            if !event.name.to_lowercase().contains(needle.as_str()) {
                return Ok(false);
            }
        }
        if let Some(needle) = &self.city {
            if !event.city.to_lowercase().contains(needle.as_str()) {
                return Ok(false);
            }
        }
        if let Some(bound) = self.criteria.on_or_after {
            match event.date {
                Some(date) if date < bound => return Ok(false),
                Some(_) => {}
                None => {
                    return Err(CalendarError::MalformedEvent {
                        id: event.id,
                        reason: "missing date for date-bounded query".to_string(),
                    });
                }
            }
        }
        if let Some((origin, max_km)) = self.distance {
            match event.coordinates() {
                Some(point) if haversine_km(origin, point) <= max_km => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }
}

/// Keep the events that satisfy every supplied criterion, in input order
///
/// Undated events are dropped from date-bounded queries.
pub fn filter(events: &[Event], criteria: &FilterCriteria) -> Vec<Event> {
    if criteria.is_empty() {
        return events.to_vec();
    }
    let matcher = Matcher::new(criteria);
    events
        .iter()
        .filter(|e| matcher.check(e).unwrap_or(false))
        .cloned()
        .collect()
}

/// Like [`filter`], but an undated event in a date-bounded query is an error
pub fn filter_strict(events: &[Event], criteria: &FilterCriteria) -> CalendarResult<Vec<Event>> {
    let matcher = Matcher::new(criteria);
    let mut kept = Vec::new();
    for event in events {
        if matcher.check(event)? {
            kept.push(event.clone());
        }
    }
    Ok(kept)
}

/// Order events for the public listing
///
/// Featured first, then by date (undated last), then, when `reference_city`
/// is given, events in that city ahead of the rest. The sort is stable.
pub fn sort_for_display(events: &[Event], reference_city: Option<&str>) -> Vec<Event> {
    let reference = reference_city
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_lowercase);

    let mut sorted = events.to_vec();
    sorted.sort_by_cached_key(|e| {
        let local = reference
            .as_deref()
            .is_some_and(|r| e.city.to_lowercase().contains(r));
        (Reverse(e.featured), e.date.is_none(), e.date, Reverse(local))
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::event;

    fn names(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.name.as_str()).collect()
    }

    fn scenario() -> Vec<Event> {
        vec![
            event(1, "Rock Night", Some("2024-03-20"), "São Paulo", false),
            event(2, "Carnival", Some("2024-02-12"), "São Paulo", true),
        ]
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let events = scenario();
        assert_eq!(filter(&events, &FilterCriteria::default()), events);
    }

    #[test]
    fn test_name_case_insensitive() {
        let events = scenario();
        for query in ["rock", "ROCK", "Rock"] {
            let criteria = FilterCriteria {
                name_contains: Some(query.to_string()),
                ..Default::default()
            };
            assert_eq!(names(&filter(&events, &criteria)), vec!["Rock Night"]);
        }
    }

    #[test]
    fn test_city_substring() {
        let events = vec![
            event(1, "A", Some("2024-03-20"), "São Paulo", false),
            event(2, "B", Some("2024-03-21"), "Recife", false),
        ];
        let criteria = FilterCriteria {
            city_contains: Some("PAULO".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&filter(&events, &criteria)), vec!["A"]);
    }

    #[test]
    fn test_on_or_after_is_inclusive() {
        let events = vec![
            event(1, "Before", Some("2024-03-19"), "Recife", false),
            event(2, "On", Some("2024-03-20"), "Recife", false),
            event(3, "After", Some("2024-03-21"), "Recife", false),
            event(4, "Undated", None, "Recife", false),
        ];
        let criteria = FilterCriteria {
            on_or_after: NaiveDate::from_ymd_opt(2024, 3, 20),
            ..Default::default()
        };
        assert_eq!(names(&filter(&events, &criteria)), vec!["On", "After"]);
    }

    #[test]
    fn test_conjunction() {
        let events = vec![
            event(1, "Rock Night", Some("2024-03-20"), "Recife", false),
            event(2, "Rock Night", Some("2024-03-20"), "Olinda", false),
            event(3, "Jazz Night", Some("2024-03-20"), "Recife", false),
        ];
        let criteria = FilterCriteria {
            name_contains: Some("rock".to_string()),
            city_contains: Some("recife".to_string()),
            ..Default::default()
        };
        let kept = filter(&events, &criteria);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id.get(), 1);
    }

    #[test]
    fn test_distance_bound() {
        let mut near = event(1, "Near", Some("2024-03-20"), "Santos", false);
        near.latitude = Some(-23.9608);
        near.longitude = Some(-46.3336);
        let mut far = event(2, "Far", Some("2024-03-20"), "Manaus", false);
        far.latitude = Some(-3.1190);
        far.longitude = Some(-60.0217);
        let unplaced = event(3, "Unplaced", Some("2024-03-20"), "São Paulo", false);
        let events = vec![near, far, unplaced];

        let criteria = FilterCriteria {
            user_latitude: Some(-23.5505),
            user_longitude: Some(-46.6333),
            max_distance_km: Some(100.0),
            ..Default::default()
        };
        assert_eq!(names(&filter(&events, &criteria)), vec!["Near"]);

        // incomplete geo criteria impose no constraint
        let partial = FilterCriteria {
            user_latitude: Some(-23.5505),
            max_distance_km: Some(100.0),
            ..Default::default()
        };
        assert!(partial.is_empty());
        assert_eq!(filter(&events, &partial).len(), 3);
    }

    #[test]
    fn test_idempotent() {
        let events = vec![
            event(1, "Rock Night", Some("2024-03-20"), "Recife", true),
            event(2, "Rock Day", Some("2024-01-20"), "Recife", false),
            event(3, "Jazz", None, "Recife", false),
        ];
        let criteria = FilterCriteria {
            name_contains: Some("rock".to_string()),
            on_or_after: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..Default::default()
        };
        let once = filter(&events, &criteria);
        assert_eq!(filter(&once, &criteria), once);
    }

    #[test]
    fn test_strict_mode_reports_undated() {
        let events = vec![
            event(1, "Dated", Some("2024-03-20"), "Recife", false),
            event(7, "Undated", None, "Recife", false),
        ];
        let criteria = FilterCriteria {
            on_or_after: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        match filter_strict(&events, &criteria) {
            Err(CalendarError::MalformedEvent { id, .. }) => assert_eq!(id.get(), 7),
            other => panic!("Expected MalformedEvent, got {:?}", other),
        }

        // without a date bound the undated event is fine
        let by_name = FilterCriteria {
            name_contains: Some("dated".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_strict(&events, &by_name).unwrap().len(), 2);
    }

    #[test]
    fn test_sort_featured_then_locality() {
        let events = vec![
            event(1, "A", None, "X", false),
            event(2, "B", None, "Y", true),
            event(3, "C", None, "X", false),
        ];
        assert_eq!(names(&sort_for_display(&events, Some("X"))), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_sort_locality_partition_is_stable() {
        let events = vec![
            event(1, "Far1", Some("2024-03-20"), "Recife", false),
            event(2, "Near1", Some("2024-03-20"), "São Paulo", false),
            event(3, "Far2", Some("2024-03-20"), "Olinda", false),
            event(4, "Near2", Some("2024-03-20"), "sÃO PAULO", false),
        ];
        let sorted = sort_for_display(&events, Some("são paulo"));
        assert_eq!(names(&sorted), vec!["Near1", "Near2", "Far1", "Far2"]);
    }

    #[test]
    fn test_sort_chronological_within_featured() {
        let events = vec![
            event(1, "Late", Some("2024-05-01"), "Recife", false),
            event(2, "Undated", None, "Recife", false),
            event(3, "Early", Some("2024-01-01"), "Recife", false),
            event(4, "Featured late", Some("2024-12-01"), "Recife", true),
        ];
        let sorted = sort_for_display(&events, None);
        assert_eq!(names(&sorted), vec!["Featured late", "Early", "Late", "Undated"]);
    }

    #[test]
    fn test_sort_date_beats_locality() {
        let events = vec![
            event(1, "Elsewhere early", Some("2024-03-01"), "Recife", false),
            event(2, "Home late", Some("2024-03-02"), "Natal", false),
        ];
        let sorted = sort_for_display(&events, Some("natal"));
        assert_eq!(names(&sorted), vec!["Elsewhere early", "Home late"]);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let events = vec![
            event(1, "A", None, "X", false),
            event(2, "B", None, "Y", true),
        ];
        let before = events.clone();
        let _ = sort_for_display(&events, Some("x"));
        assert_eq!(events, before);
    }
}
