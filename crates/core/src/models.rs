//! Core domain models for WhatsFest
//!
//! `Event` maps to the `events` table. `EventDraft` and `EventPatch` are the
//! write models used by the admin panel.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{CalendarError, CalendarResult};
use crate::validation::{
    MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MAX_PLACE_LENGTH, MAX_URL_LENGTH, validate_length,
    validate_no_control_chars, validate_not_blank, validate_safe_multiline_text,
    validate_time_of_day,
};

pub use crate::types::EventId;

/// Flyer shown when an event has no image of its own
pub const PLACEHOLDER_IMAGE_URL: &str = "/static/flyer-placeholder.png";

/// Event entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[derive(sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[schema(value_type = i64)]
    pub id: EventId,
    pub name: String,
    /// Day the event happens on; undated events never reach the calendar grid
    #[schema(value_type = Option<String>, example = "2024-03-20")]
    pub date: Option<NaiveDate>,
    #[schema(example = "20:00")]
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub city: String,
    pub venue: Option<String>,
    pub image_url: Option<String>,
    pub sales_link: Option<String>,
    pub short_description: Option<String>,
    pub featured: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Flyer URL to display, falling back to the placeholder
    pub fn image_or_placeholder(&self) -> &str {
        match self.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => PLACEHOLDER_IMAGE_URL,
        }
    }

    /// `(latitude, longitude)` when both are known
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Whether the event falls in the given 1-based month
    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        self.date
            .is_some_and(|d| d.year() == year && d.month() == month)
    }
}

/// Fields an admin supplies when creating or replacing an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    #[schema(example = "Rock Night")]
    pub name: String,
    #[schema(value_type = Option<String>, example = "2024-03-20")]
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[schema(example = "São Paulo")]
    pub city: String,
    pub venue: Option<String>,
    pub image_url: Option<String>,
    pub sales_link: Option<String>,
    pub short_description: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl EventDraft {
    /// Trim text fields and turn blank optional strings into `None`
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.city = self.city.trim().to_string();
        for field in [
            &mut self.start_time,
            &mut self.end_time,
            &mut self.venue,
            &mut self.image_url,
            &mut self.sales_link,
            &mut self.short_description,
        ] {
            *field = field
                .take()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
        }
        self
    }

    /// Check the draft before it is written
    pub fn validate(&self) -> CalendarResult<()> {
        self.check().map_err(CalendarError::InvalidEventData)
    }

    fn check(&self) -> Result<(), String> {
        validate_not_blank("name", &self.name)?;
        validate_length("name", &self.name, MAX_NAME_LENGTH)?;
        validate_no_control_chars("name", &self.name)?;

        validate_not_blank("city", &self.city)?;
        validate_length("city", &self.city, MAX_PLACE_LENGTH)?;
        validate_no_control_chars("city", &self.city)?;

        if let Some(venue) = &self.venue {
            validate_length("venue", venue, MAX_PLACE_LENGTH)?;
            validate_no_control_chars("venue", venue)?;
        }
        for (field, value) in [("imageUrl", &self.image_url), ("salesLink", &self.sales_link)] {
            if let Some(url) = value {
                validate_length(field, url, MAX_URL_LENGTH)?;
                validate_no_control_chars(field, url)?;
            }
        }
        if let Some(description) = &self.short_description {
            validate_length("shortDescription", description, MAX_DESCRIPTION_LENGTH)?;
            validate_safe_multiline_text("shortDescription", description)?;
        }
        if let Some(start) = &self.start_time {
            validate_time_of_day("startTime", start)?;
        }
        if let Some(end) = &self.end_time {
            validate_time_of_day("endTime", end)?;
        }
        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(format!("latitude out of range: {}", lat));
            }
        }
        if let Some(lon) = self.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(format!("longitude out of range: {}", lon));
            }
        }
        if self.latitude.is_some() != self.longitude.is_some() {
            return Err("latitude and longitude must be set together".to_string());
        }
        Ok(())
    }
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub city: Option<String>,
    pub venue: Option<String>,
    pub image_url: Option<String>,
    pub sales_link: Option<String>,
    pub short_description: Option<String>,
    pub featured: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl EventPatch {
    /// Merge this patch over the current state of an event
    pub fn apply(self, current: &Event) -> EventDraft {
        EventDraft {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            date: self.date.or(current.date),
            start_time: self.start_time.or_else(|| current.start_time.clone()),
            end_time: self.end_time.or_else(|| current.end_time.clone()),
            city: self.city.unwrap_or_else(|| current.city.clone()),
            venue: self.venue.or_else(|| current.venue.clone()),
            image_url: self.image_url.or_else(|| current.image_url.clone()),
            sales_link: self.sales_link.or_else(|| current.sales_link.clone()),
            short_description: self
                .short_description
                .or_else(|| current.short_description.clone()),
            featured: self.featured.unwrap_or(current.featured),
            latitude: self.latitude.or(current.latitude),
            longitude: self.longitude.or(current.longitude),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::event;
    use super::*;

    fn draft() -> EventDraft {
        EventDraft {
            name: "Rock Night".to_string(),
            city: "São Paulo".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_image_placeholder() {
        let mut e = event(1, "Rock Night", Some("2024-03-20"), "São Paulo", false);
        assert_eq!(e.image_or_placeholder(), PLACEHOLDER_IMAGE_URL);

        e.image_url = Some("  ".to_string());
        assert_eq!(e.image_or_placeholder(), PLACEHOLDER_IMAGE_URL);

        e.image_url = Some("/uploads/abc.png".to_string());
        assert_eq!(e.image_or_placeholder(), "/uploads/abc.png");
    }

    #[test]
    fn test_coordinates_require_both() {
        let mut e = event(1, "Rock Night", None, "Recife", false);
        e.latitude = Some(-8.05);
        assert_eq!(e.coordinates(), None);
        e.longitude = Some(-34.9);
        assert_eq!(e.coordinates(), Some((-8.05, -34.9)));
    }

    #[test]
    fn test_is_in_month() {
        let e = event(1, "Carnival", Some("2024-02-12"), "Olinda", true);
        assert!(e.is_in_month(2024, 2));
        assert!(!e.is_in_month(2024, 3));
        assert!(!e.is_in_month(2023, 2));

        let undated = event(2, "TBA", None, "Olinda", false);
        assert!(!undated.is_in_month(2024, 2));
    }

    #[test]
    fn test_draft_validation_accepts_minimal() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_draft_validation_rejects_blank_name() {
        let d = EventDraft {
            name: "   ".to_string(),
            ..draft()
        };
        match d.validate() {
            Err(CalendarError::InvalidEventData(msg)) => assert!(msg.contains("name")),
            other => panic!("Expected InvalidEventData, got {:?}", other),
        }
    }

    #[test]
    fn test_draft_validation_rejects_bad_time_and_coordinates() {
        let d = EventDraft {
            start_time: Some("8pm".to_string()),
            ..draft()
        };
        assert!(d.validate().is_err());

        let d = EventDraft {
            latitude: Some(120.0),
            longitude: Some(0.0),
            ..draft()
        };
        assert!(d.validate().is_err());

        let d = EventDraft {
            latitude: Some(-23.5),
            ..draft()
        };
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_draft_normalized_drops_blank_optionals() {
        let d = EventDraft {
            name: "  Rock Night ".to_string(),
            venue: Some("   ".to_string()),
            sales_link: Some(" https://tickets.example/rock ".to_string()),
            ..draft()
        }
        .normalized();

        assert_eq!(d.name, "Rock Night");
        assert_eq!(d.venue, None);
        assert_eq!(d.sales_link.as_deref(), Some("https://tickets.example/rock"));
    }

    #[test]
    fn test_patch_apply_keeps_unset_fields() {
        let mut current = event(3, "Samba", Some("2024-05-01"), "Rio de Janeiro", false);
        current.venue = Some("Lapa".to_string());

        let patch: EventPatch = serde_json::from_str(r#"{"name":"Samba de Roda","featured":true}"#).unwrap();
        let merged = patch.apply(&current);

        assert_eq!(merged.name, "Samba de Roda");
        assert!(merged.featured);
        assert_eq!(merged.city, "Rio de Janeiro");
        assert_eq!(merged.venue.as_deref(), Some("Lapa"));
        assert_eq!(merged.date, current.date);
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let e = event(1, "Rock Night", Some("2024-03-20"), "São Paulo", false);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["date"], "2024-03-20");
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["id"], 1);
    }
}
