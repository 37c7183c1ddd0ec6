//! Conversion boundary for legacy event records
//!
//! Older exports store either a plain `date` string or a combined
//! `startsAt` timestamp. Everything past this module works with the
//! canonical `date` + optional `startTime`/`endTime` shape.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{CalendarError, CalendarResult};
use crate::models::{Event, EventDraft, EventId};

/// Loosely typed inbound event
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Identifier in the source system, used only for error reporting
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// RFC 3339 timestamp, e.g. `2024-03-20T23:00:00Z`
    pub starts_at: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default)]
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

/// How a batch reacts to a bad record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Log and skip the record
    #[default]
    Lenient,
    /// Fail the whole batch
    Strict,
}

impl EventRecord {
    fn malformed(&self, reason: impl Into<String>) -> CalendarError {
        CalendarError::MalformedEvent {
            id: EventId(self.id),
            reason: reason.into(),
        }
    }

    /// Convert to the canonical write model
    ///
    /// A combined `startsAt` is split into a date and `HH:MM` start time in
    /// `tz`. An explicit `date` wins over `startsAt`; an explicit
    /// `startTime` wins over the one derived from `startsAt`.
    pub fn into_draft(self, tz: &Tz) -> CalendarResult<EventDraft> {
        let (date, derived_start) = match (self.date.as_deref().map(str::trim), self.starts_at.as_deref()) {
            (Some(raw), _) if !raw.is_empty() => {
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|e| self.malformed(format!("invalid date '{}': {}", raw, e)))?;
                (Some(date), None)
            }
            (_, Some(raw)) if !raw.trim().is_empty() => {
                let local = DateTime::parse_from_rfc3339(raw.trim())
                    .map_err(|e| self.malformed(format!("invalid startsAt '{}': {}", raw, e)))?
                    .with_timezone(tz);
                (Some(local.date_naive()), Some(local.format("%H:%M").to_string()))
            }
            _ => (None, None),
        };

        if self.name.trim().is_empty() {
            return Err(self.malformed("missing name"));
        }

        let draft = EventDraft {
            name: self.name,
            date,
            start_time: self.start_time.or(derived_start),
            end_time: self.end_time,
            city: self.city,
            venue: self.venue,
            image_url: self.image_url,
            sales_link: self.sales_link,
            short_description: self.short_description,
            featured: self.featured,
            latitude: self.latitude,
            longitude: self.longitude,
        }
        .normalized();

        draft.validate().map_err(|e| CalendarError::MalformedEvent {
            id: EventId(self.id),
            reason: e.to_string(),
        })?;
        Ok(draft)
    }

    /// Convert to an in-memory `Event` carrying the record's id
    pub fn into_event(self, tz: &Tz) -> CalendarResult<Event> {
        let id = EventId(self.id);
        let draft = self.into_draft(tz)?;
        Ok(Event {
            id,
            name: draft.name,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            city: draft.city,
            venue: draft.venue,
            image_url: draft.image_url,
            sales_link: draft.sales_link,
            short_description: draft.short_description,
            featured: draft.featured,
            latitude: draft.latitude,
            longitude: draft.longitude,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        })
    }
}

/// Convert a batch of records
///
/// In lenient mode a bad record is logged and skipped so one broken row
/// cannot blank the whole calendar. In strict mode the first error aborts.
pub fn normalize_records(
    records: Vec<EventRecord>,
    tz: &Tz,
    mode: ParseMode,
) -> CalendarResult<Vec<EventDraft>> {
    let mut drafts = Vec::with_capacity(records.len());
    for record in records {
        match record.into_draft(tz) {
            Ok(draft) => drafts.push(draft),
            Err(e) if mode == ParseMode::Lenient => {
                tracing::warn!(error = %e, "skipping malformed event record");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(drafts)
}
