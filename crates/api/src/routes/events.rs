//! Public event listing endpoints

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use utoipa::IntoParams;
use whatsfest_core::cities::CityCatalog;
use whatsfest_core::models::{Event, EventId};
use whatsfest_core::{FilterCriteria, filter, sort_for_display};

use crate::AppState;
use crate::db::{self, events::EventOrder};
use crate::error::ApiError;

/// Filters shared by the listing and calendar endpoints
///
/// Values are taken as raw strings so that blank form fields
/// (`?city=&from=`) mean "no constraint" rather than a parse error.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EventQuery {
    /// City the visitor is browsing from; its events sort first
    pub city_hint: Option<String>,
    /// Case-insensitive substring of the event name
    pub name: Option<String>,
    /// Case-insensitive substring of the city
    pub city: Option<String>,
    /// Only events on or after this date (`YYYY-MM-DD`)
    pub from: Option<String>,
    /// Visitor latitude
    pub lat: Option<String>,
    /// Visitor longitude
    pub lon: Option<String>,
    /// Radius around (`lat`, `lon`) in kilometres
    pub max_km: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_param<T: FromStr>(name: &str, value: Option<&String>) -> Result<Option<T>, ApiError> {
    non_blank(value)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid value for '{}': {}", name, v)))
        })
        .transpose()
}

impl EventQuery {
    pub fn city_hint(&self) -> Option<&str> {
        non_blank(self.city_hint.as_ref())
    }

    /// City name to prioritise; an autocomplete label such as
    /// `"Santos (SP)"` is reduced to `"Santos"`
    pub fn reference_city<'a>(&'a self, cities: &'a CityCatalog) -> Option<&'a str> {
        self.city_hint()
            .map(|hint| cities.city_name(hint).unwrap_or(hint))
    }

    /// Build filter criteria, dropping blank values
    pub fn criteria(&self) -> Result<FilterCriteria, ApiError> {
        let on_or_after = non_blank(self.from.as_ref())
            .map(|v| {
                NaiveDate::parse_from_str(v, "%Y-%m-%d")
                    .map_err(|_| ApiError::BadRequest(format!("Invalid date for 'from': {}", v)))
            })
            .transpose()?;

        Ok(FilterCriteria {
            name_contains: non_blank(self.name.as_ref()).map(str::to_string),
            city_contains: non_blank(self.city.as_ref()).map(str::to_string),
            on_or_after,
            user_latitude: parse_param("lat", self.lat.as_ref())?,
            user_longitude: parse_param("lon", self.lon.as_ref())?,
            max_distance_km: parse_param("maxKm", self.max_km.as_ref())?,
        })
    }
}

/// Load every event for a public view, degrading to an empty list when
/// the database is unavailable
pub(crate) async fn load_public_events(pool: &PgPool) -> Vec<Event> {
    match db::events::list_events(pool, EventOrder::DateAsc).await {
        Ok(events) => events,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to load events, serving empty list");
            Vec::new()
        }
    }
}

/// List events for the home page
///
/// Featured events come first, then upcoming events by date, with events
/// in `cityHint` ahead of others on the same day.
#[utoipa::path(
    get,
    path = "/api/events",
    params(EventQuery),
    responses(
        (status = 200, description = "Filtered events in display order", body = Vec<Event>),
        (status = 400, description = "Malformed query parameter", body = crate::error::ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let criteria = query.criteria()?;
    let events = load_public_events(&state.pool).await;

    let matching = filter(&events, &criteria);
    tracing::debug!(
        total = events.len(),
        matching = matching.len(),
        "Filtered public events"
    );

    Ok(Json(sort_for_display(
        &matching,
        query.reference_city(&state.cities),
    )))
}

/// Get event by ID
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event details", body = Event),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Event>, ApiError> {
    let event = db::events::get_event(&state.pool, EventId(id)).await?;
    Ok(Json(event))
}

/// Public event routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/{id}", get(get_event))
}
