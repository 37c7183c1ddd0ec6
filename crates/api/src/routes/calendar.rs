//! Month calendar and day detail endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use whatsfest_core::grid::month_events;
use whatsfest_core::models::Event;
use whatsfest_core::{DayBucketIndex, MonthGrid, days_in_month, filter, sort_for_display, today_in};

use super::events::{EventQuery, load_public_events};
use crate::AppState;
use crate::error::ApiError;

/// Events on a single calendar day
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayDetail {
    #[schema(value_type = String, example = "2024-03-20")]
    pub date: NaiveDate,
    pub events: Vec<Event>,
}

/// Filtered events in display order, so each cell lists featured and
/// local events first
async fn visible_events(state: &AppState, query: &EventQuery) -> Result<Vec<Event>, ApiError> {
    let criteria = query.criteria()?;
    let events = load_public_events(&state.pool).await;
    Ok(sort_for_display(
        &filter(&events, &criteria),
        query.reference_city(&state.cities),
    ))
}

/// Month grid with leading blanks and per-day events
#[utoipa::path(
    get,
    path = "/api/calendar/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Month, 1 = January"),
        EventQuery
    ),
    responses(
        (status = 200, description = "Calendar grid", body = MonthGrid),
        (status = 400, description = "Invalid month or query", body = crate::error::ErrorResponse)
    ),
    tag = "calendar"
)]
pub async fn month_grid(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Query(query): Query<EventQuery>,
) -> Result<Json<MonthGrid>, ApiError> {
    // reject before touching the database
    days_in_month(year, month)?;

    let events = visible_events(&state, &query).await?;
    let grid = MonthGrid::build(&events, year, month, today_in(&state.timezone))?;

    tracing::debug!(year, month, busy_days = grid.busy_days(), "Built month grid");
    Ok(Json(grid))
}

/// Events on one day of a month
#[utoipa::path(
    get,
    path = "/api/calendar/{year}/{month}/{day}",
    params(
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Month, 1 = January"),
        ("day" = u32, Path, description = "Day of month"),
        EventQuery
    ),
    responses(
        (status = 200, description = "Events on the day", body = DayDetail),
        (status = 400, description = "Invalid date or query", body = crate::error::ErrorResponse)
    ),
    tag = "calendar"
)]
pub async fn day_detail(
    State(state): State<AppState>,
    Path((year, month, day)): Path<(i32, u32, u32)>,
    Query(query): Query<EventQuery>,
) -> Result<Json<DayDetail>, ApiError> {
    let last_day = days_in_month(year, month)?;
    if !(1..=last_day).contains(&day) {
        return Err(ApiError::BadRequest(format!(
            "Day {} is outside 1..={} for {}-{:02}",
            day, last_day, year, month
        )));
    }
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ApiError::BadRequest(format!("Unsupported date {}-{:02}-{:02}", year, month, day)))?;

    let events = visible_events(&state, &query).await?;
    let index = DayBucketIndex::from_events(month_events(&events, year, month));

    Ok(Json(DayDetail {
        date,
        events: index.lookup(day).to_vec(),
    }))
}

/// Calendar routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calendar/{year}/{month}", get(month_grid))
        .route("/calendar/{year}/{month}/{day}", get(day_detail))
}
