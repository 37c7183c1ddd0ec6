//! Admin event management endpoints
//!
//! Every route here sits behind [`crate::middleware::admin_auth::require_admin`].

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use whatsfest_core::filter;
use whatsfest_core::legacy::{EventRecord, ParseMode, normalize_records};
use whatsfest_core::models::{Event, EventDraft, EventId, EventPatch};

use super::events::EventQuery;
use crate::AppState;
use crate::db::{self, events::EventOrder};
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImportQuery {
    /// Reject the whole batch on the first bad record
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub created: Vec<Event>,
    /// Records dropped in lenient mode
    pub skipped: usize,
}

/// Admin table of events
///
/// Filters apply but rows stay in date order; no featured or locality
/// ranking.
#[utoipa::path(
    get,
    path = "/api/admin/events",
    params(EventQuery),
    responses(
        (status = 200, description = "Events in date order", body = Vec<Event>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    ),
    tag = "admin",
    security(("admin_jwt" = []))
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let criteria = query.criteria()?;
    let events = db::events::list_events(&state.pool, EventOrder::DateAsc).await?;
    Ok(Json(filter(&events, &criteria)))
}

/// Create an event
#[utoipa::path(
    post,
    path = "/api/admin/events",
    request_body = EventDraft,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid event", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    ),
    tag = "admin",
    security(("admin_jwt" = []))
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(draft): Json<EventDraft>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let draft = draft.normalized();
    draft.validate()?;

    let event = db::events::create_event(&state.pool, &draft).await?;
    tracing::info!(event_id = %event.id, name = %event.name, "Event created");

    Ok((StatusCode::CREATED, Json(event)))
}

/// Update an event; absent fields keep their value
#[utoipa::path(
    put,
    path = "/api/admin/events/{id}",
    request_body = EventPatch,
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Invalid event", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    ),
    tag = "admin",
    security(("admin_jwt" = []))
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<Event>, ApiError> {
    let id = EventId(id);
    let current = db::events::get_event(&state.pool, id).await?;

    let draft = patch.apply(&current).normalized();
    draft.validate()?;

    let event = db::events::update_event(&state.pool, id, &draft).await?;
    tracing::info!(event_id = %id, "Event updated");

    Ok(Json(event))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/api/admin/events/{id}",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Event not found", body = crate::error::ErrorResponse)
    ),
    tag = "admin",
    security(("admin_jwt" = []))
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let id = EventId(id);
    db::events::delete_event(&state.pool, id).await?;
    tracing::info!(event_id = %id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Bulk import of loosely typed records
///
/// Records may carry a `date` or a combined `startsAt` timestamp, which is
/// split in the server timezone.
#[utoipa::path(
    post,
    path = "/api/admin/events/import",
    params(ImportQuery),
    request_body = Vec<EventRecord>,
    responses(
        (status = 201, description = "Records imported", body = ImportResponse),
        (status = 400, description = "Malformed record in strict mode", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    ),
    tag = "admin",
    security(("admin_jwt" = []))
)]
pub async fn import_events(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
    Json(records): Json<Vec<EventRecord>>,
) -> Result<(StatusCode, Json<ImportResponse>), ApiError> {
    let mode = if query.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };
    let received = records.len();

    let drafts = normalize_records(records, &state.timezone, mode)?;
    let created = db::events::create_events(&state.pool, &drafts).await?;
    let skipped = received - drafts.len();

    tracing::info!(received, created = created.len(), skipped, "Events imported");

    Ok((StatusCode::CREATED, Json(ImportResponse { created, skipped })))
}

/// Admin event routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/events", get(list_events).post(create_event))
        .route("/admin/events/import", post(import_events))
        .route("/admin/events/{id}", put(update_event).delete(delete_event))
}
