//! Event repository for database operations

use crate::error::ApiError;
use sqlx::PgPool;
use whatsfest_core::models::{Event, EventDraft, EventId};

/// Sort key for listing queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventOrder {
    /// Chronological, undated events last
    #[default]
    DateAsc,
    /// Most recently created first
    CreatedDesc,
}

impl EventOrder {
    const fn order_by(self) -> &'static str {
        match self {
            EventOrder::DateAsc => "date ASC NULLS LAST, id ASC",
            EventOrder::CreatedDesc => "created_at DESC, id DESC",
        }
    }
}

const INSERT_EVENT: &str = r#"
    INSERT INTO events (
        name, date, start_time, end_time, city, venue, image_url,
        sales_link, short_description, featured, latitude, longitude
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
    RETURNING *
"#;

/// Create a new event
pub async fn create_event(pool: &PgPool, draft: &EventDraft) -> Result<Event, ApiError> {
    let event = sqlx::query_as::<_, Event>(INSERT_EVENT)
        .bind(&draft.name)
        .bind(draft.date)
        .bind(&draft.start_time)
        .bind(&draft.end_time)
        .bind(&draft.city)
        .bind(&draft.venue)
        .bind(&draft.image_url)
        .bind(&draft.sales_link)
        .bind(&draft.short_description)
        .bind(draft.featured)
        .bind(draft.latitude)
        .bind(draft.longitude)
        .fetch_one(pool)
        .await?;

    Ok(event)
}

/// Create several events atomically
pub async fn create_events(pool: &PgPool, drafts: &[EventDraft]) -> Result<Vec<Event>, ApiError> {
    let mut tx = pool.begin().await?;
    let mut created = Vec::with_capacity(drafts.len());

    for draft in drafts {
        let event = sqlx::query_as::<_, Event>(INSERT_EVENT)
            .bind(&draft.name)
            .bind(draft.date)
            .bind(&draft.start_time)
            .bind(&draft.end_time)
            .bind(&draft.city)
            .bind(&draft.venue)
            .bind(&draft.image_url)
            .bind(&draft.sales_link)
            .bind(&draft.short_description)
            .bind(draft.featured)
            .bind(draft.latitude)
            .bind(draft.longitude)
            .fetch_one(&mut *tx)
            .await?;
        created.push(event);
    }

    tx.commit().await?;
    Ok(created)
}

/// Get event by ID
pub async fn get_event(pool: &PgPool, event_id: EventId) -> Result<Event, ApiError> {
    let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(event_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Event not found: {}", event_id)))?;

    Ok(event)
}

/// List every event in the given order
pub async fn list_events(pool: &PgPool, order: EventOrder) -> Result<Vec<Event>, ApiError> {
    let query = format!("SELECT * FROM events ORDER BY {}", order.order_by());
    let events = sqlx::query_as::<_, Event>(&query).fetch_all(pool).await?;

    Ok(events)
}

/// Replace every mutable field of an event
pub async fn update_event(
    pool: &PgPool,
    event_id: EventId,
    draft: &EventDraft,
) -> Result<Event, ApiError> {
    let event = sqlx::query_as::<_, Event>(
        r#"
        UPDATE events
        SET name = $2,
            date = $3,
            start_time = $4,
            end_time = $5,
            city = $6,
            venue = $7,
            image_url = $8,
            sales_link = $9,
            short_description = $10,
            featured = $11,
            latitude = $12,
            longitude = $13,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(event_id)
    .bind(&draft.name)
    .bind(draft.date)
    .bind(&draft.start_time)
    .bind(&draft.end_time)
    .bind(&draft.city)
    .bind(&draft.venue)
    .bind(&draft.image_url)
    .bind(&draft.sales_link)
    .bind(&draft.short_description)
    .bind(draft.featured)
    .bind(draft.latitude)
    .bind(draft.longitude)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Event not found: {}", event_id)))?;

    Ok(event)
}

/// Delete an event
pub async fn delete_event(pool: &PgPool, event_id: EventId) -> Result<(), ApiError> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(event_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(format!("Event not found: {}", event_id)));
    }

    Ok(())
}
