//! Error types for WhatsFest core domain logic

use thiserror::Error;

use crate::types::EventId;

/// Core calendar domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Malformed event {id}: {reason}")]
    MalformedEvent { id: EventId, reason: String },

    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    #[error("Invalid event data: {0}")]
    InvalidEventData(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Result type alias for calendar operations
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}
