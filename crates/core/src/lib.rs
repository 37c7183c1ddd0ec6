//! WhatsFest Core - Domain logic and models
//!
//! This crate contains pure domain logic with no I/O operations: the event
//! model, calendar month grids, day bucketing, and event filtering/ordering.
//! Every function here is a pure computation over its arguments.

pub mod buckets;
pub mod cities;
pub mod config;
pub mod error;
pub mod filter;
pub mod geo;
pub mod grid;
pub mod legacy;
pub mod models;
pub mod security;
pub mod timezone;
pub mod types;
pub mod validation;

pub use buckets::{DayBucketIndex, index_by_day};
pub use error::{CalendarError, CalendarResult};
pub use filter::{FilterCriteria, filter, filter_strict, sort_for_display};
pub use grid::{GridCell, MonthGrid, build_grid, days_in_month, first_weekday};
pub use timezone::{parse_timezone, today_in, validate_timezone};
