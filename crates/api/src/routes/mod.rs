//! API route modules

pub mod admin;
pub mod auth;
pub mod calendar;
pub mod cities;
pub mod events;
pub mod health;
pub mod uploads;
