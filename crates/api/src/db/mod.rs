//! Database repository modules

pub mod events;
