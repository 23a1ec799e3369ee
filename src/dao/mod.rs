//! Read-only data sources feeding a game session.

pub mod catalog;
