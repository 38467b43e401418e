//! Database layer for subtally
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Repository pattern for queries
//! - Per-field degradation when mapping rows (bad stored dates become
//!   `None`, bad prices become `0.0`) so one malformed record never
//!   poisons a snapshot read

pub mod repo;
pub mod schema;

pub use repo::Database;
