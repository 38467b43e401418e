//! # subtally-core
//!
//! Core library for subtally - a subscription-tracking backend.
//!
//! This library provides:
//! - Domain types for subscription records
//! - SQLite storage layer with embedded migrations
//! - The analytics aggregation engine
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through two layers:
//! - **Canonical:** subscription records persisted in SQLite
//! - **Derived:** the analytics report, recomputed in full from a snapshot
//!   of the canonical records on every request (no caching, no hidden state)
//!
//! ## Example
//!
//! ```rust,no_run
//! use subtally_core::{analytics, Config, Database};
//!
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let snapshot = db.list_subscriptions().expect("failed to read records");
//! let report = analytics::build_report(&snapshot);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod types;
