//! Database repository layer
//!
//! Provides query and mutation operations for subscription records.

use crate::error::{Error, Result};
use crate::types::{NewSubscription, Subscription, SubscriptionPatch, SubscriptionStatus};
use chrono::NaiveDate;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use std::sync::Mutex;

/// Storage format for renewal dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database handle with connection pooling (single connection for now)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL mode for better concurrency between readers and the writer
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    // ============================================
    // Subscription operations
    // ============================================

    /// List all subscriptions in insertion order.
    ///
    /// This is the snapshot read the analytics engine consumes: one query,
    /// consistent as of that query, no partial reads.
    pub fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, price, renewal_date, status FROM subscriptions ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], Self::row_to_subscription)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Get a subscription by id
    pub fn get_subscription(&self, id: i64) -> Result<Option<Subscription>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, name, price, renewal_date, status FROM subscriptions WHERE id = ?",
            [id],
            Self::row_to_subscription,
        )
        .optional()
        .map_err(Error::from)
    }

    /// Insert a new subscription and return the stored record.
    ///
    /// The status enum is converted to its storage string here; this is the
    /// only place the enum crosses into the store.
    pub fn insert_subscription(&self, new: &NewSubscription) -> Result<Subscription> {
        let id = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO subscriptions (name, price, renewal_date, status)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    new.name,
                    new.price,
                    new.renewal_date.format(DATE_FORMAT).to_string(),
                    new.status.as_str(),
                ],
            )?;
            conn.last_insert_rowid()
        };

        self.get_subscription(id)?
            .ok_or(Error::SubscriptionNotFound(id))
    }

    /// Apply a partial update to a subscription.
    ///
    /// Returns `None` if no record with that id exists.
    pub fn update_subscription(
        &self,
        id: i64,
        patch: &SubscriptionPatch,
    ) -> Result<Option<Subscription>> {
        if self.get_subscription(id)?.is_none() {
            return Ok(None);
        }

        {
            let conn = self.conn.lock().unwrap();
            if let Some(name) = &patch.name {
                conn.execute(
                    "UPDATE subscriptions SET name = ?1 WHERE id = ?2",
                    params![name, id],
                )?;
            }
            if let Some(price) = patch.price {
                conn.execute(
                    "UPDATE subscriptions SET price = ?1 WHERE id = ?2",
                    params![price, id],
                )?;
            }
            if let Some(renewal_date) = patch.renewal_date {
                conn.execute(
                    "UPDATE subscriptions SET renewal_date = ?1 WHERE id = ?2",
                    params![renewal_date.format(DATE_FORMAT).to_string(), id],
                )?;
            }
            if let Some(status) = patch.status {
                conn.execute(
                    "UPDATE subscriptions SET status = ?1 WHERE id = ?2",
                    params![status.as_str(), id],
                )?;
            }
        }

        self.get_subscription(id)
    }

    /// Set only the status of a subscription.
    ///
    /// Returns `None` if no record with that id exists.
    pub fn set_status(&self, id: i64, status: SubscriptionStatus) -> Result<Option<Subscription>> {
        let changed = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "UPDATE subscriptions SET status = ?1 WHERE id = ?2",
                params![status.as_str(), id],
            )?
        };

        if changed == 0 {
            return Ok(None);
        }
        self.get_subscription(id)
    }

    /// Delete a subscription. Returns true if a record was removed.
    pub fn delete_subscription(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM subscriptions WHERE id = ?", [id])?;
        Ok(changed > 0)
    }

    // ============================================
    // Row mapping
    // ============================================

    /// Map a row to a record, degrading per field rather than failing.
    ///
    /// A renewal_date that does not parse as YYYY-MM-DD maps to `None`; a
    /// price that is not numeric maps to `0.0`. The record itself always
    /// survives so a snapshot read never loses rows.
    fn row_to_subscription(row: &Row) -> rusqlite::Result<Subscription> {
        let renewal_raw: String = row.get("renewal_date")?;
        let renewal_date = NaiveDate::parse_from_str(&renewal_raw, DATE_FORMAT).ok();

        let price = match row.get_ref("price")? {
            ValueRef::Real(f) => f,
            ValueRef::Integer(i) => i as f64,
            ValueRef::Text(t) => std::str::from_utf8(t)
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .unwrap_or(0.0),
            _ => 0.0,
        };

        Ok(Subscription {
            id: row.get("id")?,
            name: row.get("name")?,
            price,
            renewal_date,
            status: row.get("status")?,
        })
    }
}
