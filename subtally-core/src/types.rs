//! Core domain types for subtally
//!
//! These types represent the canonical data model: subscription records as
//! they are stored, plus the create/update payloads accepted at the API
//! boundary.
//!
//! ## Status handling
//!
//! [`SubscriptionStatus`] is a typed enum on the write path and is converted
//! to its storage string at the store-adapter boundary. Stored records carry
//! the raw string back out, so downstream consumers (and the analytics
//! engine's status breakdown) see exactly what the table contains.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================
// Status
// ============================================

/// Lifecycle status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Currently billing
    Active,
    /// Temporarily suspended, not billing
    Paused,
    /// Terminated
    Cancelled,
}

impl SubscriptionStatus {
    /// Storage/wire form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Paused => "paused",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SubscriptionStatus::Active),
            "paused" => Ok(SubscriptionStatus::Paused),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            _ => Err(format!("unknown subscription status: {}", s)),
        }
    }
}

impl Default for SubscriptionStatus {
    fn default() -> Self {
        SubscriptionStatus::Active
    }
}

// ============================================
// Records and payloads
// ============================================

/// A subscription record as read from the store.
///
/// `renewal_date` is `None` when the stored date text could not be parsed;
/// such records stay in the snapshot but are excluded from date-dependent
/// metrics. `status` is the stored string, lower-cased by the analytics
/// normalization step before comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    /// Store-assigned identifier, immutable once assigned
    pub id: i64,
    /// Service name
    pub name: String,
    /// Monthly price, non-negative
    pub price: f64,
    /// Next renewal date (None if the stored value was unparseable)
    pub renewal_date: Option<NaiveDate>,
    /// Stored status string ("active", "paused", "cancelled")
    pub status: String,
}

/// Payload for creating a subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubscription {
    /// Service name, must be non-empty
    pub name: String,
    /// Monthly price, must be >= 0
    pub price: f64,
    /// Next renewal date
    pub renewal_date: NaiveDate,
    /// Initial status (defaults to active)
    #[serde(default)]
    pub status: SubscriptionStatus,
}

/// Payload for a partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionPatch {
    /// New service name
    pub name: Option<String>,
    /// New price
    pub price: Option<f64>,
    /// New renewal date
    pub renewal_date: Option<NaiveDate>,
    /// New status
    pub status: Option<SubscriptionStatus>,
}

impl SubscriptionPatch {
    /// True when the patch carries no changes.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.renewal_date.is_none()
            && self.status.is_none()
    }
}
