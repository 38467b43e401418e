//! Analytics report document
//!
//! The structs here define the external shape of the report as serialized
//! to API consumers. Field names and nesting are part of the contract
//! (`spending.total_monthly`, `renewal_risk.upcoming_7_days`,
//! `recommendations.status_churn` always present and null) and must not
//! change without versioning the endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The full analytics report, recomputed from scratch per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Spending totals and top services
    pub spending: SpendingSummary,
    /// Status counts and percentages
    pub status: StatusBreakdown,
    /// Upcoming and overdue renewals
    pub renewal_risk: RenewalRisk,
    /// Per-vendor spend, sorted descending
    pub vendor_breakdown: Vec<VendorSpend>,
    /// Monthly totals and rolling average
    pub temporal_trends: TemporalTrends,
    /// Heuristic recommendations
    pub recommendations: Recommendations,
}

/// Aggregate spending metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingSummary {
    /// Sum of all prices (0.0 for an empty snapshot)
    pub total_monthly: f64,
    /// total_monthly * 12
    pub annual_projection: f64,
    /// Mean price, None for an empty snapshot
    pub average_price: Option<f64>,
    /// Median price, None for an empty snapshot
    pub median_price: Option<f64>,
    /// Up to 3 highest-priced records, ties kept in snapshot order
    pub top_services: Vec<TopService>,
}

/// One of the highest-priced records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopService {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub status: String,
}

/// Status counts and percentages, keyed by lower-cased status.
///
/// Only statuses observed in the data appear as keys. Percentages are
/// rounded to 2 decimal places and sum to ~100 subject to rounding.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub counts: BTreeMap<String, u64>,
    pub percentages: BTreeMap<String, f64>,
}

/// Renewal-risk windows relative to the caller's clock (UTC midnight).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewalRisk {
    /// Renewals due within [today, today + 7 days], any status
    pub upcoming_7_days: Vec<UpcomingRenewal>,
    /// Renewals due within [today, today + 30 days], any status
    pub upcoming_30_days: Vec<UpcomingRenewal>,
    /// Active records with a renewal date strictly before today
    pub overdue: Vec<OverdueRenewal>,
}

/// A renewal falling inside an upcoming window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingRenewal {
    pub id: i64,
    pub name: String,
    pub renewal_date: NaiveDate,
    pub status: String,
    pub price: f64,
}

/// An overdue renewal. Only active records qualify, so status is omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueRenewal {
    pub id: i64,
    pub name: String,
    pub renewal_date: NaiveDate,
    pub price: f64,
}

/// Total spend for one vendor (exact name, no normalization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorSpend {
    pub name: String,
    pub total_spend: f64,
}

/// Monthly spending series keyed by calendar month of renewal date.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemporalTrends {
    /// Per-month price totals, ascending by month ("YYYY-MM")
    pub monthly_totals: Vec<MonthlyTotal>,
    /// Trailing 3-month simple moving average, minimum period 1
    pub rolling_average: Vec<MonthlyAverage>,
}

/// Price total for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: f64,
}

/// Rolling average value for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAverage {
    pub month: String,
    pub average: f64,
}

/// Heuristic recommendations derived from the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Clusters of records sharing a normalized name
    pub duplicates: Vec<DuplicateCluster>,
    /// High-cost active records worth reviewing
    pub downgrade_candidates: Vec<DowngradeCandidate>,
    /// Always null: status change analytics would require status change
    /// timestamps, which are not tracked
    pub status_churn: Option<serde_json::Value>,
    /// Human-readable note about the above limitation
    pub notes: String,
}

/// Records sharing a trimmed, lower-cased name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCluster {
    /// Display name of the first record encountered in snapshot order
    pub service: String,
    /// Number of records in the cluster
    pub count: u64,
    /// Summed price across the cluster
    pub total_spend: f64,
    /// Member ids, in snapshot order
    pub subscription_ids: Vec<i64>,
}

/// An active record priced at or above the high-cost threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowngradeCandidate {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub note: String,
}
