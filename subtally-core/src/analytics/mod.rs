//! Analytics module for subtally
//!
//! Computes the derived analytics report from a snapshot of subscription
//! records:
//! - Spending summary (totals, projection, mean/median, top services)
//! - Status breakdown (counts and percentages)
//! - Renewal-risk windows (upcoming 7/30 days, overdue)
//! - Vendor breakdown
//! - Temporal trends (monthly totals, trailing rolling average)
//! - Recommendations (duplicate clusters, downgrade candidates)
//!
//! The whole report is a pure function of the snapshot: no caching, no
//! incremental state, full recomputation per request. See [`engine`] for the
//! aggregation steps and [`report`] for the external document shape.

pub mod engine;
pub mod report;

pub use engine::{build_report, build_report_at, normalize, Row};
pub use report::{
    AnalyticsReport, DowngradeCandidate, DuplicateCluster, MonthlyAverage, MonthlyTotal,
    OverdueRenewal, Recommendations, RenewalRisk, SpendingSummary, StatusBreakdown,
    TemporalTrends, TopService, UpcomingRenewal, VendorSpend,
};
