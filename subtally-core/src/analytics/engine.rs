//! Aggregation engine
//!
//! Single-pass batch computation of the analytics report from a snapshot of
//! subscription records. Every step is total over any snapshot, including
//! the empty one: list outputs degrade to empty lists and averages to None,
//! never to a panic or a division by zero.
//!
//! Grouping is explicit: an ordered map from key to accumulated values,
//! then a deterministic reduction. Grouped outputs iterate keys in
//! ascending order, so a fixed snapshot always yields an identical report.

use chrono::{Datelike, NaiveDate, Utc};
use std::collections::BTreeMap;

use super::report::*;
use crate::types::Subscription;

/// Advisory note attached to every downgrade candidate.
const DOWNGRADE_NOTE: &str = "Consider evaluating usage for possible downgrade.";

/// Limitation note carried in the recommendations section.
const STATUS_CHURN_NOTE: &str =
    "Status change analytics require status change timestamps to be tracked.";

/// A cleaned view of one snapshot record.
///
/// Status is lower-cased for comparison; the renewal date is `None` when
/// missing or unparseable (the record stays in the snapshot but is excluded
/// from date-dependent metrics).
#[derive(Debug, Clone)]
pub struct Row {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub renewal_date: Option<NaiveDate>,
    pub status: String,
}

/// Produce the cleaned tabular view of a snapshot.
pub fn normalize(snapshot: &[Subscription]) -> Vec<Row> {
    snapshot
        .iter()
        .map(|s| Row {
            id: s.id,
            name: s.name.clone(),
            price: if s.price.is_finite() { s.price } else { 0.0 },
            renewal_date: s.renewal_date,
            status: s.status.to_lowercase(),
        })
        .collect()
}

/// Build the full report using the current UTC date as the reference point.
pub fn build_report(snapshot: &[Subscription]) -> AnalyticsReport {
    build_report_at(snapshot, Utc::now().date_naive())
}

/// Build the full report relative to an explicit reference date.
///
/// The reference date anchors the renewal-risk windows; everything else is
/// date-independent. Exposed separately so callers and tests can pin the
/// clock.
pub fn build_report_at(snapshot: &[Subscription], today: NaiveDate) -> AnalyticsReport {
    let rows = normalize(snapshot);

    AnalyticsReport {
        spending: spending_summary(&rows),
        status: status_breakdown(&rows),
        renewal_risk: RenewalRisk {
            upcoming_7_days: renewals_within(&rows, today, 7),
            upcoming_30_days: renewals_within(&rows, today, 30),
            overdue: overdue_renewals(&rows, today),
        },
        vendor_breakdown: vendor_breakdown(&rows),
        temporal_trends: monthly_trend(&rows),
        recommendations: Recommendations {
            duplicates: duplicate_services(&rows),
            downgrade_candidates: downgrade_suggestions(&rows),
            status_churn: None,
            notes: STATUS_CHURN_NOTE.to_string(),
        },
    }
}

/// Round to 2 decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================
// Spending
// ============================================

fn spending_summary(rows: &[Row]) -> SpendingSummary {
    let total_monthly: f64 = rows.iter().map(|r| r.price).sum();

    let (average_price, median_price) = if rows.is_empty() {
        (None, None)
    } else {
        let mut prices: Vec<f64> = rows.iter().map(|r| r.price).collect();
        prices.sort_by(f64::total_cmp);

        let mean = total_monthly / prices.len() as f64;
        let mid = prices.len() / 2;
        let median = if prices.len() % 2 == 0 {
            (prices[mid - 1] + prices[mid]) / 2.0
        } else {
            prices[mid]
        };
        (Some(mean), Some(median))
    };

    // Stable sort: ties keep snapshot order
    let mut by_price: Vec<&Row> = rows.iter().collect();
    by_price.sort_by(|a, b| b.price.total_cmp(&a.price));
    let top_services = by_price
        .iter()
        .take(3)
        .map(|r| TopService {
            id: r.id,
            name: r.name.clone(),
            price: r.price,
            status: r.status.clone(),
        })
        .collect();

    SpendingSummary {
        total_monthly,
        annual_projection: total_monthly * 12.0,
        average_price,
        median_price,
        top_services,
    }
}

// ============================================
// Status breakdown
// ============================================

fn status_breakdown(rows: &[Row]) -> StatusBreakdown {
    if rows.is_empty() {
        return StatusBreakdown::default();
    }

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.status.clone()).or_insert(0) += 1;
    }

    let total = rows.len() as f64;
    let percentages = counts
        .iter()
        .map(|(status, &count)| (status.clone(), round2(count as f64 / total * 100.0)))
        .collect();

    StatusBreakdown {
        counts,
        percentages,
    }
}

// ============================================
// Renewal risk
// ============================================

/// Records renewing within [today, today + days], ascending by date.
///
/// Deliberately status-agnostic: paused and cancelled records appear if
/// their renewal date falls in the window.
fn renewals_within(rows: &[Row], today: NaiveDate, days: i64) -> Vec<UpcomingRenewal> {
    let horizon = today + chrono::Duration::days(days);

    let mut upcoming: Vec<&Row> = rows
        .iter()
        .filter(|r| {
            r.renewal_date
                .is_some_and(|d| d >= today && d <= horizon)
        })
        .collect();
    upcoming.sort_by_key(|r| r.renewal_date);

    upcoming
        .into_iter()
        .map(|r| UpcomingRenewal {
            id: r.id,
            name: r.name.clone(),
            renewal_date: r.renewal_date.expect("filtered to Some"),
            status: r.status.clone(),
            price: r.price,
        })
        .collect()
}

/// Active records whose renewal date has already passed, ascending by date.
///
/// Overdue only matters for subscriptions still being charged, so
/// non-active records are excluded here (unlike the upcoming windows).
fn overdue_renewals(rows: &[Row], today: NaiveDate) -> Vec<OverdueRenewal> {
    let mut overdue: Vec<&Row> = rows
        .iter()
        .filter(|r| r.status == "active" && r.renewal_date.is_some_and(|d| d < today))
        .collect();
    overdue.sort_by_key(|r| r.renewal_date);

    overdue
        .into_iter()
        .map(|r| OverdueRenewal {
            id: r.id,
            name: r.name.clone(),
            renewal_date: r.renewal_date.expect("filtered to Some"),
            price: r.price,
        })
        .collect()
}

// ============================================
// Vendor breakdown
// ============================================

/// Total spend per exact vendor name, descending by spend.
fn vendor_breakdown(rows: &[Row]) -> Vec<VendorSpend> {
    let mut by_name: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows {
        *by_name.entry(row.name.as_str()).or_insert(0.0) += row.price;
    }

    let mut vendors: Vec<VendorSpend> = by_name
        .into_iter()
        .map(|(name, total_spend)| VendorSpend {
            name: name.to_string(),
            total_spend,
        })
        .collect();
    // Stable sort over the name-ordered groups, so equal spends tie-break
    // alphabetically
    vendors.sort_by(|a, b| b.total_spend.total_cmp(&a.total_spend));
    vendors
}

// ============================================
// Temporal trends
// ============================================

/// Monthly price totals plus a trailing 3-month moving average.
///
/// Records without a renewal date are dropped. The rolling mean uses as
/// many prior points as exist: window size 1 for the first month, 2 for the
/// second, 3 from then on.
fn monthly_trend(rows: &[Row]) -> TemporalTrends {
    let mut by_month: BTreeMap<String, f64> = BTreeMap::new();
    for row in rows {
        if let Some(date) = row.renewal_date {
            let key = format!("{:04}-{:02}", date.year(), date.month());
            *by_month.entry(key).or_insert(0.0) += row.price;
        }
    }

    let monthly_totals: Vec<MonthlyTotal> = by_month
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect();

    let rolling_average = monthly_totals
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let window = &monthly_totals[i.saturating_sub(2)..=i];
            let sum: f64 = window.iter().map(|m| m.total).sum();
            MonthlyAverage {
                month: entry.month.clone(),
                average: sum / window.len() as f64,
            }
        })
        .collect();

    TemporalTrends {
        monthly_totals,
        rolling_average,
    }
}

// ============================================
// Recommendations
// ============================================

/// Clusters of records sharing a trimmed, lower-cased name.
fn duplicate_services(rows: &[Row]) -> Vec<DuplicateCluster> {
    let mut groups: BTreeMap<String, Vec<&Row>> = BTreeMap::new();
    for row in rows {
        let key = row.name.trim().to_lowercase();
        groups.entry(key).or_default().push(row);
    }

    groups
        .into_values()
        .filter(|members| members.len() >= 2)
        .map(|members| DuplicateCluster {
            // First record encountered in snapshot order names the cluster
            service: members[0].name.clone(),
            count: members.len() as u64,
            total_spend: members.iter().map(|r| r.price).sum(),
            subscription_ids: members.iter().map(|r| r.id).collect(),
        })
        .collect()
}

/// Active records priced at or above the high-cost threshold.
///
/// With two or more active records the threshold is mean active price
/// times 1.5; with exactly one it is that record's own price, so a lone
/// active record is always flagged. That is the literal heuristic; treat
/// it as a soft warning.
fn downgrade_suggestions(rows: &[Row]) -> Vec<DowngradeCandidate> {
    let active: Vec<&Row> = rows.iter().filter(|r| r.status == "active").collect();
    if active.is_empty() {
        return Vec::new();
    }

    let threshold = if active.len() > 1 {
        let mean: f64 = active.iter().map(|r| r.price).sum::<f64>() / active.len() as f64;
        mean * 1.5
    } else {
        active
            .iter()
            .map(|r| r.price)
            .fold(f64::NEG_INFINITY, f64::max)
    };

    let mut high_cost: Vec<&Row> = active
        .iter()
        .copied()
        .filter(|r| r.price >= threshold)
        .collect();
    high_cost.sort_by(|a, b| b.price.total_cmp(&a.price));

    high_cost
        .into_iter()
        .map(|r| DowngradeCandidate {
            id: r.id,
            name: r.name.clone(),
            price: r.price,
            note: DOWNGRADE_NOTE.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sub(id: i64, name: &str, price: f64, renewal: Option<&str>, status: &str) -> Subscription {
        Subscription {
            id,
            name: name.to_string(),
            price,
            renewal_date: renewal.map(date),
            status: status.to_string(),
        }
    }

    const TODAY: &str = "2026-08-31";

    fn report(snapshot: &[Subscription]) -> AnalyticsReport {
        build_report_at(snapshot, date(TODAY))
    }

    // ============================================
    // Empty snapshot
    // ============================================

    #[test]
    fn test_empty_snapshot_yields_well_formed_report() {
        let r = report(&[]);

        assert_eq!(r.spending.total_monthly, 0.0);
        assert_eq!(r.spending.annual_projection, 0.0);
        assert!(r.spending.average_price.is_none());
        assert!(r.spending.median_price.is_none());
        assert!(r.spending.top_services.is_empty());

        assert!(r.status.counts.is_empty());
        assert!(r.status.percentages.is_empty());

        assert!(r.renewal_risk.upcoming_7_days.is_empty());
        assert!(r.renewal_risk.upcoming_30_days.is_empty());
        assert!(r.renewal_risk.overdue.is_empty());

        assert!(r.vendor_breakdown.is_empty());
        assert!(r.temporal_trends.monthly_totals.is_empty());
        assert!(r.temporal_trends.rolling_average.is_empty());

        assert!(r.recommendations.duplicates.is_empty());
        assert!(r.recommendations.downgrade_candidates.is_empty());
        assert!(r.recommendations.status_churn.is_none());
    }

    // ============================================
    // Normalization
    // ============================================

    #[test]
    fn test_normalize_lowercases_status_and_keeps_missing_dates() {
        let rows = normalize(&[
            sub(1, "Netflix", 15.99, Some("2026-09-10"), "Active"),
            sub(2, "Legacy", 5.0, None, "CANCELLED"),
        ]);

        assert_eq!(rows[0].status, "active");
        assert_eq!(rows[1].status, "cancelled");
        assert!(rows[1].renewal_date.is_none());
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_missing_dates_excluded_from_date_metrics_not_from_snapshot() {
        let snapshot = vec![
            sub(1, "Netflix", 10.0, None, "active"),
            sub(2, "Hulu", 20.0, Some("2026-09-02"), "active"),
        ];
        let r = report(&snapshot);

        // Date-dependent outputs see only the record with a date
        assert_eq!(r.renewal_risk.upcoming_7_days.len(), 1);
        assert_eq!(r.temporal_trends.monthly_totals.len(), 1);
        assert_eq!(r.temporal_trends.monthly_totals[0].total, 20.0);

        // Date-independent outputs still see both
        assert_eq!(r.spending.total_monthly, 30.0);
        assert_eq!(r.status.counts["active"], 2);
    }

    // ============================================
    // Spending
    // ============================================

    #[test]
    fn test_spending_summary_totals_and_projection() {
        let snapshot = vec![
            sub(1, "A", 10.0, Some("2026-09-10"), "active"),
            sub(2, "B", 20.0, Some("2026-10-10"), "paused"),
            sub(3, "C", 30.0, Some("2026-11-10"), "cancelled"),
        ];
        let r = report(&snapshot);

        assert_eq!(r.spending.total_monthly, 60.0);
        assert_eq!(r.spending.annual_projection, 720.0);
        // Mean and median are status-agnostic
        assert_eq!(r.spending.average_price, Some(20.0));
        assert_eq!(r.spending.median_price, Some(20.0));
    }

    #[test]
    fn test_median_even_count() {
        let snapshot = vec![
            sub(1, "A", 10.0, Some("2026-09-10"), "active"),
            sub(2, "B", 20.0, Some("2026-09-10"), "active"),
            sub(3, "C", 30.0, Some("2026-09-10"), "active"),
            sub(4, "D", 100.0, Some("2026-09-10"), "active"),
        ];
        let r = report(&snapshot);
        assert_eq!(r.spending.median_price, Some(25.0));
    }

    #[test]
    fn test_top_services_capped_at_three_and_stable() {
        let snapshot = vec![
            sub(1, "A", 10.0, Some("2026-09-10"), "active"),
            sub(2, "B", 30.0, Some("2026-09-10"), "active"),
            sub(3, "C", 30.0, Some("2026-09-10"), "active"),
            sub(4, "D", 5.0, Some("2026-09-10"), "active"),
        ];
        let r = report(&snapshot);

        let names: Vec<&str> = r
            .spending
            .top_services
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        // Tie between B and C broken by snapshot order
        assert_eq!(names, vec!["B", "C", "A"]);

        // Non-increasing by price
        let prices: Vec<f64> = r.spending.top_services.iter().map(|t| t.price).collect();
        assert!(prices.windows(2).all(|w| w[0] >= w[1]));

        // Fewer than 3 records -> fewer entries
        let small = report(&snapshot[..2]);
        assert_eq!(small.spending.top_services.len(), 2);
    }

    // ============================================
    // Status breakdown
    // ============================================

    #[test]
    fn test_status_breakdown_counts_and_percentages() {
        let snapshot = vec![
            sub(1, "A", 1.0, Some("2026-09-10"), "active"),
            sub(2, "B", 1.0, Some("2026-09-10"), "active"),
            sub(3, "C", 1.0, Some("2026-09-10"), "paused"),
        ];
        let r = report(&snapshot);

        assert_eq!(r.status.counts.len(), 2);
        assert_eq!(r.status.counts["active"], 2);
        assert_eq!(r.status.counts["paused"], 1);
        assert_eq!(r.status.percentages["active"], 66.67);
        assert_eq!(r.status.percentages["paused"], 33.33);

        // Only observed statuses appear
        assert!(!r.status.counts.contains_key("cancelled"));
    }

    #[test]
    fn test_percentages_sum_to_about_100() {
        let snapshot = vec![
            sub(1, "A", 1.0, Some("2026-09-10"), "active"),
            sub(2, "B", 1.0, Some("2026-09-10"), "paused"),
            sub(3, "C", 1.0, Some("2026-09-10"), "cancelled"),
            sub(4, "D", 1.0, Some("2026-09-10"), "active"),
            sub(5, "E", 1.0, Some("2026-09-10"), "active"),
            sub(6, "F", 1.0, Some("2026-09-10"), "paused"),
            sub(7, "G", 1.0, Some("2026-09-10"), "active"),
        ];
        let r = report(&snapshot);

        let sum: f64 = r.status.percentages.values().sum();
        let tolerance = 0.02 * r.status.percentages.len() as f64;
        assert!((sum - 100.0).abs() <= tolerance, "sum was {}", sum);
    }

    // ============================================
    // Renewal risk
    // ============================================

    #[test]
    fn test_upcoming_windows_are_status_agnostic() {
        // A renews in 3 days (active), B in 3 days (cancelled)
        let snapshot = vec![
            sub(1, "A", 10.0, Some("2026-09-03"), "active"),
            sub(2, "B", 20.0, Some("2026-09-03"), "cancelled"),
        ];
        let r = report(&snapshot);

        let ids: Vec<i64> = r.renewal_risk.upcoming_7_days.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(r.renewal_risk.upcoming_30_days.len(), 2);
    }

    #[test]
    fn test_upcoming_window_bounds_inclusive() {
        let snapshot = vec![
            sub(1, "today", 1.0, Some("2026-08-31"), "active"),
            sub(2, "day7", 1.0, Some("2026-09-07"), "active"),
            sub(3, "day8", 1.0, Some("2026-09-08"), "active"),
            sub(4, "day30", 1.0, Some("2026-09-30"), "active"),
            sub(5, "day31", 1.0, Some("2026-10-01"), "active"),
        ];
        let r = report(&snapshot);

        let week: Vec<&str> = r
            .renewal_risk
            .upcoming_7_days
            .iter()
            .map(|u| u.name.as_str())
            .collect();
        assert_eq!(week, vec!["today", "day7"]);

        let month: Vec<&str> = r
            .renewal_risk
            .upcoming_30_days
            .iter()
            .map(|u| u.name.as_str())
            .collect();
        assert_eq!(month, vec!["today", "day7", "day8", "day30"]);
    }

    #[test]
    fn test_overdue_only_active() {
        let snapshot = vec![
            sub(1, "A", 10.0, Some("2026-09-03"), "active"),
            sub(2, "B", 20.0, Some("2026-09-03"), "cancelled"),
            sub(3, "C", 5.0, Some("2026-08-30"), "active"),
            sub(4, "D", 8.0, Some("2026-08-01"), "cancelled"),
        ];
        let r = report(&snapshot);

        let ids: Vec<i64> = r.renewal_risk.overdue.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_overdue_sorted_ascending_by_date() {
        let snapshot = vec![
            sub(1, "newer", 1.0, Some("2026-08-30"), "active"),
            sub(2, "older", 1.0, Some("2026-07-01"), "active"),
        ];
        let r = report(&snapshot);

        let names: Vec<&str> = r
            .renewal_risk
            .overdue
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(names, vec!["older", "newer"]);
    }

    // ============================================
    // Vendor breakdown
    // ============================================

    #[test]
    fn test_vendor_breakdown_groups_exact_names() {
        let snapshot = vec![
            sub(1, "Netflix", 10.0, Some("2026-09-10"), "active"),
            sub(2, "Netflix", 5.0, Some("2026-09-10"), "cancelled"),
            sub(3, "netflix", 7.0, Some("2026-09-10"), "active"),
            sub(4, "Hulu", 8.0, Some("2026-09-10"), "active"),
        ];
        let r = report(&snapshot);

        // Exact-name grouping: "Netflix" and "netflix" stay separate
        assert_eq!(r.vendor_breakdown.len(), 3);
        assert_eq!(r.vendor_breakdown[0].name, "Netflix");
        assert_eq!(r.vendor_breakdown[0].total_spend, 15.0);

        // Descending by spend
        let spends: Vec<f64> = r.vendor_breakdown.iter().map(|v| v.total_spend).collect();
        assert!(spends.windows(2).all(|w| w[0] >= w[1]));

        // Totals conserve the snapshot sum
        let total: f64 = spends.iter().sum();
        assert_eq!(total, 30.0);
    }

    // ============================================
    // Temporal trends
    // ============================================

    #[test]
    fn test_monthly_totals_ascending_and_conserved() {
        let snapshot = vec![
            sub(1, "A", 10.0, Some("2026-10-05"), "active"),
            sub(2, "B", 20.0, Some("2026-09-01"), "active"),
            sub(3, "C", 5.0, Some("2026-09-20"), "active"),
            sub(4, "D", 3.0, None, "active"),
        ];
        let r = report(&snapshot);

        let months: Vec<&str> = r
            .temporal_trends
            .monthly_totals
            .iter()
            .map(|m| m.month.as_str())
            .collect();
        assert_eq!(months, vec!["2026-09", "2026-10"]);
        assert_eq!(r.temporal_trends.monthly_totals[0].total, 25.0);
        assert_eq!(r.temporal_trends.monthly_totals[1].total, 10.0);

        // Entries sum to the total price of records with a valid date
        let sum: f64 = r.temporal_trends.monthly_totals.iter().map(|m| m.total).sum();
        assert_eq!(sum, 35.0);
    }

    #[test]
    fn test_rolling_average_min_period_one() {
        let snapshot = vec![
            sub(1, "A", 10.0, Some("2026-01-05"), "active"),
            sub(2, "B", 20.0, Some("2026-02-05"), "active"),
            sub(3, "C", 30.0, Some("2026-03-05"), "active"),
            sub(4, "D", 40.0, Some("2026-04-05"), "active"),
        ];
        let r = report(&snapshot);

        let averages: Vec<f64> = r
            .temporal_trends
            .rolling_average
            .iter()
            .map(|m| m.average)
            .collect();
        // Window sizes 1, 2, 3, 3
        assert_eq!(averages, vec![10.0, 15.0, 20.0, 30.0]);
    }

    #[test]
    fn test_trends_empty_when_no_valid_dates() {
        let snapshot = vec![
            sub(1, "A", 10.0, None, "active"),
            sub(2, "B", 20.0, None, "active"),
        ];
        let r = report(&snapshot);

        assert!(r.temporal_trends.monthly_totals.is_empty());
        assert!(r.temporal_trends.rolling_average.is_empty());
    }

    // ============================================
    // Duplicates
    // ============================================

    #[test]
    fn test_duplicate_detection_normalizes_names() {
        let snapshot = vec![
            sub(1, "Netflix", 10.0, Some("2026-09-10"), "active"),
            sub(2, " netflix ", 12.0, Some("2026-09-10"), "paused"),
            sub(3, "NETFLIX", 9.0, Some("2026-09-10"), "cancelled"),
            sub(4, "Hulu", 8.0, Some("2026-09-10"), "active"),
        ];
        let r = report(&snapshot);

        assert_eq!(r.recommendations.duplicates.len(), 1);
        let cluster = &r.recommendations.duplicates[0];
        assert_eq!(cluster.service, "Netflix");
        assert_eq!(cluster.count, 3);
        assert_eq!(cluster.total_spend, 31.0);
        assert_eq!(cluster.subscription_ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_no_duplicates_for_unique_names() {
        let snapshot = vec![
            sub(1, "Netflix", 10.0, Some("2026-09-10"), "active"),
            sub(2, "Hulu", 8.0, Some("2026-09-10"), "active"),
        ];
        let r = report(&snapshot);
        assert!(r.recommendations.duplicates.is_empty());
    }

    // ============================================
    // Downgrade suggestions
    // ============================================

    #[test]
    fn test_single_active_record_always_flagged() {
        let snapshot = vec![sub(1, "A", 50.0, Some("2026-09-10"), "active")];
        let r = report(&snapshot);

        let candidates = &r.recommendations.downgrade_candidates;
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, 1);
        assert_eq!(candidates[0].price, 50.0);
        assert!(!candidates[0].note.is_empty());
    }

    #[test]
    fn test_downgrade_threshold_with_two_records() {
        // mean = 55, threshold = 82.5 -> only the 100 record
        let snapshot = vec![
            sub(1, "cheap", 10.0, Some("2026-09-10"), "active"),
            sub(2, "pricey", 100.0, Some("2026-09-10"), "active"),
        ];
        let r = report(&snapshot);

        let ids: Vec<i64> = r
            .recommendations
            .downgrade_candidates
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_downgrade_ignores_non_active() {
        let snapshot = vec![
            sub(1, "A", 500.0, Some("2026-09-10"), "cancelled"),
            sub(2, "B", 500.0, Some("2026-09-10"), "paused"),
        ];
        let r = report(&snapshot);
        assert!(r.recommendations.downgrade_candidates.is_empty());
    }

    #[test]
    fn test_downgrade_threshold_with_three_records() {
        let snapshot = vec![
            sub(1, "A", 90.0, Some("2026-09-10"), "active"),
            sub(2, "B", 95.0, Some("2026-09-10"), "active"),
            sub(3, "C", 1.0, Some("2026-09-10"), "active"),
        ];
        let r = report(&snapshot);

        // mean = 62, threshold = 93 -> only B
        let ids: Vec<i64> = r
            .recommendations
            .downgrade_candidates
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    // ============================================
    // Report shape
    // ============================================

    #[test]
    fn test_report_serializes_with_contract_field_names() {
        let snapshot = vec![sub(1, "Netflix", 15.99, Some("2026-09-10"), "active")];
        let r = report(&snapshot);

        let json = serde_json::to_value(&r).unwrap();
        assert!(json["spending"]["total_monthly"].is_number());
        assert!(json["spending"]["top_services"].is_array());
        assert!(json["renewal_risk"]["upcoming_7_days"].is_array());
        assert!(json["renewal_risk"]["upcoming_30_days"].is_array());
        assert!(json["vendor_breakdown"].is_array());
        assert!(json["temporal_trends"]["monthly_totals"].is_array());
        // status_churn is always present and null
        assert!(json["recommendations"]["status_churn"].is_null());
        assert!(json["recommendations"]["notes"].is_string());
    }

    #[test]
    fn test_upcoming_entries_carry_status_but_overdue_do_not() {
        let snapshot = vec![
            sub(1, "A", 10.0, Some("2026-09-03"), "paused"),
            sub(2, "B", 5.0, Some("2026-08-01"), "active"),
        ];
        let json = serde_json::to_value(report(&snapshot)).unwrap();

        let upcoming = &json["renewal_risk"]["upcoming_7_days"][0];
        assert_eq!(upcoming["status"], "paused");
        assert_eq!(upcoming["renewal_date"], "2026-09-03");

        let overdue = &json["renewal_risk"]["overdue"][0];
        assert!(overdue.get("status").is_none());
        assert_eq!(overdue["renewal_date"], "2026-08-01");
    }
}
