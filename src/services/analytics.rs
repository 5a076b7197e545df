//! Aggregation engine behind the dashboard.
//!
//! Every aggregation is a pure function recomputed from the raw collection
//! on each call; no derived state is carried between calls. Recomputation
//! is linear in collection size and only triggered by explicit data-change
//! or render events, so caching is not worth its invalidation burden.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::models::{Movement, MovementStatus};
use crate::services::movements::MovementService;

/// Label substituted for a missing destination before grouping.
pub const UNKNOWN_DESTINATION: &str = "Not Informed";
/// Label substituted for a missing product description before grouping.
pub const UNKNOWN_PRODUCT: &str = "No Description";

const TOP_GROUPS: usize = 5;
const CROSS_TAB_ROWS: usize = 6;

/// Headline dashboard counters and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AggregateStats {
    pub in_stock_count: u64,
    pub rejected_count: u64,
    pub shipped_count: u64,
    pub total_weight: Decimal,
    pub total_value: Decimal,
}

/// One bar of a top-N grouping chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RankedGroup {
    pub label: String,
    pub count: u64,
}

/// One stacked bar of the status-by-destination cross-tab: a fixed-size
/// counter record keyed by the closed status enum rather than a dynamic
/// map, so every status value has a tally slot by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusByDestinationRow {
    pub destination: String,
    pub in_stock: u64,
    pub rejected: u64,
    pub shipped: u64,
    pub returned: u64,
}

impl StatusByDestinationRow {
    fn new(destination: String) -> Self {
        Self {
            destination,
            in_stock: 0,
            rejected: 0,
            shipped: 0,
            returned: 0,
        }
    }

    /// Exhaustive on purpose: a new status variant must be given a counter
    /// here before the crate compiles again.
    fn record(&mut self, status: MovementStatus) {
        match status {
            MovementStatus::InStock => self.in_stock += 1,
            MovementStatus::Rejected => self.rejected += 1,
            MovementStatus::Shipped => self.shipped += 1,
            MovementStatus::Returned => self.returned += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.in_stock + self.rejected + self.shipped + self.returned
    }
}

/// Everything the dashboard renders, computed in one pass over a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardReport {
    pub stats: AggregateStats,
    pub top_destinations: Vec<RankedGroup>,
    pub top_products: Vec<RankedGroup>,
    pub status_by_destination: Vec<StatusByDestinationRow>,
    pub generated_at: DateTime<Utc>,
}

fn destination_label(movement: &Movement) -> &str {
    if movement.destination.is_empty() {
        UNKNOWN_DESTINATION
    } else {
        &movement.destination
    }
}

fn product_label(movement: &Movement) -> &str {
    if movement.description.is_empty() {
        UNKNOWN_PRODUCT
    } else {
        &movement.description
    }
}

/// Only in-flight/held inventory counts toward the stock groupings.
fn counts_as_stock(status: MovementStatus) -> bool {
    matches!(status, MovementStatus::InStock | MovementStatus::Rejected)
}

/// Status counts plus weight/value totals over the full collection.
/// Returned movements participate in the totals but have no headline
/// counter, matching the dashboard cards.
pub fn aggregate_stats(movements: &[Movement]) -> AggregateStats {
    let mut stats = AggregateStats {
        in_stock_count: 0,
        rejected_count: 0,
        shipped_count: 0,
        total_weight: Decimal::ZERO,
        total_value: Decimal::ZERO,
    };

    for m in movements {
        match m.status {
            MovementStatus::InStock => stats.in_stock_count += 1,
            MovementStatus::Rejected => stats.rejected_count += 1,
            MovementStatus::Shipped => stats.shipped_count += 1,
            MovementStatus::Returned => {}
        }
        stats.total_weight += m.weight;
        stats.total_value += m.value;
    }

    stats
}

/// Groups by label in first-encountered order, counts members, sorts
/// descending by count (stable, so ties keep scan order) and truncates.
fn ranked_groups<'a>(
    movements: &'a [Movement],
    label_of: impl Fn(&'a Movement) -> &'a str,
    limit: usize,
) -> Vec<RankedGroup> {
    let mut groups: Vec<RankedGroup> = Vec::new();
    for m in movements {
        if !counts_as_stock(m.status) {
            continue;
        }
        let label = label_of(m);
        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.count += 1,
            None => groups.push(RankedGroup {
                label: label.to_string(),
                count: 1,
            }),
        }
    }
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups.truncate(limit);
    groups
}

/// Top five destinations holding stock, by record count.
pub fn top_destinations(movements: &[Movement]) -> Vec<RankedGroup> {
    ranked_groups(movements, destination_label, TOP_GROUPS)
}

/// Top five products in stock, by record count.
pub fn top_products(movements: &[Movement]) -> Vec<RankedGroup> {
    ranked_groups(movements, product_label, TOP_GROUPS)
}

/// Per-destination status tallies over all records (no status restriction),
/// sorted descending by row total, truncated to the six busiest rows.
pub fn status_by_destination(movements: &[Movement]) -> Vec<StatusByDestinationRow> {
    let mut rows: Vec<StatusByDestinationRow> = Vec::new();
    for m in movements {
        let label = destination_label(m);
        let row = match rows.iter_mut().find(|r| r.destination == label) {
            Some(row) => row,
            None => {
                rows.push(StatusByDestinationRow::new(label.to_string()));
                rows.last_mut().expect("row just pushed")
            }
        };
        row.record(m.status);
    }
    rows.sort_by(|a, b| b.total().cmp(&a.total()));
    rows.truncate(CROSS_TAB_ROWS);
    rows
}

/// Read-side wrapper the handlers consume, in the shape of a service so it
/// can snapshot the current collection itself.
#[derive(Clone)]
pub struct AnalyticsService {
    movements: MovementService,
}

impl AnalyticsService {
    pub fn new(movements: MovementService) -> Self {
        Self { movements }
    }

    pub async fn stats(&self) -> AggregateStats {
        aggregate_stats(&self.movements.list().await)
    }

    pub async fn top_destinations(&self) -> Vec<RankedGroup> {
        top_destinations(&self.movements.list().await)
    }

    pub async fn top_products(&self) -> Vec<RankedGroup> {
        top_products(&self.movements.list().await)
    }

    pub async fn status_by_destination(&self) -> Vec<StatusByDestinationRow> {
        status_by_destination(&self.movements.list().await)
    }

    pub async fn dashboard_report(&self) -> DashboardReport {
        info!("generating dashboard report");
        let snapshot = self.movements.list().await;
        DashboardReport {
            stats: aggregate_stats(&snapshot),
            top_destinations: top_destinations(&snapshot),
            top_products: top_products(&snapshot),
            status_by_destination: status_by_destination(&snapshot),
            generated_at: Utc::now(),
        }
    }
}
