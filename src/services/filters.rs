//! Filter engine for the table views.
//!
//! Pure functions over an immutable snapshot of the movement collection.
//! All predicates are applied as a conjunction and the input order is
//! preserved, so a filtered result is always an ordered subsequence of the
//! snapshot.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{DateField, Movement, MovementStatus, StatusFilter, ViewType};

/// Inclusive date range over a lexicographically comparable date string.
/// An empty bound means "unbounded on that side".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    pub fn new(start: Option<String>, end: Option<String>) -> Self {
        let normalize = |bound: Option<String>| bound.filter(|b| !b.trim().is_empty());
        Self {
            start: normalize(start),
            end: normalize(end),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `value` falls inside the range. A record with an empty date
    /// value is unorderable: it is excluded by any active bound but kept
    /// when the range is unbounded.
    pub fn contains(&self, value: &str) -> bool {
        if self.is_unbounded() {
            return true;
        }
        if value.is_empty() {
            return false;
        }
        if let Some(start) = &self.start {
            if value < start.as_str() {
                return false;
            }
        }
        if let Some(end) = &self.end {
            if value > end.as_str() {
                return false;
            }
        }
        true
    }
}

/// Statuses a view displays. `Entries` shows the in-flight/held inventory,
/// `Exits` the records that left; the remaining views apply no status
/// restriction of their own.
fn view_admits(view: ViewType, status: MovementStatus) -> bool {
    match view {
        ViewType::Entries => matches!(status, MovementStatus::InStock | MovementStatus::Rejected),
        ViewType::Exits => matches!(status, MovementStatus::Shipped | MovementStatus::Returned),
        ViewType::Dashboard | ViewType::Performance | ViewType::Billing => true,
    }
}

/// Produces the subsequence of `movements` a table view should display.
pub fn filter_movements(
    movements: &[Movement],
    view: ViewType,
    status: StatusFilter,
    date_field: DateField,
    range: &DateRange,
) -> Vec<Movement> {
    movements
        .iter()
        .filter(|m| view_admits(view, m.status))
        .filter(|m| status.matches(m.status))
        .filter(|m| range.contains(date_field.value_of(m)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovementInput;
    use uuid::Uuid;

    fn movement(status: MovementStatus, invoice_date: &str, unloading_date: &str) -> Movement {
        Movement::from_input(
            Uuid::new_v4(),
            MovementInput {
                status,
                invoice_date: invoice_date.into(),
                unloading_date: unloading_date.into(),
                ..Default::default()
            },
        )
    }

    fn sample_set() -> Vec<Movement> {
        vec![
            movement(MovementStatus::InStock, "2026-01-10", "2026-01-12"),
            movement(MovementStatus::Shipped, "2026-01-15", "2026-01-18"),
            movement(MovementStatus::Rejected, "2026-02-01", ""),
            movement(MovementStatus::Returned, "", "2026-02-05"),
        ]
    }

    #[test]
    fn entries_view_keeps_only_in_stock_and_rejected() {
        let result = filter_movements(
            &sample_set(),
            ViewType::Entries,
            StatusFilter::All,
            DateField::InvoiceDate,
            &DateRange::default(),
        );
        assert_eq!(result.len(), 2);
        assert!(result
            .iter()
            .all(|m| matches!(m.status, MovementStatus::InStock | MovementStatus::Rejected)));
    }

    #[test]
    fn exits_view_keeps_only_shipped_and_returned() {
        let result = filter_movements(
            &sample_set(),
            ViewType::Exits,
            StatusFilter::All,
            DateField::InvoiceDate,
            &DateRange::default(),
        );
        assert_eq!(result.len(), 2);
        assert!(result
            .iter()
            .all(|m| matches!(m.status, MovementStatus::Shipped | MovementStatus::Returned)));
    }

    #[test]
    fn performance_and_billing_views_apply_no_status_restriction() {
        for view in [ViewType::Performance, ViewType::Billing] {
            let result = filter_movements(
                &sample_set(),
                view,
                StatusFilter::All,
                DateField::InvoiceDate,
                &DateRange::default(),
            );
            assert_eq!(result.len(), 4);
        }
    }

    #[test]
    fn status_filter_composes_with_the_view_predicate() {
        let result = filter_movements(
            &sample_set(),
            ViewType::Entries,
            StatusFilter::Only(MovementStatus::Rejected),
            DateField::InvoiceDate,
            &DateRange::default(),
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].status, MovementStatus::Rejected);
    }

    #[test]
    fn status_filter_is_idempotent() {
        let once = filter_movements(
            &sample_set(),
            ViewType::Performance,
            StatusFilter::Only(MovementStatus::Shipped),
            DateField::InvoiceDate,
            &DateRange::default(),
        );
        let twice = filter_movements(
            &once,
            ViewType::Performance,
            StatusFilter::Only(MovementStatus::Shipped),
            DateField::InvoiceDate,
            &DateRange::default(),
        );
        assert_eq!(once, twice);
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let range = DateRange::new(Some("2026-01-10".into()), Some("2026-01-15".into()));
        let result = filter_movements(
            &sample_set(),
            ViewType::Performance,
            StatusFilter::All,
            DateField::InvoiceDate,
            &range,
        );
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn empty_date_is_excluded_by_any_active_bound() {
        let movements = sample_set();
        // The Returned record has an empty invoice_date.
        let start_only = DateRange::new(Some("2026-01-01".into()), None);
        let result = filter_movements(
            &movements,
            ViewType::Performance,
            StatusFilter::All,
            DateField::InvoiceDate,
            &start_only,
        );
        assert!(result.iter().all(|m| !m.invoice_date.is_empty()));

        let end_only = DateRange::new(None, Some("2026-12-31".into()));
        let result = filter_movements(
            &movements,
            ViewType::Performance,
            StatusFilter::All,
            DateField::InvoiceDate,
            &end_only,
        );
        assert!(result.iter().all(|m| !m.invoice_date.is_empty()));
    }

    #[test]
    fn empty_date_is_kept_when_no_bound_is_active() {
        let result = filter_movements(
            &sample_set(),
            ViewType::Performance,
            StatusFilter::All,
            DateField::InvoiceDate,
            &DateRange::default(),
        );
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn date_field_selector_switches_the_compared_attribute() {
        let range = DateRange::new(Some("2026-02-01".into()), None);
        let by_unloading = filter_movements(
            &sample_set(),
            ViewType::Performance,
            StatusFilter::All,
            DateField::UnloadingDate,
            &range,
        );
        assert_eq!(by_unloading.len(), 1);
        assert_eq!(by_unloading[0].status, MovementStatus::Returned);
    }

    #[test]
    fn blank_query_bounds_count_as_unbounded() {
        let range = DateRange::new(Some("  ".into()), Some(String::new()));
        assert!(range.is_unbounded());
    }

    #[test]
    fn result_preserves_input_order() {
        let movements = sample_set();
        let result = filter_movements(
            &movements,
            ViewType::Performance,
            StatusFilter::All,
            DateField::InvoiceDate,
            &DateRange::default(),
        );
        let ids: Vec<_> = result.iter().map(|m| m.id).collect();
        let expected: Vec<_> = movements.iter().map(|m| m.id).collect();
        assert_eq!(ids, expected);
    }
}
