//! Summary metrics over a plan.

use crate::model::WorkAreaStatus;
use crate::plan::Plan;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated counts and dates for a plan, as shown by `microplan status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanMetrics {
    /// Whole days until the plan's end date, clamped at zero.
    /// `None` when the plan has no end date.
    pub days_remaining: Option<i64>,
    /// Total number of work areas.
    pub total_areas: usize,
    /// Areas assigned to a group.
    pub grouped_areas: usize,
    /// Areas not yet assigned to a group.
    pub ungrouped_areas: usize,
    /// Number of groups.
    pub group_count: usize,
    /// Area counts keyed by status wire name. Statuses with no areas are
    /// omitted.
    pub status_counts: BTreeMap<String, usize>,
}

impl PlanMetrics {
    /// Compute metrics for a plan as of `today`.
    #[must_use]
    pub fn compute(plan: &Plan, today: NaiveDate) -> Self {
        let grouped = plan.areas.iter().filter(|a| a.group.is_some()).count();

        let mut status_counts: BTreeMap<String, usize> = BTreeMap::new();
        for area in &plan.areas {
            *status_counts.entry(area.status.as_str().to_string()).or_insert(0) += 1;
        }

        Self {
            days_remaining: plan
                .end_date
                .map(|end| (end - today).num_days().max(0)),
            total_areas: plan.areas.len(),
            grouped_areas: grouped,
            ungrouped_areas: plan.areas.len() - grouped,
            group_count: plan.groups.len(),
            status_counts,
        }
    }

    /// Areas counted in to-do statuses.
    #[must_use]
    pub fn to_do(&self) -> usize {
        self.bucket(WorkAreaStatus::is_to_do)
    }

    /// Areas counted in in-progress statuses.
    #[must_use]
    pub fn in_progress(&self) -> usize {
        self.bucket(WorkAreaStatus::is_in_progress)
    }

    /// Areas counted in terminal statuses.
    #[must_use]
    pub fn terminal(&self) -> usize {
        self.bucket(WorkAreaStatus::is_terminal)
    }

    fn bucket(&self, pred: impl Fn(WorkAreaStatus) -> bool) -> usize {
        WorkAreaStatus::ALL
            .into_iter()
            .filter(|s| pred(*s))
            .filter_map(|s| self.status_counts.get(s.as_str()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{WorkAreaDraft, WorkAreaStatus};
    use geo::{point, polygon};

    fn plan_with_statuses(statuses: &[WorkAreaStatus]) -> Plan {
        let mut plan = Plan::new(1);
        for (i, status) in statuses.iter().enumerate() {
            plan.add_area(WorkAreaDraft {
                slug: format!("area-{i}"),
                ward: "w".to_string(),
                centroid: point! { x: 0.0, y: 0.0 },
                boundary: polygon![
                    (x: 0.0, y: 0.0),
                    (x: 1.0, y: 0.0),
                    (x: 1.0, y: 1.0),
                    (x: 0.0, y: 1.0),
                ],
                building_count: 1,
                expected_visit_count: 1,
                status: *status,
                group: None,
            })
            .unwrap();
        }
        plan
    }

    #[test]
    fn test_days_remaining_clamped_at_zero() {
        let mut plan = Plan::new(1);
        plan.end_date = NaiveDate::from_ymd_opt(2026, 1, 1);

        let before = PlanMetrics::compute(&plan, NaiveDate::from_ymd_opt(2025, 12, 30).unwrap());
        assert_eq!(before.days_remaining, Some(2));

        let after = PlanMetrics::compute(&plan, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(after.days_remaining, Some(0));
    }

    #[test]
    fn test_days_remaining_without_end_date() {
        let plan = Plan::new(1);
        let metrics = PlanMetrics::compute(&plan, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(metrics.days_remaining, None);
    }

    #[test]
    fn test_status_buckets() {
        let plan = plan_with_statuses(&[
            WorkAreaStatus::Unassigned,
            WorkAreaStatus::NotVisited,
            WorkAreaStatus::Visited,
            WorkAreaStatus::Excluded,
            WorkAreaStatus::Excluded,
        ]);
        let metrics = PlanMetrics::compute(&plan, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());

        assert_eq!(metrics.total_areas, 5);
        assert_eq!(metrics.to_do(), 2);
        assert_eq!(metrics.in_progress(), 1);
        assert_eq!(metrics.terminal(), 2);
        assert_eq!(metrics.status_counts.get("excluded"), Some(&2));
    }
}
