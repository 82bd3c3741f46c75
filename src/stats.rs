//! Derived aggregates over a task collection.
//!
//! Pure summary statistics for display. Callers choose the collection:
//! the CLI computes them over the full store, the board over whatever the
//! current filter leaves visible. Percentages are fractions in [0, 1] and
//! every division is guarded, so an empty collection yields zeros rather
//! than a panic.

use std::collections::BTreeMap;

use crate::fields::{Priority, TaskStatus};
use crate::task::Task;

/// An assignee counts as heavily loaded above this many tasks.
pub const HEAVY_LOAD_THRESHOLD: usize = 3;

/// Task count per status bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub review: usize,
    pub done: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.review + self.done
    }

    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Review => self.review,
            TaskStatus::Done => self.done,
        }
    }
}

/// Count and share of the total for one priority bucket.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PriorityShare {
    pub count: usize,
    pub share: f64,
}

/// Count and share per priority bucket.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PriorityBreakdown {
    pub low: PriorityShare,
    pub medium: PriorityShare,
    pub high: PriorityShare,
    pub total: usize,
}

impl PriorityBreakdown {
    pub fn get(&self, priority: Priority) -> &PriorityShare {
        match priority {
            Priority::Low => &self.low,
            Priority::Medium => &self.medium,
            Priority::High => &self.high,
        }
    }
}

/// Task count for one assignee, with the Heavy/Normal workload label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssigneeLoad {
    pub name: String,
    pub count: usize,
}

impl AssigneeLoad {
    pub fn is_heavy(&self) -> bool {
        self.count > HEAVY_LOAD_THRESHOLD
    }

    pub fn label(&self) -> &'static str {
        if self.is_heavy() {
            "Heavy"
        } else {
            "Normal"
        }
    }
}

/// Count tasks per status bucket.
pub fn status_counts<'a, I>(tasks: I) -> StatusCounts
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut counts = StatusCounts::default();
    for task in tasks {
        match task.status {
            TaskStatus::Todo => counts.todo += 1,
            TaskStatus::InProgress => counts.in_progress += 1,
            TaskStatus::Review => counts.review += 1,
            TaskStatus::Done => counts.done += 1,
        }
    }
    counts
}

/// Count tasks per priority bucket and compute each bucket's share of the
/// total. Shares are 0 when the collection is empty.
pub fn priority_breakdown<'a, I>(tasks: I) -> PriorityBreakdown
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut breakdown = PriorityBreakdown::default();
    for task in tasks {
        match task.priority {
            Priority::Low => breakdown.low.count += 1,
            Priority::Medium => breakdown.medium.count += 1,
            Priority::High => breakdown.high.count += 1,
        }
        breakdown.total += 1;
    }
    if breakdown.total > 0 {
        let total = breakdown.total as f64;
        breakdown.low.share = breakdown.low.count as f64 / total;
        breakdown.medium.share = breakdown.medium.count as f64 / total;
        breakdown.high.share = breakdown.high.count as f64 / total;
    }
    breakdown
}

/// Fraction of tasks that are done, 0 when the collection is empty.
pub fn completion_rate<'a, I>(tasks: I) -> f64
where
    I: IntoIterator<Item = &'a Task>,
{
    let counts = status_counts(tasks);
    let total = counts.total();
    if total == 0 {
        return 0.0;
    }
    counts.done as f64 / total as f64
}

/// Task count per assignee, heaviest first (ties broken by name).
/// Unassigned tasks are not bucketed.
pub fn workload<'a, I>(tasks: I) -> Vec<AssigneeLoad>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for task in tasks {
        if let Some(ref who) = task.assigned_to {
            *counts.entry(who.as_str()).or_default() += 1;
        }
    }
    let mut loads: Vec<AssigneeLoad> = counts
        .into_iter()
        .map(|(name, count)| AssigneeLoad {
            name: name.to_string(),
            count,
        })
        .collect();
    loads.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    loads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn status_counts_match_the_fixtures() {
        let store = seed::sample();
        let counts = status_counts(store.tasks());
        assert_eq!(counts.total(), 7);
        assert_eq!(counts.done, 2);
        assert_eq!(counts.todo + counts.in_progress + counts.review, 5);
    }

    #[test]
    fn priority_shares_sum_to_the_total() {
        let store = seed::sample();
        let breakdown = priority_breakdown(store.tasks());
        assert_eq!(
            breakdown.low.count + breakdown.medium.count + breakdown.high.count,
            breakdown.total
        );
        assert_eq!(breakdown.high.count, 2);
        let share_sum = breakdown.low.share + breakdown.medium.share + breakdown.high.share;
        assert!((share_sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn completion_rate_stays_in_unit_interval() {
        let store = seed::sample();
        let rate = completion_rate(store.tasks());
        assert!((0.0..=1.0).contains(&rate));
        assert!((rate - 2.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn empty_collection_yields_zeros_without_panicking() {
        let empty: Vec<Task> = Vec::new();
        assert_eq!(completion_rate(&empty), 0.0);
        let breakdown = priority_breakdown(&empty);
        assert_eq!(breakdown.total, 0);
        assert_eq!(breakdown.high.share, 0.0);
        assert!(workload(&empty).is_empty());
    }

    #[test]
    fn workload_labels_heavy_above_the_threshold() {
        let store = seed::sample();
        let loads = workload(store.tasks());
        // Heaviest first.
        assert_eq!(loads[0].name, "Alice");
        assert_eq!(loads[0].count, 4);
        assert!(loads[0].is_heavy());
        assert_eq!(loads[0].label(), "Heavy");

        let bob = loads.iter().find(|l| l.name == "Bob").unwrap();
        assert_eq!(bob.count, 2);
        assert_eq!(bob.label(), "Normal");

        // The unassigned fixture is not bucketed.
        let assigned: usize = loads.iter().map(|l| l.count).sum();
        assert_eq!(assigned, 6);
    }

    #[test]
    fn exactly_the_threshold_is_still_normal() {
        let load = AssigneeLoad {
            name: "Carol".into(),
            count: HEAVY_LOAD_THRESHOLD,
        };
        assert!(!load.is_heavy());
    }
}
