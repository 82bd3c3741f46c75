//! The sort stage of the task pipeline.
//!
//! Ordering is total for every key and the underlying sort is stable, so
//! tasks with equal keys keep their relative order from the input — in
//! both directions, since `Desc` negates the comparator rather than
//! reversing the result.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::fields::{SortDirection, SortKey};
use crate::task::Task;

/// Order a filtered task list in place by the chosen key and direction.
///
/// Tasks without a due date compare as later than any dated task, so they
/// sink to the end under `Asc` and lead under `Desc`.
pub fn sort_tasks(tasks: &mut [&Task], key: SortKey, direction: SortDirection) {
    tasks.sort_by(|a, b| {
        let ord = compare(a, b, key);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn compare(a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::Due => a
            .due
            .unwrap_or(NaiveDate::MAX)
            .cmp(&b.due.unwrap_or(NaiveDate::MAX)),
        SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortKey::Status => a.status.rank().cmp(&b.status.rank()),
        SortKey::Content => a.content.cmp(&b.content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use crate::seed;

    fn ids<'a>(tasks: &'a [&'a Task]) -> Vec<&'a str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn priority_desc_leads_with_high_and_ends_with_low() {
        let store = seed::sample();
        let mut tasks: Vec<&Task> = store.tasks().iter().collect();
        sort_tasks(&mut tasks, SortKey::Priority, SortDirection::Desc);

        // The two high tasks come first in their original relative order;
        // the low tasks close the list.
        assert_eq!(&ids(&tasks)[..2], &["task-3", "task-6"]);
        assert!(tasks[tasks.len() - 2..]
            .iter()
            .all(|t| t.priority == Priority::Low));
    }

    #[test]
    fn equal_keys_keep_input_order_in_both_directions() {
        let store = seed::sample();
        let mediums: Vec<&str> = store
            .tasks()
            .iter()
            .filter(|t| t.priority == Priority::Medium)
            .map(|t| t.id.as_str())
            .collect();

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let mut tasks: Vec<&Task> = store.tasks().iter().collect();
            sort_tasks(&mut tasks, SortKey::Priority, direction);
            let sorted_mediums: Vec<&str> = tasks
                .iter()
                .filter(|t| t.priority == Priority::Medium)
                .map(|t| t.id.as_str())
                .collect();
            assert_eq!(sorted_mediums, mediums);
        }
    }

    #[test]
    fn asc_reversed_equals_desc_over_distinct_keys() {
        let store = seed::sample();
        // Restrict to tasks with distinct due dates so the property is
        // well defined under a stable sort.
        let mut dated: Vec<&Task> = store.tasks().iter().filter(|t| t.due.is_some()).collect();
        let mut reversed = dated.clone();

        sort_tasks(&mut dated, SortKey::Due, SortDirection::Desc);
        sort_tasks(&mut reversed, SortKey::Due, SortDirection::Asc);
        reversed.reverse();

        assert_eq!(ids(&dated), ids(&reversed));
    }

    #[test]
    fn undated_tasks_sort_last_when_ascending() {
        let store = seed::sample();
        let mut tasks: Vec<&Task> = store.tasks().iter().collect();
        sort_tasks(&mut tasks, SortKey::Due, SortDirection::Asc);

        let undated = tasks.iter().filter(|t| t.due.is_none()).count();
        assert!(undated > 0);
        assert!(tasks[tasks.len() - undated..]
            .iter()
            .all(|t| t.due.is_none()));
        // Dated tasks are in date order ahead of them.
        let dates: Vec<_> = tasks.iter().filter_map(|t| t.due).collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn status_and_content_keys_order_by_rank_and_text() {
        let store = seed::sample();

        let mut tasks: Vec<&Task> = store.tasks().iter().collect();
        sort_tasks(&mut tasks, SortKey::Status, SortDirection::Asc);
        let ranks: Vec<u8> = tasks.iter().map(|t| t.status.rank()).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));

        let mut tasks: Vec<&Task> = store.tasks().iter().collect();
        sort_tasks(&mut tasks, SortKey::Content, SortDirection::Asc);
        let contents: Vec<&str> = tasks.iter().map(|t| t.content.as_str()).collect();
        let mut expected = contents.clone();
        expected.sort_unstable();
        assert_eq!(contents, expected);
    }
}
