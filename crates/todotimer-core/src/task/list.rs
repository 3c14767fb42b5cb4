use serde::{Deserialize, Serialize};
use tracing::warn;

use super::form::{validate_duration, validate_name};
use super::{Task, TaskId, TaskUpdate};
use crate::error::{IndexError, ValidationError};

/// Ordered task collection. Ids are unique; order is insertion/reorder
/// order with no implicit sort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from previously persisted tasks.
    ///
    /// Entries that would break the list invariants (duplicate id, blank
    /// name, zero duration) are dropped with a warning.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut list = Self::new();
        for mut task in tasks {
            if list.get(&task.id).is_some() {
                warn!(id = %task.id, "dropping persisted task with duplicate id");
                continue;
            }
            match (validate_name(&task.name), validate_duration(task.duration)) {
                (Ok(name), Ok(_)) => {
                    task.name = name;
                    list.tasks.push(task);
                }
                (Err(e), _) | (_, Err(e)) => {
                    warn!(id = %task.id, error = %e, "dropping invalid persisted task");
                }
            }
        }
        list
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn get_index(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a new task with a freshly generated id.
    pub fn add(&mut self, name: &str, duration: u32) -> Result<Task, ValidationError> {
        let name = validate_name(name)?;
        let duration = validate_duration(duration)?;
        let mut id = TaskId::generate();
        while self.get(&id).is_some() {
            id = TaskId::generate();
        }
        let task = Task { id, name, duration };
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Merge `update` into the task with `id`.
    ///
    /// Returns `Ok(false)` when the id is unknown, whatever the update
    /// holds. Every supplied field is validated before anything is written.
    pub fn update(&mut self, id: &TaskId, update: TaskUpdate) -> Result<bool, ValidationError> {
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            return Ok(false);
        };
        let name = update.name.as_deref().map(validate_name).transpose()?;
        let duration = update.duration.map(validate_duration).transpose()?;
        if let Some(name) = name {
            task.name = name;
        }
        if let Some(duration) = duration {
            task.duration = duration;
        }
        Ok(true)
    }

    /// Remove the task with `id`, returning the index it occupied.
    pub fn remove(&mut self, id: &TaskId) -> Option<(usize, Task)> {
        let index = self.position(id)?;
        Some((index, self.tasks.remove(index)))
    }

    /// Move the element at `from` so that it ends up at `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), IndexError> {
        let len = self.tasks.len();
        for index in [from, to] {
            if index >= len {
                return Err(IndexError { index, len });
            }
        }
        if from != to {
            let task = self.tasks.remove(from);
            self.tasks.insert(to, task);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn names(list: &TaskList) -> Vec<&str> {
        list.iter().map(|t| t.name.as_str()).collect()
    }

    fn list_of(names: &[&str]) -> TaskList {
        let mut list = TaskList::new();
        for name in names {
            list.add(name, 5).unwrap();
        }
        list
    }

    #[test]
    fn add_then_lookup_returns_same_fields() {
        let mut list = TaskList::new();
        let task = list.add("Email", 15).unwrap();
        let found = list.get(&task.id).unwrap();
        assert_eq!(found.name, "Email");
        assert_eq!(found.duration, 15);
        assert_eq!(list.position(&task.id), Some(0));
    }

    #[test]
    fn add_rejects_empty_name_and_leaves_list_unchanged() {
        let mut list = list_of(&["A"]);
        assert_eq!(list.add("", 10), Err(ValidationError::EmptyName));
        assert_eq!(list.add("   ", 10), Err(ValidationError::EmptyName));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn add_rejects_zero_duration() {
        let mut list = TaskList::new();
        assert_eq!(
            list.add("A", 0),
            Err(ValidationError::NonPositiveDuration(0))
        );
        assert!(list.is_empty());
    }

    #[test]
    fn add_appends_to_end() {
        let list = list_of(&["A", "B", "C"]);
        assert_eq!(names(&list), vec!["A", "B", "C"]);
    }

    #[test]
    fn update_merges_fields_in_place() {
        let mut list = list_of(&["A", "B"]);
        let id = list.get_index(1).unwrap().id.clone();

        assert_eq!(list.update(&id, TaskUpdate::duration(30)), Ok(true));
        assert_eq!(list.update(&id, TaskUpdate::name(" Bee ")), Ok(true));

        let task = list.get_index(1).unwrap();
        assert_eq!(task.id, id);
        assert_eq!(task.name, "Bee");
        assert_eq!(task.duration, 30);
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut list = list_of(&["A"]);
        let before = list.clone();
        assert_eq!(
            list.update(&TaskId::from("missing"), TaskUpdate::name("Z")),
            Ok(false)
        );
        assert_eq!(
            list.update(&TaskId::from("missing"), TaskUpdate::duration(0)),
            Ok(false)
        );
        assert_eq!(list, before);
    }

    #[test]
    fn invalid_update_leaves_task_unchanged() {
        let mut list = list_of(&["A"]);
        let id = list.get_index(0).unwrap().id.clone();
        let before = list.clone();

        let update = TaskUpdate {
            name: Some("Renamed".into()),
            duration: Some(0),
        };
        assert_eq!(
            list.update(&id, update),
            Err(ValidationError::NonPositiveDuration(0))
        );
        assert_eq!(list, before);
    }

    #[test]
    fn remove_reports_index() {
        let mut list = list_of(&["A", "B", "C"]);
        let id = list.get_index(1).unwrap().id.clone();
        let (index, task) = list.remove(&id).unwrap();
        assert_eq!(index, 1);
        assert_eq!(task.name, "B");
        assert_eq!(names(&list), vec!["A", "C"]);
        assert!(list.remove(&id).is_none());
    }

    #[test]
    fn reorder_swaps_pair() {
        let mut list = list_of(&["A", "B"]);
        list.reorder(0, 1).unwrap();
        assert_eq!(names(&list), vec!["B", "A"]);
    }

    #[test]
    fn reorder_follows_splice_semantics() {
        let mut list = list_of(&["A", "B", "C", "D"]);
        list.reorder(0, 2).unwrap();
        assert_eq!(names(&list), vec!["B", "C", "A", "D"]);
        list.reorder(3, 0).unwrap();
        assert_eq!(names(&list), vec!["D", "B", "C", "A"]);
    }

    #[test]
    fn reorder_same_index_is_noop() {
        let mut list = list_of(&["A", "B"]);
        list.reorder(1, 1).unwrap();
        assert_eq!(names(&list), vec!["A", "B"]);
    }

    #[test]
    fn reorder_out_of_range_errors() {
        let mut list = list_of(&["A", "B"]);
        assert_eq!(list.reorder(2, 0), Err(IndexError { index: 2, len: 2 }));
        assert_eq!(list.reorder(0, 5), Err(IndexError { index: 5, len: 2 }));
        assert_eq!(names(&list), vec!["A", "B"]);
    }

    #[test]
    fn clear_empties_list() {
        let mut list = list_of(&["A", "B"]);
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn from_tasks_drops_duplicates_and_invalid_entries() {
        let tasks = vec![
            Task { id: "1".into(), name: " A ".into(), duration: 5 },
            Task { id: "1".into(), name: "A again".into(), duration: 5 },
            Task { id: "2".into(), name: "".into(), duration: 5 },
            Task { id: "3".into(), name: "C".into(), duration: 0 },
            Task { id: "4".into(), name: "D".into(), duration: 10 },
        ];
        let list = TaskList::from_tasks(tasks);
        assert_eq!(names(&list), vec!["A", "D"]);
    }

    proptest! {
        #[test]
        fn ids_are_unique(count in 1usize..64) {
            let mut list = TaskList::new();
            for i in 0..count {
                list.add(&format!("task {i}"), 1).unwrap();
            }
            let ids: HashSet<_> = list.iter().map(|t| t.id.clone()).collect();
            prop_assert_eq!(ids.len(), count);
        }

        #[test]
        fn reorder_round_trips(len in 1usize..12, a in 0usize..12, b in 0usize..12) {
            let from = a % len;
            let to = b % len;
            let labels: Vec<String> = (0..len).map(|i| i.to_string()).collect();
            let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let mut list = list_of(&refs);
            let original = list.clone();

            list.reorder(from, to).unwrap();

            let mut expected: Vec<String> = labels.clone();
            let moved = expected.remove(from);
            expected.insert(to, moved);
            prop_assert_eq!(
                list.iter().map(|t| t.name.clone()).collect::<Vec<_>>(),
                expected
            );

            list.reorder(to, from).unwrap();
            prop_assert_eq!(list, original);
        }
    }
}
