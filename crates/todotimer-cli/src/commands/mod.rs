pub mod config;
pub mod repeat;
pub mod run;
pub mod session;
pub mod status;
pub mod task;

use todotimer_core::{
    Heartbeat, JsonFileStore, ManualHeartbeat, StateStore, TaskId, TaskList, TodoTimer,
};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Load the persisted list into an idle app.
pub fn open_app<H: Heartbeat>(store: &JsonFileStore, heartbeat: H) -> CliResult<TodoTimer<H>> {
    Ok(TodoTimer::open(store, heartbeat)?)
}

/// Load, apply `f`, and save if anything persisted changed.
pub fn with_app<T>(f: impl FnOnce(&mut TodoTimer<ManualHeartbeat>) -> CliResult<T>) -> CliResult<T> {
    let store = JsonFileStore::open_default()?;
    let mut app = open_app(&store, ManualHeartbeat::new())?;
    let out = f(&mut app)?;
    if app.take_dirty() {
        store.save(&app.persisted_state())?;
    }
    Ok(out)
}

/// Resolve a task by exact id or unique id prefix.
pub fn resolve_id(tasks: &TaskList, key: &str) -> CliResult<TaskId> {
    let key = key.trim();
    if let Some(task) = tasks.get(&TaskId::from(key)) {
        return Ok(task.id.clone());
    }
    let mut matches = tasks.iter().filter(|t| t.id.as_str().starts_with(key));
    match (matches.next(), matches.next()) {
        (Some(task), None) if !key.is_empty() => Ok(task.id.clone()),
        (Some(_), Some(_)) => Err(format!("task id prefix '{key}' is ambiguous").into()),
        _ => Err(format!("no task with id '{key}'").into()),
    }
}

/// Convert a 1-based position from the command line.
pub fn position_to_index(position: usize) -> CliResult<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| "positions start at 1".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use todotimer_core::Task;

    fn list() -> TaskList {
        TaskList::from_tasks(vec![
            Task { id: "abc123".into(), name: "A".into(), duration: 1 },
            Task { id: "abd456".into(), name: "B".into(), duration: 1 },
        ])
    }

    #[test]
    fn resolves_exact_and_prefix() {
        let tasks = list();
        assert_eq!(resolve_id(&tasks, "abc123").unwrap().as_str(), "abc123");
        assert_eq!(resolve_id(&tasks, "abd").unwrap().as_str(), "abd456");
    }

    #[test]
    fn rejects_ambiguous_and_missing() {
        let tasks = list();
        assert!(resolve_id(&tasks, "ab").is_err());
        assert!(resolve_id(&tasks, "zzz").is_err());
        assert!(resolve_id(&tasks, "").is_err());
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(position_to_index(1).unwrap(), 0);
        assert!(position_to_index(0).is_err());
    }
}
