use std::collections::HashSet;

use serde::de::Error as _;

use crate::io::kv::{KeyValueStore, StorageError};
use crate::model::task::{ParseError, Task};
use crate::model::theme::ThemeName;

/// Key holding the JSON array of tasks
pub const TASKS_KEY: &str = "tasks";
/// Key holding the bare theme name
pub const THEME_KEY: &str = "theme";
/// Where an unreadable `tasks` payload is copied before it is overwritten
pub const TASKS_BACKUP_KEY: &str = "tasks.bak";

/// Error type for loading and saving persisted state
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("could not encode tasks: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("stored tasks are malformed: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("stored theme is invalid: {0}")]
    Theme(#[from] ParseError),
    #[error("stored tasks could not be read or backed up, so they were not overwritten")]
    NotBackedUp,
}

/// Serialize the collection in its persisted order
pub fn encode_tasks(tasks: &[Task]) -> Result<String, PersistError> {
    serde_json::to_string(tasks).map_err(PersistError::Encode)
}

/// Parse a persisted task array, reviving timestamp strings.
///
/// A payload whose ids are not unique is rejected as malformed.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>, PersistError> {
    let tasks: Vec<Task> = serde_json::from_str(raw).map_err(PersistError::Malformed)?;
    let mut seen = HashSet::new();
    for task in &tasks {
        if !seen.insert(task.id) {
            return Err(PersistError::Malformed(serde_json::Error::custom(
                format!("duplicate task id {}", task.id),
            )));
        }
    }
    Ok(tasks)
}

/// Read the `tasks` key. `Ok(None)` when it was never written.
pub fn load_tasks<S: KeyValueStore>(storage: &S) -> Result<Option<Vec<Task>>, PersistError> {
    match storage.get(TASKS_KEY)? {
        Some(raw) => decode_tasks(&raw).map(Some),
        None => Ok(None),
    }
}

pub fn save_tasks<S: KeyValueStore>(storage: &mut S, tasks: &[Task]) -> Result<(), PersistError> {
    let raw = encode_tasks(tasks)?;
    storage.set(TASKS_KEY, &raw)?;
    Ok(())
}

/// Read the `theme` key. `Ok(None)` when it was never written.
pub fn load_theme<S: KeyValueStore>(storage: &S) -> Result<Option<ThemeName>, PersistError> {
    match storage.get(THEME_KEY)? {
        Some(raw) => Ok(Some(raw.trim().parse()?)),
        None => Ok(None),
    }
}

pub fn save_theme<S: KeyValueStore>(storage: &mut S, theme: ThemeName) -> Result<(), PersistError> {
    storage.set(THEME_KEY, theme.as_str())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::kv::MemoryStore;
    use crate::model::task::{Priority, TaskStatus};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn sample_tasks() -> Vec<Task> {
        let created = Utc.timestamp_millis_opt(1_717_171_717_171).unwrap();
        let mut a = Task::new(2, "Finish report", Priority::High, created);
        a.status = TaskStatus::InProgress;
        a.category = Some("work".into());
        a.is_starred = true;
        let mut b = Task::new(1, "Buy milk", Priority::Low, created);
        b.due_date = Some(Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap());
        vec![a, b]
    }

    #[test]
    fn tasks_round_trip_through_storage() {
        let mut storage = MemoryStore::new();
        let tasks = sample_tasks();
        save_tasks(&mut storage, &tasks).unwrap();
        assert_eq!(load_tasks(&storage).unwrap(), Some(tasks));
    }

    #[test]
    fn missing_keys_load_as_none() {
        let storage = MemoryStore::new();
        assert_eq!(load_tasks(&storage).unwrap(), None);
        assert_eq!(load_theme(&storage).unwrap(), None);
    }

    #[test]
    fn timestamps_are_stored_as_strings() {
        let raw = encode_tasks(&sample_tasks()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["createdAt"], "2024-05-31T16:08:37.171Z");
        assert_eq!(value[1]["dueDate"], "2025-01-02T00:00:00Z");
        assert!(value[0].get("dueDate").is_none());
    }

    #[test]
    fn malformed_payloads_rejected() {
        assert!(matches!(
            decode_tasks("not json {{{"),
            Err(PersistError::Malformed(_))
        ));
        assert!(matches!(
            decode_tasks(r#"[{"id": 1, "text": "x"}]"#),
            Err(PersistError::Malformed(_))
        ));
        assert!(matches!(
            decode_tasks(
                r#"[{"id":1,"text":"x","status":"Blocked","priority":"Low","createdAt":"2024-01-01T00:00:00Z"}]"#
            ),
            Err(PersistError::Malformed(_))
        ));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let raw = r#"[
            {"id":1,"text":"a","status":"To Do","priority":"Low","createdAt":"2024-01-01T00:00:00Z","isStarred":false},
            {"id":1,"text":"b","status":"Done","priority":"High","createdAt":"2024-01-02T00:00:00Z","isStarred":false}
        ]"#;
        let err = decode_tasks(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate task id 1"));
    }

    #[test]
    fn theme_stored_as_bare_name() {
        let mut storage = MemoryStore::new();
        save_theme(&mut storage, ThemeName::Sunset).unwrap();
        assert_eq!(storage.get(THEME_KEY).unwrap(), Some("sunset".into()));
        assert_eq!(load_theme(&storage).unwrap(), Some(ThemeName::Sunset));
    }

    #[test]
    fn unknown_theme_is_an_error() {
        let storage = MemoryStore::new().with(THEME_KEY, "neon");
        assert!(matches!(load_theme(&storage), Err(PersistError::Theme(_))));
    }
}
