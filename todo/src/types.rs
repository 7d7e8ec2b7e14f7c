//! Domain types for the todo list.
//!
//! A todo list is an ordered collection of tasks, a staged input buffer and
//! the currently selected filter. The collection always keeps open tasks in
//! front of finished ones.
//!
//! Every task carries two identifiers:
//!
//! - [`TaskId`] names the task for its whole life.
//! - [`RenderKey`] names the task *as currently rendered*. It is replaced on
//!   every toggle, so a list keyed by it plays an exit and an enter
//!   transition whenever a task changes status. Toggle and delete look tasks
//!   up by render key, which makes a stale key from an older render a no-op.

use crate::error::TodoError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a task, fixed from creation to deletion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a `TaskId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rendering key of a task, regenerated whenever its status flips
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderKey(Uuid);

impl RenderKey {
    /// Creates a `RenderKey` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RenderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identity
    pub id: TaskId,
    /// Current rendering key
    pub key: RenderKey,
    /// User-provided text, never empty
    pub label: String,
    /// Whether the task is finished
    pub done: bool,
    /// When the task was created
    pub created_at: DateTime<Utc>,
    /// When the status last flipped
    pub toggled_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new open task
    #[must_use]
    pub const fn new(id: TaskId, key: RenderKey, label: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            key,
            label,
            done: false,
            created_at,
            toggled_at: None,
        }
    }
}

/// Which tasks are visible
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every task
    #[default]
    All,
    /// Tasks not yet done
    Active,
    /// Finished tasks
    Done,
}

impl Filter {
    /// Every filter, in the order filter controls are shown
    pub const ALL_FILTERS: [Self; 3] = [Self::All, Self::Active, Self::Done];

    /// Whether `task` passes this filter
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.done,
            Self::Done => task.done,
        }
    }

    /// Lowercase name, as accepted by [`Filter::from_str`]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = TodoError;

    /// Parses `all`, `active` or `done`. Matching is exact.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "done" => Ok(Self::Done),
            other => Err(TodoError::InvalidFilter(other.to_string())),
        }
    }
}

/// Stable partition of `todos`: open tasks first, then done tasks
///
/// Relative order inside each group is preserved.
pub fn sort_todos(todos: &mut [Task]) {
    todos.sort_by_key(|task| task.done);
}

/// State of the todo list
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoState {
    /// All tasks, open ones first
    pub todos: Vec<Task>,
    /// Text staged for the next submit
    pub input: String,
    /// Current filter selection
    pub filter: Filter,
}

impl TodoState {
    /// Creates an empty state: no tasks, empty input, filter `all`
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the number of tasks
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of open tasks
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.done).count()
    }

    /// Returns the number of finished tasks
    #[must_use]
    pub fn done_count(&self) -> usize {
        self.todos.iter().filter(|t| t.done).count()
    }

    /// Returns the task currently rendered under `key`
    #[must_use]
    pub fn get(&self, key: &RenderKey) -> Option<&Task> {
        self.todos.iter().find(|t| &t.key == key)
    }

    /// Returns the task with stable identity `id`
    #[must_use]
    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.todos.iter().find(|t| &t.id == id)
    }

    /// Returns the current render key of task `id`
    ///
    /// Use this to follow a task across toggles.
    #[must_use]
    pub fn key_of(&self, id: &TaskId) -> Option<RenderKey> {
        self.find(id).map(|t| t.key)
    }

    /// Returns the first task with the given label, in list order
    #[must_use]
    pub fn find_by_label(&self, label: &str) -> Option<&Task> {
        self.todos.iter().find(|t| t.label == label)
    }

    /// Checks if a task is rendered under `key`
    #[must_use]
    pub fn contains_key(&self, key: &RenderKey) -> bool {
        self.get(key).is_some()
    }

    /// Checks if a task with identity `id` exists
    #[must_use]
    pub fn contains_id(&self, id: &TaskId) -> bool {
        self.find(id).is_some()
    }

    /// Checks that no done task precedes an open one
    #[must_use]
    pub fn is_partitioned(&self) -> bool {
        self.todos.is_sorted_by_key(|t| t.done)
    }
}

/// Actions representing commands and events for the todo list
///
/// Commands express intent and are validated by the reducer. A valid command
/// produces exactly one event, which is applied to state and broadcast to
/// observers. Events carry every generated id and timestamp, so applying the
/// same events to the same state always gives the same result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Add an open task with this label
    AddTodo {
        /// Label of the new task
        label: String,
    },

    /// Command: Add a task from the staged input buffer
    SubmitInput,

    /// Command: Flip the status of the task rendered under `key`
    ToggleTodo {
        /// Render key of the task
        key: RenderKey,
    },

    /// Command: Remove the task rendered under `key`
    DeleteTodo {
        /// Render key of the task
        key: RenderKey,
    },

    /// Command: Select a filter
    SetFilter {
        /// New filter
        filter: Filter,
    },

    /// Command: Replace the staged input text
    SetInput {
        /// New buffer contents
        text: String,
    },

    // ========== Events ==========
    /// Event: Task was added
    TodoAdded {
        /// Stable identity
        id: TaskId,
        /// Initial render key
        key: RenderKey,
        /// Label, already normalized
        label: String,
        /// When the task was created
        created_at: DateTime<Utc>,
    },

    /// Event: Task status flipped and its render key was replaced
    TodoToggled {
        /// Stable identity
        id: TaskId,
        /// Render key before the toggle
        previous_key: RenderKey,
        /// Render key after the toggle
        key: RenderKey,
        /// New status
        done: bool,
        /// When the toggle happened
        toggled_at: DateTime<Utc>,
    },

    /// Event: Task was removed
    TodoDeleted {
        /// Stable identity
        id: TaskId,
        /// Render key at removal
        key: RenderKey,
    },

    /// Event: Filter selection changed
    FilterChanged {
        /// New filter
        filter: Filter,
    },

    /// Event: Input buffer changed
    InputChanged {
        /// New buffer contents
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(n: u128, label: &str, done: bool) -> Task {
        let mut task = Task::new(
            TaskId::from_uuid(Uuid::from_u128(n)),
            RenderKey::from_uuid(Uuid::from_u128(n + 100)),
            label.to_string(),
            DateTime::<Utc>::default(),
        );
        task.done = done;
        task
    }

    #[test]
    fn task_new_is_open() {
        let item = task(1, "Test todo", false);
        assert_eq!(item.label, "Test todo");
        assert!(!item.done);
        assert_eq!(item.toggled_at, None);
    }

    #[test]
    fn sort_partitions_stably() {
        let mut todos = vec![
            task(1, "a", true),
            task(2, "b", false),
            task(3, "c", true),
            task(4, "d", false),
        ];

        sort_todos(&mut todos);

        let labels: Vec<_> = todos.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["b", "d", "a", "c"]);
    }

    #[test]
    fn partition_check() {
        let mut state = TodoState::empty();
        state.todos = vec![task(1, "a", true), task(2, "b", false)];
        assert!(!state.is_partitioned());

        sort_todos(&mut state.todos);
        assert!(state.is_partitioned());
    }

    #[test]
    fn lookups_by_key_and_id() {
        let mut state = TodoState::empty();
        state.todos = vec![task(1, "a", false), task(2, "b", true)];
        let id = TaskId::from_uuid(Uuid::from_u128(2));
        let key = RenderKey::from_uuid(Uuid::from_u128(102));

        assert_eq!(state.key_of(&id), Some(key));
        assert_eq!(state.get(&key).map(|t| t.id), Some(id));
        assert!(state.contains_id(&id));
        assert!(!state.contains_key(&RenderKey::from_uuid(Uuid::from_u128(2))));
        assert_eq!(state.find_by_label("a").map(|t| t.done), Some(false));
        assert_eq!(state.active_count(), 1);
        assert_eq!(state.done_count(), 1);
    }

    #[test]
    fn filter_parses_known_names_only() {
        for filter in Filter::ALL_FILTERS {
            assert_eq!(filter.as_str().parse::<Filter>(), Ok(filter));
        }
        assert_eq!(
            "bogus".parse::<Filter>(),
            Err(TodoError::InvalidFilter("bogus".to_string()))
        );
        assert!("All".parse::<Filter>().is_err());
    }

    #[test]
    fn filter_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Filter::Active).ok().as_deref(), Some("\"active\""));
        assert!(serde_json::from_str::<Filter>("\"bogus\"").is_err());
    }

    #[test]
    fn filter_matches() {
        let open = task(1, "open", false);
        let done = task(2, "done", true);

        assert!(Filter::All.matches(&open) && Filter::All.matches(&done));
        assert!(Filter::Active.matches(&open) && !Filter::Active.matches(&done));
        assert!(!Filter::Done.matches(&open) && Filter::Done.matches(&done));
    }
}
