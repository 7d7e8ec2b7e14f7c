//! `TodoStore`: the todo list wired into the store runtime.
//!
//! This is the surface a presentation layer talks to. Mutating methods take
//! `&mut self` and run to completion, so a reader never observes a half
//! applied change.

use crate::config::{SeedTask, TodoConfig};
use crate::error::TodoError;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{Filter, RenderKey, Task, TaskId, TodoAction, TodoState};
use crate::view::{TodoView, visible_todos};
use todo_engine_core::{effect::Effect, reducer::Reducer};
use todo_engine_runtime::Store;
use tokio::sync::broadcast;

/// Owned todo list with its reducer and environment
pub struct TodoStore {
    store: Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>,
}

impl TodoStore {
    /// Default configuration with the production environment
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&TodoConfig::default(), TodoEnvironment::production())
    }

    /// Default configuration with the given environment
    #[must_use]
    pub fn with_environment(env: TodoEnvironment) -> Self {
        Self::with_config(&TodoConfig::default(), env)
    }

    /// Build a store from `config`, seeding its tasks through the reducer
    #[must_use]
    pub fn with_config(config: &TodoConfig, env: TodoEnvironment) -> Self {
        let reducer = TodoReducer::with_label_policy(config.label_policy);
        let state = seed_state(&reducer, &config.seed, &env);

        tracing::debug!(
            tasks = state.count(),
            label_policy = %config.label_policy,
            "Created todo store"
        );

        Self {
            store: Store::with_config(state, reducer, env, &config.store),
        }
    }

    /// Send a raw action
    pub fn send(&mut self, action: TodoAction) {
        self.store.send(action);
    }

    /// Add an open task; an empty label is ignored
    pub fn add_todo(&mut self, label: impl Into<String>) {
        self.send(TodoAction::AddTodo {
            label: label.into(),
        });
    }

    /// Add a task from the staged input buffer
    pub fn submit_input(&mut self) {
        self.send(TodoAction::SubmitInput);
    }

    /// Flip the task rendered under `key`; unknown keys are ignored
    ///
    /// The task receives a new render key.
    pub fn toggle_todo(&mut self, key: RenderKey) {
        self.send(TodoAction::ToggleTodo { key });
    }

    /// Remove the task rendered under `key`; unknown keys are ignored
    pub fn delete_todo(&mut self, key: RenderKey) {
        self.send(TodoAction::DeleteTodo { key });
    }

    /// Select a filter
    pub fn set_filter(&mut self, filter: Filter) {
        self.send(TodoAction::SetFilter { filter });
    }

    /// Select a filter by name
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::InvalidFilter`] for anything but `all`, `active`
    /// or `done`; the store is left unchanged.
    pub fn set_filter_str(&mut self, filter: &str) -> Result<(), TodoError> {
        let filter = filter.parse::<Filter>().inspect_err(|error| {
            tracing::warn!(%error, "Rejected filter selection");
        })?;
        self.set_filter(filter);
        Ok(())
    }

    /// Stage text for the next submit
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.send(TodoAction::SetInput { text: text.into() });
    }

    /// Tasks passing the current filter, in display order
    #[must_use]
    pub fn visible_todos(&self) -> Vec<Task> {
        self.store.state(|s| {
            visible_todos(&s.todos, s.filter)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Render-ready snapshot
    #[must_use]
    pub fn view(&self) -> TodoView {
        self.store.state(TodoView::project)
    }

    /// The current filter
    #[must_use]
    pub fn current_filter(&self) -> Filter {
        self.store.state(|s| s.filter)
    }

    /// The staged input text
    #[must_use]
    pub fn input_buffer(&self) -> String {
        self.store.state(|s| s.input.clone())
    }

    /// Every task, open ones first
    #[must_use]
    pub fn todos(&self) -> Vec<Task> {
        self.store.state(|s| s.todos.clone())
    }

    /// Current render key of task `id`
    #[must_use]
    pub fn key_of(&self, id: TaskId) -> Option<RenderKey> {
        self.store.state(|s| s.key_of(&id))
    }

    /// Read state via a closure
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&TodoState) -> T,
    {
        self.store.state(f)
    }

    /// Subscribe to the events produced by every applied command
    ///
    /// A `TodoToggled` event carries both the render key leaving the list
    /// and the one entering it.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TodoAction> {
        self.store.subscribe_actions()
    }
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore").field("store", &self.store).finish()
    }
}

/// Runs the seed through the reducer so seeded tasks obey the same rules as
/// tasks added later
fn seed_state(reducer: &TodoReducer, seed: &[SeedTask], env: &TodoEnvironment) -> TodoState {
    let mut state = TodoState::empty();

    for task in seed {
        let effects = reducer.reduce(
            &mut state,
            TodoAction::AddTodo {
                label: task.label.clone(),
            },
            env,
        );

        let added = effects.iter().find_map(|effect| match effect {
            Effect::Broadcast(TodoAction::TodoAdded { key, .. }) => Some(*key),
            _ => None,
        });

        match added {
            Some(key) if task.done => {
                reducer.reduce(&mut state, TodoAction::ToggleTodo { key }, env);
            },
            Some(_) => {},
            None => tracing::warn!(label = %task.label, "Skipped seed task with empty label"),
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelPolicy;
    use std::sync::Arc;
    use todo_engine_testing::{SequentialIdGenerator, test_clock};

    fn test_env() -> TodoEnvironment {
        TodoEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::new()))
    }

    #[test]
    fn default_store_is_seeded() {
        let store = TodoStore::with_environment(test_env());
        let todos = store.todos();

        assert_eq!(todos.len(), 2);
        assert_eq!((todos[0].label.as_str(), todos[0].done), ("Add some todos", false));
        assert_eq!((todos[1].label.as_str(), todos[1].done), ("I am done", true));
        assert_eq!(store.current_filter(), Filter::All);
        assert_eq!(store.input_buffer(), "");
    }

    #[test]
    fn seed_is_partitioned_whatever_its_order() {
        let config = TodoConfig::default().with_seed(vec![
            SeedTask::new("done first", true),
            SeedTask::new("open second", false),
        ]);
        let store = TodoStore::with_config(&config, test_env());

        let labels: Vec<_> = store.todos().into_iter().map(|t| t.label).collect();
        assert_eq!(labels, ["open second", "done first"]);
    }

    #[test]
    fn seed_skips_labels_rejected_by_policy() {
        let config = TodoConfig::default()
            .with_label_policy(LabelPolicy::Trim)
            .with_seed(vec![SeedTask::new("   ", false), SeedTask::new(" kept ", false)]);
        let store = TodoStore::with_config(&config, test_env());

        let labels: Vec<_> = store.todos().into_iter().map(|t| t.label).collect();
        assert_eq!(labels, ["kept"]);
    }

    #[test]
    fn seeding_broadcasts_nothing_to_later_subscribers() {
        let store = TodoStore::with_environment(test_env());
        let mut rx = store.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn key_of_follows_task_across_toggles() {
        let mut store = TodoStore::with_environment(test_env());
        let task = store.todos()[0].clone();

        store.toggle_todo(task.key);
        let new_key = store.key_of(task.id);

        assert!(new_key.is_some());
        assert_ne!(new_key, Some(task.key));
        store.toggle_todo(new_key.unwrap_or(task.key));
        assert_eq!(store.state(|s| s.find(&task.id).map(|t| t.done)), Some(false));
    }
}
