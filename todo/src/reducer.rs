//! Reducer logic for the todo list.
//!
//! Commands are validated against the current state. Invalid ones (empty
//! label, unknown render key) are dropped without touching state. Valid ones
//! are turned into a single event carrying every generated id and timestamp;
//! the event is applied and handed back as a broadcast effect.

use crate::config::LabelPolicy;
use crate::types::{RenderKey, Task, TaskId, TodoAction, TodoState, sort_todos};
use std::sync::Arc;
use todo_engine_core::{
    SmallVec,
    effect::Effect,
    environment::{Clock, IdGenerator, RandomIdGenerator, SystemClock},
    reducer::Reducer,
    smallvec,
};

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for generating timestamps
    pub clock: Arc<dyn Clock>,
    /// Source of task ids and render keys
    pub ids: Arc<dyn IdGenerator>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// System clock and random v4 UUIDs
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(RandomIdGenerator))
    }

    fn next_task_id(&self) -> TaskId {
        TaskId::from_uuid(self.ids.next_id())
    }

    fn next_render_key(&self) -> RenderKey {
        RenderKey::from_uuid(self.ids.next_id())
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug, Default)]
pub struct TodoReducer {
    label_policy: LabelPolicy,
}

impl TodoReducer {
    /// Creates a reducer with the exact label policy
    #[must_use]
    pub const fn new() -> Self {
        Self {
            label_policy: LabelPolicy::Exact,
        }
    }

    /// Creates a reducer applying `policy` to new labels
    #[must_use]
    pub const fn with_label_policy(policy: LabelPolicy) -> Self {
        Self {
            label_policy: policy,
        }
    }

    /// The label policy in effect
    #[must_use]
    pub const fn label_policy(&self) -> LabelPolicy {
        self.label_policy
    }

    /// Builds the event for adding `label`, if it is not empty
    fn add_event(&self, label: &str, env: &TodoEnvironment) -> Option<TodoAction> {
        let Some(label) = self.label_policy.normalize(label) else {
            tracing::debug!(policy = %self.label_policy, "Ignoring add with empty label");
            return None;
        };

        Some(TodoAction::TodoAdded {
            id: env.next_task_id(),
            key: env.next_render_key(),
            label,
            created_at: env.clock.now(),
        })
    }

    /// Builds the event for toggling the task under `key`, if it exists
    fn toggle_event(state: &TodoState, key: RenderKey, env: &TodoEnvironment) -> Option<TodoAction> {
        let Some(task) = state.get(&key) else {
            tracing::debug!(%key, "Ignoring toggle of unknown task");
            return None;
        };

        Some(TodoAction::TodoToggled {
            id: task.id,
            previous_key: key,
            key: env.next_render_key(),
            done: !task.done,
            toggled_at: env.clock.now(),
        })
    }

    /// Builds the event for deleting the task under `key`, if it exists
    fn delete_event(state: &TodoState, key: RenderKey) -> Option<TodoAction> {
        let Some(task) = state.get(&key) else {
            tracing::debug!(%key, "Ignoring delete of unknown task");
            return None;
        };

        Some(TodoAction::TodoDeleted { id: task.id, key })
    }

    /// Applies an event to state
    ///
    /// Returns false, leaving state untouched, when the event would break
    /// an invariant: a reused id or key, or a key that is not present or
    /// belongs to a different task.
    fn apply_event(state: &mut TodoState, action: &TodoAction) -> bool {
        match action {
            TodoAction::TodoAdded {
                id,
                key,
                label,
                created_at,
            } => {
                if label.is_empty() || state.contains_id(id) || state.contains_key(key) {
                    tracing::warn!(%id, %key, "Rejected TodoAdded with empty label or reused identifier");
                    return false;
                }
                state
                    .todos
                    .push(Task::new(*id, *key, label.clone(), *created_at));
                sort_todos(&mut state.todos);
                state.input.clear();
            },
            TodoAction::TodoToggled {
                id,
                previous_key,
                key,
                done,
                toggled_at,
            } => {
                if key != previous_key && state.contains_key(key) {
                    tracing::warn!(%key, "Rejected TodoToggled reusing a render key");
                    return false;
                }
                let Some(position) = Self::position_of(state, id, previous_key) else {
                    return false;
                };
                let task = &mut state.todos[position];
                task.key = *key;
                task.done = *done;
                task.toggled_at = Some(*toggled_at);
                sort_todos(&mut state.todos);
            },
            TodoAction::TodoDeleted { id, key } => {
                let Some(position) = Self::position_of(state, id, key) else {
                    return false;
                };
                state.todos.remove(position);
            },
            TodoAction::FilterChanged { filter } => {
                state.filter = *filter;
            },
            TodoAction::InputChanged { text } => {
                state.input.clone_from(text);
            },
            // Commands are not applied to state
            TodoAction::AddTodo { .. }
            | TodoAction::SubmitInput
            | TodoAction::ToggleTodo { .. }
            | TodoAction::DeleteTodo { .. }
            | TodoAction::SetFilter { .. }
            | TodoAction::SetInput { .. } => return false,
        }

        tracing::trace!(?action, "Applied event");
        true
    }

    /// Index of the task rendered under `key`, provided it is task `id`
    fn position_of(state: &TodoState, id: &TaskId, key: &RenderKey) -> Option<usize> {
        let position = state.todos.iter().position(|t| &t.key == key)?;
        if &state.todos[position].id != id {
            tracing::warn!(%id, %key, "Rejected event naming another task's render key");
            return None;
        }
        Some(position)
    }

    /// Applies a freshly built event and broadcasts it
    fn commit(state: &mut TodoState, event: Option<TodoAction>) -> SmallVec<[Effect<TodoAction>; 4]> {
        match event {
            Some(event) if Self::apply_event(state, &event) => smallvec![Effect::Broadcast(event)],
            _ => SmallVec::new(),
        }
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TodoAction::AddTodo { label } => {
                let event = self.add_event(&label, env);
                Self::commit(state, event)
            },

            TodoAction::SubmitInput => {
                let event = self.add_event(&state.input, env);
                Self::commit(state, event)
            },

            TodoAction::ToggleTodo { key } => {
                let event = Self::toggle_event(state, key, env);
                Self::commit(state, event)
            },

            TodoAction::DeleteTodo { key } => {
                let event = Self::delete_event(state, key);
                Self::commit(state, event)
            },

            TodoAction::SetFilter { filter } => {
                Self::commit(state, Some(TodoAction::FilterChanged { filter }))
            },

            TodoAction::SetInput { text } => {
                Self::commit(state, Some(TodoAction::InputChanged { text }))
            },

            // ========== Events ==========
            TodoAction::TodoAdded { .. }
            | TodoAction::TodoToggled { .. }
            | TodoAction::TodoDeleted { .. }
            | TodoAction::FilterChanged { .. }
            | TodoAction::InputChanged { .. } => {
                // Replayed events are applied but not re-broadcast
                Self::apply_event(state, &action);
                SmallVec::new()
            },
        }
    }
}
