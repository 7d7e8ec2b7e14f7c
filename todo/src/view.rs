//! Projection of todo state into what the presentation layer renders.
//!
//! Everything here is a pure function of [`TodoState`]: calling it twice on
//! the same state yields equal results.

use crate::types::{Filter, Task, TodoState};
use serde::Serialize;

/// Notice shown in place of an empty list
pub const EMPTY_NOTICE: &str = "Nothing to show here. Try adding some todos.";

/// Tasks of `todos` passing `filter`, in collection order
#[must_use]
pub fn visible_todos(todos: &[Task], filter: Filter) -> Vec<&Task> {
    todos.iter().filter(|task| filter.matches(task)).collect()
}

/// One filter control
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FilterTab {
    /// Filter selected by this control
    pub filter: Filter,
    /// Whether it is the current selection
    pub selected: bool,
}

/// Render-ready snapshot of the todo list
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TodoView {
    /// Filter applied to `items`
    pub filter: Filter,
    /// Visible tasks, in display order
    pub items: Vec<Task>,
    /// Staged input text
    pub input: String,
    /// Open tasks in the whole list
    pub active_count: usize,
    /// Finished tasks in the whole list
    pub done_count: usize,
}

impl TodoView {
    /// Project `state` through its current filter
    #[must_use]
    pub fn project(state: &TodoState) -> Self {
        Self {
            filter: state.filter,
            items: visible_todos(&state.todos, state.filter)
                .into_iter()
                .cloned()
                .collect(),
            input: state.input.clone(),
            active_count: state.active_count(),
            done_count: state.done_count(),
        }
    }

    /// Returns true if no task is visible
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Filter controls in display order, with the current one marked
    #[must_use]
    pub fn tabs(&self) -> [FilterTab; 3] {
        Filter::ALL_FILTERS.map(|filter| FilterTab {
            filter,
            selected: filter == self.filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RenderKey, TaskId};
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn task(n: u128, done: bool) -> Task {
        let mut task = Task::new(
            TaskId::from_uuid(Uuid::from_u128(n)),
            RenderKey::from_uuid(Uuid::from_u128(n)),
            format!("task {n}"),
            DateTime::<Utc>::default(),
        );
        task.done = done;
        task
    }

    fn state() -> TodoState {
        TodoState {
            todos: vec![task(1, false), task(2, false), task(3, true), task(4, true)],
            ..TodoState::empty()
        }
    }

    fn numbers(tasks: &[&Task]) -> Vec<u128> {
        tasks.iter().map(|t| t.id.as_uuid().as_u128()).collect()
    }

    #[test]
    fn all_returns_everything_in_order() {
        let state = state();
        assert_eq!(numbers(&visible_todos(&state.todos, Filter::All)), [1, 2, 3, 4]);
    }

    #[test]
    fn active_and_done_split_the_list() {
        let state = state();
        assert_eq!(numbers(&visible_todos(&state.todos, Filter::Active)), [1, 2]);
        assert_eq!(numbers(&visible_todos(&state.todos, Filter::Done)), [3, 4]);
    }

    #[test]
    fn empty_list_projects_empty() {
        assert!(visible_todos(&[], Filter::All).is_empty());
        assert!(TodoView::project(&TodoState::empty()).is_empty());
    }

    #[test]
    fn view_counts_whole_list_regardless_of_filter() {
        let mut state = state();
        state.filter = Filter::Done;
        state.input = "draft".into();

        let view = TodoView::project(&state);

        assert_eq!(view.items.len(), 2);
        assert_eq!(view.active_count, 2);
        assert_eq!(view.done_count, 2);
        assert_eq!(view.input, "draft");
    }

    #[test]
    fn projection_is_idempotent() {
        let state = state();
        assert_eq!(TodoView::project(&state), TodoView::project(&state));
    }

    #[test]
    fn tabs_mark_current_filter() {
        let mut state = state();
        state.filter = Filter::Active;

        let tabs = TodoView::project(&state).tabs();

        assert_eq!(
            tabs.map(|tab| (tab.filter.as_str(), tab.selected)),
            [("all", false), ("active", true), ("done", false)]
        );
    }
}
