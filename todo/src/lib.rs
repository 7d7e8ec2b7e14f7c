//! Todo list state engine.
//!
//! Users enter short text items, mark them done or undone, delete them and
//! filter the visible set by status. This crate owns those rules:
//!
//! - Tasks are kept in a stable partition, open tasks before done ones
//! - Every task has a stable [`TaskId`] and a [`RenderKey`] that is replaced
//!   on each toggle, so a keyed list re-plays its enter transition
//! - Empty labels and unknown keys are ignored, unknown filter names are
//!   rejected with [`TodoError::InvalidFilter`]
//! - Visible tasks are a pure projection of state and the current [`Filter`]
//!
//! # Quick Start
//!
//! ```
//! use todo::{Filter, TodoStore};
//!
//! let mut store = TodoStore::new();
//!
//! store.add_todo("Buy milk");
//! let milk = store.todos().into_iter().find(|t| t.label == "Buy milk");
//! if let Some(milk) = milk {
//!     store.toggle_todo(milk.key);
//! }
//!
//! store.set_filter(Filter::Done);
//! assert_eq!(store.visible_todos().len(), 2);
//! assert!(store.set_filter_str("bogus").is_err());
//! ```

pub mod config;
pub mod error;
pub mod reducer;
pub mod store;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::{LabelPolicy, SeedTask, TodoConfig};
pub use error::TodoError;
pub use reducer::{TodoEnvironment, TodoReducer};
pub use store::TodoStore;
pub use types::{Filter, RenderKey, Task, TaskId, TodoAction, TodoState, sort_todos};
pub use view::{EMPTY_NOTICE, FilterTab, TodoView, visible_todos};
