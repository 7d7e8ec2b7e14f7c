//! Property tests: random command sequences never break the list invariants.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use todo::{
    Filter, RenderKey, TodoEnvironment, TodoState, TodoStore, TodoView, sort_todos, visible_todos,
};
use todo_engine_testing::{SequentialIdGenerator, test_clock};

#[derive(Clone, Debug)]
enum Op {
    Add(String),
    Toggle(usize),
    Delete(usize),
    ToggleStale(usize),
    SetFilter(Filter),
}

fn filter_strategy() -> impl Strategy<Value = Filter> {
    prop_oneof![Just(Filter::All), Just(Filter::Active), Just(Filter::Done)]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => "[a-z ]{0,8}".prop_map(Op::Add),
        3 => any::<usize>().prop_map(Op::Toggle),
        1 => any::<usize>().prop_map(Op::Delete),
        1 => any::<usize>().prop_map(Op::ToggleStale),
        1 => filter_strategy().prop_map(Op::SetFilter),
    ]
}

fn test_store() -> TodoStore {
    TodoStore::with_environment(TodoEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(SequentialIdGenerator::new()),
    ))
}

fn pick(state: &TodoState, index: usize) -> Option<RenderKey> {
    if state.todos.is_empty() {
        None
    } else {
        Some(state.todos[index % state.todos.len()].key)
    }
}

/// Applies `op`, checking the per-operation guarantees as it goes
fn apply(store: &mut TodoStore, retired: &mut Vec<RenderKey>, op: &Op) -> Result<(), TestCaseError> {
    let before = store.state(Clone::clone);

    match op {
        Op::Add(label) => {
            store.add_todo(label.clone());
            let after = store.state(Clone::clone);
            if label.is_empty() {
                prop_assert_eq!(&after, &before);
            } else {
                prop_assert_eq!(after.count(), before.count() + 1);
                prop_assert_eq!(after.active_count(), before.active_count() + 1);
            }
        },
        Op::Toggle(index) => {
            if let Some(key) = pick(&before, *index) {
                let task = before.get(&key).cloned();
                store.toggle_todo(key);
                let after = store.state(Clone::clone);
                if let Some(task) = task {
                    let toggled = after.find(&task.id);
                    prop_assert!(toggled.is_some());
                    if let Some(toggled) = toggled {
                        prop_assert_eq!(toggled.done, !task.done);
                        prop_assert_ne!(toggled.key, key);
                        prop_assert_eq!(&toggled.label, &task.label);
                    }
                    prop_assert!(!after.contains_key(&key));
                    prop_assert_eq!(after.count(), before.count());

                    // Same as flipping the task where it stands, then re-partitioning
                    if let Some(toggled) = after.find(&task.id) {
                        let mut expected = before.todos.clone();
                        if let Some(slot) = expected.iter_mut().find(|t| t.key == key) {
                            *slot = toggled.clone();
                        }
                        sort_todos(&mut expected);
                        prop_assert_eq!(&after.todos, &expected);
                    }
                    retired.push(key);
                }
            }
        },
        Op::Delete(index) => {
            if let Some(key) = pick(&before, *index) {
                store.delete_todo(key);
                let after = store.state(Clone::clone);
                prop_assert_eq!(after.count(), before.count() - 1);
                prop_assert!(!after.contains_key(&key));
                retired.push(key);
            }
        },
        Op::ToggleStale(index) => {
            if !retired.is_empty() {
                let key = retired[index % retired.len()];
                store.toggle_todo(key);
                prop_assert_eq!(&store.state(Clone::clone), &before);
            }
        },
        Op::SetFilter(filter) => {
            store.set_filter(*filter);
            let after = store.state(Clone::clone);
            prop_assert_eq!(after.filter, *filter);
            prop_assert_eq!(&after.todos, &before.todos);
        },
    }

    Ok(())
}

fn check_invariants(state: &TodoState) -> Result<(), TestCaseError> {
    prop_assert!(state.is_partitioned(), "open tasks must precede done tasks");

    let ids: HashSet<_> = state.todos.iter().map(|t| t.id).collect();
    let keys: HashSet<_> = state.todos.iter().map(|t| t.key).collect();
    prop_assert_eq!(ids.len(), state.count());
    prop_assert_eq!(keys.len(), state.count());
    prop_assert!(state.todos.iter().all(|t| !t.label.is_empty()));

    for filter in Filter::ALL_FILTERS {
        let visible = visible_todos(&state.todos, filter);
        prop_assert!(visible.iter().all(|t| filter.matches(t)));

        // Visible tasks keep their relative collection order
        let positions: Vec<_> = visible
            .iter()
            .filter_map(|v| state.todos.iter().position(|t| t.id == v.id))
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    prop_assert_eq!(
        visible_todos(&state.todos, Filter::Active).len() + visible_todos(&state.todos, Filter::Done).len(),
        state.count()
    );

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn random_sessions_keep_list_invariants(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut store = test_store();
        let mut retired = Vec::new();

        for op in &ops {
            apply(&mut store, &mut retired, op)?;
            store.state(check_invariants)?;
        }
    }

    #[test]
    fn projection_is_pure(ops in prop::collection::vec(op_strategy(), 0..20)) {
        let mut store = test_store();
        let mut retired = Vec::new();

        for op in &ops {
            apply(&mut store, &mut retired, op)?;
        }

        let first = store.view();
        let second = store.state(TodoView::project);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.active_count + first.done_count, store.todos().len());
    }

    #[test]
    fn new_tasks_keep_insertion_order(labels in prop::collection::vec("[a-z]{1,6}", 1..10)) {
        let mut store = test_store();
        store.send(todo::TodoAction::SetFilter { filter: Filter::Active });
        let seeded = store.visible_todos().len();

        for label in &labels {
            store.add_todo(label.clone());
        }

        let added: Vec<_> = store
            .visible_todos()
            .into_iter()
            .skip(seeded)
            .map(|t| t.label)
            .collect();
        prop_assert_eq!(added, labels);
    }
}
