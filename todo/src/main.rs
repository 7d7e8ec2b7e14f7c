//! CLI walkthrough of the todo engine.
//!
//! Drives a store through a typical session and prints what a presentation
//! layer would render after each step, along with the events it would use
//! to trigger transitions.

use tokio::sync::broadcast;
use todo::{EMPTY_NOTICE, TodoAction, TodoConfig, TodoEnvironment, TodoStore, TodoView};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo=debug,todo_engine_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Todo Example ===\n");

    let config = TodoConfig::from_env()?;
    let mut store = TodoStore::with_config(&config, TodoEnvironment::production());
    let mut events = store.subscribe();

    render("Initial state", &store.view());

    println!("\n>>> Typing 'Buy milk' and submitting");
    store.set_input("Buy milk");
    store.submit_input();
    drain(&mut events);
    render("After add", &store.view());

    println!("\n>>> Submitting an empty input");
    store.submit_input();
    drain(&mut events);

    if let Some(first) = store.todos().into_iter().next() {
        println!("\n>>> Toggling '{}'", first.label);
        store.toggle_todo(first.key);
        drain(&mut events);
        render("After toggle", &store.view());

        println!("\n>>> Toggling '{}' again with its old key", first.label);
        store.toggle_todo(first.key);
        drain(&mut events);
    }

    let finished: Vec<_> = store.todos().into_iter().filter(|t| t.done).collect();
    for task in finished {
        println!("\n>>> Deleting '{}'", task.label);
        store.delete_todo(task.key);
        drain(&mut events);
    }

    println!("\n>>> Selecting filter 'done'");
    store.set_filter_str("done")?;
    drain(&mut events);
    render("Done tasks", &store.view());

    println!("\n>>> Selecting filter 'bogus'");
    if let Err(error) = store.set_filter_str("bogus") {
        println!("    rejected: {error}");
    }

    println!("\nFinal view:");
    println!("{}", serde_json::to_string_pretty(&store.view())?);

    println!("\n=== Demo Complete ===");
    Ok(())
}

fn render(title: &str, view: &TodoView) {
    let tabs: Vec<String> = view
        .tabs()
        .iter()
        .map(|tab| {
            if tab.selected {
                format!("[{}]", tab.filter)
            } else {
                tab.filter.to_string()
            }
        })
        .collect();

    println!("{title}: {}", tabs.join(" "));
    if view.is_empty() {
        println!("    {EMPTY_NOTICE}");
    }
    for task in &view.items {
        let status = if task.done { "✓" } else { " " };
        println!("    [{status}] {}", task.label);
    }
    println!("    {} open, {} done", view.active_count, view.done_count);
}

fn drain(events: &mut broadcast::Receiver<TodoAction>) {
    let mut seen = 0;
    while let Ok(event) = events.try_recv() {
        seen += 1;
        match event {
            TodoAction::TodoToggled {
                previous_key, key, ..
            } => println!("    event: toggled, exit {previous_key} / enter {key}"),
            other => println!("    event: {other:?}"),
        }
    }
    if seen == 0 {
        println!("    (no change)");
    }
}
