//! # Todo Engine Runtime
//!
//! Runtime implementation for the todo engine.
//!
//! This crate provides the Store runtime that owns domain state, runs the
//! reducer for every action and executes the effects it returns.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Observers**: Broadcast receivers notified of every `Effect::Broadcast`
//!
//! ## Execution Model
//!
//! The store is single-threaded and synchronous. [`Store::send`] takes
//! `&mut self`, so the reducer and its effects run to completion before
//! anyone can read the state again. Observers never see a partially applied
//! action.
//!
//! ## Example
//!
//! ```ignore
//! use todo_engine_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething);
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use serde::{Deserialize, Serialize};
use todo_engine_core::{effect::Effect, reducer::Reducer};

/// Default number of actions buffered per observer before it lags
pub const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use todo_engine_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_broadcast_capacity(256);
/// assert_eq!(config.broadcast_capacity, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of actions buffered per observer
    ///
    /// A slow observer that falls further behind skips the oldest actions.
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize) -> Self {
        Self { broadcast_capacity }
    }

    /// Set the observer broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{Effect, Reducer, StoreConfig};
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (owned, mutated only by the reducer)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (broadcast to observers)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: S,
        reducer: R,
        environment: E,
        /// Action broadcast channel for observing actions produced by effects.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        A: Clone,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses the default [`StoreConfig`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, &StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        ///
        /// A broadcast capacity of zero is raised to one.
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: &StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: initial_state,
                reducer,
                environment,
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Calls reducer with (state, action, environment)
        /// 2. Executes returned effects in order
        ///
        /// Both steps complete before this method returns.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic propagates.
        /// Reducers should be pure functions that do not panic.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&mut self, action: A) {
            tracing::debug!("Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut self.state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect(effect);
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let open = store.state(|s| s.todos.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Subscribe to all actions broadcast by effects
        ///
        /// Only actions carried by [`Effect::Broadcast`] are delivered, never
        /// the action passed to [`Store::send`]. Receivers created after an
        /// action was broadcast do not see it.
        ///
        /// Use `try_recv` to drain the receiver; a receiver that falls more
        /// than the configured capacity behind gets `TryRecvError::Lagged`.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Number of live observers
        #[must_use]
        pub fn observer_count(&self) -> usize {
            self.action_broadcast.receiver_count()
        }

        fn execute_effect(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Broadcast(action) => {
                    metrics::counter!("store.effects.executed", "type" => "broadcast")
                        .increment(1);
                    match self.action_broadcast.send(action) {
                        Ok(observers) => {
                            tracing::trace!(observers, "Broadcast action to observers");
                        },
                        Err(_) => {
                            tracing::trace!("No observers subscribed, broadcast dropped");
                        },
                    }
                },
            }
        }
    }

    impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("state", &self.state)
                .field("observers", &self.action_broadcast.receiver_count())
                .finish_non_exhaustive()
        }
    }
}

pub use store::Store;
