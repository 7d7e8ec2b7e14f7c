//! Configuration for a todo store.
//!
//! Everything has a default: the two starter tasks, the exact label policy
//! and the runtime's default [`StoreConfig`]. `TodoConfig` can be built in
//! code, deserialized, or read from the environment by [`TodoConfig::from_env`].

use crate::error::TodoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use todo_engine_runtime::StoreConfig;

/// Environment variable selecting the [`LabelPolicy`]
pub const LABEL_POLICY_ENV: &str = "TODO_LABEL_POLICY";

/// Environment variable overriding [`StoreConfig::broadcast_capacity`]
pub const BROADCAST_CAPACITY_ENV: &str = "TODO_BROADCAST_CAPACITY";

/// How a submitted label is checked before a task is created
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPolicy {
    /// Only the empty string is rejected; labels are stored verbatim
    #[default]
    Exact,
    /// Surrounding whitespace is removed; blank labels are rejected
    Trim,
}

impl LabelPolicy {
    /// Returns the label to store, or `None` if it counts as empty
    #[must_use]
    pub fn normalize(self, label: &str) -> Option<String> {
        let label = match self {
            Self::Exact => label,
            Self::Trim => label.trim(),
        };
        (!label.is_empty()).then(|| label.to_string())
    }

    /// Lowercase name, as accepted by [`LabelPolicy::from_str`]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Trim => "trim",
        }
    }
}

impl fmt::Display for LabelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelPolicy {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Self::Exact),
            "trim" => Ok(Self::Trim),
            other => Err(TodoError::InvalidLabelPolicy(other.to_string())),
        }
    }
}

/// A task present when the store is created
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedTask {
    /// Label of the task
    pub label: String,
    /// Whether it starts out done
    #[serde(default)]
    pub done: bool,
}

impl SeedTask {
    /// Creates a seed task
    #[must_use]
    pub fn new(label: impl Into<String>, done: bool) -> Self {
        Self {
            label: label.into(),
            done,
        }
    }

    /// The starter tasks shown on first launch
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![Self::new("Add some todos", false), Self::new("I am done", true)]
    }
}

/// Configuration for [`crate::TodoStore`]
///
/// # Example
///
/// ```
/// use todo::{LabelPolicy, TodoConfig};
///
/// let config = TodoConfig::default()
///     .with_label_policy(LabelPolicy::Trim)
///     .without_seed();
/// assert!(config.seed.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoConfig {
    /// Label check applied to new tasks
    pub label_policy: LabelPolicy,
    /// Tasks created at startup, in order
    pub seed: Vec<SeedTask>,
    /// Runtime settings
    pub store: StoreConfig,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            label_policy: LabelPolicy::default(),
            seed: SeedTask::defaults(),
            store: StoreConfig::default(),
        }
    }
}

impl TodoConfig {
    /// Set the label policy
    #[must_use]
    pub const fn with_label_policy(mut self, policy: LabelPolicy) -> Self {
        self.label_policy = policy;
        self
    }

    /// Replace the seed tasks
    #[must_use]
    pub fn with_seed(mut self, seed: Vec<SeedTask>) -> Self {
        self.seed = seed;
        self
    }

    /// Start with an empty list
    #[must_use]
    pub fn without_seed(self) -> Self {
        self.with_seed(Vec::new())
    }

    /// Set the runtime settings
    #[must_use]
    pub const fn with_store_config(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Build the default configuration, overridden by environment variables
    ///
    /// Reads [`LABEL_POLICY_ENV`] and [`BROADCAST_CAPACITY_ENV`]; unset
    /// variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::InvalidLabelPolicy`] or [`TodoError::InvalidConfig`]
    /// if a variable is set to a value that does not parse.
    pub fn from_env() -> Result<Self, TodoError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`TodoConfig::from_env`], reading variables through `lookup`
    ///
    /// # Errors
    ///
    /// Same as [`TodoConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TodoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(policy) = lookup(LABEL_POLICY_ENV) {
            config.label_policy = policy.parse()?;
        }

        if let Some(capacity) = lookup(BROADCAST_CAPACITY_ENV) {
            config.store.broadcast_capacity =
                capacity.parse().map_err(|_| TodoError::InvalidConfig {
                    key: BROADCAST_CAPACITY_ENV,
                    value: capacity.clone(),
                })?;
        }

        tracing::debug!(
            label_policy = %config.label_policy,
            broadcast_capacity = config.store.broadcast_capacity,
            "Loaded todo configuration"
        );

        Ok(config)
    }
}
