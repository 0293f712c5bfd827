//! Book and replay configuration.
//!
//! Both configs deserialize from JSON with every field optional:
//!
//! ```
//! use replay_book::config::{BookConfig, ModifyPriorityPolicy};
//!
//! let config = BookConfig::from_json_str(r#"{ "modify_priority": "retain_always" }"#).unwrap();
//! assert_eq!(config.modify_priority, ModifyPriorityPolicy::RetainAlways);
//! assert_eq!(config.order_capacity, BookConfig::default().order_capacity);
//! ```

use serde::{Deserialize, Serialize};

/// What a same-price size change does to queue position.
///
/// A price change always loses priority regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifyPriorityPolicy {
    /// Decreases keep position, increases go to the back of the level
    #[default]
    LoseOnIncrease,

    /// Same-price modifies never move the order
    RetainAlways,

    /// Any size change goes to the back of the level
    LoseAlways,
}

impl ModifyPriorityPolicy {
    /// Whether a same-price change from `old_size` to `new_size` re-queues.
    #[inline]
    pub fn requeues(self, old_size: u64, new_size: u64) -> bool {
        match self {
            ModifyPriorityPolicy::LoseOnIncrease => new_size > old_size,
            ModifyPriorityPolicy::RetainAlways => false,
            ModifyPriorityPolicy::LoseAlways => new_size != old_size,
        }
    }
}

/// Configuration for [`crate::OrderBook`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Order slots to pre-allocate
    pub order_capacity: usize,

    /// Price level slots to pre-allocate
    pub level_capacity: usize,

    /// Queue-position policy for same-price modifies
    pub modify_priority: ModifyPriorityPolicy,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            order_capacity: 1 << 16,
            level_capacity: 1 << 12,
            modify_priority: ModifyPriorityPolicy::default(),
        }
    }
}

impl BookConfig {
    /// Create a config with the given order capacity.
    pub fn new(order_capacity: usize) -> Self {
        Self {
            order_capacity,
            ..Default::default()
        }
    }

    /// Set the price level capacity.
    pub fn with_level_capacity(mut self, level_capacity: usize) -> Self {
        self.level_capacity = level_capacity;
        self
    }

    /// Set the modify priority policy.
    pub fn with_modify_priority(mut self, policy: ModifyPriorityPolicy) -> Self {
        self.modify_priority = policy;
        self
    }

    /// Parse from a JSON document; missing fields take defaults.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

/// What the driver does when the book rejects an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Stop the replay and return the error
    Abort,

    /// Report the error and continue with the next event
    #[default]
    SkipAndContinue,
}

/// Configuration for [`crate::replay::ReplayDriver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Rejected-event handling
    pub error_policy: ErrorPolicy,

    /// Publish a snapshot every N accepted events (0 disables periodic publication)
    pub snapshot_interval: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::default(),
            snapshot_interval: 1_000,
        }
    }
}

impl ReplayConfig {
    /// Set the error policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Set the snapshot interval.
    pub fn with_snapshot_interval(mut self, interval: u64) -> Self {
        self.snapshot_interval = interval;
        self
    }

    /// Parse from a JSON document; missing fields take defaults.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
