//! Table configuration models.

use serde::{Deserialize, Serialize};

use crate::game::HouseRules;

/// Table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Rules enforced by the turn sequencer
    pub rules: HouseRules,

    /// Capacity of the actor's message inbox
    pub inbox_capacity: usize,

    /// Per-subscriber event buffer; a full buffer drops events for that subscriber
    pub subscriber_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            rules: HouseRules::default(),
            inbox_capacity: 100,
            subscriber_capacity: 32,
        }
    }
}

impl TableConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.rules.validate()?;

        if self.inbox_capacity == 0 {
            return Err("Inbox capacity must be greater than 0".to_string());
        }

        if self.subscriber_capacity == 0 {
            return Err("Subscriber capacity must be greater than 0".to_string());
        }

        Ok(())
    }
}
