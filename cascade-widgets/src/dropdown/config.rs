// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Dropdown Configuration
//!
//! Timings, pool sizes and blocking layer behavior of a [Dropdown](super::Dropdown).
//! Every field has a default, so a configuration file only needs the values it changes:
//!
//! ```toml
//! sub_menu_open_delay_ms = 150
//!
//! [blocking]
//! pick_through = true
//!
//! [pools]
//! action_items = 64
//! ```

use crate::blocking_layer::BlockingBehavior;
use crate::dropdown::error::DropdownError;
use serde::{Deserialize, Serialize};

/// Configuration of a [Dropdown](super::Dropdown).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropdownConfig {
    /// Delay in milliseconds before a hovered row activates.
    pub sub_menu_open_delay_ms: u64,
    /// Delay in milliseconds before a freshly attached panel gets the open class.
    pub open_transition_delay_ms: u64,
    /// Row lists of a returned panel are shrunk to this capacity.
    pub retained_capacity: usize,
    /// How the blocking layer reacts to outside interaction.
    pub blocking: BlockingConfig,
    /// Initial pool sizes.
    pub pools: PoolConfig,
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            sub_menu_open_delay_ms: 200,
            open_transition_delay_ms: 10,
            retained_capacity: 32,
            blocking: BlockingConfig::default(),
            pools: PoolConfig::default(),
        }
    }
}

impl DropdownConfig {
    /// Parse a configuration from TOML. Missing fields keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, DropdownError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the sub-menu open delay.
    pub fn with_sub_menu_open_delay(mut self, delay_ms: u64) -> Self {
        self.sub_menu_open_delay_ms = delay_ms;
        self
    }

    /// Set the blocking layer configuration.
    pub fn with_blocking(mut self, blocking: BlockingConfig) -> Self {
        self.blocking = blocking;
        self
    }

    /// Set the pool configuration.
    pub fn with_pools(mut self, pools: PoolConfig) -> Self {
        self.pools = pools;
        self
    }
}

/// Blocking layer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockingConfig {
    /// Close when the layer itself is clicked.
    pub close_on_click: bool,
    /// Close on a navigation cancel.
    pub close_on_cancel: bool,
    /// Let pointer events reach the elements under the layer.
    pub pick_through: bool,
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            close_on_click: true,
            close_on_cancel: true,
            pick_through: false,
        }
    }
}

impl BlockingConfig {
    /// Convert into layer behavior flags.
    pub fn behavior(&self) -> BlockingBehavior {
        let mut behavior = BlockingBehavior::empty();
        behavior.set(BlockingBehavior::CLOSE_ON_CLICK, self.close_on_click);
        behavior.set(BlockingBehavior::CLOSE_ON_CANCEL, self.close_on_cancel);
        behavior.set(BlockingBehavior::PICK_THROUGH, self.pick_through);
        behavior
    }
}

/// Initial pool sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Action rows.
    pub action_items: usize,
    /// Sub-menu rows.
    pub sub_items: usize,
    /// Separator rows.
    pub separators: usize,
    /// Menu panels.
    pub menus: usize,
    /// Grow a pool by one instead of failing when it runs out.
    pub auto_expand: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            action_items: 32,
            sub_items: 32,
            separators: 32,
            menus: 16,
            auto_expand: true,
        }
    }
}
