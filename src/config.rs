//! Configuration for the history store
//!
//! Centralized configuration with sensible defaults. All knobs are consumed
//! at operation time; the host shell owns where their values come from, so
//! the types derive serde for loading from a settings file.

use serde::{Deserialize, Serialize};

/// Behavior knobs for a history store instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Bank Configuration
    // -------------------------------------------------------------------------
    /// Share history between sessions: write straight to the master bank
    /// and open no per-session bank
    pub shared: bool,

    // -------------------------------------------------------------------------
    // Add Policy
    // -------------------------------------------------------------------------
    /// Skip adding lines prefixed with a space or tab
    pub ignore_space: bool,

    /// How duplicate entries are handled on add
    pub dupe_mode: DupeMode,

    // -------------------------------------------------------------------------
    // Expansion
    // -------------------------------------------------------------------------
    /// How `!` history expansion is applied
    pub expand_mode: ExpandMode,
}

/// Duplicate handling for `add`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DupeMode {
    /// Always add the line
    Add,

    /// Report success without writing when the line already exists
    Ignore,

    /// Tombstone every prior copy before appending
    ErasePrev,
}

/// Whether a `!` at a given position introduces history expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpandMode {
    /// Never expand
    Off,

    /// Always expand
    On,

    /// Expand unless the `!` sits inside single quotes
    NotSquoted,

    /// Expand unless the `!` sits inside double quotes
    NotDquoted,

    /// Expand unless the `!` sits inside either kind of quote
    NotQuoted,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shared: false,
            ignore_space: true,
            dupe_mode: DupeMode::ErasePrev,
            expand_mode: ExpandMode::NotQuoted,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn shared(mut self, shared: bool) -> Self {
        self.config.shared = shared;
        self
    }

    pub fn ignore_space(mut self, ignore_space: bool) -> Self {
        self.config.ignore_space = ignore_space;
        self
    }

    pub fn dupe_mode(mut self, dupe_mode: DupeMode) -> Self {
        self.config.dupe_mode = dupe_mode;
        self
    }

    pub fn expand_mode(mut self, expand_mode: ExpandMode) -> Self {
        self.config.expand_mode = expand_mode;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
