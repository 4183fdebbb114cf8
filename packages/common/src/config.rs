use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the editor engine and its coordinators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum number of undo levels kept
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Distance (px) under which alignment guides are proposed
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f64,

    /// Vertical distance (px) under which editable fields share a row
    #[serde(default = "default_row_tolerance")]
    pub row_tolerance: f64,

    /// Quiet window before an inline edit is sent by the editing surface
    #[serde(default = "default_inline_edit_debounce_ms")]
    pub inline_edit_debounce_ms: u64,

    /// Secondary quiet window applied by the receiving surface
    #[serde(default = "default_relay_debounce_ms")]
    pub relay_debounce_ms: u64,

    #[serde(default)]
    pub autosave: AutosaveConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutosaveConfig {
    #[serde(default = "default_autosave_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay; attempt `n` waits `retry_delay_ms * 2^(n-1)`
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_history_limit() -> usize {
    50
}

fn default_snap_threshold() -> f64 {
    8.0
}

fn default_row_tolerance() -> f64 {
    10.0
}

fn default_inline_edit_debounce_ms() -> u64 {
    300
}

fn default_relay_debounce_ms() -> u64 {
    50
}

fn default_autosave_debounce_ms() -> u64 {
    3000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl EditorConfig {
    pub fn inline_edit_debounce(&self) -> Duration {
        Duration::from_millis(self.inline_edit_debounce_ms)
    }

    pub fn relay_debounce(&self) -> Duration {
        Duration::from_millis(self.relay_debounce_ms)
    }
}

impl AutosaveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Backoff before retry number `attempt` (1-based)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.retry_delay_ms.saturating_mul(factor))
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            snap_threshold: default_snap_threshold(),
            row_tolerance: default_row_tolerance(),
            inline_edit_debounce_ms: default_inline_edit_debounce_ms(),
            relay_debounce_ms: default_relay_debounce_ms(),
            autosave: AutosaveConfig::default(),
        }
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_autosave_debounce_ms(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}
