//! Wait conditions and timing defaults for step execution.
//!
//! Robustness in a replayed sequence comes from generous timeouts and the
//! uniform wait-for-visible gate before each interaction, not from retries.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout for the wait-for-visible gate (5 seconds)
pub const DEFAULT_VISIBLE_TIMEOUT_MS: u64 = 5_000;

/// Default settle pause after a successful interaction (500ms)
pub const DEFAULT_SETTLE_MS: u64 = 500;

/// Default timeout for page navigation (30 seconds)
pub const DEFAULT_NAV_TIMEOUT_MS: u64 = 30_000;

/// Settle pause after the initial page load (1 second)
pub const INITIAL_SETTLE_MS: u64 = 1_000;

/// Default duration for an explicit wait step (5 seconds)
pub const DEFAULT_WAIT_MS: u64 = 5_000;

/// Polling interval for the visibility wait (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Network idle threshold (500ms without requests)
pub const NETWORK_IDLE_THRESHOLD_MS: u64 = 500;

/// Page load states to wait for after navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    /// Wait for the `load` event to fire
    #[default]
    Load,
    /// Wait for `DOMContentLoaded`
    DomContentLoaded,
    /// Wait for the network to go idle
    NetworkIdle,
}

impl LoadState {
    /// The JavaScript event name for this load state
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::NetworkIdle => "networkidle",
        }
    }

    /// Default timeout for this load state
    #[must_use]
    pub const fn default_timeout_ms(&self) -> u64 {
        match self {
            Self::Load | Self::DomContentLoaded => DEFAULT_NAV_TIMEOUT_MS,
            // Network idle can take longer
            Self::NetworkIdle => 60_000,
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.event_name())
    }
}

/// Options for the visibility wait before an interaction
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_VISIBLE_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Timeout as a `Duration`
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Poll interval as a `Duration`
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
