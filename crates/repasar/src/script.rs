//! Script schema: the declarative step list a run replays.
//!
//! A script is the output of an upstream session recorder, parsed from YAML
//! or JSON and validated before any browser is launched. Steps are immutable
//! once constructed; the runner only ever reads them, in order.

use crate::locator::{is_well_formed, Locator};
use crate::wait::LoadState;
use serde::{Deserialize, Serialize};

/// Supported schema version.
pub const SCRIPT_VERSION: &str = "1.0";

fn default_press_key() -> String {
    "Enter".to_string()
}

/// Root script configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    /// Schema version (must be "1.0")
    pub version: String,
    /// Script name
    #[serde(default)]
    pub name: String,
    /// Script description
    #[serde(default)]
    pub description: String,
    /// Base page to load before the first step. The load is best-effort:
    /// a failure here is logged and the run continues, because later steps
    /// re-verify element presence independently.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Timing defaults applied to steps that do not override them
    #[serde(default)]
    pub defaults: RunDefaults,
    /// Ordered execution steps
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Timing defaults for a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunDefaults {
    /// Timeout for the wait-for-visible gate before each interaction (ms)
    #[serde(default = "RunDefaults::default_visible_timeout_ms")]
    pub visible_timeout_ms: u64,
    /// Pause after each successful interaction (ms)
    #[serde(default = "RunDefaults::default_settle_ms")]
    pub settle_ms: u64,
    /// Timeout for page navigation (ms)
    #[serde(default = "RunDefaults::default_nav_timeout_ms")]
    pub nav_timeout_ms: u64,
}

impl RunDefaults {
    const fn default_visible_timeout_ms() -> u64 {
        crate::wait::DEFAULT_VISIBLE_TIMEOUT_MS
    }

    const fn default_settle_ms() -> u64 {
        crate::wait::DEFAULT_SETTLE_MS
    }

    const fn default_nav_timeout_ms() -> u64 {
        crate::wait::DEFAULT_NAV_TIMEOUT_MS
    }
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self {
            visible_timeout_ms: Self::default_visible_timeout_ms(),
            settle_ms: Self::default_settle_ms(),
            nav_timeout_ms: Self::default_nav_timeout_ms(),
        }
    }
}

/// One planned browser action.
///
/// Durations are unsigned; a negative duration is unrepresentable and is
/// rejected at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Step {
    /// Load a page. Failures are recovered: logged, never fatal.
    Navigate {
        /// Target address
        url: String,
        /// Load state to wait for
        #[serde(default)]
        wait_until: LoadState,
        /// Navigation timeout override (ms)
        #[serde(default)]
        timeout_ms: Option<u64>,
        /// Settle pause override (ms)
        #[serde(default)]
        settle_ms: Option<u64>,
    },
    /// Pause unconditionally for a fixed duration.
    Wait {
        /// Pause duration (ms)
        #[serde(default = "Step::default_wait_ms")]
        duration_ms: u64,
    },
    /// Click the i-th element matching a selector.
    Click {
        /// Target selector
        selector: String,
        /// Zero-based occurrence index (first match when absent)
        #[serde(default)]
        index: Option<usize>,
        /// Visibility timeout override (ms)
        #[serde(default)]
        timeout_ms: Option<u64>,
        /// Settle pause override (ms)
        #[serde(default)]
        settle_ms: Option<u64>,
    },
    /// Replace the content of an input field. An empty value clears the
    /// field; an absent value is a construction error.
    Fill {
        /// Target selector
        selector: String,
        /// Zero-based occurrence index (first match when absent)
        #[serde(default)]
        index: Option<usize>,
        /// Text to enter ("" clears the field)
        #[serde(default)]
        value: Option<String>,
        /// Visibility timeout override (ms)
        #[serde(default)]
        timeout_ms: Option<u64>,
        /// Settle pause override (ms)
        #[serde(default)]
        settle_ms: Option<u64>,
    },
    /// Choose an option in a `<select>` element by value.
    Select {
        /// Target selector
        selector: String,
        /// Zero-based occurrence index (first match when absent)
        #[serde(default)]
        index: Option<usize>,
        /// Option value to select
        #[serde(default)]
        value: Option<String>,
        /// Visibility timeout override (ms)
        #[serde(default)]
        timeout_ms: Option<u64>,
        /// Settle pause override (ms)
        #[serde(default)]
        settle_ms: Option<u64>,
    },
    /// Move the pointer over an element.
    Hover {
        /// Target selector
        selector: String,
        /// Zero-based occurrence index (first match when absent)
        #[serde(default)]
        index: Option<usize>,
        /// Visibility timeout override (ms)
        #[serde(default)]
        timeout_ms: Option<u64>,
        /// Settle pause override (ms)
        #[serde(default)]
        settle_ms: Option<u64>,
    },
    /// Press a key, dispatched to the document body.
    Press {
        /// Key to press
        #[serde(default = "default_press_key")]
        key: String,
        /// Settle pause override (ms)
        #[serde(default)]
        settle_ms: Option<u64>,
    },
    /// Scroll down one viewport height.
    Scroll {
        /// Settle pause override (ms)
        #[serde(default)]
        settle_ms: Option<u64>,
    },
    /// Capture the page as a PNG file.
    Screenshot {
        /// Output path
        path: String,
    },
}

impl Step {
    const fn default_wait_ms() -> u64 {
        crate::wait::DEFAULT_WAIT_MS
    }

    /// Short action name, used in log lines and error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Navigate { .. } => "navigate",
            Self::Wait { .. } => "wait",
            Self::Click { .. } => "click",
            Self::Fill { .. } => "fill",
            Self::Select { .. } => "select",
            Self::Hover { .. } => "hover",
            Self::Press { .. } => "press",
            Self::Scroll { .. } => "scroll",
            Self::Screenshot { .. } => "screenshot",
        }
    }

    /// Target selector, for the kinds that have one.
    #[must_use]
    pub fn selector(&self) -> Option<&str> {
        match self {
            Self::Click { selector, .. }
            | Self::Fill { selector, .. }
            | Self::Select { selector, .. }
            | Self::Hover { selector, .. } => Some(selector),
            _ => None,
        }
    }

    /// Locator for the target element, for the kinds that have one.
    #[must_use]
    pub fn locator(&self) -> Option<Locator> {
        match self {
            Self::Click {
                selector, index, ..
            }
            | Self::Fill {
                selector, index, ..
            }
            | Self::Select {
                selector, index, ..
            }
            | Self::Hover {
                selector, index, ..
            } => {
                let loc = Locator::new(selector.clone());
                Some(match index {
                    Some(i) => loc.nth(*i),
                    None => loc,
                })
            }
            _ => None,
        }
    }

    /// Whether a failure in this step aborts the remaining sequence.
    /// Navigation is the single exception: a partial or slow page load is
    /// tolerated because later steps re-verify element presence themselves.
    #[must_use]
    pub const fn is_fatal_on_error(&self) -> bool {
        !matches!(self, Self::Navigate { .. })
    }

    /// Progress phrase for the step start line.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Navigate { url, .. } => format!("Navigating to {url}"),
            Self::Wait { duration_ms } => format!("Waiting {duration_ms}ms"),
            Self::Click { .. } => "Clicking on element".to_string(),
            Self::Fill { .. } => "Filling input field".to_string(),
            Self::Select { .. } => "Selecting option".to_string(),
            Self::Hover { .. } => "Hovering on element".to_string(),
            Self::Press { key, .. } => format!("Pressing {key}"),
            Self::Scroll { .. } => "Scrolling down".to_string(),
            Self::Screenshot { path } => format!("Taking screenshot to {path}"),
        }
    }

    /// Outcome phrase for the step success line.
    #[must_use]
    pub fn complete_message(&self) -> String {
        match self {
            Self::Navigate { .. } => "Navigation complete".to_string(),
            Self::Wait { .. } => "Wait complete".to_string(),
            Self::Click { .. } => "Click action complete".to_string(),
            Self::Fill { .. } => "Fill action complete".to_string(),
            Self::Select { .. } => "Select action complete".to_string(),
            Self::Hover { .. } => "Hover complete".to_string(),
            Self::Press { .. } => "Key press complete".to_string(),
            Self::Scroll { .. } => "Scroll complete".to_string(),
            Self::Screenshot { path } => format!("Screenshot saved to {path}"),
        }
    }

    /// Construction-time checks for a single step.
    fn validate(&self, index: usize) -> Result<(), ScriptError> {
        if let Some(selector) = self.selector() {
            if selector.trim().is_empty() {
                return Err(ScriptError::MissingSelector {
                    index,
                    kind: self.kind(),
                });
            }
            if !is_well_formed(selector) {
                return Err(ScriptError::MalformedSelector {
                    index,
                    selector: selector.to_string(),
                });
            }
        }

        match self {
            Self::Navigate { url, .. } => {
                if url.trim().is_empty() {
                    return Err(ScriptError::EmptyUrl { index });
                }
            }
            Self::Fill { value, .. } => {
                if value.is_none() {
                    return Err(ScriptError::MissingValue { index });
                }
            }
            Self::Select { value, .. } => {
                if value.is_none() {
                    return Err(ScriptError::MissingValue { index });
                }
            }
            Self::Screenshot { path } => {
                if path.trim().is_empty() {
                    return Err(ScriptError::EmptyPath { index });
                }
            }
            _ => {}
        }

        Ok(())
    }
}

impl Script {
    /// Parse a script from a YAML string and validate it.
    ///
    /// # Errors
    /// Returns an error if the YAML is invalid or validation fails.
    pub fn from_yaml(yaml: &str) -> Result<Self, ScriptError> {
        let script: Script =
            serde_yaml_ng::from_str(yaml).map_err(|e| ScriptError::ParseError(e.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    /// Parse a script from a JSON string and validate it.
    ///
    /// # Errors
    /// Returns an error if the JSON is invalid or validation fails.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let script: Script =
            serde_json::from_str(json).map_err(|e| ScriptError::ParseError(e.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    /// Validate the script structure.
    ///
    /// An empty step list is valid: replaying it is a vacuous success.
    fn validate(&self) -> Result<(), ScriptError> {
        if self.version != SCRIPT_VERSION {
            return Err(ScriptError::InvalidVersion(self.version.clone()));
        }

        if let Some(ref url) = self.base_url {
            if url.trim().is_empty() {
                return Err(ScriptError::EmptyBaseUrl);
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            step.validate(index)?;
        }

        Ok(())
    }
}

/// Errors detected while parsing and validating a script, before any run
/// starts. A script that fails here never reaches the browser.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScriptError {
    /// Parse failure
    #[error("Failed to parse script: {0}")]
    ParseError(String),

    /// Unsupported schema version
    #[error("Invalid version '{0}', expected '1.0'")]
    InvalidVersion(String),

    /// Selector-bearing step with an empty selector
    #[error("Step {index}: missing selector for {kind} action")]
    MissingSelector {
        /// Step index
        index: usize,
        /// Action name
        kind: &'static str,
    },

    /// Selector rejected by the sanity gate
    #[error("Step {index}: malformed selector '{selector}' rejected")]
    MalformedSelector {
        /// Step index
        index: usize,
        /// Offending selector
        selector: String,
    },

    /// Fill/select step without a value (empty string is valid; absent is not)
    #[error("Step {index}: missing value (use \"\" to clear the field)")]
    MissingValue {
        /// Step index
        index: usize,
    },

    /// Navigate step without a URL
    #[error("Step {index}: missing URL for navigate action")]
    EmptyUrl {
        /// Step index
        index: usize,
    },

    /// Screenshot step without an output path
    #[error("Step {index}: screenshot path is empty")]
    EmptyPath {
        /// Step index
        index: usize,
    },

    /// Base URL present but blank
    #[error("base_url is empty")]
    EmptyBaseUrl,
}
