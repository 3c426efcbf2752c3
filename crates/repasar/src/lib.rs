//! Repasar: declarative replay of recorded browser interaction sequences.
//!
//! A session recorder produces an ordered list of steps (navigate, wait,
//! click, fill, ...); Repasar replays them against a live page with a
//! uniform wait-then-act-then-settle protocol per step, classifies failures,
//! and produces a complete execution report even when a step fails.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    REPASAR Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Script     │    │ Step       │    │ Headless   │            │
//! │   │ (YAML/JSON)│───►│ Runner     │───►│ Browser    │            │
//! │   │            │    │            │    │ (chromium) │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The runner drives the [`PageDriver`] seam; [`browser::Page`] implements it
//! over CDP (behind the `browser` feature) and [`mock::MockPage`] implements
//! it deterministically for tests.
//!
//! # Example
//!
//! ```
//! use repasar::{Script, StepRunner};
//!
//! let script = Script::from_yaml(r##"
//! version: "1.0"
//! steps:
//!   - type: click
//!     selector: "#add-to-cart"
//! "##).unwrap();
//!
//! let runner = StepRunner::for_script(&script);
//! # let _ = runner;
//! ```

#![warn(missing_docs)]

/// Browser control over CDP, with a stub fallback when the `browser`
/// feature is disabled.
pub mod browser;

/// The page-driver seam between the runner and a live browser.
pub mod driver;

/// Element locators: selector plus occurrence index.
pub mod locator;

/// Deterministic mock page for runner tests.
pub mod mock;

/// Rendering of run reports as text and JSON.
pub mod reporter;

mod result;

/// Sequential step execution.
pub mod runner;

/// Script schema: steps, timing defaults, validation.
pub mod script;

/// Wait conditions and timing defaults.
pub mod wait;

pub use browser::{Browser, BrowserConfig, Page};
pub use driver::PageDriver;
pub use locator::Locator;
pub use result::{RepasarError, RepasarResult};
pub use runner::{ExecutionResult, RunReport, StepRunner, StepStatus};
pub use script::{RunDefaults, Script, ScriptError, Step, SCRIPT_VERSION};
pub use wait::{
    LoadState, WaitOptions, DEFAULT_NAV_TIMEOUT_MS, DEFAULT_SETTLE_MS, DEFAULT_VISIBLE_TIMEOUT_MS,
};
