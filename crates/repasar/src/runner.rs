//! Step runner: sequential replay of a script against one page handle.
//!
//! One page, one ordered step list, no parallelism. Later steps depend on the
//! DOM state left behind by earlier ones, so step *i+1* is never dispatched
//! before step *i*'s outcome is known. Each step is attempted exactly once;
//! robustness comes from the wait-for-visible gate and generous timeouts,
//! not from retry loops.

use crate::driver::PageDriver;
use crate::locator::Locator;
use crate::result::RepasarError;
use crate::script::{RunDefaults, Script, Step};
use crate::wait::{LoadState, INITIAL_SETTLE_MS};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-step outcome status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// The step completed (possibly with a recovered warning)
    Ok,
    /// The step failed fatally and aborted the remaining sequence
    Failed,
}

/// Outcome of one attempted step.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// Index of the step in the script
    pub step_index: usize,
    /// Outcome status
    pub status: StepStatus,
    /// Warning or failure message, when there is one
    pub message: Option<String>,
}

impl ExecutionResult {
    fn ok(step_index: usize) -> Self {
        Self {
            step_index,
            status: StepStatus::Ok,
            message: None,
        }
    }

    fn warned(step_index: usize, message: impl Into<String>) -> Self {
        Self {
            step_index,
            status: StepStatus::Ok,
            message: Some(message.into()),
        }
    }

    fn failed(step_index: usize, message: impl Into<String>) -> Self {
        Self {
            step_index,
            status: StepStatus::Failed,
            message: Some(message.into()),
        }
    }

    /// Whether this result is a recovered warning (`Ok` with a message).
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.status == StepStatus::Ok && self.message.is_some()
    }
}

/// Report for one complete run.
///
/// The report always reflects every attempted step up to and including the
/// first fatal failure; a fatal step failure produces a report, not a crash.
#[derive(Debug)]
pub struct RunReport {
    /// Unique identifier for this run
    pub run_id: Uuid,
    /// One result per attempted step, in order
    pub results: Vec<ExecutionResult>,
    /// Whether every attempted step completed without a fatal failure
    pub success: bool,
    /// The fatal error that aborted the run, if any
    pub first_error: Option<RepasarError>,
    /// Wall-clock time for the run
    pub elapsed: Duration,
}

impl RunReport {
    /// Steps that completed cleanly.
    #[must_use]
    pub fn ok_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == StepStatus::Ok && r.message.is_none())
            .count()
    }

    /// Steps that completed with a recovered warning.
    #[must_use]
    pub fn warned_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_warning()).count()
    }

    /// Steps that failed fatally (zero or one).
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == StepStatus::Failed)
            .count()
    }
}

/// Sequential executor for a script's step list.
#[derive(Debug, Clone, Default)]
pub struct StepRunner {
    defaults: RunDefaults,
}

impl StepRunner {
    /// Create a runner with the given timing defaults.
    #[must_use]
    pub const fn new(defaults: RunDefaults) -> Self {
        Self { defaults }
    }

    /// Create a runner using a script's own timing defaults.
    #[must_use]
    pub const fn for_script(script: &Script) -> Self {
        Self::new(script.defaults)
    }

    /// Replay every step of `script` against `driver`.
    ///
    /// The page handle is released exactly once when the run concludes,
    /// whether it succeeded or failed fatally.
    pub async fn run<D: PageDriver>(&self, driver: &mut D, script: &Script) -> RunReport {
        let run_id = Uuid::new_v4();
        let start = Instant::now();
        tracing::debug!(%run_id, steps = script.steps.len(), "starting run");

        let (results, first_error) = self.run_steps(driver, script).await;

        if let Err(e) = driver.close().await {
            tracing::warn!("Failed to release page handle: {e}");
        }

        let success = first_error.is_none();
        RunReport {
            run_id,
            results,
            success,
            first_error,
            elapsed: start.elapsed(),
        }
    }

    async fn run_steps<D: PageDriver>(
        &self,
        driver: &mut D,
        script: &Script,
    ) -> (Vec<ExecutionResult>, Option<RepasarError>) {
        let mut results = Vec::with_capacity(script.steps.len());

        if let Some(ref url) = script.base_url {
            self.initial_navigation(driver, url).await;
        }

        for (index, step) in script.steps.iter().enumerate() {
            tracing::info!("Step {index}: {}...", step.describe());

            match self.execute_step(driver, step).await {
                Ok(None) => {
                    tracing::info!("  [OK] {}", step.complete_message());
                    results.push(ExecutionResult::ok(index));
                }
                Ok(Some(warning)) => {
                    tracing::warn!("  [WARN] {warning}");
                    results.push(ExecutionResult::warned(index, warning));
                }
                Err(error) => {
                    let message = format!("{} failed at step {index}: {error}", step.kind());
                    tracing::error!("  [FAIL] {message}");
                    results.push(ExecutionResult::failed(index, message));
                    return (results, Some(error));
                }
            }
        }

        (results, None)
    }

    /// Best-effort load of the script's base page. Never fatal: later steps
    /// re-verify element presence through the wait gate.
    async fn initial_navigation<D: PageDriver>(&self, driver: &mut D, url: &str) {
        tracing::info!("Initial: Navigating to {url}...");
        match driver
            .goto(url, LoadState::Load, self.defaults.nav_timeout_ms)
            .await
        {
            Ok(()) => {
                driver.sleep(INITIAL_SETTLE_MS).await;
                tracing::info!("  [OK] Page loaded successfully");
            }
            Err(e) => {
                tracing::warn!("  [WARN] Page load warning: {e} (continuing anyway)");
            }
        }
    }

    /// Execute one step. `Ok(None)` is success, `Ok(Some(_))` is a recovered
    /// warning, `Err(_)` is fatal to the run.
    async fn execute_step<D: PageDriver>(
        &self,
        driver: &mut D,
        step: &Step,
    ) -> Result<Option<String>, RepasarError> {
        match step {
            Step::Navigate {
                url,
                wait_until,
                timeout_ms,
                settle_ms,
            } => {
                let timeout = timeout_ms.unwrap_or(self.defaults.nav_timeout_ms);
                match driver.goto(url, *wait_until, timeout).await {
                    Ok(()) => {
                        driver.sleep(settle_ms.unwrap_or(self.defaults.settle_ms)).await;
                        Ok(None)
                    }
                    Err(e) => Ok(Some(format!("Page load warning: {e} (continuing anyway)"))),
                }
            }

            Step::Wait { duration_ms } => {
                driver.sleep(*duration_ms).await;
                Ok(None)
            }

            Step::Click {
                selector,
                index,
                timeout_ms,
                settle_ms,
            } => {
                let locator = locator_for(selector, *index);
                driver
                    .wait_for_visible(
                        &locator,
                        timeout_ms.unwrap_or(self.defaults.visible_timeout_ms),
                    )
                    .await?;
                driver.click(&locator).await?;
                driver.sleep(settle_ms.unwrap_or(self.defaults.settle_ms)).await;
                Ok(None)
            }

            Step::Fill {
                selector,
                index,
                value,
                timeout_ms,
                settle_ms,
            } => {
                let locator = locator_for(selector, *index);
                driver
                    .wait_for_visible(
                        &locator,
                        timeout_ms.unwrap_or(self.defaults.visible_timeout_ms),
                    )
                    .await?;
                // Validation guarantees a value; "" clears the field.
                driver
                    .fill(&locator, value.as_deref().unwrap_or(""))
                    .await?;
                driver.sleep(settle_ms.unwrap_or(self.defaults.settle_ms)).await;
                Ok(None)
            }

            Step::Select {
                selector,
                index,
                value,
                timeout_ms,
                settle_ms,
            } => {
                let locator = locator_for(selector, *index);
                driver
                    .wait_for_visible(
                        &locator,
                        timeout_ms.unwrap_or(self.defaults.visible_timeout_ms),
                    )
                    .await?;
                driver
                    .select(&locator, value.as_deref().unwrap_or(""))
                    .await?;
                driver.sleep(settle_ms.unwrap_or(self.defaults.settle_ms)).await;
                Ok(None)
            }

            Step::Hover {
                selector,
                index,
                timeout_ms,
                settle_ms,
            } => {
                let locator = locator_for(selector, *index);
                driver
                    .wait_for_visible(
                        &locator,
                        timeout_ms.unwrap_or(self.defaults.visible_timeout_ms),
                    )
                    .await?;
                driver.hover(&locator).await?;
                driver.sleep(settle_ms.unwrap_or(self.defaults.settle_ms)).await;
                Ok(None)
            }

            Step::Press { key, settle_ms } => {
                driver.press(key).await?;
                driver.sleep(settle_ms.unwrap_or(self.defaults.settle_ms)).await;
                Ok(None)
            }

            Step::Scroll { settle_ms } => {
                driver.scroll_by_viewport().await?;
                driver.sleep(settle_ms.unwrap_or(self.defaults.settle_ms)).await;
                Ok(None)
            }

            Step::Screenshot { path } => {
                driver.screenshot(Path::new(path)).await?;
                Ok(None)
            }
        }
    }
}

fn locator_for(selector: &str, index: Option<usize>) -> Locator {
    let locator = Locator::new(selector);
    match index {
        Some(i) => locator.nth(i),
        None => locator,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockCall, MockPage};
    use crate::script::Script;

    fn script_from_yaml(yaml: &str) -> Script {
        Script::from_yaml(yaml).expect("test script should parse")
    }

    #[tokio::test]
    async fn test_empty_script_is_vacuous_success() {
        let script = script_from_yaml("version: \"1.0\"\nsteps: []\n");
        let mut page = MockPage::new();
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        assert!(report.success);
        assert!(report.results.is_empty());
        assert!(report.first_error.is_none());
        assert_eq!(page.close_count(), 1);
    }

    #[tokio::test]
    async fn test_wait_then_click_timeout_scenario() {
        // steps = [Wait(1000), Click("#a", timeout=500)], #a never visible
        let script = script_from_yaml(
            r##"
version: "1.0"
steps:
  - type: wait
    duration_ms: 1000
  - type: click
    selector: "#a"
    index: 0
    timeout_ms: 500
"##,
        );
        let mut page = MockPage::new();
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        assert!(!report.success);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].status, StepStatus::Ok);
        assert_eq!(report.results[1].status, StepStatus::Failed);
        assert!(matches!(
            report.first_error,
            Some(RepasarError::ElementTimeout { ms: 500, .. })
        ));
        assert_eq!(page.close_count(), 1);
    }

    #[tokio::test]
    async fn test_navigation_failure_is_recovered() {
        // steps = [Navigate("http://x"), Click("#b")], goto throws
        let script = script_from_yaml(
            r##"
version: "1.0"
steps:
  - type: navigate
    url: "http://x"
  - type: click
    selector: "#b"
"##,
        );
        let mut page = MockPage::new().with_goto_failure().with_visible("#b");
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        assert!(report.success);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].status, StepStatus::Ok);
        assert!(report.results[0].is_warning());
        assert_eq!(report.results[1].status, StepStatus::Ok);
        assert!(!report.results[1].is_warning());
        assert_eq!(page.close_count(), 1);
    }

    #[tokio::test]
    async fn test_steps_stop_after_first_fatal_failure() {
        let script = script_from_yaml(
            r##"
version: "1.0"
steps:
  - type: click
    selector: "#visible"
  - type: click
    selector: "#gone"
  - type: click
    selector: "#never-reached"
"##,
        );
        let mut page = MockPage::new().with_visible("#visible");
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        assert!(!report.success);
        // results.len() == index of first fatal failure + 1
        assert_eq!(report.results.len(), 2);
        assert_eq!(
            page.count_calls(|c| matches!(c, MockCall::WaitForVisible(l) if l == "#never-reached")),
            0
        );
        assert_eq!(page.close_count(), 1);
    }

    #[tokio::test]
    async fn test_fill_with_empty_value_clears_field() {
        let script = script_from_yaml(
            r##"
version: "1.0"
steps:
  - type: fill
    selector: "#search"
    value: ""
"##,
        );
        let mut page = MockPage::new().with_visible("#search");
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        assert!(report.success);
        // The clear-field path was invoked, not the timeout path.
        assert_eq!(
            page.count_calls(|c| matches!(c, MockCall::Fill(l, v) if l == "#search" && v.is_empty())),
            1
        );
        assert_eq!(page.fields.get("#search").map(String::as_str), Some(""));
    }

    #[tokio::test]
    async fn test_uniform_wait_act_settle_protocol() {
        let script = script_from_yaml(
            r##"
version: "1.0"
steps:
  - type: click
    selector: "#buy"
    settle_ms: 750
"##,
        );
        let mut page = MockPage::new().with_visible("#buy");
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        assert!(report.success);
        assert_eq!(
            page.calls,
            vec![
                MockCall::WaitForVisible("#buy".to_string()),
                MockCall::Click("#buy".to_string()),
                MockCall::Sleep(750),
                MockCall::Close,
            ]
        );
    }

    #[tokio::test]
    async fn test_interaction_failure_is_fatal() {
        let script = script_from_yaml(
            r##"
version: "1.0"
steps:
  - type: click
    selector: "#flaky"
  - type: wait
    duration_ms: 100
"##,
        );
        let mut page = MockPage::new()
            .with_visible("#flaky")
            .with_click_failure("#flaky");
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        assert!(!report.success);
        assert_eq!(report.results.len(), 1);
        assert!(matches!(
            report.first_error,
            Some(RepasarError::Interaction { .. })
        ));
        assert_eq!(page.close_count(), 1);
    }

    #[tokio::test]
    async fn test_initial_navigation_runs_before_steps() {
        let script = script_from_yaml(
            r#"
version: "1.0"
base_url: "https://shop.example.com"
steps:
  - type: wait
    duration_ms: 100
"#,
        );
        let mut page = MockPage::new();
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        assert!(report.success);
        assert_eq!(
            page.calls[0],
            MockCall::Goto("https://shop.example.com".to_string())
        );
        // Initial navigation settles for 1s before step 0 runs.
        assert_eq!(page.calls[1], MockCall::Sleep(1_000));
        assert_eq!(page.calls[2], MockCall::Sleep(100));
    }

    #[tokio::test]
    async fn test_initial_navigation_failure_is_not_fatal() {
        let script = script_from_yaml(
            r#"
version: "1.0"
base_url: "https://down.example.com"
steps:
  - type: wait
    duration_ms: 50
"#,
        );
        let mut page = MockPage::new().with_goto_failure();
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        assert!(report.success);
        assert_eq!(report.results.len(), 1);
        assert_eq!(page.close_count(), 1);
    }

    #[tokio::test]
    async fn test_occurrence_index_reaches_driver() {
        let script = script_from_yaml(
            r#"
version: "1.0"
steps:
  - type: click
    selector: ".product-card"
    index: 2
"#,
        );
        let mut page = MockPage::new().with_visible(".product-card");
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        assert!(report.success);
        assert_eq!(
            page.count_calls(|c| matches!(c, MockCall::Click(l) if l == ".product-card:nth(2)")),
            1
        );
    }

    #[tokio::test]
    async fn test_timing_defaults_flow_into_steps() {
        let script = script_from_yaml(
            r#"
version: "1.0"
defaults:
  settle_ms: 900
steps:
  - type: scroll
"#,
        );
        let mut page = MockPage::new();
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        assert!(report.success);
        assert_eq!(
            page.calls,
            vec![MockCall::Scroll, MockCall::Sleep(900), MockCall::Close]
        );
    }

    #[tokio::test]
    async fn test_report_counts() {
        let script = script_from_yaml(
            r##"
version: "1.0"
steps:
  - type: navigate
    url: "http://x"
  - type: wait
    duration_ms: 10
  - type: click
    selector: "#gone"
"##,
        );
        let mut page = MockPage::new().with_goto_failure();
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        assert_eq!(report.ok_count(), 1);
        assert_eq!(report.warned_count(), 1);
        assert_eq!(report.failed_count(), 1);
    }
}
