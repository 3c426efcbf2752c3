//! Rendering of run reports as text and JSON.

use crate::runner::{RunReport, StepStatus};
use crate::script::Script;

/// Render a run report as a line-oriented text block: one line per attempted
/// step, then a summary.
#[must_use]
pub fn render_text(script: &Script, report: &RunReport) -> String {
    let mut out = String::new();

    let title = if script.name.is_empty() {
        "replay".to_string()
    } else {
        script.name.clone()
    };
    out.push_str(&format!("Run {} ({title})\n", report.run_id));
    out.push_str(&format!(
        "Started: {}\n\n",
        chrono::Local::now().to_rfc3339()
    ));

    for result in &report.results {
        let step = script.steps.get(result.step_index);
        let describe = step.map_or_else(String::new, |s| s.describe());

        let line = match (result.status, &result.message) {
            (StepStatus::Ok, None) => {
                format!("[OK]   Step {}: {describe}\n", result.step_index)
            }
            (StepStatus::Ok, Some(message)) => {
                format!("[WARN] Step {}: {describe} - {message}\n", result.step_index)
            }
            (StepStatus::Failed, message) => format!(
                "[FAIL] Step {}: {describe} - {}\n",
                result.step_index,
                message.as_deref().unwrap_or("failed")
            ),
        };
        out.push_str(&line);
    }

    let attempted = report.results.len();
    let skipped = script.steps.len().saturating_sub(attempted);
    out.push_str(&format!(
        "\n{} step(s) attempted in {:.2}s: {} ok, {} warned, {} failed, {} skipped\n",
        attempted,
        report.elapsed.as_secs_f64(),
        report.ok_count(),
        report.warned_count(),
        report.failed_count(),
        skipped,
    ));

    if report.success {
        out.push_str("[OK] All steps completed successfully\n");
    } else {
        let message = report
            .first_error
            .as_ref()
            .map_or_else(|| "unknown error".to_string(), ToString::to_string);
        out.push_str(&format!("[FAIL] Test execution failed: {message}\n"));
    }

    out
}

/// Render a run report as pretty-printed JSON.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn render_json(script: &Script, report: &RunReport) -> crate::result::RepasarResult<String> {
    let value = serde_json::json!({
        "run_id": report.run_id,
        "script": script.name,
        "timestamp": chrono::Local::now().to_rfc3339(),
        "success": report.success,
        "steps_total": script.steps.len(),
        "steps_attempted": report.results.len(),
        "ok": report.ok_count(),
        "warned": report.warned_count(),
        "failed": report.failed_count(),
        "elapsed_ms": report.elapsed.as_millis() as u64,
        "first_error": report.first_error.as_ref().map(ToString::to_string),
        "results": report.results,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPage;
    use crate::runner::StepRunner;

    fn sample_script() -> Script {
        Script::from_yaml(
            r##"
version: "1.0"
name: "smoke"
steps:
  - type: navigate
    url: "http://x"
  - type: wait
    duration_ms: 10
  - type: click
    selector: "#gone"
  - type: click
    selector: "#skipped"
"##,
        )
        .expect("sample script parses")
    }

    #[tokio::test]
    async fn test_text_report_lines_and_summary() {
        let script = sample_script();
        let mut page = MockPage::new().with_goto_failure();
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        let text = render_text(&script, &report);
        assert!(text.contains("[WARN] Step 0"));
        assert!(text.contains("[OK]   Step 1"));
        assert!(text.contains("[FAIL] Step 2"));
        assert!(text.contains("1 skipped"));
        assert!(text.contains("[FAIL] Test execution failed:"));
    }

    #[tokio::test]
    async fn test_text_report_success_summary() {
        let script = Script::from_yaml("version: \"1.0\"\nsteps: []\n").expect("parses");
        let mut page = MockPage::new();
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        let text = render_text(&script, &report);
        assert!(text.contains("[OK] All steps completed successfully"));
        assert!(text.contains("0 step(s) attempted"));
    }

    #[tokio::test]
    async fn test_json_report_shape() {
        let script = sample_script();
        let mut page = MockPage::new().with_goto_failure();
        let report = StepRunner::for_script(&script).run(&mut page, &script).await;

        let json = render_json(&script, &report).expect("renders");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(value["success"], false);
        assert_eq!(value["steps_total"], 4);
        assert_eq!(value["steps_attempted"], 3);
        assert_eq!(value["warned"], 1);
        assert_eq!(value["results"][2]["status"], "failed");
        assert!(value["first_error"].as_str().is_some());
    }
}
