//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for replay execution
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over multiple items
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("[OK]").green().bold().to_string()
        } else {
            "[OK]".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("[FAIL]").red().bold().to_string()
        } else {
            "[FAIL]".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("[WARN]").yellow().bold().to_string()
        } else {
            "[WARN]".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let _ = self.term.write_line(message);
    }

    /// Print a run summary
    pub fn summary(&self, ok: usize, warned: usize, failed: usize, duration: Duration) {
        if self.quiet && failed == 0 {
            return;
        }

        let total = ok + warned + failed;
        let duration_secs = duration.as_secs_f64();

        if self.use_color {
            let ok_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let warned_style = Style::new().yellow();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                ok_style.apply_to("PASSED")
            };

            let _ = self.term.write_line(&format!(
                "{} {} step(s) in {:.2}s ({} ok, {} warned, {} failed)",
                status,
                total,
                duration_secs,
                ok_style.apply_to(ok),
                warned_style.apply_to(warned),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            let _ = self.term.write_line(&format!(
                "{status} {total} step(s) in {duration_secs:.2}s ({ok} ok, {warned} warned, {failed} failed)"
            ));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reporter() {
        let reporter = ProgressReporter::new(true, false);
        assert!(reporter.use_color);
        assert!(!reporter.quiet);
    }

    #[test]
    fn test_default_reporter() {
        let reporter = ProgressReporter::default();
        assert!(reporter.use_color);
        assert!(!reporter.quiet);
    }

    #[test]
    fn test_messages_do_not_panic() {
        let reporter = ProgressReporter::new(false, false);
        reporter.success("step passed");
        reporter.failure("step failed");
        reporter.warning("page load warning");
        reporter.info("loading script");
        reporter.summary(10, 1, 0, Duration::from_secs(5));
        reporter.summary(8, 0, 1, Duration::from_secs(3));
    }

    #[test]
    fn test_progress_bar() {
        let mut reporter = ProgressReporter::new(false, false);
        reporter.start_progress(10, "Validating scripts");
        reporter.increment(1);
        reporter.increment(1);
        reporter.finish();
    }

    #[test]
    fn test_quiet_mode_suppresses_output() {
        let mut reporter = ProgressReporter::new(false, true);
        reporter.start_progress(10, "Validating scripts");
        reporter.success("hidden");
        reporter.warning("hidden");
        reporter.info("hidden");
        // Failure is still printed
        reporter.failure("shown");
    }
}
