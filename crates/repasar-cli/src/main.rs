//! Repasador CLI: replay recorded browser interaction sequences
//!
//! ## Usage
//!
//! ```bash
//! repasador run checkout.yaml            # Replay a recorded script
//! repasador run checkout.yaml --headed   # Watch the browser while it runs
//! repasador validate scripts/*.yaml      # Validate without a browser
//! ```

use clap::Parser;
use repasador::{
    Cli, CliConfig, CliError, CliResult, ColorChoice, Commands, ProgressReporter, ReportFormat,
    RunArgs, ValidateArgs, Verbosity,
};
use repasar::{reporter, Browser, BrowserConfig, RunReport, Script, StepRunner};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match cli.command {
        Commands::Run(args) => run_replay(&config, &args),
        Commands::Validate(args) => run_validate(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// Route the library's per-step log lines to stderr so stdout stays clean
/// for rendered reports.
fn init_tracing(verbosity: Verbosity) {
    use tracing_subscriber::EnvFilter;

    let default_filter = match verbosity {
        Verbosity::Quiet => "repasar=error",
        Verbosity::Normal => "repasar=info",
        Verbosity::Verbose => "repasar=debug",
        Verbosity::Debug => "debug",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load_script(path: &Path) -> CliResult<Script> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::script(format!("Failed to read {}: {e}", path.display())))?;

    let parsed = if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    {
        Script::from_json(&content)
    } else {
        Script::from_yaml(&content)
    };

    parsed.map_err(|e| CliError::script(format!("{}: {e}", path.display())))
}

fn run_replay(config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let script = load_script(&args.script)?;
    let progress =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());

    progress.info(&format!(
        "[{}] Replaying {} ({} step(s))",
        chrono::Local::now().format("%H:%M:%S"),
        args.script.display(),
        script.steps.len()
    ));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::setup(format!("Failed to create runtime: {e}")))?;

    let report = rt.block_on(replay_async(args, &script))?;

    match args.format {
        ReportFormat::Text => {
            if config.verbosity.is_verbose() {
                print!("{}", reporter::render_text(&script, &report));
            }
        }
        ReportFormat::Json => {
            let json = reporter::render_json(&script, &report)?;
            println!("{json}");
        }
    }

    if let Some(ref path) = args.report {
        let rendered = match args.format {
            ReportFormat::Text => reporter::render_text(&script, &report),
            ReportFormat::Json => reporter::render_json(&script, &report)?,
        };
        std::fs::write(path, rendered)?;
        progress.info(&format!("Report written to {}", path.display()));
    }

    progress.summary(
        report.ok_count(),
        report.warned_count(),
        report.failed_count(),
        report.elapsed,
    );

    if report.success {
        progress.success("All steps completed successfully");
        Ok(())
    } else {
        let message = report
            .first_error
            .as_ref()
            .map_or_else(|| "unknown error".to_string(), ToString::to_string);
        progress.failure(&format!("Test execution failed: {message}"));
        Err(CliError::execution(message))
    }
}

/// Launch the browser, replay the script, and release the browser on every
/// exit path. The page handle itself is closed by the runner.
async fn replay_async(args: &RunArgs, script: &Script) -> CliResult<RunReport> {
    let mut browser_config = BrowserConfig::default()
        .with_headless(!args.headed)
        .with_viewport(args.viewport_width, args.viewport_height);
    if args.no_sandbox {
        browser_config = browser_config.with_no_sandbox();
    }
    if let Some(ref path) = args.chromium_path {
        browser_config = browser_config.with_chromium_path(path.clone());
    }

    let browser = Browser::launch(browser_config)
        .await
        .map_err(|e| CliError::setup(e.to_string()))?;

    let mut page = match browser.new_page().await {
        Ok(page) => page,
        Err(e) => {
            let _ = browser.close().await;
            return Err(CliError::setup(e.to_string()));
        }
    };

    let runner = StepRunner::for_script(script);
    let report = runner.run(&mut page, script).await;

    if let Err(e) = browser.close().await {
        tracing::warn!("Failed to close browser: {e}");
    }

    Ok(report)
}

fn run_validate(config: &CliConfig, args: &ValidateArgs) -> CliResult<()> {
    let mut progress =
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());

    if args.scripts.len() > 1 && args.format == ReportFormat::Text {
        progress.start_progress(args.scripts.len() as u64, "Validating scripts");
    }

    let mut summaries = Vec::new();
    let mut failures = 0usize;

    for path in &args.scripts {
        let outcome = load_script(path);
        progress.increment(1);

        match outcome {
            Ok(script) => {
                summaries.push(serde_json::json!({
                    "file": path.display().to_string(),
                    "valid": true,
                    "name": script.name,
                    "steps": script.steps.len(),
                }));
                if args.format == ReportFormat::Text {
                    progress.success(&format!(
                        "{}: {} step(s)",
                        path.display(),
                        script.steps.len()
                    ));
                }
            }
            Err(e) => {
                failures += 1;
                summaries.push(serde_json::json!({
                    "file": path.display().to_string(),
                    "valid": false,
                    "error": e.to_string(),
                }));
                if args.format == ReportFormat::Text {
                    progress.failure(&e.to_string());
                }
            }
        }
    }

    progress.finish();

    if args.format == ReportFormat::Json {
        let rendered = serde_json::to_string_pretty(&serde_json::Value::Array(summaries))
            .unwrap_or_default();
        println!("{rendered}");
    }

    if failures == 0 {
        Ok(())
    } else {
        Err(CliError::script(format!(
            "{failures} script(s) failed validation"
        )))
    }
}
