//! checkssl - easy to read/parse information about SSL certificates
//!
//! Checks each target in turn, prints the result in the selected format
//! and exits with the sum of the per-target exit codes.

use checkssl::cli::{normalize_legacy_flags, Cli, OutputFormat};
use checkssl::config::load_settings;
use checkssl::output::{render, CSV_HEADER};
use checkssl::runner::Checker;
use checkssl::ToolkitError;
use chrono::Utc;
use clap::{CommandFactory, Parser};
use console::style;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_from(normalize_legacy_flags(std::env::args_os()));

    // Initialize logging
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    if cli.targets.is_empty() {
        Cli::command().print_help().map_err(ToolkitError::from)?;
        println!();
        return Ok(0);
    }

    let settings = load_settings(cli.config.as_deref())?;
    debug!("settings: {:?}", settings);

    let checker = Checker::new()
        .with_threshold(cli.threshold(Utc::now(), settings.check.days))
        .with_timeout(cli.timeout_secs(settings.check.timeout_secs));
    let format = cli.output_format(settings.output.format);
    let color = cli.color_enabled(settings.output.color) && console::colors_enabled();
    debug!(
        "threshold {} format {} color {}",
        checker.threshold(),
        format,
        color
    );

    if format == OutputFormat::Csv && cli.csv_header_enabled(settings.output.csv_header) {
        println!("{}", CSV_HEADER);
    }

    let mut exit_code: i32 = 0;
    for target in &cli.targets {
        let result = checker.check(target, false).await;
        exit_code = exit_code.saturating_add(result.exit_code);

        match (format, render(&result, format, color, Utc::now())) {
            (OutputFormat::Text | OutputFormat::Short, Some(rendered)) => print!("{}", rendered),
            (_, Some(rendered)) => println!("{}", rendered),
            (_, None) => {}
        }
    }

    Ok(exit_code)
}
