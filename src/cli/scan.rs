//! Scan subcommand implementation.
//!
//! Handles `portprobe scan <host>`: builds a request from flags and settings,
//! streams results from the engine, then sorts and prints them.

use crate::cli::OutputFormat;
use crate::config::AppSettings;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::scanner::{PortResult, PortStatus, ScanEngine, ScanReport};
use crate::types::{validate, ScanRequest};
use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Scan a port range on a host.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Host to scan (IP address or hostname)
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Inclusive port range ("1-1024") or a single port ("80")
    #[arg(short, long, default_value = "1-1024")]
    pub ports: String,

    /// Connection timeout in milliseconds [default: from settings, 1000]
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Maximum number of concurrent connection attempts [default: from settings, 100]
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Output format for results [default: from settings, plain]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Also write the line-oriented results log to this file
    #[arg(long, value_name = "PATH")]
    pub results_file: Option<PathBuf>,

    /// Show closed ports in plain output
    #[arg(long)]
    pub show_closed: bool,
}

impl ScanCommand {
    /// A scan of `start..=end` with everything else left to settings.
    pub fn interactive(host: String, start: u32, end: u32) -> Self {
        Self {
            host,
            ports: format!("{}-{}", start, end),
            timeout: None,
            concurrency: None,
            output: None,
            results_file: None,
            show_closed: false,
        }
    }

    /// Build the validated request, letting flags override settings.
    pub fn build_request(&self, settings: &AppSettings) -> CliResult<ScanRequest> {
        let (start, end) = parse_port_bounds(&self.ports)?;
        let timeout_ms = self.timeout.unwrap_or(settings.default_timeout_ms);
        let concurrency = self.concurrency.unwrap_or(settings.default_concurrency);

        let request = validate(&self.host, start, end)?
            .with_timeout(Duration::from_millis(timeout_ms))?
            .with_concurrency(concurrency)?;
        Ok(request)
    }

    /// Execute the scan command.
    pub async fn execute(&self, settings: &AppSettings, verbose: bool, quiet: bool) -> CliResult<()> {
        let request = self.build_request(settings)?;
        let format = self.output.unwrap_or(settings.default_output_format);
        let show_closed = self.show_closed || settings.show_closed;
        let results_file = self.results_file.as_ref().or(settings.results_file.as_ref());

        if !quiet && format == OutputFormat::Plain {
            output::print_scan_header(
                request.host(),
                &request.range().to_string(),
                request.range().len(),
            );
        }

        let report = stream_scan(request, verbose && !quiet && format == OutputFormat::Plain).await?;

        if report.summary.cancelled && !quiet {
            output::print_warning(&format!(
                "scan cancelled after {} of {} ports",
                report.summary.scanned_ports, report.summary.total_ports
            ));
        }

        let stdout = io::stdout();
        output::write_report(&mut stdout.lock(), &report, format, show_closed)?;

        if let Some(path) = results_file {
            write_results_file(path, &report)?;
            if !quiet {
                output::print_info(&format!("Results saved to {}", path.display()));
            }
        }

        Ok(())
    }
}

/// Run the scan, consuming results as they arrive, and return them sorted.
///
/// Ctrl-C cancels the scan; whatever finished before that is still returned.
async fn stream_scan(request: ScanRequest, show_progress: bool) -> CliResult<ScanReport> {
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received, cancelling scan");
                cancel.cancel();
            }
        }
    });

    let total = request.range().len();
    let mut handle = ScanEngine::new().start(request, cancel)?;
    let request = handle.request().clone();

    let progress = show_progress.then(|| progress_bar(total as u64));

    let mut results: Vec<PortResult> = Vec::with_capacity(total);
    while let Some(result) = handle.next().await {
        if let Some(pb) = &progress {
            pb.inc(1);
            if result.status == PortStatus::Open {
                pb.set_message(format!("found open port {}", result.port));
            }
        }
        results.push(result);
    }

    let summary = handle.finish().await;
    watcher.abort();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let mut report = ScanReport {
        request,
        summary: summary?,
        results,
    };
    report.sort_by_port();
    Ok(report)
}

fn progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}

/// Write the line-oriented log, like the classic results file.
fn write_results_file(path: &Path, report: &ScanReport) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create results file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    output::write_lines(&mut out, report)
        .with_context(|| format!("failed to write results to {}", path.display()))?;
    Ok(())
}

/// Parse "START-END" or "PORT" into raw bounds.
///
/// Only syntax is checked here; bounds are validated with the request.
pub fn parse_port_bounds(spec: &str) -> CliResult<(u32, u32)> {
    let spec = spec.trim();
    let number = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|_| CliError::Input(format!("invalid port number: '{}'", s.trim())))
    };

    match spec.split_once('-') {
        Some((start, end)) => Ok((number(start)?, number(end)?)),
        None => {
            let port = number(spec)?;
            Ok((port, port))
        }
    }
}
