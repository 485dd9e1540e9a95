//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::scanner::{PortStatus, ScanReport};
use console::{style, Style};
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Write results as a human-readable table.
pub fn write_plain<W: Write>(out: &mut W, report: &ScanReport, show_closed: bool) -> io::Result<()> {
    let summary = &report.summary;

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "                    {} Scan Results",
        style("portprobe").cyan().bold()
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Target:").bold(), summary.host)?;
    writeln!(out, "  {} {}", style("Ports:").bold(), report.request.range())?;
    writeln!(out)?;

    writeln!(
        out,
        "  {} {} of {} ports scanned in {:.2}s",
        style("Statistics:").bold(),
        summary.scanned_ports,
        summary.total_ports,
        summary.duration_ms as f64 / 1000.0
    )?;
    writeln!(
        out,
        "               {} open, {} closed, {} errors",
        style(summary.open_count).green().bold(),
        style(summary.closed_count).red(),
        style(summary.error_count).yellow()
    )?;
    if summary.cancelled {
        writeln!(
            out,
            "               {}",
            style("scan cancelled, results are partial").yellow().bold()
        )?;
    }
    writeln!(out)?;

    let visible: Vec<_> = report
        .results
        .iter()
        .filter(|r| show_closed || r.status != PortStatus::Closed)
        .collect();

    if visible.is_empty() {
        writeln!(out, "  {}", style("No ports to display.").dim())?;
    } else {
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        writeln!(
            out,
            "  {:>6}  {:^8}  {}",
            style("PORT").bold(),
            style("STATE").bold(),
            style("DETAIL").bold()
        )?;
        writeln!(out, "  {}", style(THIN_RULE).dim())?;

        for result in visible {
            let status_style = match result.status {
                PortStatus::Open => Style::new().green().bold(),
                PortStatus::Closed => Style::new().red(),
                PortStatus::Error => Style::new().yellow(),
            };

            let detail = match (&result.error_detail, result.response_time_ms) {
                (Some(detail), _) => truncate_string(detail, 45),
                (None, Some(ms)) => format!("{}ms", ms),
                (None, None) => String::new(),
            };

            writeln!(
                out,
                "  {:>6}  {:^8}  {}",
                result.port.as_u16(),
                status_style.apply_to(result.status.to_string()),
                style(detail).dim()
            )?;
        }

        writeln!(out, "  {}", style(THIN_RULE).dim())?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    out.flush()
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(host: &str, ports: &str, count: usize) {
    eprintln!();
    eprintln!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portprobe").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("{} Target: {}", style("•").dim(), style(host).white().bold());
    eprintln!(
        "{} Scanning {} ports ({})...",
        style("•").dim(),
        style(count).white().bold(),
        ports
    );
    eprintln!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    eprintln!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Truncate a string to a maximum length, adding ellipsis if truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
