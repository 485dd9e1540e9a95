//! Output formatting module.
//!
//! Formatters write a finished [`ScanReport`] to any `io::Write`. They do not
//! sort; callers sort the report by port first if they want ascending output.

mod csv_format;
mod json_format;
mod lines;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use lines::{format_line, write_lines};
pub use plain::{print_error, print_info, print_scan_header, print_warning, write_plain};

use crate::cli::OutputFormat;
use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Write `report` in `format`.
///
/// `show_closed` only affects the plain table; machine-readable formats
/// always carry every result.
pub fn write_report<W: Write>(
    out: &mut W,
    report: &ScanReport,
    format: OutputFormat,
    show_closed: bool,
) -> io::Result<()> {
    match format {
        OutputFormat::Plain => write_plain(out, report, show_closed),
        OutputFormat::Lines => write_lines(out, report),
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Csv => write_csv(out, report),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::scanner::{PortResult, ScanReport, ScanSummary};
    use crate::types::{validate, Port};
    use chrono::Utc;

    /// A small sorted report with one result of each status.
    pub fn sample_report(cancelled: bool) -> ScanReport {
        let port = |n| Port::new(n).unwrap();
        let request = validate("192.0.2.10", 21, 23).unwrap();
        let results = vec![
            PortResult::error(port(21), "no route"),
            PortResult::open(port(22)).with_response_time(3),
            PortResult::closed(port(23)),
        ];
        let now = Utc::now();
        ScanReport {
            request,
            summary: ScanSummary {
                host: "192.0.2.10".to_string(),
                total_ports: 3,
                scanned_ports: 3,
                open_count: 1,
                closed_count: 1,
                error_count: 1,
                peak_in_flight: 3,
                cancelled,
                started_at: now,
                finished_at: now,
                duration_ms: 42,
            },
            results,
        }
    }
}
