//! Line-oriented results log.
//!
//! One line per port, marked by kind, suitable for a results file.

use crate::scanner::{PortResult, PortStatus, ScanReport};
use std::io::{self, Write};

/// Format a single result as a log line.
pub fn format_line(result: &PortResult) -> String {
    match result.status {
        PortStatus::Open => format!("[+] Port {} open", result.port),
        PortStatus::Closed => format!("[-] Port {} closed", result.port),
        PortStatus::Error => format!(
            "[!] Port {} error: {}",
            result.port,
            result.error_detail.as_deref().unwrap_or("unknown error")
        ),
    }
}

/// Write every result as a log line, followed by a note if the scan was cut
/// short.
pub fn write_lines<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    for result in &report.results {
        writeln!(out, "{}", format_line(result))?;
    }
    if report.summary.cancelled {
        writeln!(
            out,
            "# scan cancelled after {} of {} ports",
            report.summary.scanned_ports, report.summary.total_ports
        )?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::sample_report;

    #[test]
    fn test_write_lines() {
        let mut buf = Vec::new();
        write_lines(&mut buf, &sample_report(false)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "[!] Port 21 error: no route\n[+] Port 22 open\n[-] Port 23 closed\n"
        );
    }

    #[test]
    fn test_cancelled_note() {
        let mut report = sample_report(true);
        report.summary.total_ports = 10;
        let mut buf = Vec::new();
        write_lines(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("# scan cancelled after 3 of 10 ports\n"));
    }
}
