//! CSV output formatting.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Write results as CSV, one row per port.
pub fn write_csv<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["port", "status", "error_detail", "response_time_ms"])?;

    for result in &report.results {
        wtr.write_record([
            &result.port.to_string(),
            &result.status.to_string(),
            result.error_detail.as_deref().unwrap_or(""),
            &result.response_time_ms.map_or(String::new(), |t| t.to_string()),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::sample_report;

    #[test]
    fn test_csv_output() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &sample_report(false)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows[0], "port,status,error_detail,response_time_ms");
        assert_eq!(rows[1], "21,error,no route,");
        assert_eq!(rows[2], "22,open,,3");
        assert_eq!(rows[3], "23,closed,,");
    }
}
