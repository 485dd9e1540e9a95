//! JSON output formatting.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Write the full report as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report).map_err(io::Error::from)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::sample_report;

    #[test]
    fn test_json_output() {
        let mut buf = Vec::new();
        write_json(&mut buf, &sample_report(false)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["request"]["host"], "192.0.2.10");
        assert_eq!(value["request"]["timeout_ms"], 1000);
        assert_eq!(value["summary"]["open_count"], 1);
        assert_eq!(value["summary"]["cancelled"], false);
        assert_eq!(value["results"][0]["status"], "error");
        assert_eq!(value["results"][0]["error_detail"], "no route");
        assert!(value["results"][2].get("error_detail").is_none());
    }
}
