//! Interactive request entry.
//!
//! Used when `portprobe` runs without a subcommand: asks for the target and
//! the port bounds one line at a time.

use crate::error::{CliError, CliResult};
use std::io::{BufRead, Write};

/// Prompt for a host, start port and end port.
///
/// Only parses the answers; range checks are left to request validation so
/// interactive and flag-driven scans reject the same inputs.
pub fn prompt_request<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> CliResult<(String, u32, u32)> {
    let host = ask(input, out, "Target IP or hostname (e.g. 192.168.1.1): ")?;
    let start = ask_port(input, out, "Start port: ")?;
    let end = ask_port(input, out, "End port: ")?;
    Ok((host, start, end))
}

fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> CliResult<String> {
    write!(out, "{}", question)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(CliError::Input("unexpected end of input".to_string()));
    }
    Ok(line.trim().to_string())
}

fn ask_port<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> CliResult<u32> {
    let answer = ask(input, out, question)?;
    answer
        .parse()
        .map_err(|_| CliError::Input(format!("'{}' is not a port number", answer)))
}
