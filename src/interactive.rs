//! Interactive prompt front end.

use crate::config::PlannerConfig;
use crate::models::parse_prefix_len;
use crate::output::{format_error, write_text};
use crate::processing::enumerate_limited;
use std::error::Error;
use std::io::{BufRead, Write};

const SUBNET_PROMPT: &str = "Enter IPv6 prefix (e.g., 3fff:1::/32): ";
const PREFIX_PROMPT: &str = "Enter new prefix length (e.g., 48): ";

/// Ask for a prefix and a new prefix length, then print the plan or the error.
///
/// Everything, errors included, is written to `out`. Returns `Ok(false)` when
/// the request was rejected; `Err` is kept for I/O failures.
pub fn run_interactive<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    config: &PlannerConfig,
) -> Result<bool, Box<dyn Error>> {
    let subnet = prompt(input, out, SUBNET_PROMPT)?;
    let prefix = prompt(input, out, PREFIX_PROMPT)?;
    log::debug!("interactive request {subnet:?} {prefix:?}");

    let plan = parse_prefix_len(&prefix)
        .and_then(|target_len| enumerate_limited(&subnet, target_len, None, config.max_results));
    match plan {
        Ok(plan) => {
            if let Some(warning) = plan.warning() {
                writeln!(out, "{warning}")?;
            }
            write_text(&plan, out)?;
            Ok(true)
        }
        Err(e) => {
            log::warn!("interactive request rejected: {e}");
            writeln!(out, "{}", format_error(&e))?;
            Ok(false)
        }
    }
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<String, Box<dyn Error>> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err("No input, stdin was closed".into());
    }
    Ok(line.trim().to_string())
}
