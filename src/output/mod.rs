//! Output formatting for subnet plans.
//!
//! This module handles rendering a plan for people and programs:
//! - [`text`] - "Generated N subnets:" followed by one subnet per line
//! - [`json`] - pretty printed JSON object
//! - [`terminal`] - coloured warning and error lines

mod json;
mod terminal;
mod text;

use crate::models::SubnetPlan;
use std::io::{self, Write};

pub use json::write_json;
pub use terminal::{format_error, format_summary, format_warning};
pub use text::{text_header, write_text};

/// Output format selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Write `plan` to `out` in the requested format.
pub fn write_plan<W: Write>(
    plan: &SubnetPlan,
    format: OutputFormat,
    out: &mut W,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => write_text(plan, out),
        OutputFormat::Json => write_json(plan, out),
    }
}
