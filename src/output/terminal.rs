//! Terminal output utilities.
//!
//! Provides coloured helpers for the lines front ends print next to a plan.

use crate::models::{AlignmentWarning, SubnetPlan};
use colored::Colorize;
use std::fmt::Display;

/// Format an alignment warning in yellow.
pub fn format_warning(warning: &AlignmentWarning) -> String {
    warning.to_string().yellow().to_string()
}

/// Format an error message with a red "Error:" prefix.
pub fn format_error<E: Display + ?Sized>(err: &E) -> String {
    format!("{} {err}", "Error:".red().bold())
}

/// One line describing the split, e.g. "3fff:1::/32 -> /48: 65536 subnets".
pub fn format_summary(plan: &SubnetPlan) -> String {
    format!(
        "{source} -> /{target}: {total} subnets",
        source = plan.source().to_string().cyan(),
        target = plan.target_len(),
        total = plan.total(),
    )
}
