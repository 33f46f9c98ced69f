//! JSON output.

use crate::models::SubnetPlan;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::{self, Write};

/// Write `plan` as a JSON object indented by four spaces.
///
/// Subnets are serialised straight from the lazy iterator, no list is built.
pub fn write_json<W: Write>(plan: &SubnetPlan, out: &mut W) -> io::Result<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut *out, formatter);
    plan.serialize(&mut serializer)?;
    writeln!(out)
}
