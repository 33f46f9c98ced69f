//! Plain text output.

use crate::models::SubnetPlan;
use std::io::{self, Write};

/// Header line, mentions the full count when the plan was limited.
pub fn text_header(plan: &SubnetPlan) -> String {
    if plan.is_truncated() {
        format!("Generated {} of {} subnets:", plan.returned(), plan.total())
    } else {
        format!("Generated {} subnets:", plan.total())
    }
}

/// Write the header then one subnet per line, pulling subnets one at a time.
pub fn write_text<W: Write>(plan: &SubnetPlan, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", text_header(plan))?;
    for net in plan.subnets() {
        writeln!(out, "{net}")?;
    }
    Ok(())
}
