//! Error taxonomy for subnet planning.

use crate::models::SubnetCount;

/// Errors returned when a subnetting request can not be planned.
///
/// All variants are recoverable: front ends map them to an exit code or an
/// HTTP 4xx body, the planner itself never aborts the process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The source block text is not valid IPv6 CIDR notation.
    #[error("Invalid input: '{input}' {reason}")]
    Parse { input: String, reason: String },

    /// The target prefix length does not create any new subnets.
    #[error("New prefix /{target_len} must be larger than the original prefix /{source_len}")]
    InvalidPrefixRelation { source_len: u8, target_len: i64 },

    /// The target prefix length is outside 0..=128.
    #[error("Prefix length /{0} is out of range, must be between 0 and 128")]
    PrefixOutOfRange(i64),

    /// More subnets would be realised than the configured bound allows.
    #[error("Request would generate {total} subnets, more than the maximum of {max}; use a limit")]
    ResultSetTooLarge { total: SubnetCount, max: u64 },
}

impl PlanError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        PlanError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
