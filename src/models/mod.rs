//! Domain models for IPv6 subnet planning.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Ipv6Net`] - IPv6 block with CIDR notation support
//! - [`SubnetRequest`] and [`SubnetPlan`] - a validated split and its result
//! - [`SubnetCount`] and [`AlignmentWarning`] - plan annotations

mod ipv6;
mod plan;

// Re-export public types
pub use ipv6::{
    cut_addr, get_cidr_mask, ip_after_subnet, is_nibble_aligned, last_addr, parse_prefix_len,
    subnet_size, Ipv6Net, MAX_LENGTH,
};
pub use plan::{AlignmentWarning, SubnetCount, SubnetPlan, SubnetRequest};
