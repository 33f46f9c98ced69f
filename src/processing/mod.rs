//! Subnet planning logic.
//!
//! This module contains the business logic shared by every front end:
//! - [`enumerate`] - validate a request and walk its subnets lazily

mod enumerate;

// Re-export public functions
pub use enumerate::{enumerate, enumerate_limited, Subnets, DEFAULT_MAX_RESULTS};
