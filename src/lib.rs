//! Split an IPv6 prefix into equally sized subnets for address planning.
//!
//! The core is [`enumerate`]; the CLI, interactive prompt and HTTP
//! service are thin front ends around it.

pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod models;
pub mod output;
pub mod processing;
pub mod server;

pub use error::PlanError;
pub use models::{Ipv6Net, SubnetPlan};
pub use processing::{enumerate, enumerate_limited};
