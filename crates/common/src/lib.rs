//! Shared building blocks for the ledger workspace: logging setup,
//! Prometheus counters and small wire types.

pub mod observability;
pub mod types;
pub mod utils;
