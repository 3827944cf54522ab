//! Shared provider/cloud vocabulary used across all parley crates.

pub mod types;

pub use types::{AuthType, Cloud, Provider};
