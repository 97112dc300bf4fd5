#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod context;
pub mod role;

pub use context::Identity;
pub use role::{Role, UnknownRoleError};
