//! # loadgate-core
//!
//! Core library for loadgate providing:
//! - A data loader guard that joins pluggable async loaders before a
//!   navigation is allowed to proceed
//! - A bounded, fixed-delay retry executor for polling eventually
//!   consistent state
//! - Hierarchical runtime configuration (embedded defaults, file, env)

pub mod config;
pub mod error;
pub mod guard;
pub mod retry;
pub mod types;
pub mod utils;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
pub use guard::{DataLoaderGuard, LoaderRegistry};
pub use retry::{retry_call, retry_with_policy};
pub use utils::get_home_dir;
