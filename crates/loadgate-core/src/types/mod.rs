//! Type definitions for loadgate runtime configuration

mod runtime_config;

pub use runtime_config::*;
