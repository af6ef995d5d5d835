//! CLI command implementations

pub mod config;
pub mod retry;
pub mod version;

use anyhow::Result;
use camino::Utf8Path;
use loadgate_core::types::RuntimeConfig;
use loadgate_core::HierarchicalConfigLoader;

/// Load the runtime config, honouring an explicit config directory
pub(crate) fn load_runtime_config(config_dir: Option<&Utf8Path>) -> Result<RuntimeConfig> {
    let loader = match config_dir {
        Some(dir) => HierarchicalConfigLoader::with_dir(dir.to_path_buf()),
        None => HierarchicalConfigLoader::new()?,
    };
    Ok(loader.load_runtime_config()?)
}
