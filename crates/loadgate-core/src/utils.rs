//! Shared utility functions for loadgate crates

use anyhow::anyhow;
use rand::distr::Alphanumeric;
use rand::RngExt;
use std::path::PathBuf;

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() so that
/// containerised runs with an overridden HOME resolve the same directory
/// the surrounding scripts use.
pub fn get_home_dir() -> anyhow::Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))
}

/// Generate a short lowercase alphanumeric suffix
///
/// Used to give fixtures (folders, uploaded files, sites) a unique name per
/// run so repeated runs against the same backend do not collide.
pub fn random_suffix(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}
