//! Version command

use anyhow::Result;

pub fn run() -> Result<()> {
    println!("{}", version_string());
    Ok(())
}

fn version_string() -> String {
    format!("loadgate {}", env!("CARGO_PKG_VERSION"))
}
