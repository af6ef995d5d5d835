//! Config command

use anyhow::Result;
use camino::Utf8Path;
use loadgate_core::types::RuntimeConfig;

use crate::cli::{ConfigCommands, ConfigShowArgs, OutputFormat};

pub fn run(cmd: ConfigCommands, config_dir: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => show(args, config_dir),
    }
}

fn show(args: ConfigShowArgs, config_dir: Option<&Utf8Path>) -> Result<()> {
    let config = super::load_runtime_config(config_dir)?;
    print!("{}", render(&config, args.format)?);
    Ok(())
}

fn render(config: &RuntimeConfig, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Yaml => serde_yaml_ng::to_string(config)?,
        OutputFormat::Json => serde_json::to_string_pretty(config)? + "\n",
    };
    Ok(rendered)
}
