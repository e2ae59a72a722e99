use crate::{DeviceParser, ParserRegistry, RegistryConfig};
use anyhow::Context;
use std::fs;
use std::path::Path;

/// Read and validate a standalone parser table.
pub fn load_parser_file(path: impl AsRef<Path>) -> anyhow::Result<DeviceParser> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading parser table: {}", path.display()))?;
    DeviceParser::from_yaml_str(&raw)
        .with_context(|| format!("decoding parser table: {}", path.display()))
}

pub fn load_registry_config(path: impl AsRef<Path>) -> anyhow::Result<RegistryConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading registry config: {}", path.display()))?;
    let config: RegistryConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("parsing yaml: {}", path.display()))?;
    Ok(config)
}

/// Registry from a config file, or the builtin configuration when `path` is `None`.
pub fn load_registry(path: Option<&Path>) -> anyhow::Result<ParserRegistry> {
    let config = match path {
        Some(p) => load_registry_config(p)?,
        None => RegistryConfig::builtin(),
    };
    ParserRegistry::from_config(config).context("building parser registry")
}
