use crate::config::types::HarvestConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Parses a harvest configuration from TOML text and validates it
///
/// Every table is optional: a file holding only `[paging] delay-secs = 1.0`
/// keeps the default endpoint, retry policy and output names.
pub fn parse_config(content: &str) -> Result<HarvestConfig, ConfigError> {
    let config: HarvestConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Reads and parses the configuration file at `path`
pub fn load_config(path: &Path) -> Result<HarvestConfig, ConfigError> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Hex SHA-256 of the configuration file
///
/// The binary logs it next to the output directory, so exported datasets can
/// be traced back to the exact settings that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    Ok(hash_content(&std::fs::read(path)?))
}

/// Loads the configuration and hashes the same bytes that were parsed
pub fn load_config_with_hash(path: &Path) -> Result<(HarvestConfig, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_content(content.as_bytes())))
}

fn hash_content(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}
