//! Default layer for the config builder.

use crate::config::CanopyConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with `CanopyConfig::default()` so every key has a value.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Config::try_from(&CanopyConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}
