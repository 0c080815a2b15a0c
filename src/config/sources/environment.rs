//! Environment variable source: CANOPY_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// Uses CANOPY__ prefix and __ as separator for nested keys,
/// e.g. `CANOPY__SERVICE__BASE_URL`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("CANOPY")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
