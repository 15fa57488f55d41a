//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, ChartSettings, LoggingConfig, ProviderConfig, ProviderKind};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from an optional file and `TRENDCHART__*` variables.
///
/// A missing file falls back to defaults so the binary runs without one.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("TRENDCHART")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate()?;
    Ok(app)
}
