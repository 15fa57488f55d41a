//! Configuration structures.

use config::ConfigError;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub chart: ChartSettings,
}

impl AppConfig {
    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chart.lookback_days <= 0 {
            return Err(ConfigError::Message(
                "chart.lookback_days must be positive".to_string(),
            ));
        }
        if self.chart.fetch_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "chart.fetch_timeout_secs must be positive".to_string(),
            ));
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(ConfigError::Message(
                "chart dimensions must be positive".to_string(),
            ));
        }
        if self.provider.kind == ProviderKind::Csv && self.provider.data_dir.is_none() {
            return Err(ConfigError::Message(
                "provider.data_dir is required for the csv provider".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "trendchart".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Where price series come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Csv,
}

/// Series provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Directory of `{SYMBOL}.csv` files for the csv provider
    pub data_dir: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Yahoo,
            base_url: "https://query1.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0 (compatible; trendchart/0.1)".to_string(),
            request_timeout_secs: 10,
            data_dir: None,
        }
    }
}

/// Chart defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub lookback_days: i64,
    pub fetch_timeout_secs: u64,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            lookback_days: 365,
            fetch_timeout_secs: 15,
            width: 800,
            height: 600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_csv_requires_data_dir() {
        let mut config = AppConfig::default();
        config.provider.kind = ProviderKind::Csv;
        assert!(config.validate().is_err());

        config.provider.data_dir = Some("data".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_to_toml_round_trip() {
        let text = AppConfig::default().to_toml().unwrap();
        assert!(text.contains("[chart]"));
        assert!(text.contains("kind = \"yahoo\""));

        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.chart.width, 800);
    }
}
