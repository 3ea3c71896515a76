// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "৳";
pub const DEFAULT_CURRENCY_CODE: &str = "BDT";

/// Currency settings of the host panel. Every reported total is in `default_currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub currency_symbol: String,
    pub default_currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            default_currency: DEFAULT_CURRENCY_CODE.to_string(),
        }
    }
}

impl Settings {
    /// Builds settings from possibly incomplete host values.
    ///
    /// Symbol and code are only taken as a pair: if either one is missing, both
    /// fall back to the defaults. Present values are kept as stored.
    pub fn from_host(currency_symbol: Option<String>, default_currency: Option<String>) -> Self {
        match (currency_symbol, default_currency) {
            (Some(currency_symbol), Some(default_currency)) => Self {
                currency_symbol,
                default_currency,
            },
            _ => Self::default(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsOverride {
    pub currency_symbol: Option<String>,
    pub default_currency: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: Option<String>,
    pub table_prefix: String,
    pub settings: Option<SettingsOverride>,
}

impl Config {
    /// Settings pinned in the config file, used instead of the host's settings row.
    /// Only a complete pair counts as an override.
    pub fn settings_override(&self) -> Option<Settings> {
        let settings = self.settings.as_ref()?;
        match (
            non_blank(settings.currency_symbol.clone()),
            non_blank(settings.default_currency.clone()),
        ) {
            (Some(currency_symbol), Some(default_currency)) => Some(Settings {
                currency_symbol,
                default_currency,
            }),
            _ => None,
        }
    }

    /// The configured database URL, falling back to `DATABASE_URL`.
    pub fn database_url(&self) -> Result<String> {
        if let Some(url) = self.database_url.as_deref().filter(|u| !u.is_empty()) {
            return Ok(url.to_string());
        }
        std::env::var("DATABASE_URL")
            .context("No database_url in config and DATABASE_URL is not set")
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

/// Loads the config file if it exists, otherwise starts from defaults.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::info!("No config file at {}, using defaults", path.display());
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_host_keeps_complete_pair() {
        let settings = Settings::from_host(Some("$".to_string()), Some("USD".to_string()));
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.default_currency, "USD");
    }

    #[test]
    fn test_from_host_falls_back_as_a_pair() {
        // A lone code must not be shown next to the default symbol
        let settings = Settings::from_host(None, Some("USD".to_string()));
        assert_eq!(settings, Settings::default());

        let settings = Settings::from_host(Some("$".to_string()), None);
        assert_eq!(settings, Settings::default());

        let settings = Settings::from_host(None, None);
        assert_eq!(settings.currency_symbol, "৳");
        assert_eq!(settings.default_currency, "BDT");
    }

    #[test]
    fn test_from_host_keeps_values_as_stored() {
        let settings = Settings::from_host(Some(" Tk ".to_string()), Some("BDT".to_string()));
        assert_eq!(settings.currency_symbol, " Tk ");
        assert_eq!(settings.default_currency, "BDT");

        // Present but blank is still present
        let settings = Settings::from_host(Some("  ".to_string()), Some("USD".to_string()));
        assert_eq!(settings.currency_symbol, "  ");
        assert_eq!(settings.default_currency, "USD");
    }

    #[test]
    fn test_parse_config() -> Result<()> {
        let config: Config = toml::from_str(
            r#"
            database_url = "sqlite://pipra.db"
            table_prefix = "pp_"

            [settings]
            currency_symbol = "$"
            default_currency = "USD"
            "#,
        )?;

        assert_eq!(config.database_url.as_deref(), Some("sqlite://pipra.db"));
        assert_eq!(config.table_prefix, "pp_");
        let settings = config.settings_override().unwrap();
        assert_eq!(settings.default_currency, "USD");
        Ok(())
    }

    #[test]
    fn test_partial_settings_are_not_an_override() -> Result<()> {
        let config: Config = toml::from_str(
            r#"
            [settings]
            currency_symbol = "$"
            "#,
        )?;
        assert!(config.settings_override().is_none());
        assert_eq!(config.table_prefix, "");
        Ok(())
    }

    #[test]
    fn test_load_config_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("analytics.toml");
        let mut file = fs::File::create(&path)?;
        writeln!(file, "database_url = \"sqlite::memory:\"")?;

        let config = load_config(&path)?;
        assert_eq!(config.database_url()?, "sqlite::memory:");

        let missing = load_config_or_default(&dir.path().join("missing.toml"))?;
        assert!(missing.database_url.is_none());
        assert!(missing.settings.is_none());
        Ok(())
    }

    #[test]
    fn test_load_config_reports_parse_errors() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("broken.toml");
        fs::write(&path, "table_prefix = [")?;

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        Ok(())
    }
}
