use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::market::generator::GeneratorConfig;
use crate::ui::chart::ChartTheme;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub chart: ChartConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Interval between generated ticks, in milliseconds.
    pub tick_interval_ms: u64,
    #[serde(flatten)]
    pub generator: GeneratorConfig,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            generator: GeneratorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Maximum visible ticks, i.e. the ring buffer capacity.
    pub capacity: usize,
    pub theme: String,
    /// Minimum interval between chart refreshes, in milliseconds.
    pub min_refresh_ms: u64,
    /// How long the TUI blocks on input before redrawing.
    pub ui_poll_ms: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            capacity: 500,
            theme: "Dark".to_string(),
            min_refresh_ms: 33,
            ui_poll_ms: 33,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Read `config/default.toml` when present, otherwise fall back to the
    /// built-in defaults. Either way the result is validated before use.
    pub fn load() -> Result<Self> {
        let config_path = Path::new("config/default.toml");
        let config = if config_path.exists() {
            let config_str = std::fs::read_to_string(config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&config_str).context("failed to parse config/default.toml")?
        } else {
            Config::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chart.capacity == 0 {
            bail!("chart.capacity must be greater than 0");
        }
        if self.chart.min_refresh_ms == 0 {
            bail!("chart.min_refresh_ms must be greater than 0");
        }
        if ChartTheme::parse(&self.chart.theme).is_none() {
            bail!(
                "chart.theme must be \"Dark\" or \"Light\", got \"{}\"",
                self.chart.theme
            );
        }
        if self.feed.tick_interval_ms == 0 {
            bail!("feed.tick_interval_ms must be greater than 0");
        }
        self.feed
            .generator
            .validate()
            .context("[feed] generator parameters are invalid")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::generator::Regime;

    #[test]
    fn parse_default_toml() {
        let toml_str = r#"
[feed]
tick_interval_ms = 100
initial_regime = "Upward"
base_price = 100.0
volatility = 0.02
min_ticks_in_regime = 50
jump_probability = 0.05

[chart]
capacity = 500
theme = "Dark"
min_refresh_ms = 33

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.feed.tick_interval_ms, 100);
        assert_eq!(config.feed.generator.initial_regime, Regime::Upward);
        assert!((config.feed.generator.base_price - 100.0).abs() < f64::EPSILON);
        assert_eq!(config.chart.capacity, 500);
        assert_eq!(config.chart.theme, "Dark");
        assert_eq!(config.logging.level, "debug");
        config.validate().unwrap();
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.chart.capacity, 500);
        assert_eq!(config.chart.min_refresh_ms, 33);
        assert_eq!(config.feed.tick_interval_ms, 100);
        config.validate().unwrap();
    }

    #[test]
    fn zero_capacity_rejected() {
        let config: Config = toml::from_str("[chart]\ncapacity = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_theme_rejected() {
        let config: Config = toml::from_str("[chart]\ntheme = \"neon\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chart.theme"));

        let config: Config = toml::from_str("[chart]\ntheme = \"light\"\n").unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn bad_generator_probability_rejected() {
        let config: Config = toml::from_str("[feed]\njump_probability = 1.5\n").unwrap();
        assert!(config.validate().is_err());
    }
}
