use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DataConfig, DisplayConfig, ViewDefinition};

/// Prefix for environment overrides, e.g. `SALESBOARD__DATA__PATH`.
const ENV_PREFIX: &str = "SALESBOARD";

/// Loads the application configuration.
///
/// Reads the TOML file at `path` if it exists, layers `SALESBOARD__*`
/// environment variables on top, deserializes the result into our
/// strongly-typed `Config` struct and validates it. A missing file is not an
/// error; every section has defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    finish(builder)
}

/// Parses a configuration from TOML text, without environment overrides.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    finish(builder)
}

fn finish(builder: config::Config) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(extra_views = config.views.len(), "Configuration loaded.");
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.display.currency_symbol.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            key: "display.currency_symbol",
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{SortPolicy, ViewSource};

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.data.path.is_none());
        assert_eq!(config.display.currency_symbol, "R$");
        assert!(config.views.is_empty());
    }

    #[test]
    fn parses_extra_view_definitions() {
        let config = parse_config(
            r#"
            [data]
            path = "exports/sales.csv"

            [display]
            currency_symbol = "$"

            [[views]]
            name = "MarginByContinent"
            source = "filtered"
            group_by = ["continent"]
            metrics = ["margin"]
            sort = "metric_descending"

            [[views]]
            name = "QuantityByCountry"
            source = "full"
            group_by = ["country"]
            metrics = ["quantity"]
            "#,
        )
        .unwrap();

        assert_eq!(config.data.path.as_deref(), Some(Path::new("exports/sales.csv")));
        assert_eq!(config.display.currency_symbol, "$");
        assert_eq!(config.views.len(), 2);
        assert_eq!(config.views[0].source, ViewSource::Filtered);
        assert_eq!(config.views[0].sort, SortPolicy::MetricDescending);
        assert_eq!(config.views[1].sort, SortPolicy::Unsorted);
    }

    #[test]
    fn rejects_blank_currency_symbol() {
        let err = parse_config("[display]\ncurrency_symbol = \"  \"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { key: "display.currency_symbol", .. }
        ));
    }

    #[test]
    fn rejects_unknown_view_source() {
        let err = parse_config(
            r#"
            [[views]]
            name = "X"
            source = "sometimes"
            group_by = ["year"]
            metrics = ["revenue"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let config = load_config(Path::new("does/not/exist.toml")).unwrap();
        assert!(config.views.is_empty());
    }
}
