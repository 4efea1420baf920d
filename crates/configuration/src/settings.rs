use core_types::{SortPolicy, ViewSource};
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// Views registered on top of the standard catalog.
    #[serde(default)]
    pub views: Vec<ViewDefinition>,
}

/// Where the exported warehouse result set lives.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataConfig {
    /// Path to a CSV export of the sales query. Can be overridden on the command line.
    pub path: Option<PathBuf>,
}

/// Settings for rendering KPI tiles and view tables.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Prefix for monetary amounts (e.g., "R$").
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
        }
    }
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

/// A view declared as data. Field names are plain strings here and are only
/// checked against the column contract when the view is registered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewDefinition {
    pub name: String,
    pub source: ViewSource,
    pub group_by: Vec<String>,
    pub metrics: Vec<String>,
    #[serde(default)]
    pub sort: SortPolicy,
}
