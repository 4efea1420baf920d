use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    // --- Load errors ---
    #[error("Load error: row {row} is missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },

    #[error("Load error: row {row} field '{field}' expected {expected}, found {value}")]
    InvalidValue {
        row: usize,
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    // --- Configuration errors ---
    #[error("Configuration error: a view must have a non-empty name")]
    EmptyViewName,

    #[error("Configuration error: view '{0}' is already registered")]
    DuplicateView(String),

    #[error("Configuration error: view '{view}' references unknown field '{field}'")]
    UnknownField { view: String, field: String },

    #[error("Configuration error: view '{view}' groups by '{field}', which is not a dimension")]
    NotADimension { view: String, field: String },

    #[error("Configuration error: view '{view}' sums '{field}', which is not a measure")]
    NotAMeasure { view: String, field: String },

    #[error("Configuration error: view '{view}' lists field '{field}' more than once")]
    DuplicateField { view: String, field: String },

    #[error("Configuration error: view '{0}' declares no group keys")]
    EmptyGroupKeys(String),

    #[error("Configuration error: view '{0}' declares no metrics")]
    EmptyMetrics(String),

    // --- Lookup errors ---
    #[error("No view named '{0}' is registered")]
    UnknownView(String),
}

impl AnalyticsError {
    /// True for errors raised while turning raw rows into a dataset.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            AnalyticsError::MissingField { .. } | AnalyticsError::InvalidValue { .. }
        )
    }

    /// True for errors raised while registering a view.
    pub fn is_configuration_error(&self) -> bool {
        !self.is_load_error() && !matches!(self, AnalyticsError::UnknownView(_))
    }
}
