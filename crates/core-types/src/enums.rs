use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A categorical column a view can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Year,
    Channel,
    Country,
    Continent,
}

impl Dimension {
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Year => "year",
            Dimension::Channel => "channel",
            Dimension::Country => "country",
            Dimension::Continent => "continent",
        }
    }
}

/// A numeric column a view can sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Revenue,
    Cost,
    Quantity,
    /// Derived at load time as `revenue - cost`.
    Margin,
}

impl Measure {
    pub fn name(&self) -> &'static str {
        match self {
            Measure::Revenue => "revenue",
            Measure::Cost => "cost",
            Measure::Quantity => "quantity",
            Measure::Margin => "margin",
        }
    }
}

/// Any column of the sales column contract.
///
/// Parsing is case-insensitive and ignores surrounding whitespace, so both
/// `"Revenue"` and `" revenue "` resolve to `Field::Measure(Measure::Revenue)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Field {
    Dimension(Dimension),
    Measure(Measure),
}

impl Field {
    /// Every column a loaded dataset exposes, in contract order.
    pub const CONTRACT: [Field; 8] = [
        Field::Dimension(Dimension::Year),
        Field::Dimension(Dimension::Channel),
        Field::Dimension(Dimension::Country),
        Field::Dimension(Dimension::Continent),
        Field::Measure(Measure::Revenue),
        Field::Measure(Measure::Cost),
        Field::Measure(Measure::Quantity),
        Field::Measure(Measure::Margin),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Dimension(d) => d.name(),
            Field::Measure(m) => m.name(),
        }
    }
}

impl FromStr for Field {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Field::CONTRACT
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value of one dimension for one row; the key component of a view group.
///
/// Years order numerically, text orders lexicographically. A single dimension
/// never mixes the two variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum DimensionValue {
    Year(i32),
    Text(String),
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionValue::Year(y) => write!(f, "{}", y),
            DimensionValue::Text(s) => f.write_str(s),
        }
    }
}

/// Which rows a view aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewSource {
    /// Only the rows matching the active filter selection.
    Filtered,
    /// Every row of the dataset; the active filter is ignored.
    Full,
}

impl FromStr for ViewSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filtered" => Ok(ViewSource::Filtered),
            "full" => Ok(ViewSource::Full),
            _ => Err(CoreError::UnknownVariant {
                kind: "view source",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ViewSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewSource::Filtered => f.write_str("filtered"),
            ViewSource::Full => f.write_str("full"),
        }
    }
}

/// Ordering applied to the groups of a view after summing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPolicy {
    /// Groups appear in the order their first row appears in the source.
    #[default]
    #[serde(alias = "none")]
    Unsorted,
    /// Lexicographic over the group keys, in declared key order.
    KeysAscending,
    /// Largest first by the view's first metric. Ties keep first-appearance order.
    MetricDescending,
}

impl FromStr for SortPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unsorted" | "none" => Ok(SortPolicy::Unsorted),
            "keys_ascending" => Ok(SortPolicy::KeysAscending),
            "metric_descending" => Ok(SortPolicy::MetricDescending),
            _ => Err(CoreError::UnknownVariant {
                kind: "sort policy",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortPolicy::Unsorted => f.write_str("unsorted"),
            SortPolicy::KeysAscending => f.write_str("keys_ascending"),
            SortPolicy::MetricDescending => f.write_str("metric_descending"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_parse_case_insensitively() {
        assert_eq!("Revenue".parse::<Field>(), Ok(Field::Measure(Measure::Revenue)));
        assert_eq!(" CONTINENT ".parse::<Field>(), Ok(Field::Dimension(Dimension::Continent)));
        assert_eq!("margin".parse::<Field>(), Ok(Field::Measure(Measure::Margin)));
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert_eq!(
            "store".parse::<Field>(),
            Err(CoreError::UnknownField("store".to_string()))
        );
    }

    #[test]
    fn years_order_numerically() {
        let mut keys = vec![
            DimensionValue::Year(2023),
            DimensionValue::Year(999),
            DimensionValue::Year(2022),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                DimensionValue::Year(999),
                DimensionValue::Year(2022),
                DimensionValue::Year(2023)
            ]
        );
    }

    #[test]
    fn sort_policy_accepts_none_alias() {
        assert_eq!("none".parse::<SortPolicy>(), Ok(SortPolicy::Unsorted));
        assert!("sideways".parse::<SortPolicy>().is_err());
    }

    #[test]
    fn view_source_round_trips_through_serde() {
        let json = serde_json::to_string(&ViewSource::Full).unwrap();
        assert_eq!(json, "\"full\"");
        let back: ViewSource = serde_json::from_str("\"filtered\"").unwrap();
        assert_eq!(back, ViewSource::Filtered);
    }
}
