use crate::error::AnalyticsError;
use crate::filter::{FilterSelection, FilteredSubset};
use crate::metrics::derive_metrics;
use core_types::{FactRecord, SalesRow};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

/// One untyped row as handed over by the data source.
///
/// Field names are normalized (trimmed, lowercased) on insert, so lookups are
/// case-insensitive: a `"Revenue"` column satisfies the `revenue` field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: HashMap<String, Value>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.insert(normalize(name), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(&normalize(name))
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = RawRecord::new();
        for (name, value) in iter {
            record.insert(name.as_ref(), value);
        }
        record
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// The immutable, margin-enriched sales table every view and filter reads from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    rows: Vec<SalesRow>,
}

impl Dataset {
    /// Builds a dataset from typed fact records, deriving the margin column.
    pub fn from_facts(facts: &[FactRecord]) -> Self {
        Self {
            rows: derive_metrics(facts),
        }
    }

    pub fn rows(&self) -> &[SalesRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Applies a filter selection. See [`crate::filter::filter`].
    pub fn filter(&self, selection: &FilterSelection) -> FilteredSubset<'_> {
        crate::filter::filter(self, selection)
    }

    /// The distinct values a filter selection can choose from.
    pub fn universe(&self) -> Universe {
        let mut years = BTreeSet::new();
        let mut channels = BTreeSet::new();
        let mut regions = BTreeSet::new();
        for row in &self.rows {
            years.insert(row.year());
            channels.insert(row.channel().to_string());
            regions.insert(row.country().to_string());
        }
        Universe {
            years: years.into_iter().collect(),
            channels: channels.into_iter().collect(),
            regions: regions.into_iter().collect(),
        }
    }
}

/// Sorted distinct years, channels and regions (countries) of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Universe {
    pub years: Vec<i32>,
    pub channels: Vec<String>,
    pub regions: Vec<String>,
}

/// Turns raw data-source rows into a [`Dataset`].
///
/// Every row must carry `year`, `channel`, `country`, `continent`, `revenue`,
/// `cost` and `quantity`. The first row that is missing a field or holds an
/// unparseable value aborts the load; no partial dataset is ever returned.
///
/// Values whose margin, or whose column total, would not fit in a `Decimal`
/// are rejected here, so every later sum over the dataset is in range.
pub fn load<I>(records: I) -> Result<Dataset, AnalyticsError>
where
    I: IntoIterator<Item = RawRecord>,
{
    let facts = records
        .into_iter()
        .enumerate()
        .map(|(row, record)| parse_record(row, &record))
        .collect::<Result<Vec<_>, _>>()?;
    check_totals(&facts)?;

    let negative = facts
        .iter()
        .filter(|f| {
            f.revenue.is_sign_negative()
                || f.cost.is_sign_negative()
                || f.quantity.is_sign_negative()
        })
        .count();
    if negative > 0 {
        tracing::warn!(
            rows = negative,
            "Rows with negative revenue, cost or quantity were loaded as-is."
        );
    }

    let dataset = Dataset::from_facts(&facts);
    let universe = dataset.universe();
    tracing::info!(
        rows = dataset.len(),
        years = universe.years.len(),
        channels = universe.channels.len(),
        regions = universe.regions.len(),
        "Dataset loaded."
    );
    Ok(dataset)
}

fn parse_record(row: usize, record: &RawRecord) -> Result<FactRecord, AnalyticsError> {
    Ok(FactRecord {
        year: year_field(row, record)?,
        channel: text_field(row, record, "channel")?,
        country: text_field(row, record, "country")?,
        continent: text_field(row, record, "continent")?,
        revenue: decimal_field(row, record, "revenue")?,
        cost: decimal_field(row, record, "cost")?,
        quantity: decimal_field(row, record, "quantity")?,
    })
}

/// Bounds every measure column by the sum of its absolute values.
///
/// Any filtered or grouped total is at most that bound in magnitude, so once
/// these sums fit, plain `Decimal` addition downstream cannot overflow.
fn check_totals(facts: &[FactRecord]) -> Result<(), AnalyticsError> {
    let mut bounds = [Decimal::ZERO; 4];
    for (row, fact) in facts.iter().enumerate() {
        let margin = fact
            .revenue
            .checked_sub(fact.cost)
            .ok_or_else(|| AnalyticsError::InvalidValue {
                row,
                field: "cost",
                expected: "a cost whose margin fits the decimal range",
                value: fact.cost.to_string(),
            })?;

        let columns = [
            ("revenue", fact.revenue),
            ("cost", fact.cost),
            ("quantity", fact.quantity),
            ("margin", margin),
        ];
        for (bound, (field, value)) in bounds.iter_mut().zip(columns) {
            *bound = bound.checked_add(value.abs()).ok_or_else(|| {
                AnalyticsError::InvalidValue {
                    row,
                    field,
                    expected: "a value whose column total fits the decimal range",
                    value: value.to_string(),
                }
            })?;
        }
    }
    Ok(())
}

/// Looks a field up, treating JSON `null` and blank strings as absent.
fn present<'r>(
    row: usize,
    record: &'r RawRecord,
    field: &'static str,
) -> Result<&'r Value, AnalyticsError> {
    match record.get(field) {
        None | Some(Value::Null) => Err(AnalyticsError::MissingField { row, field }),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(AnalyticsError::MissingField { row, field })
        }
        Some(value) => Ok(value),
    }
}

fn text_field(
    row: usize,
    record: &RawRecord,
    field: &'static str,
) -> Result<String, AnalyticsError> {
    match present(row, record, field)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(AnalyticsError::InvalidValue {
            row,
            field,
            expected: "text",
            value: other.to_string(),
        }),
    }
}

fn decimal_field(
    row: usize,
    record: &RawRecord,
    field: &'static str,
) -> Result<Decimal, AnalyticsError> {
    let value = present(row, record, field)?;
    as_decimal(value).ok_or_else(|| AnalyticsError::InvalidValue {
        row,
        field,
        expected: "a number",
        value: value.to_string(),
    })
}

fn year_field(row: usize, record: &RawRecord) -> Result<i32, AnalyticsError> {
    let value = present(row, record, "year")?;
    as_decimal(value)
        .filter(|d| d.fract().is_zero())
        .and_then(|d| d.to_i32())
        .ok_or_else(|| AnalyticsError::InvalidValue {
            row,
            field: "year",
            expected: "an integer year",
            value: value.to_string(),
        })
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> RawRecord {
        pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    fn full_record() -> RawRecord {
        record(&[
            ("year", json!(2023)),
            ("channel", json!("Store")),
            ("country", json!("USA")),
            ("continent", json!("North America")),
            ("revenue", json!(100)),
            ("cost", json!(40)),
            ("quantity", json!(5)),
        ])
    }

    #[test]
    fn loads_a_well_formed_row() {
        let dataset = load(vec![full_record()]).unwrap();
        assert_eq!(dataset.len(), 1);
        let row = &dataset.rows()[0];
        assert_eq!(row.year(), 2023);
        assert_eq!(row.channel(), "Store");
        assert_eq!(row.margin(), dec!(60));
    }

    #[test]
    fn field_names_are_case_insensitive() {
        let dataset = load(vec![record(&[
            ("Year", json!("2022")),
            ("CHANNEL", json!("Online")),
            ("Country", json!("Canada")),
            (" Continent ", json!("North America")),
            ("Revenue", json!("50.5")),
            ("Cost", json!("20.25")),
            ("Quantity", json!("2")),
        ])])
        .unwrap();
        assert_eq!(dataset.rows()[0].margin(), dec!(30.25));
    }

    #[test]
    fn missing_field_names_row_and_field() {
        let mut bad = full_record();
        bad.insert("cost", Value::Null);
        let err = load(vec![full_record(), bad]).unwrap_err();
        assert_eq!(err, AnalyticsError::MissingField { row: 1, field: "cost" });
        assert!(err.is_load_error());
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let mut bad = full_record();
        bad.insert("channel", "   ");
        let err = load(vec![bad]).unwrap_err();
        assert_eq!(err, AnalyticsError::MissingField { row: 0, field: "channel" });
    }

    #[test]
    fn non_numeric_measure_is_rejected() {
        let mut bad = full_record();
        bad.insert("revenue", "lots");
        match load(vec![bad]).unwrap_err() {
            AnalyticsError::InvalidValue { row, field, value, .. } => {
                assert_eq!(row, 0);
                assert_eq!(field, "revenue");
                assert_eq!(value, "\"lots\"");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fractional_year_is_rejected() {
        let mut bad = full_record();
        bad.insert("year", json!(2023.5));
        let err = load(vec![bad]).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidValue { field: "year", .. }));
    }

    #[test]
    fn scientific_notation_is_accepted() {
        let mut rec = full_record();
        rec.insert("revenue", "1.5e3");
        let dataset = load(vec![rec]).unwrap();
        assert_eq!(dataset.rows()[0].revenue(), dec!(1500));
    }

    #[test]
    fn margin_out_of_decimal_range_is_rejected() {
        let mut huge = full_record();
        huge.insert("revenue", "70000000000000000000000000000");
        huge.insert("cost", "-70000000000000000000000000000");
        let err = load(vec![full_record(), huge]).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidValue { row: 1, field: "cost", .. }));
        assert!(err.is_load_error());
    }

    #[test]
    fn column_total_out_of_decimal_range_is_rejected() {
        let mut big = full_record();
        big.insert("revenue", "50000000000000000000000000000");
        big.insert("cost", "0");
        // Each row alone is fine; only the revenue column total overflows.
        assert!(load(vec![big.clone()]).is_ok());
        let err = load(vec![big.clone(), big]).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidValue { row: 1, field: "revenue", .. }));
    }

    #[test]
    fn empty_input_is_an_empty_dataset() {
        let dataset = load(Vec::new()).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.universe(), Universe::default());
    }

    #[test]
    fn universe_is_sorted_and_distinct() {
        let mut second = full_record();
        second.insert("year", 2021);
        second.insert("channel", "Catalog");
        second.insert("country", "Brazil");
        let dataset = load(vec![full_record(), second, full_record()]).unwrap();
        let universe = dataset.universe();
        assert_eq!(universe.years, vec![2021, 2023]);
        assert_eq!(universe.channels, vec!["Catalog", "Store"]);
        assert_eq!(universe.regions, vec!["Brazil", "USA"]);
    }
}
