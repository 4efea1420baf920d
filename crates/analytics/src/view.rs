use core_types::{Dimension, DimensionValue, Measure, SalesRow, SortPolicy, ViewSource};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// A grouped-and-summed projection of the dataset, ready for presentation.
///
/// Built from scratch on every evaluation; never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewResult {
    pub name: String,
    pub source: ViewSource,
    pub group_keys: Vec<Dimension>,
    pub metrics: Vec<Measure>,
    pub rows: Vec<ViewRow>,
}

/// One group: its key values (parallel to `group_keys`) and its sums
/// (parallel to `metrics`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRow {
    pub keys: Vec<DimensionValue>,
    pub values: Vec<Decimal>,
}

impl ViewResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a measure in this view's metric list.
    pub fn metric_index(&self, measure: Measure) -> Option<usize> {
        self.metrics.iter().position(|m| *m == measure)
    }

    /// Sum of a measure across every group, or `None` if the view does not
    /// carry that measure.
    pub fn total(&self, measure: Measure) -> Option<Decimal> {
        let idx = self.metric_index(measure)?;
        Some(self.rows.iter().map(|r| r.values[idx]).sum())
    }
}

/// Groups `rows` by the Cartesian combination of `group_keys`, sums every
/// metric per group, then orders groups per `sort`.
pub(crate) fn aggregate<'a, I>(
    name: &str,
    source: ViewSource,
    group_keys: &[Dimension],
    metrics: &[Measure],
    sort: SortPolicy,
    rows: I,
) -> ViewResult
where
    I: IntoIterator<Item = &'a SalesRow>,
{
    // Groups are kept in first-appearance order; the index maps keys to slots.
    let mut groups: Vec<ViewRow> = Vec::new();
    let mut index: HashMap<Vec<DimensionValue>, usize> = HashMap::new();

    for row in rows {
        let keys: Vec<DimensionValue> = group_keys.iter().map(|d| row.dimension(*d)).collect();
        let slot = match index.get(&keys) {
            Some(&slot) => slot,
            None => {
                groups.push(ViewRow {
                    keys: keys.clone(),
                    values: vec![Decimal::ZERO; metrics.len()],
                });
                index.insert(keys, groups.len() - 1);
                groups.len() - 1
            }
        };
        for (total, measure) in groups[slot].values.iter_mut().zip(metrics) {
            *total += row.measure(*measure);
        }
    }

    match sort {
        SortPolicy::Unsorted => {}
        SortPolicy::KeysAscending => groups.sort_by(|a, b| a.keys.cmp(&b.keys)),
        // `sort_by` is stable, so equal sums keep first-appearance order.
        SortPolicy::MetricDescending => groups.sort_by(|a, b| b.values[0].cmp(&a.values[0])),
    }

    ViewResult {
        name: name.to_string(),
        source,
        group_keys: group_keys.to_vec(),
        metrics: metrics.to_vec(),
        rows: groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::FactRecord;
    use rust_decimal_macros::dec;

    fn row(year: i32, channel: &str, revenue: Decimal) -> SalesRow {
        SalesRow::from(FactRecord {
            year,
            channel: channel.to_string(),
            country: "USA".to_string(),
            continent: "North America".to_string(),
            revenue,
            cost: dec!(1),
            quantity: dec!(1),
        })
    }

    fn text(s: &str) -> DimensionValue {
        DimensionValue::Text(s.to_string())
    }

    #[test]
    fn unsorted_keeps_first_appearance_order() {
        let rows = vec![
            row(2023, "Store", dec!(5)),
            row(2023, "Online", dec!(50)),
            row(2022, "Store", dec!(1)),
        ];
        let view = aggregate(
            "v",
            ViewSource::Full,
            &[Dimension::Channel],
            &[Measure::Revenue],
            SortPolicy::Unsorted,
            &rows,
        );
        assert_eq!(view.rows[0].keys, vec![text("Store")]);
        assert_eq!(view.rows[0].values, vec![dec!(6)]);
        assert_eq!(view.rows[1].keys, vec![text("Online")]);
    }

    #[test]
    fn descending_ties_keep_first_appearance_order() {
        let rows = vec![
            row(2023, "Catalog", dec!(10)),
            row(2023, "Store", dec!(30)),
            row(2023, "Online", dec!(10)),
        ];
        let view = aggregate(
            "v",
            ViewSource::Filtered,
            &[Dimension::Channel],
            &[Measure::Revenue],
            SortPolicy::MetricDescending,
            &rows,
        );
        let order: Vec<_> = view.rows.iter().map(|r| r.keys[0].to_string()).collect();
        assert_eq!(order, vec!["Store", "Catalog", "Online"]);
    }

    #[test]
    fn keys_ascending_orders_by_year_then_channel() {
        let rows = vec![
            row(2023, "Store", dec!(1)),
            row(2022, "Store", dec!(2)),
            row(2023, "Online", dec!(3)),
            row(2022, "Catalog", dec!(4)),
        ];
        let view = aggregate(
            "v",
            ViewSource::Full,
            &[Dimension::Year, Dimension::Channel],
            &[Measure::Revenue],
            SortPolicy::KeysAscending,
            &rows,
        );
        let keys: Vec<_> = view.rows.iter().map(|r| r.keys.clone()).collect();
        assert_eq!(
            keys,
            vec![
                vec![DimensionValue::Year(2022), text("Catalog")],
                vec![DimensionValue::Year(2022), text("Store")],
                vec![DimensionValue::Year(2023), text("Online")],
                vec![DimensionValue::Year(2023), text("Store")],
            ]
        );
    }

    #[test]
    fn sums_several_metrics_independently() {
        let rows = vec![row(2023, "Store", dec!(10)), row(2023, "Store", dec!(20))];
        let view = aggregate(
            "v",
            ViewSource::Full,
            &[Dimension::Channel],
            &[Measure::Revenue, Measure::Cost, Measure::Margin],
            SortPolicy::Unsorted,
            &rows,
        );
        assert_eq!(view.rows[0].values, vec![dec!(30), dec!(2), dec!(28)]);
        assert_eq!(view.total(Measure::Margin), Some(dec!(28)));
        assert_eq!(view.total(Measure::Quantity), None);
    }

    #[test]
    fn no_rows_means_no_groups() {
        let view = aggregate(
            "v",
            ViewSource::Filtered,
            &[Dimension::Channel],
            &[Measure::Revenue],
            SortPolicy::MetricDescending,
            std::iter::empty(),
        );
        assert!(view.is_empty());
        assert_eq!(view.total(Measure::Revenue), Some(Decimal::ZERO));
    }
}
