use core_types::{FactRecord, SalesRow};

/// Adds the derived `margin` column (`revenue - cost`) to every fact record.
///
/// Returns a new row set with the same length and order; the input is left
/// untouched so it can be reused as an unfiltered baseline.
pub fn derive_metrics(facts: &[FactRecord]) -> Vec<SalesRow> {
    facts.iter().cloned().map(SalesRow::from).collect()
}
