use crate::filter::FilteredSubset;
use crate::report::KpiReport;

/// A stateless calculator reducing a filtered subset to the KPI totals.
#[derive(Debug, Clone, Default)]
pub struct KpiComputer {}

impl KpiComputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sums revenue, cost and quantity over the subset and derives the margin
    /// as their difference. An empty subset yields an all-zero report.
    pub fn compute(&self, subset: &FilteredSubset<'_>) -> KpiReport {
        let mut report = KpiReport::new();

        for row in subset.iter() {
            report.revenue_total += row.revenue();
            report.cost_total += row.cost();
            report.quantity_total += row.quantity();
        }
        report.margin_total = report.revenue_total - report.cost_total;

        report
    }
}

/// Shorthand for `KpiComputer::new().compute(subset)`.
pub fn compute_kpis(subset: &FilteredSubset<'_>) -> KpiReport {
    KpiComputer::new().compute(subset)
}
