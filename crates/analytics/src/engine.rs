use crate::catalog::{evaluate_descriptor, ViewCatalog, ViewDescriptor};
use crate::dataset::Dataset;
use crate::error::AnalyticsError;
use crate::filter::{FilterSelection, FilteredSubset};
use crate::kpi::KpiComputer;
use crate::report::KpiReport;
use crate::view::ViewResult;
use serde::Serialize;

/// Everything the presentation layer needs after one filter change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub selection: FilterSelection,
    /// Number of rows that matched the selection.
    pub matched_rows: usize,
    pub kpis: KpiReport,
    /// One result per registered view, in catalog order.
    pub views: Vec<ViewResult>,
}

/// Applies filter selections to a dataset and evaluates a view catalog.
///
/// Holds no filter state and caches nothing: every call recomputes from the
/// dataset it is given.
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    catalog: ViewCatalog,
    kpis: KpiComputer,
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new(ViewCatalog::standard())
    }
}

impl AggregationEngine {
    pub fn new(catalog: ViewCatalog) -> Self {
        Self {
            catalog,
            kpis: KpiComputer::new(),
        }
    }

    pub fn catalog(&self) -> &ViewCatalog {
        &self.catalog
    }

    /// The registered view descriptors, for enumerating views without
    /// hardcoding the catalog.
    pub fn list_views(&self) -> &[ViewDescriptor] {
        self.catalog.list()
    }

    pub fn filter<'a>(
        &self,
        dataset: &'a Dataset,
        selection: &FilterSelection,
    ) -> FilteredSubset<'a> {
        crate::filter::filter(dataset, selection)
    }

    pub fn evaluate_view(
        &self,
        name: &str,
        dataset: &Dataset,
        subset: &FilteredSubset<'_>,
    ) -> Result<ViewResult, AnalyticsError> {
        self.catalog.evaluate(name, dataset, subset)
    }

    pub fn compute_kpis(&self, subset: &FilteredSubset<'_>) -> KpiReport {
        self.kpis.compute(subset)
    }

    /// One full recomputation: filter, KPIs, then every view in catalog order.
    pub fn snapshot(&self, dataset: &Dataset, selection: &FilterSelection) -> DashboardSnapshot {
        let subset = self.filter(dataset, selection);
        let kpis = self.compute_kpis(&subset);
        let views: Vec<ViewResult> = self
            .catalog
            .list()
            .iter()
            .map(|view| evaluate_descriptor(view, dataset, &subset))
            .collect();

        tracing::debug!(
            matched = subset.len(),
            views = views.len(),
            "Dashboard recomputed."
        );

        DashboardSnapshot {
            selection: selection.clone(),
            matched_rows: subset.len(),
            kpis,
            views,
        }
    }
}
