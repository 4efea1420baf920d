use crate::dataset::Dataset;
use crate::error::AnalyticsError;
use crate::filter::FilteredSubset;
use crate::view::{aggregate, ViewResult};
use configuration::ViewDefinition;
use core_types::{Dimension, Field, Measure, SortPolicy, ViewSource};
use serde::Serialize;
use std::collections::HashSet;

/// Declares one view: what it groups by, what it sums, which rows it reads and
/// how its groups are ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewDescriptor {
    pub name: String,
    pub source: ViewSource,
    pub group_keys: Vec<Dimension>,
    pub metrics: Vec<Measure>,
    pub sort: SortPolicy,
}

impl ViewDescriptor {
    pub fn new(
        name: impl Into<String>,
        source: ViewSource,
        group_keys: Vec<Dimension>,
        metrics: Vec<Measure>,
        sort: SortPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            group_keys,
            metrics,
            sort,
        }
    }

    /// Checks the descriptor is evaluable: a name, at least one distinct
    /// group key and at least one distinct metric.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.name.trim().is_empty() {
            return Err(AnalyticsError::EmptyViewName);
        }
        if self.group_keys.is_empty() {
            return Err(AnalyticsError::EmptyGroupKeys(self.name.clone()));
        }
        if self.metrics.is_empty() {
            return Err(AnalyticsError::EmptyMetrics(self.name.clone()));
        }

        let mut seen = HashSet::new();
        let fields = self
            .group_keys
            .iter()
            .map(|d| Field::Dimension(*d))
            .chain(self.metrics.iter().map(|m| Field::Measure(*m)));
        for field in fields {
            if !seen.insert(field) {
                return Err(AnalyticsError::DuplicateField {
                    view: self.name.clone(),
                    field: field.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Resolves a string-typed definition against the column contract.
    pub fn from_definition(def: &ViewDefinition) -> Result<Self, AnalyticsError> {
        let group_keys = def
            .group_by
            .iter()
            .map(|name| match resolve(&def.name, name)? {
                Field::Dimension(d) => Ok(d),
                Field::Measure(_) => Err(AnalyticsError::NotADimension {
                    view: def.name.clone(),
                    field: name.clone(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let metrics = def
            .metrics
            .iter()
            .map(|name| match resolve(&def.name, name)? {
                Field::Measure(m) => Ok(m),
                Field::Dimension(_) => Err(AnalyticsError::NotAMeasure {
                    view: def.name.clone(),
                    field: name.clone(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(def.name.clone(), def.source, group_keys, metrics, def.sort))
    }
}

fn resolve(view: &str, name: &str) -> Result<Field, AnalyticsError> {
    name.parse::<Field>().map_err(|_| AnalyticsError::UnknownField {
        view: view.to_string(),
        field: name.to_string(),
    })
}

/// The ordered set of views the presentation layer can display.
///
/// Every entry has passed validation, so evaluation itself cannot fail on a
/// malformed view; only unknown names are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewCatalog {
    views: Vec<ViewDescriptor>,
}

impl ViewCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The seven dashboard views, in tab order.
    ///
    /// Only `RevenueByChannel` honours the active filter; the others always
    /// aggregate the full dataset.
    pub fn standard() -> Self {
        Self {
            views: standard_views(),
        }
    }

    /// Adds a view after validating it. Fails on malformed descriptors and on
    /// names that are already taken.
    pub fn register(&mut self, descriptor: ViewDescriptor) -> Result<(), AnalyticsError> {
        descriptor.validate()?;
        if self.get(&descriptor.name).is_some() {
            return Err(AnalyticsError::DuplicateView(descriptor.name));
        }
        tracing::debug!(view = %descriptor.name, source = %descriptor.source, "View registered.");
        self.views.push(descriptor);
        Ok(())
    }

    /// Adds a view declared as data, e.g. from the configuration file.
    pub fn register_definition(&mut self, def: &ViewDefinition) -> Result<(), AnalyticsError> {
        self.register(ViewDescriptor::from_definition(def)?)
    }

    /// Every registered descriptor, in registration order.
    pub fn list(&self) -> &[ViewDescriptor] {
        &self.views
    }

    pub fn get(&self, name: &str) -> Option<&ViewDescriptor> {
        self.views.iter().find(|v| v.name == name)
    }

    /// Evaluates the named view over the rows its source policy selects.
    pub fn evaluate(
        &self,
        name: &str,
        dataset: &Dataset,
        subset: &FilteredSubset<'_>,
    ) -> Result<ViewResult, AnalyticsError> {
        let view = self
            .get(name)
            .ok_or_else(|| AnalyticsError::UnknownView(name.to_string()))?;
        Ok(evaluate_descriptor(view, dataset, subset))
    }
}

pub(crate) fn evaluate_descriptor(
    view: &ViewDescriptor,
    dataset: &Dataset,
    subset: &FilteredSubset<'_>,
) -> ViewResult {
    let (name, source, keys, metrics, sort) = (
        view.name.as_str(),
        view.source,
        view.group_keys.as_slice(),
        view.metrics.as_slice(),
        view.sort,
    );
    match source {
        ViewSource::Full => aggregate(name, source, keys, metrics, sort, dataset.rows()),
        ViewSource::Filtered => aggregate(name, source, keys, metrics, sort, subset.iter()),
    }
}

fn standard_views() -> Vec<ViewDescriptor> {
    use Dimension::*;
    use Measure::*;

    vec![
        ViewDescriptor::new(
            "RevenueByChannel",
            ViewSource::Filtered,
            vec![Channel],
            vec![Revenue],
            SortPolicy::MetricDescending,
        ),
        ViewDescriptor::new(
            "RevenueByContinent",
            ViewSource::Full,
            vec![Continent],
            vec![Revenue],
            SortPolicy::MetricDescending,
        ),
        ViewDescriptor::new(
            "RevenueByYear",
            ViewSource::Full,
            vec![Year],
            vec![Revenue],
            SortPolicy::KeysAscending,
        ),
        ViewDescriptor::new(
            "ChannelShare",
            ViewSource::Full,
            vec![Channel],
            vec![Revenue],
            SortPolicy::Unsorted,
        ),
        ViewDescriptor::new(
            "RevenueByCountry",
            ViewSource::Full,
            vec![Country],
            vec![Revenue],
            SortPolicy::Unsorted,
        ),
        ViewDescriptor::new(
            "RevenueByYearAndChannel",
            ViewSource::Full,
            vec![Year, Channel],
            vec![Revenue],
            SortPolicy::KeysAscending,
        ),
        ViewDescriptor::new(
            "ExportAggregate",
            ViewSource::Full,
            vec![Channel, Country],
            vec![Revenue, Cost, Margin],
            SortPolicy::Unsorted,
        ),
    ]
}
