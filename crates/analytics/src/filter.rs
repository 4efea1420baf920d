use crate::dataset::{Dataset, Universe};
use core_types::SalesRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The user's current choice of year, channels and regions.
///
/// A plain value: built fresh on every interaction and passed into each core
/// call. Nothing in this crate keeps a selection between calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    year: i32,
    channels: BTreeSet<String>,
    regions: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new<C, R>(year: i32, channels: C, regions: R) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            year,
            channels: channels.into_iter().map(Into::into).collect(),
            regions: regions.into_iter().map(Into::into).collect(),
        }
    }

    /// The reset state: earliest year, every channel, every region.
    ///
    /// Returns `None` when the universe has no years, i.e. the dataset is empty.
    pub fn defaults(universe: &Universe) -> Option<Self> {
        let year = *universe.years.first()?;
        Some(Self::new(
            year,
            universe.channels.iter().cloned(),
            universe.regions.iter().cloned(),
        ))
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn with_channels<C>(mut self, channels: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        self.channels = channels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_regions<R>(mut self, regions: R) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
    {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn channels(&self) -> &BTreeSet<String> {
        &self.channels
    }

    pub fn regions(&self) -> &BTreeSet<String> {
        &self.regions
    }

    /// Year equality AND channel membership AND region membership.
    pub fn matches(&self, row: &SalesRow) -> bool {
        row.year() == self.year
            && self.channels.contains(row.channel())
            && self.regions.contains(row.country())
    }
}

/// The rows of a dataset that match a selection, borrowed from the dataset.
///
/// May be empty; every downstream computation treats that as zero totals and
/// empty groupings.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSubset<'a> {
    rows: Vec<&'a SalesRow>,
}

impl<'a> FilteredSubset<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a SalesRow> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Re-applies a selection to an already filtered subset.
    pub fn filter(&self, selection: &FilterSelection) -> FilteredSubset<'a> {
        filter_rows(self.iter(), selection)
    }
}

/// Keeps exactly the rows of `dataset` matching all three predicates of
/// `selection`. Values absent from the dataset simply match nothing.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredSubset<'a> {
    let subset = filter_rows(dataset.rows().iter(), selection);
    tracing::debug!(
        year = selection.year,
        channels = selection.channels.len(),
        regions = selection.regions.len(),
        matched = subset.len(),
        total = dataset.len(),
        "Filter applied."
    );
    subset
}

fn filter_rows<'a, I>(rows: I, selection: &FilterSelection) -> FilteredSubset<'a>
where
    I: Iterator<Item = &'a SalesRow>,
{
    FilteredSubset {
        rows: rows.filter(|row| selection.matches(row)).collect(),
    }
}
