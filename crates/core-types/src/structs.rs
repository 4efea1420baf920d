use crate::enums::{Dimension, DimensionValue, Measure};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the warehouse result set: a (year, channel, country, continent)
/// combination with its summed measures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRecord {
    pub year: i32,
    pub channel: String,
    pub country: String,
    /// Functionally dependent on `country`.
    pub continent: String,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub quantity: Decimal,
}

/// A fact row carrying its derived profit margin.
///
/// Fields are private so `margin` can only ever be set by the conversion from
/// `FactRecord`, which keeps `margin == revenue - cost` for every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesRow {
    year: i32,
    channel: String,
    country: String,
    continent: String,
    revenue: Decimal,
    cost: Decimal,
    quantity: Decimal,
    margin: Decimal,
}

impl From<FactRecord> for SalesRow {
    fn from(fact: FactRecord) -> Self {
        let margin = fact.revenue - fact.cost;
        Self {
            year: fact.year,
            channel: fact.channel,
            country: fact.country,
            continent: fact.continent,
            revenue: fact.revenue,
            cost: fact.cost,
            quantity: fact.quantity,
            margin,
        }
    }
}

impl SalesRow {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn continent(&self) -> &str {
        &self.continent
    }

    pub fn revenue(&self) -> Decimal {
        self.revenue
    }

    pub fn cost(&self) -> Decimal {
        self.cost
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn margin(&self) -> Decimal {
        self.margin
    }

    /// Returns the value of a grouping column for this row.
    pub fn dimension(&self, dimension: Dimension) -> DimensionValue {
        match dimension {
            Dimension::Year => DimensionValue::Year(self.year),
            Dimension::Channel => DimensionValue::Text(self.channel.clone()),
            Dimension::Country => DimensionValue::Text(self.country.clone()),
            Dimension::Continent => DimensionValue::Text(self.continent.clone()),
        }
    }

    /// Returns the value of a numeric column for this row.
    pub fn measure(&self, measure: Measure) -> Decimal {
        match measure {
            Measure::Revenue => self.revenue,
            Measure::Cost => self.cost,
            Measure::Quantity => self.quantity,
            Measure::Margin => self.margin,
        }
    }
}
