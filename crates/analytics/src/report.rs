use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The four headline totals shown above the dashboard views.
///
/// `margin_total` is always `revenue_total - cost_total`; it is never summed
/// independently. Values are unrounded; formatting for display happens in the
/// presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiReport {
    pub revenue_total: Decimal,
    pub cost_total: Decimal,
    pub margin_total: Decimal,
    pub quantity_total: Decimal,
}

impl KpiReport {
    /// Creates a zeroed-out report, the result for an empty selection.
    pub fn new() -> Self {
        Self {
            revenue_total: Decimal::ZERO,
            cost_total: Decimal::ZERO,
            margin_total: Decimal::ZERO,
            quantity_total: Decimal::ZERO,
        }
    }

    pub fn is_margin_negative(&self) -> bool {
        self.margin_total < Decimal::ZERO
    }
}

impl Default for KpiReport {
    fn default() -> Self {
        Self::new()
    }
}
