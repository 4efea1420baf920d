use analytics::{KpiReport, Universe, ViewDescriptor, ViewResult};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use core_types::Measure;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Abbreviates a monetary amount to thousands, millions or billions.
///
/// Thresholds apply to the magnitude, so a negative margin is abbreviated the
/// same way as a positive one. Only the text changes; callers keep the raw
/// value for sign checks.
pub fn format_amount(value: Decimal, symbol: &str) -> String {
    let magnitude = value.abs();
    let (scaled, suffix) = if magnitude >= dec!(1_000_000_000) {
        (value / dec!(1_000_000_000), "B")
    } else if magnitude >= dec!(1_000_000) {
        (value / dec!(1_000_000), "M")
    } else if magnitude >= dec!(1_000) {
        (value / dec!(1_000), "K")
    } else {
        (value, "")
    };
    format!("{} {:.2}{}", symbol, round2(scaled), suffix)
}

/// Whole units with `,` thousands separators; any fraction is truncated.
pub fn format_quantity(value: Decimal) -> String {
    let digits = value.trunc().abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value.trunc().is_sign_negative() && !value.trunc().is_zero() {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// The four KPI tiles as a single-row table. A negative margin is shown in red.
pub fn kpi_table(kpis: &KpiReport, symbol: &str) -> Table {
    let margin_color = if kpis.is_margin_negative() {
        Color::Red
    } else {
        Color::Blue
    };

    let mut table = new_table();
    table.set_header(vec!["Total Revenue", "Total Cost", "Profit Margin", "Units Sold"]);
    table.add_row(vec![
        Cell::new(format_amount(kpis.revenue_total, symbol)).fg(Color::Blue),
        Cell::new(format_amount(kpis.cost_total, symbol)).fg(Color::Blue),
        Cell::new(format_amount(kpis.margin_total, symbol)).fg(margin_color),
        Cell::new(format_quantity(kpis.quantity_total)).fg(Color::Blue),
    ]);
    table
}

/// One view as a table: group-key columns followed by metric columns.
pub fn view_table(view: &ViewResult) -> Table {
    let mut table = new_table();
    let header: Vec<String> = view
        .group_keys
        .iter()
        .map(|d| d.to_string())
        .chain(view.metrics.iter().map(|m| m.to_string()))
        .collect();
    table.set_header(header);

    for row in &view.rows {
        let keys = row.keys.iter().map(|k| Cell::new(k));
        let values = row.values.iter().zip(&view.metrics).map(|(value, measure)| {
            let text = match measure {
                Measure::Quantity => format_quantity(*value),
                _ => format!("{:.2}", round2(*value)),
            };
            Cell::new(text).set_alignment(CellAlignment::Right)
        });
        table.add_row(keys.chain(values).collect::<Vec<_>>());
    }
    table
}

pub fn catalog_table(views: &[ViewDescriptor]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["View", "Group keys", "Metrics", "Source", "Sort"]);
    for view in views {
        let keys: Vec<_> = view.group_keys.iter().map(|d| d.name()).collect();
        let metrics: Vec<_> = view.metrics.iter().map(|m| m.name()).collect();
        table.add_row(vec![
            view.name.clone(),
            keys.join(", "),
            metrics.join(", "),
            view.source.to_string(),
            view.sort.to_string(),
        ]);
    }
    table
}

pub fn universe_table(universe: &Universe) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Filter", "Options"]);
    let years: Vec<_> = universe.years.iter().map(|y| y.to_string()).collect();
    table.add_row(vec!["Year".to_string(), years.join(", ")]);
    table.add_row(vec!["Channel".to_string(), universe.channels.join(", ")]);
    table.add_row(vec!["Region".to_string(), universe.regions.join(", ")]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_by_magnitude() {
        assert_eq!(format_amount(dec!(999.5), "R$"), "R$ 999.50");
        assert_eq!(format_amount(dec!(1_500), "R$"), "R$ 1.50K");
        assert_eq!(format_amount(dec!(1_234_567), "R$"), "R$ 1.23M");
        assert_eq!(format_amount(dec!(2_500_000_000), "$"), "$ 2.50B");
    }

    #[test]
    fn negative_amounts_keep_their_sign() {
        assert_eq!(format_amount(dec!(-2_345_678), "R$"), "R$ -2.35M");
        assert_eq!(format_amount(dec!(-12.345), "R$"), "R$ -12.35");
    }

    #[test]
    fn formatting_leaves_the_value_alone() {
        let margin = dec!(-1_504.7);
        assert_eq!(format_amount(margin, "R$"), "R$ -1.50K");
        assert_eq!(margin, dec!(-1504.7));
    }

    #[test]
    fn quantities_get_thousands_separators() {
        assert_eq!(format_quantity(dec!(0)), "0");
        assert_eq!(format_quantity(dec!(999)), "999");
        assert_eq!(format_quantity(dec!(1000)), "1,000");
        assert_eq!(format_quantity(dec!(1234567.9)), "1,234,567");
        assert_eq!(format_quantity(dec!(-45000)), "-45,000");
    }
}
