//! Text formatting of resolved records for display

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{Field, FieldKind, ResultRecord};

/// Placeholder for a figure that could not be derived
pub const NOT_AVAILABLE: &str = "N/A";

/// Format a money amount (always 2 decimal places)
pub fn format_money(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("${:.2}", v.round_dp(2)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format a percentage (always 2 decimal places)
pub fn format_percent(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v.round_dp(2)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format a figure according to its field kind
pub fn format_field(field: Field, value: Option<Decimal>) -> String {
    match field.kind() {
        FieldKind::Money => format_money(value),
        FieldKind::Percent => format_percent(value),
    }
}

/// One row of the detailed breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub field: Field,
    pub metric: &'static str,
    pub value: String,
}

/// Every figure of the record in canonical order
pub fn breakdown(record: &ResultRecord) -> Vec<BreakdownRow> {
    Field::all()
        .map(|field| BreakdownRow {
            field,
            metric: field.name(),
            value: format_field(field, record.get(field)),
        })
        .collect()
}

/// Direction of a metric delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
}

/// A headline figure with an optional delta badge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<(String, Trend)>,
}

impl Metric {
    fn plain(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            delta: None,
        }
    }
}

/// Zero and absent both read as "not available" for headline prices
fn nonzero(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| !v.is_zero())
}

/// Headline metrics, three columns of prices, discount/profit and margin/loss
pub fn summary(record: &ResultRecord) -> Vec<Metric> {
    let profit = record.profit();
    let loss = record.loss().unwrap_or_default();

    let profit_metric = Metric {
        label: "Profit",
        value: format_money(profit),
        delta: profit
            .filter(|p| *p > Decimal::ZERO)
            .map(|_| (format_percent(record.profit_pct()), Trend::Up)),
    };

    let loss_metric = if loss > Decimal::ZERO {
        Metric {
            label: "Loss",
            value: format_money(Some(loss)),
            delta: Some((format!("-{}", format_percent(record.loss_pct())), Trend::Down)),
        }
    } else {
        Metric::plain("Loss", format_money(Some(Decimal::ZERO)))
    };

    vec![
        Metric::plain("Total Cost", format_money(nonzero(record.cost))),
        Metric::plain(
            "Selling Price",
            format_money(nonzero(Some(record.selling_price))),
        ),
        Metric::plain(
            "Discounted Price",
            format_money(nonzero(Some(record.discounted_price))),
        ),
        Metric::plain("Discount", format_percent(Some(record.discount_pct))),
        profit_metric,
        Metric::plain("Profit Margin", format_percent(record.profit_pct())),
        loss_metric,
    ]
}

/// How-to text listing the recognised combinations and formulas
pub const USAGE: &str = "\
This calculator supports various scenarios:

  1. Cost + Profit% + Discount%: Calculate selling and discounted prices
  2. Cost + Discounted Price: Calculate profit/loss margins
  3. Cost + Loss%: Calculate the discounted price after loss
  4. Selling Price + Discount%: Calculate discounted price (add cost for profit/loss)
  5. Cost + Selling Price: Calculate profit and discount

Key formulas:
  Profit = Discounted Price - Cost
  Profit% = (Profit / Cost) x 100
  Loss = Cost - Discounted Price
  Loss% = (Loss / Cost) x 100
  Discount = ((Selling Price - Discounted Price) / Selling Price) x 100
  Discounted Price = Selling Price x (1 - Discount%/100)

Tip: profit/loss is always calculated on the discounted price vs cost.";
