//! Field definitions for the eight costing figures
//!
//! To add a field, add an enum variant and an entry to the FIELDS array.
//! Parsing, labels, range checks and report rows all read from here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a figure is displayed and range-checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Monetary amount, shown as `$X.XX`
    Money,
    /// Percentage, shown as `X.XX%`
    Percent,
}

/// Field metadata - single source of truth for each figure
#[derive(Debug)]
pub struct FieldDef {
    /// The field enum variant
    pub field: Field,
    /// Machine key (e.g., "selling_price")
    pub key: &'static str,
    /// Form label (e.g., "Selling Price ($)")
    pub label: &'static str,
    /// Metric name used in the detailed breakdown (e.g., "Selling Price")
    pub name: &'static str,
    /// Money or percent
    pub kind: FieldKind,
    /// Inclusive upper bound, if any
    pub max: Option<Decimal>,
    /// One-line description shown next to the input
    pub help: &'static str,
}

/// Complete registry of all figures, in canonical order.
pub static FIELDS: &[FieldDef] = &[
    FieldDef {
        field: Field::Cost,
        key: "cost",
        label: "Total Cost ($)",
        name: "Cost",
        kind: FieldKind::Money,
        max: None,
        help: "The cost price of the item",
    },
    FieldDef {
        field: Field::SellingPrice,
        key: "selling_price",
        label: "Selling Price ($)",
        name: "Selling Price",
        kind: FieldKind::Money,
        max: None,
        help: "The original selling price before discount",
    },
    FieldDef {
        field: Field::DiscountedPrice,
        key: "discounted_price",
        label: "Discounted Price ($)",
        name: "Discounted Price",
        kind: FieldKind::Money,
        max: None,
        help: "The final price after applying discount",
    },
    FieldDef {
        field: Field::DiscountPct,
        key: "discount_pct",
        label: "Discount (%)",
        name: "Discount",
        kind: FieldKind::Percent,
        max: Some(Decimal::ONE_HUNDRED),
        help: "Discount percentage on selling price",
    },
    FieldDef {
        field: Field::Profit,
        key: "profit",
        label: "Profit ($)",
        name: "Profit",
        kind: FieldKind::Money,
        max: None,
        help: "Profit amount (discounted price - cost)",
    },
    FieldDef {
        field: Field::ProfitPct,
        key: "profit_pct",
        label: "Profit Margin (%)",
        name: "Profit Percent",
        kind: FieldKind::Percent,
        max: None,
        help: "Profit percentage on cost",
    },
    FieldDef {
        field: Field::Loss,
        key: "loss",
        label: "Loss ($)",
        name: "Loss",
        kind: FieldKind::Money,
        max: None,
        help: "Loss amount (cost - discounted price)",
    },
    FieldDef {
        field: Field::LossPct,
        key: "loss_pct",
        label: "Loss Percentage (%)",
        name: "Loss Percent",
        kind: FieldKind::Percent,
        max: Some(Decimal::ONE_HUNDRED),
        help: "Loss percentage on cost",
    },
];

/// The eight costing figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Cost,
    SellingPrice,
    DiscountedPrice,
    DiscountPct,
    Profit,
    ProfitPct,
    Loss,
    LossPct,
}

impl Field {
    /// Get the field definition
    pub fn def(&self) -> &'static FieldDef {
        // FIELDS is ordered like the enum
        &FIELDS[self.index()]
    }

    /// Position in canonical order
    pub fn index(&self) -> usize {
        match self {
            Field::Cost => 0,
            Field::SellingPrice => 1,
            Field::DiscountedPrice => 2,
            Field::DiscountPct => 3,
            Field::Profit => 4,
            Field::ProfitPct => 5,
            Field::Loss => 6,
            Field::LossPct => 7,
        }
    }

    pub fn key(&self) -> &'static str {
        self.def().key
    }

    pub fn label(&self) -> &'static str {
        self.def().label
    }

    pub fn name(&self) -> &'static str {
        self.def().name
    }

    pub fn kind(&self) -> FieldKind {
        self.def().kind
    }

    pub fn help(&self) -> &'static str {
        self.def().help
    }

    /// Check whether a provided value is inside the field's range
    pub fn accepts(&self, value: Decimal) -> bool {
        let non_negative = value.is_zero() || value.is_sign_positive();
        non_negative && self.def().max.map_or(true, |max| value <= max)
    }

    /// Parse a field from its key or metric name (case-insensitive)
    pub fn parse(s: &str) -> Option<Field> {
        let lower = s.trim().to_lowercase().replace([' ', '-'], "_");
        FIELDS
            .iter()
            .find(|d| d.key == lower || d.name.to_lowercase().replace(' ', "_") == lower)
            .map(|d| d.field)
    }

    /// Iterator over all fields in canonical order
    pub fn all() -> impl Iterator<Item = Field> {
        FIELDS.iter().map(|d| d.field)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::parse(s).ok_or_else(|| format!("Unknown field: {s}"))
    }
}
