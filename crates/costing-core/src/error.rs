//! Resolution errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::Field;

/// Input combinations that are guaranteed to match a scenario
pub static MINIMAL_COMBINATIONS: &[&[Field]] = &[
    &[Field::Cost, Field::ProfitPct, Field::DiscountPct],
    &[Field::Cost, Field::DiscountedPrice],
    &[Field::SellingPrice, Field::DiscountPct],
];

/// Failure of a single resolution call. No partial record is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("{} must be {}, got {value}", field.name(), range_text(*field))]
    InvalidInput { field: Field, value: Decimal },

    #[error(
        "Please provide sufficient input values to calculate. Try combinations like: {}",
        describe(combinations)
    )]
    Insufficient {
        combinations: &'static [&'static [Field]],
    },

    #[error("Division by zero in {formula}")]
    DivisionByZero { formula: &'static str },

    #[error("Undefined result in {formula}")]
    UndefinedResult { formula: &'static str },

    #[error("Derived {} is out of range: {value}", field.name())]
    OutOfRange { field: Field, value: Decimal },
}

impl ResolveError {
    pub(crate) fn insufficient() -> Self {
        ResolveError::Insufficient {
            combinations: MINIMAL_COMBINATIONS,
        }
    }

    /// Stable identifier for structured outputs
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::InvalidInput { .. } => "invalid_input",
            ResolveError::Insufficient { .. } => "insufficient_input",
            ResolveError::DivisionByZero { .. } => "division_by_zero",
            ResolveError::UndefinedResult { .. } => "undefined_result",
            ResolveError::OutOfRange { .. } => "out_of_range",
        }
    }
}

fn range_text(field: Field) -> String {
    match field.def().max {
        Some(max) => format!("between 0 and {max}"),
        None => "at least 0".to_string(),
    }
}

/// "Cost + Profit Percent + Discount; Cost + Discounted Price; ..."
fn describe(combinations: &[&[Field]]) -> String {
    combinations
        .iter()
        .map(|combo| {
            combo
                .iter()
                .map(|f| f.name())
                .collect::<Vec<_>>()
                .join(" + ")
        })
        .collect::<Vec<_>>()
        .join("; ")
}
