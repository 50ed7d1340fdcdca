//! Input and result records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Field;
use crate::error::ResolveError;

/// How a provided zero is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// A zero counts as "not provided" (matches the classic form behaviour)
    #[default]
    ZeroIsAbsent,
    /// Only `None` is absent; a zero is a real figure
    Explicit,
}

/// Partial set of figures supplied by the user
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputRecord {
    pub cost: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    pub discounted_price: Option<Decimal>,
    #[serde(alias = "discount")]
    pub discount_pct: Option<Decimal>,
    pub profit: Option<Decimal>,
    #[serde(alias = "profit_percent")]
    pub profit_pct: Option<Decimal>,
    pub loss: Option<Decimal>,
    #[serde(alias = "loss_percent")]
    pub loss_pct: Option<Decimal>,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, field: Field, value: impl Into<Decimal>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    pub fn get(&self, field: Field) -> Option<Decimal> {
        match field {
            Field::Cost => self.cost,
            Field::SellingPrice => self.selling_price,
            Field::DiscountedPrice => self.discounted_price,
            Field::DiscountPct => self.discount_pct,
            Field::Profit => self.profit,
            Field::ProfitPct => self.profit_pct,
            Field::Loss => self.loss,
            Field::LossPct => self.loss_pct,
        }
    }

    pub fn set(&mut self, field: Field, value: Option<Decimal>) {
        let slot = match field {
            Field::Cost => &mut self.cost,
            Field::SellingPrice => &mut self.selling_price,
            Field::DiscountedPrice => &mut self.discounted_price,
            Field::DiscountPct => &mut self.discount_pct,
            Field::Profit => &mut self.profit,
            Field::ProfitPct => &mut self.profit_pct,
            Field::Loss => &mut self.loss,
            Field::LossPct => &mut self.loss_pct,
        };
        *slot = value;
    }

    /// All figures in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Field, Option<Decimal>)> + '_ {
        Field::all().map(move |f| (f, self.get(f)))
    }

    /// Check every provided figure against its field range
    pub fn validate(&self) -> Result<(), ResolveError> {
        for (field, value) in self.iter() {
            if let Some(value) = value {
                if !field.accepts(value) {
                    return Err(ResolveError::InvalidInput { field, value });
                }
            }
        }
        Ok(())
    }

    /// Apply the presence policy, dropping figures that count as absent
    pub fn normalized(mut self, presence: Presence) -> Self {
        if presence == Presence::ZeroIsAbsent {
            for field in Field::all() {
                if self.get(field).is_some_and(|v| v.is_zero()) {
                    self.set(field, None);
                }
            }
        }
        self
    }

    /// Whether nothing at all was provided
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, v)| v.is_none())
    }
}

/// Profit or loss outcome of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Margin {
    /// Discounted price at or above cost
    Profit { amount: Decimal, pct: Decimal },
    /// Discounted price below cost
    Loss { amount: Decimal, pct: Decimal },
    /// Cost unknown, so profit and loss cannot be derived
    Unknown,
}

impl Margin {
    /// Signed margin on cost: positive for profit, negative for loss
    pub fn signed_pct(&self) -> Option<Decimal> {
        match self {
            Margin::Profit { pct, .. } => Some(*pct),
            Margin::Loss { pct, .. } => Some(-*pct),
            Margin::Unknown => None,
        }
    }
}

/// Fully resolved set of figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "InputRecord")]
pub struct ResultRecord {
    /// Absent only for a partial selling price + discount resolution
    pub cost: Option<Decimal>,
    pub selling_price: Decimal,
    pub discounted_price: Decimal,
    pub discount_pct: Decimal,
    pub margin: Margin,
}

impl ResultRecord {
    pub fn profit(&self) -> Option<Decimal> {
        match self.margin {
            Margin::Profit { amount, .. } => Some(amount),
            Margin::Loss { .. } => Some(Decimal::ZERO),
            Margin::Unknown => None,
        }
    }

    pub fn profit_pct(&self) -> Option<Decimal> {
        match self.margin {
            Margin::Profit { pct, .. } => Some(pct),
            Margin::Loss { .. } => Some(Decimal::ZERO),
            Margin::Unknown => None,
        }
    }

    pub fn loss(&self) -> Option<Decimal> {
        match self.margin {
            Margin::Loss { amount, .. } => Some(amount),
            Margin::Profit { .. } => Some(Decimal::ZERO),
            Margin::Unknown => None,
        }
    }

    pub fn loss_pct(&self) -> Option<Decimal> {
        match self.margin {
            Margin::Loss { pct, .. } => Some(pct),
            Margin::Profit { .. } => Some(Decimal::ZERO),
            Margin::Unknown => None,
        }
    }

    pub fn get(&self, field: Field) -> Option<Decimal> {
        match field {
            Field::Cost => self.cost,
            Field::SellingPrice => Some(self.selling_price),
            Field::DiscountedPrice => Some(self.discounted_price),
            Field::DiscountPct => Some(self.discount_pct),
            Field::Profit => self.profit(),
            Field::ProfitPct => self.profit_pct(),
            Field::Loss => self.loss(),
            Field::LossPct => self.loss_pct(),
        }
    }

    /// True when cost and margin could not be derived
    pub fn is_partial(&self) -> bool {
        self.margin == Margin::Unknown
    }

    /// All eight figures as a flat record
    pub fn figures(&self) -> InputRecord {
        let mut record = InputRecord::new();
        for field in Field::all() {
            record.set(field, self.get(field));
        }
        record
    }

    /// Check the record invariants: money non-negative, discount within 0..=100
    pub(crate) fn check(self) -> Result<Self, ResolveError> {
        for field in Field::all() {
            let Some(value) = self.get(field) else {
                continue;
            };
            let in_range = match field {
                Field::DiscountPct => field.accepts(value),
                // Percent fields carry no upper bound on the result side
                _ => value.is_zero() || value.is_sign_positive(),
            };
            if !in_range {
                return Err(ResolveError::OutOfRange { field, value });
            }
        }
        Ok(self)
    }
}

impl From<ResultRecord> for InputRecord {
    fn from(record: ResultRecord) -> Self {
        record.figures()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_absent() {
        let input = InputRecord::new()
            .with(Field::Cost, 0)
            .with(Field::SellingPrice, 10);
        let normalized = input.normalized(Presence::ZeroIsAbsent);
        assert_eq!(normalized.cost, None);
        assert_eq!(normalized.selling_price, Some(Decimal::from(10)));

        let explicit = input.normalized(Presence::Explicit);
        assert_eq!(explicit.cost, Some(Decimal::ZERO));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let input = InputRecord::new().with(Field::DiscountPct, 120);
        assert!(matches!(
            input.validate(),
            Err(ResolveError::InvalidInput {
                field: Field::DiscountPct,
                ..
            })
        ));
        assert!(InputRecord::new().with(Field::Cost, 5).validate().is_ok());
    }

    #[test]
    fn test_margin_accessors() {
        let record = ResultRecord {
            cost: Some(Decimal::from(150)),
            selling_price: Decimal::from(100),
            discounted_price: Decimal::from(100),
            discount_pct: Decimal::ZERO,
            margin: Margin::Loss {
                amount: Decimal::from(50),
                pct: Decimal::from(33),
            },
        };
        assert_eq!(record.profit(), Some(Decimal::ZERO));
        assert_eq!(record.profit_pct(), Some(Decimal::ZERO));
        assert_eq!(record.loss(), Some(Decimal::from(50)));
        assert_eq!(record.margin.signed_pct(), Some(Decimal::from(-33)));
    }

    #[test]
    fn test_source_key_aliases() {
        let input: InputRecord =
            serde_json::from_str(r#"{"cost": 100, "discount": 10, "profit_percent": 20}"#)
                .unwrap();
        assert_eq!(input.discount_pct, Some(Decimal::from(10)));
        assert_eq!(input.profit_pct, Some(Decimal::from(20)));
        assert_eq!(input.loss, None);
    }
}
