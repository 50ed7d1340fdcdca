//! Scenario resolution
//!
//! Scenarios are tried top-down in the order of [`SCENARIOS`]; the first one
//! whose required figures are present claims the input, and any extra
//! figures it does not read are ignored.

mod formula;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ResolveError;
use crate::types::{Field, InputRecord, Margin, Presence, ResultRecord};

use formula::{
    discount_between, div, div_or_zero, list_price, margin, mul, one_minus_pct, one_plus_pct, sub,
};

/// The input combinations the resolver recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Cost, profit % and discount %
    CostProfitDiscount,
    /// Cost and discounted price
    CostDiscountedPrice,
    /// Cost and loss %
    CostLoss,
    /// Selling price and discount %
    SellingPriceDiscount,
    /// Cost and selling price
    CostSellingPrice,
}

/// Evaluation order
pub static SCENARIOS: &[Scenario] = &[
    Scenario::CostProfitDiscount,
    Scenario::CostDiscountedPrice,
    Scenario::CostLoss,
    Scenario::SellingPriceDiscount,
    Scenario::CostSellingPrice,
];

impl Scenario {
    /// Figures that must be present for this scenario to match
    pub fn requires(&self) -> &'static [Field] {
        match self {
            Scenario::CostProfitDiscount => &[Field::Cost, Field::ProfitPct, Field::DiscountPct],
            Scenario::CostDiscountedPrice => &[Field::Cost, Field::DiscountedPrice],
            Scenario::CostLoss => &[Field::Cost, Field::LossPct],
            Scenario::SellingPriceDiscount => &[Field::SellingPrice, Field::DiscountPct],
            Scenario::CostSellingPrice => &[Field::Cost, Field::SellingPrice],
        }
    }

    /// One-based position in evaluation order
    pub fn number(&self) -> usize {
        SCENARIOS.iter().position(|s| s == self).map_or(0, |i| i + 1)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::CostProfitDiscount => {
                "Cost + Profit% + Discount%: calculate selling and discounted prices"
            }
            Scenario::CostDiscountedPrice => {
                "Cost + Discounted Price: calculate profit/loss margins"
            }
            Scenario::CostLoss => "Cost + Loss%: calculate the discounted price after loss",
            Scenario::SellingPriceDiscount => {
                "Selling Price + Discount%: calculate discounted price (add cost for profit/loss)"
            }
            Scenario::CostSellingPrice => "Cost + Selling Price: calculate profit and discount",
        }
    }

    /// Whether the (normalised) input carries every required figure
    pub fn matches(&self, input: &InputRecord) -> bool {
        self.requires().iter().all(|f| input.get(*f).is_some())
    }

    /// First scenario that claims the input
    pub fn detect(input: &InputRecord) -> Option<Scenario> {
        SCENARIOS.iter().copied().find(|s| s.matches(input))
    }

    fn apply(&self, input: &InputRecord) -> Result<ResultRecord, ResolveError> {
        match self {
            Scenario::CostProfitDiscount => cost_profit_discount(input),
            Scenario::CostDiscountedPrice => cost_discounted_price(input),
            Scenario::CostLoss => cost_loss(input),
            Scenario::SellingPriceDiscount => selling_price_discount(input),
            Scenario::CostSellingPrice => cost_selling_price(input),
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scenario {}: {}", self.number(), self.description())
    }
}

/// A resolved record together with the scenario that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    pub scenario: Scenario,
    pub record: ResultRecord,
}

/// Resolve with the default (zero-is-absent) presence policy
pub fn resolve(input: InputRecord) -> Result<Resolution, ResolveError> {
    resolve_with(input, Presence::default())
}

/// Validate, normalise and resolve an input record
pub fn resolve_with(input: InputRecord, presence: Presence) -> Result<Resolution, ResolveError> {
    input.validate()?;
    let input = input.normalized(presence);

    let Some(scenario) = Scenario::detect(&input) else {
        debug!(?input, "no scenario matched");
        return Err(ResolveError::insufficient());
    };
    debug!(scenario = scenario.number(), "scenario matched");

    let record = scenario.apply(&input)?.check()?;
    Ok(Resolution { scenario, record })
}

// Each scenario function is only called once its required figures are
// present, so a missing one reads as zero rather than panicking.
fn required(input: &InputRecord, field: Field) -> Decimal {
    input.get(field).unwrap_or_default()
}

fn cost_profit_discount(input: &InputRecord) -> Result<ResultRecord, ResolveError> {
    let cost = required(input, Field::Cost);
    let profit_pct = required(input, Field::ProfitPct);
    let discount_pct = required(input, Field::DiscountPct);

    let discounted_price = mul(
        cost,
        one_plus_pct(profit_pct, "discounted_price = cost * (1 + profit_pct/100)")?,
        "discounted_price = cost * (1 + profit_pct/100)",
    )?;
    let selling_price = list_price(discounted_price, discount_pct)?;
    let profit = sub(discounted_price, cost, "profit = discounted_price - cost")?;

    Ok(ResultRecord {
        cost: Some(cost),
        selling_price,
        discounted_price,
        discount_pct,
        margin: Margin::Profit {
            amount: profit,
            pct: profit_pct,
        },
    })
}

fn cost_discounted_price(input: &InputRecord) -> Result<ResultRecord, ResolveError> {
    let cost = required(input, Field::Cost);
    let discounted_price = required(input, Field::DiscountedPrice);
    let margin = margin(cost, discounted_price)?;

    let (selling_price, discount_pct) = match (input.selling_price, input.discount_pct) {
        (Some(sp), _) => (sp, discount_between(sp, discounted_price)?),
        (None, Some(discount)) => (list_price(discounted_price, discount)?, discount),
        (None, None) => (discounted_price, Decimal::ZERO),
    };

    Ok(ResultRecord {
        cost: Some(cost),
        selling_price,
        discounted_price,
        discount_pct,
        margin,
    })
}

fn cost_loss(input: &InputRecord) -> Result<ResultRecord, ResolveError> {
    const FORMULA: &str = "loss = cost * loss_pct/100";
    let cost = required(input, Field::Cost);
    let loss_pct = required(input, Field::LossPct);

    let loss = mul(cost, loss_pct / Decimal::ONE_HUNDRED, FORMULA)?;
    let discounted_price = sub(cost, loss, "discounted_price = cost - loss")?;

    let (selling_price, discount_pct) = match input.discount_pct {
        Some(discount) => (list_price(discounted_price, discount)?, discount),
        None => (discounted_price, Decimal::ZERO),
    };

    Ok(ResultRecord {
        cost: Some(cost),
        selling_price,
        discounted_price,
        discount_pct,
        margin: Margin::Loss {
            amount: loss,
            pct: loss_pct,
        },
    })
}

fn selling_price_discount(input: &InputRecord) -> Result<ResultRecord, ResolveError> {
    const FORMULA: &str = "discounted_price = selling_price * (1 - discount_pct/100)";
    let selling_price = required(input, Field::SellingPrice);
    let discount_pct = required(input, Field::DiscountPct);
    let discounted_price = mul(selling_price, one_minus_pct(discount_pct, FORMULA)?, FORMULA)?;

    let (cost, margin) = if let Some(cost) = input.cost {
        (Some(cost), margin(cost, discounted_price)?)
    } else if let Some(profit) = input.profit {
        const FORMULA: &str = "profit_pct = profit / cost * 100";
        let cost = sub(discounted_price, profit, "cost = discounted_price - profit")?;
        let pct = div_or_zero(profit, cost, FORMULA)?;
        let pct = mul(pct, Decimal::ONE_HUNDRED, FORMULA)?;
        (Some(cost), Margin::Profit { amount: profit, pct })
    } else if let Some(profit_pct) = input.profit_pct {
        const FORMULA: &str = "cost = discounted_price / (1 + profit_pct/100)";
        let cost = div(discounted_price, one_plus_pct(profit_pct, FORMULA)?, FORMULA)?;
        let profit = sub(discounted_price, cost, "profit = discounted_price - cost")?;
        (
            Some(cost),
            Margin::Profit {
                amount: profit,
                pct: profit_pct,
            },
        )
    } else {
        (None, Margin::Unknown)
    };

    Ok(ResultRecord {
        cost,
        selling_price,
        discounted_price,
        discount_pct,
        margin,
    })
}

fn cost_selling_price(input: &InputRecord) -> Result<ResultRecord, ResolveError> {
    const FORMULA: &str = "discount_pct = (selling_price - discounted_price) / selling_price * 100";
    let cost = required(input, Field::Cost);
    let selling_price = required(input, Field::SellingPrice);
    let discounted_price = input.discounted_price.unwrap_or(selling_price);
    let margin = margin(cost, discounted_price)?;

    let spread = sub(selling_price, discounted_price, FORMULA)?;
    let discount_pct = mul(
        div_or_zero(spread, selling_price, FORMULA)?,
        Decimal::ONE_HUNDRED,
        FORMULA,
    )?;

    Ok(ResultRecord {
        cost: Some(cost),
        selling_price,
        discounted_price,
        discount_pct,
        margin,
    })
}
