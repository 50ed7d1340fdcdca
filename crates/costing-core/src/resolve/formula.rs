//! Checked arithmetic for the costing formulas
//!
//! Every formula carries a label so a failing denominator can be reported
//! with the expression that produced it.

use rust_decimal::Decimal;

use crate::error::ResolveError;
use crate::types::Margin;

type Result<T> = std::result::Result<T, ResolveError>;

fn overflow(formula: &'static str) -> ResolveError {
    ResolveError::UndefinedResult { formula }
}

pub(crate) fn mul(a: Decimal, b: Decimal, formula: &'static str) -> Result<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(formula))
}

pub(crate) fn add(a: Decimal, b: Decimal, formula: &'static str) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(formula))
}

pub(crate) fn sub(a: Decimal, b: Decimal, formula: &'static str) -> Result<Decimal> {
    a.checked_sub(b).ok_or_else(|| overflow(formula))
}

/// Unguarded division: a zero denominator is an error, a negative one is undefined
pub(crate) fn div(num: Decimal, den: Decimal, formula: &'static str) -> Result<Decimal> {
    if den.is_zero() {
        return Err(ResolveError::DivisionByZero { formula });
    }
    if den.is_sign_negative() {
        return Err(ResolveError::UndefinedResult { formula });
    }
    num.checked_div(den).ok_or_else(|| overflow(formula))
}

/// Guarded division: a denominator at or below zero yields zero
pub(crate) fn div_or_zero(num: Decimal, den: Decimal, formula: &'static str) -> Result<Decimal> {
    if den <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    num.checked_div(den).ok_or_else(|| overflow(formula))
}

/// `part / whole * 100`
pub(crate) fn percent_of(part: Decimal, whole: Decimal, formula: &'static str) -> Result<Decimal> {
    mul(div(part, whole, formula)?, Decimal::ONE_HUNDRED, formula)
}

/// `1 - pct/100`
pub(crate) fn one_minus_pct(pct: Decimal, formula: &'static str) -> Result<Decimal> {
    sub(Decimal::ONE, pct / Decimal::ONE_HUNDRED, formula)
}

/// `1 + pct/100`
pub(crate) fn one_plus_pct(pct: Decimal, formula: &'static str) -> Result<Decimal> {
    add(Decimal::ONE, pct / Decimal::ONE_HUNDRED, formula)
}

/// `selling_price = discounted_price / (1 - discount_pct/100)`
pub(crate) fn list_price(discounted_price: Decimal, discount_pct: Decimal) -> Result<Decimal> {
    const FORMULA: &str = "selling_price = discounted_price / (1 - discount_pct/100)";
    div(discounted_price, one_minus_pct(discount_pct, FORMULA)?, FORMULA)
}

/// `discount_pct = (selling_price - discounted_price) / selling_price * 100`
pub(crate) fn discount_between(
    selling_price: Decimal,
    discounted_price: Decimal,
) -> Result<Decimal> {
    const FORMULA: &str = "discount_pct = (selling_price - discounted_price) / selling_price * 100";
    percent_of(sub(selling_price, discounted_price, FORMULA)?, selling_price, FORMULA)
}

/// Profit when the discounted price covers cost, loss otherwise
pub(crate) fn margin(cost: Decimal, discounted_price: Decimal) -> Result<Margin> {
    if discounted_price >= cost {
        const FORMULA: &str = "profit_pct = (discounted_price - cost) / cost * 100";
        let amount = sub(discounted_price, cost, FORMULA)?;
        let pct = percent_of(amount, cost, FORMULA)?;
        Ok(Margin::Profit { amount, pct })
    } else {
        const FORMULA: &str = "loss_pct = (cost - discounted_price) / cost * 100";
        let amount = sub(cost, discounted_price, FORMULA)?;
        let pct = percent_of(amount, cost, FORMULA)?;
        Ok(Margin::Loss { amount, pct })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_div_rejects_zero_and_negative() {
        assert!(matches!(
            div(Decimal::ONE, Decimal::ZERO, "x"),
            Err(ResolveError::DivisionByZero { formula: "x" })
        ));
        assert!(matches!(
            div(Decimal::ONE, Decimal::NEGATIVE_ONE, "x"),
            Err(ResolveError::UndefinedResult { .. })
        ));
        assert_eq!(div_or_zero(Decimal::ONE, Decimal::NEGATIVE_ONE, "x"), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_overflow_is_undefined() {
        assert!(matches!(
            mul(Decimal::MAX, Decimal::TWO, "x"),
            Err(ResolveError::UndefinedResult { .. })
        ));
    }

    #[test]
    fn test_margin_at_break_even_is_profit() {
        let m = margin(Decimal::TEN, Decimal::TEN).unwrap();
        assert_eq!(
            m,
            Margin::Profit {
                amount: Decimal::ZERO,
                pct: Decimal::ZERO
            }
        );
    }
}
