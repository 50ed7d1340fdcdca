//! Scenario resolution tests
//! One test per recognised input combination, plus priority behaviour

use costing_core::{resolve, Field, InputRecord, Margin, Scenario};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn money(d: Option<Decimal>) -> Option<Decimal> {
    d.map(|v| v.round_dp(2))
}

#[test]
fn test_cost_profit_discount() {
    let input = InputRecord::new()
        .with(Field::Cost, 100)
        .with(Field::ProfitPct, 20)
        .with(Field::DiscountPct, 10);
    let resolution = resolve(input).unwrap();
    let record = resolution.record;

    assert_eq!(resolution.scenario, Scenario::CostProfitDiscount);
    assert_eq!(record.discounted_price.round_dp(2), dec("120.00"));
    assert_eq!(record.selling_price.round_dp(2), dec("133.33"));
    assert_eq!(record.profit(), Some(dec("20.00")));
    assert_eq!(record.profit_pct(), Some(Decimal::from(20)));
    assert_eq!(record.loss(), Some(Decimal::ZERO));
    assert_eq!(record.loss_pct(), Some(Decimal::ZERO));
}

#[test]
fn test_cost_discounted_price_profit() {
    let input = InputRecord::new()
        .with(Field::Cost, 100)
        .with(Field::DiscountedPrice, 150);
    let resolution = resolve(input).unwrap();
    let record = resolution.record;

    assert_eq!(resolution.scenario, Scenario::CostDiscountedPrice);
    assert_eq!(record.profit(), Some(Decimal::from(50)));
    assert_eq!(record.profit_pct(), Some(Decimal::from(50)));
    assert_eq!(record.loss(), Some(Decimal::ZERO));
    assert_eq!(record.selling_price, Decimal::from(150));
    assert_eq!(record.discount_pct, Decimal::ZERO);
}

#[test]
fn test_cost_discounted_price_loss() {
    let input = InputRecord::new()
        .with(Field::Cost, 150)
        .with(Field::DiscountedPrice, 100);
    let record = resolve(input).unwrap().record;

    assert_eq!(record.loss(), Some(Decimal::from(50)));
    assert_eq!(money(record.loss_pct()), Some(dec("33.33")));
    assert_eq!(record.profit(), Some(Decimal::ZERO));
    assert_eq!(record.profit_pct(), Some(Decimal::ZERO));
}

#[test]
fn test_cost_discounted_price_with_selling_price() {
    // Discount is back-derived from the list price
    let input = InputRecord::new()
        .with(Field::Cost, 80)
        .with(Field::DiscountedPrice, 90)
        .with(Field::SellingPrice, 100);
    let record = resolve(input).unwrap().record;

    assert_eq!(record.discount_pct, Decimal::from(10));
    assert_eq!(record.selling_price, Decimal::from(100));
    assert_eq!(record.profit(), Some(Decimal::from(10)));
}

#[test]
fn test_cost_discounted_price_with_discount() {
    let input = InputRecord::new()
        .with(Field::Cost, 80)
        .with(Field::DiscountedPrice, 90)
        .with(Field::LossPct, 0)
        .with(Field::DiscountPct, 10);
    let record = resolve(input).unwrap().record;

    assert_eq!(record.selling_price, Decimal::from(100));
    assert_eq!(record.discount_pct, Decimal::from(10));
}

#[test]
fn test_cost_loss() {
    let input = InputRecord::new()
        .with(Field::Cost, 200)
        .with(Field::LossPct, 10);
    let resolution = resolve(input).unwrap();
    let record = resolution.record;

    assert_eq!(resolution.scenario, Scenario::CostLoss);
    assert_eq!(record.loss(), Some(Decimal::from(20)));
    assert_eq!(record.discounted_price, Decimal::from(180));
    assert_eq!(record.selling_price, Decimal::from(180));
    assert_eq!(record.discount_pct, Decimal::ZERO);
    assert_eq!(record.profit(), Some(Decimal::ZERO));
}

#[test]
fn test_cost_loss_with_discount() {
    let input = InputRecord::new()
        .with(Field::Cost, 200)
        .with(Field::LossPct, 10)
        .with(Field::DiscountPct, 10);
    let record = resolve(input).unwrap().record;

    assert_eq!(record.discounted_price, Decimal::from(180));
    assert_eq!(record.selling_price, Decimal::from(200));
}

#[test]
fn test_selling_price_discount_with_profit_pct() {
    let input = InputRecord::new()
        .with(Field::SellingPrice, 200)
        .with(Field::DiscountPct, 10)
        .with(Field::ProfitPct, 25);
    let resolution = resolve(input).unwrap();
    let record = resolution.record;

    assert_eq!(resolution.scenario, Scenario::SellingPriceDiscount);
    assert_eq!(record.discounted_price, Decimal::from(180));
    assert_eq!(record.cost, Some(Decimal::from(144)));
    assert_eq!(record.profit(), Some(Decimal::from(36)));
    assert_eq!(record.loss(), Some(Decimal::ZERO));
}

#[test]
fn test_selling_price_discount_with_cost() {
    // 200 at 10% off is 180, below a cost of 200
    let input = InputRecord::new()
        .with(Field::SellingPrice, 200)
        .with(Field::DiscountPct, 10)
        .with(Field::Cost, 200);
    let record = resolve(input).unwrap().record;

    assert_eq!(record.loss(), Some(Decimal::from(20)));
    assert_eq!(record.loss_pct(), Some(Decimal::from(10)));
}

#[test]
fn test_selling_price_discount_with_profit() {
    let input = InputRecord::new()
        .with(Field::SellingPrice, 200)
        .with(Field::DiscountPct, 10)
        .with(Field::Profit, 30);
    let record = resolve(input).unwrap().record;

    assert_eq!(record.cost, Some(Decimal::from(150)));
    assert_eq!(money(record.profit_pct()), Some(dec("20.00")));
}

#[test]
fn test_selling_price_discount_with_profit_equal_to_price() {
    // Cost derives to zero; the margin is guarded to zero rather than failing
    let input = InputRecord::new()
        .with(Field::SellingPrice, 200)
        .with(Field::DiscountPct, 10)
        .with(Field::Profit, 180);
    let record = resolve(input).unwrap().record;

    assert_eq!(record.cost, Some(Decimal::ZERO));
    assert_eq!(record.profit_pct(), Some(Decimal::ZERO));
}

#[test]
fn test_selling_price_discount_partial() {
    let input = InputRecord::new()
        .with(Field::SellingPrice, 50)
        .with(Field::DiscountPct, 20);
    let record = resolve(input).unwrap().record;

    assert_eq!(record.discounted_price, Decimal::from(40));
    assert_eq!(record.cost, None);
    assert_eq!(record.margin, Margin::Unknown);
    assert!(record.is_partial());
    assert_eq!(record.profit(), None);
    assert_eq!(record.loss_pct(), None);
}

#[test]
fn test_cost_selling_price() {
    let input = InputRecord::new()
        .with(Field::Cost, 100)
        .with(Field::SellingPrice, 80);
    let resolution = resolve(input).unwrap();
    let record = resolution.record;

    assert_eq!(resolution.scenario, Scenario::CostSellingPrice);
    assert_eq!(record.discounted_price, Decimal::from(80));
    assert_eq!(record.discount_pct, Decimal::ZERO);
    assert_eq!(record.loss(), Some(Decimal::from(20)));
    assert_eq!(record.loss_pct(), Some(Decimal::from(20)));
}

#[test]
fn test_first_match_ignores_extra_figures() {
    // The supplied discounted price is ignored once scenario 1 claims the input
    let input = InputRecord::new()
        .with(Field::Cost, 100)
        .with(Field::ProfitPct, 20)
        .with(Field::DiscountPct, 10)
        .with(Field::DiscountedPrice, 999);
    let resolution = resolve(input).unwrap();

    assert_eq!(resolution.scenario, Scenario::CostProfitDiscount);
    assert_eq!(resolution.record.discounted_price, Decimal::from(120));
}

#[test]
fn test_resolving_result_is_a_fixed_point() {
    let inputs = [
        InputRecord::new()
            .with(Field::Cost, 100)
            .with(Field::ProfitPct, 20)
            .with(Field::DiscountPct, 10),
        InputRecord::new()
            .with(Field::Cost, 150)
            .with(Field::DiscountedPrice, 100),
        InputRecord::new()
            .with(Field::Cost, 200)
            .with(Field::LossPct, 10),
        InputRecord::new()
            .with(Field::SellingPrice, 200)
            .with(Field::DiscountPct, 10)
            .with(Field::Profit, 30),
    ];

    for input in inputs {
        let first = resolve(input).unwrap().record;
        let again = InputRecord {
            cost: first.cost,
            discounted_price: Some(first.discounted_price),
            ..InputRecord::default()
        };
        let second = resolve(again).unwrap().record;

        assert_eq!(second.profit(), first.profit());
        assert_eq!(second.loss(), first.loss());
        assert_eq!(money(second.profit_pct()), money(first.profit_pct()));
        assert_eq!(money(second.loss_pct()), money(first.loss_pct()));
    }
}
