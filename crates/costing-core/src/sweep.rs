//! Sensitivity sweep: how the profit margin moves when cost varies while
//! the discounted price stays fixed.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::report::format_money;
use crate::types::ResultRecord;

/// Number of points in a sweep (cost from 50% to 150% in 5% steps)
pub const SWEEP_STEPS: usize = 21;

/// One point on the margin curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub cost: Decimal,
    pub profit: Decimal,
    pub margin_pct: Decimal,
}

/// Parameters of a sweep. Cheap to copy; every call to [`Sweep::points`]
/// starts a fresh pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    cost: Decimal,
    discounted_price: Decimal,
}

impl Sweep {
    /// Build a sweep from a resolved record. Records without a positive cost
    /// and discounted price have nothing to plot, and neither do records
    /// whose swept range does not fit in a `Decimal`.
    pub fn from_record(record: &ResultRecord) -> Option<Self> {
        let cost = record.cost.filter(|c| *c > Decimal::ZERO)?;
        if record.discounted_price <= Decimal::ZERO {
            return None;
        }
        let sweep = Self {
            cost,
            discounted_price: record.discounted_price,
        };

        // Margin is monotonic in cost, so the two ends bound every point
        let in_range = [0, SWEEP_STEPS - 1]
            .into_iter()
            .all(|step| sweep.point_for_step(step).is_some());
        if !in_range {
            debug!(%cost, discounted_price = %record.discounted_price, "sweep range overflows");
            return None;
        }

        debug!(%cost, discounted_price = %record.discounted_price, "building sensitivity sweep");
        Some(sweep)
    }

    pub fn base_cost(&self) -> Decimal {
        self.cost
    }

    pub fn discounted_price(&self) -> Decimal {
        self.discounted_price
    }

    pub fn points(&self) -> SweepIter {
        SweepIter {
            sweep: *self,
            step: 0,
        }
    }

    /// Margin at an arbitrary cost against the fixed discounted price.
    /// `None` when the figures overflow.
    pub fn point_at(&self, cost: Decimal) -> Option<SweepPoint> {
        if cost <= Decimal::ZERO {
            return Some(SweepPoint {
                cost,
                profit: Decimal::ZERO,
                margin_pct: Decimal::ZERO,
            });
        }
        let profit = self.discounted_price.checked_sub(cost)?;
        let margin_pct = profit
            .checked_div(cost)?
            .checked_mul(Decimal::ONE_HUNDRED)?;
        Some(SweepPoint {
            cost,
            profit,
            margin_pct,
        })
    }

    fn point_for_step(&self, step: usize) -> Option<SweepPoint> {
        // 0.50, 0.55, ..., 1.50
        let factor = Decimal::new(50 + 5 * step as i64, 2);
        self.point_at(self.cost.checked_mul(factor)?)
    }
}

impl IntoIterator for Sweep {
    type Item = SweepPoint;
    type IntoIter = SweepIter;

    fn into_iter(self) -> SweepIter {
        self.points()
    }
}

/// Lazy iterator over the sweep points
#[derive(Debug, Clone)]
pub struct SweepIter {
    sweep: Sweep,
    step: usize,
}

impl Iterator for SweepIter {
    type Item = SweepPoint;

    fn next(&mut self) -> Option<SweepPoint> {
        if self.step >= SWEEP_STEPS {
            return None;
        }
        let point = self.sweep.point_for_step(self.step);
        // Both ends were checked at construction
        self.step = if point.is_some() {
            self.step + 1
        } else {
            SWEEP_STEPS
        };
        point
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = SWEEP_STEPS.saturating_sub(self.step);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SweepIter {}

/// Marker for the resolved record on the chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurrentPoint {
    pub cost: Decimal,
    /// The record's profit percentage (zero when the record is a loss)
    pub margin_pct: Decimal,
}

/// Everything a chart renderer needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub caption: String,
    pub discounted_price: Decimal,
    pub points: Vec<SweepPoint>,
    pub current: CurrentPoint,
}

impl ChartData {
    pub fn from_record(record: &ResultRecord) -> Option<Self> {
        let sweep = Sweep::from_record(record)?;
        let price = format_money(Some(sweep.discounted_price));
        Some(Self {
            title: format!("How Profit Margin Changes with Cost (Fixed Discounted Price: {price})"),
            caption: format!(
                "This chart shows how profit margin varies with cost when the discounted price \
                 is fixed at {price}. Lower costs lead to higher profit margins!"
            ),
            discounted_price: sweep.discounted_price,
            points: sweep.points().collect(),
            current: CurrentPoint {
                cost: sweep.cost,
                margin_pct: record.profit_pct().unwrap_or_default(),
            },
        })
    }

    /// Smallest and largest margin on the curve, including the current point
    pub fn margin_bounds(&self) -> (Decimal, Decimal) {
        self.points
            .iter()
            .map(|p| p.margin_pct)
            .chain(std::iter::once(self.current.margin_pct))
            .fold((Decimal::MAX, Decimal::MIN), |(lo, hi), m| (lo.min(m), hi.max(m)))
    }
}
