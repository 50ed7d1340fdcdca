//! costing-core: Scenario resolution engine for the costing calculator
//!
//! Given any combination of cost, selling price, discounted price, discount,
//! profit and loss figures, this crate works out the rest. It has no UI
//! dependencies and is shared by the CLI and the TUI.
//!
//! # Example
//!
//! ```
//! use costing_core::{resolve, Field, InputRecord, Scenario};
//! use rust_decimal::Decimal;
//!
//! let input = InputRecord::new()
//!     .with(Field::Cost, 100)
//!     .with(Field::DiscountedPrice, 150);
//!
//! let resolution = resolve(input).unwrap();
//! assert_eq!(resolution.scenario, Scenario::CostDiscountedPrice);
//! assert_eq!(resolution.record.profit(), Some(Decimal::from(50)));
//! ```

pub mod error;
pub mod report;
pub mod resolve;
pub mod sweep;
pub mod types;

pub use error::{ResolveError, MINIMAL_COMBINATIONS};
pub use resolve::{resolve, resolve_with, Resolution, Scenario, SCENARIOS};
pub use sweep::{ChartData, CurrentPoint, Sweep, SweepPoint, SWEEP_STEPS};
pub use types::{Field, FieldKind, InputRecord, Margin, Presence, ResultRecord, FIELDS};

use rust_decimal::Decimal;
use tracing::debug;

/// Form state retained between calculations.
///
/// The session owns what the user has typed and the last successful result;
/// each calculation hands a copy of the inputs to the stateless resolver.
#[derive(Debug, Clone, Default)]
pub struct Session {
    input: InputRecord,
    presence: Presence,
    last: Option<Resolution>,
}

impl Session {
    /// Create a new session
    pub fn new(presence: Presence) -> Self {
        Self {
            presence,
            ..Self::default()
        }
    }

    pub fn input(&self) -> &InputRecord {
        &self.input
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// Set or clear a single figure
    pub fn set(&mut self, field: Field, value: Option<Decimal>) {
        self.input.set(field, value);
    }

    /// Replace all figures at once
    pub fn set_input(&mut self, input: InputRecord) {
        self.input = input;
    }

    /// Clear inputs and the last result
    pub fn clear(&mut self) {
        self.input = InputRecord::default();
        self.last = None;
    }

    /// Resolve the current inputs.
    ///
    /// A failure clears the previous result so stale figures are never shown.
    pub fn calculate(&mut self) -> Result<&Resolution, ResolveError> {
        match resolve_with(self.input, self.presence) {
            Ok(resolution) => Ok(&*self.last.insert(resolution)),
            Err(e) => {
                debug!(kind = e.kind(), "calculation failed");
                self.last = None;
                Err(e)
            }
        }
    }

    /// Last successful resolution
    pub fn last(&self) -> Option<&Resolution> {
        self.last.as_ref()
    }

    /// Chart payload for the last resolution, if it has one
    pub fn chart(&self) -> Option<ChartData> {
        self.last
            .as_ref()
            .and_then(|r| ChartData::from_record(&r.record))
    }
}
