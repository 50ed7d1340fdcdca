//! Figures and records for costing calculations

pub mod field;
mod record;

pub use field::{Field, FieldDef, FieldKind, FIELDS};
pub use record::{InputRecord, Margin, Presence, ResultRecord};
