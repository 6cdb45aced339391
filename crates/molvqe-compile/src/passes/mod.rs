//! Built-in compilation passes.

mod gate_count;
mod translation;

pub use gate_count::{GateCount, OpCounts};
pub use translation::BasisTranslation;
