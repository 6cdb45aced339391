//! Gate decomposition for molvqe circuits.
//!
//! Circuits built from different ansatz structures are only comparable once
//! they are expressed in the same gate set. This crate rewrites circuits into
//! a target basis with a small pass pipeline and measures the result.
//!
//! # Example: Counting two-qubit gates
//!
//! ```rust
//! use molvqe_compile::{transpile, BasisGates, OpCounts};
//! use molvqe_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("swap", 2);
//! circuit.swap(QubitId(0), QubitId(1)).unwrap();
//!
//! let lowered = transpile(&circuit, BasisGates::u_cx()).unwrap();
//! assert_eq!(OpCounts::of(&lowered).two_qubit, 3);
//! ```
//!
//! # Custom Passes
//!
//! ```rust
//! use molvqe_compile::{CompileResult, Pass, PassKind, PropertySet};
//! use molvqe_ir::Circuit;
//!
//! struct Rename;
//!
//! impl Pass for Rename {
//!     fn name(&self) -> &str { "rename" }
//!     fn kind(&self) -> PassKind { PassKind::Transformation }
//!
//!     fn run(&self, circuit: &mut Circuit, _props: &mut PropertySet) -> CompileResult<()> {
//!         circuit.set_name("renamed");
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod passes;
pub mod property;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use passes::{BasisTranslation, GateCount, OpCounts};
pub use property::{BasisGates, PropertySet};

use molvqe_ir::Circuit;

/// Translate a copy of `circuit` into `basis`.
pub fn transpile(circuit: &Circuit, basis: BasisGates) -> CompileResult<Circuit> {
    let (pm, mut props) = PassManagerBuilder::new().with_basis_gates(basis).build();
    let mut out = circuit.clone();
    pm.run(&mut out, &mut props)?;
    Ok(out)
}
