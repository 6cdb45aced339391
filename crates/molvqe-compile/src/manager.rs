//! Pass manager for orchestrating compilation.

use tracing::{debug, instrument, trace};

use molvqe_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{BasisTranslation, GateCount};
use crate::property::{BasisGates, PropertySet};

/// Ordered list of passes applied to one circuit.
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run every pass in order, skipping those whose `should_run` declines.
    #[instrument(skip(self, circuit, properties), fields(circuit = circuit.name()))]
    pub fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        debug!(passes = self.passes.len(), qubits = circuit.num_qubits(), "pass manager started");

        for pass in &self.passes {
            if !pass.should_run(circuit, properties) {
                trace!(pass = pass.name(), "skipped");
                continue;
            }
            pass.run(circuit, properties)?;
            trace!(pass = pass.name(), ops = circuit.num_ops(), "pass finished");
        }

        debug!(depth = circuit.depth(), ops = circuit.num_ops(), "pass manager finished");
        Ok(())
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the standard translate-then-count pipeline.
pub struct PassManagerBuilder {
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with no target.
    pub fn new() -> Self {
        Self {
            properties: PropertySet::new(),
        }
    }

    /// Set the target basis.
    #[must_use]
    pub fn with_basis_gates(mut self, basis_gates: BasisGates) -> Self {
        self.properties.basis_gates = Some(basis_gates);
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();

        if self.properties.basis_gates.is_some() {
            pm.add_pass(BasisTranslation);
        }
        pm.add_pass(GateCount);

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::OpCounts;
    use molvqe_ir::QubitId;

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_pass_manager_builder() {
        let (pm, props) = PassManagerBuilder::new()
            .with_basis_gates(BasisGates::u_cx())
            .build();
        assert_eq!(pm.len(), 2);
        assert!(props.basis_gates.is_some());

        let (pm, _) = PassManagerBuilder::new().build();
        assert_eq!(pm.len(), 1);
    }

    #[test]
    fn test_pass_manager_run() {
        let (pm, mut props) = PassManagerBuilder::new()
            .with_basis_gates(BasisGates::u_cx())
            .build();

        let mut circuit = Circuit::with_size("test", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        pm.run(&mut circuit, &mut props).unwrap();

        let counts = props.get::<OpCounts>().unwrap();
        assert_eq!(counts.two_qubit, 1);
        assert_eq!(counts.total, 4);
    }
}
