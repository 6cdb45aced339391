//! Gate-count analysis.

use std::collections::BTreeMap;

use molvqe_ir::Circuit;
use serde::{Deserialize, Serialize};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Gate statistics of a circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpCounts {
    /// Count per gate name. Barriers are not counted.
    pub by_name: BTreeMap<String, usize>,
    /// Total number of gates.
    pub total: usize,
    /// Number of gates acting on two qubits.
    pub two_qubit: usize,
    /// Circuit depth in gate layers.
    pub depth: usize,
}

impl OpCounts {
    /// Measure a circuit.
    pub fn of(circuit: &Circuit) -> Self {
        let mut by_name = circuit.count_ops();
        by_name.remove("barrier");
        Self {
            total: by_name.values().sum(),
            by_name,
            two_qubit: circuit.num_nonlocal_gates(),
            depth: circuit.depth(),
        }
    }
}

/// Analysis pass storing [`OpCounts`] in the property set.
pub struct GateCount;

impl Pass for GateCount {
    fn name(&self) -> &'static str {
        "GateCount"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        properties.insert(OpCounts::of(circuit));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use molvqe_ir::QubitId;

    #[test]
    fn test_gate_count_skips_barriers() {
        let mut circuit = Circuit::with_size("test", 3);
        circuit.h(QubitId(0)).unwrap();
        circuit.barrier_all().unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.cx(QubitId(1), QubitId(2)).unwrap();

        let mut props = PropertySet::new();
        GateCount.run(&mut circuit, &mut props).unwrap();
        let counts = props.get::<OpCounts>().unwrap();

        assert_eq!(counts.total, 3);
        assert_eq!(counts.two_qubit, 2);
        assert_eq!(counts.by_name.get("cx"), Some(&2));
        assert!(!counts.by_name.contains_key("barrier"));
        assert_eq!(counts.depth, 3);
    }
}
