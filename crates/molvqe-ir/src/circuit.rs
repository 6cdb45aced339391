//! High-level circuit builder API.

use std::collections::BTreeMap;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::{Parameter, ParameterBinding, ParameterExpression};
use crate::qubit::QubitId;

/// A quantum circuit: an ordered instruction sequence over a fixed qubit register.
///
/// The circuit tracks its free parameters in order of first use, so the
/// parameter count is always available without walking the instructions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits in the register.
    num_qubits: u32,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
    /// Free parameters, in order of first appearance.
    parameters: Vec<Parameter>,
}

impl Circuit {
    /// Create a circuit with a given number of qubits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: vec![],
            parameters: vec![],
        }
    }

    /// Append an instruction after validating its operands.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let gate_name = || Some(instruction.name().to_string());
        for (i, &q) in instruction.qubits.iter().enumerate() {
            if q.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit: q,
                    gate_name: gate_name(),
                });
            }
            if instruction.qubits[..i].contains(&q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    gate_name: gate_name(),
                });
            }
        }

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let got = instruction.qubits.len() as u32;
            if got != gate.num_qubits() {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: gate.num_qubits(),
                    got,
                });
            }
            for p in gate.free_parameters() {
                if !self.parameters.contains(&p) {
                    self.parameters.push(p);
                }
            }
        }

        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::S, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Sdg, qubit))
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::SX, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(
            StandardGate::Rx(theta.into()),
            qubit,
        ))
    }

    /// Apply Ry rotation gate.
    pub fn ry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(
            StandardGate::Ry(theta.into()),
            qubit,
        ))
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(
            StandardGate::Rz(theta.into()),
            qubit,
        ))
    }

    /// Apply universal U gate.
    pub fn u(
        &mut self,
        theta: impl Into<ParameterExpression>,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(
            StandardGate::U(theta.into(), phi.into(), lambda.into()),
            qubit,
        ))
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CZ, control, target))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))
    }

    /// Apply RZZ (ZZ rotation) gate.
    pub fn rzz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        q1: QubitId,
        q2: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(
            StandardGate::RZZ(theta.into()),
            q1,
            q2,
        ))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply an arbitrary standard gate.
    pub fn gate(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(gate, qubits))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = (0..self.num_qubits).map(QubitId).collect();
        self.barrier(qubits)
    }

    /// Append every instruction of `other`, acting on the same qubit indices.
    ///
    /// `other` may be narrower than `self`; it may not be wider.
    pub fn compose(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        if other.num_qubits > self.num_qubits {
            return Err(IrError::CircuitWidthMismatch {
                this: self.num_qubits,
                other: other.num_qubits,
            });
        }
        for inst in &other.instructions {
            self.apply(inst.clone())?;
        }
        Ok(self)
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Free parameters in order of first appearance.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Number of free parameters.
    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Check whether any gate still references a free parameter.
    pub fn is_parameterized(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Bind parameters present in `binding`; the rest stay free.
    pub fn bind_parameters(&self, binding: &ParameterBinding) -> Circuit {
        let instructions: Vec<Instruction> = self
            .instructions
            .iter()
            .map(|inst| match &inst.kind {
                InstructionKind::Gate(g) => Instruction {
                    kind: InstructionKind::Gate(
                        g.map_parameters(|p| p.bind_all(binding).simplify()),
                    ),
                    qubits: inst.qubits.clone(),
                },
                InstructionKind::Barrier => inst.clone(),
            })
            .collect();
        let parameters = self
            .parameters
            .iter()
            .filter(|p| !binding.contains_key(*p))
            .cloned()
            .collect();
        Circuit {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            instructions,
            parameters,
        }
    }

    /// Bind all free parameters positionally, in the order of [`Circuit::parameters`].
    pub fn assign_parameters(&self, values: &[f64]) -> IrResult<Circuit> {
        if values.len() != self.parameters.len() {
            return Err(IrError::ParameterCountMismatch {
                expected: self.parameters.len(),
                got: values.len(),
            });
        }
        let binding: ParameterBinding = self
            .parameters
            .iter()
            .cloned()
            .zip(values.iter().copied())
            .collect();
        Ok(self.bind_parameters(&binding))
    }

    // =========================================================================
    // Accessors and metrics
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the circuit name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of gate operations, barriers excluded.
    pub fn num_ops(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Gate count per name, barriers included under `"barrier"`.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of gates acting on two qubits.
    pub fn num_nonlocal_gates(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.is_two_qubit_gate())
            .count()
    }

    /// Circuit depth in gate layers. Barriers align wires but add no layer.
    pub fn depth(&self) -> usize {
        let mut front = vec![0usize; self.num_qubits as usize];
        for inst in &self.instructions {
            let level = inst
                .qubits
                .iter()
                .map(|q| front[q.index()])
                .max()
                .unwrap_or(0);
            let next = if inst.is_gate() { level + 1 } else { level };
            for q in &inst.qubits {
                front[q.index()] = next;
            }
        }
        front.into_iter().max().unwrap_or(0)
    }

    /// Qubit interaction graph: one node per qubit, one edge per interacting
    /// pair, weighted by the number of two-qubit gates on that pair.
    pub fn interaction_graph(&self) -> UnGraph<QubitId, usize> {
        let mut graph = UnGraph::with_capacity(self.num_qubits as usize, 0);
        let nodes: Vec<NodeIndex> = (0..self.num_qubits)
            .map(|q| graph.add_node(QubitId(q)))
            .collect();
        for inst in self.instructions.iter().filter(|i| i.is_two_qubit_gate()) {
            let (a, b) = (nodes[inst.qubits[0].index()], nodes[inst.qubits[1].index()]);
            match graph.find_edge(a, b) {
                Some(e) => graph[e] += 1,
                None => {
                    graph.add_edge(a, b, 1);
                }
            }
        }
        graph
    }

    /// Same width and instruction sequence, with parameters compared by name.
    pub fn same_structure(&self, other: &Circuit) -> bool {
        self.num_qubits == other.num_qubits
            && self.instructions.len() == other.instructions.len()
            && self
                .instructions
                .iter()
                .zip(&other.instructions)
                .all(|(a, b)| a.same_structure(b))
    }
}
