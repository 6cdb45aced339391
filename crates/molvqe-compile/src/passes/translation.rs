//! Basis translation pass.

use std::f64::consts::PI;

use molvqe_ir::{Circuit, Instruction, ParameterExpression, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{BasisGates, PropertySet};

/// Rewrites stop after this many nested expansions of a single gate.
const MAX_EXPANSION_DEPTH: usize = 8;

/// Basis translation pass.
///
/// Rewrites every gate that is not in the target basis. Every gate is first
/// lowered to `u` plus `cx`; if the basis has no `u` but has `rz` and `sx`,
/// each `u` is then expanded into `rz`/`sx`. Symbolic angles survive
/// translation as parameter expressions. Decompositions are exact up to a
/// global phase.
pub struct BasisTranslation;

impl Pass for BasisTranslation {
    fn name(&self) -> &'static str {
        "BasisTranslation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()> {
        let basis = properties
            .basis_gates
            .as_ref()
            .ok_or(CompileError::MissingBasisGates)?;

        let mut translated = Circuit::with_size(circuit.name(), circuit.num_qubits());
        for inst in circuit.instructions() {
            for lowered in translate_instruction(inst, basis, 0)? {
                translated.apply(lowered)?;
            }
        }

        *circuit = translated;
        Ok(())
    }

    fn should_run(&self, _circuit: &Circuit, properties: &PropertySet) -> bool {
        properties.basis_gates.is_some()
    }
}

fn translate_instruction(
    inst: &Instruction,
    basis: &BasisGates,
    depth: usize,
) -> CompileResult<Vec<Instruction>> {
    let Some(gate) = inst.as_gate() else {
        return Ok(vec![inst.clone()]);
    };
    if basis.contains(gate.name()) {
        return Ok(vec![inst.clone()]);
    }
    let not_in_basis = || CompileError::GateNotInBasis {
        gate: gate.name().to_string(),
        basis: basis.to_string(),
    };
    if depth >= MAX_EXPANSION_DEPTH {
        return Err(not_in_basis());
    }

    let expansion = if gate.name() == "u" {
        expand_u(gate, inst.qubits[0], basis).ok_or_else(not_in_basis)?
    } else {
        lower_to_u_cx(gate, &inst.qubits)
    };

    let mut out = Vec::with_capacity(expansion.len());
    for step in &expansion {
        out.extend(translate_instruction(step, basis, depth + 1)?);
    }
    Ok(out)
}

fn u(theta: ParameterExpression, phi: f64, lambda: f64, q: QubitId) -> Instruction {
    Instruction::single_qubit_gate(StandardGate::U(theta, phi.into(), lambda.into()), q)
}

fn cx(control: QubitId, target: QubitId) -> Instruction {
    Instruction::two_qubit_gate(StandardGate::CX, control, target)
}

/// Lower any standard gate into `u` and `cx`.
#[allow(clippy::similar_names)]
fn lower_to_u_cx(gate: &StandardGate, qubits: &[QubitId]) -> Vec<Instruction> {
    let q0 = qubits[0];
    let h = |q| u((PI / 2.0).into(), 0.0, PI, q);
    let phase = |lambda: ParameterExpression, q| {
        Instruction::single_qubit_gate(StandardGate::U(0.0.into(), 0.0.into(), lambda), q)
    };

    match gate {
        StandardGate::I => vec![],
        StandardGate::X => vec![u(PI.into(), 0.0, PI, q0)],
        StandardGate::Y => vec![u(PI.into(), PI / 2.0, PI / 2.0, q0)],
        StandardGate::Z => vec![phase(PI.into(), q0)],
        StandardGate::H => vec![h(q0)],
        StandardGate::S => vec![phase((PI / 2.0).into(), q0)],
        StandardGate::Sdg => vec![phase((-PI / 2.0).into(), q0)],
        StandardGate::T => vec![phase((PI / 4.0).into(), q0)],
        StandardGate::Tdg => vec![phase((-PI / 4.0).into(), q0)],
        StandardGate::SX => vec![u((PI / 2.0).into(), -PI / 2.0, PI / 2.0, q0)],
        StandardGate::SXdg => vec![u((-PI / 2.0).into(), -PI / 2.0, PI / 2.0, q0)],
        StandardGate::Rx(theta) => vec![u(theta.clone(), -PI / 2.0, PI / 2.0, q0)],
        StandardGate::Ry(theta) => vec![u(theta.clone(), 0.0, 0.0, q0)],
        // Rz(θ) and P(θ) differ only by a global phase.
        StandardGate::Rz(lambda) | StandardGate::P(lambda) => vec![phase(lambda.clone(), q0)],
        StandardGate::U(..) | StandardGate::CX => {
            vec![Instruction::gate(gate.clone(), qubits.iter().copied())]
        }

        StandardGate::CZ => {
            let q1 = qubits[1];
            vec![h(q1), cx(q0, q1), h(q1)]
        }
        StandardGate::CY => {
            let q1 = qubits[1];
            vec![
                phase((-PI / 2.0).into(), q1),
                cx(q0, q1),
                phase((PI / 2.0).into(), q1),
            ]
        }
        StandardGate::Swap => {
            let q1 = qubits[1];
            vec![cx(q0, q1), cx(q1, q0), cx(q0, q1)]
        }
        StandardGate::RZZ(theta) => {
            let q1 = qubits[1];
            vec![cx(q0, q1), phase(theta.clone(), q1), cx(q0, q1)]
        }
        StandardGate::RXX(theta) => {
            let q1 = qubits[1];
            let mut seq = vec![h(q0), h(q1)];
            seq.extend(lower_to_u_cx(&StandardGate::RZZ(theta.clone()), qubits));
            seq.extend([h(q0), h(q1)]);
            seq
        }
        StandardGate::RYY(theta) => {
            let q1 = qubits[1];
            let rx = |angle: f64, q| u(angle.into(), -PI / 2.0, PI / 2.0, q);
            let mut seq = vec![rx(PI / 2.0, q0), rx(PI / 2.0, q1)];
            seq.extend(lower_to_u_cx(&StandardGate::RZZ(theta.clone()), qubits));
            seq.extend([rx(-PI / 2.0, q0), rx(-PI / 2.0, q1)]);
            seq
        }
    }
}

/// Expand `U(θ, φ, λ)` as `RZ(λ) · SX · RZ(θ+π) · SX · RZ(φ+π)` in program order.
fn expand_u(gate: &StandardGate, q: QubitId, basis: &BasisGates) -> Option<Vec<Instruction>> {
    let StandardGate::U(theta, phi, lambda) = gate else {
        return None;
    };
    if !(basis.contains("rz") && basis.contains("sx")) {
        return None;
    }
    let rz = |angle: ParameterExpression| {
        Instruction::single_qubit_gate(StandardGate::Rz(angle.simplify()), q)
    };
    let sx = || Instruction::single_qubit_gate(StandardGate::SX, q);
    Some(vec![
        rz(lambda.clone()),
        sx(),
        rz(theta.clone() + ParameterExpression::pi()),
        sx(),
        rz(phi.clone() + ParameterExpression::pi()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use molvqe_ir::Parameter;

    fn translate(circuit: &Circuit, basis: BasisGates) -> Circuit {
        let mut out = circuit.clone();
        let mut props = PropertySet::new().with_basis_gates(basis);
        BasisTranslation.run(&mut out, &mut props).unwrap();
        out
    }

    #[test]
    fn test_u_cx_translation_cz() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit.cz(QubitId(0), QubitId(1)).unwrap();

        let out = translate(&circuit, BasisGates::u_cx());
        // CZ = H · CX · H on the target
        assert_eq!(out.num_ops(), 3);
        assert_eq!(out.num_nonlocal_gates(), 1);
        assert_eq!(out.count_ops().get("u"), Some(&2));
    }

    #[test]
    fn test_swap_costs_three_cx() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit.swap(QubitId(0), QubitId(1)).unwrap();

        let out = translate(&circuit, BasisGates::u_cx());
        assert_eq!(out.num_nonlocal_gates(), 3);
    }

    #[test]
    fn test_symbolic_parameters_survive() {
        let theta = Parameter::new("theta");
        let mut circuit = Circuit::with_size("test", 1);
        circuit.ry(&theta, QubitId(0)).unwrap();
        circuit.rz(&theta, QubitId(0)).unwrap();

        let out = translate(&circuit, BasisGates::u_cx());
        assert_eq!(out.parameters(), &[theta.clone()]);

        let ibm = translate(&circuit, BasisGates::rz_sx_cx());
        assert_eq!(ibm.parameters(), &[theta]);
        assert!(ibm.count_ops().keys().all(|k| k == "rz" || k == "sx"));
    }

    #[test]
    fn test_barrier_passes_through() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.barrier_all().unwrap();
        circuit.h(QubitId(1)).unwrap();

        let out = translate(&circuit, BasisGates::u_cx());
        assert!(out.instructions()[1].is_barrier());
    }

    #[test]
    fn test_unreachable_basis_errors() {
        let mut circuit = Circuit::with_size("test", 1);
        circuit.h(QubitId(0)).unwrap();

        let mut props = PropertySet::new().with_basis_gates(BasisGates::new(["prx", "cz"]));
        let err = BasisTranslation.run(&mut circuit, &mut props).unwrap_err();
        assert!(matches!(err, CompileError::GateNotInBasis { .. }));
    }

    #[test]
    fn test_missing_basis_errors() {
        let mut circuit = Circuit::with_size("test", 1);
        let mut props = PropertySet::new();
        assert!(!BasisTranslation.should_run(&circuit, &props));
        assert!(matches!(
            BasisTranslation.run(&mut circuit, &mut props),
            Err(CompileError::MissingBasisGates)
        ));
    }
}
