//! Quantum gate types.

use serde::{Deserialize, Serialize};

use crate::parameter::{Parameter, ParameterExpression};

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(ParameterExpression),
    /// Rotation around Y axis.
    Ry(ParameterExpression),
    /// Rotation around Z axis.
    Rz(ParameterExpression),
    /// Phase gate.
    P(ParameterExpression),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
    ),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
    /// XX rotation gate.
    RXX(ParameterExpression),
    /// YY rotation gate.
    RYY(ParameterExpression),
    /// ZZ rotation gate.
    RZZ(ParameterExpression),
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
            StandardGate::RXX(_) => "rxx",
            StandardGate::RYY(_) => "ryy",
            StandardGate::RZZ(_) => "rzz",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::Swap
            | StandardGate::RXX(_)
            | StandardGate::RYY(_)
            | StandardGate::RZZ(_) => 2,
            _ => 1,
        }
    }

    /// Check if any parameter of this gate is still free.
    pub fn is_parameterized(&self) -> bool {
        self.parameters().iter().any(|p| p.is_symbolic())
    }

    /// Get parameters of this gate.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::RXX(p)
            | StandardGate::RYY(p)
            | StandardGate::RZZ(p) => vec![p],

            StandardGate::U(a, b, c) => vec![a, b, c],

            _ => vec![],
        }
    }

    /// Free parameters referenced by this gate, in order of first appearance.
    pub fn free_parameters(&self) -> Vec<Parameter> {
        let mut out = Vec::new();
        for expr in self.parameters() {
            expr.collect_parameters(&mut out);
        }
        out
    }

    /// Rebuild the gate with every parameter expression passed through `f`.
    #[must_use]
    pub fn map_parameters(&self, f: impl Fn(&ParameterExpression) -> ParameterExpression) -> Self {
        match self {
            StandardGate::Rx(p) => StandardGate::Rx(f(p)),
            StandardGate::Ry(p) => StandardGate::Ry(f(p)),
            StandardGate::Rz(p) => StandardGate::Rz(f(p)),
            StandardGate::P(p) => StandardGate::P(f(p)),
            StandardGate::RXX(p) => StandardGate::RXX(f(p)),
            StandardGate::RYY(p) => StandardGate::RYY(f(p)),
            StandardGate::RZZ(p) => StandardGate::RZZ(f(p)),
            StandardGate::U(a, b, c) => StandardGate::U(f(a), f(b), f(c)),
            other => other.clone(),
        }
    }

    /// Same gate kind with parameters compared by structure rather than identity.
    pub fn same_structure(&self, other: &StandardGate) -> bool {
        self.name() == other.name()
            && self
                .parameters()
                .iter()
                .zip(other.parameters())
                .all(|(a, b)| a.same_structure(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::RZZ(0.1.into()).num_qubits(), 2);

        assert!(!StandardGate::H.is_parameterized());
        assert!(!StandardGate::Rx(ParameterExpression::constant(PI)).is_parameterized());
        assert!(StandardGate::Rx(ParameterExpression::symbol("theta")).is_parameterized());
    }

    #[test]
    fn test_map_parameters_binds() {
        let theta = Parameter::new("theta");
        let gate = StandardGate::U(
            ParameterExpression::from(&theta),
            ParameterExpression::pi(),
            -ParameterExpression::from(&theta),
        );
        assert_eq!(gate.free_parameters(), vec![theta.clone()]);

        let bound = gate.map_parameters(|p| p.bind(&theta, 0.25));
        assert!(!bound.is_parameterized());
        let values: Vec<f64> = bound.parameters().iter().filter_map(|p| p.as_f64()).collect();
        assert_eq!(values, vec![0.25, PI, -0.25]);
    }

    #[test]
    fn test_same_structure() {
        let a = StandardGate::Ry(ParameterExpression::symbol("entangler_y_1"));
        let b = StandardGate::Ry(ParameterExpression::symbol("entangler_y_1"));
        let c = StandardGate::Rz(ParameterExpression::symbol("entangler_y_1"));
        assert_ne!(a, b);
        assert!(a.same_structure(&b));
        assert!(!a.same_structure(&c));
    }
}
