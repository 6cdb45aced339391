//! Statevector simulation engine.

use num_complex::Complex64;
use std::f64::consts::PI;

use molvqe_ir::{Circuit, Instruction, InstructionKind, PauliString, SparsePauliOp, StandardGate};

use crate::error::{SimError, SimResult};

/// Largest register the dense simulator accepts.
pub const MAX_SIM_QUBITS: u32 = 24;

/// A pure state over `n` qubits, little-endian (qubit 0 is the least significant bit).
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Wrap raw amplitudes. The length must be a power of two.
    pub(crate) fn from_amplitudes(amplitudes: Vec<Complex64>) -> Self {
        let num_qubits = amplitudes.len().trailing_zeros() as usize;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Simulate a fully bound circuit starting from |0...0⟩.
    pub fn run(circuit: &Circuit) -> SimResult<Self> {
        if circuit.num_qubits() > MAX_SIM_QUBITS {
            return Err(SimError::TooManyQubits {
                requested: circuit.num_qubits(),
                max: MAX_SIM_QUBITS,
            });
        }
        let mut sv = Self::new(circuit.num_qubits() as usize);
        for inst in circuit.instructions() {
            sv.apply(inst)?;
        }
        Ok(sv)
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// State amplitudes indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Measurement probabilities in the computational basis.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// `⟨self|other⟩`.
    pub fn inner(&self, other: &Statevector) -> Complex64 {
        self.amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum()
    }

    /// Check equality up to a global phase.
    pub fn equiv(&self, other: &Statevector, tol: f64) -> bool {
        self.num_qubits == other.num_qubits && (self.inner(other).norm() - 1.0).abs() < tol
    }

    /// Basis state of highest probability, as a bitstring with qubit 0 rightmost.
    pub fn most_likely_bitstring(&self) -> String {
        let index = self
            .amplitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.norm_sqr().total_cmp(&b.1.norm_sqr()))
            .map_or(0, |(i, _)| i);
        format!("{:0width$b}", index, width = self.num_qubits)
    }

    /// `⟨ψ|P|ψ⟩` for a single Pauli string. Always real.
    pub fn pauli_expectation(&self, pauli: &PauliString) -> f64 {
        self.amplitudes
            .iter()
            .enumerate()
            .map(|(basis, amp)| {
                let (phase, target) = pauli.apply_to_basis(basis);
                (self.amplitudes[target].conj() * phase * amp).re
            })
            .sum()
    }

    /// `⟨ψ|H|ψ⟩` for a Hermitian observable.
    pub fn expectation(&self, observable: &SparsePauliOp) -> SimResult<f64> {
        if observable.num_qubits() as usize != self.num_qubits {
            return Err(SimError::QubitCountMismatch {
                circuit: self.num_qubits as u32,
                observable: observable.num_qubits(),
            });
        }
        Ok(observable
            .terms()
            .iter()
            .map(|(p, c)| c.re * self.pauli_expectation(p))
            .sum())
    }

    /// Apply an instruction to the statevector.
    pub fn apply(&mut self, instruction: &Instruction) -> SimResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let qubits: Vec<_> = instruction.qubits.iter().map(|q| q.index()).collect();
                self.apply_standard_gate(gate, &qubits)
            }
            InstructionKind::Barrier => Ok(()),
        }
    }

    /// Apply a standard gate.
    fn apply_standard_gate(&mut self, gate: &StandardGate, qubits: &[usize]) -> SimResult<()> {
        let angle = |expr: &molvqe_ir::ParameterExpression| {
            expr.as_f64().ok_or_else(|| SimError::UnboundParameter {
                gate: gate.name().to_string(),
            })
        };

        match gate {
            // Single-qubit gates
            StandardGate::I => {}
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Y => self.apply_y(qubits[0]),
            StandardGate::Z => self.apply_z(qubits[0]),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::S => self.apply_phase(qubits[0], PI / 2.0),
            StandardGate::Sdg => self.apply_phase(qubits[0], -PI / 2.0),
            StandardGate::T => self.apply_phase(qubits[0], PI / 4.0),
            StandardGate::Tdg => self.apply_phase(qubits[0], -PI / 4.0),
            StandardGate::SX => self.apply_rx(qubits[0], PI / 2.0),
            StandardGate::SXdg => self.apply_rx(qubits[0], -PI / 2.0),
            StandardGate::Rx(theta) => self.apply_rx(qubits[0], angle(theta)?),
            StandardGate::Ry(theta) => self.apply_ry(qubits[0], angle(theta)?),
            StandardGate::Rz(theta) => self.apply_rz(qubits[0], angle(theta)?),
            StandardGate::P(theta) => self.apply_phase(qubits[0], angle(theta)?),
            StandardGate::U(theta, phi, lambda) => {
                self.apply_u(qubits[0], angle(theta)?, angle(phi)?, angle(lambda)?);
            }

            // Two-qubit gates
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
            StandardGate::CY => self.apply_cy(qubits[0], qubits[1]),
            StandardGate::CZ => self.apply_cz(qubits[0], qubits[1]),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
            StandardGate::RZZ(theta) => self.apply_rzz(qubits[0], qubits[1], angle(theta)?),
            StandardGate::RXX(theta) => {
                let t = angle(theta)?;
                self.apply_h(qubits[0]);
                self.apply_h(qubits[1]);
                self.apply_rzz(qubits[0], qubits[1], t);
                self.apply_h(qubits[0]);
                self.apply_h(qubits[1]);
            }
            StandardGate::RYY(theta) => {
                let t = angle(theta)?;
                self.apply_rx(qubits[0], PI / 2.0);
                self.apply_rx(qubits[1], PI / 2.0);
                self.apply_rzz(qubits[0], qubits[1], t);
                self.apply_rx(qubits[0], -PI / 2.0);
                self.apply_rx(qubits[1], -PI / 2.0);
            }
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        self.apply_phase(qubit, PI);
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                self.amplitudes[i] *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let neg_i_s = Complex64::new(0.0, -s);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                self.amplitudes[i] *= phase_0;
            } else {
                self.amplitudes[i] *= phase_1;
            }
        }
    }

    fn apply_u(&mut self, qubit: usize, theta: f64, phi: f64, lambda: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let e_il = Complex64::from_polar(1.0, lambda);
        let e_ip = Complex64::from_polar(1.0, phi);
        let e_ipl = Complex64::from_polar(1.0, phi + lambda);

        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - e_il * s * b;
                self.amplitudes[j] = e_ip * s * a + e_ipl * c * b;
            }
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cy(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let both = (1 << control) | (1 << target);
        for i in 0..(1 << self.num_qubits) {
            if i & both == both {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..(1 << self.num_qubits) {
            let b1 = (i & mask1) != 0;
            let b2 = (i & mask2) != 0;
            if b1 && !b2 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// `exp(-iθ/2 Z⊗Z)`.
    fn apply_rzz(&mut self, q1: usize, q2: usize, theta: f64) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        let even = Complex64::from_polar(1.0, -theta / 2.0);
        let odd = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..(1 << self.num_qubits) {
            let parity = ((i & mask1) != 0) ^ ((i & mask2) != 0);
            self.amplitudes[i] *= if parity { odd } else { even };
        }
    }
}
