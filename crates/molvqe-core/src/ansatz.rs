//! Layered rotation ansatz with a linear CNOT ladder.
//!
//! The circuit has three sections separated by barriers:
//!
//! ```text
//! layer0:    one full rotation layer per opening axis, in the given order
//! ladder:    for i in 0..n-1: CX(i, i+1); Ry(i+1); Rz(i+1)
//! layer1:    one full rotation layer per closing axis, in the given order
//! ```
//!
//! Every rotation gets a fresh [`Parameter`], so two builds with the same
//! arguments are structurally identical but never share parameter identities.
//! An axis may appear at most once per layer; parameter names are unique
//! within one build.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use molvqe_ir::{Circuit, IrResult, Parameter, QubitId};

use crate::error::{CoreError, CoreResult};

/// Axis of a single-qubit rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationAxis {
    /// `Rx`
    #[default]
    X,
    /// `Ry`
    Y,
    /// `Rz`
    Z,
}

type Emitter = fn(&mut Circuit, &Parameter, QubitId) -> IrResult<()>;

fn emit_rx(circuit: &mut Circuit, theta: &Parameter, qubit: QubitId) -> IrResult<()> {
    circuit.rx(theta, qubit).map(|_| ())
}

fn emit_ry(circuit: &mut Circuit, theta: &Parameter, qubit: QubitId) -> IrResult<()> {
    circuit.ry(theta, qubit).map(|_| ())
}

fn emit_rz(circuit: &mut Circuit, theta: &Parameter, qubit: QubitId) -> IrResult<()> {
    circuit.rz(theta, qubit).map(|_| ())
}

/// Indexed by `RotationAxis as usize`.
const EMITTERS: [Emitter; 3] = [emit_rx, emit_ry, emit_rz];

impl RotationAxis {
    /// All axes.
    pub const ALL: [RotationAxis; 3] = [RotationAxis::X, RotationAxis::Y, RotationAxis::Z];

    /// Lower-case letter used in parameter names.
    pub fn letter(self) -> char {
        match self {
            RotationAxis::X => 'x',
            RotationAxis::Y => 'y',
            RotationAxis::Z => 'z',
        }
    }

    /// Append a rotation about this axis.
    pub fn emit(self, circuit: &mut Circuit, theta: &Parameter, qubit: QubitId) -> IrResult<()> {
        EMITTERS[self as usize](circuit, theta, qubit)
    }
}

impl fmt::Display for RotationAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for RotationAxis {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(RotationAxis::X),
            "y" | "Y" => Ok(RotationAxis::Y),
            "z" | "Z" => Ok(RotationAxis::Z),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown rotation axis '{other}' (expected x, y or z)"
            ))),
        }
    }
}

/// Parse a compact axis list such as `"zyx"` or `"z,y,x"`.
pub fn parse_axes(s: &str) -> CoreResult<Vec<RotationAxis>> {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| c.to_string().parse())
        .collect()
}

/// Builds the layered ansatz.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsatzBuilder;

impl AnsatzBuilder {
    /// Build the ansatz on `qubit_count` qubits.
    ///
    /// Either axis list may be empty; the ladder is always present.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidArgument`] if `qubit_count` is zero or an axis
    /// repeats within the opening or the closing list.
    pub fn build(
        qubit_count: usize,
        opening_axes: &[RotationAxis],
        closing_axes: &[RotationAxis],
    ) -> CoreResult<Circuit> {
        if qubit_count < 1 {
            return Err(CoreError::InvalidArgument(
                "ansatz needs at least one qubit".into(),
            ));
        }
        let n = u32::try_from(qubit_count)
            .map_err(|_| CoreError::InvalidArgument(format!("{qubit_count} qubits is too many")))?;
        Self::validate_axes(opening_axes, closing_axes)?;

        let mut circuit = Circuit::with_size(Self::label(opening_axes, closing_axes), n);
        Self::rotation_layer(&mut circuit, "layer0", opening_axes)?;
        circuit.barrier_all()?;

        for i in 0..n - 1 {
            let target = QubitId(i + 1);
            circuit.cx(QubitId(i), target)?;
            for axis in [RotationAxis::Y, RotationAxis::Z] {
                let theta = Parameter::new(format!("entangler_{axis}_{}", i + 1));
                axis.emit(&mut circuit, &theta, target)?;
            }
        }

        circuit.barrier_all()?;
        Self::rotation_layer(&mut circuit, "layer1", closing_axes)?;

        debug!(
            qubits = qubit_count,
            parameters = circuit.num_parameters(),
            "ansatz built"
        );
        Ok(circuit)
    }

    /// Reject an axis listed twice in the same layer.
    pub fn validate_axes(opening_axes: &[RotationAxis], closing_axes: &[RotationAxis]) -> CoreResult<()> {
        for (tag, axes) in [("layer0", opening_axes), ("layer1", closing_axes)] {
            for (i, axis) in axes.iter().enumerate() {
                if axes[..i].contains(axis) {
                    return Err(CoreError::InvalidArgument(format!(
                        "axis '{axis}' repeats in {tag}; parameter names would collide"
                    )));
                }
            }
        }
        Ok(())
    }

    fn rotation_layer(circuit: &mut Circuit, tag: &str, axes: &[RotationAxis]) -> CoreResult<()> {
        for &axis in axes {
            for q in 0..circuit.num_qubits() {
                let theta = Parameter::new(format!("{tag}_{axis}_{q}"));
                axis.emit(circuit, &theta, QubitId(q))?;
            }
        }
        Ok(())
    }

    /// `n·|opening| + 2(n−1) + n·|closing|`.
    pub fn parameter_count(qubit_count: usize, opening_axes: &[RotationAxis], closing_axes: &[RotationAxis]) -> usize {
        qubit_count * opening_axes.len()
            + 2 * qubit_count.saturating_sub(1)
            + qubit_count * closing_axes.len()
    }

    /// Angles at which the ansatz maps the basis state `reference` onto itself.
    ///
    /// At zero angles the ladder acts as a CNOT chain and permutes basis
    /// states. The first `x` or `y` opening layer undoes that with a π rotation
    /// on every qubit whose lower neighbour is set; without one, the first `x`
    /// or `y` closing layer flips back every qubit whose lower bits have odd
    /// parity. With neither, the point is all zeros.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidArgument`] if `reference` is empty.
    pub fn reference_point(
        opening_axes: &[RotationAxis],
        closing_axes: &[RotationAxis],
        reference: &[bool],
    ) -> CoreResult<Vec<f64>> {
        let n = reference.len();
        if n == 0 {
            return Err(CoreError::InvalidArgument(
                "reference state needs at least one qubit".into(),
            ));
        }
        let mut point = vec![0.0; Self::parameter_count(n, opening_axes, closing_axes)];
        let flips_basis = |axis: &RotationAxis| *axis != RotationAxis::Z;

        if let Some(layer) = opening_axes.iter().position(flips_basis) {
            for q in 1..n {
                if reference[q - 1] {
                    point[layer * n + q] = PI;
                }
            }
        } else if let Some(layer) = closing_axes.iter().position(flips_basis) {
            let offset = n * opening_axes.len() + 2 * (n - 1) + layer * n;
            let mut parity = false;
            for q in 0..n {
                if parity {
                    point[offset + q] = PI;
                }
                parity ^= reference[q];
            }
        } else {
            debug!("no x or y layer; reference point is all zeros");
        }
        Ok(point)
    }

    /// Short identity such as `zyx-ladder-x`, used in run records.
    pub fn label(opening_axes: &[RotationAxis], closing_axes: &[RotationAxis]) -> String {
        let letters = |axes: &[RotationAxis]| axes.iter().map(|a| a.letter()).collect::<String>();
        format!("{}-ladder-{}", letters(opening_axes), letters(closing_axes))
            .trim_matches('-')
            .to_string()
    }
}
