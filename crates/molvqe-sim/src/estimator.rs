//! Expectation-value estimation for parameterized circuits.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::trace;

use molvqe_ir::{Circuit, SparsePauliOp};

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Estimated expectation value with its standard error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Estimated `⟨H⟩`.
    pub mean: f64,
    /// Standard error of `mean`. Zero for exact evaluation.
    pub std: f64,
}

/// Evaluates `⟨ψ(θ)|H|ψ(θ)⟩` for a parameterized circuit.
pub trait Estimator {
    /// Bind `params` into `circuit` and estimate the expectation of `observable`.
    fn estimate(
        &mut self,
        circuit: &Circuit,
        params: &[f64],
        observable: &SparsePauliOp,
    ) -> SimResult<Estimate>;
}

/// Estimator backed by the dense statevector simulator.
///
/// With `shots: None` the expectation is exact. With a shot count each Pauli
/// term's ±1 outcomes are sampled from the exact distribution.
#[derive(Debug, Clone)]
pub struct StatevectorEstimator {
    shots: Option<usize>,
    seed: u64,
    rng: StdRng,
}

impl StatevectorEstimator {
    /// Exact estimator.
    pub fn exact() -> Self {
        Self::new(None, 0)
    }

    /// Estimator with an optional shot count and RNG seed.
    pub fn new(shots: Option<usize>, seed: u64) -> Self {
        Self {
            shots,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Configured shot count.
    pub fn shots(&self) -> Option<usize> {
        self.shots
    }

    /// Seed the sampler was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn sample(&mut self, state: &Statevector, observable: &SparsePauliOp, shots: usize) -> Estimate {
        let mut mean = 0.0;
        let mut variance = 0.0;
        for (pauli, coeff) in observable.terms() {
            let c = coeff.re;
            if pauli.is_identity() {
                mean += c;
                continue;
            }
            let exact = state.pauli_expectation(&pauli);
            let p_plus = ((1.0 + exact) / 2.0).clamp(0.0, 1.0);
            let plus = (0..shots).filter(|_| self.rng.gen_bool(p_plus)).count();
            let sample_mean = (2.0 * plus as f64 - shots as f64) / shots as f64;
            mean += c * sample_mean;
            variance += c * c * (1.0 - sample_mean * sample_mean) / shots as f64;
        }
        Estimate {
            mean,
            std: variance.max(0.0).sqrt(),
        }
    }
}

impl Default for StatevectorEstimator {
    fn default() -> Self {
        Self::exact()
    }
}

impl Estimator for StatevectorEstimator {
    fn estimate(
        &mut self,
        circuit: &Circuit,
        params: &[f64],
        observable: &SparsePauliOp,
    ) -> SimResult<Estimate> {
        if circuit.num_qubits() != observable.num_qubits() {
            return Err(SimError::QubitCountMismatch {
                circuit: circuit.num_qubits(),
                observable: observable.num_qubits(),
            });
        }
        if !observable.is_hermitian(1e-10) {
            return Err(SimError::NonHermitian);
        }

        let bound = circuit.assign_parameters(params)?;
        let state = Statevector::run(&bound)?;

        let estimate = match self.shots {
            None => Estimate {
                mean: state.expectation(observable)?,
                std: 0.0,
            },
            Some(0) => return Err(SimError::InvalidShots),
            Some(shots) => self.sample(&state, observable, shots),
        };
        trace!(mean = estimate.mean, std = estimate.std, "estimated expectation");
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use molvqe_ir::{Parameter, QubitId};

    fn ry_circuit() -> Circuit {
        let mut circuit = Circuit::with_size("ry", 1);
        circuit.ry(&Parameter::new("theta"), QubitId(0)).unwrap();
        circuit
    }

    #[test]
    fn test_exact_estimate_has_zero_std() {
        let op = SparsePauliOp::from_labels([("Z", 2.0), ("I", -0.5)]).unwrap();
        let mut est = StatevectorEstimator::exact();
        let e = est.estimate(&ry_circuit(), &[0.3], &op).unwrap();
        assert!((e.mean - (2.0 * 0.3_f64.cos() - 0.5)).abs() < 1e-12);
        assert_eq!(e.std, 0.0);
    }

    #[test]
    fn test_shot_estimate_is_seeded_and_close() {
        let op = SparsePauliOp::from_labels([("Z", 1.0), ("X", 1.0)]).unwrap();
        let theta = 1.1_f64;
        let exact = theta.cos() + theta.sin();

        let mut a = StatevectorEstimator::new(Some(20_000), 7);
        let mut b = StatevectorEstimator::new(Some(20_000), 7);
        let ea = a.estimate(&ry_circuit(), &[theta], &op).unwrap();
        let eb = b.estimate(&ry_circuit(), &[theta], &op).unwrap();

        assert_eq!(ea, eb);
        assert!(ea.std > 0.0);
        assert!((ea.mean - exact).abs() < 6.0 * ea.std);
    }

    #[test]
    fn test_wrong_parameter_count() {
        let op = SparsePauliOp::from_labels([("Z", 1.0)]).unwrap();
        let mut est = StatevectorEstimator::exact();
        assert!(matches!(
            est.estimate(&ry_circuit(), &[0.1, 0.2], &op),
            Err(SimError::Ir(_))
        ));
    }

    #[test]
    fn test_zero_shots_rejected() {
        let op = SparsePauliOp::from_labels([("Z", 1.0)]).unwrap();
        let mut est = StatevectorEstimator::new(Some(0), 1);
        assert!(matches!(
            est.estimate(&ry_circuit(), &[0.1], &op),
            Err(SimError::InvalidShots)
        ));
    }
}
