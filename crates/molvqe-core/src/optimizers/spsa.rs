//! Simultaneous Perturbation Stochastic Approximation.
//!
//! Estimates the gradient from two evaluations along a random ±1 direction
//! per iteration, which makes it tolerant of shot noise.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Objective, OptimizationResult, Optimizer};
use crate::error::CoreResult;

/// SPSA optimizer configuration.
#[derive(Debug, Clone)]
pub struct Spsa {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Initial step size for gradient estimation.
    pub a: f64,
    /// Perturbation size.
    pub c: f64,
    /// Learning rate decay parameter.
    pub alpha: f64,
    /// Perturbation decay parameter.
    pub gamma: f64,
    /// Seed for the perturbation directions.
    pub seed: u64,
}

impl Default for Spsa {
    fn default() -> Self {
        Self {
            maxiter: 100,
            a: 0.1,
            c: 0.1,
            alpha: 0.602,
            gamma: 0.101,
            seed: 42,
        }
    }
}

impl Spsa {
    /// Create a new SPSA optimizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    #[must_use]
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set the perturbation seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Optimizer for Spsa {
    fn name(&self) -> &'static str {
        "spsa"
    }

    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial_params: Vec<f64>,
    ) -> CoreResult<OptimizationResult> {
        let n = initial_params.len();
        let mut x = initial_params;
        let mut f_x = objective(&x)?;
        let mut history = vec![f_x];
        let mut num_evaluations = 1;
        let mut best = (x.clone(), f_x);
        let mut rng = StdRng::seed_from_u64(self.seed);

        if n == 0 {
            return Ok(OptimizationResult {
                optimal_params: x,
                optimal_value: f_x,
                num_evaluations,
                num_iterations: 0,
                history,
                converged: true,
            });
        }

        for k in 0..self.maxiter {
            let a_k = self.a / ((k + 1) as f64).powf(self.alpha);
            let c_k = self.c / ((k + 1) as f64).powf(self.gamma);

            let delta: Vec<f64> = (0..n)
                .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
                .collect();
            let x_plus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi + c_k * di).collect();
            let x_minus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi - c_k * di).collect();

            let f_plus = objective(&x_plus)?;
            let f_minus = objective(&x_minus)?;
            num_evaluations += 2;

            let slope = (f_plus - f_minus) / (2.0 * c_k);
            for (xi, di) in x.iter_mut().zip(&delta) {
                *xi -= a_k * slope / di;
            }

            f_x = objective(&x)?;
            num_evaluations += 1;
            history.push(f_x);
            if f_x < best.1 {
                best = (x.clone(), f_x);
            }
        }

        Ok(OptimizationResult {
            optimal_params: best.0,
            optimal_value: best.1,
            num_evaluations,
            num_iterations: self.maxiter,
            history,
            converged: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spsa_simple() {
        let spsa = Spsa::new().with_maxiter(100);

        // Minimize x^2 + y^2
        let result = spsa
            .minimize(&mut |p: &[f64]| Ok(p[0].powi(2) + p[1].powi(2)), vec![1.0, 1.0])
            .unwrap();

        assert!(result.optimal_value < 0.5);
        assert_eq!(result.num_evaluations, 1 + 3 * 100);
    }

    #[test]
    fn test_spsa_is_reproducible() {
        let run = |seed| {
            Spsa::new()
                .with_maxiter(20)
                .with_seed(seed)
                .minimize(&mut |p: &[f64]| Ok((p[0] - 0.5).powi(2) + p[1].abs()), vec![0.0, 0.3])
                .unwrap()
        };
        assert_eq!(run(7), run(7));
    }
}
