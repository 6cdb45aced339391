//! COBYLA-style trust-region simplex optimizer.
//!
//! Derivative-free, which suits VQE objectives where gradients cost as much as
//! many evaluations. The search keeps a simplex of `n + 1` points whose steps
//! are bounded by a trust radius `rho`. The simplex counts as stalled when its
//! values collapse or the best value barely moves over `2(n + 1)` iterations.
//! A stalled simplex is rebuilt around the best point: at `rhobeg` again if
//! the round since the last rebuild still improved, otherwise at half the
//! radius. The search converges once `rho` drops below `rhoend`.

use tracing::trace;

use super::{Objective, OptimizationResult, Optimizer};
use crate::error::CoreResult;

/// COBYLA optimizer configuration.
#[derive(Debug, Clone)]
pub struct Cobyla {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Tolerance on the simplex value spread and on per-round progress.
    pub tol: f64,
    /// Initial trust region radius.
    pub rhobeg: f64,
    /// Final trust region radius.
    pub rhoend: f64,
}

impl Default for Cobyla {
    fn default() -> Self {
        Self {
            maxiter: 1000,
            tol: 1e-8,
            rhobeg: 0.5,
            rhoend: 1e-4,
        }
    }
}

impl Cobyla {
    /// Create a new COBYLA optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    #[must_use]
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set convergence tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set trust region parameters.
    #[must_use]
    pub fn with_trust_region(mut self, rhobeg: f64, rhoend: f64) -> Self {
        self.rhobeg = rhobeg;
        self.rhoend = rhoend;
        self
    }
}

/// Simplex vertices with their objective values.
struct Simplex {
    points: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl Simplex {
    /// `base` plus one vertex offset by `rho` along each axis.
    fn around(
        base: Vec<f64>,
        base_value: f64,
        rho: f64,
        objective: &mut Objective<'_>,
        evaluations: &mut usize,
    ) -> CoreResult<Self> {
        let n = base.len();
        let mut points = Vec::with_capacity(n + 1);
        let mut values = Vec::with_capacity(n + 1);
        for i in 0..n {
            let mut point = base.clone();
            point[i] += rho;
            values.push(objective(&point)?);
            *evaluations += 1;
            points.push(point);
        }
        points.insert(0, base);
        values.insert(0, base_value);
        Ok(Self { points, values })
    }

    /// Vertex indices sorted by value, best first.
    fn order(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.values.len()).collect();
        indices.sort_by(|&a, &b| self.values[a].total_cmp(&self.values[b]));
        indices
    }

    fn best(&self) -> usize {
        self.order()[0]
    }
}

impl Optimizer for Cobyla {
    fn name(&self) -> &'static str {
        "cobyla"
    }

    fn minimize(
        &self,
        objective: &mut Objective<'_>,
        initial_params: Vec<f64>,
    ) -> CoreResult<OptimizationResult> {
        let n = initial_params.len();
        let mut f_x = objective(&initial_params)?;
        let mut history = vec![f_x];
        let mut num_evaluations = 1;

        if n == 0 {
            return Ok(OptimizationResult {
                optimal_params: initial_params,
                optimal_value: f_x,
                num_evaluations,
                num_iterations: 0,
                history,
                converged: true,
            });
        }

        let mut simplex = Simplex::around(initial_params, f_x, self.rhobeg, objective, &mut num_evaluations)?;
        let mut rho = self.rhobeg;
        let mut converged = false;
        let mut iterations = 0;
        // Best value when the simplex was last rebuilt.
        let mut round_start = f_x;
        // Stagnation check: best value at the start of the current window.
        let window = 2 * (n + 1);
        let mut checkpoint = (0, f_x);

        while iterations < self.maxiter {
            iterations += 1;
            let indices = simplex.order();
            let best_idx = indices[0];
            let worst_idx = indices[n];
            let second_worst_idx = indices[n - 1];
            let best_value = simplex.values[best_idx];

            let spread = simplex.values[worst_idx] - best_value;
            let window_done = iterations - checkpoint.0 >= window;
            let stalled = spread < self.tol || (window_done && checkpoint.1 - best_value < self.tol);

            // A round that still made progress earns a fresh simplex at full
            // radius; otherwise the trust region halves until it passes rhoend.
            if stalled {
                if round_start - best_value > self.tol {
                    rho = self.rhobeg;
                    trace!(iteration = iterations, best = best_value, "simplex restarted");
                } else {
                    rho *= 0.5;
                    if rho < self.rhoend {
                        converged = true;
                        break;
                    }
                    trace!(iteration = iterations, rho, "trust region reduced");
                }
                round_start = best_value;
                checkpoint = (iterations, best_value);
                let best = simplex.points[best_idx].clone();
                simplex = Simplex::around(best, best_value, rho, objective, &mut num_evaluations)?;
                continue;
            }
            if window_done {
                checkpoint = (iterations, best_value);
            }

            let mut centroid = vec![0.0; n];
            for &idx in &indices[..n] {
                for (c, x) in centroid.iter_mut().zip(&simplex.points[idx]) {
                    *c += x;
                }
            }
            for c in &mut centroid {
                *c /= n as f64;
            }

            let worst = simplex.points[worst_idx].clone();
            let mut reflected: Vec<f64> = centroid.iter().zip(&worst).map(|(c, w)| 2.0 * c - w).collect();
            // Keep the step inside the trust region.
            for (r, c) in reflected.iter_mut().zip(&centroid) {
                let diff = *r - c;
                if diff.abs() > rho {
                    *r = c + rho * diff.signum();
                }
            }
            let f_reflected = objective(&reflected)?;
            num_evaluations += 1;

            if f_reflected < simplex.values[best_idx] {
                let expanded: Vec<f64> = centroid
                    .iter()
                    .zip(&reflected)
                    .map(|(c, r)| c + 2.0 * (r - c))
                    .collect();
                let f_expanded = objective(&expanded)?;
                num_evaluations += 1;
                if f_expanded < f_reflected {
                    simplex.points[worst_idx] = expanded;
                    simplex.values[worst_idx] = f_expanded;
                } else {
                    simplex.points[worst_idx] = reflected;
                    simplex.values[worst_idx] = f_reflected;
                }
            } else if f_reflected < simplex.values[second_worst_idx] {
                simplex.points[worst_idx] = reflected;
                simplex.values[worst_idx] = f_reflected;
            } else {
                let contracted: Vec<f64> = centroid.iter().zip(&worst).map(|(c, w)| 0.5 * (c + w)).collect();
                let f_contracted = objective(&contracted)?;
                num_evaluations += 1;
                if f_contracted < simplex.values[worst_idx] {
                    simplex.points[worst_idx] = contracted;
                    simplex.values[worst_idx] = f_contracted;
                } else {
                    let best = simplex.points[best_idx].clone();
                    for i in (0..=n).filter(|&i| i != best_idx) {
                        for (x, b) in simplex.points[i].iter_mut().zip(&best) {
                            *x = 0.5 * (b + *x);
                        }
                        simplex.values[i] = objective(&simplex.points[i])?;
                        num_evaluations += 1;
                    }
                }
            }

            let current = simplex.values[simplex.best()];
            if current < f_x {
                f_x = current;
                history.push(f_x);
            }
        }

        let best = simplex.best();
        Ok(OptimizationResult {
            optimal_params: simplex.points.swap_remove(best),
            optimal_value: simplex.values[best],
            num_evaluations,
            num_iterations: iterations,
            history,
            converged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cobyla_simple() {
        let cobyla = Cobyla::new().with_maxiter(200);

        // Minimize (x-1)^2 + (y-2)^2
        let result = cobyla
            .minimize(
                &mut |params: &[f64]| Ok((params[0] - 1.0).powi(2) + (params[1] - 2.0).powi(2)),
                vec![0.0, 0.0],
            )
            .unwrap();

        assert!(result.optimal_value < 0.01);
        assert!((result.optimal_params[0] - 1.0).abs() < 0.1);
        assert!((result.optimal_params[1] - 2.0).abs() < 0.1);
    }

    #[test]
    fn test_cobyla_rosenbrock() {
        let cobyla = Cobyla::new().with_maxiter(500);

        // Rosenbrock function (minimum at (1, 1))
        let result = cobyla
            .minimize(
                &mut |p: &[f64]| Ok((1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0].powi(2)).powi(2)),
                vec![0.0, 0.0],
            )
            .unwrap();

        assert!(result.optimal_value < 1.0);
    }

    #[test]
    fn test_cobyla_quadratic_converges_within_budget() {
        let mut evaluations = 0;
        let result = Cobyla::new()
            .with_maxiter(200)
            .minimize(
                &mut |p: &[f64]| {
                    evaluations += 1;
                    Ok((p[0] - 1.0).powi(2) + (p[1] - 2.0).powi(2))
                },
                vec![0.0, 0.0],
            )
            .unwrap();
        assert!(result.converged);
        assert_eq!(result.num_evaluations, evaluations);
    }

    #[test]
    fn test_cobyla_leaves_flat_start() {
        // Zero gradient and zero curvature at the origin; the minimum sits on a ring.
        let result = Cobyla::new()
            .minimize(
                &mut |p: &[f64]| {
                    let r2: f64 = p.iter().map(|x| x * x).sum();
                    Ok(r2 * r2 * (r2 - 2.0))
                },
                vec![0.0; 3],
            )
            .unwrap();
        // r² = 4/3 gives the minimum −32/27.
        assert!(result.optimal_value < -32.0 / 27.0 + 1e-3, "{}", result.optimal_value);
    }

    #[test]
    fn test_cobyla_no_parameters() {
        let result = Cobyla::new()
            .minimize(&mut |_: &[f64]| Ok(-0.5), Vec::new())
            .unwrap();
        assert_eq!(result.optimal_value, -0.5);
        assert_eq!(result.num_evaluations, 1);
        assert!(result.converged);
    }

    #[test]
    fn test_cobyla_converges_on_quadratic() {
        let result = Cobyla::new()
            .minimize(
                &mut |p: &[f64]| Ok(p.iter().map(|x| (x - 0.3).powi(2)).sum()),
                vec![0.0; 4],
            )
            .unwrap();
        assert!(result.converged);
        assert!(result.optimal_value < 1e-6);
    }
}
