//! STO-3G contracted Cartesian Gaussians.

use std::f64::consts::PI;

use crate::integrals::primitive_overlap;
use crate::molecule::{Element, Molecule};

const H_1S: ([f64; 3], [f64; 3]) = (
    [3.425_250_91, 0.623_913_73, 0.168_855_40],
    [0.154_328_97, 0.535_328_14, 0.444_634_54],
);
const HE_1S: [f64; 3] = [6.362_421_39, 1.158_923_00, 0.313_649_79];
const LI_1S: [f64; 3] = [16.119_575_0, 2.936_200_7, 0.794_650_5];
const LI_2SP: [f64; 3] = [0.636_289_7, 0.147_860_1, 0.048_088_7];
const BE_1S: [f64; 3] = [30.167_871_0, 5.495_115_3, 1.487_192_7];
const BE_2SP: [f64; 3] = [1.314_833_1, 0.305_538_9, 0.099_370_7];
const COEF_2S: [f64; 3] = [-0.099_967_23, 0.399_512_83, 0.700_115_47];
const COEF_2P: [f64; 3] = [0.155_916_27, 0.607_683_72, 0.391_957_39];

/// Angular momentum of a shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellKind {
    S,
    P,
}

/// Shell table for one element: (kind, exponents, contraction coefficients).
fn shells(element: Element) -> Vec<(ShellKind, [f64; 3], [f64; 3])> {
    let core_coefs = H_1S.1;
    match element {
        Element::H => vec![(ShellKind::S, H_1S.0, H_1S.1)],
        Element::He => vec![(ShellKind::S, HE_1S, core_coefs)],
        Element::Li => vec![
            (ShellKind::S, LI_1S, core_coefs),
            (ShellKind::S, LI_2SP, COEF_2S),
            (ShellKind::P, LI_2SP, COEF_2P),
        ],
        Element::Be => vec![
            (ShellKind::S, BE_1S, core_coefs),
            (ShellKind::S, BE_2SP, COEF_2S),
            (ShellKind::P, BE_2SP, COEF_2P),
        ],
    }
}

/// A normalized contracted Cartesian Gaussian `x^l y^m z^n Σ c_k N_k exp(-α_k r²)`.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisFunction {
    /// Center in bohr.
    pub origin: [f64; 3],
    /// Cartesian powers (l, m, n).
    pub powers: [i32; 3],
    /// Primitive exponents.
    pub exponents: Vec<f64>,
    /// Contraction coefficients, scaled so the function has unit norm.
    pub coefficients: Vec<f64>,
    /// Primitive normalization constants.
    pub norms: Vec<f64>,
}

impl BasisFunction {
    /// Build and normalize a contracted function.
    pub fn new(origin: [f64; 3], powers: [i32; 3], exponents: &[f64], coefficients: &[f64]) -> Self {
        let norms = exponents
            .iter()
            .map(|&a| primitive_norm(a, powers))
            .collect();
        let mut bf = Self {
            origin,
            powers,
            exponents: exponents.to_vec(),
            coefficients: coefficients.to_vec(),
            norms,
        };
        let self_overlap = bf.self_overlap();
        for c in &mut bf.coefficients {
            *c /= self_overlap.sqrt();
        }
        bf
    }

    /// Iterate `(exponent, coefficient × primitive norm)`.
    pub fn primitives(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.exponents
            .iter()
            .zip(&self.coefficients)
            .zip(&self.norms)
            .map(|((&a, &c), &n)| (a, c * n))
    }

    fn self_overlap(&self) -> f64 {
        let mut total = 0.0;
        for (a, ca) in self.primitives() {
            for (b, cb) in self.primitives() {
                total += ca
                    * cb
                    * primitive_overlap(a, self.powers, self.origin, b, self.powers, self.origin);
            }
        }
        total
    }
}

fn double_factorial(n: i32) -> f64 {
    let mut result = 1.0;
    let mut k = n;
    while k > 1 {
        result *= f64::from(k);
        k -= 2;
    }
    result
}

fn primitive_norm(alpha: f64, [l, m, n]: [i32; 3]) -> f64 {
    let total = f64::from(l + m + n);
    (2.0 * alpha / PI).powf(0.75) * (4.0 * alpha).powf(total / 2.0)
        / (double_factorial(2 * l - 1) * double_factorial(2 * m - 1) * double_factorial(2 * n - 1))
            .sqrt()
}

/// STO-3G basis for every atom of `molecule`, in atom order (s before p; p as x, y, z).
pub fn sto3g(molecule: &Molecule) -> Vec<BasisFunction> {
    let mut basis = Vec::new();
    for atom in &molecule.atoms {
        let origin = atom.position_bohr();
        for (kind, exps, coefs) in shells(atom.element) {
            match kind {
                ShellKind::S => basis.push(BasisFunction::new(origin, [0, 0, 0], &exps, &coefs)),
                ShellKind::P => {
                    for powers in [[1, 0, 0], [0, 1, 0], [0, 0, 1]] {
                        basis.push(BasisFunction::new(origin, powers, &exps, &coefs));
                    }
                }
            }
        }
    }
    basis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_sizes() {
        assert_eq!(sto3g(&Molecule::h2(0.74)).len(), 2);
        assert_eq!(sto3g(&Molecule::lih(1.6)).len(), 6);
    }

    #[test]
    fn test_functions_are_normalized() {
        for bf in sto3g(&Molecule::lih(1.6)) {
            assert!((bf.self_overlap() - 1.0).abs() < 1e-12);
        }
    }
}
