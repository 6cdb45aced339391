//! Gaussian integrals via the McMurchie–Davidson scheme.
//!
//! Products of Cartesian Gaussians are expanded in Hermite Gaussians
//! ([`hermite_coefficient`]); Coulomb-type integrals then reduce to Hermite
//! integrals over the Boys function ([`hermite_integral`]). All quantities are
//! in atomic units.

use nalgebra::DMatrix;
use std::f64::consts::PI;

use crate::basis::BasisFunction;
use crate::molecule::Molecule;

/// Boys function `F_n(T) = ∫₀¹ t^{2n} e^{-T t²} dt`.
pub fn boys(n: i32, t: f64) -> f64 {
    if t > 50.0 {
        // e^{-T} contributions are below machine precision here.
        let mut df = 1.0;
        let mut k = 2 * n - 1;
        while k > 1 {
            df *= f64::from(k);
            k -= 2;
        }
        return df / 2f64.powi(n + 1) * (PI / t.powi(2 * n + 1)).sqrt();
    }
    let mut sum = 0.0;
    let mut term = 1.0 / f64::from(2 * n + 1);
    let mut k = 0;
    loop {
        sum += term;
        k += 1;
        term *= 2.0 * t / f64::from(2 * n + 2 * k + 1);
        if term < 1e-17 * sum {
            break;
        }
    }
    (-t).exp() * sum
}

/// Hermite expansion coefficient `E_t^{ij}` for one Cartesian direction.
///
/// `qx` is the separation `A_x − B_x` of the two centers.
pub fn hermite_coefficient(i: i32, j: i32, t: i32, qx: f64, a: f64, b: f64) -> f64 {
    let p = a + b;
    let q = a * b / p;
    if t < 0 || t > i + j {
        0.0
    } else if i == 0 && j == 0 && t == 0 {
        (-q * qx * qx).exp()
    } else if j == 0 {
        (1.0 / (2.0 * p)) * hermite_coefficient(i - 1, j, t - 1, qx, a, b)
            - (q * qx / a) * hermite_coefficient(i - 1, j, t, qx, a, b)
            + f64::from(t + 1) * hermite_coefficient(i - 1, j, t + 1, qx, a, b)
    } else {
        (1.0 / (2.0 * p)) * hermite_coefficient(i, j - 1, t - 1, qx, a, b)
            + (q * qx / b) * hermite_coefficient(i, j - 1, t, qx, a, b)
            + f64::from(t + 1) * hermite_coefficient(i, j - 1, t + 1, qx, a, b)
    }
}

/// Hermite Coulomb integral `R_{tuv}^n(p, R_PC)`.
pub fn hermite_integral(t: i32, u: i32, v: i32, n: i32, p: f64, pc: [f64; 3]) -> f64 {
    let r2 = pc[0] * pc[0] + pc[1] * pc[1] + pc[2] * pc[2];
    if t == 0 && u == 0 && v == 0 {
        return (-2.0 * p).powi(n) * boys(n, p * r2);
    }
    let mut value = 0.0;
    if t == 0 && u == 0 {
        if v > 1 {
            value += f64::from(v - 1) * hermite_integral(t, u, v - 2, n + 1, p, pc);
        }
        value += pc[2] * hermite_integral(t, u, v - 1, n + 1, p, pc);
    } else if t == 0 {
        if u > 1 {
            value += f64::from(u - 1) * hermite_integral(t, u - 2, v, n + 1, p, pc);
        }
        value += pc[1] * hermite_integral(t, u - 1, v, n + 1, p, pc);
    } else {
        if t > 1 {
            value += f64::from(t - 1) * hermite_integral(t - 2, u, v, n + 1, p, pc);
        }
        value += pc[0] * hermite_integral(t - 1, u, v, n + 1, p, pc);
    }
    value
}

fn gaussian_product_center(a: f64, ca: [f64; 3], b: f64, cb: [f64; 3]) -> [f64; 3] {
    let p = a + b;
    [0, 1, 2].map(|k| (a * ca[k] + b * cb[k]) / p)
}

/// Overlap of two unnormalized primitives.
pub fn primitive_overlap(a: f64, la: [i32; 3], ca: [f64; 3], b: f64, lb: [i32; 3], cb: [f64; 3]) -> f64 {
    let mut s = (PI / (a + b)).powf(1.5);
    for k in 0..3 {
        s *= hermite_coefficient(la[k], lb[k], 0, ca[k] - cb[k], a, b);
    }
    s
}

fn primitive_kinetic(a: f64, la: [i32; 3], ca: [f64; 3], b: f64, lb: [i32; 3], cb: [f64; 3]) -> f64 {
    let [l, m, n] = lb;
    let shifted = |dl: i32, dm: i32, dn: i32| primitive_overlap(a, la, ca, b, [l + dl, m + dm, n + dn], cb);
    let term0 = b * f64::from(2 * (l + m + n) + 3) * shifted(0, 0, 0);
    let term1 = -2.0 * b * b * (shifted(2, 0, 0) + shifted(0, 2, 0) + shifted(0, 0, 2));
    let term2 = -0.5
        * (f64::from(l * (l - 1)) * shifted(-2, 0, 0)
            + f64::from(m * (m - 1)) * shifted(0, -2, 0)
            + f64::from(n * (n - 1)) * shifted(0, 0, -2));
    term0 + term1 + term2
}

fn primitive_nuclear(
    a: f64,
    la: [i32; 3],
    ca: [f64; 3],
    b: f64,
    lb: [i32; 3],
    cb: [f64; 3],
    nucleus: [f64; 3],
) -> f64 {
    let p = a + b;
    let center = gaussian_product_center(a, ca, b, cb);
    let pc = [0, 1, 2].map(|k| center[k] - nucleus[k]);
    let mut value = 0.0;
    for t in 0..=la[0] + lb[0] {
        let ex = hermite_coefficient(la[0], lb[0], t, ca[0] - cb[0], a, b);
        for u in 0..=la[1] + lb[1] {
            let ey = hermite_coefficient(la[1], lb[1], u, ca[1] - cb[1], a, b);
            for v in 0..=la[2] + lb[2] {
                let ez = hermite_coefficient(la[2], lb[2], v, ca[2] - cb[2], a, b);
                value += ex * ey * ez * hermite_integral(t, u, v, 0, p, pc);
            }
        }
    }
    2.0 * PI / p * value
}

/// One primitive of a contracted function: exponent, powers, center.
#[derive(Clone, Copy)]
struct Primitive {
    exponent: f64,
    powers: [i32; 3],
    center: [f64; 3],
}

/// Non-zero Hermite coefficients of a primitive pair as `(t, u, v, E)`.
fn pair_expansion(x: Primitive, y: Primitive) -> Vec<(i32, i32, i32, f64)> {
    let mut out = Vec::new();
    for t in 0..=x.powers[0] + y.powers[0] {
        let ex = hermite_coefficient(x.powers[0], y.powers[0], t, x.center[0] - y.center[0], x.exponent, y.exponent);
        for u in 0..=x.powers[1] + y.powers[1] {
            let ey = hermite_coefficient(x.powers[1], y.powers[1], u, x.center[1] - y.center[1], x.exponent, y.exponent);
            for v in 0..=x.powers[2] + y.powers[2] {
                let ez = hermite_coefficient(x.powers[2], y.powers[2], v, x.center[2] - y.center[2], x.exponent, y.exponent);
                let e = ex * ey * ez;
                if e != 0.0 {
                    out.push((t, u, v, e));
                }
            }
        }
    }
    out
}

fn primitive_repulsion(a: Primitive, b: Primitive, c: Primitive, d: Primitive) -> f64 {
    let p = a.exponent + b.exponent;
    let q = c.exponent + d.exponent;
    let alpha = p * q / (p + q);
    let centre_p = gaussian_product_center(a.exponent, a.center, b.exponent, b.center);
    let centre_q = gaussian_product_center(c.exponent, c.center, d.exponent, d.center);
    let pq = [0, 1, 2].map(|k| centre_p[k] - centre_q[k]);

    let bra = pair_expansion(a, b);
    let ket = pair_expansion(c, d);
    let mut value = 0.0;
    for &(t, u, v, e1) in &bra {
        for &(tau, nu, phi, e2) in &ket {
            let sign = if (tau + nu + phi) % 2 == 0 { 1.0 } else { -1.0 };
            value += e1 * e2 * sign * hermite_integral(t + tau, u + nu, v + phi, 0, alpha, pq);
        }
    }
    2.0 * PI.powf(2.5) / (p * q * (p + q).sqrt()) * value
}

fn primitives_of(bf: &BasisFunction) -> Vec<(Primitive, f64)> {
    bf.primitives()
        .map(|(exponent, weight)| {
            (
                Primitive {
                    exponent,
                    powers: bf.powers,
                    center: bf.origin,
                },
                weight,
            )
        })
        .collect()
}

fn contract_pair(
    x: &BasisFunction,
    y: &BasisFunction,
    f: impl Fn(f64, [i32; 3], [f64; 3], f64, [i32; 3], [f64; 3]) -> f64,
) -> f64 {
    let mut total = 0.0;
    for (a, ca) in x.primitives() {
        for (b, cb) in y.primitives() {
            total += ca * cb * f(a, x.powers, x.origin, b, y.powers, y.origin);
        }
    }
    total
}

/// Chemists'-notation electron-repulsion integrals `(pq|rs)` over `n` functions.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoElectronIntegrals {
    n: usize,
    data: Vec<f64>,
}

impl TwoElectronIntegrals {
    /// All-zero tensor.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n * n * n],
        }
    }

    /// Number of functions per index.
    pub fn dim(&self) -> usize {
        self.n
    }

    #[inline]
    fn index(&self, p: usize, q: usize, r: usize, s: usize) -> usize {
        ((p * self.n + q) * self.n + r) * self.n + s
    }

    /// `(pq|rs)`.
    #[inline]
    pub fn get(&self, p: usize, q: usize, r: usize, s: usize) -> f64 {
        self.data[self.index(p, q, r, s)]
    }

    /// Set `(pq|rs)` only.
    #[inline]
    pub fn set(&mut self, p: usize, q: usize, r: usize, s: usize, value: f64) {
        let i = self.index(p, q, r, s);
        self.data[i] = value;
    }

    /// Set `(pq|rs)` and its seven symmetry partners.
    pub fn set_symmetric(&mut self, p: usize, q: usize, r: usize, s: usize, value: f64) {
        for (a, b, c, d) in [
            (p, q, r, s),
            (q, p, r, s),
            (p, q, s, r),
            (q, p, s, r),
            (r, s, p, q),
            (s, r, p, q),
            (r, s, q, p),
            (s, r, q, p),
        ] {
            self.set(a, b, c, d, value);
        }
    }

    /// Restrict to the listed indices, in order.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut out = Self::zeros(indices.len());
        for (i, &p) in indices.iter().enumerate() {
            for (j, &q) in indices.iter().enumerate() {
                for (k, &r) in indices.iter().enumerate() {
                    for (l, &s) in indices.iter().enumerate() {
                        out.set(i, j, k, l, self.get(p, q, r, s));
                    }
                }
            }
        }
        out
    }

    /// Transform every index with the columns of `c`: `(ij|kl) = Σ C_pi C_qj C_rk C_sl (pq|rs)`.
    #[must_use]
    pub fn transform(&self, c: &DMatrix<f64>) -> Self {
        let n = self.n;
        let m = c.ncols();
        // One index at a time, rotating it to the back so the same loop serves all four.
        let mut current = self.data.clone();
        let mut dims = [n, n, n, n];
        for _ in 0..4 {
            let [d0, d1, d2, d3] = dims;
            let mut next = vec![0.0; d1 * d2 * d3 * m];
            for i0 in 0..d0 {
                for i1 in 0..d1 {
                    for i2 in 0..d2 {
                        for i3 in 0..d3 {
                            let v = current[((i0 * d1 + i1) * d2 + i2) * d3 + i3];
                            if v == 0.0 {
                                continue;
                            }
                            let base = ((i1 * d2 + i2) * d3 + i3) * m;
                            for j in 0..m {
                                next[base + j] += c[(i0, j)] * v;
                            }
                        }
                    }
                }
            }
            current = next;
            dims = [d1, d2, d3, m];
        }
        Self { n: m, data: current }
    }
}

/// AO integrals for a molecule in a given basis.
#[derive(Debug, Clone)]
pub struct AtomicIntegrals {
    /// Overlap matrix S.
    pub overlap: DMatrix<f64>,
    /// Kinetic-energy matrix T.
    pub kinetic: DMatrix<f64>,
    /// Nuclear-attraction matrix V.
    pub nuclear: DMatrix<f64>,
    /// Electron-repulsion tensor.
    pub repulsion: TwoElectronIntegrals,
}

impl AtomicIntegrals {
    /// Compute every integral the SCF needs.
    pub fn compute(basis: &[BasisFunction], molecule: &Molecule) -> Self {
        let n = basis.len();
        let mut overlap = DMatrix::zeros(n, n);
        let mut kinetic = DMatrix::zeros(n, n);
        let mut nuclear = DMatrix::zeros(n, n);

        for i in 0..n {
            for j in 0..=i {
                let s = contract_pair(&basis[i], &basis[j], primitive_overlap);
                let t = contract_pair(&basis[i], &basis[j], primitive_kinetic);
                let mut v = 0.0;
                for atom in &molecule.atoms {
                    let z = f64::from(atom.element.atomic_number());
                    let c = atom.position_bohr();
                    v -= z * contract_pair(&basis[i], &basis[j], |a, la, ca, b, lb, cb| {
                        primitive_nuclear(a, la, ca, b, lb, cb, c)
                    });
                }
                for (m, value) in [(&mut overlap, s), (&mut kinetic, t), (&mut nuclear, v)] {
                    m[(i, j)] = value;
                    m[(j, i)] = value;
                }
            }
        }

        let prims: Vec<_> = basis.iter().map(primitives_of).collect();
        let mut repulsion = TwoElectronIntegrals::zeros(n);
        for p in 0..n {
            for q in 0..=p {
                let pq = p * (p + 1) / 2 + q;
                for r in 0..n {
                    for s in 0..=r {
                        let rs = r * (r + 1) / 2 + s;
                        if rs > pq {
                            continue;
                        }
                        let mut value = 0.0;
                        for &(a, wa) in &prims[p] {
                            for &(b, wb) in &prims[q] {
                                for &(c, wc) in &prims[r] {
                                    for &(d, wd) in &prims[s] {
                                        value += wa * wb * wc * wd * primitive_repulsion(a, b, c, d);
                                    }
                                }
                            }
                        }
                        repulsion.set_symmetric(p, q, r, s, value);
                    }
                }
            }
        }

        Self {
            overlap,
            kinetic,
            nuclear,
            repulsion,
        }
    }

    /// Core Hamiltonian `T + V`.
    pub fn core_hamiltonian(&self) -> DMatrix<f64> {
        &self.kinetic + &self.nuclear
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::sto3g;

    #[test]
    fn test_boys_limits() {
        assert!((boys(0, 0.0) - 1.0).abs() < 1e-14);
        assert!((boys(2, 0.0) - 0.2).abs() < 1e-14);
        // F_0(T) = ½ sqrt(π/T) erf(sqrt(T)); at T = 60 erf is 1 to double precision.
        assert!((boys(0, 60.0) - 0.5 * (PI / 60.0).sqrt()).abs() < 1e-14);
        // Series and asymptotic branches agree near the switch.
        assert!((boys(1, 49.999) - boys(1, 50.001)).abs() < 1e-6);
    }

    #[test]
    fn test_h2_integrals() {
        // Szabo & Ostlund, R = 1.4 bohr
        let mol = Molecule::h2(1.4 / crate::molecule::ANGSTROM_TO_BOHR);
        let ints = AtomicIntegrals::compute(&sto3g(&mol), &mol);
        assert!((ints.overlap[(0, 1)] - 0.6593).abs() < 1e-4);
        assert!((ints.kinetic[(0, 0)] - 0.7600).abs() < 1e-4);
        assert!((ints.core_hamiltonian()[(0, 0)] + 1.1204).abs() < 1e-4);
        assert!((ints.repulsion.get(0, 0, 0, 0) - 0.7746).abs() < 1e-4);
        assert!((ints.repulsion.get(0, 0, 1, 1) - 0.5697).abs() < 1e-4);
        assert!((ints.repulsion.get(1, 0, 0, 0) - 0.4441).abs() < 1e-4);
        assert!((ints.repulsion.get(1, 0, 1, 0) - 0.2970).abs() < 1e-4);
    }

    #[test]
    fn test_transform_identity() {
        let mol = Molecule::lih(1.6);
        let ints = AtomicIntegrals::compute(&sto3g(&mol), &mol);
        let eye = DMatrix::<f64>::identity(6, 6);
        assert_eq!(ints.repulsion.transform(&eye), ints.repulsion);
    }
}
