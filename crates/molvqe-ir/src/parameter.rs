//! Named parameters and the expressions built from them.
//!
//! A [`Parameter`] carries a human-readable name and a unique identity. Two
//! parameters created with the same name are different parameters: binding one
//! never binds the other. Structural comparisons (same gate layout, same naming
//! pattern) go through [`ParameterExpression::same_structure`] instead of `==`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// A free, named circuit parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    id: Uuid,
}

impl Parameter {
    /// Create a fresh parameter. Every call yields a distinct identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: Uuid::new_v4(),
        }
    }

    /// The display name, e.g. `layer0_z_3`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unique identity of this parameter.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Compare by name only, ignoring identity.
    pub fn same_name_as(&self, other: &Parameter) -> bool {
        self.name == other.name
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Parameter {}

impl Hash for Parameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Values assigned to parameters, keyed by identity.
pub type ParameterBinding = FxHashMap<Parameter, f64>;

/// A symbolic or concrete parameter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A constant numeric value.
    Constant(f64),
    /// A free parameter.
    Symbol(Parameter),
    /// The constant π.
    Pi,
    /// Negation.
    Neg(Box<ParameterExpression>),
    /// Addition.
    Add(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Subtraction.
    Sub(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Multiplication.
    Mul(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Division.
    Div(Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    /// Create a constant expression.
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// Create an expression over a brand new parameter named `name`.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(Parameter::new(name))
    }

    /// Create a π constant.
    pub fn pi() -> Self {
        ParameterExpression::Pi
    }

    /// Check if this expression contains any free parameters.
    pub fn is_symbolic(&self) -> bool {
        match self {
            ParameterExpression::Symbol(_) => true,
            ParameterExpression::Constant(_) | ParameterExpression::Pi => false,
            ParameterExpression::Neg(e) => e.is_symbolic(),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    /// Try to evaluate as a concrete f64 value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Symbol(_) => None,
            ParameterExpression::Pi => Some(PI),
            ParameterExpression::Neg(e) => e.as_f64().map(|v| -v),
            ParameterExpression::Add(a, b) => Some(a.as_f64()? + b.as_f64()?),
            ParameterExpression::Sub(a, b) => Some(a.as_f64()? - b.as_f64()?),
            ParameterExpression::Mul(a, b) => Some(a.as_f64()? * b.as_f64()?),
            ParameterExpression::Div(a, b) => {
                let divisor = b.as_f64()?;
                if divisor == 0.0 {
                    return None;
                }
                Some(a.as_f64()? / divisor)
            }
        }
    }

    /// Free parameters in order of first appearance, without repeats.
    pub fn parameters(&self) -> Vec<Parameter> {
        let mut out = Vec::new();
        self.collect_parameters(&mut out);
        out
    }

    pub(crate) fn collect_parameters(&self, out: &mut Vec<Parameter>) {
        match self {
            ParameterExpression::Constant(_) | ParameterExpression::Pi => {}
            ParameterExpression::Symbol(p) => {
                if !out.contains(p) {
                    out.push(p.clone());
                }
            }
            ParameterExpression::Neg(e) => e.collect_parameters(out),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => {
                a.collect_parameters(out);
                b.collect_parameters(out);
            }
        }
    }

    /// Bind a single parameter to a value, returning a new expression.
    pub fn bind(&self, parameter: &Parameter, value: f64) -> Self {
        self.map_symbols(&|p| (p == parameter).then_some(value))
    }

    /// Bind every parameter present in `binding`; others stay symbolic.
    pub fn bind_all(&self, binding: &ParameterBinding) -> Self {
        self.map_symbols(&|p| binding.get(p).copied())
    }

    fn map_symbols(&self, lookup: &dyn Fn(&Parameter) -> Option<f64>) -> Self {
        let rec = |e: &ParameterExpression| Box::new(e.map_symbols(lookup));
        match self {
            ParameterExpression::Symbol(p) => match lookup(p) {
                Some(v) => ParameterExpression::Constant(v),
                None => self.clone(),
            },
            ParameterExpression::Constant(_) | ParameterExpression::Pi => self.clone(),
            ParameterExpression::Neg(e) => ParameterExpression::Neg(rec(e)),
            ParameterExpression::Add(a, b) => ParameterExpression::Add(rec(a), rec(b)),
            ParameterExpression::Sub(a, b) => ParameterExpression::Sub(rec(a), rec(b)),
            ParameterExpression::Mul(a, b) => ParameterExpression::Mul(rec(a), rec(b)),
            ParameterExpression::Div(a, b) => ParameterExpression::Div(rec(a), rec(b)),
        }
    }

    /// Same expression tree with parameters compared by name only.
    pub fn same_structure(&self, other: &ParameterExpression) -> bool {
        use ParameterExpression as E;
        match (self, other) {
            (E::Constant(a), E::Constant(b)) => a == b,
            (E::Symbol(a), E::Symbol(b)) => a.same_name_as(b),
            (E::Pi, E::Pi) => true,
            (E::Neg(a), E::Neg(b)) => a.same_structure(b),
            (E::Add(a1, b1), E::Add(a2, b2))
            | (E::Sub(a1, b1), E::Sub(a2, b2))
            | (E::Mul(a1, b1), E::Mul(a2, b2))
            | (E::Div(a1, b1), E::Div(a2, b2)) => a1.same_structure(a2) && b1.same_structure(b2),
            _ => false,
        }
    }

    /// Simplify the expression by evaluating constant subexpressions.
    pub fn simplify(&self) -> Self {
        if let Some(v) = self.as_f64() {
            return ParameterExpression::Constant(v);
        }
        let fold = |a: &ParameterExpression,
                    b: &ParameterExpression,
                    op: fn(f64, f64) -> f64,
                    build: fn(Box<ParameterExpression>, Box<ParameterExpression>) -> Self| {
            let a = a.simplify();
            let b = b.simplify();
            match (a.as_f64(), b.as_f64()) {
                (Some(av), Some(bv)) => ParameterExpression::Constant(op(av, bv)),
                _ => build(Box::new(a), Box::new(b)),
            }
        };
        match self {
            ParameterExpression::Neg(e) => {
                let e = e.simplify();
                match e.as_f64() {
                    Some(v) => ParameterExpression::Constant(-v),
                    None => ParameterExpression::Neg(Box::new(e)),
                }
            }
            ParameterExpression::Add(a, b) => fold(a, b, |x, y| x + y, ParameterExpression::Add),
            ParameterExpression::Sub(a, b) => fold(a, b, |x, y| x - y, ParameterExpression::Sub),
            ParameterExpression::Mul(a, b) => fold(a, b, |x, y| x * y, ParameterExpression::Mul),
            // Division by a constant zero stays symbolic so `as_f64` keeps returning None.
            ParameterExpression::Div(a, b) => {
                ParameterExpression::Div(Box::new(a.simplify()), Box::new(b.simplify()))
            }
            _ => self.clone(),
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Symbol(p) => write!(f, "{p}"),
            ParameterExpression::Pi => write!(f, "π"),
            ParameterExpression::Neg(e) => write!(f, "-({e})"),
            ParameterExpression::Add(a, b) => write!(f, "({a} + {b})"),
            ParameterExpression::Sub(a, b) => write!(f, "({a} - {b})"),
            ParameterExpression::Mul(a, b) => write!(f, "({a} * {b})"),
            ParameterExpression::Div(a, b) => write!(f, "({a} / {b})"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl From<Parameter> for ParameterExpression {
    fn from(parameter: Parameter) -> Self {
        ParameterExpression::Symbol(parameter)
    }
}

impl From<&Parameter> for ParameterExpression {
    fn from(parameter: &Parameter) -> Self {
        ParameterExpression::Symbol(parameter.clone())
    }
}

impl std::ops::Add for ParameterExpression {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        ParameterExpression::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Sub for ParameterExpression {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        ParameterExpression::Sub(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Mul for ParameterExpression {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        ParameterExpression::Mul(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Div for ParameterExpression {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        ParameterExpression::Div(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        ParameterExpression::Neg(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_distinct_identity() {
        let a = Parameter::new("theta");
        let b = Parameter::new("theta");
        assert_ne!(a, b);
        assert!(a.same_name_as(&b));
    }

    #[test]
    fn test_bind_only_matching_identity() {
        let a = Parameter::new("theta");
        let b = Parameter::new("theta");
        let expr = ParameterExpression::from(&a) + ParameterExpression::from(&b);

        let partially = expr.bind(&a, 1.0);
        assert!(partially.is_symbolic());
        assert_eq!(partially.parameters(), vec![b.clone()]);

        let full = partially.bind(&b, 2.0);
        assert_eq!(full.as_f64(), Some(3.0));
    }

    #[test]
    fn test_bind_all() {
        let a = Parameter::new("a");
        let b = Parameter::new("b");
        let expr = ParameterExpression::from(&a) * ParameterExpression::from(&b);

        let mut binding = ParameterBinding::default();
        binding.insert(a, 2.0);
        binding.insert(b, -1.5);
        assert_eq!(expr.bind_all(&binding).as_f64(), Some(-3.0));
    }

    #[test]
    fn test_parameters_in_order_without_repeats() {
        let a = Parameter::new("a");
        let b = Parameter::new("b");
        let expr = (ParameterExpression::from(&b) + ParameterExpression::from(&a))
            * ParameterExpression::from(&b);
        assert_eq!(expr.parameters(), vec![b, a]);
    }

    #[test]
    fn test_same_structure_ignores_identity() {
        let x = ParameterExpression::symbol("x") * ParameterExpression::constant(0.5);
        let y = ParameterExpression::symbol("x") * ParameterExpression::constant(0.5);
        let z = ParameterExpression::symbol("z") * ParameterExpression::constant(0.5);
        assert_ne!(x, y);
        assert!(x.same_structure(&y));
        assert!(!x.same_structure(&z));
    }

    #[test]
    fn test_simplify_and_division_by_zero() {
        let sum = (ParameterExpression::constant(2.0) + ParameterExpression::pi()).simplify();
        assert!((sum.as_f64().unwrap() - (2.0 + PI)).abs() < 1e-12);

        let div = ParameterExpression::constant(1.0) / ParameterExpression::constant(0.0);
        assert_eq!(div.simplify().as_f64(), None);
    }
}
