//! `PropertySet` and related types for pass communication.
//!
//! Passes share data through a [`PropertySet`]: the target basis has a
//! dedicated field, anything else goes into the typed custom store.
//!
//! ```
//! use molvqe_compile::{BasisGates, PropertySet};
//!
//! #[derive(Debug, PartialEq)]
//! struct Note(&'static str);
//!
//! let mut props = PropertySet::new().with_basis_gates(BasisGates::u_cx());
//! props.insert(Note("translated"));
//!
//! assert!(props.basis_gates.as_ref().unwrap().contains("cx"));
//! assert_eq!(props.get::<Note>(), Some(&Note("translated")));
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;

/// Basis gates for the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisGates {
    /// List of gate names in the basis.
    gates: Vec<String>,
}

impl BasisGates {
    /// Create a new basis gates set.
    pub fn new(gates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            gates: gates.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a gate is in the basis.
    pub fn contains(&self, gate: &str) -> bool {
        self.gates.iter().any(|g| g == gate)
    }

    /// Get the basis gates.
    pub fn gates(&self) -> &[String] {
        &self.gates
    }

    /// Universal single-qubit U plus CNOT. The canonical form for counting gates.
    pub fn u_cx() -> Self {
        Self::new(["u", "cx", "barrier"])
    }

    /// Superconducting-style basis: RZ + SX + X + CX.
    pub fn rz_sx_cx() -> Self {
        Self::new(["rz", "sx", "x", "cx", "barrier"])
    }

    /// Look a basis up by its configuration name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('-', "_").as_str() {
            "u_cx" | "u,cx" => Some(Self::u_cx()),
            "rz_sx_cx" | "rz,sx,x,cx" => Some(Self::rz_sx_cx()),
            _ => None,
        }
    }
}

impl fmt::Display for BasisGates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gates.join(", "))
    }
}

/// Properties shared between compilation passes.
#[derive(Debug, Default)]
pub struct PropertySet {
    /// Target basis gates for gate decomposition.
    pub basis_gates: Option<BasisGates>,

    /// Custom properties storage (type-erased).
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target basis.
    #[must_use]
    pub fn with_basis_gates(mut self, basis_gates: BasisGates) -> Self {
        self.basis_gates = Some(basis_gates);
        self
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_gates() {
        let u_cx = BasisGates::u_cx();
        assert!(u_cx.contains("u"));
        assert!(u_cx.contains("cx"));
        assert!(!u_cx.contains("rz"));

        let ibm = BasisGates::rz_sx_cx();
        assert!(ibm.contains("sx"));
        assert!(!ibm.contains("u"));
    }

    #[test]
    fn test_basis_by_name() {
        assert_eq!(BasisGates::by_name("U-CX"), Some(BasisGates::u_cx()));
        assert_eq!(BasisGates::by_name("rz_sx_cx"), Some(BasisGates::rz_sx_cx()));
        assert_eq!(BasisGates::by_name("prx_cz"), None);
    }

    #[test]
    #[allow(clippy::items_after_statements)]
    fn test_property_set_custom() {
        let mut props = PropertySet::new();

        #[derive(Debug, PartialEq)]
        struct CustomData(i32);

        props.insert(CustomData(42));
        assert_eq!(props.get::<CustomData>(), Some(&CustomData(42)));

        let removed = props.remove::<CustomData>();
        assert_eq!(removed, Some(CustomData(42)));
        assert_eq!(props.get::<CustomData>(), None);
    }
}
