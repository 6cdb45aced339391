//! Molecular geometry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ChemError, ChemResult};

/// Bohr per Ångström.
pub const ANGSTROM_TO_BOHR: f64 = 1.0 / 0.529_177_210_903;

/// Elements with STO-3G data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    /// Hydrogen
    H,
    /// Helium
    He,
    /// Lithium
    Li,
    /// Beryllium
    Be,
}

impl Element {
    /// Nuclear charge.
    pub fn atomic_number(self) -> u32 {
        match self {
            Element::H => 1,
            Element::He => 2,
            Element::Li => 3,
            Element::Be => 4,
        }
    }

    /// Chemical symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Element::H => "H",
            Element::He => "He",
            Element::Li => "Li",
            Element::Be => "Be",
        }
    }

    /// Spatial orbitals counted as core when freezing.
    pub fn core_orbitals(self) -> usize {
        match self {
            Element::H | Element::He => 0,
            Element::Li | Element::Be => 1,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ChemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" => Ok(Element::H),
            "he" => Ok(Element::He),
            "li" => Ok(Element::Li),
            "be" => Ok(Element::Be),
            _ => Err(ChemError::UnsupportedElement(s.trim().to_string())),
        }
    }
}

/// An atom at a position given in Ångström.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Element.
    pub element: Element,
    /// Cartesian position in Ångström.
    pub position: [f64; 3],
}

impl Atom {
    /// Create an atom.
    pub fn new(element: Element, position: [f64; 3]) -> Self {
        Self { element, position }
    }

    /// Position in bohr.
    pub fn position_bohr(&self) -> [f64; 3] {
        self.position.map(|x| x * ANGSTROM_TO_BOHR)
    }
}

/// A molecule: atoms plus total charge and spin multiplicity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    /// Atoms in input order.
    pub atoms: Vec<Atom>,
    /// Net charge.
    #[serde(default)]
    pub charge: i32,
    /// Spin multiplicity 2S+1.
    #[serde(default = "default_multiplicity")]
    pub multiplicity: u32,
}

fn default_multiplicity() -> u32 {
    1
}

impl Molecule {
    /// Neutral singlet from a list of atoms.
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self {
            atoms,
            charge: 0,
            multiplicity: 1,
        }
    }

    /// H₂ along z with the given bond length in Ångström.
    pub fn h2(distance: f64) -> Self {
        Self::new(vec![
            Atom::new(Element::H, [0.0, 0.0, 0.0]),
            Atom::new(Element::H, [0.0, 0.0, distance]),
        ])
    }

    /// LiH along z with the given bond length in Ångström.
    pub fn lih(distance: f64) -> Self {
        Self::new(vec![
            Atom::new(Element::Li, [0.0, 0.0, 0.0]),
            Atom::new(Element::H, [0.0, 0.0, distance]),
        ])
    }

    /// Set the net charge.
    #[must_use]
    pub fn with_charge(mut self, charge: i32) -> Self {
        self.charge = charge;
        self
    }

    /// Set the spin multiplicity.
    #[must_use]
    pub fn with_multiplicity(mut self, multiplicity: u32) -> Self {
        self.multiplicity = multiplicity;
        self
    }

    /// Electron count after applying the charge.
    pub fn num_electrons(&self) -> ChemResult<usize> {
        let nuclear: i64 = self
            .atoms
            .iter()
            .map(|a| i64::from(a.element.atomic_number()))
            .sum();
        let electrons = nuclear - i64::from(self.charge);
        usize::try_from(electrons).map_err(|_| {
            ChemError::InvalidGeometry(format!(
                "charge {} leaves {electrons} electrons",
                self.charge
            ))
        })
    }

    /// Core spatial orbitals summed over atoms.
    pub fn core_orbitals(&self) -> usize {
        self.atoms.iter().map(|a| a.element.core_orbitals()).sum()
    }

    /// Nuclear repulsion energy in Hartree.
    pub fn nuclear_repulsion(&self) -> f64 {
        let mut energy = 0.0;
        for (i, a) in self.atoms.iter().enumerate() {
            for b in &self.atoms[i + 1..] {
                let za = f64::from(a.element.atomic_number());
                let zb = f64::from(b.element.atomic_number());
                energy += za * zb / distance(a.position_bohr(), b.position_bohr());
            }
        }
        energy
    }

    /// Check that no two nuclei coincide.
    pub fn validate(&self) -> ChemResult<()> {
        if self.atoms.is_empty() {
            return Err(ChemError::InvalidGeometry("no atoms".into()));
        }
        for (i, a) in self.atoms.iter().enumerate() {
            for b in &self.atoms[i + 1..] {
                if distance(a.position, b.position) < 1e-6 {
                    return Err(ChemError::InvalidGeometry(format!(
                        "{} and {} overlap",
                        a.element, b.element
                    )));
                }
            }
        }
        if self.multiplicity == 0 {
            return Err(ChemError::InvalidGeometry("multiplicity must be at least 1".into()));
        }
        Ok(())
    }
}

pub(crate) fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}

impl FromStr for Molecule {
    type Err = ChemError;

    /// Parse `"Li 0 0 0; H 0 0 1.5474"` (Ångström).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut atoms = Vec::new();
        for entry in s.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let fields: Vec<&str> = entry.split_whitespace().collect();
            let [symbol, x, y, z] = fields.as_slice() else {
                return Err(ChemError::InvalidGeometry(format!(
                    "expected 'symbol x y z', got '{entry}'"
                )));
            };
            let coord = |v: &str| {
                v.parse::<f64>()
                    .map_err(|_| ChemError::InvalidGeometry(format!("bad coordinate '{v}'")))
            };
            atoms.push(Atom::new(symbol.parse()?, [coord(x)?, coord(y)?, coord(z)?]));
        }
        let molecule = Molecule::new(atoms);
        molecule.validate()?;
        Ok(molecule)
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            let [x, y, z] = atom.position;
            write!(f, "{} {x} {y} {z}", atom.element)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geometry() {
        let m: Molecule = "Li 0 0 0; H 0 0 1.5474".parse().unwrap();
        assert_eq!(m, Molecule::lih(1.5474));
        assert_eq!(m.num_electrons().unwrap(), 4);
        assert_eq!(m.core_orbitals(), 1);
        assert_eq!(m.to_string(), "Li 0 0 0; H 0 0 1.5474");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "Xe 0 0 0".parse::<Molecule>(),
            Err(ChemError::UnsupportedElement(_))
        ));
        assert!("H 0 0".parse::<Molecule>().is_err());
        assert!("H 0 0 0; H 0 0 0".parse::<Molecule>().is_err());
        assert!("".parse::<Molecule>().is_err());
    }

    #[test]
    fn test_nuclear_repulsion_h2() {
        // 1 / (0.735 Å in bohr)
        let e = Molecule::h2(0.735).nuclear_repulsion();
        assert!((e - 0.719_968_994_4).abs() < 1e-8);
    }

    #[test]
    fn test_charge() {
        let cation = Molecule::h2(0.74).with_charge(1);
        assert_eq!(cation.num_electrons().unwrap(), 1);
        assert!(Molecule::h2(0.74).with_charge(3).num_electrons().is_err());
    }
}
