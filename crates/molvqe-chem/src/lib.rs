//! Electronic-structure problems and their qubit Hamiltonians.
//!
//! The pipeline runs geometry → integrals → active space → fermionic
//! operator → qubit operator:
//!
//! 1. [`Molecule`] describes nuclei, charge and multiplicity
//! 2. [`HartreeFockDriver`] computes STO-3G integrals and a restricted
//!    Hartree–Fock solution, yielding an [`ElectronicStructureProblem`]
//! 3. [`ActiveSpaceTransformer`] freezes core orbitals and drops virtuals
//! 4. [`FermionicOp::from_problem`] builds the second-quantized Hamiltonian
//! 5. [`QubitConverter`] maps it to a [`SparsePauliOp`](molvqe_ir::SparsePauliOp),
//!    optionally tapering two qubits
//!
//! Qubit operators never include the constant part of the energy; add
//! [`ElectronicStructureProblem::constant_energy`] to eigenvalues.
//!
//! # Example
//!
//! ```rust
//! use molvqe_chem::{
//!     FermionicOp, HartreeFockDriver, MappingKind, Molecule, MolecularDriver, QubitConverter,
//! };
//!
//! let problem = HartreeFockDriver::new().run(&Molecule::h2(0.735)).unwrap();
//! let converter = QubitConverter::new(MappingKind::Parity, true);
//! let op = converter
//!     .convert(&FermionicOp::from_problem(&problem), problem.num_particles())
//!     .unwrap();
//! assert_eq!(op.num_qubits(), 2);
//! assert_eq!(op.num_terms(), 5);
//! ```

pub mod active_space;
pub mod basis;
pub mod converter;
pub mod driver;
pub mod error;
pub mod fermionic;
pub mod integrals;
pub mod mapper;
pub mod molecule;
pub mod reference;

pub use active_space::ActiveSpaceTransformer;
pub use basis::{BasisFunction, sto3g};
pub use converter::{QubitConverter, TwoQubitReduction, real_coefficient};
pub use driver::{ElectronicStructureProblem, HartreeFockDriver, MolecularDriver};
pub use error::{ChemError, ChemResult};
pub use fermionic::{FermionicOp, FermionicTerm, Ladder};
pub use integrals::{AtomicIntegrals, TwoElectronIntegrals};
pub use mapper::{JordanWignerMapper, MappingKind, ParityMapper, QubitMapper};
pub use molecule::{ANGSTROM_TO_BOHR, Atom, Element, Molecule};
pub use reference::{hartree_fock_bitstring, hartree_fock_circuit};
