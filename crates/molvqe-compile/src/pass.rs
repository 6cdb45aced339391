//! Pass trait and types for compilation passes.

use molvqe_ir::Circuit;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// The kind of compilation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Analysis pass that reads but does not modify the circuit.
    Analysis,
    /// Transformation pass that rewrites the circuit.
    Transformation,
}

/// A compilation pass over a circuit.
///
/// Analysis passes must leave the circuit untouched and report through the
/// [`PropertySet`]. Transformation passes rewrite the circuit and may read
/// target information from the [`PropertySet`].
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass on the given circuit.
    fn run(&self, circuit: &mut Circuit, properties: &mut PropertySet) -> CompileResult<()>;

    /// Check if this pass should run based on current state.
    fn should_run(&self, _circuit: &Circuit, _properties: &PropertySet) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopPass;

    impl Pass for NoopPass {
        fn name(&self) -> &'static str {
            "noop"
        }

        fn kind(&self) -> PassKind {
            PassKind::Analysis
        }

        fn run(&self, _circuit: &mut Circuit, _properties: &mut PropertySet) -> CompileResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_pass_kind() {
        let pass = NoopPass;
        assert_eq!(pass.kind(), PassKind::Analysis);
        assert_eq!(pass.name(), "noop");
        assert!(pass.should_run(&Circuit::with_size("c", 1), &PropertySet::new()));
    }
}
