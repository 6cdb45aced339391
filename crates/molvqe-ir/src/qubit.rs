//! Qubit addressing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Index of a qubit within a circuit, in `[0, n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The index as a `usize`, for addressing statevector bits.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Checked conversion from a `usize` index.
    pub fn try_from_index(index: usize) -> IrResult<Self> {
        u32::try_from(index)
            .map(QubitId)
            .map_err(|_| IrError::InvalidArgument(format!("qubit index {index} exceeds u32")))
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId(0)), "q0");
        assert_eq!(format!("{}", QubitId(12)), "q12");
    }

    #[test]
    fn test_qubit_index_conversion() {
        assert_eq!(QubitId::try_from_index(3).unwrap(), QubitId(3));
        assert_eq!(QubitId(7).index(), 7);
        assert!(QubitId::try_from_index(usize::MAX).is_err());
    }
}
