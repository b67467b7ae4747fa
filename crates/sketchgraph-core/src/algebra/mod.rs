//! Geometric algebra of the Euclidean plane.
//!
//! A single value type, [`G20`], carries scalar, vector and bivector parts
//! and stands in for positions, directions, rotations and scale factors.

mod g20;
mod ops;
mod solve;

pub use g20::{EPSILON, G20, LockToken};

use thiserror::Error;

/// Errors raised by multivector operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlgebraError {
    /// The multivector has no inverse (zero, or a null element like `1 + e1`).
    #[error("multivector {0} is not invertible")]
    Singular(G20),
    /// A locked multivector was assigned to, or unlocked with the wrong token.
    #[error("multivector is locked")]
    LockViolation,
    /// A rotor was requested from a zero-length direction.
    #[error("rotor is undefined for a zero-length direction")]
    UndefinedRotor,
}

/// Result type for multivector operations.
pub type AlgebraResult<T> = Result<T, AlgebraError>;
