//! Scenegraph errors.

use thiserror::Error;

use crate::algebra::AlgebraError;
use crate::element::ElementId;

/// Errors raised by scenegraph mutations and shape setters.
///
/// Every variant except [`Algebra`](Self::Algebra) is raised before any
/// state is touched: a rejected mutation leaves the scene as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("adding {child} under {parent} would make it its own ancestor")]
    Cycle { parent: ElementId, child: ElementId },
    #[error("group {parent} already has a child with id {id}")]
    DuplicateId { parent: ElementId, id: ElementId },
    #[error("node handle is stale or was never issued")]
    StaleNode,
    #[error("{0} is not a group")]
    NotAGroup(ElementId),
    #[error("{id} is a {found}, expected {expected}")]
    WrongKind {
        id: ElementId,
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid value for {property}: {value}")]
    InvalidValue { property: &'static str, value: f64 },
    #[error("the root group cannot be detached or destroyed")]
    RootNode,
    #[error("view box has zero width or height")]
    DegenerateViewBox,
    #[error(transparent)]
    Algebra(#[from] AlgebraError),
}

/// Result type for scenegraph operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Reject non-finite numbers.
pub(crate) fn finite(property: &'static str, value: f64) -> SceneResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SceneError::InvalidValue { property, value })
    }
}

/// Reject non-finite and negative numbers.
pub(crate) fn non_negative(property: &'static str, value: f64) -> SceneResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SceneError::InvalidValue { property, value })
    }
}

/// Reject anything outside `0..=1`, NaN included.
pub(crate) fn unit_interval(property: &'static str, value: f64) -> SceneResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SceneError::InvalidValue { property, value })
    }
}

/// Reject counts below `min`.
pub(crate) fn at_least(property: &'static str, value: usize, min: usize) -> SceneResult<usize> {
    if value >= min {
        Ok(value)
    } else {
        Err(SceneError::InvalidValue {
            property,
            value: value as f64,
        })
    }
}
