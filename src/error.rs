//! Errors produced by the math kernel.

use thiserror::Error;

/// Determinants with an absolute value at or below this are treated as zero
/// when inverting.
pub const DETERMINANT_EPSILON: f32 = 1e-12;

pub type Result<T> = std::result::Result<T, MathError>;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("Tried to invert singular {order}x{order} matrix (determinant {determinant})")]
    SingularMatrix { order: usize, determinant: f32 },
    #[error("Expected {expected} elements but got {actual}")]
    ElementCount { expected: usize, actual: usize },
    #[error("Tried to invert zero quaternion")]
    ZeroQuaternion,
}

/// Returns an error if a matrix with the given determinant can not be
/// inverted.
pub(crate) fn ensure_invertible(order: usize, determinant: f32) -> Result<()> {
    if determinant.is_finite() && determinant.abs() > DETERMINANT_EPSILON {
        Ok(())
    } else {
        log::debug!("Refusing to invert {order}x{order} matrix with determinant {determinant}");
        Err(MathError::SingularMatrix { order, determinant })
    }
}

/// Returns an error unless `slice` holds exactly `expected` elements.
pub(crate) fn ensure_element_count(expected: usize, slice: &[f32]) -> Result<()> {
    if slice.len() == expected {
        Ok(())
    } else {
        Err(MathError::ElementCount {
            expected,
            actual: slice.len(),
        })
    }
}
