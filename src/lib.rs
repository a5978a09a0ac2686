//! Linear algebra for real-time graphics.
//!
//! Vectors, square matrices, quaternions and composite transforms, using the
//! row-vector convention throughout: a vector `v` is transformed by a matrix
//! `m` as `v * m`, and `a * b` applies `a` before `b`.

#[macro_use]
mod macros;

pub mod angle;
pub mod error;
pub mod matrix;
pub mod quaternion;
pub mod transform;
pub mod vector;

pub use angle::{Angle, Degrees, Radians};
pub use error::{MathError, Result};
pub use matrix::{Axis, Mat2, Mat3, Mat4};
pub use quaternion::Quaternion;
pub use transform::Transform;
pub use vector::{Vec2, Vec3, Vec4};
