//! Quaternions.

use crate::{
    error::{MathError, Result},
    matrix::{Mat3, Mat4},
    vector::Vec3,
};
use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Quaternion `x i + y j + z k + w`.
///
/// Unit quaternions represent rotations. The product `a * b` is the rotation
/// applying `a` first and then `b`, matching the order of [`Mat4::mul`] on
/// the corresponding rotation matrices.
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Clone, Copy, PartialEq, Zeroable, Pod)]
pub struct Quaternion {
    inner: glam::Quat,
}

/// Dot products above this are treated as identical orientations by
/// [`Quaternion::slerp`].
const SLERP_LINEAR_THRESHOLD: f32 = 1.0 - 1e-6;

impl Quaternion {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self {
            inner: glam::Quat::from_xyzw(x, y, z, w),
        }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Creates the rotation by `angle` radians about `axis`, which must be
    /// normalized.
    pub fn from_axis_angle(axis: &Vec3, angle: f32) -> Self {
        let (s, c) = (0.5 * angle).sin_cos();
        Self::new(axis.x() * s, axis.y() * s, axis.z() * s, c)
    }

    /// Creates the rotation turning the local forward direction into
    /// `forward`. See [`Mat4::look_to`].
    pub fn look_to(forward: &Vec3, up: &Vec3) -> Self {
        Self::from_mat4(&Mat4::look_to(forward, up))
    }

    /// Extracts the rotation from a rotation matrix.
    pub fn from_mat3(matrix: &Mat3) -> Self {
        Self::from_rotation_elements(matrix.elements())
    }

    /// Extracts the rotation from the upper-left 3x3 block of a matrix.
    pub fn from_mat4(matrix: &Mat4) -> Self {
        let e = matrix.elements();
        Self::from_rotation_elements(&[e[0], e[1], e[2], e[4], e[5], e[6], e[8], e[9], e[10]])
    }

    /// Picks the largest of the four components from the diagonal and
    /// derives the others from the off-diagonal elements, which stays
    /// accurate for traces near -1.
    fn from_rotation_elements(m: &[f32; 9]) -> Self {
        let candidates = [
            m[0] - m[4] - m[8] + 1.0,
            -m[0] + m[4] - m[8] + 1.0,
            -m[0] - m[4] + m[8] + 1.0,
            m[0] + m[4] + m[8] + 1.0,
        ];
        let mut largest = 0;
        for (index, &candidate) in candidates.iter().enumerate().skip(1) {
            if candidate > candidates[largest] {
                largest = index;
            }
        }

        let v = 0.5 * candidates[largest].sqrt();
        let c = 0.25 / v;
        match largest {
            0 => Self::new(v, (m[1] + m[3]) * c, (m[6] + m[2]) * c, (m[5] - m[7]) * c),
            1 => Self::new((m[1] + m[3]) * c, v, (m[5] + m[7]) * c, (m[6] - m[2]) * c),
            2 => Self::new((m[6] + m[2]) * c, (m[5] + m[7]) * c, v, (m[1] - m[3]) * c),
            _ => Self::new((m[5] - m[7]) * c, (m[6] - m[2]) * c, (m[1] - m[3]) * c, v),
        }
    }

    #[inline]
    pub fn from_array(array: [f32; 4]) -> Self {
        Self {
            inner: glam::Quat::from_array(array),
        }
    }

    #[inline]
    pub fn to_array(&self) -> [f32; 4] {
        self.inner.to_array()
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.inner.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.inner.y
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.inner.z
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.inner.w
    }

    /// The vector part `(x, y, z)`.
    #[inline]
    pub fn imag(&self) -> Vec3 {
        Vec3::new(self.x(), self.y(), self.z())
    }

    #[inline]
    pub fn real(&self) -> f32 {
        self.w()
    }

    #[inline]
    pub fn conjugate(&self) -> Self {
        Self {
            inner: self.inner.conjugate(),
        }
    }

    /// Computes `conjugate / norm_squared`.
    ///
    /// # Errors
    /// Returns [`MathError::ZeroQuaternion`] if all components are zero.
    pub fn inverse(&self) -> Result<Self> {
        let norm_squared = self.norm_squared();
        if norm_squared == 0.0 {
            return Err(MathError::ZeroQuaternion);
        }
        Ok(self.conjugate() * norm_squared.recip())
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.inner.dot(other.inner)
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.inner.length()
    }

    #[inline]
    pub fn norm_squared(&self) -> f32 {
        self.inner.length_squared()
    }

    /// Divides by the norm. A zero quaternion gives non-finite components.
    #[inline]
    pub fn normalized(&self) -> Self {
        *self * self.norm().recip()
    }

    /// Linear interpolation of the components. The result is not normalized.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        *self * (1.0 - t) + *other * t
    }

    /// Spherical linear interpolation between two unit quaternions.
    ///
    /// Falls back to [`Self::lerp`] for (nearly) identical inputs. The result
    /// is undefined for antiparallel inputs.
    pub fn slerp(&self, other: &Self, t: f32) -> Self {
        let cos_angle = self.dot(other).clamp(-1.0, 1.0);
        if cos_angle > SLERP_LINEAR_THRESHOLD {
            return self.lerp(other, t);
        }
        let angle = cos_angle.acos();
        let inv_sin = angle.sin().recip();
        *self * (((1.0 - t) * angle).sin() * inv_sin) + *other * ((t * angle).sin() * inv_sin)
    }

    /// Rotates the vector by this (unit) quaternion.
    pub fn rotate(&self, vector: &Vec3) -> Vec3 {
        let pure = Self::new(vector.x(), vector.y(), vector.z(), 0.0);
        (self.conjugate() * pure * self).imag()
    }

    /// The rotation matrix of this (unit) quaternion.
    pub fn to_mat3(&self) -> Mat3 {
        Mat3::from_elements(self.rotation_elements())
    }

    /// The rotation matrix of this (unit) quaternion, embedded in a 4x4
    /// matrix.
    pub fn to_mat4(&self) -> Mat4 {
        let [m0, m1, m2, m3, m4, m5, m6, m7, m8] = self.rotation_elements();
        Mat4::from_elements([
            m0, m1, m2, 0.0, m3, m4, m5, 0.0, m6, m7, m8, 0.0, 0.0, 0.0, 0.0, 1.0,
        ])
    }

    fn rotation_elements(&self) -> [f32; 9] {
        let [x, y, z, w] = self.to_array();
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (xw, yw, zw) = (x * w, y * w, z * w);
        [
            1.0 - 2.0 * (yy + zz),
            2.0 * (xy + zw),
            2.0 * (xz - yw),
            2.0 * (xy - zw),
            1.0 - 2.0 * (xx + zz),
            2.0 * (yz + xw),
            2.0 * (xz + yw),
            2.0 * (yz - xw),
            1.0 - 2.0 * (xx + yy),
        ]
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Quaternion")
            .field(&self.x())
            .field(&self.y())
            .field(&self.z())
            .field(&self.w())
            .finish()
    }
}

impl From<[f32; 4]> for Quaternion {
    fn from(array: [f32; 4]) -> Self {
        Self::from_array(array)
    }
}

impl From<Quaternion> for [f32; 4] {
    fn from(quaternion: Quaternion) -> Self {
        quaternion.to_array()
    }
}

impl_binop!(Add, add, Quaternion, Quaternion, Quaternion, |a, b| {
    Quaternion {
        inner: a.inner + b.inner,
    }
});

impl_binop!(Sub, sub, Quaternion, Quaternion, Quaternion, |a, b| {
    Quaternion {
        inner: a.inner - b.inner,
    }
});

// Hamilton product `b a`, so that `a` is applied first.
impl_binop!(Mul, mul, Quaternion, Quaternion, Quaternion, |a, b| {
    let [ax, ay, az, aw] = a.to_array();
    let [bx, by, bz, bw] = b.to_array();
    Quaternion::new(
        bw * ax - bz * ay + by * az + bx * aw,
        bz * ax + bw * ay - bx * az + by * aw,
        -by * ax + bx * ay + bw * az + bz * aw,
        -bx * ax - by * ay - bz * az + bw * aw,
    )
});

impl_binop!(Mul, mul, Quaternion, f32, Quaternion, |a, b| {
    Quaternion {
        inner: a.inner * *b,
    }
});

impl_binop!(Mul, mul, f32, Quaternion, Quaternion, |a, b| {
    Quaternion {
        inner: b.inner * *a,
    }
});

impl_binop_assign!(AddAssign, add_assign, Quaternion, Quaternion, |a, b| {
    a.inner = a.inner + b.inner;
});

impl_binop_assign!(SubAssign, sub_assign, Quaternion, Quaternion, |a, b| {
    a.inner = a.inner - b.inner;
});

impl_binop_assign!(MulAssign, mul_assign, Quaternion, Quaternion, |a, b| {
    *a = &*a * b;
});

impl_binop_assign!(MulAssign, mul_assign, Quaternion, f32, |a, b| {
    a.inner = a.inner * *b;
});

impl_unary_op!(Neg, neg, Quaternion, Quaternion, |val| {
    Quaternion { inner: -val.inner }
});

impl_approx_eq!(Quaternion, |q| q.to_array());
