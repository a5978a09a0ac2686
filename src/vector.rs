//! Vectors.

use crate::error::{Result, ensure_element_count};
use bytemuck::{Pod, Zeroable};
use std::{
    fmt,
    ops::{Index, IndexMut},
};

/// A 2-dimensional vector.
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Clone, Copy, Default, PartialEq, Zeroable, Pod)]
pub struct Vec2 {
    inner: glam::Vec2,
}

/// A 3-dimensional vector.
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Clone, Copy, Default, PartialEq, Zeroable, Pod)]
pub struct Vec3 {
    inner: glam::Vec3,
}

/// A 4-dimensional vector.
///
/// Directions have a zero w-component, so [`Vec4::forward`] and friends can
/// be transformed by a [`Mat4`](crate::matrix::Mat4) without picking up
/// translation.
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Clone, Copy, Default, PartialEq, Zeroable, Pod)]
pub struct Vec4 {
    inner: glam::Vec4,
}

impl Vec2 {
    /// Creates a new vector with the given components.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self::wrap(glam::Vec2::new(x, y))
    }

    /// The x-component.
    #[inline]
    pub const fn x(&self) -> f32 {
        self.inner.x
    }

    /// The y-component.
    #[inline]
    pub const fn y(&self) -> f32 {
        self.inner.y
    }

    /// A mutable reference to the x-component.
    #[inline]
    pub const fn x_mut(&mut self) -> &mut f32 {
        &mut self.inner.x
    }

    /// A mutable reference to the y-component.
    #[inline]
    pub const fn y_mut(&mut self) -> &mut f32 {
        &mut self.inner.y
    }

    #[inline]
    pub const fn left() -> Self {
        Self::new(-1.0, 0.0)
    }

    #[inline]
    pub const fn right() -> Self {
        Self::new(1.0, 0.0)
    }

    #[inline]
    pub const fn down() -> Self {
        Self::new(0.0, -1.0)
    }

    #[inline]
    pub const fn up() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Converts the vector to 3D by appending the given z-component.
    #[inline]
    pub const fn to_vec3(&self, z: f32) -> Vec3 {
        Vec3::new(self.x(), self.y(), z)
    }

    /// Converts the vector to 4D by appending the given z- and w-components.
    #[inline]
    pub const fn to_vec4(&self, z: f32, w: f32) -> Vec4 {
        Vec4::new(self.x(), self.y(), z, w)
    }

    /// The 2D cross product (z-component of the 3D cross product).
    #[inline]
    pub fn perp_dot(&self, other: &Self) -> f32 {
        self.inner.perp_dot(other.inner)
    }
}

impl Vec3 {
    /// Creates a new vector with the given components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self::wrap(glam::Vec3::new(x, y, z))
    }

    /// The x-component.
    #[inline]
    pub const fn x(&self) -> f32 {
        self.inner.x
    }

    /// The y-component.
    #[inline]
    pub const fn y(&self) -> f32 {
        self.inner.y
    }

    /// The z-component.
    #[inline]
    pub const fn z(&self) -> f32 {
        self.inner.z
    }

    /// A mutable reference to the x-component.
    #[inline]
    pub const fn x_mut(&mut self) -> &mut f32 {
        &mut self.inner.x
    }

    /// A mutable reference to the y-component.
    #[inline]
    pub const fn y_mut(&mut self) -> &mut f32 {
        &mut self.inner.y
    }

    /// A mutable reference to the z-component.
    #[inline]
    pub const fn z_mut(&mut self) -> &mut f32 {
        &mut self.inner.z
    }

    #[inline]
    pub const fn left() -> Self {
        Self::new(-1.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn right() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn down() -> Self {
        Self::new(0.0, -1.0, 0.0)
    }

    #[inline]
    pub const fn up() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    /// The direction a default-oriented camera looks in.
    #[inline]
    pub const fn forward() -> Self {
        Self::new(0.0, 0.0, -1.0)
    }

    #[inline]
    pub const fn backward() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    /// Computes the cross product of this vector with another.
    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        Self::wrap(self.inner.cross(other.inner))
    }

    /// Drops the z-component.
    #[inline]
    pub const fn to_vec2(&self) -> Vec2 {
        Vec2::new(self.x(), self.y())
    }

    /// Converts the vector to 4D by appending the given w-component.
    #[inline]
    pub const fn to_vec4(&self, w: f32) -> Vec4 {
        Vec4::new(self.x(), self.y(), self.z(), w)
    }
}

impl Vec4 {
    /// Creates a new vector with the given components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self::wrap(glam::Vec4::new(x, y, z, w))
    }

    /// The x-component.
    #[inline]
    pub fn x(&self) -> f32 {
        self.inner.x
    }

    /// The y-component.
    #[inline]
    pub fn y(&self) -> f32 {
        self.inner.y
    }

    /// The z-component.
    #[inline]
    pub fn z(&self) -> f32 {
        self.inner.z
    }

    /// The w-component.
    #[inline]
    pub fn w(&self) -> f32 {
        self.inner.w
    }

    /// A mutable reference to the x-component.
    #[inline]
    pub fn x_mut(&mut self) -> &mut f32 {
        &mut self.inner.x
    }

    /// A mutable reference to the y-component.
    #[inline]
    pub fn y_mut(&mut self) -> &mut f32 {
        &mut self.inner.y
    }

    /// A mutable reference to the z-component.
    #[inline]
    pub fn z_mut(&mut self) -> &mut f32 {
        &mut self.inner.z
    }

    /// A mutable reference to the w-component.
    #[inline]
    pub fn w_mut(&mut self) -> &mut f32 {
        &mut self.inner.w
    }

    #[inline]
    pub const fn left() -> Self {
        Self::new(-1.0, 0.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn right() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn down() -> Self {
        Self::new(0.0, -1.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn up() -> Self {
        Self::new(0.0, 1.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn forward() -> Self {
        Self::new(0.0, 0.0, -1.0, 0.0)
    }

    #[inline]
    pub const fn backward() -> Self {
        Self::new(0.0, 0.0, 1.0, 0.0)
    }

    /// Keeps the x- and y-components.
    #[inline]
    pub fn to_vec2(&self) -> Vec2 {
        Vec2::new(self.x(), self.y())
    }

    /// Drops the w-component without dividing by it.
    #[inline]
    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.x(), self.y(), self.z())
    }
}

/// Operations shared by all vector dimensions.
macro_rules! impl_vector {
    ($t:ident, $glam:ty, $n:literal, [$($comp:ident),+]) => {
        impl $t {
            /// Creates a new vector with all zeros.
            #[inline]
            pub const fn zeros() -> Self {
                Self::wrap(<$glam>::ZERO)
            }

            /// Creates a new vector with all ones.
            #[inline]
            pub const fn ones() -> Self {
                Self::wrap(<$glam>::ONE)
            }

            /// Creates a new vector with the same value for all components.
            #[inline]
            pub fn same(value: f32) -> Self {
                Self::wrap(<$glam>::splat(value))
            }

            #[inline]
            pub fn from_array(array: [f32; $n]) -> Self {
                Self::wrap(<$glam>::from_array(array))
            }

            /// Creates a vector from a slice that must hold exactly as many
            /// values as the vector has components.
            ///
            /// # Errors
            /// Returns [`MathError::ElementCount`](crate::error::MathError)
            /// if the slice has the wrong length.
            pub fn try_from_slice(slice: &[f32]) -> Result<Self> {
                ensure_element_count($n, slice)?;
                Ok(Self::wrap(<$glam>::from_slice(slice)))
            }

            #[inline]
            pub fn to_array(&self) -> [f32; $n] {
                self.inner.to_array()
            }

            /// Computes the dot product of this vector with another.
            #[inline]
            pub fn dot(&self, other: &Self) -> f32 {
                self.inner.dot(other.inner)
            }

            /// Computes the norm (length) of the vector.
            #[inline]
            pub fn norm(&self) -> f32 {
                self.inner.length()
            }

            /// Computes the square of the norm of the vector.
            #[inline]
            pub fn norm_squared(&self) -> f32 {
                self.inner.length_squared()
            }

            /// Computes the normalized version of the vector. The zero vector
            /// normalizes to NaN components.
            #[inline]
            pub fn normalized(&self) -> Self {
                Self::wrap(self.inner / self.inner.length())
            }

            /// Normalizes the vector in place.
            #[inline]
            pub fn normalize(&mut self) -> &mut Self {
                *self = self.normalized();
                self
            }

            /// Multiplies each component by the corresponding component in
            /// another vector.
            #[inline]
            pub fn component_mul(&self, other: &Self) -> Self {
                Self::wrap(self.inner * other.inner)
            }

            /// Divides each component by the corresponding component in
            /// another vector.
            #[inline]
            pub fn component_div(&self, other: &Self) -> Self {
                Self::wrap(self.inner / other.inner)
            }

            /// Returns a vector with the given closure applied to each
            /// component.
            #[inline]
            pub fn mapped(&self, f: impl FnMut(f32) -> f32) -> Self {
                Self::from_array(self.to_array().map(f))
            }

            /// Linearly interpolates between this vector (`t = 0`) and
            /// another (`t = 1`).
            #[inline]
            pub fn lerp(&self, other: &Self, t: f32) -> Self {
                Self::wrap(self.inner.lerp(other.inner, t))
            }

            #[inline]
            pub(crate) const fn wrap(inner: $glam) -> Self {
                Self { inner }
            }
        }

        impl From<[f32; $n]> for $t {
            #[inline]
            fn from(array: [f32; $n]) -> Self {
                Self::from_array(array)
            }
        }

        impl From<$t> for [f32; $n] {
            #[inline]
            fn from(vector: $t) -> Self {
                vector.to_array()
            }
        }

        impl From<f32> for $t {
            #[inline]
            fn from(value: f32) -> Self {
                Self::same(value)
            }
        }

        impl_binop!(Add, add, $t, $t, $t, |a, b| { $t::wrap(a.inner + b.inner) });

        impl_binop!(Add, add, $t, f32, $t, |a, b| { $t::wrap(a.inner + *b) });

        impl_binop!(Sub, sub, $t, $t, $t, |a, b| { $t::wrap(a.inner - b.inner) });

        impl_binop!(Sub, sub, $t, f32, $t, |a, b| { $t::wrap(a.inner - *b) });

        impl_binop!(Mul, mul, $t, f32, $t, |a, b| { $t::wrap(a.inner * *b) });

        impl_binop!(Mul, mul, f32, $t, $t, |a, b| { $t::wrap(b.inner * *a) });

        impl_binop!(Div, div, $t, f32, $t, |a, b| { $t::wrap(a.inner / *b) });

        impl_binop_assign!(AddAssign, add_assign, $t, $t, |a, b| {
            a.inner += b.inner;
        });

        impl_binop_assign!(AddAssign, add_assign, $t, f32, |a, b| {
            a.inner += *b;
        });

        impl_binop_assign!(SubAssign, sub_assign, $t, $t, |a, b| {
            a.inner -= b.inner;
        });

        impl_binop_assign!(SubAssign, sub_assign, $t, f32, |a, b| {
            a.inner -= *b;
        });

        impl_binop_assign!(MulAssign, mul_assign, $t, f32, |a, b| {
            a.inner *= *b;
        });

        impl_binop_assign!(DivAssign, div_assign, $t, f32, |a, b| {
            a.inner /= *b;
        });

        impl_unary_op!(Neg, neg, $t, $t, |val| { $t::wrap(-val.inner) });

        impl Index<usize> for $t {
            type Output = f32;

            #[inline]
            fn index(&self, index: usize) -> &Self::Output {
                &self.inner[index]
            }
        }

        impl IndexMut<usize> for $t {
            #[inline]
            fn index_mut(&mut self, index: usize) -> &mut Self::Output {
                &mut self.inner[index]
            }
        }

        impl_approx_eq!($t, |v| v.to_array());

        impl fmt::Debug for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($t))
                    $(.field(stringify!($comp), &self.inner.$comp))+
                    .finish()
            }
        }
    };
}

impl_vector!(Vec2, glam::Vec2, 2, [x, y]);
impl_vector!(Vec3, glam::Vec3, 3, [x, y, z]);
impl_vector!(Vec4, glam::Vec4, 4, [x, y, z, w]);

impl From<(Vec2, f32)> for Vec3 {
    #[inline]
    fn from((xy, z): (Vec2, f32)) -> Self {
        xy.to_vec3(z)
    }
}

impl From<(Vec2, f32, f32)> for Vec4 {
    #[inline]
    fn from((xy, z, w): (Vec2, f32, f32)) -> Self {
        xy.to_vec4(z, w)
    }
}

impl From<(Vec3, f32)> for Vec4 {
    #[inline]
    fn from((xyz, w): (Vec3, f32)) -> Self {
        xyz.to_vec4(w)
    }
}
