//! Angles in degrees and radians.

use bytemuck::{Pod, Zeroable};
use std::{
    f32::consts::PI,
    ops::{Add, Div, Mul, Neg, Sub},
};

/// An angle that can be expressed in either unit.
pub trait Angle: Copy {
    /// Returns the angle as degrees.
    fn as_degrees(self) -> Degrees;

    /// Returns the angle as radians.
    fn as_radians(self) -> Radians;

    /// Returns the value of the angle in degrees.
    fn degrees(self) -> f32 {
        self.as_degrees().0
    }

    /// Returns the value of the angle in radians.
    fn radians(self) -> f32 {
        self.as_radians().0
    }
}

/// An angle in degrees.
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Zeroable, Pod)]
pub struct Degrees(pub f32);

/// An angle in radians.
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Zeroable, Pod)]
pub struct Radians(pub f32);

impl Angle for Degrees {
    fn as_degrees(self) -> Degrees {
        self
    }

    fn as_radians(self) -> Radians {
        Radians(degrees_to_radians(self.0))
    }
}

impl Angle for Radians {
    fn as_degrees(self) -> Degrees {
        Degrees(radians_to_degrees(self.0))
    }

    fn as_radians(self) -> Radians {
        self
    }
}

impl From<Radians> for Degrees {
    fn from(rad: Radians) -> Self {
        rad.as_degrees()
    }
}

impl From<Degrees> for Radians {
    fn from(deg: Degrees) -> Self {
        deg.as_radians()
    }
}

macro_rules! impl_angle_arithmetic {
    ($t:ident) => {
        impl<A: Angle> Add<A> for $t {
            type Output = Self;
            fn add(self, rhs: A) -> Self {
                Self(self.0 + $t::from_angle(rhs).0)
            }
        }

        impl<A: Angle> Sub<A> for $t {
            type Output = Self;
            fn sub(self, rhs: A) -> Self {
                Self(self.0 - $t::from_angle(rhs).0)
            }
        }

        impl Mul<f32> for $t {
            type Output = Self;
            fn mul(self, rhs: f32) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Div<f32> for $t {
            type Output = Self;
            fn div(self, rhs: f32) -> Self {
                Self(self.0 / rhs)
            }
        }

        impl Neg for $t {
            type Output = Self;
            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl_approx_eq!($t, |angle| [angle.0]);
    };
}

impl Degrees {
    fn from_angle<A: Angle>(angle: A) -> Self {
        angle.as_degrees()
    }
}

impl Radians {
    fn from_angle<A: Angle>(angle: A) -> Self {
        angle.as_radians()
    }
}

impl_angle_arithmetic!(Degrees);
impl_angle_arithmetic!(Radians);

pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * (180.0 / PI)
}

pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * (PI / 180.0)
}
