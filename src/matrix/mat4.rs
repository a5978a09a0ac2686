//! 4x4 matrices for 3D affine maps and projections.

use super::{
    Axis, Derived, Matrix, Variant, axis_rotation_elements, mat3::look_to_basis,
    private::Sealed, transform_row,
};
use crate::{
    angle::Angle,
    error::Result,
    vector::{Vec3, Vec4},
};
use std::sync::LazyLock;

/// A 4x4 matrix.
pub type Mat4 = Matrix<Mat4Variant>;

/// Representation of a [`Mat4`].
#[derive(Clone, Debug, PartialEq)]
pub enum Mat4Variant {
    Dense([f32; 16]),
    Identity,
    /// Diagonal matrix scaling the three spatial axes.
    Scale(Vec3),
    /// Rotation by `angle` radians about a coordinate axis.
    Rotation { axis: Axis, angle: f32 },
    /// Translation by the given offset, stored in the last row.
    Translation(Vec3),
}

static IDENTITY: LazyLock<Mat4> = LazyLock::new(|| Mat4::from_variant(Mat4Variant::Identity));

impl Mat4 {
    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self::from_variant(Mat4Variant::Scale(Vec3::new(x, y, z)))
    }

    pub fn scale_vec(rates: &Vec3) -> Self {
        Self::from_variant(Mat4Variant::Scale(*rates))
    }

    pub fn rotate_x(angle: f32) -> Self {
        Self::from_variant(Mat4Variant::Rotation {
            axis: Axis::X,
            angle,
        })
    }

    pub fn rotate_y(angle: f32) -> Self {
        Self::from_variant(Mat4Variant::Rotation {
            axis: Axis::Y,
            angle,
        })
    }

    pub fn rotate_z(angle: f32) -> Self {
        Self::from_variant(Mat4Variant::Rotation {
            axis: Axis::Z,
            angle,
        })
    }

    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        Self::from_variant(Mat4Variant::Translation(Vec3::new(x, y, z)))
    }

    pub fn translate_vec(offset: &Vec3) -> Self {
        Self::from_variant(Mat4Variant::Translation(*offset))
    }

    /// Creates a rotation matrix whose first three rows are the given basis
    /// vectors.
    pub fn basis(x: &Vec3, y: &Vec3, z: &Vec3) -> Self {
        Self::from_elements([
            x.x(),
            x.y(),
            x.z(),
            0.0,
            y.x(),
            y.y(),
            y.z(),
            0.0,
            z.x(),
            z.y(),
            z.z(),
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// Creates the rotation that turns the local forward direction (negative
    /// z) into `forward` while keeping the local up direction in the plane of
    /// `forward` and `up`.
    ///
    /// `forward` must be normalized and not parallel to `up`. This is not
    /// checked.
    pub fn look_to(forward: &Vec3, up: &Vec3) -> Self {
        let [x, y, z] = look_to_basis(forward, up);
        Self::basis(&x, &y, &z)
    }

    /// Creates a perspective projection for a right-handed view space where
    /// the camera looks down the negative z-axis.
    ///
    /// The view frustum is mapped onto the cube `[-1, 1]^3` after the
    /// perspective divide, with the near plane at z = -1 and the far plane at
    /// z = 1.
    pub fn perspective<A: Angle>(
        aspect_ratio: f32,
        vertical_field_of_view: A,
        near: f32,
        far: f32,
    ) -> Self {
        let top = near * (0.5 * vertical_field_of_view.radians()).tan();
        let right = aspect_ratio * top;
        let depth = far - near;
        Self::from_elements([
            near / right,
            0.0,
            0.0,
            0.0,
            0.0,
            near / top,
            0.0,
            0.0,
            0.0,
            0.0,
            -(far + near) / depth,
            -1.0,
            0.0,
            0.0,
            -2.0 * far * near / depth,
            0.0,
        ])
    }

    /// Creates an orthographic projection of a box of the given width and
    /// height centered on the negative z-axis between `near` and `far`.
    pub fn orthographic(width: f32, height: f32, near: f32, far: f32) -> Self {
        let depth = far - near;
        Self::from_elements([
            2.0 / width,
            0.0,
            0.0,
            0.0,
            0.0,
            2.0 / height,
            0.0,
            0.0,
            0.0,
            0.0,
            -2.0 / depth,
            0.0,
            0.0,
            0.0,
            -(far + near) / depth,
            1.0,
        ])
    }

    /// The matrix for transforming surface normals, which is the transpose of
    /// the inverse. Cached along with the inverse.
    ///
    /// # Errors
    /// Returns [`MathError::SingularMatrix`](crate::error::MathError) if the
    /// matrix is not invertible.
    pub fn normal(&self) -> Result<Self> {
        Ok(self.inversed()?.transposed())
    }
}

impl Vec3 {
    /// Transforms the point by the given matrix, dividing by the resulting
    /// w-component.
    pub fn transformed_point(&self, matrix: &Mat4) -> Self {
        let transformed = &self.to_vec4(1.0) * matrix;
        transformed.to_vec3() / transformed.w()
    }

    /// Transforms the direction by the given matrix, ignoring translation.
    pub fn transformed_vector(&self, matrix: &Mat4) -> Self {
        (&self.to_vec4(0.0) * matrix).to_vec3()
    }
}

impl Sealed for Mat4Variant {}

impl Variant for Mat4Variant {
    const ORDER: usize = 4;
    type Elements = [f32; 16];

    fn identity_matrix() -> Mat4 {
        IDENTITY.clone()
    }

    fn dense(elements: [f32; 16]) -> Self {
        Self::Dense(elements)
    }

    fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    fn elements(&self) -> [f32; 16] {
        let mut elements = [0.0; 16];
        for diagonal in [0, 5, 10, 15] {
            elements[diagonal] = 1.0;
        }
        match self {
            Self::Dense(dense) => return *dense,
            Self::Identity => {}
            Self::Scale(rates) => {
                elements[0] = rates.x();
                elements[5] = rates.y();
                elements[10] = rates.z();
            }
            Self::Rotation { axis, angle } => {
                let rotation = axis_rotation_elements(*axis, *angle);
                for (row, rotation_row) in rotation.chunks_exact(3).enumerate() {
                    elements[row * 4..row * 4 + 3].copy_from_slice(rotation_row);
                }
            }
            Self::Translation(offset) => {
                elements[12] = offset.x();
                elements[13] = offset.y();
                elements[14] = offset.z();
            }
        }
        elements
    }

    fn closed_form_determinant(&self) -> Option<f32> {
        match self {
            Self::Dense(_) => None,
            Self::Identity | Self::Rotation { .. } | Self::Translation(_) => Some(1.0),
            Self::Scale(rates) => Some(rates.x() * rates.y() * rates.z()),
        }
    }

    fn cofactor_determinant(e: &[f32; 16]) -> f32 {
        Minors::new(e).determinant()
    }

    fn closed_form_inverse(&self) -> Option<Derived<Self>> {
        match self {
            Self::Dense(_) => None,
            Self::Identity => Some(Derived::Same),
            Self::Scale(rates) => Some(Derived::New(Self::Scale(rates.mapped(f32::recip)))),
            Self::Rotation { axis, angle } => Some(Derived::New(Self::Rotation {
                axis: *axis,
                angle: -angle,
            })),
            Self::Translation(offset) => Some(Derived::New(Self::Translation(-offset))),
        }
    }

    fn cofactor_inverse(e: &[f32; 16], determinant: f32) -> [f32; 16] {
        let Minors { lower, upper } = Minors::new(e);
        let [b00, b01, b02, b03, b04, b05] = upper;
        let [b06, b07, b08, b09, b10, b11] = lower;
        let inv_det = determinant.recip();
        [
            (e[5] * b11 - e[6] * b10 + e[7] * b09) * inv_det,
            (e[2] * b10 - e[1] * b11 - e[3] * b09) * inv_det,
            (e[13] * b05 - e[14] * b04 + e[15] * b03) * inv_det,
            (e[10] * b04 - e[9] * b05 - e[11] * b03) * inv_det,
            (e[6] * b08 - e[4] * b11 - e[7] * b07) * inv_det,
            (e[0] * b11 - e[2] * b08 + e[3] * b07) * inv_det,
            (e[14] * b02 - e[12] * b05 - e[15] * b01) * inv_det,
            (e[8] * b05 - e[10] * b02 + e[11] * b01) * inv_det,
            (e[4] * b10 - e[5] * b08 + e[7] * b06) * inv_det,
            (e[1] * b08 - e[0] * b10 - e[3] * b06) * inv_det,
            (e[12] * b04 - e[13] * b02 + e[15] * b00) * inv_det,
            (e[9] * b02 - e[8] * b04 - e[11] * b00) * inv_det,
            (e[5] * b07 - e[4] * b09 - e[6] * b06) * inv_det,
            (e[0] * b09 - e[1] * b07 + e[2] * b06) * inv_det,
            (e[13] * b01 - e[12] * b03 - e[14] * b00) * inv_det,
            (e[8] * b03 - e[9] * b01 + e[10] * b00) * inv_det,
        ]
    }

    fn closed_form_transpose(&self) -> Option<Derived<Self>> {
        match self {
            Self::Dense(_) | Self::Translation(_) => None,
            Self::Identity | Self::Scale(_) => Some(Derived::Same),
            Self::Rotation { axis, angle } => Some(Derived::New(Self::Rotation {
                axis: *axis,
                angle: -angle,
            })),
        }
    }

    fn closed_form_product(lhs: &Self, rhs: &Self) -> Option<Self> {
        match (lhs, rhs) {
            (Self::Scale(a), Self::Scale(b)) => Some(Self::Scale(a.component_mul(b))),
            (
                Self::Rotation {
                    axis: axis_a,
                    angle: a,
                },
                Self::Rotation {
                    axis: axis_b,
                    angle: b,
                },
            ) if axis_a == axis_b => Some(Self::Rotation {
                axis: *axis_a,
                angle: a + b,
            }),
            (Self::Translation(a), Self::Translation(b)) => Some(Self::Translation(a + b)),
            _ => None,
        }
    }
}

/// 2x2 minors of the upper two and lower two rows, shared between the
/// determinant and the inverse.
struct Minors {
    upper: [f32; 6],
    lower: [f32; 6],
}

impl Minors {
    fn new(e: &[f32; 16]) -> Self {
        let pair_minors = |row: usize| {
            let (a, b) = (&e[row * 4..row * 4 + 4], &e[row * 4 + 4..row * 4 + 8]);
            [
                a[0] * b[1] - a[1] * b[0],
                a[0] * b[2] - a[2] * b[0],
                a[0] * b[3] - a[3] * b[0],
                a[1] * b[2] - a[2] * b[1],
                a[1] * b[3] - a[3] * b[1],
                a[2] * b[3] - a[3] * b[2],
            ]
        };
        Self {
            upper: pair_minors(0),
            lower: pair_minors(2),
        }
    }

    fn determinant(&self) -> f32 {
        let [b00, b01, b02, b03, b04, b05] = self.upper;
        let [b06, b07, b08, b09, b10, b11] = self.lower;
        b00 * b11 - b01 * b10 + b02 * b09 + b03 * b08 - b04 * b07 + b05 * b06
    }
}

impl_binop!(Mul, mul, Mat4, Mat4, Mat4, |a, b| { Mat4::mul(a, b) });

impl_binop!(Mul, mul, Vec4, Mat4, Vec4, |v, m| {
    Vec4::from_array(transform_row(v.to_array(), m.as_slice()))
});

impl_binop_assign!(MulAssign, mul_assign, Vec4, Mat4, |v, m| {
    *v = &*v * m;
});

impl_approx_eq!(Mat4, |m| *m.elements());
