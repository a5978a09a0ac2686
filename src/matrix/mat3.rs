//! 3x3 matrices.
//!
//! Besides 3D linear maps, a [`Mat3`] can hold a 2D affine map in
//! homogeneous coordinates, with the translation in the last row.

use super::{
    Axis, Derived, Matrix, Variant, axis_rotation_elements, private::Sealed, transform_row,
};
use crate::vector::{Vec2, Vec3};
use std::sync::LazyLock;

/// A 3x3 matrix.
pub type Mat3 = Matrix<Mat3Variant>;

/// Representation of a [`Mat3`].
#[derive(Clone, Debug, PartialEq)]
pub enum Mat3Variant {
    Dense([f32; 9]),
    Identity,
    /// Diagonal matrix with the given rates.
    Scale(Vec3),
    /// Rotation by `angle` radians about a coordinate axis.
    Rotation { axis: Axis, angle: f32 },
    /// 2D translation in homogeneous coordinates.
    Translation2d(Vec2),
}

static IDENTITY: LazyLock<Mat3> = LazyLock::new(|| Mat3::from_variant(Mat3Variant::Identity));

impl Mat3 {
    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self::from_variant(Mat3Variant::Scale(Vec3::new(x, y, z)))
    }

    pub fn scale_vec(rates: &Vec3) -> Self {
        Self::from_variant(Mat3Variant::Scale(*rates))
    }

    /// Creates a homogeneous 2D scaling matrix (`diag(x, y, 1)`).
    pub fn scale_2d(x: f32, y: f32) -> Self {
        Self::scale(x, y, 1.0)
    }

    pub fn scale_2d_vec(rates: &Vec2) -> Self {
        Self::scale_vec(&rates.to_vec3(1.0))
    }

    pub fn rotate_x(angle: f32) -> Self {
        Self::from_variant(Mat3Variant::Rotation {
            axis: Axis::X,
            angle,
        })
    }

    pub fn rotate_y(angle: f32) -> Self {
        Self::from_variant(Mat3Variant::Rotation {
            axis: Axis::Y,
            angle,
        })
    }

    pub fn rotate_z(angle: f32) -> Self {
        Self::from_variant(Mat3Variant::Rotation {
            axis: Axis::Z,
            angle,
        })
    }

    /// Creates a homogeneous 2D rotation matrix. This is the same as a
    /// rotation about the z-axis.
    pub fn rotate_2d(angle: f32) -> Self {
        Self::rotate_z(angle)
    }

    /// Creates a homogeneous 2D translation matrix.
    pub fn translate_2d(x: f32, y: f32) -> Self {
        Self::from_variant(Mat3Variant::Translation2d(Vec2::new(x, y)))
    }

    pub fn translate_2d_vec(offset: &Vec2) -> Self {
        Self::from_variant(Mat3Variant::Translation2d(*offset))
    }

    /// Creates a matrix whose rows are the given basis vectors. For an
    /// orthonormal basis this is the rotation taking the coordinate axes onto
    /// `x`, `y` and `z`.
    pub fn basis(x: &Vec3, y: &Vec3, z: &Vec3) -> Self {
        Self::from_elements([
            x.x(),
            x.y(),
            x.z(),
            y.x(),
            y.y(),
            y.z(),
            z.x(),
            z.y(),
            z.z(),
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
}

/// Orthonormal rows of the rotation looking along `forward`.
pub(super) fn look_to_basis(forward: &Vec3, up: &Vec3) -> [Vec3; 3] {
    let z = -forward;
    let x = up.cross(&z).normalized();
    let y = z.cross(&x);
    [x, y, z]
}

impl Sealed for Mat3Variant {}

impl Variant for Mat3Variant {
    const ORDER: usize = 3;
    type Elements = [f32; 9];

    fn identity_matrix() -> Mat3 {
        IDENTITY.clone()
    }

    fn dense(elements: [f32; 9]) -> Self {
        Self::Dense(elements)
    }

    fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    fn elements(&self) -> [f32; 9] {
        match self {
            Self::Dense(elements) => *elements,
            Self::Identity => [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            Self::Scale(rates) => [
                rates.x(),
                0.0,
                0.0,
                0.0,
                rates.y(),
                0.0,
                0.0,
                0.0,
                rates.z(),
            ],
            Self::Rotation { axis, angle } => axis_rotation_elements(*axis, *angle),
            Self::Translation2d(offset) => [
                1.0,
                0.0,
                0.0,
                0.0,
                1.0,
                0.0,
                offset.x(),
                offset.y(),
                1.0,
            ],
        }
    }

    fn closed_form_determinant(&self) -> Option<f32> {
        match self {
            Self::Dense(_) => None,
            Self::Identity | Self::Rotation { .. } | Self::Translation2d(_) => Some(1.0),
            Self::Scale(rates) => Some(rates.x() * rates.y() * rates.z()),
        }
    }

    fn cofactor_determinant(e: &[f32; 9]) -> f32 {
        e[0] * e[4] * e[8] + e[3] * e[7] * e[2] + e[6] * e[1] * e[5]
            - e[6] * e[4] * e[2]
            - e[3] * e[1] * e[8]
            - e[0] * e[7] * e[5]
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
            Self::Translation2d(offset) => Some(Derived::New(Self::Translation2d(-offset))),
        }
    }

    fn cofactor_inverse(e: &[f32; 9], determinant: f32) -> [f32; 9] {
        let inv_det = determinant.recip();
        [
            (e[4] * e[8] - e[5] * e[7]) * inv_det,
            -(e[1] * e[8] - e[2] * e[7]) * inv_det,
            (e[1] * e[5] - e[2] * e[4]) * inv_det,
            -(e[3] * e[8] - e[5] * e[6]) * inv_det,
            (e[0] * e[8] - e[2] * e[6]) * inv_det,
            -(e[0] * e[5] - e[2] * e[3]) * inv_det,
            (e[3] * e[7] - e[4] * e[6]) * inv_det,
            -(e[0] * e[7] - e[1] * e[6]) * inv_det,
            (e[0] * e[4] - e[1] * e[3]) * inv_det,
        ]
    }

    fn closed_form_transpose(&self) -> Option<Derived<Self>> {
        match self {
            Self::Dense(_) | Self::Translation2d(_) => None,
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
            (Self::Translation2d(a), Self::Translation2d(b)) => Some(Self::Translation2d(a + b)),
            _ => None,
        }
    }
}

impl_binop!(Mul, mul, Mat3, Mat3, Mat3, |a, b| { Mat3::mul(a, b) });

impl_binop!(Mul, mul, Vec3, Mat3, Vec3, |v, m| {
    Vec3::from_array(transform_row(v.to_array(), m.as_slice()))
});

impl_binop_assign!(MulAssign, mul_assign, Vec3, Mat3, |v, m| {
    *v = &*v * m;
});

impl_approx_eq!(Mat3, |m| *m.elements());

#[cfg(test)]
mod tests {
    #![allow(clippy::op_ref)]

    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;

    fn sequential() -> Mat3 {
        Mat3::from_elements([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0])
    }

    #[test]
    fn identity_has_unit_diagonal() {
        let identity = Mat3::identity();
        assert_eq!(
            identity.elements(),
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );
        assert_eq!(identity.determinant(), 1.0);
    }

    #[test]
    fn scale_matrices_have_rates_on_diagonal() {
        assert_eq!(
            Mat3::scale(2.0, 3.0, 4.0).elements(),
            &[2.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 4.0]
        );
        assert_eq!(Mat3::scale(2.0, 3.0, 4.0).determinant(), 24.0);
        assert_eq!(
            Mat3::scale_2d_vec(&Vec2::new(2.0, 3.0)),
            Mat3::scale(2.0, 3.0, 1.0)
        );
        assert_eq!(Mat3::scale_2d(2.0, 3.0), Mat3::scale(2.0, 3.0, 1.0));
    }

    #[test]
    fn axis_rotations_have_expected_elements() {
        let angle = PI / 3.0;
        let (s, c) = angle.sin_cos();
        assert_abs_diff_eq!(
            Mat3::rotate_x(angle),
            Mat3::from_elements([1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c]),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Mat3::rotate_y(angle),
            Mat3::from_elements([c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c]),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Mat3::rotate_z(angle),
            Mat3::from_elements([c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0]),
            epsilon = EPSILON
        );
        assert_eq!(Mat3::rotate_2d(angle), Mat3::rotate_z(angle));
    }

    #[test]
    fn axis_rotations_turn_axes_right_handedly() {
        let quarter = PI / 2.0;
        assert_abs_diff_eq!(
            Vec3::up() * Mat3::rotate_x(quarter),
            Vec3::backward(),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Vec3::right() * Mat3::rotate_y(quarter),
            Vec3::forward(),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Vec3::right() * Mat3::rotate_z(quarter),
            Vec3::up(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn translation_2d_moves_homogeneous_points() {
        let m = Mat3::translate_2d(4.0, 5.0);
        assert_eq!(m.elements(), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 4.0, 5.0, 1.0]);
        assert_eq!(Mat3::translate_2d_vec(&Vec2::new(4.0, 5.0)), m);
        assert_eq!(Vec3::new(1.0, 2.0, 1.0) * &m, Vec3::new(5.0, 7.0, 1.0));
        assert_eq!(Vec3::new(1.0, 2.0, 0.0) * &m, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(
            m.inversed().unwrap().variant(),
            &Mat3Variant::Translation2d(Vec2::new(-4.0, -5.0))
        );
    }

    #[test]
    fn translation_2d_transpose_is_dense() {
        let transposed = Mat3::translate_2d(4.0, 5.0).transposed();
        assert!(matches!(transposed.variant(), Mat3Variant::Dense(_)));
        assert_eq!(
            transposed.elements(),
            &[1.0, 0.0, 4.0, 0.0, 1.0, 5.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn composing_2d_transforms_applies_left_operand_first() {
        let m = Mat3::mul_all([
            &Mat3::scale_2d(2.0, 2.0),
            &Mat3::rotate_2d(PI / 2.0),
            &Mat3::translate_2d(1.0, 0.0),
        ]);
        assert_abs_diff_eq!(
            Vec3::new(1.0, 0.0, 1.0) * &m,
            Vec3::new(1.0, 2.0, 1.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn row_vector_times_matrix_works() {
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v * sequential(), Vec3::new(30.0, 36.0, 42.0));
        v *= Mat3::scale(2.0, 1.0, 0.5);
        assert_eq!(v, Vec3::new(2.0, 2.0, 1.5));
    }

    #[test]
    fn same_axis_rotations_combine_into_rotation() {
        let m = Mat3::rotate_x(0.5) * Mat3::rotate_x(0.25);
        assert_eq!(
            m.variant(),
            &Mat3Variant::Rotation {
                axis: Axis::X,
                angle: 0.75
            }
        );
        let m = Mat3::rotate_x(0.5) * Mat3::rotate_y(0.25);
        assert!(matches!(m.variant(), Mat3Variant::Dense(_)));
    }

    #[test]
    fn dense_determinant_uses_cofactor_expansion() {
        assert_eq!(sequential().determinant(), 0.0);
        let m = Mat3::from_elements([1.0, 2.0, 3.0, 0.0, 1.0, 4.0, 5.0, 6.0, 0.0]);
        assert_abs_diff_eq!(m.determinant(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn dense_inverse_works() {
        let m = Mat3::from_elements([1.0, 2.0, 3.0, 0.0, 1.0, 4.0, 5.0, 6.0, 0.0]);
        assert_abs_diff_eq!(
            m.inversed().unwrap(),
            Mat3::from_elements([-24.0, 18.0, 5.0, 20.0, -15.0, -4.0, -5.0, 4.0, 1.0]),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            &m * m.inversed().unwrap(),
            Mat3::identity(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn look_to_maps_forward_onto_given_direction() {
        for direction in [Vec3::right(), Vec3::left(), Vec3::backward(), Vec3::forward()] {
            let m = Mat3::look_to(&direction, &Vec3::up());
            assert_abs_diff_eq!(Vec3::forward() * &m, direction, epsilon = EPSILON);
            assert_abs_diff_eq!(Vec3::up() * &m, Vec3::up(), epsilon = EPSILON);
            assert_abs_diff_eq!(m.determinant(), 1.0, epsilon = EPSILON);
        }
    }
}
