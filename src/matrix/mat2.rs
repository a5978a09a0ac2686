//! 2x2 matrices.

use super::{Derived, Matrix, Variant, private::Sealed, transform_row};
use crate::vector::Vec2;
use std::sync::LazyLock;

/// A 2x2 matrix.
pub type Mat2 = Matrix<Mat2Variant>;

/// Representation of a [`Mat2`].
#[derive(Clone, Debug, PartialEq)]
pub enum Mat2Variant {
    Dense([f32; 4]),
    Identity,
    /// Diagonal matrix with the given rates.
    Scale(Vec2),
    /// Counter-clockwise rotation by the given angle in radians.
    Rotation(f32),
}

static IDENTITY: LazyLock<Mat2> = LazyLock::new(|| Mat2::from_variant(Mat2Variant::Identity));

impl Mat2 {
    /// Creates a matrix scaling x by `x` and y by `y`.
    pub fn scale(x: f32, y: f32) -> Self {
        Self::from_variant(Mat2Variant::Scale(Vec2::new(x, y)))
    }

    /// Creates a matrix scaling each axis by the corresponding component of
    /// `rates`.
    pub fn scale_vec(rates: &Vec2) -> Self {
        Self::from_variant(Mat2Variant::Scale(*rates))
    }

    /// Creates a matrix rotating counter-clockwise by `angle` radians.
    pub fn rotate_2d(angle: f32) -> Self {
        Self::from_variant(Mat2Variant::Rotation(angle))
    }

    /// Creates a matrix whose rows are the given basis vectors, i.e. that
    /// maps the x- and y-axes onto `x` and `y`.
    pub fn basis(x: &Vec2, y: &Vec2) -> Self {
        Self::from_elements([x.x(), x.y(), y.x(), y.y()])
    }
}

impl Sealed for Mat2Variant {}

impl Variant for Mat2Variant {
    const ORDER: usize = 2;
    type Elements = [f32; 4];

    fn identity_matrix() -> Mat2 {
        IDENTITY.clone()
    }

    fn dense(elements: [f32; 4]) -> Self {
        Self::Dense(elements)
    }

    fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    fn elements(&self) -> [f32; 4] {
        match self {
            Self::Dense(elements) => *elements,
            Self::Identity => [1.0, 0.0, 0.0, 1.0],
            Self::Scale(rates) => [rates.x(), 0.0, 0.0, rates.y()],
            Self::Rotation(angle) => {
                let (s, c) = angle.sin_cos();
                [c, s, -s, c]
            }
        }
    }

    fn closed_form_determinant(&self) -> Option<f32> {
        match self {
            Self::Dense(_) => None,
            Self::Identity | Self::Rotation(_) => Some(1.0),
            Self::Scale(rates) => Some(rates.x() * rates.y()),
        }
    }

    fn cofactor_determinant(e: &[f32; 4]) -> f32 {
        e[0] * e[3] - e[2] * e[1]
    }

    fn closed_form_inverse(&self) -> Option<Derived<Self>> {
        match self {
            Self::Dense(_) => None,
            Self::Identity => Some(Derived::Same),
            Self::Scale(rates) => Some(Derived::New(Self::Scale(rates.mapped(f32::recip)))),
            Self::Rotation(angle) => Some(Derived::New(Self::Rotation(-angle))),
        }
    }

    /// Lays the cofactors out as `[e3, -e2, -e1, e0] / det`.
    fn cofactor_inverse(e: &[f32; 4], determinant: f32) -> [f32; 4] {
        let inv_det = determinant.recip();
        [
            e[3] * inv_det,
            -e[2] * inv_det,
            -e[1] * inv_det,
            e[0] * inv_det,
        ]
    }

    fn closed_form_transpose(&self) -> Option<Derived<Self>> {
        match self {
            Self::Dense(_) => None,
            Self::Identity | Self::Scale(_) => Some(Derived::Same),
            Self::Rotation(angle) => Some(Derived::New(Self::Rotation(-angle))),
        }
    }

    fn closed_form_product(lhs: &Self, rhs: &Self) -> Option<Self> {
        match (lhs, rhs) {
            (Self::Scale(a), Self::Scale(b)) => Some(Self::Scale(a.component_mul(b))),
            (Self::Rotation(a), Self::Rotation(b)) => Some(Self::Rotation(a + b)),
            _ => None,
        }
    }
}

impl_binop!(Mul, mul, Mat2, Mat2, Mat2, |a, b| { Mat2::mul(a, b) });

impl_binop!(Mul, mul, Vec2, Mat2, Vec2, |v, m| {
    Vec2::from_array(transform_row(v.to_array(), m.as_slice()))
});

impl_binop_assign!(MulAssign, mul_assign, Vec2, Mat2, |v, m| {
    *v = &*v * m;
});

impl_approx_eq!(Mat2, |m| *m.elements());

#[cfg(test)]
mod tests {
    #![allow(clippy::op_ref)]

    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;

    fn sequential(start: f32) -> Mat2 {
        Mat2::from_elements([start, start + 1.0, start + 2.0, start + 3.0])
    }

    #[test]
    fn identity_has_unit_diagonal() {
        let identity = Mat2::identity();
        assert_eq!(identity.elements(), &[1.0, 0.0, 0.0, 1.0]);
        assert_eq!(identity.determinant(), 1.0);
        assert_eq!(identity.inversed().unwrap(), identity);
        assert_eq!(identity.transposed(), identity);
    }

    #[test]
    fn scale_matrix_has_rates_on_diagonal() {
        let m = Mat2::scale(2.0, 3.0);
        assert_eq!(m.elements(), &[2.0, 0.0, 0.0, 3.0]);
        assert_eq!(Mat2::scale_vec(&Vec2::new(2.0, 3.0)), m);
        assert_eq!(m.determinant(), 6.0);
        assert!(m.transposed().ptr_eq(&m));
        assert_abs_diff_eq!(m.inversed().unwrap(), Mat2::scale(0.5, 1.0 / 3.0));
    }

    #[test]
    fn rotation_matrix_has_expected_elements() {
        let angle = PI / 3.0;
        let (s, c) = angle.sin_cos();
        assert_abs_diff_eq!(
            Mat2::rotate_2d(angle),
            Mat2::from_elements([c, s, -s, c]),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Vec2::right() * Mat2::rotate_2d(PI / 2.0),
            Vec2::up(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn basis_rows_are_given_vectors() {
        let m = Mat2::basis(&Vec2::new(0.0, 1.0), &Vec2::new(1.0, 0.0));
        assert_eq!(m.elements(), &[0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn multiplying_two_matrices_works() {
        let product = sequential(1.0) * sequential(5.0);
        assert_eq!(product.elements(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn multiplying_many_matrices_associates_left_to_right() {
        let [a, b, c, d] = [sequential(1.0), sequential(5.0), sequential(9.0), sequential(13.0)];

        assert_eq!(
            Mat2::mul_all([&a, &b, &c]).elements(),
            &[413.0, 454.0, 937.0, 1030.0]
        );
        assert_eq!(
            Mat2::mul_all([&a, &b, &c, &d]).elements(),
            &[12179.0, 13046.0, 27631.0, 29598.0]
        );
        assert_eq!(&(&a * &b) * &c, Mat2::mul_all([&a, &b, &c]));
    }

    #[test]
    fn structured_products_stay_structured() {
        let scaled = Mat2::scale(2.0, 3.0) * Mat2::scale(4.0, 5.0);
        assert_eq!(scaled.variant(), &Mat2Variant::Scale(Vec2::new(8.0, 15.0)));

        let rotated = Mat2::rotate_2d(0.25) * Mat2::rotate_2d(0.5);
        assert_eq!(rotated.variant(), &Mat2Variant::Rotation(0.75));

        let mixed = Mat2::rotate_2d(0.25) * Mat2::scale(2.0, 2.0);
        assert!(matches!(mixed.variant(), Mat2Variant::Dense(_)));
    }

    #[test]
    fn dense_determinant_and_inverse_work() {
        let m = sequential(1.0);
        assert_eq!(m.determinant(), -2.0);
        assert_abs_diff_eq!(
            m.inversed().unwrap(),
            Mat2::from_elements([-2.0, 1.5, 1.0, -0.5]),
            epsilon = EPSILON
        );
    }

    #[test]
    fn transposing_swaps_off_diagonal() {
        let m = Mat2::from_elements([0.0, 1.0, 2.0, 3.0]);
        assert_eq!(m.transposed().elements(), &[0.0, 2.0, 1.0, 3.0]);
    }

    #[test]
    fn double_inversion_gives_back_matrix() {
        let m = sequential(1.0);
        assert!(m.inversed().unwrap().inversed().unwrap().ptr_eq(&m));
        let scale = Mat2::scale(2.0, 4.0);
        assert!(scale.inversed().unwrap().inversed().unwrap().ptr_eq(&scale));
    }

    #[test]
    fn transforming_row_vector_works() {
        let mut v = Vec2::new(1.0, 2.0);
        assert_eq!(v * sequential(1.0), Vec2::new(7.0, 10.0));
        v *= Mat2::scale(3.0, 0.5);
        assert_eq!(v, Vec2::new(3.0, 1.0));
    }
}
