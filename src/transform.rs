//! Composite transforms.

use crate::{matrix::Mat4, quaternion::Quaternion, vector::Vec3};
use std::sync::OnceLock;

/// A scaling followed by a rotation and then a translation.
///
/// The equivalent [`Mat4`] is computed on first request and kept until one
/// of the parts changes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct Transform {
    translation: Vec3,
    rotation: Quaternion,
    scaling: Vec3,
    #[cfg_attr(feature = "serde", serde(skip))]
    matrix: OnceLock<Mat4>,
}

impl Transform {
    /// Creates the identity transform.
    pub fn identity() -> Self {
        Self::from_parts(Vec3::zeros(), Quaternion::identity(), Vec3::ones())
    }

    /// Creates the transform consisting of the given scaling, rotation and
    /// translation.
    pub fn from_parts(translation: Vec3, rotation: Quaternion, scaling: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scaling,
            matrix: OnceLock::new(),
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_parts(translation, Quaternion::identity(), Vec3::ones())
    }

    pub fn from_rotation(rotation: Quaternion) -> Self {
        Self::from_parts(Vec3::zeros(), rotation, Vec3::ones())
    }

    pub fn from_scaling(scaling: Vec3) -> Self {
        Self::from_parts(Vec3::zeros(), Quaternion::identity(), scaling)
    }

    /// Creates the transform placing an object at `origin` with its forward
    /// direction pointing at `target`. See [`Self::look_at`].
    pub fn looking_at(origin: &Vec3, target: &Vec3, up: &Vec3) -> Self {
        let mut transform = Self::identity();
        transform.look_at(origin, target, up);
        transform
    }

    pub fn translation(&self) -> &Vec3 {
        &self.translation
    }

    pub fn rotation(&self) -> &Quaternion {
        &self.rotation
    }

    pub fn scaling(&self) -> &Vec3 {
        &self.scaling
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.invalidate();
    }

    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.rotation = rotation;
        self.invalidate();
    }

    pub fn set_scaling(&mut self, scaling: Vec3) {
        self.scaling = scaling;
        self.invalidate();
    }

    /// Adds the offset to the translation.
    pub fn translate(&mut self, offset: &Vec3) {
        self.translation += offset;
        self.invalidate();
    }

    /// Multiplies the scaling component-wise by the given rates.
    pub fn scale(&mut self, rates: &Vec3) {
        self.scaling = self.scaling.component_mul(rates);
        self.invalidate();
    }

    /// Applies the given rotation after the current one.
    pub fn rotate(&mut self, rotation: &Quaternion) {
        self.rotation *= rotation;
        self.invalidate();
    }

    /// Moves to `origin` and turns the forward direction towards `target`,
    /// keeping the up direction in the plane of the forward direction and
    /// `up`. Scaling is kept.
    ///
    /// `target` must differ from `origin`, and the direction between them
    /// must not be parallel to `up`. This is not checked.
    pub fn look_at(&mut self, origin: &Vec3, target: &Vec3, up: &Vec3) {
        let forward = (target - origin).normalized();
        self.translation = *origin;
        self.rotation = Quaternion::look_to(&forward, up);
        self.invalidate();
    }

    /// The matrix applying the scaling, then the rotation and then the
    /// translation.
    ///
    /// Parts that do nothing are left out of the product, so e.g. a pure
    /// translation gives a translation matrix.
    pub fn matrix(&self) -> &Mat4 {
        self.matrix.get_or_init(|| {
            log::trace!(
                "Composing transform matrix (translation {:?}, rotation {:?}, scaling {:?})",
                self.translation,
                self.rotation,
                self.scaling
            );

            let scaling = if self.scaling == Vec3::ones() {
                Mat4::identity()
            } else {
                Mat4::scale_vec(&self.scaling)
            };
            let rotation = if self.rotation == Quaternion::identity() {
                Mat4::identity()
            } else {
                self.rotation.to_mat4()
            };
            let translation = if self.translation == Vec3::zeros() {
                Mat4::identity()
            } else {
                Mat4::translate_vec(&self.translation)
            };

            Mat4::mul_all([&scaling, &rotation, &translation])
        })
    }

    /// Applies the transform to a point.
    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        self.transform_vector(point) + self.translation
    }

    /// Applies the transform to a direction, ignoring the translation.
    pub fn transform_vector(&self, vector: &Vec3) -> Vec3 {
        self.rotation.rotate(&self.scaling.component_mul(vector))
    }

    fn invalidate(&mut self) {
        self.matrix.take();
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        self.translation == other.translation
            && self.rotation == other.rotation
            && self.scaling == other.scaling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Mat4Variant;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn identity_transform_gives_identity_matrix() {
        assert!(Transform::identity().matrix().is_identity());
        assert!(Transform::default().matrix().ptr_eq(&Mat4::identity()));
    }

    #[test]
    fn single_part_transforms_give_structured_matrices() {
        let translation = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            translation.matrix().variant(),
            &Mat4Variant::Translation(Vec3::new(1.0, 2.0, 3.0))
        );

        let scaling = Transform::from_scaling(Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(
            scaling.matrix().variant(),
            &Mat4Variant::Scale(Vec3::new(2.0, 3.0, 4.0))
        );
    }

    #[test]
    fn composite_matrix_scales_then_rotates_then_translates() {
        let transform = Transform::from_parts(
            Vec3::new(10.0, 0.0, 0.0),
            Quaternion::from_axis_angle(&Vec3::backward(), PI / 2.0),
            Vec3::new(2.0, 1.0, 1.0),
        );
        let point = Vec3::new(1.0, 0.0, 0.0);
        let expected = Vec3::new(10.0, 2.0, 0.0);

        assert_abs_diff_eq!(
            point.transformed_point(transform.matrix()),
            expected,
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(transform.transform_point(&point), expected, epsilon = EPSILON);
        assert_abs_diff_eq!(
            transform.transform_vector(&point),
            Vec3::new(0.0, 2.0, 0.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn composite_matrix_is_cached_until_a_part_changes() {
        let mut transform = Transform::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let first = transform.matrix().clone();
        assert!(transform.matrix().ptr_eq(&first));

        transform.set_translation(Vec3::new(0.0, 5.0, 0.0));
        assert!(!transform.matrix().ptr_eq(&first));
        assert_eq!(transform.matrix().element(3, 1), 5.0);
    }

    #[test]
    fn each_setter_invalidates_matrix() {
        let mut transform = Transform::identity();

        transform.set_scaling(Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(transform.matrix().element(0, 0), 2.0);

        transform.set_rotation(Quaternion::from_axis_angle(&Vec3::up(), PI));
        assert_abs_diff_eq!(transform.matrix().element(0, 0), -2.0, epsilon = EPSILON);

        transform.set_translation(Vec3::new(0.0, 0.0, 7.0));
        assert_eq!(transform.matrix().element(3, 2), 7.0);
    }

    #[test]
    fn incremental_mutators_accumulate() {
        let mut transform = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        transform.translate(&Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(transform.translation(), &Vec3::new(2.0, 3.0, 4.0));

        transform.scale(&Vec3::new(2.0, 3.0, 4.0));
        transform.scale(&Vec3::new(0.5, 1.0, 2.0));
        assert_eq!(transform.scaling(), &Vec3::new(1.0, 3.0, 8.0));

        let quarter_turn = Quaternion::from_axis_angle(&Vec3::up(), PI / 4.0);
        transform.rotate(&quarter_turn);
        transform.rotate(&quarter_turn);
        assert_abs_diff_eq!(
            transform.rotation().rotate(&Vec3::right()),
            Vec3::forward(),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(transform.matrix().element(3, 0), 2.0, epsilon = EPSILON);
    }

    #[test]
    fn looking_at_target_points_forward_at_it() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let target = Vec3::new(4.0, 2.0, -1.0);
        let transform = Transform::looking_at(&origin, &target, &Vec3::up());

        assert_eq!(transform.translation(), &origin);
        assert_abs_diff_eq!(
            Vec3::forward().transformed_vector(transform.matrix()),
            Vec3::new(0.6, 0.0, -0.8),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Vec3::zeros().transformed_point(transform.matrix()),
            origin,
            epsilon = EPSILON
        );
        // The target lies five units ahead.
        assert_abs_diff_eq!(
            transform.transform_point(&(Vec3::forward() * 5.0)),
            target,
            epsilon = 1e-4
        );
    }

    #[test]
    fn look_at_keeps_scaling() {
        let mut transform = Transform::from_scaling(Vec3::same(3.0));
        transform.look_at(&Vec3::zeros(), &Vec3::right(), &Vec3::up());
        assert_eq!(transform.scaling(), &Vec3::same(3.0));
        assert_abs_diff_eq!(
            Vec3::forward().transformed_vector(transform.matrix()),
            Vec3::new(3.0, 0.0, 0.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn clones_compare_equal_by_parts() {
        let transform = Transform::from_parts(
            Vec3::new(1.0, 2.0, 3.0),
            Quaternion::from_axis_angle(&Vec3::right(), 0.3),
            Vec3::same(2.0),
        );
        transform.matrix();
        assert_eq!(transform.clone(), transform);
    }
}
