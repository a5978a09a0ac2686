//! Cameras.

use approx::assert_abs_diff_ne;
use render_math::{
    Result,
    angle::{Angle, Degrees},
    matrix::Mat4,
    transform::Transform,
};
use std::{fmt::Debug, sync::OnceLock};

/// Represents a 3D camera.
///
/// The camera looks down its local negative z-axis, and its [`Transform`]
/// places it in the world. The view matrix is the inverse of that transform.
pub trait Camera: Debug + Send + Sync + 'static {
    /// Returns the transform placing the camera in the world.
    fn transform(&self) -> &Transform;

    /// Returns the transform placing the camera in the world for modification.
    fn transform_mut(&mut self) -> &mut Transform;

    /// Returns the matrix projecting view space onto the clip cube.
    fn projection_matrix(&self) -> &Mat4;

    /// Returns the matrix taking world space to view space.
    ///
    /// # Errors
    /// Returns an error if the camera transform is not invertible (for
    /// example because of a zero scaling).
    fn view_matrix(&self) -> Result<Mat4> {
        self.transform().matrix().inversed()
    }

    /// Returns the matrix taking world space to clip space, i.e. the view
    /// matrix followed by the projection matrix.
    ///
    /// # Errors
    /// See [`Self::view_matrix`].
    fn view_projection_matrix(&self) -> Result<Mat4>;

    /// Returns the ratio of width to height of the camera's view plane.
    fn aspect_ratio(&self) -> f32;

    /// Sets the ratio of width to height of the camera's view plane.
    ///
    /// # Panics
    /// If `aspect_ratio` is zero.
    fn set_aspect_ratio(&mut self, aspect_ratio: f32);
}

/// 3D camera using a perspective transformation.
#[derive(Debug)]
pub struct PerspectiveCamera {
    transform: Transform,
    aspect_ratio: f32,
    vertical_field_of_view: Degrees,
    near_distance: f32,
    far_distance: f32,
    matrices: CachedMatrices,
}

/// 3D camera using an orthographic transformation.
#[derive(Debug)]
pub struct OrthographicCamera {
    transform: Transform,
    width: f32,
    height: f32,
    near_distance: f32,
    far_distance: f32,
    matrices: CachedMatrices,
}

/// Lazily computed matrices shared by both camera kinds. The view matrix is
/// not stored here since the transform already caches its own inverse.
#[derive(Debug, Default)]
struct CachedMatrices {
    projection: OnceLock<Mat4>,
    view_projection: OnceLock<Mat4>,
}

impl PerspectiveCamera {
    /// Creates a new perspective camera at the origin, looking down the
    /// negative z-axis.
    ///
    /// # Panics
    /// If `aspect_ratio` or `vertical_field_of_view` is zero, or if `near`
    /// is not smaller than `far`.
    pub fn new<A: Angle>(aspect_ratio: f32, vertical_field_of_view: A, near: f32, far: f32) -> Self {
        let vertical_field_of_view = vertical_field_of_view.as_degrees();
        assert_abs_diff_ne!(aspect_ratio, 0.0);
        assert_abs_diff_ne!(vertical_field_of_view.0, 0.0);
        assert!(near < far, "near distance {near} not below far distance {far}");
        Self {
            transform: Transform::identity(),
            aspect_ratio,
            vertical_field_of_view,
            near_distance: near,
            far_distance: far,
            matrices: CachedMatrices::default(),
        }
    }

    pub fn vertical_field_of_view(&self) -> Degrees {
        self.vertical_field_of_view
    }

    pub fn near_distance(&self) -> f32 {
        self.near_distance
    }

    pub fn far_distance(&self) -> f32 {
        self.far_distance
    }

    /// Sets the vertical field of view angle.
    ///
    /// # Panics
    /// If `fov` is zero.
    pub fn set_vertical_field_of_view<A: Angle>(&mut self, fov: A) {
        let fov = fov.as_degrees();
        assert_abs_diff_ne!(fov.0, 0.0);
        self.vertical_field_of_view = fov;
        self.matrices.invalidate_projection();
    }

    /// # Panics
    /// If `near` is not smaller than `far`.
    pub fn set_near_and_far_distance(&mut self, near: f32, far: f32) {
        assert!(near < far, "near distance {near} not below far distance {far}");
        self.near_distance = near;
        self.far_distance = far;
        self.matrices.invalidate_projection();
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(1.77777, Degrees(60.0), 0.1, 1000.0)
    }
}

impl Camera for PerspectiveCamera {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        self.matrices.invalidate_view();
        &mut self.transform
    }

    fn projection_matrix(&self) -> &Mat4 {
        self.matrices.projection(|| {
            Mat4::perspective(
                self.aspect_ratio,
                self.vertical_field_of_view,
                self.near_distance,
                self.far_distance,
            )
        })
    }

    fn view_projection_matrix(&self) -> Result<Mat4> {
        self.matrices
            .view_projection(|| Ok(Mat4::mul(&self.view_matrix()?, self.projection_matrix())))
    }

    fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        assert_abs_diff_ne!(aspect_ratio, 0.0);
        self.aspect_ratio = aspect_ratio;
        self.matrices.invalidate_projection();
    }
}

impl OrthographicCamera {
    /// Creates a new orthographic camera at the origin viewing a box of the
    /// given width and height along the negative z-axis.
    ///
    /// # Panics
    /// If `width` or `height` is zero, or if `near` is not smaller than
    /// `far`.
    pub fn new(width: f32, height: f32, near: f32, far: f32) -> Self {
        assert_abs_diff_ne!(width, 0.0);
        assert_abs_diff_ne!(height, 0.0);
        assert!(near < far, "near distance {near} not below far distance {far}");
        Self {
            transform: Transform::identity(),
            width,
            height,
            near_distance: near,
            far_distance: far,
            matrices: CachedMatrices::default(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn near_distance(&self) -> f32 {
        self.near_distance
    }

    pub fn far_distance(&self) -> f32 {
        self.far_distance
    }

    /// # Panics
    /// If `width` or `height` is zero.
    pub fn set_size(&mut self, width: f32, height: f32) {
        assert_abs_diff_ne!(width, 0.0);
        assert_abs_diff_ne!(height, 0.0);
        self.width = width;
        self.height = height;
        self.matrices.invalidate_projection();
    }

    /// # Panics
    /// If `near` is not smaller than `far`.
    pub fn set_near_and_far_distance(&mut self, near: f32, far: f32) {
        assert!(near < far, "near distance {near} not below far distance {far}");
        self.near_distance = near;
        self.far_distance = far;
        self.matrices.invalidate_projection();
    }
}

impl Default for OrthographicCamera {
    fn default() -> Self {
        Self::new(100.0, 100.0, 0.1, 1000.0)
    }
}

impl Camera for OrthographicCamera {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        self.matrices.invalidate_view();
        &mut self.transform
    }

    fn projection_matrix(&self) -> &Mat4 {
        self.matrices.projection(|| {
            Mat4::orthographic(
                self.width,
                self.height,
                self.near_distance,
                self.far_distance,
            )
        })
    }

    fn view_projection_matrix(&self) -> Result<Mat4> {
        self.matrices
            .view_projection(|| Ok(Mat4::mul(&self.view_matrix()?, self.projection_matrix())))
    }

    fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    /// Keeps the height and adjusts the width.
    fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        assert_abs_diff_ne!(aspect_ratio, 0.0);
        self.width = aspect_ratio * self.height;
        self.matrices.invalidate_projection();
    }
}

impl CachedMatrices {
    fn projection(&self, compute: impl FnOnce() -> Mat4) -> &Mat4 {
        self.projection.get_or_init(|| {
            log::trace!("Computing camera projection matrix");
            compute()
        })
    }

    fn view_projection(&self, compute: impl FnOnce() -> Result<Mat4>) -> Result<Mat4> {
        if let Some(matrix) = self.view_projection.get() {
            return Ok(matrix.clone());
        }
        log::trace!("Computing camera view-projection matrix");
        let matrix = compute()?;
        Ok(self.view_projection.get_or_init(|| matrix).clone())
    }

    fn invalidate_projection(&mut self) {
        self.projection.take();
        self.view_projection.take();
    }

    fn invalidate_view(&mut self) {
        self.view_projection.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use render_math::{quaternion::Quaternion, vector::Vec3};
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn default_perspective_camera_has_expected_parameters() {
        let camera = PerspectiveCamera::default();
        assert_abs_diff_eq!(camera.aspect_ratio(), 1.77777);
        assert_abs_diff_eq!(camera.vertical_field_of_view(), Degrees(60.0));
        assert_abs_diff_eq!(camera.near_distance(), 0.1);
        assert_abs_diff_eq!(camera.far_distance(), 1000.0);
        assert!(camera.transform().matrix().is_identity());
    }

    #[test]
    fn default_orthographic_camera_has_expected_parameters() {
        let camera = OrthographicCamera::default();
        assert_abs_diff_eq!(camera.width(), 100.0);
        assert_abs_diff_eq!(camera.height(), 100.0);
        assert_abs_diff_eq!(camera.aspect_ratio(), 1.0);
        assert_abs_diff_eq!(camera.near_distance(), 0.1);
        assert_abs_diff_eq!(camera.far_distance(), 1000.0);
    }

    #[test]
    #[should_panic]
    fn constructing_perspective_camera_with_zero_aspect_ratio() {
        PerspectiveCamera::new(0.0, Degrees(45.0), 0.1, 100.0);
    }

    #[test]
    #[should_panic]
    fn constructing_perspective_camera_with_zero_vertical_fov() {
        PerspectiveCamera::new(1.0, Degrees(0.0), 0.1, 100.0);
    }

    #[test]
    #[should_panic]
    fn constructing_orthographic_camera_with_near_beyond_far() {
        OrthographicCamera::new(1.0, 1.0, 10.0, 1.0);
    }

    #[test]
    fn perspective_projection_matches_matrix_constructor() {
        let camera = PerspectiveCamera::new(1.5, Degrees(45.0), 0.5, 20.0);
        assert_eq!(
            camera.projection_matrix(),
            &Mat4::perspective(1.5, Degrees(45.0), 0.5, 20.0)
        );
    }

    #[test]
    fn projection_matrix_is_cached_until_parameters_change() {
        let mut camera = PerspectiveCamera::default();
        let projection = camera.projection_matrix().clone();
        assert!(camera.projection_matrix().ptr_eq(&projection));

        camera.set_aspect_ratio(1.0);
        assert!(!camera.projection_matrix().ptr_eq(&projection));
        assert_eq!(
            camera.projection_matrix(),
            &Mat4::perspective(1.0, Degrees(60.0), 0.1, 1000.0)
        );

        let projection = camera.projection_matrix().clone();
        camera.set_vertical_field_of_view(Degrees(90.0));
        assert!(!camera.projection_matrix().ptr_eq(&projection));
        assert_abs_diff_eq!(camera.vertical_field_of_view(), Degrees(90.0));

        let projection = camera.projection_matrix().clone();
        camera.set_near_and_far_distance(1.0, 10.0);
        assert!(!camera.projection_matrix().ptr_eq(&projection));
    }

    #[test]
    fn view_matrix_is_inverse_of_camera_transform() {
        let mut camera = PerspectiveCamera::default();
        camera
            .transform_mut()
            .set_translation(Vec3::new(0.0, 0.0, 5.0));

        let view = camera.view_matrix().unwrap();
        assert_abs_diff_eq!(
            Vec3::zeros().transformed_point(&view),
            Vec3::new(0.0, 0.0, -5.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn view_matrix_of_rotated_camera_turns_view_direction_forward() {
        let mut camera = OrthographicCamera::default();
        camera
            .transform_mut()
            .set_rotation(Quaternion::from_axis_angle(&Vec3::up(), PI / 2.0));

        // The camera now looks along negative x.
        let view = camera.view_matrix().unwrap();
        assert_abs_diff_eq!(
            Vec3::left().transformed_vector(&view),
            Vec3::forward(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn view_projection_applies_view_then_projection() {
        let mut camera = PerspectiveCamera::new(1.0, Degrees(90.0), 1.0, 10.0);
        camera
            .transform_mut()
            .look_at(&Vec3::new(0.0, 0.0, 5.0), &Vec3::zeros(), &Vec3::up());

        let view_projection = camera.view_projection_matrix().unwrap();
        assert_abs_diff_eq!(
            view_projection,
            Mat4::mul(&camera.view_matrix().unwrap(), camera.projection_matrix()),
            epsilon = EPSILON
        );

        // The world origin is straight ahead, inside the frustum.
        let clip = Vec3::zeros().transformed_point(&view_projection);
        assert_abs_diff_eq!(clip.x(), 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(clip.y(), 0.0, epsilon = EPSILON);
        assert!(clip.z() > -1.0 && clip.z() < 1.0);
    }

    #[test]
    fn modifying_transform_invalidates_view_projection() {
        let mut camera = OrthographicCamera::new(4.0, 4.0, 0.5, 10.0);
        let before = camera.view_projection_matrix().unwrap();
        assert!(camera.view_projection_matrix().unwrap().ptr_eq(&before));

        camera.transform_mut().translate(&Vec3::new(1.0, 0.0, 0.0));
        let after = camera.view_projection_matrix().unwrap();
        assert!(!after.ptr_eq(&before));
        assert_abs_diff_eq!(
            Vec3::new(1.0, 0.0, -1.0).transformed_point(&after).x(),
            0.0,
            epsilon = EPSILON
        );
    }

    #[test]
    fn singular_camera_transform_gives_error() {
        let mut camera = PerspectiveCamera::default();
        camera.transform_mut().set_scaling(Vec3::zeros());
        assert!(camera.view_matrix().is_err());
        assert!(camera.view_projection_matrix().is_err());
    }

    #[test]
    fn setting_orthographic_aspect_ratio_keeps_height() {
        let mut camera = OrthographicCamera::new(4.0, 2.0, 0.5, 10.0);
        assert_abs_diff_eq!(camera.aspect_ratio(), 2.0);

        camera.set_aspect_ratio(3.0);
        assert_abs_diff_eq!(camera.width(), 6.0);
        assert_abs_diff_eq!(camera.height(), 2.0);
        assert_eq!(
            camera.projection_matrix(),
            &Mat4::orthographic(6.0, 2.0, 0.5, 10.0)
        );

        camera.set_size(1.0, 1.0);
        assert_abs_diff_eq!(camera.aspect_ratio(), 1.0);
    }
}
