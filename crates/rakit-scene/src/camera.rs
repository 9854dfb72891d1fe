//! Orbit camera and bounds framing.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;

/// Extra room around the fitted object.
const FIT_MARGIN: f32 = 1.05 * 1.2;

/// Camera settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Target point the camera is looking at.
    pub target: Vec3,
    /// Distance from target.
    pub distance: f32,
    /// Azimuth angle (horizontal rotation).
    pub azimuth: f32,
    /// Elevation angle (vertical rotation).
    pub elevation: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Closest distance [`Camera::fit_to_bounds`] will choose.
    pub min_distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 8.0,
            azimuth: 0.0,
            elevation: 0.0,
            fov: 60.0,
            near: 0.1,
            far: 1000.0,
            min_distance: 4.0,
        }
    }
}

impl Camera {
    /// Get the camera position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.elevation.cos() * self.azimuth.sin();
        let y = self.distance * self.elevation.sin();
        let z = self.distance * self.elevation.cos() * self.azimuth.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Look at the centre of `bounds` from far enough to see its largest side.
    ///
    /// The camera keeps its orbit angles; only target and distance change.
    pub fn fit_to_bounds(&mut self, bounds: &BoundingBox) {
        let size = bounds.size();
        let max_dim = size.x.max(size.y).max(size.z);
        let half_fov = self.fov.to_radians() * 0.5;
        let fitted = (max_dim * 0.5) / half_fov.tan() * FIT_MARGIN;

        self.target = bounds.center();
        self.distance = fitted.max(self.min_distance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_looks_down_negative_z() {
        let camera = Camera::default();
        let pos = camera.position();
        assert!((pos - Vec3::new(0.0, 0.0, 8.0)).length() < 1e-5);
    }

    #[test]
    fn test_view_matrix_moves_target_in_front() {
        let mut camera = Camera::default();
        camera.target = Vec3::new(0.0, 1.0, 0.0);
        let eye_space = camera.view_matrix().transform_point3(camera.target);
        assert!((eye_space - Vec3::new(0.0, 0.0, -8.0)).length() < 1e-4);
    }

    #[test]
    fn test_fit_small_object_respects_min_distance() {
        let mut camera = Camera::default();
        let bounds = BoundingBox::new(Vec3::new(-0.5, 0.0, -0.25), Vec3::new(0.5, 1.5, 0.25));
        camera.fit_to_bounds(&bounds);

        assert_eq!(camera.distance, 4.0);
        assert!((camera.target - Vec3::new(0.0, 0.75, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_fit_large_object() {
        let mut camera = Camera::default();
        let bounds = BoundingBox::from_center_size(Vec3::ZERO, Vec3::new(10.0, 2.0, 1.0));
        camera.fit_to_bounds(&bounds);

        // 5 / tan(30°) * 1.26
        let expected = 5.0 / 30.0_f32.to_radians().tan() * 1.26;
        assert!((camera.distance - expected).abs() < 1e-3);
        assert!(camera.position().z > 10.0);
    }
}
