use glam::{Mat4, Vec3};

/// Camera orbiting the origin on a sphere, Z up.
///
/// Elevation and azimuth follow the usual plotting convention: azimuth is
/// measured around +Z starting from +X, elevation is the angle above the XY
/// plane.
pub struct OrbitCamera {
    pub elevation_deg: f32,
    pub azimuth_deg: f32,
    /// Distance from the origin (world units).
    pub distance: f32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            elevation_deg: 20.0,
            azimuth_deg: 170.0,
            // Fits the [-1, 1] cube at this field of view.
            distance: 6.0,
            fov_y_degrees: 35.0,
            aspect_ratio: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Camera position in world space.
    pub fn eye(&self) -> Vec3 {
        // Straight up or down would make the Z up vector degenerate.
        let elevation = self.elevation_deg.clamp(-89.0, 89.0).to_radians();
        let azimuth = self.azimuth_deg.to_radians();
        self.distance
            * Vec3::new(
                elevation.cos() * azimuth.cos(),
                elevation.cos() * azimuth.sin(),
                elevation.sin(),
            )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Z)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_angles_look_from_positive_x() {
        let camera = OrbitCamera {
            elevation_deg: 0.0,
            azimuth_deg: 0.0,
            ..OrbitCamera::new()
        };
        assert!(camera.eye().abs_diff_eq(Vec3::new(6.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn default_view_is_above_and_behind() {
        let eye = OrbitCamera::new().eye();
        assert!(eye.z > 0.0);
        assert!(eye.x < 0.0);
        assert!((eye.length() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn origin_lies_straight_ahead() {
        let camera = OrbitCamera::new();
        let origin = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(0.0, 0.0, -6.0), 1e-4));
    }

    #[test]
    fn elevation_is_clamped_at_the_pole() {
        let camera = OrbitCamera {
            elevation_deg: 90.0,
            ..OrbitCamera::new()
        };
        assert!(camera.view_matrix().is_finite());
    }
}
