use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Fixed chase camera behind the player, looking down the corridor (-z).
///
/// Pointer slicing is resolved by casting a ray from this camera, so the
/// camera is part of gameplay and lives next to the other shared types.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub eye: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 8.0),
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn with_aspect(aspect: f32) -> Self {
        Self {
            aspect,
            ..Self::default()
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.eye, Vec3::NEG_Z, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world point to normalized device coordinates.
    /// Returns `None` for points behind the camera.
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }

    /// World-space ray from the eye through a point in normalized device
    /// coordinates (x right, y up, both in `[-1, 1]`).
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));
        Ray {
            origin: self.eye,
            direction: (far - near).normalize(),
        }
    }
}

/// Half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Parameter of the closest approach to `point`, clamped to the ray start.
    pub fn closest_t(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.direction).max(0.0)
    }

    /// Shortest distance between the ray and `point`.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        let t = self.closest_t(point);
        (self.origin + self.direction * t).distance(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_ray_looks_down_corridor() {
        let cam = Camera::default();
        let ray = cam.ray_through(Vec2::ZERO);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        assert_eq!(ray.origin, cam.eye);
    }

    #[test]
    fn project_then_cast_hits_point() {
        let cam = Camera::default();
        let target = Vec3::new(1.5, 3.0, -10.0);
        let ndc = cam.project(target).unwrap();
        assert!(ndc.x > 0.0 && ndc.y > 0.0);
        let ray = cam.ray_through(ndc);
        assert!(ray.distance_to(target) < 1e-3);
    }

    #[test]
    fn points_behind_camera_do_not_project() {
        let cam = Camera::default();
        assert!(cam.project(Vec3::new(0.0, 2.0, 12.0)).is_none());
    }

    #[test]
    fn ray_distance_clamps_to_origin() {
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        };
        assert_eq!(ray.closest_t(Vec3::new(0.0, 0.0, 5.0)), 0.0);
        assert!((ray.distance_to(Vec3::new(0.0, 0.0, 5.0)) - 5.0).abs() < 1e-6);
        assert!((ray.distance_to(Vec3::new(2.0, 0.0, -5.0)) - 2.0).abs() < 1e-6);
    }
}
