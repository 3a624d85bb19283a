//! Fixed look-at camera and screen-to-world picking.

use crate::constants::{CAMERA_FOVY_DEG, CAMERA_Z, CAMERA_ZFAR, CAMERA_ZNEAR};
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a point in normalized canvas coordinates
    /// (`uv` in [0, 1]², origin top-left). Returns `(origin, direction)`.
    pub fn screen_ray(&self, uv: Vec2) -> (Vec3, Vec3) {
        let ndc_x = uv.x * 2.0 - 1.0;
        let ndc_y = 1.0 - uv.y * 2.0;
        let inv = self.view_projection().inverse();
        let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let ro = self.eye;
        let rd = (p1 - ro).normalize();
        (ro, rd)
    }

    /// Intersection of the screen ray with the `z = plane_z` plane, where the
    /// particle field lives.
    pub fn screen_to_plane(&self, uv: Vec2, plane_z: f32) -> Option<Vec3> {
        let (ro, rd) = self.screen_ray(uv);
        if rd.z.abs() <= 1e-6 {
            return None;
        }
        let t = (plane_z - ro.z) / rd.z;
        (t >= 0.0).then(|| ro + rd * t)
    }
}
