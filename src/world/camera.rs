use glam::{Vec2, vec2};

/// Player view-point in world space.
///
/// Only **yaw** (heading) exists - the engine never tilts up/down.
/// The pose is owned by player/entity state outside the core; render and
/// query calls borrow it and never mutate it.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub pos: Vec2, // continuous position in tile units
    pub yaw: f32,  // radians (0 = +X, counter-clockwise)
    pub fov: f32,  // horizontal FoV (radians, typical 90-110 deg)
}

impl Camera {
    pub fn new(pos: Vec2, yaw: f32, fov: f32) -> Self {
        Self { pos, yaw, fov }
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks.
    #[inline(always)]
    pub fn forward(self) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        vec2(c, s)
    }

    /// Unit vector pointing to the camera's right.
    #[inline(always)]
    pub fn right(self) -> Vec2 {
        self.forward().perp()
    }

    #[inline]
    pub fn fov_half(self) -> f32 {
        self.fov * 0.5
    }

    /*───────────────── projection helpers ─────────────────*/

    /// World-space angle of the ray through screen column `x` of `width`.
    ///
    /// Columns sweep the FoV left to right; the center column looks exactly
    /// along `yaw`, independent of `width`.
    #[inline]
    pub fn ray_angle(self, x: usize, width: usize) -> f32 {
        self.yaw - self.fov_half() + self.fov * x as f32 / width as f32
    }

    /// Pixel-per-map-unit scale for viewport width `w`.
    ///
    /// ```text
    /// focal = w / (2 * tan(fov/2))
    /// ```
    #[inline]
    pub fn screen_scale(self, w: usize) -> f32 {
        (w as f32) * 0.5 / (self.fov * 0.5).tan()
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Rotate around the vertical axis (positive = turn left).
    pub fn turn(&mut self, delta_yaw: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn forward_and_right_are_orthonormal() {
        let cam = Camera::new(Vec2::ZERO, 0.3, 1.57);
        let f = cam.forward();
        let r = cam.right();
        assert!((f.length() - 1.0).abs() < 1e-5);
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!((f.dot(r)).abs() < 1e-5);
    }

    #[test]
    fn screen_scale_at_90_deg() {
        let cam = Camera::new(Vec2::ZERO, 0.0, FRAC_PI_2);
        assert!((cam.screen_scale(640) - 320.0).abs() < 1e-3);
    }

    #[test]
    fn center_column_looks_along_yaw() {
        let cam = Camera::new(Vec2::ZERO, 0.7, FRAC_PI_2);
        assert!((cam.ray_angle(4, 8) - 0.7).abs() < 1e-6);
        assert!((cam.ray_angle(320, 640) - 0.7).abs() < 1e-6);
        // leftmost column looks half a FoV to the left
        assert!((cam.ray_angle(0, 640) - (0.7 - FRAC_PI_2 * 0.5)).abs() < 1e-6);
    }
}
