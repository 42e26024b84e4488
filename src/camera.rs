//! Orthographic camera
//!
//! Maps the fixed 800×480 world (y up, origin bottom-left) onto whatever
//! pixel viewport the host has, stretching to fill it.

use glam::{Mat4, Vec2, Vec3};

/// 2D orthographic camera
#[derive(Debug, Clone)]
pub struct OrthoCamera {
    /// Visible world extent
    pub world_size: Vec2,
    /// Screen size in pixels
    pub viewport: Vec2,
    /// World → normalized device coordinates
    pub combined: Mat4,
    inverse: Mat4,
}

impl OrthoCamera {
    /// Camera showing `[0, width] × [0, height]` with y pointing up
    pub fn new(width: f32, height: f32) -> Self {
        let mut camera = Self {
            world_size: Vec2::new(width, height),
            viewport: Vec2::new(width, height),
            combined: Mat4::IDENTITY,
            inverse: Mat4::IDENTITY,
        };
        camera.update();
        camera
    }

    /// Track the host's pixel size. Zero-sized viewports are ignored.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        if viewport.x > 0.0 && viewport.y > 0.0 {
            self.viewport = viewport;
        }
    }

    /// Recompute matrices. Call once per frame before projecting.
    pub fn update(&mut self) {
        self.combined =
            Mat4::orthographic_rh(0.0, self.world_size.x, 0.0, self.world_size.y, -1.0, 1.0);
        self.inverse = self.combined.inverse();
    }

    /// World point → normalized device coordinates
    pub fn project(&self, world: Vec2) -> Vec2 {
        self.combined.project_point3(world.extend(0.0)).truncate()
    }

    /// World point → screen pixel (y down, origin top-left)
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        let ndc = self.project(world);
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        )
    }

    /// Screen pixel (y down, origin top-left) → world point
    pub fn unproject(&self, screen: Vec2) -> Vec2 {
        let ndc = Vec3::new(
            2.0 * screen.x / self.viewport.x - 1.0,
            1.0 - 2.0 * screen.y / self.viewport.y,
            0.0,
        );
        self.inverse.project_point3(ndc).truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec2, b: Vec2) {
        assert!((a - b).length() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn test_unproject_flips_y() {
        let camera = OrthoCamera::new(800.0, 480.0);
        assert_close(camera.unproject(Vec2::new(0.0, 0.0)), Vec2::new(0.0, 480.0));
        assert_close(camera.unproject(Vec2::new(0.0, 480.0)), Vec2::new(0.0, 0.0));
        assert_close(camera.unproject(Vec2::new(400.0, 240.0)), Vec2::new(400.0, 240.0));
    }

    #[test]
    fn test_unproject_scales_with_viewport() {
        let mut camera = OrthoCamera::new(800.0, 480.0);
        camera.set_viewport(Vec2::new(1600.0, 960.0));
        assert_close(camera.unproject(Vec2::new(800.0, 480.0)), Vec2::new(400.0, 240.0));
        assert_close(camera.unproject(Vec2::new(1600.0, 0.0)), Vec2::new(800.0, 480.0));

        // Degenerate viewport is ignored
        camera.set_viewport(Vec2::ZERO);
        assert_eq!(camera.viewport, Vec2::new(1600.0, 960.0));
    }

    #[test]
    fn test_project_corners() {
        let camera = OrthoCamera::new(800.0, 480.0);
        assert_close(camera.project(Vec2::ZERO), Vec2::new(-1.0, -1.0));
        assert_close(camera.project(Vec2::new(800.0, 480.0)), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_to_screen_inverts_unproject() {
        let mut camera = OrthoCamera::new(800.0, 480.0);
        camera.set_viewport(Vec2::new(400.0, 240.0));
        let world = Vec2::new(600.0, 100.0);
        let screen = camera.to_screen(world);
        assert_close(screen, Vec2::new(300.0, 190.0));
        assert_close(camera.unproject(screen), world);
    }
}
