//! Orthographic camera and axis rotation helpers.

use glam::{Quat, Vec2, Vec3};

/// Rotates `point` about an arbitrary `axis` through `pivot` by `angle`
/// radians.
pub fn rotate_around(point: Vec3, pivot: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    let rotation = Quat::from_axis_angle(axis.normalize(), angle);
    pivot + rotation * (point - pivot)
}

/// An orthographic-style camera.
///
/// Projection applies the zoom factor and centers the result in the
/// viewport; there is no perspective divide. Depth cues come entirely
/// from the painter's ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Camera {
    /// Camera position (held for hosts that move the view).
    pub position: Vec3,
    /// View direction.
    pub direction: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
    /// Zoom factor applied to world units.
    pub zoom: f32,
}

impl Camera {
    /// Creates a camera for the given viewport and zoom.
    pub fn new(width: f32, height: f32, zoom: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::ZERO,
            up: Vec3::Y,
            width,
            height,
            zoom,
        }
    }

    /// Projects a transformed world point to screen space.
    ///
    /// World +Y maps up, screen +Y grows down.
    pub fn project(&self, point: Vec3) -> Vec2 {
        Vec2::new(
            self.width * 0.5 + point.x * self.zoom * self.height,
            self.height * 0.5 - point.y * self.zoom * self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn origin_projects_to_viewport_center() {
        let camera = Camera::new(800.0, 600.0, 0.1);
        let screen = camera.project(Vec3::ZERO);
        assert_eq!(screen, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn world_up_is_screen_up() {
        let camera = Camera::new(800.0, 600.0, 0.1);
        let screen = camera.project(Vec3::new(1.0, 2.0, 5.0));
        // z is discarded; x right, y up on screen (smaller y value).
        assert_eq!(screen, Vec2::new(460.0, 180.0));
    }

    #[test]
    fn rotate_around_vertical_axis() {
        let spun = rotate_around(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::Y,
            std::f32::consts::FRAC_PI_2,
        );
        assert!((spun - Vec3::new(0.0, 0.0, -1.0)).length() < EPSILON);
    }

    #[test]
    fn rotate_around_offset_pivot() {
        let pivot = Vec3::new(2.0, 5.0, 0.0);
        let spun = rotate_around(
            Vec3::new(3.0, 5.0, 0.0),
            pivot,
            Vec3::Y,
            std::f32::consts::PI,
        );
        assert!((spun - Vec3::new(1.0, 5.0, 0.0)).length() < EPSILON);
    }

    #[test]
    fn full_turn_is_identity() {
        let point = Vec3::new(1.0, 2.0, 3.0);
        let spun = rotate_around(point, Vec3::new(0.5, 0.0, -0.5), Vec3::Y, std::f32::consts::TAU);
        assert!((spun - point).length() < EPSILON);
    }
}
