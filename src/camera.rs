use crate::math::Vec3;
use crate::raycasting::Ray;

/// Free-fly movement directions, relative to the current view.
#[derive(Clone, Copy, Debug)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// A free-fly pinhole camera.
///
/// The film model matches a unit-height film plane at `film_distance` in
/// front of the eye, so the horizontal field of view scales with the aspect
/// ratio passed to [ray_through_screen](Camera::ray_through_screen).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    film_distance: f32,
}

const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Camera {
        Camera {
            position,
            yaw,
            pitch: pitch.max(-PITCH_LIMIT).min(PITCH_LIMIT),
            film_distance: 1.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit view direction; yaw 0, pitch 0 looks along +Z.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
    }

    fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    fn up(&self) -> Vec3 {
        let forward = self.forward();
        let right = self.right();
        Vec3::new(
            forward.y() * right.z() - forward.z() * right.y(),
            forward.z() * right.x() - forward.x() * right.z(),
            forward.x() * right.y() - forward.y() * right.x(),
        )
    }

    /// The view ray for normalized screen coordinates (u, v) in [0, 1]².
    pub fn ray_through_screen(&self, u: f32, v: f32, aspect_ratio: f32) -> Ray {
        let x = (u - 0.5) * aspect_ratio;
        let y = v - 0.5;
        let direction = self.right() * x + self.up() * y + self.forward() * self.film_distance;
        Ray::new(self.position, direction)
    }

    /// Translate the eye along a view-relative direction.
    pub fn move_by(&mut self, direction: MoveDirection, speed: f32) {
        let step = match direction {
            MoveDirection::Forward => self.forward(),
            MoveDirection::Backward => -self.forward(),
            MoveDirection::Left => -self.right(),
            MoveDirection::Right => self.right(),
            MoveDirection::Up => Vec3::unit_y(),
            MoveDirection::Down => -Vec3::unit_y(),
        };
        self.position += step * speed;
    }

    /// Look around by the given yaw/pitch deltas, in radians.
    ///
    /// Pitch is clamped just short of the poles so the view basis never
    /// degenerates.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch)
            .max(-PITCH_LIMIT)
            .min(PITCH_LIMIT);
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn centre_of_screen_looks_forward() {
        let camera = Camera::new(Vec3::zeros(), 0.3, -0.2);
        let ray = camera.ray_through_screen(0.5, 0.5, 16.0 / 9.0);
        assert!((ray.direction - camera.forward()).near_zero());
    }

    #[test]
    fn default_orientation_looks_along_positive_z() {
        let camera = Camera::new(Vec3::zeros(), 0.0, 0.0);
        assert!((camera.forward() - Vec3::unit_z()).near_zero());
    }

    #[test]
    fn moving_forward_translates_along_view_direction() {
        let mut camera = Camera::new(Vec3::zeros(), 0.7, 0.1);
        let forward = camera.forward();
        camera.move_by(MoveDirection::Forward, 2.0);
        assert!((camera.position() - forward * 2.0).near_zero());
    }

    #[test]
    fn vertical_movement_ignores_view_direction() {
        let mut camera = Camera::new(Vec3::zeros(), 0.7, 0.4);
        camera.move_by(MoveDirection::Up, 1.5);
        assert!((camera.position() - Vec3::new(0.0, 1.5, 0.0)).near_zero());
    }

    #[test]
    fn pitch_is_clamped_short_of_the_poles() {
        let mut camera = Camera::new(Vec3::zeros(), 0.0, 0.0);
        camera.rotate(0.0, 10.0);
        assert!(camera.forward().y() < 1.0);
        camera.rotate(0.0, -20.0);
        assert!(camera.forward().y() > -1.0);
    }

    #[test]
    fn rotation_changes_the_view_direction() {
        let mut camera = Camera::new(Vec3::zeros(), 0.0, 0.0);
        let before = camera.forward();
        camera.rotate(0.5, 0.0);
        assert!(!(camera.forward() - before).near_zero());
    }

    #[quickcheck]
    fn screen_rays_start_at_the_eye_and_are_unit_length(u: f32, v: f32) -> TestResult {
        if !u.is_finite() || !v.is_finite() {
            return TestResult::discard();
        }
        let u = u.abs().fract();
        let v = v.abs().fract();
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), 0.4, 0.2);
        let ray = camera.ray_through_screen(u, v, 1.5);
        TestResult::from_bool(
            (ray.origin - camera.position()).near_zero()
                && (ray.direction.norm() - 1.0).abs() < 1e-4,
        )
    }
}
