//! First-person camera: the pose owned by the session and the per-frame
//! integration of routed input into that pose.

use crate::input::{InputState, MoveKey};
use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;
use winit::dpi::PhysicalSize;

/// Distance ahead of the camera at which the look-at target is placed.
pub const LOOK_AT_DISTANCE: f32 = 10.0;

/// Camera pose: position plus yaw/pitch orientation and projection inputs.
///
/// Exclusively owned by the session's camera controller; read every frame by
/// `render()`. Single-threaded execution makes that safe without locks.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    /// Heading around the world Y axis, radians.
    pub yaw: f32,
    /// Elevation, radians; always within [-π/2, π/2].
    pub pitch: f32,
    /// Width / height of the render surface.
    pub aspect: f32,
    /// Projection near plane.
    pub near: f32,
    pub up: Vec3,
}

impl Camera {
    /// Creates a camera at `position` oriented toward `look_at`.
    pub fn looking_at(position: Vec3, look_at: Vec3, up: Vec3) -> Self {
        let mut camera = Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            aspect: 1.0,
            near: 0.1,
            up,
        };
        camera.point_at(look_at);
        camera
    }

    /// Re-derives yaw and pitch so the camera faces `target`.
    pub fn point_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        let horizontal = (dir.x * dir.x + dir.z * dir.z).sqrt();
        // atan2 convention matches the forward vector (sin yaw, 0, cos yaw).
        self.yaw = dir.x.atan2(dir.z);
        self.pitch = dir.y.atan2(horizontal).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Horizontal forward direction derived from yaw.
    pub fn forward_xz(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Horizontal right direction derived from yaw.
    pub fn right_xz(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// Applies a pointer-drag look delta: yaw and pitch accumulate against
    /// the drag direction, and pitch is clamped so the view never crosses
    /// the poles.
    pub fn apply_look(&mut self, delta_x: f32, delta_y: f32, sensitivity: f32) {
        self.yaw -= delta_x * sensitivity;
        self.pitch = (self.pitch - delta_y * sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Translates along the horizontal facing direction from wheel input.
    /// Scrolling up (negative delta) moves forward.
    pub fn apply_zoom(&mut self, delta_scroll: f32, speed: f32) {
        self.position += self.forward_xz() * (-delta_scroll * speed);
    }

    /// Adds one frame of held-key movement. Simultaneous keys compose
    /// additively, so diagonal movement is faster than axis movement; that
    /// matches the shipped behavior and is left uncorrected.
    pub fn integrate_movement(&mut self, input: &InputState, move_speed: f32) {
        let forward = self.forward_xz();
        let right = self.right_xz();
        if input.held(MoveKey::Forward) {
            self.position += forward * move_speed;
        }
        if input.held(MoveKey::Back) {
            self.position -= forward * move_speed;
        }
        if input.held(MoveKey::Left) {
            self.position -= right * move_speed;
        }
        if input.held(MoveKey::Right) {
            self.position += right * move_speed;
        }
    }

    /// Look-at target derived from yaw and pitch by spherical-to-Cartesian
    /// projection, for the renderer's view-matrix update.
    pub fn look_target(&self, distance: f32) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.position + Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * distance
    }

    /// Recomputes the aspect ratio from the hosting container size.
    pub fn set_aspect_from(&mut self, size: PhysicalSize<u32>) {
        self.aspect = size.width as f32 / size.height.max(1) as f32;
    }

    /// View matrix toward the current look target.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_target(LOOK_AT_DISTANCE), self.up)
    }

    /// Perspective projection; depth in [0, 1] as wgpu expects.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(60f32.to_radians(), self.aspect.max(1e-6), self.near, 1_000.0)
    }
}

/// Per-frame integrator: applies one frame of routed input to the camera.
///
/// Translation is applied per frame, not per second, so motion speed is
/// intentionally tied to the display refresh rate.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Radians of rotation per pixel of pointer drag.
    pub look_sensitivity: f32,
    /// Meters of translation per wheel line.
    pub zoom_speed: f32,
    /// Meters of translation per frame per held movement key.
    pub move_speed: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            look_sensitivity: 0.002,
            zoom_speed: 1.2,
            move_speed: 0.15,
        }
    }
}

impl CameraController {
    /// Consumes the frame's accumulated deltas and held keys, mutating the
    /// camera pose in place.
    pub fn integrate(&self, camera: &mut Camera, input: &mut InputState) {
        let (dx, dy) = input.take_look_delta();
        if dx != 0.0 || dy != 0.0 {
            camera.apply_look(dx, dy, self.look_sensitivity);
        }
        let zoom = input.take_zoom_delta();
        if zoom != 0.0 {
            camera.apply_zoom(zoom, self.zoom_speed);
        }
        camera.integrate_movement(input, self.move_speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputRouter;
    use rand::Rng;
    use winit::event::ElementState;

    fn camera() -> Camera {
        Camera::looking_at(Vec3::ZERO, Vec3::Z, Vec3::Y)
    }

    #[test]
    fn pitch_stays_clamped_under_random_delta_sequences() {
        let mut rng = rand::thread_rng();
        let mut cam = camera();
        for _ in 0..10_000 {
            let dx = rng.gen_range(-2_000.0..2_000.0);
            let dy = rng.gen_range(-2_000.0..2_000.0);
            cam.apply_look(dx, dy, 0.002);
            assert!(
                (-FRAC_PI_2..=FRAC_PI_2).contains(&cam.pitch),
                "pitch {} escaped the clamp",
                cam.pitch
            );
        }
    }

    #[test]
    fn look_accumulates_against_drag_direction() {
        let mut cam = camera();
        cam.apply_look(10.0, -5.0, 0.1);
        assert!((cam.yaw - -1.0).abs() < 1e-6);
        assert!((cam.pitch - 0.5).abs() < 1e-6);
    }

    #[test]
    fn scroll_up_moves_forward() {
        let mut cam = camera();
        // yaw 0 faces +Z; scroll up arrives as a negative delta.
        cam.apply_zoom(-3.0, 0.5);
        assert!((cam.position.z - 1.5).abs() < 1e-6);
        assert_eq!(cam.position.x, 0.0);
        assert_eq!(cam.position.y, 0.0);
    }

    #[test]
    fn forward_and_right_compose_additively() {
        let mut cam = camera();
        let mut router = InputRouter::new();
        router.key(MoveKey::Forward, ElementState::Pressed);
        router.key(MoveKey::Right, ElementState::Pressed);

        cam.integrate_movement(router.state(), 0.15);

        // Diagonal speed-up is expected, not corrected.
        assert!((cam.position.x - 0.15).abs() < 1e-6);
        assert_eq!(cam.position.y, 0.0);
        assert!((cam.position.z - 0.15).abs() < 1e-6);
    }

    #[test]
    fn look_target_projects_spherically() {
        let mut cam = camera();
        cam.yaw = 0.0;
        cam.pitch = FRAC_PI_2;
        let target = cam.look_target(10.0);
        assert!((target.y - 10.0).abs() < 1e-4);

        cam.pitch = 0.0;
        let target = cam.look_target(10.0);
        assert!((target.z - 10.0).abs() < 1e-4);
        assert!(target.y.abs() < 1e-4);
    }

    #[test]
    fn looking_at_derives_yaw_toward_target() {
        let cam = Camera::looking_at(
            Vec3::new(0.0, 1.6, 5.0),
            Vec3::new(0.0, 1.6, 0.0),
            Vec3::Y,
        );
        // Target is toward -Z, so the forward vector must be (0, 0, -1).
        let forward = cam.forward_xz();
        assert!(forward.x.abs() < 1e-6);
        assert!((forward.z - -1.0).abs() < 1e-6);
        assert!(cam.pitch.abs() < 1e-6);
    }

    #[test]
    fn controller_consumes_deltas_once() {
        let mut cam = camera();
        let controller = CameraController::default();
        let mut router = InputRouter::new();
        router.pointer_button(true);
        router.pointer_moved(0.0, 0.0);
        router.pointer_moved(100.0, 0.0);

        controller.integrate(&mut cam, router.state_mut());
        let yaw_after_first = cam.yaw;
        assert!(yaw_after_first != 0.0);

        // Second frame with no new input: pose is stable.
        controller.integrate(&mut cam, router.state_mut());
        assert_eq!(cam.yaw, yaw_after_first);
    }

    #[test]
    fn aspect_is_recomputed_from_size() {
        let mut cam = camera();
        cam.set_aspect_from(PhysicalSize::new(800, 600));
        assert!((cam.aspect - 800.0 / 600.0).abs() < 1e-6);
        cam.set_aspect_from(PhysicalSize::new(400, 600));
        assert!((cam.aspect - 400.0 / 600.0).abs() < 1e-6);
    }
}
