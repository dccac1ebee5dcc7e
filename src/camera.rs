use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

use crate::input::{PointerEvent, PointerEventType};

/// Keeps the camera off the poles so `looking_at` stays well defined
const POLE_EPSILON: f32 = 1e-3;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(Update, (drive_orbit, apply_orbit).chain());
    }
}

#[derive(Component)]
pub struct MainCamera;

/// Damped orbit controls around a target point
#[derive(Component, Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    /// Angle around +Y, 0 = looking from +Z
    pub azimuth: f32,
    /// Angle from +Y, clamped to (0, π)
    pub polar: f32,
    /// Fraction of the pending motion applied per frame, also its decay
    pub damping: f32,
    pub rotate_speed: f32,
    pending_azimuth: f32,
    pending_polar: f32,
    pending_pan: Vec3,
    drag: Option<(u64, Vec2)>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        OrbitCamera {
            target: Vec3::ZERO,
            radius: 1.0,
            azimuth: 0.0,
            polar: PI / 2.0,
            damping: 0.1,
            rotate_speed: 1.0,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_pan: Vec3::ZERO,
            drag: None,
        }
    }
}

impl OrbitCamera {
    /// Queue a rotation from a pointer drag of `delta` window pixels
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.pending_azimuth -= TAU * delta.x / height * self.rotate_speed;
        self.pending_polar -= TAU * delta.y / height * self.rotate_speed;
    }

    /// Queue a screen-space pan so the target follows the cursor
    pub fn pan(&mut self, delta: Vec2, viewport_height: f32, fov: f32) {
        let height = viewport_height.max(1.0);
        let distance = self.radius * (fov * 0.5).tan();
        let rotation = self.rotation();
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;

        self.pending_pan += (-right * delta.x + up * delta.y) * (2.0 * distance / height);
    }

    /// Apply one frame of damped motion
    pub fn advance(&mut self) {
        self.azimuth += self.pending_azimuth * self.damping;
        self.polar = (self.polar + self.pending_polar * self.damping)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);
        self.target += self.pending_pan * self.damping;

        let keep = 1.0 - self.damping;
        self.pending_azimuth *= keep;
        self.pending_polar *= keep;
        self.pending_pan *= keep;
    }

    pub fn translation(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_polar * sin_azimuth, cos_polar, sin_polar * cos_azimuth) * self.radius
    }

    fn rotation(&self) -> Quat {
        Transform::from_translation(self.translation())
            .looking_at(self.target, Vec3::Y)
            .rotation
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.translation()).looking_at(self.target, Vec3::Y)
    }
}

/// Perspective camera one unit in front of the bottle
fn setup_camera(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 50f32.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        // LUT-free tonemapper
        Tonemapping::AcesFitted,
        AmbientLight {
            color: Color::WHITE,
            brightness: 400.0,
            ..default()
        },
        orbit.transform(),
        orbit,
        MainCamera,
    ));
}

/// System: Turn pointer drags into orbit and pan input
fn drive_orbit(
    mut pointer_events: MessageReader<PointerEvent>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    windows: Query<&Window>,
    mut cameras: Query<(&mut OrbitCamera, &Projection), With<MainCamera>>,
) {
    let Ok((mut orbit, projection)) = cameras.single_mut() else {
        return;
    };
    let height = windows.iter().next().map_or(1.0, |w| w.height());

    for event in pointer_events.read() {
        match event.event_type {
            PointerEventType::Down => {
                if orbit.drag.is_none() {
                    orbit.drag = Some((event.id, event.position));
                }
            }
            PointerEventType::Move => {
                if let Some((id, last)) = orbit.drag {
                    if id == event.id {
                        orbit.rotate(event.position - last, height);
                        orbit.drag = Some((id, event.position));
                    }
                }
            }
            PointerEventType::Up | PointerEventType::Leave => {
                if orbit.drag.is_some_and(|(id, _)| id == event.id) {
                    orbit.drag = None;
                }
            }
        }
    }

    if mouse_buttons.pressed(MouseButton::Right) && mouse_motion.delta != Vec2::ZERO {
        let fov = match projection {
            Projection::Perspective(p) => p.fov,
            _ => PI / 4.0,
        };
        orbit.pan(mouse_motion.delta, height, fov);
    }
}

/// System: Step the damping and move the camera
fn apply_orbit(mut cameras: Query<(&mut OrbitCamera, &mut Transform), With<MainCamera>>) {
    for (mut orbit, mut transform) in &mut cameras {
        orbit.advance();
        *transform = orbit.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_sits_on_positive_z() {
        let orbit = OrbitCamera::default();
        let t = orbit.translation();

        assert!(t.x.abs() < 1e-6);
        assert!(t.y.abs() < 1e-6);
        assert!((t.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_damped_rotation_totals_requested_angle() {
        let mut orbit = OrbitCamera::default();
        orbit.rotate(Vec2::new(-100.0, 0.0), 400.0);

        for _ in 0..500 {
            orbit.advance();
        }

        // Dragging left by a quarter of the height turns a quarter of a full circle
        assert!((orbit.azimuth - TAU * 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut orbit = OrbitCamera::default();
        orbit.rotate(Vec2::new(0.0, 10_000.0), 100.0);

        for _ in 0..200 {
            orbit.advance();
        }

        assert!(orbit.polar >= POLE_EPSILON);
        assert!(orbit.polar <= PI - POLE_EPSILON);
        assert!(orbit.translation().is_finite());
    }

    #[test]
    fn test_pan_moves_target_right_when_dragging_left() {
        let mut orbit = OrbitCamera::default();
        orbit.pan(Vec2::new(-50.0, 0.0), 500.0, 50f32.to_radians());

        for _ in 0..500 {
            orbit.advance();
        }

        assert!(orbit.target.x > 0.0);
        assert!(orbit.target.y.abs() < 1e-5);
    }
}
