use anyhow::{ensure, Result};
use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::core::controller::{Button, Controller};

pub const START_POSITION: Vec3 = Vec3::new(0.0, -1.5, 0.0);
pub const ROOM_EXTENT: Vec3 = Vec3::new(8.0, 6.0, 12.0);
pub const MOVEMENT_GAIN: f32 = 0.07;
pub const ROTATION_GAIN: f32 = 0.004;
pub const WALL_MARGIN: f32 = 0.1;
pub const PITCH_EPSILON: f32 = 0.01;

/// Walkable volume, centred on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomBounds {
    pub extent: Vec3,
}

impl RoomBounds {
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            extent: Vec3::new(width, height, depth),
        }
    }

    /// Largest coordinate the camera may reach on each axis
    pub fn half_extent(&self, margin: f32) -> Vec3 {
        self.extent / 2.0 - Vec3::splat(margin)
    }

    pub fn clamp(&self, position: Vec3, margin: f32) -> Vec3 {
        let half = self.half_extent(margin);
        position.clamp(-half, half)
    }
}

impl Default for RoomBounds {
    fn default() -> Self {
        Self { extent: ROOM_EXTENT }
    }
}

/// One frame of input, already reduced to what the camera cares about
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSample {
    /// x: strafe (left positive), y: forward, z: up. Each axis is -1, 0 or 1.
    pub movement: Vec3,
    pub mouse_delta: Vec2,
    pub look_mode_active: bool,
}

impl InputSample {
    /// Build a sample from held buttons. Each held direction adds its own
    /// unit contribution so opposing keys cancel.
    pub fn from_controller(
        controller: &dyn Controller,
        mouse_delta: Vec2,
        look_mode_active: bool,
    ) -> Self {
        let mut movement = Vec3::ZERO;

        if controller.is_down(Button::Forward) {
            movement.y += 1.0;
        }
        if controller.is_down(Button::Back) {
            movement.y -= 1.0;
        }
        if controller.is_down(Button::StrafeLeft) {
            movement.x += 1.0;
        }
        if controller.is_down(Button::StrafeRight) {
            movement.x -= 1.0;
        }
        if controller.is_down(Button::Up) {
            movement.z += 1.0;
        }
        if controller.is_down(Button::Down) {
            movement.z -= 1.0;
        }

        Self {
            movement,
            mouse_delta,
            look_mode_active,
        }
    }
}

/// Tuning for the free-fly camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub start_position: [f32; 3],
    pub room_extent: [f32; 3],
    pub movement_gain: f32,
    pub rotation_gain: f32,
    pub wall_margin: f32,
    pub pitch_epsilon: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            start_position: START_POSITION.to_array(),
            room_extent: ROOM_EXTENT.to_array(),
            movement_gain: MOVEMENT_GAIN,
            rotation_gain: ROTATION_GAIN,
            wall_margin: WALL_MARGIN,
            pitch_epsilon: PITCH_EPSILON,
        }
    }
}

impl CameraSettings {
    pub fn start_position(&self) -> Vec3 {
        Vec3::from_array(self.start_position)
    }

    pub fn room(&self) -> RoomBounds {
        RoomBounds {
            extent: Vec3::from_array(self.room_extent),
        }
    }

    pub fn pitch_limit(&self) -> f32 {
        FRAC_PI_2 - self.pitch_epsilon
    }

    /// Reject tuning that would leave no valid camera state
    pub fn validate(&self) -> Result<()> {
        let extent = Vec3::from_array(self.room_extent);
        ensure!(
            extent.is_finite() && extent.cmpgt(Vec3::ZERO).all(),
            "room_extent must be finite and positive, got {:?}",
            self.room_extent
        );
        ensure!(
            self.wall_margin >= 0.0 && (extent / 2.0).cmpgt(Vec3::splat(self.wall_margin)).all(),
            "wall_margin must be in [0, extent/2), got {}",
            self.wall_margin
        );
        ensure!(
            self.pitch_epsilon > 0.0 && self.pitch_epsilon < FRAC_PI_2,
            "pitch_epsilon must be in (0, pi/2), got {}",
            self.pitch_epsilon
        );
        ensure!(
            self.movement_gain.is_finite() && self.rotation_gain.is_finite(),
            "camera gains must be finite"
        );
        ensure!(
            Vec3::from_array(self.start_position).is_finite(),
            "start_position must be finite"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl CameraState {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Unit vector the camera is looking along
    pub fn look_direction(&self) -> Vec3 {
        let r = self.pitch.cos();
        Vec3::new(r * self.yaw.sin(), self.pitch.sin(), r * self.yaw.cos())
    }

    pub fn target(&self) -> Vec3 {
        self.position + self.look_direction()
    }

    /// Right-handed look-at with +Y as world up
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target(), Vec3::Y)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(START_POSITION)
    }
}

/// Integrates one input sample per frame into a [`CameraState`]
#[derive(Debug, Clone, Copy)]
pub struct CameraController {
    settings: CameraSettings,
    room: RoomBounds,
}

impl CameraController {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            room: settings.room(),
            settings,
        }
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn room(&self) -> RoomBounds {
        self.room
    }

    pub fn initial_state(&self) -> CameraState {
        CameraState::new(self.settings.start_position())
    }

    pub fn reset(&self, state: &mut CameraState) {
        *state = self.initial_state();
    }

    pub fn advance(&self, state: &mut CameraState, input: &InputSample) {
        *state = advance(
            *state,
            input,
            self.room,
            self.settings.movement_gain,
            self.settings.rotation_gain,
            self.settings.wall_margin,
            self.settings.pitch_limit(),
        );
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

/// Pure per-frame camera step.
///
/// Movement is rotated by yaw only, so looking up or down never tilts the
/// direction of travel. Speed is per frame; there is no time scaling.
pub fn advance(
    state: CameraState,
    input: &InputSample,
    room: RoomBounds,
    movement_gain: f32,
    rotation_gain: f32,
    margin: f32,
    pitch_limit: f32,
) -> CameraState {
    let mut next = state;

    let heading = Quat::from_rotation_y(state.yaw);
    let displacement = heading * input.movement * movement_gain;
    next.position = room.clamp(state.position + displacement, margin);

    if input.look_mode_active {
        let delta = input.mouse_delta * rotation_gain;

        next.pitch = (state.pitch - delta.y).clamp(-pitch_limit, pitch_limit);
        next.yaw = wrap_yaw(state.yaw - delta.x);
    }

    next
}

/// Wrap an angle into (-π, π]. Values already in range come back untouched.
pub fn wrap_yaw(yaw: f32) -> f32 {
    if yaw > -PI && yaw <= PI {
        return yaw;
    }

    let wrapped = yaw - TAU * ((yaw + PI) / TAU).floor();
    if wrapped <= -PI {
        wrapped + TAU
    } else if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn look(dx: f32, dy: f32) -> InputSample {
        InputSample {
            movement: Vec3::ZERO,
            mouse_delta: Vec2::new(dx, dy),
            look_mode_active: true,
        }
    }

    #[test]
    fn wrap_yaw_keeps_in_range_values() {
        assert_eq!(wrap_yaw(0.0), 0.0);
        assert_eq!(wrap_yaw(PI), PI);
        assert_eq!(wrap_yaw(-3.0), -3.0);
    }

    #[test]
    fn wrap_yaw_maps_minus_pi_to_pi() {
        assert!((wrap_yaw(-PI) - PI).abs() < EPS);
    }

    #[test]
    fn wrap_yaw_handles_multiple_turns() {
        let yaw = wrap_yaw(5.0 * TAU + 0.5);
        assert!((yaw - 0.5).abs() < 1e-3);

        let yaw = wrap_yaw(-7.0 * TAU - 0.25);
        assert!((yaw + 0.25).abs() < 1e-3);
    }

    #[test]
    fn look_direction_at_rest_is_plus_z() {
        let state = CameraState::new(Vec3::ZERO);
        assert!((state.look_direction() - Vec3::Z).length() < EPS);
    }

    #[test]
    fn look_direction_is_unit_length() {
        let state = CameraState {
            position: Vec3::ZERO,
            yaw: 1.2,
            pitch: -0.7,
        };
        assert!((state.look_direction().length() - 1.0).abs() < EPS);
    }

    #[test]
    fn pitch_clamps_to_limit() {
        let controller = CameraController::default();
        let mut state = controller.initial_state();

        controller.advance(&mut state, &look(0.0, -10_000.0));
        assert!((state.pitch - controller.settings().pitch_limit()).abs() < EPS);

        controller.advance(&mut state, &look(0.0, 10_000.0));
        assert!((state.pitch + controller.settings().pitch_limit()).abs() < EPS);
    }

    #[test]
    fn look_ignored_without_look_mode() {
        let controller = CameraController::default();
        let mut state = controller.initial_state();
        let input = InputSample {
            look_mode_active: false,
            ..look(250.0, -80.0)
        };

        controller.advance(&mut state, &input);
        assert_eq!(state.yaw, 0.0);
        assert_eq!(state.pitch, 0.0);
    }

    #[test]
    fn strafe_follows_yaw() {
        let controller = CameraController::default();
        let mut state = CameraState {
            position: Vec3::ZERO,
            yaw: FRAC_PI_2,
            pitch: 0.0,
        };
        let input = InputSample {
            movement: Vec3::X,
            ..Default::default()
        };

        controller.advance(&mut state, &input);
        // +x rotated a quarter turn about +Y lands on -z
        assert!(state.position.x.abs() < EPS);
        assert!((state.position.z + MOVEMENT_GAIN).abs() < EPS);
    }

    #[test]
    fn pitch_does_not_tilt_movement() {
        let controller = CameraController::default();
        let mut state = CameraState {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 1.0,
        };
        let input = InputSample {
            movement: Vec3::X,
            ..Default::default()
        };

        controller.advance(&mut state, &input);
        assert!((state.position - Vec3::new(MOVEMENT_GAIN, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn position_rests_on_boundary() {
        let controller = CameraController::default();
        let half = controller.room().half_extent(WALL_MARGIN);
        let mut state = CameraState::new(half);
        let input = InputSample {
            movement: Vec3::ONE,
            ..Default::default()
        };

        controller.advance(&mut state, &input);
        assert_eq!(state.position, half);
    }

    #[test]
    fn room_half_extent_subtracts_margin() {
        let room = RoomBounds::new(8.0, 6.0, 12.0);
        assert!(room
            .half_extent(0.1)
            .abs_diff_eq(Vec3::new(3.9, 2.9, 5.9), EPS));
    }

    #[test]
    fn settings_default_values() {
        let settings = CameraSettings::default();
        assert_eq!(settings.start_position(), START_POSITION);
        assert_eq!(settings.room(), RoomBounds::new(8.0, 6.0, 12.0));
        assert!((settings.pitch_limit() - (FRAC_PI_2 - 0.01)).abs() < EPS);
    }

    #[test]
    fn default_settings_validate() {
        assert!(CameraSettings::default().validate().is_ok());
    }

    #[test]
    fn pitch_epsilon_outside_quarter_turn_rejected() {
        for pitch_epsilon in [0.0, -1.0, 2.0, FRAC_PI_2] {
            let settings = CameraSettings {
                pitch_epsilon,
                ..Default::default()
            };
            assert!(settings.validate().is_err(), "accepted {}", pitch_epsilon);
        }
    }

    #[test]
    fn degenerate_room_rejected() {
        for room_extent in [[-8.0, 6.0, 12.0], [8.0, 0.0, 12.0], [8.0, 6.0, f32::INFINITY]] {
            let settings = CameraSettings {
                room_extent,
                ..Default::default()
            };
            assert!(settings.validate().is_err(), "accepted {:?}", room_extent);
        }
    }

    #[test]
    fn wall_margin_must_leave_room() {
        let settings = |wall_margin| CameraSettings {
            wall_margin,
            ..Default::default()
        };

        assert!(settings(0.0).validate().is_ok());
        assert!(settings(-0.1).validate().is_err());
        // Half of the shortest axis (height 6)
        assert!(settings(3.0).validate().is_err());
        assert!(settings(2.9).validate().is_ok());
    }
}
