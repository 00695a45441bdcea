use std::f32::consts::PI;

use glam::Vec3;

use crate::keys::{Key, KeyState};
use crate::math::DualQuat;

/// Camera translation per held movement key, per frame.
pub(crate) const DISPLACEMENT: f32 = 0.1;

/// Camera rotation per held arrow key, per frame, in radians.
pub(crate) const ROTATION: f32 = PI / 64.0;

/// Where the view starts: looking at the ball from 15 units out.
const HOME: Vec3 = Vec3::new(0.0, 0.0, -15.0);

/// Held keys and the view-space direction they dolly the camera in.
/// W dollies toward the ball (+Z in view space), S away.
const TRANSLATION_KEYS: [(Key, Vec3); 6] = [
    (Key::W, Vec3::Z),
    (Key::S, Vec3::NEG_Z),
    (Key::A, Vec3::X),
    (Key::D, Vec3::NEG_X),
    (Key::Z, Vec3::Y),
    (Key::Q, Vec3::NEG_Y),
];

/// Held keys and the view-space axis and sign they rotate about.
const ROTATION_KEYS: [(Key, Vec3, f32); 6] = [
    (Key::Right, Vec3::Y, ROTATION),
    (Key::Left, Vec3::Y, -ROTATION),
    (Key::Down, Vec3::X, ROTATION),
    (Key::Up, Vec3::X, -ROTATION),
    (Key::Period, Vec3::Z, ROTATION),
    (Key::Comma, Vec3::Z, -ROTATION),
];

/// The keyboard-steered view transform plus the ball's spin transform.
///
/// Steering pre-multiplies the view transform, so every move happens in
/// view space regardless of how the camera is already oriented.
pub(crate) struct CameraRig {
    pub camera: DualQuat,
    pub spinning: DualQuat,
    pub rotate: bool,
}

impl CameraRig {
    pub(crate) fn new(rotate: bool) -> Self {
        Self {
            camera: DualQuat::from_translation(HOME),
            spinning: DualQuat::IDENTITY,
            rotate,
        }
    }

    /// One frame of autonomous spin about +Y, a sixteenth of a key step.
    pub(crate) fn spin(&mut self) {
        if self.rotate {
            self.spinning = (self.spinning
                * DualQuat::from_axis_angle(Vec3::Y, ROTATION / 16.0))
            .normalize();
        }
    }

    /// Applies one frame of key steering.
    pub(crate) fn steer(&mut self, keys: &KeyState) {
        if keys.just_pressed(Key::J) {
            self.rotate = !self.rotate;
        }
        for (key, direction) in TRANSLATION_KEYS {
            if keys.is_pressed(key) {
                self.camera =
                    DualQuat::from_translation(direction * DISPLACEMENT) * self.camera;
            }
        }
        for (key, axis, angle) in ROTATION_KEYS {
            if keys.is_pressed(key) {
                self.camera = DualQuat::from_axis_angle(axis, angle) * self.camera;
            }
        }
        self.camera = self.camera.normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig_and_keys() -> (CameraRig, KeyState) {
        (CameraRig::new(true), KeyState::default())
    }

    #[test]
    fn camera_starts_at_home() {
        let (rig, _) = rig_and_keys();
        assert!((rig.camera.translation() - HOME).length() < 1e-6);
    }

    #[test]
    fn w_dollies_toward_the_ball() {
        let (mut rig, mut keys) = rig_and_keys();
        keys.press(Key::W as u32);
        rig.steer(&keys);
        // the ball sits ahead of the camera at view-space z = -15
        assert!((rig.camera.translation().z - -14.9).abs() < 1e-5);
    }

    #[test]
    fn s_dollies_away_from_the_ball() {
        let (mut rig, mut keys) = rig_and_keys();
        keys.press(Key::S as u32);
        rig.steer(&keys);
        assert!((rig.camera.translation().z - -15.1).abs() < 1e-5);
    }

    #[test]
    fn strafe_and_lift_keys_move_along_their_axes() {
        for (code, expected) in [
            (Key::A as u32, Vec3::new(0.1, 0.0, -15.0)),
            (Key::D as u32, Vec3::new(-0.1, 0.0, -15.0)),
            (Key::Z as u32, Vec3::new(0.0, 0.1, -15.0)),
            (Key::Q as u32, Vec3::new(0.0, -0.1, -15.0)),
        ] {
            let (mut rig, mut keys) = rig_and_keys();
            keys.press(code);
            rig.steer(&keys);
            assert!((rig.camera.translation() - expected).length() < 1e-5);
        }
    }

    #[test]
    fn arrows_rotate_in_view_space() {
        let (mut rig, mut keys) = rig_and_keys();
        keys.press(Key::Right as u32);
        rig.steer(&keys);
        let expected =
            DualQuat::from_axis_angle(Vec3::Y, ROTATION) * DualQuat::from_translation(HOME);
        assert!((rig.camera.translation() - expected.translation()).length() < 1e-5);
    }

    #[test]
    fn j_toggles_spin_once_per_press() {
        let (mut rig, mut keys) = rig_and_keys();
        keys.press(Key::J as u32);
        rig.steer(&keys);
        assert!(!rig.rotate);
        keys.update();
        // still held next frame; no second toggle
        rig.steer(&keys);
        assert!(!rig.rotate);
    }

    #[test]
    fn spin_advances_only_while_rotating() {
        let (mut rig, _) = rig_and_keys();
        rig.rotate = false;
        rig.spin();
        assert_eq!(rig.spinning, DualQuat::IDENTITY);
        rig.rotate = true;
        rig.spin();
        assert_ne!(rig.spinning, DualQuat::IDENTITY);
    }

    #[test]
    fn long_steering_keeps_the_transform_rigid() {
        let (mut rig, mut keys) = rig_and_keys();
        keys.press(Key::W as u32);
        keys.press(Key::Right as u32);
        keys.press(Key::Up as u32);
        for _ in 0..500 {
            rig.steer(&keys);
        }
        assert!((rig.camera.magnitude() - 1.0).abs() < 1e-4);
    }
}
