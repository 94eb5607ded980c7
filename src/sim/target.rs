//! The gallery target
//!
//! One target for the whole session. A hit hides it, moves it somewhere new
//! and schedules it to reappear after a cooldown.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Target state as seen by the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub pos: Vec3,
    pub visible: bool,
    /// Accumulated rotation about x and y (radians)
    pub rotation: Vec2,
}

/// Owns the target and its relocate-on-hit policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetController {
    target: Target,
    home: Vec3,
    x_range: (f32, f32),
    z_range: (f32, f32),
    hit_radius: f32,
    reappear_delay: f32,
    rotation_step: f32,
    /// Seconds left before the target shows again; a later hit resets it
    cooldown: Option<f32>,
    /// Set by `on_hit` so the hit frame's own delta is not counted
    hit_this_frame: bool,
}

impl TargetController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            target: Target {
                pos: tuning.target_home,
                visible: true,
                rotation: Vec2::ZERO,
            },
            home: tuning.target_home,
            x_range: tuning.target_x_range,
            z_range: tuning.target_z_range,
            hit_radius: tuning.hit_radius,
            reappear_delay: tuning.target_reappear_delay,
            rotation_step: tuning.target_rotation_step,
            cooldown: None,
            hit_this_frame: false,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn current_position(&self) -> Vec3 {
        self.target.pos
    }

    pub fn is_visible(&self) -> bool {
        self.target.visible
    }

    /// Strict distance test against the hit radius
    pub fn test_hit(&self, projectile_pos: Vec3) -> bool {
        self.target.pos.distance(projectile_pos) < self.hit_radius
    }

    /// Hide, relocate, and (re)schedule reappearance
    pub fn on_hit<R: Rng>(&mut self, rng: &mut R) {
        let dx = rng.random_range(self.x_range.0..=self.x_range.1);
        let dz = rng.random_range(self.z_range.0..=self.z_range.1);
        self.target.pos = Vec3::new(self.home.x + dx, self.home.y, self.home.z + dz);
        self.target.visible = false;
        self.cooldown = Some(self.reappear_delay);
        self.hit_this_frame = true;
    }

    /// Advance rotation and the cooldown; returns true when the target reappears
    ///
    /// Rotation advances by a fixed step per call, not per second, so spin
    /// speed follows the host's frame rate. The cooldown starts counting on
    /// the first tick after the hit, so the target stays hidden for the full
    /// delay however long the hit frame was.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.target.rotation += Vec2::splat(self.rotation_step);

        if std::mem::take(&mut self.hit_this_frame) {
            return false;
        }
        let Some(left) = self.cooldown.as_mut() else {
            return false;
        };
        *left -= dt;
        if *left > 0.0 {
            return false;
        }
        self.cooldown = None;
        self.target.visible = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn controller() -> TargetController {
        TargetController::new(&Tuning::default())
    }

    #[test]
    fn test_hit_boundary_is_strict() {
        let tc = controller();
        let home = tc.current_position();
        assert!(tc.test_hit(home + Vec3::new(0.0, 0.0, 0.999)));
        assert!(!tc.test_hit(home + Vec3::new(0.0, 0.0, 1.0)));
        assert!(!tc.test_hit(home + Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_on_hit_relocates_within_bounds() {
        let mut tc = controller();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            tc.on_hit(&mut rng);
            let pos = tc.current_position();
            assert!(!tc.is_visible());
            assert!((-2.5..=2.5).contains(&pos.x));
            assert!((-5.0..=0.0).contains(&pos.z));
            assert_eq!(pos.y, 2.0);
        }
    }

    #[test]
    fn test_reappears_after_delay() {
        let mut tc = controller();
        let mut rng = Pcg32::seed_from_u64(1);
        tc.on_hit(&mut rng);
        // Hit frame
        assert!(!tc.tick(0.016));
        for _ in 0..3 {
            assert!(!tc.tick(0.5));
        }
        assert!(!tc.is_visible());
        assert!(tc.tick(0.5));
        assert!(tc.is_visible());
        // Nothing pending afterwards
        assert!(!tc.tick(10.0));
    }

    #[test]
    fn test_hit_frame_delta_not_counted() {
        let mut tc = controller();
        let mut rng = Pcg32::seed_from_u64(2);
        tc.on_hit(&mut rng);
        // A long hit frame must not eat into the cooldown
        assert!(!tc.tick(1.9));
        assert!(!tc.tick(1.9));
        assert!(!tc.is_visible());
        assert!(tc.tick(0.2));
    }

    #[test]
    fn test_second_hit_restarts_cooldown() {
        let mut tc = controller();
        let mut rng = Pcg32::seed_from_u64(3);
        tc.on_hit(&mut rng);
        tc.tick(0.016);
        tc.tick(1.5);
        tc.on_hit(&mut rng);
        tc.tick(0.016);
        // First hit's deadline passes without revealing the target
        assert!(!tc.tick(1.0));
        assert!(!tc.is_visible());
        assert!(tc.tick(1.0));
        assert!(tc.is_visible());
    }

    #[test]
    fn test_rotation_is_per_call() {
        let mut tc = controller();
        tc.tick(0.5);
        tc.tick(0.001);
        let rot = tc.target().rotation;
        assert!((rot.x - 0.02).abs() < 1e-6);
        assert!((rot.y - 0.02).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_hit_is_distance_only(x in -3.0f32..3.0, y in -3.0f32..3.0, z in -3.0f32..3.0) {
            let tc = controller();
            let p = Vec3::new(x, y, z);
            prop_assert_eq!(tc.test_hit(p), tc.current_position().distance(p) < 1.0);
        }
    }
}
