//! Projectile registry
//!
//! Owns every live projectile. Projectiles are kept sorted by id (ids are
//! allocated monotonically) so iteration order is deterministic.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::input::Pose;

/// Stable handle for a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectileId(pub u32);

/// A fired shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub pos: Vec3,
    /// World-space velocity (units/second)
    pub vel: Vec3,
    /// Orientation at launch, for the visual
    pub orientation: Quat,
    /// Seconds left before expiry; expired once negative
    pub ttl: f32,
}

impl Projectile {
    pub fn is_expired(&self) -> bool {
        self.ttl < 0.0
    }
}

/// Set of live projectiles with spawn/advance/retire lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileRegistry {
    projectiles: Vec<Projectile>,
    speed: f32,
    ttl: f32,
    next_id: u32,
    /// Ids below this were live when the current frame began
    frame_cutoff: u32,
}

impl ProjectileRegistry {
    pub fn new(speed: f32, ttl: f32) -> Self {
        Self {
            projectiles: Vec::new(),
            speed,
            ttl,
            next_id: 1,
            frame_cutoff: 1,
        }
    }

    /// Snapshot the live set; projectiles spawned after this are not advanced until the next frame
    pub fn begin_frame(&mut self) {
        self.frame_cutoff = self.next_id;
    }

    /// Fire a projectile from `origin` along its forward axis
    pub fn spawn(&mut self, origin: Pose) -> ProjectileId {
        let id = ProjectileId(self.next_id);
        self.next_id += 1;
        self.projectiles.push(Projectile {
            id,
            pos: origin.position,
            vel: origin.forward() * self.speed,
            orientation: origin.orientation,
            ttl: self.ttl,
        });
        id
    }

    /// Integrate every projectile in the frame snapshot, appending `(id, new position)` to `out`
    pub fn advance_into(&mut self, dt: f32, out: &mut Vec<(ProjectileId, Vec3)>) {
        let cutoff = self.frame_cutoff;
        for p in self.projectiles.iter_mut().filter(|p| p.id.0 < cutoff) {
            p.pos += p.vel * dt;
            p.ttl -= dt;
            out.push((p.id, p.pos));
        }
    }

    pub fn advance_all(&mut self, dt: f32) -> Vec<(ProjectileId, Vec3)> {
        let mut out = Vec::with_capacity(self.projectiles.len());
        self.advance_into(dt, &mut out);
        out
    }

    /// Remove a projectile; unknown ids are ignored
    pub fn retire(&mut self, id: ProjectileId) -> Option<Projectile> {
        let index = self.projectiles.binary_search_by_key(&id, |p| p.id).ok()?;
        Some(self.projectiles.remove(index))
    }

    /// Remove every projectile whose ttl has gone negative
    pub fn expire_stale(&mut self) -> Vec<ProjectileId> {
        let expired: Vec<ProjectileId> = self
            .projectiles
            .iter()
            .filter(|p| p.is_expired())
            .map(|p| p.id)
            .collect();
        if !expired.is_empty() {
            self.projectiles.retain(|p| !p.is_expired());
        }
        expired
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.projectiles[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PROJECTILE_SPEED, PROJECTILE_TTL};
    use proptest::prelude::*;

    fn registry() -> ProjectileRegistry {
        ProjectileRegistry::new(PROJECTILE_SPEED, PROJECTILE_TTL)
    }

    #[test]
    fn test_spawn_sets_velocity_and_ttl() {
        let mut reg = registry();
        let id = reg.spawn(Pose::new(Vec3::new(1.0, 1.5, 0.0), Quat::IDENTITY));
        let p = reg.get(id).unwrap();
        assert_eq!(p.pos, Vec3::new(1.0, 1.5, 0.0));
        assert!((p.vel - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-6);
        assert_eq!(p.ttl, PROJECTILE_TTL);
    }

    #[test]
    fn test_spawned_mid_frame_waits_for_next_frame() {
        let mut reg = registry();
        reg.begin_frame();
        let id = reg.spawn(Pose::default());
        assert!(reg.advance_all(0.5).is_empty());
        assert_eq!(reg.get(id).unwrap().ttl, PROJECTILE_TTL);

        reg.begin_frame();
        let advanced = reg.advance_all(0.5);
        assert_eq!(advanced.len(), 1);
        assert_eq!(advanced[0].0, id);
    }

    #[test]
    fn test_retire_is_idempotent() {
        let mut reg = registry();
        let id = reg.spawn(Pose::default());
        assert!(reg.retire(id).is_some());
        assert!(reg.retire(id).is_none());
        assert!(reg.retire(ProjectileId(999)).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_ttl_five_expires_on_sixth_second() {
        let mut reg = registry();
        let id = reg.spawn(Pose::default());
        for step in 1..=6 {
            reg.begin_frame();
            let advanced = reg.advance_all(1.0);
            assert_eq!(advanced.len(), 1);
            let expired = reg.expire_stale();
            if step < 6 {
                // ttl hits exactly zero after 5 steps, which is not yet stale
                assert!(expired.is_empty(), "expired early at step {step}");
            } else {
                assert_eq!(expired, vec![id]);
            }
        }
        reg.begin_frame();
        assert!(reg.advance_all(1.0).is_empty());
    }

    #[test]
    fn test_expire_keeps_live_ones() {
        let mut reg = ProjectileRegistry::new(PROJECTILE_SPEED, 1.0);
        let old = reg.spawn(Pose::default());
        reg.begin_frame();
        reg.advance_all(0.75);
        let young = reg.spawn(Pose::default());
        reg.begin_frame();
        reg.advance_all(0.5);
        assert_eq!(reg.expire_stale(), vec![old]);
        assert!(reg.get(young).is_some());
    }

    proptest! {
        #[test]
        fn prop_integration_matches_sum(dts in prop::collection::vec(0.001f32..0.2, 1..40)) {
            let mut reg = ProjectileRegistry::new(PROJECTILE_SPEED, 1000.0);
            let start = Vec3::new(0.3, 1.2, -0.4);
            let pose = Pose::new(start, Quat::from_rotation_y(0.7));
            let id = reg.spawn(pose);
            let vel = reg.get(id).unwrap().vel;

            let mut total = 0.0f32;
            for dt in &dts {
                reg.begin_frame();
                reg.advance_all(*dt);
                total += dt;
            }

            let p = reg.get(id).unwrap();
            prop_assert!((p.pos - (start + vel * total)).length() < 1e-3);
            prop_assert!((p.ttl - (1000.0 - total)).abs() < 1e-2);
        }

        #[test]
        fn prop_expired_never_advanced_again(ttl in 0.1f32..3.0, dt in 0.05f32..0.5) {
            let mut reg = ProjectileRegistry::new(PROJECTILE_SPEED, ttl);
            let id = reg.spawn(Pose::default());
            let mut retired = false;
            for _ in 0..200 {
                reg.begin_frame();
                let advanced = reg.advance_all(dt);
                prop_assert!(!(retired && advanced.iter().any(|(a, _)| *a == id)));
                if reg.expire_stale().contains(&id) {
                    retired = true;
                }
            }
            prop_assert!(retired);
        }
    }
}
