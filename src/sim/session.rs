//! Per-frame gameplay loop
//!
//! `GameSession` owns all play state for one XR session and runs one frame
//! at a time: session gate, firing, projectile integration, hit resolution,
//! expiry, then target animation. Rendering, audio and the XR session itself
//! are reached only through the [`GalleryHost`] and [`SessionHandle`] traits.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::event::{FrameAction, FrameEvent};
use super::gate::{GateState, SessionGate};
use super::input::FrameInput;
use super::projectile::{Projectile, ProjectileId, ProjectileRegistry};
use super::target::{Target, TargetController};
use crate::hud::format_score;
use crate::tuning::{Tuning, TuningError};

/// Effects the core asks of the rendering/audio host
///
/// Every method defaults to a no-op so hosts only implement what they draw.
pub trait GalleryHost {
    /// A projectile was fired; create its visual
    fn add_projectile(&mut self, _projectile: &Projectile) {}
    fn move_projectile(&mut self, _id: ProjectileId, _pos: Vec3) {}
    /// A projectile hit something or expired; destroy its visual
    fn remove_projectile(&mut self, _id: ProjectileId) {}
    /// Called once per frame with the target's latest state
    fn update_target(&mut self, _target: &Target) {}
    fn play_hit_cue(&mut self) {}
    /// Score text, already clamped and zero padded
    fn update_score(&mut self, _text: &str) {}
}

/// Headless host
impl GalleryHost for () {}

/// The live XR session, as far as the core is concerned
pub trait SessionHandle {
    fn end(&mut self);
}

/// All state for one play session
pub struct GameSession {
    tuning: Tuning,
    registry: ProjectileRegistry,
    target: TargetController,
    gate: SessionGate,
    score: u32,
    rng: Pcg32,
    frame_count: u64,
    /// Reused each frame for advanced positions
    advanced: Vec<(ProjectileId, Vec3)>,
}

impl GameSession {
    /// Rejects tuning that would misbehave mid-session (e.g. an inverted
    /// relocation range)
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            registry: ProjectileRegistry::new(tuning.projectile_speed, tuning.projectile_ttl),
            target: TargetController::new(&tuning),
            gate: SessionGate::new(tuning.bindings),
            score: 0,
            rng: Pcg32::seed_from_u64(seed),
            frame_count: 0,
            advanced: Vec::new(),
            tuning,
        })
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Push the initial target and score to a freshly attached host
    pub fn start<H: GalleryHost + ?Sized>(&self, host: &mut H) {
        host.update_target(self.target.target());
        host.update_score(&format_score(self.score));
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn target(&self) -> &Target {
        self.target.target()
    }

    pub fn projectiles(&self) -> &ProjectileRegistry {
        &self.registry
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Run one frame; returns the frame's event when it carries anything
    ///
    /// `session` is `None` when no XR session is active, in which case a
    /// confirmed end is logged and dropped.
    pub fn frame<H: GalleryHost + ?Sized>(
        &mut self,
        host: &mut H,
        session: Option<&mut dyn SessionHandle>,
        input: &FrameInput,
        dt: f32,
    ) -> Option<FrameEvent> {
        self.frame_count += 1;
        self.registry.begin_frame();

        let mut event = FrameEvent::default();
        let edges = input.edges();
        let fire = self.tuning.bindings.fire;

        // Session gate
        let outcome = self.gate.evaluate(edges);
        if let Some(action) = outcome.action {
            event.claim(action);
            if action != FrameAction::Shoot {
                log::info!("Session gate: {} (frame {})", action.as_str(), self.frame_count);
            }
        }
        if outcome.end_session {
            match session {
                Some(session) => {
                    log::info!("Ending XR session at score {}", self.score);
                    session.end();
                }
                None => log::warn!("Session end confirmed but no XR session is active"),
            }
        }

        // Fire
        if let Some(controller) = input.controller.filter(|c| c.edges.just_pressed(fire)) {
            let id = self.registry.spawn(controller.pose);
            if let Some(projectile) = self.registry.get(id) {
                host.add_projectile(projectile);
            }
            event.claim(FrameAction::Shoot);
            event.position = Some(controller.pose.position);
            event.orientation = Some(controller.pose.orientation);
            log::debug!("Shot {:?} from {:?}", id, controller.pose.position);
        } else {
            for button in edges.iter().filter(|b| *b != fire) {
                log::debug!("Button pressed: {:?}", button);
            }
        }

        // Integrate the frame-start snapshot
        let mut advanced = std::mem::take(&mut self.advanced);
        advanced.clear();
        self.registry.advance_into(dt, &mut advanced);

        // Hits are resolved before expiry so a last-moment hit still counts
        for &(id, pos) in &advanced {
            if !self.target.is_visible() || !self.target.test_hit(pos) {
                host.move_projectile(id, pos);
                continue;
            }
            let Some(projectile) = self.registry.retire(id) else {
                continue;
            };
            self.target.on_hit(&mut self.rng);
            host.remove_projectile(id);
            host.play_hit_cue();

            self.score = self.score.saturating_add(self.tuning.score_increment);
            host.update_score(&format_score(self.score));
            event.score = Some(self.score);

            if event.claim(FrameAction::Hit) {
                event.position = Some(pos);
                event.orientation = Some(projectile.orientation);
            }
            log::info!(
                "Hit with {:?}, score {}, target moved to {:?}",
                id,
                self.score,
                self.target.current_position()
            );
        }
        self.advanced = advanced;

        for id in self.registry.expire_stale() {
            host.remove_projectile(id);
        }

        if self.target.tick(dt) {
            log::info!("Target back at {:?}", self.target.current_position());
        }
        host.update_target(self.target.target());

        event.waiting_for_confirmation = self.gate.is_awaiting();
        event.has_content().then_some(event)
    }
}
