//! HUD text
//!
//! The host paints these strings into its 3D score text and its overlay
//! texture; nothing here touches a canvas.

use glam::{Quat, Vec3};

use crate::consts::SCORE_DISPLAY_MAX;
use crate::sim::{FrameAction, FrameEvent, GateBindings};

/// Four-digit, zero-padded score, pinned at 9999
pub fn format_score(score: u32) -> String {
    format!("{:04}", score.min(SCORE_DISPLAY_MAX))
}

fn format_vec3(v: Vec3) -> String {
    format!("{:.2}, {:.2}, {:.2}", v.x, v.y, v.z)
}

fn format_quat(q: Quat) -> String {
    format!("{:.2}, {:.2}, {:.2}, {:.2}", q.x, q.y, q.z, q.w)
}

/// Overlay panel contents, updated from each frame's event
#[derive(Debug, Clone, Default)]
pub struct HudOverlay {
    score: u32,
    last_action: Option<FrameAction>,
    position: Option<Vec3>,
    orientation: Option<Quat>,
    waiting: bool,
    /// Names the confirm/cancel buttons in the prompt
    bindings: GateBindings,
    /// Bumped on every change so the host knows to repaint
    revision: u64,
}

impl HudOverlay {
    pub fn with_bindings(bindings: GateBindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, event: &FrameEvent) {
        if let Some(score) = event.score {
            self.score = score;
        }
        if event.action.is_some() {
            self.last_action = event.action;
        }
        if event.position.is_some() {
            self.position = event.position;
            self.orientation = event.orientation;
        }
        self.waiting = event.waiting_for_confirmation;
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Score: {}", format_score(self.score))];
        if let Some(action) = self.last_action {
            lines.push(format!("Action: {}", action.as_str()));
        }
        if let Some(pos) = self.position {
            lines.push(format!("Position: {}", format_vec3(pos)));
        }
        if let Some(q) = self.orientation {
            lines.push(format!("Rotation: {}", format_quat(q)));
        }
        if self.waiting {
            lines.push(format!(
                "Confirm end of session? {}: confirm, {}: cancel",
                self.bindings.confirm.label(),
                self.bindings.cancel.label()
            ));
        }
        lines
    }
}
