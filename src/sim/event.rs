//! Per-frame event record handed to the HUD

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// What happened this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameAction {
    Shoot,
    Hit,
    SessionEndConfirmed,
    SessionEndCancelled,
    SessionEndInitiated,
}

impl FrameAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameAction::Shoot => "Shoot",
            FrameAction::Hit => "Hit",
            FrameAction::SessionEndConfirmed => "SessionEndConfirmed",
            FrameAction::SessionEndCancelled => "SessionEndCancelled",
            FrameAction::SessionEndInitiated => "SessionEndInitiated",
        }
    }
}

/// Summary of a frame's meaningful transitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameEvent {
    pub action: Option<FrameAction>,
    /// Position of the projectile the action concerns
    pub position: Option<Vec3>,
    /// Orientation of the projectile the action concerns
    pub orientation: Option<Quat>,
    pub waiting_for_confirmation: bool,
    /// Updated score (only set when it changed)
    pub score: Option<u32>,
}

impl FrameEvent {
    /// Set the action unless an earlier one already claimed the frame
    pub fn claim(&mut self, action: FrameAction) -> bool {
        if self.action.is_some() {
            return false;
        }
        self.action = Some(action);
        true
    }

    /// True when any optional field carries data
    pub fn has_content(&self) -> bool {
        self.action.is_some()
            || self.position.is_some()
            || self.orientation.is_some()
            || self.score.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_claim_wins() {
        let mut ev = FrameEvent::default();
        assert!(ev.claim(FrameAction::Shoot));
        assert!(!ev.claim(FrameAction::Hit));
        assert_eq!(ev.action, Some(FrameAction::Shoot));
    }

    #[test]
    fn test_waiting_flag_alone_is_not_content() {
        let ev = FrameEvent {
            waiting_for_confirmation: true,
            ..Default::default()
        };
        assert!(!ev.has_content());
    }

    #[test]
    fn test_json_uses_camel_case() {
        let ev = FrameEvent {
            action: Some(FrameAction::Hit),
            score: Some(10),
            ..Default::default()
        };
        let json = serde_json::to_value(ev).unwrap();
        assert_eq!(json["action"], "Hit");
        assert_eq!(json["waitingForConfirmation"], false);
        assert_eq!(json["score"], 10);
    }
}
