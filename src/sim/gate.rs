//! Two-step confirmation before ending the XR session
//!
//! The cancel button doubles as "begin ending the session" while idle; a
//! second press of it (or almost any other input) backs out, and only the
//! confirm button actually ends the session.

use serde::{Deserialize, Serialize};

use super::event::FrameAction;
use super::input::{Button, ButtonEdges};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GateState {
    #[default]
    Idle,
    AwaitingConfirmation,
}

/// Which buttons drive the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateBindings {
    pub fire: Button,
    pub confirm: Button,
    pub cancel: Button,
}

impl Default for GateBindings {
    fn default() -> Self {
        Self {
            fire: Button::Trigger,
            confirm: Button::Button1,
            cancel: Button::Button2,
        }
    }
}

/// Result of feeding one frame of edges to the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateOutcome {
    pub action: Option<FrameAction>,
    /// Host should end the XR session
    pub end_session: bool,
}

impl GateOutcome {
    fn emit(action: FrameAction) -> Self {
        Self {
            action: Some(action),
            end_session: action == FrameAction::SessionEndConfirmed,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionGate {
    state: GateState,
    bindings: GateBindings,
}

impl SessionGate {
    pub fn new(bindings: GateBindings) -> Self {
        Self {
            state: GateState::Idle,
            bindings,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_awaiting(&self) -> bool {
        self.state == GateState::AwaitingConfirmation
    }

    /// Apply at most one transition, highest priority first
    pub fn evaluate(&mut self, edges: ButtonEdges) -> GateOutcome {
        let b = self.bindings;
        let awaiting = self.is_awaiting();

        // A shot always takes the frame; while awaiting it also drops the pending end
        if edges.just_pressed(b.fire) {
            if awaiting {
                self.state = GateState::Idle;
                return GateOutcome::emit(FrameAction::Shoot);
            }
            return GateOutcome::default();
        }

        if edges.just_pressed(b.confirm) {
            if awaiting {
                self.state = GateState::Idle;
                return GateOutcome::emit(FrameAction::SessionEndConfirmed);
            }
            if !edges.just_pressed(b.cancel) {
                return GateOutcome::default();
            }
        }

        if edges.just_pressed(b.cancel) {
            if awaiting {
                self.state = GateState::Idle;
                return GateOutcome::emit(FrameAction::SessionEndCancelled);
            }
            self.state = GateState::AwaitingConfirmation;
            return GateOutcome::emit(FrameAction::SessionEndInitiated);
        }

        let other = edges
            .iter()
            .any(|btn| btn != b.fire && btn != b.confirm && btn != b.cancel);
        if awaiting && other {
            self.state = GateState::Idle;
            return GateOutcome::emit(FrameAction::SessionEndCancelled);
        }

        GateOutcome::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(buttons: &[Button]) -> ButtonEdges {
        buttons.iter().copied().collect()
    }

    #[test]
    fn test_confirm_from_idle_does_nothing() {
        let mut gate = SessionGate::default();
        let out = gate.evaluate(press(&[Button::Button1]));
        assert_eq!(out, GateOutcome::default());
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn test_cancel_twice_backs_out() {
        let mut gate = SessionGate::default();
        let out = gate.evaluate(press(&[Button::Button2]));
        assert_eq!(out.action, Some(FrameAction::SessionEndInitiated));
        assert!(gate.is_awaiting());

        let out = gate.evaluate(press(&[Button::Button2]));
        assert_eq!(out.action, Some(FrameAction::SessionEndCancelled));
        assert!(!out.end_session);
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn test_cancel_then_confirm_ends_session() {
        let mut gate = SessionGate::default();
        gate.evaluate(press(&[Button::Button2]));
        let out = gate.evaluate(press(&[Button::Button1]));
        assert_eq!(out.action, Some(FrameAction::SessionEndConfirmed));
        assert!(out.end_session);
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn test_fire_cancels_pending_end_as_shoot() {
        let mut gate = SessionGate::default();
        gate.evaluate(press(&[Button::Button2]));
        // Fire outranks the confirm pressed in the same frame
        let out = gate.evaluate(press(&[Button::Trigger, Button::Button1]));
        assert_eq!(out.action, Some(FrameAction::Shoot));
        assert!(!out.end_session);
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn test_confirm_outranks_cancel_while_awaiting() {
        let mut gate = SessionGate::default();
        gate.evaluate(press(&[Button::Button2]));
        let out = gate.evaluate(press(&[Button::Button1, Button::Button2]));
        assert_eq!(out.action, Some(FrameAction::SessionEndConfirmed));
        assert!(out.end_session);
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn test_confirm_and_cancel_from_idle_initiates() {
        let mut gate = SessionGate::default();
        let out = gate.evaluate(press(&[Button::Button1, Button::Button2]));
        assert_eq!(out.action, Some(FrameAction::SessionEndInitiated));
        assert!(!out.end_session);
        assert!(gate.is_awaiting());
    }

    #[test]
    fn test_other_button_cancels_pending_end() {
        let mut gate = SessionGate::default();
        gate.evaluate(press(&[Button::Button2]));
        let out = gate.evaluate(press(&[Button::Squeeze]));
        assert_eq!(out.action, Some(FrameAction::SessionEndCancelled));
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn test_other_button_while_idle_is_ignored() {
        let mut gate = SessionGate::default();
        let out = gate.evaluate(press(&[Button::Thumbstick, Button::Touchpad]));
        assert_eq!(out, GateOutcome::default());
    }

    #[test]
    fn test_fire_while_idle_leaves_gate_alone() {
        let mut gate = SessionGate::default();
        let out = gate.evaluate(press(&[Button::Trigger, Button::Button2]));
        assert_eq!(out.action, None);
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn test_custom_bindings() {
        let mut gate = SessionGate::new(GateBindings {
            fire: Button::Squeeze,
            confirm: Button::Thumbstick,
            cancel: Button::Touchpad,
        });
        assert_eq!(
            gate.evaluate(press(&[Button::Touchpad])).action,
            Some(FrameAction::SessionEndInitiated)
        );
        // Trigger is just "another button" under these bindings
        assert_eq!(
            gate.evaluate(press(&[Button::Trigger])).action,
            Some(FrameAction::SessionEndCancelled)
        );
    }
}
