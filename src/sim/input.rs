//! Controller input for a single frame
//!
//! The host polls its XR gamepad once per frame and hands the core the set of
//! buttons that went down this frame plus the pose of the firing controller.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Buttons of the xr-standard gamepad mapping, in mapping index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Trigger,
    Squeeze,
    Touchpad,
    Thumbstick,
    /// A on the right controller, X on the left
    Button1,
    /// B on the right controller, Y on the left
    Button2,
}

impl Button {
    pub const ALL: [Button; 6] = [
        Button::Trigger,
        Button::Squeeze,
        Button::Touchpad,
        Button::Thumbstick,
        Button::Button1,
        Button::Button2,
    ];

    /// Index in the xr-standard gamepad `buttons` array
    pub fn index(self) -> u32 {
        match self {
            Button::Trigger => 0,
            Button::Squeeze => 1,
            Button::Touchpad => 2,
            Button::Thumbstick => 3,
            Button::Button1 => 4,
            Button::Button2 => 5,
        }
    }

    /// Name printed on the right controller
    pub fn label(self) -> &'static str {
        match self {
            Button::Trigger => "Trigger",
            Button::Squeeze => "Grip",
            Button::Touchpad => "Touchpad",
            Button::Thumbstick => "Stick",
            Button::Button1 => "A",
            Button::Button2 => "B",
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.index() == index)
    }

    fn bit(self) -> u32 {
        1 << self.index()
    }
}

/// Buttons that transitioned to pressed this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEdges(u32);

impl ButtonEdges {
    pub const NONE: ButtonEdges = ButtonEdges(0);

    /// Build from a gamepad bitmask (bit N = button index N); unmapped bits are dropped
    pub fn from_mask(mask: u32) -> Self {
        let known = Button::ALL.iter().fold(0, |acc, b| acc | b.bit());
        Self(mask & known)
    }

    pub fn with(mut self, button: Button) -> Self {
        self.0 |= button.bit();
        self
    }

    pub fn just_pressed(&self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Pressed buttons in mapping order
    pub fn iter(&self) -> impl Iterator<Item = Button> + '_ {
        Button::ALL.into_iter().filter(|b| self.just_pressed(*b))
    }
}

impl FromIterator<Button> for ButtonEdges {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        iter.into_iter().fold(ButtonEdges::NONE, ButtonEdges::with)
    }
}

/// World-space pose of the controller's target ray
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Unit vector the ray points along (-Z in the controller's local space)
    pub fn forward(&self) -> Vec3 {
        (self.orientation * Vec3::NEG_Z).normalize_or_zero()
    }
}

/// Snapshot of the firing controller for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerFrame {
    pub edges: ButtonEdges,
    pub pose: Pose,
}

/// Everything the core reads from the input source in a frame
///
/// `controller` is `None` while the firing controller is disconnected.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub controller: Option<ControllerFrame>,
}

impl FrameInput {
    pub fn connected(edges: ButtonEdges, pose: Pose) -> Self {
        Self {
            controller: Some(ControllerFrame { edges, pose }),
        }
    }

    pub fn disconnected() -> Self {
        Self { controller: None }
    }

    pub fn edges(&self) -> ButtonEdges {
        self.controller.map(|c| c.edges).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_drops_unknown_bits() {
        let edges = ButtonEdges::from_mask(0b1 | (1 << 5) | (1 << 12));
        assert!(edges.just_pressed(Button::Trigger));
        assert!(edges.just_pressed(Button::Button2));
        assert_eq!(edges.iter().count(), 2);
    }

    #[test]
    fn test_button_index_round_trip() {
        for b in Button::ALL {
            assert_eq!(Button::from_index(b.index()), Some(b));
        }
        assert_eq!(Button::from_index(9), None);
    }

    #[test]
    fn test_forward_follows_orientation() {
        let pose = Pose::default();
        assert!((pose.forward() - Vec3::NEG_Z).length() < 1e-6);

        // Quarter turn left about Y points -Z toward -X
        let turned = Pose::new(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        assert!((turned.forward() - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_disconnected_has_no_edges() {
        assert!(FrameInput::disconnected().edges().is_empty());
    }
}
