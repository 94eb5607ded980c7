//! Deterministic gameplay core
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Frame deltas come from the caller
//! - Seeded RNG only
//! - Stable iteration order (by projectile id)
//! - No rendering, audio or platform dependencies

pub mod event;
pub mod gate;
pub mod input;
pub mod projectile;
pub mod session;
pub mod target;

pub use event::{FrameAction, FrameEvent};
pub use gate::{GateBindings, GateOutcome, GateState, SessionGate};
pub use input::{Button, ButtonEdges, ControllerFrame, FrameInput, Pose};
pub use projectile::{Projectile, ProjectileId, ProjectileRegistry};
pub use session::{GalleryHost, GameSession, SessionHandle};
pub use target::{Target, TargetController};
