//! JavaScript bridge for the WebXR host page
//!
//! The page owns three.js, the XR session and the controllers. Each animation
//! frame it reports the right controller's fresh button presses and ray pose;
//! the core answers through the optional methods of a bridge object:
//!
//! ```js
//! const gallery = initialize({
//!   addProjectile(id, x, y, z, qx, qy, qz, qw) {},
//!   moveProjectile(id, x, y, z) {},
//!   removeProjectile(id) {},
//!   updateTarget(x, y, z, visible, rotX, rotY) {},
//!   updateScore(text) {},
//! });
//! renderer.setAnimationLoop((time) => {
//!   gallery.frame(renderer.xr.getSession(), clock.getDelta(), time, mask, connected, pose, onHud);
//! });
//! ```

use glam::{Quat, Vec3};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::audio::{AudioManager, SoundEffect};
use crate::consts::MAX_FRAME_DELTA;
use crate::hud::HudOverlay;
use crate::sim::{
    ButtonEdges, FrameInput, GalleryHost, GameSession, Pose, Projectile, ProjectileId,
    SessionHandle, Target,
};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("XR Gallery module loaded");
}

/// Whether the browser can run an immersive VR session
///
/// Resolves to false when `navigator.xr` is missing so the page can install an
/// emulated device instead.
#[wasm_bindgen]
pub async fn is_vr_supported() -> Result<JsValue, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let navigator = window.navigator();

    // Dynamic access to navigator.xr to avoid feature flag issues
    let xr = js_sys::Reflect::get(&navigator, &JsValue::from_str("xr"))?;
    if xr.is_undefined() {
        return Ok(JsValue::from_bool(false));
    }

    let is_session_supported = js_sys::Reflect::get(&xr, &JsValue::from_str("isSessionSupported"))?;
    let is_session_supported_fn = is_session_supported.dyn_into::<js_sys::Function>()?;
    let promise = is_session_supported_fn.call1(&xr, &JsValue::from_str("immersive-vr"))?;
    wasm_bindgen_futures::JsFuture::from(js_sys::Promise::from(promise)).await
}

/// Calls optional methods on the page's bridge object
struct JsBridge {
    obj: JsValue,
    audio: AudioManager,
}

impl JsBridge {
    fn call(&self, name: &str, args: &[JsValue]) {
        let Some(method) = js_sys::Reflect::get(&self.obj, &JsValue::from_str(name))
            .ok()
            .and_then(|m| m.dyn_into::<js_sys::Function>().ok())
        else {
            return;
        };
        let args: js_sys::Array = args.iter().collect();
        if let Err(e) = method.apply(&self.obj, &args) {
            log::warn!("bridge.{} threw: {:?}", name, e);
        }
    }
}

fn num(v: f32) -> JsValue {
    JsValue::from_f64(f64::from(v))
}

impl GalleryHost for JsBridge {
    fn add_projectile(&mut self, p: &Projectile) {
        let q = p.orientation;
        self.call(
            "addProjectile",
            &[
                JsValue::from(p.id.0),
                num(p.pos.x),
                num(p.pos.y),
                num(p.pos.z),
                num(q.x),
                num(q.y),
                num(q.z),
                num(q.w),
            ],
        );
        self.audio.play(SoundEffect::Shoot);
    }

    fn move_projectile(&mut self, id: ProjectileId, pos: Vec3) {
        self.call(
            "moveProjectile",
            &[JsValue::from(id.0), num(pos.x), num(pos.y), num(pos.z)],
        );
    }

    fn remove_projectile(&mut self, id: ProjectileId) {
        self.call("removeProjectile", &[JsValue::from(id.0)]);
    }

    fn update_target(&mut self, t: &Target) {
        self.call(
            "updateTarget",
            &[
                num(t.pos.x),
                num(t.pos.y),
                num(t.pos.z),
                JsValue::from_bool(t.visible),
                num(t.rotation.x),
                num(t.rotation.y),
            ],
        );
    }

    fn play_hit_cue(&mut self) {
        self.audio.play(SoundEffect::Hit);
    }

    fn update_score(&mut self, text: &str) {
        self.call("updateScore", &[JsValue::from_str(text)]);
    }
}

/// `XRSession` from the page; null/undefined when not presenting
struct JsSession(JsValue);

impl SessionHandle for JsSession {
    fn end(&mut self) {
        let Ok(end) = js_sys::Reflect::get(&self.0, &JsValue::from_str("end")) else {
            return;
        };
        match end.dyn_into::<js_sys::Function>() {
            // The returned promise settles once the session has shut down
            Ok(end) => {
                if let Err(e) = end.call0(&self.0) {
                    log::warn!("XRSession.end() threw: {:?}", e);
                }
            }
            Err(_) => log::warn!("Session object has no end()"),
        }
    }
}

fn pose_from_slice(pose: &[f32]) -> Option<Pose> {
    let &[px, py, pz, qx, qy, qz, qw] = pose else {
        return None;
    };
    Some(Pose::new(
        Vec3::new(px, py, pz),
        Quat::from_xyzw(qx, qy, qz, qw).normalize(),
    ))
}

/// One play session, owned by the page
#[wasm_bindgen]
pub struct GalleryHandle {
    game: GameSession,
    bridge: JsBridge,
    hud: HudOverlay,
}

/// Build a session around the page's bridge object
///
/// `tuning_json` overrides and persists the tuning; otherwise the stored (or
/// default) tuning is used.
#[wasm_bindgen]
pub fn initialize(bridge: JsValue, tuning_json: Option<String>) -> Result<GalleryHandle, JsValue> {
    let tuning = match tuning_json {
        Some(json) => {
            let tuning = Tuning::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?;
            tuning.save();
            tuning
        }
        None => Tuning::load(),
    };

    let seed = js_sys::Date::now() as u64;
    let game = GameSession::new(tuning, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let mut bridge = JsBridge {
        obj: bridge,
        audio: AudioManager::new(),
    };
    game.start(&mut bridge);
    log::info!("Gallery initialized with seed: {}", seed);

    Ok(GalleryHandle {
        bridge,
        hud: HudOverlay::with_bindings(game.tuning().bindings),
        game,
    })
}

#[wasm_bindgen]
impl GalleryHandle {
    /// Run one frame
    ///
    /// `pressed_mask` has bit N set when gamepad button N went down this
    /// frame; `pose` is `[px, py, pz, qx, qy, qz, qw]` of the target ray.
    /// `hud` receives the frame event as JSON, at most once per frame.
    #[allow(clippy::too_many_arguments)]
    pub fn frame(
        &mut self,
        session: JsValue,
        delta: f32,
        time: f64,
        pressed_mask: u32,
        connected: bool,
        pose: &[f32],
        hud: Option<js_sys::Function>,
    ) {
        let dt = if delta.is_finite() {
            delta.clamp(0.0, MAX_FRAME_DELTA)
        } else {
            0.0
        };

        let input = match pose_from_slice(pose).filter(|_| connected) {
            Some(pose) => FrameInput::connected(ButtonEdges::from_mask(pressed_mask), pose),
            None => FrameInput::disconnected(),
        };

        let mut session = (!session.is_null() && !session.is_undefined()).then(|| JsSession(session));
        let event = self.game.frame(
            &mut self.bridge,
            session.as_mut().map(|s| s as &mut dyn SessionHandle),
            &input,
            dt,
        );

        let Some(event) = event else { return };
        if let Some(effect) = event.action.and_then(SoundEffect::for_action) {
            // Shots already chimed when their visual was added
            if effect != SoundEffect::Shoot {
                self.bridge.audio.play(effect);
            }
        }
        self.hud.apply(&event);
        log::trace!("Frame event at {:.0}ms: {:?}", time, event);

        if let Some(hud) = hud {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if let Err(e) = hud.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                        log::warn!("HUD callback threw: {:?}", e);
                    }
                }
                Err(e) => log::warn!("Could not serialize frame event: {}", e),
            }
        }
    }

    /// Overlay text for the page to paint into its HUD texture
    pub fn hud_lines(&self) -> js_sys::Array {
        self.hud.lines().iter().map(|l| JsValue::from_str(l)).collect()
    }

    /// Changes whenever the overlay text may have changed
    pub fn hud_revision(&self) -> f64 {
        self.hud.revision() as f64
    }

    pub fn score(&self) -> u32 {
        self.game.score()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.bridge.audio.set_muted(muted);
    }

    /// Master volume, 0.0 to 1.0
    pub fn set_volume(&mut self, volume: f32) {
        self.bridge.audio.set_master_volume(volume);
    }
}
