//! XR Gallery entry point
//!
//! The web build is driven from JavaScript through `xr_gallery::web`. The
//! native binary plays a short scripted session headlessly so the gameplay
//! loop can be watched in the log (`RUST_LOG=debug`).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("XR Gallery (native) starting...");
    log::info!("Native mode has no renderer - run the web build for the XR scene");

    let tuning = match std::env::args().nth(1) {
        Some(path) => load_tuning(&path),
        None => xr_gallery::Tuning::load(),
    };

    demo::run(tuning);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> xr_gallery::Tuning {
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| xr_gallery::Tuning::from_json(&json).map_err(|e| e.to_string()));
    match loaded {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("Falling back to default tuning ({}): {}", path, e);
            xr_gallery::Tuning::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::{Quat, Vec3};
    use xr_gallery::HudOverlay;
    use xr_gallery::sim::{
        Button, ButtonEdges, FrameInput, GameSession, Pose, SessionHandle,
    };
    use xr_gallery::Tuning;

    const FRAME_DT: f32 = 1.0 / 72.0;

    /// Stand-in for the XR session
    struct HeadlessSession {
        active: bool,
    }

    impl SessionHandle for HeadlessSession {
        fn end(&mut self) {
            if self.active {
                log::info!("Headless session ended");
                self.active = false;
            }
        }
    }

    fn press(button: Button, pose: Pose) -> FrameInput {
        FrameInput::connected(ButtonEdges::NONE.with(button), pose)
    }

    pub fn run(tuning: Tuning) {
        let mut game = match GameSession::new(tuning, 0x5eed) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Cannot start session: {}", e);
                return;
            }
        };
        let mut session = HeadlessSession { active: true };
        let mut hud = HudOverlay::with_bindings(game.tuning().bindings);
        game.start(&mut ());

        let rest = Pose::new(Vec3::new(0.15, 1.43, 3.0), Quat::IDENTITY);
        let idle = FrameInput::connected(ButtonEdges::NONE, rest);

        let mut step = |game: &mut GameSession, input: FrameInput| {
            let handle = session
                .active
                .then_some(&mut session as &mut dyn SessionHandle);
            if let Some(event) = game.frame(&mut (), handle, &input, FRAME_DT) {
                hud.apply(&event);
                println!("frame {:>4}: {}", game.frame_count(), hud.lines().join(" | "));
            }
        };

        // Two shots, each from two units in front of wherever the target stands,
        // then long enough for the target to come back
        for _ in 0..2 {
            let spot = game.target().pos;
            let aim = Pose::new(spot + Vec3::new(0.0, 0.0, 2.0), Quat::IDENTITY);
            step(&mut game, press(Button::Trigger, aim));
            for _ in 0..200 {
                step(&mut game, idle);
            }
        }

        // Start ending, back out, then start again and confirm
        for button in [Button::Button2, Button::Button2, Button::Button2, Button::Button1] {
            step(&mut game, press(button, rest));
        }

        println!(
            "\nFinal score {} after {} frames (session {})",
            game.score(),
            game.frame_count(),
            if session.active { "still active" } else { "ended" }
        );
    }
}
