//! Drag Pong entry point
//!
//! Native builds run the game headless: the loop ticks on its own thread and
//! the log stands in for the screen. The browser build is driven from
//! `drag_pong::web` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::Duration;

    use drag_pong::{GameLoop, LogRenderer, Settings};

    env_logger::init();
    log::info!("Drag Pong (native) starting...");

    let settings = Settings::load();
    let handle = GameLoop::from_settings(&settings).spawn(LogRenderer::new());

    if settings.run_seconds == 0 {
        log::info!("Running until killed");
        loop {
            std::thread::park();
        }
    }

    std::thread::sleep(Duration::from_secs(settings.run_seconds));
    if let Some(state) = handle.stop() {
        println!(
            "Final score {} : {} after {} ticks",
            state.score.left, state.score.right, state.time_ticks
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is drag_pong::web::start, this is just to satisfy the compiler
}
