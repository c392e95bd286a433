//! Pixel Arcade entry point
//!
//! On the web this mounts the page's game. Natively it plays every game with
//! the autoplay bots and prints the results.

#[cfg(target_arch = "wasm32")]
mod app;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pixel_arcade::headless;
    use pixel_arcade::highscores::list_scores;
    use pixel_arcade::persistence::MemoryStore;
    use pixel_arcade::platform::{now_utc, seed};

    env_logger::init();
    log::info!("Pixel Arcade (native) starting...");
    log::info!("Native mode runs the autoplay bots; build for wasm32 to play in the browser");

    let seed = std::env::var("PIXEL_ARCADE_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(seed);
    let mut store = MemoryStore::new();
    let runs = headless::run_all(seed, &mut store, now_utc());

    println!("\nAutoplay results (seed {}):", seed);
    for run in &runs {
        let saved = list_scores(&store, run.game).len();
        println!(
            "  {:<8} score {:>6}  steps {:>6}  {}  ({} saved)",
            run.game.title(),
            run.score,
            run.steps,
            if run.finished { "game over" } else { "capped" },
            saved
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
