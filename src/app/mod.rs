//! Browser pages: one driver per game plus the high score page
//!
//! The page body picks what to mount: `data-page="leaderboard"` shows the
//! score table, anything else plays the game named by `data-game`.

mod flappy;
mod leaderboard;
mod memory;
mod shell;
mod snake;
mod tetris;

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use pixel_arcade::highscores::GameKey;
use pixel_arcade::platform::web::{EventListener, body_data, set_text, set_visible};

/// A mounted page: its state and the listeners feeding it. Dropping this
/// stops every loop and unregisters every listener.
pub struct Mounted {
    _app: Rc<dyn Any>,
    _listeners: Vec<EventListener>,
}

impl Mounted {
    fn new<T: 'static>(app: Rc<RefCell<T>>, listeners: Vec<EventListener>) -> Self {
        Self {
            _app: app,
            _listeners: listeners,
        }
    }
}

thread_local! {
    static PAGE: RefCell<Option<Mounted>> = const { RefCell::new(None) };
}

pub async fn run() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

    log::info!("Pixel Arcade starting...");

    let game = body_data("game")
        .and_then(|id| GameKey::from_id(&id))
        .unwrap_or(GameKey::Flappy);
    let page = body_data("page");

    let mounted = match page.as_deref() {
        Some("leaderboard") => leaderboard::mount(game),
        _ => match game {
            GameKey::Flappy => flappy::mount().await,
            GameKey::Snake => snake::mount().await,
            GameKey::Tetris => tetris::mount().await,
            GameKey::Memory => memory::mount().await,
        },
    };

    match mounted {
        Ok(mounted) => {
            PAGE.with(|page| *page.borrow_mut() = Some(mounted));
            log::info!("{} running!", game.title());
        }
        Err(e) => {
            log::error!("Could not start {}: {}", game.title(), e);
            set_text("error", &e.to_string());
            set_visible("error", true);
        }
    }
}
