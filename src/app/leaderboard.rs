//! High score page: every saved score of one game, sortable by column

use std::cell::RefCell;
use std::rc::Rc;

use pixel_arcade::highscores::{GameKey, HighScores, SortField, SortState};
use pixel_arcade::persistence::KeyValueStore;
use pixel_arcade::platform::now_utc;
use pixel_arcade::platform::web::{self, EventListener, fill_rows, set_text, set_visible};

use super::Mounted;
use super::shell::{AppError, mark_selected, on_click, on_pick, open_store, score_rows};

struct LeaderboardPage {
    store: Box<dyn KeyValueStore>,
    game: GameKey,
    sort: SortState,
}

impl LeaderboardPage {
    fn show(&self) {
        let scores = HighScores::load(self.store.as_ref(), self.game);
        let rows = score_rows(&scores.sorted(self.sort), now_utc());
        fill_rows("leaderboard-body", "tr", "td", &rows);
        set_visible("leaderboard-empty", scores.is_empty());
        set_text("leaderboard-title", self.game.title());
        set_text("sort-score-indicator", self.sort.indicator(SortField::Score));
        set_text("sort-date-indicator", self.sort.indicator(SortField::Date));
        mark_selected("game-tabs", "game", self.game.id());
    }
}

pub fn mount(initial: GameKey) -> Result<Mounted, AppError> {
    let page = Rc::new(RefCell::new(LeaderboardPage {
        store: open_store(),
        game: initial,
        sort: SortState::default(),
    }));
    page.borrow().show();
    if let Some(loading) = web::element("loading") {
        let _ = loading.class_list().add_1("hidden");
    }

    let mut listeners: Vec<EventListener> = Vec::new();

    for (id, field) in [("sort-score", SortField::Score), ("sort-date", SortField::Date)] {
        let weak = Rc::downgrade(&page);
        listeners.push(on_click(id, move |_| {
            if let Some(page) = weak.upgrade() {
                page.borrow_mut().sort.toggle(field);
                page.borrow().show();
            }
        })?);
    }

    let weak = Rc::downgrade(&page);
    listeners.push(on_pick("game-tabs", "game", move |id| {
        let (Some(page), Some(game)) = (weak.upgrade(), GameKey::from_id(&id)) else {
            return;
        };
        page.borrow_mut().game = game;
        page.borrow().show();
    })?);

    log::info!("Leaderboard ready on {}", initial.id());
    Ok(Mounted::new(page, listeners))
}
