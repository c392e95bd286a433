//! Pieces every game page shares: GPU canvas, store, score panel, save form

use chrono::{DateTime, Utc};
use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent};

use pixel_arcade::highscores::{
    GameKey, HighScores, LEADERBOARD_SIZE, PANEL_SIZE, ScoreRecord, format_date, record_score,
    sanitize_name,
};
use pixel_arcade::persistence::{KeyValueStore, LocalStore, MemoryStore};
use pixel_arcade::platform::web::{
    self, EventListener, clear_input, fill_rows, input_value, set_text, set_visible,
};
use pixel_arcade::platform::{Key, now_utc};
use pixel_arcade::renderer::{RenderState, ShapeBatch};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("page has no #{0} element")]
    MissingElement(&'static str),
    #[error("could not create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("could not open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("browser call failed: {0:?}")]
    Js(JsValue),
}

impl From<JsValue> for AppError {
    fn from(value: JsValue) -> Self {
        AppError::Js(value)
    }
}

/// LocalStorage, or an in-memory stand-in when the browser refuses it
pub fn open_store() -> Box<dyn KeyValueStore> {
    match LocalStore::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("{}; scores will not persist", e);
            Box::new(MemoryStore::new())
        }
    }
}

pub fn canvas() -> Result<HtmlCanvasElement, AppError> {
    web::element("canvas")
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or(AppError::MissingElement("canvas"))
}

/// Canvas pixel position of a click, in logical units
pub fn click_position(canvas: &HtmlCanvasElement, event: &MouseEvent, logical: Vec2) -> Vec2 {
    let client = Vec2::new(canvas.client_width() as f32, canvas.client_height() as f32);
    let offset = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
    if client.x <= 0.0 || client.y <= 0.0 {
        return offset;
    }
    offset * logical / client
}

/// A game page: GPU output, the shape batch scenes paint into, and storage
pub struct Shell {
    pub game: GameKey,
    pub batch: ShapeBatch,
    pub store: Box<dyn KeyValueStore>,
    pub canvas: HtmlCanvasElement,
    render: RenderState,
}

impl Shell {
    pub async fn new(game: GameKey, logical: Vec2) -> Result<Self, AppError> {
        let canvas = canvas()?;
        let dpr = web::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = (logical.x as f64 * dpr) as u32;
        let height = (logical.y as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render = RenderState::new(surface, &adapter, width, height).await?;

        let shell = Self {
            game,
            batch: ShapeBatch::new(logical.x, logical.y),
            store: open_store(),
            canvas,
            render,
        };
        shell.refresh_scores();
        if let Some(loading) = web::element("loading") {
            let _ = loading.class_list().add_1("hidden");
        }
        Ok(shell)
    }

    /// Change the canvas's logical size, keeping the device pixel ratio
    pub fn resize(&mut self, logical: Vec2) {
        let dpr = web::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = (logical.x as f64 * dpr) as u32;
        let height = (logical.y as f64 * dpr) as u32;
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.render.resize(width, height);
        self.batch.resize(logical.x, logical.y);
    }

    /// Push the painted batch to the screen
    pub fn present(&mut self) {
        match self.render.render(&self.batch) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => {
                let (w, h) = self.render.size;
                self.render.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }

    pub fn scores(&self) -> HighScores {
        HighScores::load(self.store.as_ref(), self.game)
    }

    /// Redraw the in-game top scores panel and the best-score readout
    pub fn refresh_scores(&self) {
        let scores = self.scores();
        fill_rows("scores-body", "tr", "td", &score_rows(&scores.top(PANEL_SIZE), now_utc()));
        set_visible("scores-empty", scores.is_empty());
        set_text("best", &scores.best().unwrap_or(0).to_string());
    }

    /// Show the game-over panel; saving is offered only for a positive score
    pub fn show_game_over(&self, score: u64) {
        set_text("final-score", &score.to_string());
        set_visible("game-over", true);
        set_visible("save-form", score > 0);
        let scores = self.scores();
        if score > 0 {
            set_text("rank", &scores.rank_of(score).to_string());
        }
        fill_rows(
            "leaderboard-body",
            "tr",
            "td",
            &score_rows(&scores.top(LEADERBOARD_SIZE), now_utc()),
        );
    }

    pub fn hide_game_over(&self) {
        set_visible("game-over", false);
    }

    /// Record the typed name against `score`. Returns false if nothing was
    /// saved (blank name or zero score).
    pub fn save_score(&mut self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        let raw = input_value("player-name").unwrap_or_default();
        let Some(name) = sanitize_name(&raw) else {
            log::info!("Ignoring blank player name");
            return false;
        };
        if record_score(self.store.as_mut(), self.game, &name, score, now_utc()).is_none() {
            return false;
        }
        clear_input("player-name");
        set_visible("save-form", false);
        self.refresh_scores();
        true
    }
}

/// Rank, name, score, date cells
pub fn score_rows(records: &[ScoreRecord], now: DateTime<Utc>) -> Vec<Vec<String>> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            vec![
                (i + 1).to_string(),
                r.name.clone(),
                r.score.to_string(),
                format_date(now, r.date),
            ]
        })
        .collect()
}

/// Listen for game keys on the window. Keys typed into text inputs are left
/// alone.
pub fn on_keys(mut handler: impl FnMut(Key) + 'static) -> Result<EventListener, AppError> {
    let window = web::window().ok_or(AppError::MissingElement("window"))?;
    let listener = EventListener::new(&window, "keydown", move |event| {
        if event
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            .is_some()
        {
            return;
        }
        let Some(key) = event
            .dyn_ref::<KeyboardEvent>()
            .and_then(|e| Key::from_key(&e.key()))
        else {
            return;
        };
        if key.captures_default() {
            event.prevent_default();
        }
        handler(key);
    })?;
    Ok(listener)
}

pub fn on_click(
    id: &'static str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<EventListener, AppError> {
    let target = web::element(id).ok_or(AppError::MissingElement(id))?;
    Ok(EventListener::new(&target, "click", handler)?)
}

/// Clicks on any descendant of `container_id` carrying `data-<name>`,
/// reported with the attribute value
pub fn on_pick(
    container_id: &'static str,
    name: &'static str,
    mut handler: impl FnMut(String) + 'static,
) -> Result<EventListener, AppError> {
    let selector = format!("[data-{}]", name);
    let attribute = format!("data-{}", name);
    on_click(container_id, move |event| {
        let value = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(&selector).ok().flatten())
            .and_then(|el| el.get_attribute(&attribute));
        if let Some(value) = value {
            handler(value);
        }
    })
}

/// Tint each picker button with the color paired to its `data-<name>` value
pub fn paint_swatches<'a>(
    container_id: &str,
    name: &str,
    swatches: impl IntoIterator<Item = (&'a str, &'a str)>,
) {
    let Some(container) = web::element(container_id) else {
        return;
    };
    for (value, color) in swatches {
        let selector = format!("[data-{}=\"{}\"]", name, value);
        if let Ok(Some(button)) = container.query_selector(&selector) {
            let _ = button.set_attribute("style", &format!("background-color: {}", color));
        }
    }
}

/// Mark the picker button whose `data-<name>` equals `value`
pub fn mark_selected(container_id: &str, name: &str, value: &str) {
    let Some(container) = web::element(container_id) else {
        return;
    };
    let Ok(buttons) = container.query_selector_all(&format!("[data-{}]", name)) else {
        return;
    };
    for i in 0..buttons.length() {
        let Some(button) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let selected = button.get_attribute(&format!("data-{}", name)).as_deref() == Some(value);
        let _ = button.class_list().toggle_with_force("selected", selected);
    }
}
