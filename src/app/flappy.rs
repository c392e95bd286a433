use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;

use pixel_arcade::Settings;
use pixel_arcade::highscores::GameKey;
use pixel_arcade::platform::web::{EventListener, FrameLoop, LoopControl, set_text, set_visible};
use pixel_arcade::platform::{Key, now_ms, seed};
use pixel_arcade::renderer::scenes;
use pixel_arcade::sim::flappy::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use pixel_arcade::sim::flappy::{
    FlapResponse, FlappyInput, FlappyState, Theme, flap_response, tick,
};

use super::shell::{
    AppError, Shell, mark_selected, on_click, on_keys, on_pick, paint_swatches,
};
use super::Mounted;

struct FlappyApp {
    shell: Shell,
    state: FlappyState,
    settings: Settings,
    frame: Option<FrameLoop>,
    jump_queued: bool,
}

impl FlappyApp {
    fn draw(&mut self) {
        scenes::flappy::render(&self.state, &mut self.shell.batch);
        self.shell.present();
    }

    fn update_hud(&self) {
        set_text("score", &self.state.session.score.to_string());
        set_visible("start-prompt", self.state.session.is_idle());
        let theme = self.state.theme;
        set_text("theme-name", theme.name());
        set_text("theme-description", theme.description());
        mark_selected("theme-picker", "theme", theme.id());
        // Themes are locked during a run
        set_visible("theme-picker", !self.state.session.is_playing());
    }

    fn pick_theme(&mut self, theme: Theme) {
        if !self.state.set_theme(theme) {
            return;
        }
        self.settings.flappy_theme = theme;
        self.settings.save(self.shell.store.as_mut());
        self.update_hud();
        self.draw();
    }

    /// Flap; the first flap of a session starts it and the frame loop
    fn flap(&mut self, from_click: bool, this: &Weak<RefCell<FlappyApp>>) {
        match flap_response(&self.state, from_click) {
            FlapResponse::Jump => {}
            FlapResponse::ShowGameOver => {
                self.shell.show_game_over(self.state.session.score);
                return;
            }
            FlapResponse::Ignore => return,
        }
        self.jump_queued = true;
        if !self.frame.as_ref().is_some_and(FrameLoop::is_running) {
            self.frame = Some(start_loop(this.clone()));
        }
    }

    fn restart(&mut self) {
        self.state.reset(seed());
        self.shell.hide_game_over();
        log::info!("Flappy restarted");
        self.update_hud();
    }

    fn frame(&mut self) -> LoopControl {
        let input = FlappyInput {
            jump: std::mem::take(&mut self.jump_queued),
        };
        tick(&mut self.state, &input, now_ms());
        self.draw();
        self.update_hud();

        if self.state.session.is_over() {
            log::info!("Flappy game over, score {}", self.state.session.score);
            self.shell.show_game_over(self.state.session.score);
            return LoopControl::Break;
        }
        LoopControl::Continue
    }
}

fn start_loop(app: Weak<RefCell<FlappyApp>>) -> FrameLoop {
    FrameLoop::start(move |_time| {
        let Some(app) = app.upgrade() else {
            return LoopControl::Break;
        };
        let mut app = app.borrow_mut();
        app.frame()
    })
}

pub async fn mount() -> Result<Mounted, AppError> {
    let shell = Shell::new(GameKey::Flappy, Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT)).await?;
    let settings = Settings::load(shell.store.as_ref());
    let state = FlappyState::new(seed(), settings.flappy_theme);

    let app = Rc::new(RefCell::new(FlappyApp {
        shell,
        state,
        settings,
        frame: None,
        jump_queued: false,
    }));
    paint_swatches("theme-picker", "theme", Theme::ALL.map(|t| (t.id(), t.swatch())));
    {
        let mut app = app.borrow_mut();
        app.update_hud();
        app.draw();
    }

    let mut listeners: Vec<EventListener> = Vec::new();

    let weak = Rc::downgrade(&app);
    listeners.push(on_keys(move |key| {
        let Some(app) = weak.upgrade() else { return };
        if matches!(key, Key::Space | Key::Up | Key::Enter) {
            app.borrow_mut().flap(false, &weak);
        }
    })?);

    let weak = Rc::downgrade(&app);
    listeners.push(on_click("canvas", move |_| {
        if let Some(app) = weak.upgrade() {
            app.borrow_mut().flap(true, &weak);
        }
    })?);

    let weak = Rc::downgrade(&app);
    listeners.push(on_pick("theme-picker", "theme", move |id| {
        let (Some(app), Some(theme)) = (weak.upgrade(), Theme::from_id(&id)) else {
            return;
        };
        app.borrow_mut().pick_theme(theme);
    })?);

    let weak = Rc::downgrade(&app);
    listeners.push(on_click("save-btn", move |_| {
        let Some(app) = weak.upgrade() else { return };
        let mut app = app.borrow_mut();
        let score = app.state.session.score;
        app.shell.save_score(score);
    })?);

    let weak = Rc::downgrade(&app);
    listeners.push(on_click("restart-btn", move |_| {
        if let Some(app) = weak.upgrade() {
            let mut app = app.borrow_mut();
            app.restart();
            app.draw();
        }
    })?);

    log::info!("Flappy ready with theme {}", app.borrow().state.theme.id());
    Ok(Mounted::new(app, listeners))
}
