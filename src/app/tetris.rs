use std::cell::RefCell;
use std::rc::{Rc, Weak};

use pixel_arcade::highscores::GameKey;
use pixel_arcade::platform::web::{EventListener, FrameLoop, LoopControl, set_text, set_visible};
use pixel_arcade::platform::{Key, now_ms, seed};
use pixel_arcade::renderer::scenes;
use pixel_arcade::sim::tetris::{TetrisAction, TetrisInput, TetrisState, tick};

use super::Mounted;
use super::shell::{AppError, Shell, on_click, on_keys};

/// Longest frame gap fed to gravity, so a backgrounded tab does not drop
/// a piece the whole board on return
const MAX_FRAME_MS: f64 = 250.0;

struct TetrisApp {
    shell: Shell,
    state: TetrisState,
    frame: Option<FrameLoop>,
    input: TetrisInput,
    last_time: Option<f64>,
}

impl TetrisApp {
    fn draw(&mut self) {
        scenes::tetris::render(&self.state, &mut self.shell.batch);
        self.shell.present();
    }

    fn update_hud(&self) {
        set_text("score", &self.state.session.score.to_string());
        set_text("level", &self.state.level.to_string());
        set_text("lines", &self.state.lines.to_string());
        set_visible("start-prompt", !self.state.session.is_playing());
    }

    fn key(&mut self, key: Key, this: &Weak<RefCell<TetrisApp>>) {
        if !self.state.session.is_playing() {
            if key.is_start() && self.state.session.accepts_key_start() {
                self.start(this);
            }
            return;
        }
        let action = match key {
            Key::Left => TetrisAction::Left,
            Key::Right => TetrisAction::Right,
            Key::Down => TetrisAction::SoftDrop,
            Key::Up => TetrisAction::Rotate,
            Key::Space => TetrisAction::HardDrop,
            Key::Enter => return,
        };
        self.input.actions.push(action);
    }

    fn start(&mut self, this: &Weak<RefCell<TetrisApp>>) {
        if self.state.session.is_playing() {
            return;
        }
        if self.state.session.is_over() {
            self.state.reset(seed());
            self.shell.hide_game_over();
        }
        self.input.actions.clear();
        self.input.actions.push(TetrisAction::Start);
        self.last_time = None;
        if !self.frame.as_ref().is_some_and(FrameLoop::is_running) {
            self.frame = Some(start_loop(this.clone()));
        }
    }

    fn frame(&mut self, time: f64) -> LoopControl {
        let dt = self
            .last_time
            .map_or(0.0, |last| (time - last).clamp(0.0, MAX_FRAME_MS));
        self.last_time = Some(time);

        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input, dt, now_ms());
        self.draw();
        self.update_hud();

        if self.state.session.is_over() {
            log::info!(
                "Tetris game over, score {} ({} lines)",
                self.state.session.score,
                self.state.lines
            );
            self.shell.show_game_over(self.state.session.score);
            return LoopControl::Break;
        }
        LoopControl::Continue
    }
}

fn start_loop(app: Weak<RefCell<TetrisApp>>) -> FrameLoop {
    FrameLoop::start(move |time| {
        let Some(app) = app.upgrade() else {
            return LoopControl::Break;
        };
        let mut app = app.borrow_mut();
        app.frame(time)
    })
}

pub async fn mount() -> Result<Mounted, AppError> {
    let shell = Shell::new(GameKey::Tetris, scenes::tetris::CANVAS_SIZE).await?;

    let app = Rc::new(RefCell::new(TetrisApp {
        shell,
        state: TetrisState::new(seed()),
        frame: None,
        input: TetrisInput::default(),
        last_time: None,
    }));
    {
        let mut app = app.borrow_mut();
        app.update_hud();
        app.draw();
    }

    let mut listeners: Vec<EventListener> = Vec::new();

    let weak = Rc::downgrade(&app);
    listeners.push(on_keys(move |key| {
        if let Some(app) = weak.upgrade() {
            app.borrow_mut().key(key, &weak);
        }
    })?);

    let weak = Rc::downgrade(&app);
    listeners.push(on_click("restart-btn", move |_| {
        if let Some(app) = weak.upgrade() {
            app.borrow_mut().start(&weak);
        }
    })?);

    let weak = Rc::downgrade(&app);
    listeners.push(on_click("save-btn", move |_| {
        let Some(app) = weak.upgrade() else { return };
        let mut app = app.borrow_mut();
        let score = app.state.session.score;
        app.shell.save_score(score);
    })?);

    log::info!("Tetris ready");
    Ok(Mounted::new(app, listeners))
}
