use std::cell::RefCell;
use std::rc::{Rc, Weak};

use pixel_arcade::highscores::GameKey;
use pixel_arcade::platform::web::{EventListener, TimeoutLoop, set_text, set_visible};
use pixel_arcade::platform::{Key, now_ms, seed};
use pixel_arcade::renderer::scenes;
use pixel_arcade::sim::snake::{Direction, SnakeState, StepOutcome, tick};

use super::Mounted;
use super::shell::{AppError, Shell, on_click, on_keys};

struct SnakeApp {
    shell: Shell,
    state: SnakeState,
    stepper: Option<TimeoutLoop>,
}

impl SnakeApp {
    fn draw(&mut self) {
        scenes::snake::render(&self.state, &mut self.shell.batch);
        self.shell.present();
    }

    fn update_hud(&self) {
        set_text("score", &self.state.session.score.to_string());
        set_text("length", &self.state.len().to_string());
        set_visible("start-prompt", !self.state.session.is_playing());
    }

    /// Begin a run from idle, or from game over via the restart button
    fn start(&mut self, this: &Weak<RefCell<SnakeApp>>) {
        if self.state.session.is_playing() {
            return;
        }
        if self.state.session.is_over() {
            self.state.reset(seed());
            self.shell.hide_game_over();
        }
        self.state.session.start(now_ms());
        self.stepper = Some(start_stepper(this.clone(), self.state.interval_ms));
        self.update_hud();
        self.draw();
    }

    fn key(&mut self, key: Key, this: &Weak<RefCell<SnakeApp>>) {
        let direction = match key {
            Key::Up => Direction::Up,
            Key::Down => Direction::Down,
            Key::Left => Direction::Left,
            Key::Right => Direction::Right,
            Key::Space | Key::Enter => {
                if self.state.session.accepts_key_start() {
                    self.start(this);
                }
                return;
            }
        };
        self.state.queue_turn(direction);
    }

    /// One grid step; returns the delay before the next one
    fn step(&mut self) -> Option<u32> {
        let outcome = tick(&mut self.state);
        self.draw();
        self.update_hud();
        match outcome {
            StepOutcome::Skipped => None,
            StepOutcome::Crashed => {
                log::info!("Snake game over, score {}", self.state.session.score);
                self.shell.show_game_over(self.state.session.score);
                None
            }
            StepOutcome::Ate if self.state.session.is_over() => {
                log::info!("Snake filled the board, score {}", self.state.session.score);
                self.shell.show_game_over(self.state.session.score);
                None
            }
            StepOutcome::Moved | StepOutcome::Ate => Some(self.state.interval_ms),
        }
    }
}

fn start_stepper(app: Weak<RefCell<SnakeApp>>, first_delay: u32) -> TimeoutLoop {
    TimeoutLoop::start(first_delay, move || {
        let app = app.upgrade()?;
        let mut app = app.borrow_mut();
        app.step()
    })
}

pub async fn mount() -> Result<Mounted, AppError> {
    let state = SnakeState::new(seed());
    let size = scenes::snake::canvas_size(&state);
    let shell = Shell::new(GameKey::Snake, size).await?;

    let app = Rc::new(RefCell::new(SnakeApp {
        shell,
        state,
        stepper: None,
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

    log::info!("Snake ready");
    Ok(Mounted::new(app, listeners))
}
