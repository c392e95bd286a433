use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

use pixel_arcade::Settings;
use pixel_arcade::highscores::GameKey;
use pixel_arcade::platform::web::{
    EventListener, FrameLoop, LoopControl, TimeoutLoop, set_text, set_visible,
};
use pixel_arcade::platform::{now_ms, seed};
use pixel_arcade::renderer::scenes;
use pixel_arcade::sim::memory::{
    ClickOutcome, Difficulty, MemoryState, MemoryTimer, format_time, tick,
};
use pixel_arcade::sim::{Deferred, DeferredQueue};

use super::Mounted;
use super::shell::{
    AppError, Shell, click_position, mark_selected, on_click, on_pick, open_store,
};

struct MemoryApp {
    shell: Shell,
    state: MemoryState,
    settings: Settings,
    frame: Option<FrameLoop>,
    last_time: Option<f64>,
    deferred: DeferredQueue<MemoryTimer>,
    timers: Vec<TimeoutLoop>,
}

impl MemoryApp {
    fn draw(&mut self) {
        scenes::memory::render(&self.state, &mut self.shell.batch);
        self.shell.present();
    }

    fn update_hud(&self) {
        set_text("score", &self.state.session.score.to_string());
        set_text("moves", &self.state.moves.to_string());
        set_text("time", &format_time(self.state.elapsed_secs()));
        set_visible("start-prompt", !self.state.session.is_playing());
        mark_selected("difficulty-picker", "difficulty", self.state.difficulty.id());
        set_visible("difficulty-picker", !self.state.session.is_playing());
    }

    fn pick_difficulty(&mut self, difficulty: Difficulty) {
        if !self.state.set_difficulty(difficulty) {
            return;
        }
        self.settings.memory_difficulty = difficulty;
        self.settings.save(self.shell.store.as_mut());
        self.shell.resize(scenes::memory::board_size(difficulty));
        self.update_hud();
        self.draw();
    }

    fn start(&mut self, this: &Weak<RefCell<MemoryApp>>) {
        if self.state.session.is_playing() {
            return;
        }
        if self.state.session.is_over() {
            self.state.reset(seed());
            self.shell.hide_game_over();
        }
        self.deferred.clear();
        self.timers.clear();
        self.state.start(now_ms());
        self.last_time = None;
        if !self.frame.as_ref().is_some_and(FrameLoop::is_running) {
            self.frame = Some(start_loop(this.clone()));
        }
        self.update_hud();
    }

    fn click(&mut self, event: &MouseEvent, this: &Weak<RefCell<MemoryApp>>) {
        let logical = scenes::memory::board_size(self.state.difficulty);
        let point = click_position(&self.shell.canvas, event, logical);
        let Some(id) = scenes::memory::card_at(self.state.difficulty, self.state.cards.len(), point)
        else {
            return;
        };
        match self.state.click(id, now_ms()) {
            ClickOutcome::Ignored => return,
            ClickOutcome::Flipped | ClickOutcome::Matched { .. } => {}
            ClickOutcome::Mismatched(flip_back) => self.schedule(flip_back, this),
            ClickOutcome::Completed { final_score, prompt } => {
                log::info!("Memory complete, final score {}", final_score);
                self.schedule(prompt, this);
            }
        }
        self.update_hud();
        self.draw();
    }

    /// Queue delayed work and arm a timer to run it
    fn schedule(&mut self, deferred: Deferred<MemoryTimer>, this: &Weak<RefCell<MemoryApp>>) {
        let due = deferred.due_ms;
        let delay = (due - now_ms()).max(0.0).ceil() as u32;
        self.deferred.push(deferred);
        self.timers.retain(TimeoutLoop::is_pending);

        let app = this.clone();
        self.timers.push(TimeoutLoop::once(delay, move || {
            if let Some(app) = app.upgrade() {
                app.borrow_mut().run_due(now_ms().max(due));
            }
        }));
    }

    fn run_due(&mut self, now: f64) {
        for deferred in self.deferred.drain_due(now) {
            if !self.state.fire(&deferred) {
                continue;
            }
            if deferred.action == MemoryTimer::ShowLeaderboard {
                self.shell.show_game_over(self.state.session.score);
            }
        }
        self.draw();
    }

    fn frame(&mut self, time: f64) -> LoopControl {
        let dt = self.last_time.map_or(0.0, |last| (time - last).max(0.0));
        self.last_time = Some(time);
        tick(&mut self.state, dt);
        self.update_hud();
        self.draw();
        if self.state.session.is_playing() {
            LoopControl::Continue
        } else {
            LoopControl::Break
        }
    }
}

fn start_loop(app: Weak<RefCell<MemoryApp>>) -> FrameLoop {
    FrameLoop::start(move |time| {
        let Some(app) = app.upgrade() else {
            return LoopControl::Break;
        };
        let mut app = app.borrow_mut();
        app.frame(time)
    })
}

pub async fn mount() -> Result<Mounted, AppError> {
    let store = open_store();
    let settings = Settings::load(store.as_ref());
    let difficulty = settings.memory_difficulty;
    let shell = Shell::new(GameKey::Memory, scenes::memory::board_size(difficulty)).await?;

    let app = Rc::new(RefCell::new(MemoryApp {
        shell,
        state: MemoryState::new(seed(), difficulty),
        settings,
        frame: None,
        last_time: None,
        deferred: DeferredQueue::new(),
        timers: Vec::new(),
    }));
    {
        let mut app = app.borrow_mut();
        app.update_hud();
        app.draw();
    }

    let mut listeners: Vec<EventListener> = Vec::new();

    let weak = Rc::downgrade(&app);
    listeners.push(on_click("canvas", move |event| {
        let (Some(app), Some(event)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>()) else {
            return;
        };
        app.borrow_mut().click(event, &weak);
    })?);

    for id in ["start-btn", "restart-btn"] {
        let weak = Rc::downgrade(&app);
        listeners.push(on_click(id, move |_| {
            if let Some(app) = weak.upgrade() {
                app.borrow_mut().start(&weak);
            }
        })?);
    }

    let weak = Rc::downgrade(&app);
    listeners.push(on_pick("difficulty-picker", "difficulty", move |id| {
        let (Some(app), Some(difficulty)) = (weak.upgrade(), Difficulty::from_id(&id)) else {
            return;
        };
        app.borrow_mut().pick_difficulty(difficulty);
    })?);

    let weak = Rc::downgrade(&app);
    listeners.push(on_click("save-btn", move |_| {
        let Some(app) = weak.upgrade() else { return };
        let mut app = app.borrow_mut();
        let score = app.state.session.score;
        app.shell.save_score(score);
    })?);

    log::info!("Memory ready on {}", difficulty.id());
    Ok(Mounted::new(app, listeners))
}
