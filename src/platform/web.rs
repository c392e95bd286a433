//! Browser loop drivers, listeners and DOM helpers
//!
//! Every handle here owns its JS callback and unregisters it on drop, so a
//! game releases its loop and listeners by dropping them.
//!
//! Callbacks must not drop their own handle while running; return
//! [`LoopControl::Break`] (or `None` for timeouts) instead.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlInputElement, Window};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Break,
}

pub fn window() -> Option<Window> {
    web_sys::window()
}

pub fn document() -> Option<Document> {
    window()?.document()
}

struct FrameState {
    handle: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameState {
    fn request(&self) {
        let Some(window) = window() else { return };
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else { return };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => self.handle.set(Some(id)),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
    }
}

/// A `requestAnimationFrame` loop
pub struct FrameLoop {
    state: Rc<FrameState>,
}

impl FrameLoop {
    /// Call `on_frame` with the frame timestamp every animation frame until it
    /// returns [`LoopControl::Break`] or the handle is dropped
    pub fn start(mut on_frame: impl FnMut(f64) -> LoopControl + 'static) -> Self {
        let state = Rc::new(FrameState {
            handle: Cell::new(None),
            callback: RefCell::new(None),
        });
        let weak = Rc::downgrade(&state);
        let closure = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            let Some(state) = weak.upgrade() else { return };
            state.handle.set(None);
            if on_frame(time) == LoopControl::Continue {
                state.request();
            }
        });
        *state.callback.borrow_mut() = Some(closure);
        state.request();
        Self { state }
    }

    pub fn is_running(&self) -> bool {
        self.state.handle.get().is_some()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(id), Some(window)) = (self.state.handle.take(), window()) {
            let _ = window.cancel_animation_frame(id);
        }
    }
}

struct TimeoutState {
    handle: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl TimeoutState {
    fn schedule(&self, delay_ms: u32) {
        let Some(window) = window() else { return };
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else { return };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms as i32,
        ) {
            Ok(id) => self.handle.set(Some(id)),
            Err(e) => log::warn!("setTimeout failed: {:?}", e),
        }
    }

    fn cancel(&self) {
        if let (Some(id), Some(window)) = (self.handle.take(), window()) {
            window.clear_timeout_with_handle(id);
        }
    }
}

/// A self-rescheduling `setTimeout` chain with a variable delay
pub struct TimeoutLoop {
    state: Rc<TimeoutState>,
}

impl TimeoutLoop {
    /// Call `on_tick` after `first_delay_ms`, then again after whatever delay
    /// it returns, until it returns `None` or the handle is dropped
    pub fn start(first_delay_ms: u32, mut on_tick: impl FnMut() -> Option<u32> + 'static) -> Self {
        let state = Rc::new(TimeoutState {
            handle: Cell::new(None),
            callback: RefCell::new(None),
        });
        let weak = Rc::downgrade(&state);
        let closure = Closure::<dyn FnMut()>::new(move || {
            let Some(state) = weak.upgrade() else { return };
            state.handle.set(None);
            if let Some(delay) = on_tick() {
                state.schedule(delay);
            }
        });
        *state.callback.borrow_mut() = Some(closure);
        state.schedule(first_delay_ms);
        Self { state }
    }

    /// Single shot
    pub fn once(delay_ms: u32, on_fire: impl FnOnce() + 'static) -> Self {
        let mut on_fire = Some(on_fire);
        Self::start(delay_ms, move || {
            if let Some(f) = on_fire.take() {
                f();
            }
            None
        })
    }

    pub fn is_pending(&self) -> bool {
        self.state.handle.get().is_some()
    }
}

impl Drop for TimeoutLoop {
    fn drop(&mut self) {
        self.state.cancel();
    }
}

/// An event listener that is removed when dropped
pub struct EventListener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventListener {
    pub fn new(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

pub fn element(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn set_text(id: &str, text: &str) {
    if let Some(el) = element(id) {
        el.set_text_content(Some(text));
    }
}

/// Toggle the `hidden` class
pub fn set_visible(id: &str, visible: bool) {
    if let Some(el) = element(id) {
        let _ = el.class_list().toggle_with_force("hidden", !visible);
    }
}

pub fn input_value(id: &str) -> Option<String> {
    element(id)?
        .dyn_into::<HtmlInputElement>()
        .ok()
        .map(|input| input.value())
}

pub fn clear_input(id: &str) {
    if let Some(input) = element(id).and_then(|el| el.dyn_into::<HtmlInputElement>().ok()) {
        input.set_value("");
    }
}

/// Replace an element's children with one `<tag>` per row of text cells
pub fn fill_rows(container_id: &str, row_tag: &str, cell_tag: &str, rows: &[Vec<String>]) {
    let (Some(document), Some(container)) = (document(), element(container_id)) else {
        return;
    };
    container.set_text_content(None);
    for cells in rows {
        let Ok(row) = document.create_element(row_tag) else { continue };
        for text in cells {
            if let Ok(cell) = document.create_element(cell_tag) {
                cell.set_text_content(Some(text));
                let _ = row.append_child(&cell);
            }
        }
        let _ = container.append_child(&row);
    }
}

/// `data-*` attribute of the page body
pub fn body_data(name: &str) -> Option<String> {
    document()?.body()?.get_attribute(&format!("data-{}", name))
}
