// Browser glue for the draw core: frames, timers, randomness, fullscreen.
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen::JsValue;

use crate::model::REFERENCE_VIEWPORT_WIDTH;
use crate::state::{CueFuture, FrameHandle, FrameScheduler};

/// `requestAnimationFrame` through gloo. A pending frame lives in `frames` until it runs or is
/// cancelled; dropping its `AnimationFrame` cancels it and frees the callback.
#[derive(Default)]
pub struct RafScheduler {
    next_id: Cell<i32>,
    frames: Rc<RefCell<HashMap<i32, AnimationFrame>>>,
}

impl RafScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for RafScheduler {
    fn request(&self, frame: Box<dyn FnOnce()>) -> Option<FrameHandle> {
        let id = self.next_id.get().wrapping_add(1);
        self.next_id.set(id);
        let frames = self.frames.clone();
        let handle = request_animation_frame(move |_| {
            let done = frames.borrow_mut().remove(&id);
            frame();
            drop(done);
        });
        self.frames.borrow_mut().insert(id, handle);
        Some(FrameHandle(id))
    }

    fn cancel(&self, handle: FrameHandle) {
        self.frames.borrow_mut().remove(&handle.0);
    }
}

pub fn random() -> f64 {
    js_sys::Math::random()
}

pub fn viewport_width() -> f64 {
    let Some(win) = web_sys::window() else {
        return REFERENCE_VIEWPORT_WIDTH;
    };
    if let Some(w) = win.inner_width().ok().and_then(|v| v.as_f64()) {
        if w > 0.0 {
            return w;
        }
    }
    win.document()
        .and_then(|d| d.document_element())
        .map(|el| el.client_width() as f64)
        .filter(|w| *w > 0.0)
        .unwrap_or(REFERENCE_VIEWPORT_WIDTH)
}

pub fn detach(cue: CueFuture) {
    wasm_bindgen_futures::spawn_local(cue);
}

/// Runs `f` once after `ms` milliseconds.
pub fn after(ms: u32, f: impl FnOnce() + 'static) {
    wasm_bindgen_futures::spawn_local(async move {
        TimeoutFuture::new(ms).await;
        f();
    });
}

/// Resolves after `ms` milliseconds.
pub fn sleep(ms: u32) -> CueFuture {
    Box::pin(TimeoutFuture::new(ms))
}

pub fn fullscreen_supported() -> bool {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return false;
    };
    let Some(root) = doc.document_element() else {
        return false;
    };
    let has = |target: &JsValue, name: &str| {
        js_sys::Reflect::get(target, &JsValue::from_str(name))
            .map(|v| v.is_function())
            .unwrap_or(false)
    };
    has(root.as_ref(), "requestFullscreen") && has(doc.as_ref(), "exitFullscreen")
}

pub fn toggle_fullscreen() {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if doc.fullscreen_element().is_none() {
        if let Some(root) = doc.document_element() {
            let _ = root.request_fullscreen();
        }
        return;
    }
    doc.exit_fullscreen();
}
