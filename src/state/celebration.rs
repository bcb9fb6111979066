// Confetti loop + sunburst overlay shown after a spin lands.
//
// The loop re-arms itself once per display frame. `stop()` cancels whatever frame is
// pending, so every interruption point can call it unconditionally.

use std::cell::Cell;
use std::rc::Rc;

use yew::Callback;

use crate::model::CONFETTI_COLORS;
use crate::util::{confetti_scale, cwarn, pick_index};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Display refresh scheduler (`requestAnimationFrame` in the browser).
pub trait FrameScheduler {
    fn request(&self, frame: Box<dyn FnOnce()>) -> Option<FrameHandle>;
    fn cancel(&self, handle: FrameHandle);
}

/// One emission request for the particle renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Burst {
    pub particle_count: u32,
    pub gravity: f64,
    /// Degrees.
    pub spread: f64,
    /// Fractions of the canvas size.
    pub origin: (f64, f64),
    pub colors: Vec<String>,
    pub scalar: f64,
}

pub trait ParticleEmitter {
    fn emit(&self, burst: &Burst);
}

#[cfg(test)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CelebrationState {
    Idle,
    Running,
}

pub struct Celebration {
    inner: Rc<Inner>,
}

struct Inner {
    scheduler: Box<dyn FrameScheduler>,
    emitter: Box<dyn ParticleEmitter>,
    overlay: Callback<bool>,
    random: Box<dyn Fn() -> f64>,
    viewport_width: Box<dyn Fn() -> f64>,
    running: Cell<bool>,
    pending: Cell<Option<FrameHandle>>,
}

impl Celebration {
    pub fn new(
        scheduler: Box<dyn FrameScheduler>,
        emitter: Box<dyn ParticleEmitter>,
        overlay: Callback<bool>,
        random: Box<dyn Fn() -> f64>,
        viewport_width: Box<dyn Fn() -> f64>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                scheduler,
                emitter,
                overlay,
                random,
                viewport_width,
                running: Cell::new(false),
                pending: Cell::new(None),
            }),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> CelebrationState {
        if self.inner.running.get() {
            CelebrationState::Running
        } else {
            CelebrationState::Idle
        }
    }

    /// Shows the overlay and emits the first burst right away. Ignored while running.
    pub fn start(&self) {
        if self.inner.running.get() {
            cwarn("celebration already running");
            return;
        }
        self.inner.running.set(true);
        self.inner.overlay.emit(true);
        run_frame(&self.inner);
    }

    pub fn stop(&self) {
        if let Some(handle) = self.inner.pending.take() {
            self.inner.scheduler.cancel(handle);
        }
        self.inner.running.set(false);
        self.inner.overlay.emit(false);
    }
}

impl Drop for Celebration {
    fn drop(&mut self) {
        if let Some(handle) = self.inner.pending.take() {
            self.inner.scheduler.cancel(handle);
        }
    }
}

impl Inner {
    fn burst(&self) -> Burst {
        let color = CONFETTI_COLORS[pick_index((self.random)(), CONFETTI_COLORS.len())];
        Burst {
            particle_count: 1,
            gravity: 0.8,
            spread: 90.0,
            origin: (0.5, 0.6),
            colors: vec![color.to_string()],
            scalar: confetti_scale((self.viewport_width)()),
        }
    }
}

fn run_frame(inner: &Rc<Inner>) {
    inner.pending.set(None);
    if !inner.running.get() {
        return;
    }
    inner.emitter.emit(&inner.burst());
    let weak = Rc::downgrade(inner);
    let handle = inner.scheduler.request(Box::new(move || {
        if let Some(inner) = weak.upgrade() {
            run_frame(&inner);
        }
    }));
    inner.pending.set(handle);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;

    type Frame = (i32, Box<dyn FnOnce()>);

    /// Frame scheduler advanced by hand.
    #[derive(Clone, Default)]
    pub struct ManualFrames {
        queue: Rc<RefCell<Vec<Frame>>>,
        next_id: Rc<Cell<i32>>,
        pub cancelled: Rc<RefCell<Vec<i32>>>,
    }

    impl ManualFrames {
        pub fn pending(&self) -> usize {
            self.queue.borrow().len()
        }

        /// Runs every frame queued before this call.
        pub fn tick(&self) {
            let due: Vec<Frame> = self.queue.borrow_mut().drain(..).collect();
            for (_, frame) in due {
                frame();
            }
        }
    }

    impl FrameScheduler for ManualFrames {
        fn request(&self, frame: Box<dyn FnOnce()>) -> Option<FrameHandle> {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            self.queue.borrow_mut().push((id, frame));
            Some(FrameHandle(id))
        }

        fn cancel(&self, handle: FrameHandle) {
            self.cancelled.borrow_mut().push(handle.0);
            self.queue.borrow_mut().retain(|(id, _)| *id != handle.0);
        }
    }

    #[derive(Clone, Default)]
    pub struct RecordingEmitter {
        pub bursts: Rc<RefCell<Vec<Burst>>>,
    }

    impl ParticleEmitter for RecordingEmitter {
        fn emit(&self, burst: &Burst) {
            self.bursts.borrow_mut().push(burst.clone());
        }
    }

    pub struct Rig {
        pub frames: ManualFrames,
        pub emitter: RecordingEmitter,
        pub overlay: Rc<Cell<bool>>,
    }

    pub fn celebration(width: f64) -> (Celebration, Rig) {
        let frames = ManualFrames::default();
        let emitter = RecordingEmitter::default();
        let overlay = Rc::new(Cell::new(false));
        let overlay_sink = overlay.clone();
        let celebration = Celebration::new(
            Box::new(frames.clone()),
            Box::new(emitter.clone()),
            Callback::from(move |visible: bool| overlay_sink.set(visible)),
            Box::new(|| 0.3),
            Box::new(move || width),
        );
        (
            celebration,
            Rig {
                frames,
                emitter,
                overlay,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::testing::celebration;
    use super::*;

    #[test]
    fn start_emits_every_frame_until_stopped() {
        let (c, rig) = celebration(1100.0);
        c.start();
        assert_eq!(c.state(), CelebrationState::Running);
        assert!(rig.overlay.get());
        assert_eq!(rig.emitter.bursts.borrow().len(), 1);

        rig.frames.tick();
        rig.frames.tick();
        assert_eq!(rig.emitter.bursts.borrow().len(), 3);
        assert_eq!(rig.frames.pending(), 1);

        c.stop();
        assert_eq!(c.state(), CelebrationState::Idle);
        assert!(!rig.overlay.get());
        assert_eq!(rig.frames.pending(), 0);
        rig.frames.tick();
        assert_eq!(rig.emitter.bursts.borrow().len(), 3);
    }

    #[test]
    fn stop_when_idle_is_a_no_op() {
        let (c, rig) = celebration(1100.0);
        c.stop();
        c.stop();
        assert_eq!(c.state(), CelebrationState::Idle);
        assert!(rig.frames.cancelled.borrow().is_empty());

        c.start();
        c.stop();
        c.stop();
        assert_eq!(rig.frames.cancelled.borrow().len(), 1);
    }

    #[test]
    fn start_while_running_does_not_double_the_loop() {
        let (c, rig) = celebration(1100.0);
        c.start();
        c.start();
        assert_eq!(rig.frames.pending(), 1);
        assert_eq!(rig.emitter.bursts.borrow().len(), 1);
    }

    #[test]
    fn burst_shape_and_scale() {
        let (c, rig) = celebration(660.0);
        c.start();
        let bursts = rig.emitter.bursts.borrow();
        let b = &bursts[0];
        assert_eq!(b.particle_count, 1);
        assert_eq!(b.gravity, 0.8);
        assert_eq!(b.spread, 90.0);
        assert_eq!(b.origin.1, 0.6);
        assert_eq!(b.scalar, 0.6);
        // 0.3 * 7 -> index 2
        assert_eq!(b.colors, vec!["#ff5e7e".to_string()]);
    }

    #[test]
    fn restart_after_stop_resumes_emission() {
        let (c, rig) = celebration(1100.0);
        c.start();
        c.stop();
        c.start();
        rig.frames.tick();
        assert_eq!(rig.emitter.bursts.borrow().len(), 3);
        assert_eq!(rig.frames.pending(), 1);
    }
}
