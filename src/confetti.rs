// Canvas confetti. Particles are launched by bursts and animated by the renderer's own
// frame loop, which parks itself once every particle has faded.
use std::cell::{Cell, RefCell};
use std::f64::consts::PI;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::DrawError;
use crate::state::{Burst, ParticleEmitter};

const START_VELOCITY: f64 = 45.0;
const DECAY: f64 = 0.9;
const LIFETIME_TICKS: u32 = 200;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub color: String,
    velocity: f64,
    angle: f64,
    gravity: f64,
    scalar: f64,
    wobble: f64,
    wobble_speed: f64,
    tilt: f64,
    shimmer: f64,
    tick: u32,
}

impl Particle {
    /// `origin` is in canvas pixels; launch direction is straight up, fanned by `burst.spread`.
    pub fn launch(burst: &Burst, color: &str, origin: (f64, f64), random: &dyn Fn() -> f64) -> Self {
        let spread = burst.spread.to_radians();
        Self {
            x: origin.0,
            y: origin.1,
            color: color.to_string(),
            velocity: START_VELOCITY * 0.5 + random() * START_VELOCITY,
            angle: -(90f64.to_radians()) + (0.5 * spread - random() * spread),
            gravity: burst.gravity * 3.0,
            scalar: burst.scalar,
            wobble: random() * 10.0,
            wobble_speed: (random() * 0.1 + 0.05).min(0.11),
            tilt: (random() * 0.5 + 0.25) * PI,
            shimmer: random() + 2.0,
            tick: 0,
        }
    }

    /// Advances one frame; `false` once the particle has expired.
    pub fn step(&mut self) -> bool {
        self.x += self.angle.cos() * self.velocity;
        self.y += self.angle.sin() * self.velocity + self.gravity;
        self.velocity *= DECAY;
        self.wobble += self.wobble_speed;
        self.tilt += 0.1;
        self.tick += 1;
        self.tick < LIFETIME_TICKS
    }

    pub fn alpha(&self) -> f64 {
        1.0 - f64::from(self.tick) / f64::from(LIFETIME_TICKS)
    }

    /// Quad to fill for this frame.
    pub fn corners(&self) -> [(f64, f64); 4] {
        let wx = self.x + 10.0 * self.scalar * self.wobble.cos();
        let wy = self.y + 10.0 * self.scalar * self.wobble.sin();
        let (ts, tc) = (self.tilt.sin() * self.shimmer, self.tilt.cos() * self.shimmer);
        [
            (self.x, self.y),
            (wx, self.y + ts),
            (wx + tc, wy + ts),
            (self.x + tc, wy),
        ]
    }
}

pub struct ConfettiCanvas {
    canvas: HtmlCanvasElement,
    particles: Rc<RefCell<Vec<Particle>>>,
    animating: Rc<Cell<bool>>,
    frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    window: web_sys::Window,
}

impl ConfettiCanvas {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, DrawError> {
        let window = web_sys::window().ok_or(DrawError::MissingAnchor("window"))?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(DrawError::MissingAnchor("confetti-canvas 2d context"))?;

        let particles: Rc<RefCell<Vec<Particle>>> = Rc::new(RefCell::new(Vec::new()));
        let animating = Rc::new(Cell::new(false));
        let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        {
            let particles = particles.clone();
            let animating = animating.clone();
            let frame_loop = frame.clone();
            let window_loop = window.clone();
            let canvas = canvas.clone();
            *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                let w = canvas.width() as f64;
                let h = canvas.height() as f64;
                ctx.clear_rect(0.0, 0.0, w, h);
                let mut list = particles.borrow_mut();
                list.retain_mut(|p| p.step());
                for p in list.iter() {
                    let [a, b, c, d] = p.corners();
                    ctx.set_global_alpha(p.alpha());
                    ctx.set_fill_style_str(&p.color);
                    ctx.begin_path();
                    ctx.move_to(a.0, a.1);
                    ctx.line_to(b.0, b.1);
                    ctx.line_to(c.0, c.1);
                    ctx.line_to(d.0, d.1);
                    ctx.close_path();
                    ctx.fill();
                }
                ctx.set_global_alpha(1.0);
                if list.is_empty() {
                    animating.set(false);
                    return;
                }
                if let Some(cb) = frame_loop.borrow().as_ref() {
                    let _ = window_loop.request_animation_frame(cb.as_ref().unchecked_ref());
                }
            }) as Box<dyn FnMut()>));
        }

        Ok(Self {
            canvas,
            particles,
            animating,
            frame,
            window,
        })
    }

    fn fit_to_window(&self) {
        let w = self.window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let h = self.window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
        let (w, h) = (w.max(0.0) as u32, h.max(0.0) as u32);
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
    }
}

impl ParticleEmitter for ConfettiCanvas {
    fn emit(&self, burst: &Burst) {
        self.fit_to_window();
        let origin = (
            burst.origin.0 * self.canvas.width() as f64,
            burst.origin.1 * self.canvas.height() as f64,
        );
        let random = crate::web::random;
        {
            let mut list = self.particles.borrow_mut();
            for i in 0..burst.particle_count as usize {
                let Some(color) = burst.colors.get(i % burst.colors.len().max(1)) else {
                    break;
                };
                list.push(Particle::launch(burst, color, origin, &random));
            }
        }
        if self.animating.get() {
            return;
        }
        if let Some(cb) = self.frame.borrow().as_ref() {
            if self
                .window
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .is_ok()
            {
                self.animating.set(true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burst() -> Burst {
        Burst {
            particle_count: 1,
            gravity: 0.8,
            spread: 90.0,
            origin: (0.5, 0.6),
            colors: vec!["#26ccff".into()],
            scalar: 1.0,
        }
    }

    #[test]
    fn particle_rises_then_falls_and_expires() {
        let mut p = Particle::launch(&burst(), "#26ccff", (500.0, 400.0), &|| 0.5);
        assert!(p.step());
        assert!(p.y < 400.0);
        let mut frames = 1;
        while p.step() {
            frames += 1;
        }
        assert_eq!(frames + 1, LIFETIME_TICKS);
        assert!(p.y > 400.0);
        assert_eq!(p.alpha(), 0.0);
    }

    #[test]
    fn launch_angle_stays_inside_spread() {
        for sample in [0.0, 0.25, 0.5, 0.999] {
            let p = Particle::launch(&burst(), "#fff", (0.0, 0.0), &move || sample);
            let up = -(90f64.to_radians());
            assert!((p.angle - up).abs() <= 45f64.to_radians() + 1e-9);
        }
    }
}
