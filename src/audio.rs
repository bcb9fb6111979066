//! Web Audio cues: a decelerating tick track for the spin and a short fanfare for the win.

use std::cell::{Cell, RefCell};

use wasm_bindgen::JsValue;
use web_sys::{AudioContext, OscillatorType};

use crate::state::{AudioCues, CueFuture};
use crate::util::cwarn;
use crate::web::sleep;

const TICK_HZ: f32 = 880.0;
const FANFARE_HZ: [f32; 4] = [523.25, 659.25, 783.99, 1046.5];
const FANFARE_STEP: f64 = 0.12;
const FANFARE_HOLD: f64 = 0.6;

#[derive(Default)]
pub struct WebAudioCues {
    // created lazily: browsers only allow it after a user gesture
    ctx: RefCell<Option<AudioContext>>,
    mute: Cell<bool>,
}

impl WebAudioCues {
    pub fn new() -> Self {
        Self::default()
    }

    fn context(&self) -> Option<AudioContext> {
        let mut slot = self.ctx.borrow_mut();
        if slot.is_none() {
            match AudioContext::new() {
                Ok(ctx) => *slot = Some(ctx),
                Err(e) => {
                    cwarn(&format!("audio unavailable: {e:?}"));
                    return None;
                }
            }
        }
        let ctx = slot.clone()?;
        let _ = ctx.resume();
        Some(ctx)
    }
}

fn tone(ctx: &AudioContext, hz: f32, start: f64, length: f64, volume: f32) -> Result<(), JsValue> {
    let osc = ctx.create_oscillator()?;
    osc.set_type(OscillatorType::Triangle);
    osc.frequency().set_value(hz);
    let gain = ctx.create_gain()?;
    let env = gain.gain();
    env.set_value_at_time(0.0, start)?;
    env.linear_ramp_to_value_at_time(volume, start + 0.01)?;
    env.exponential_ramp_to_value_at_time(0.0001, start + length)?;
    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;
    osc.start_with_when(start)?;
    osc.stop_with_when(start + length)?;
    Ok(())
}

/// Offsets (seconds) of the spin ticks; the gap widens as the reel slows.
pub fn tick_offsets(duration_secs: f64) -> Vec<f64> {
    let mut offsets = Vec::new();
    let mut t = 0.0;
    while t < duration_secs {
        offsets.push(t);
        let p = t / duration_secs;
        t += 0.05 + 0.2 * p * p;
    }
    offsets
}

impl AudioCues for WebAudioCues {
    fn mute(&self) -> bool {
        self.mute.get()
    }

    fn set_mute(&self, mute: bool) {
        self.mute.set(mute);
    }

    fn spin(&self, duration_secs: f64) {
        if self.mute.get() {
            return;
        }
        let Some(ctx) = self.context() else { return };
        let now = ctx.current_time();
        for offset in tick_offsets(duration_secs) {
            if let Err(e) = tone(&ctx, TICK_HZ, now + offset, 0.04, 0.15) {
                cwarn(&format!("spin tick failed: {e:?}"));
                return;
            }
        }
    }

    fn win(&self) -> CueFuture {
        if self.mute.get() {
            return Box::pin(async {});
        }
        let Some(ctx) = self.context() else {
            return Box::pin(async {});
        };
        let now = ctx.current_time();
        let last = FANFARE_HZ.len() - 1;
        for (i, hz) in FANFARE_HZ.iter().enumerate() {
            let length = if i == last { FANFARE_HOLD } else { FANFARE_STEP };
            if let Err(e) = tone(&ctx, *hz, now + i as f64 * FANFARE_STEP, length, 0.25) {
                cwarn(&format!("win cue failed: {e:?}"));
                return Box::pin(async {});
            }
        }
        let total = last as f64 * FANFARE_STEP + FANFARE_HOLD;
        sleep((total * 1000.0).ceil() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_fill_the_spin_and_slow_down() {
        let offsets = tick_offsets(3.9);
        assert_eq!(offsets[0], 0.0);
        assert!(offsets.iter().all(|t| *t < 3.9));
        let first_gap = offsets[1] - offsets[0];
        let last_gap = offsets[offsets.len() - 1] - offsets[offsets.len() - 2];
        assert!(last_gap > first_gap);
        assert!(tick_offsets(0.0).is_empty());
    }
}
