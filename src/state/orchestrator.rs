//! Draw orchestrator: sequences prizes, gates the controls and reacts to reel lifecycle hooks.
//!
//! Every control's enablement is a projection of [`LockState`]. The reel reports through
//! [`ReelSignals`]; the queue is drained after each call into the reel.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::error::DrawError;
use crate::model::{
    Controls, DrawOutcome, DrawView, LockState, SettingsDraft, WinnerRecord, spin_duration_secs,
};
use crate::state::celebration::Celebration;
#[cfg(test)]
use crate::state::celebration::CelebrationState;
use crate::state::ledger::WinnerLedger;
use crate::state::reel::{ReelEngine, ReelEvent, ReelSignals};
use crate::state::sequencer::PrizeSequencer;
use crate::util::{clog, cwarn, parse_name_list};

pub type CueFuture = Pin<Box<dyn Future<Output = ()>>>;

pub trait AudioCues {
    fn mute(&self) -> bool;
    fn set_mute(&self, mute: bool);
    /// Fire-and-forget spin cue lasting `duration_secs`.
    fn spin(&self, duration_secs: f64);
    /// Resolves when the win cue has finished playing.
    fn win(&self) -> CueFuture;
}

pub struct DrawParts {
    pub reel: Box<dyn ReelEngine>,
    pub signals: ReelSignals,
    pub audio: Rc<dyn AudioCues>,
    pub celebration: Celebration,
    pub sequencer: PrizeSequencer,
    pub ledger: WinnerLedger,
    /// Runs a cue future in the background (`spawn_local` in the browser).
    pub detach: Rc<dyn Fn(CueFuture)>,
}

pub struct DrawOrchestrator {
    reel: Box<dyn ReelEngine>,
    signals: ReelSignals,
    audio: Rc<dyn AudioCues>,
    celebration: Celebration,
    sequencer: PrizeSequencer,
    ledger: WinnerLedger,
    detach: Rc<dyn Fn(CueFuture)>,
    lock: LockState,
    reel_visible: bool,
}

impl DrawOrchestrator {
    pub fn new(parts: DrawParts) -> Self {
        let DrawParts {
            reel,
            signals,
            audio,
            celebration,
            sequencer,
            ledger,
            detach,
        } = parts;
        // hooks raised while the reel was being filled carry no state change
        signals.drain();
        let lock = resting_state(&sequencer);
        Self {
            reel,
            signals,
            audio,
            celebration,
            sequencer,
            ledger,
            detach,
            lock,
            reel_visible: false,
        }
    }

    pub fn controls(&self) -> Controls {
        self.lock.controls()
    }

    pub fn view(&self) -> DrawView {
        DrawView {
            lock: self.lock,
            controls: self.controls(),
            reel_items: self.reel.reel_items().to_vec(),
            reel_visible: self.reel_visible,
            spinning: self.reel.is_spinning(),
            spin_secs: spin_duration_secs(self.reel.reel_items().len()),
            winner: self.reel.current_winner_name().map(str::to_owned),
        }
    }

    pub fn request_draw(&mut self) -> Result<DrawOutcome, DrawError> {
        self.expect(LockState::Idle, "draw")?;
        if self.reel.names().is_empty() {
            return Ok(DrawOutcome::NeedsNames(self.open_settings()?));
        }
        self.reel.spin();
        self.pump();
        Ok(DrawOutcome::Spinning {
            duration_secs: spin_duration_secs(self.reel.reel_items().len()),
        })
    }

    /// Called by the host when the reel animation has run its course.
    pub fn complete_spin(&mut self) -> Result<(), DrawError> {
        self.expect(LockState::Spinning, "complete a spin")?;
        self.reel.settle();
        self.pump();
        Ok(())
    }

    pub fn confirm(&mut self) -> Result<WinnerRecord, DrawError> {
        self.expect(LockState::AwaitingConfirmation, "confirm")?;
        self.celebration.stop();
        let prize_name = self
            .sequencer
            .current_prize()
            .ok_or(DrawError::OutOfRange {
                index: self.sequencer.index(),
                total: self.sequencer.total(),
            })?
            .to_string();
        let record = WinnerRecord {
            prize_index: self.sequencer.index(),
            prize_name,
            person_name: self.reel.current_winner_name().unwrap_or_default().to_string(),
        };
        if let Err(e) = self.ledger.append(record.clone()) {
            cwarn(&format!("winner not saved: {e}"));
        }
        self.sequencer.advance()?;
        self.reel_visible = false;
        self.lock = resting_state(&self.sequencer);
        Ok(record)
    }

    pub fn open_settings(&mut self) -> Result<SettingsDraft, DrawError> {
        self.refuse_while_spinning("open settings")?;
        self.celebration.stop();
        Ok(SettingsDraft {
            names_text: self.reel.names().join("\n"),
            remove_winner: self.reel.should_remove_winner(),
            sound_enabled: !self.audio.mute(),
        })
    }

    pub fn save_settings(&mut self, draft: &SettingsDraft) -> Result<(), DrawError> {
        self.refuse_while_spinning("save settings")?;
        self.reel.set_names(parse_name_list(&draft.names_text));
        self.reel.set_should_remove_winner(draft.remove_winner);
        self.audio.set_mute(!draft.sound_enabled);
        self.pump();
        Ok(())
    }

    pub fn winner_csv(&self) -> String {
        self.ledger.to_csv(self.sequencer.total())
    }

    /// Clears winners and cursor, then reloads the presentation state from storage.
    pub fn reset(&mut self) -> Result<(), DrawError> {
        self.refuse_while_spinning("reset")?;
        self.celebration.stop();
        let cleared = self.ledger.clear();
        self.sequencer.reload();
        self.reel_visible = false;
        self.lock = resting_state(&self.sequencer);
        clog("winner list and prize index cleared");
        cleared
    }

    fn pump(&mut self) {
        for event in self.signals.drain() {
            match event {
                ReelEvent::SpinStarted => self.on_spin_start(),
                ReelEvent::SpinEnded => self.on_spin_end(),
                ReelEvent::NameListChanged => self.celebration.stop(),
            }
        }
    }

    fn on_spin_start(&mut self) {
        self.celebration.stop();
        self.lock = LockState::Spinning;
        self.reel_visible = true;
        self.audio.spin(spin_duration_secs(self.reel.reel_items().len()));
    }

    fn on_spin_end(&mut self) {
        if self.lock != LockState::Spinning {
            cwarn(&format!("spin end ignored while {:?}", self.lock));
            return;
        }
        self.celebration.start();
        let cue = self.audio.win();
        (self.detach)(Box::pin(async move {
            cue.await;
            clog("win cue finished");
        }));
        self.lock = LockState::AwaitingConfirmation;
    }

    fn expect(&self, state: LockState, action: &'static str) -> Result<(), DrawError> {
        if self.lock == state {
            Ok(())
        } else {
            Err(DrawError::InvalidTransition {
                action,
                state: self.lock,
            })
        }
    }

    fn refuse_while_spinning(&self, action: &'static str) -> Result<(), DrawError> {
        if self.lock == LockState::Spinning {
            return Err(DrawError::InvalidTransition {
                action,
                state: self.lock,
            });
        }
        Ok(())
    }
}

fn resting_state(sequencer: &PrizeSequencer) -> LockState {
    if sequencer.is_exhausted() {
        LockState::Exhausted
    } else {
        LockState::Idle
    }
}

// Snapshot accessors for tests; the UI reads `view()`.
#[cfg(test)]
impl DrawOrchestrator {
    pub fn lock(&self) -> LockState {
        self.lock
    }

    pub fn label(&self) -> String {
        self.sequencer.current_label()
    }

    pub fn prize_index(&self) -> u32 {
        self.sequencer.index()
    }

    pub fn reel(&self) -> &dyn ReelEngine {
        self.reel.as_ref()
    }

    /// The reel strip is hidden from confirmation until the next spin starts.
    pub fn reel_visible(&self) -> bool {
        self.reel_visible
    }

    pub fn celebration_state(&self) -> CelebrationState {
        self.celebration.state()
    }
}
