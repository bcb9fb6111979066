//! Core data models for the lucky draw.
//! Prize catalog, winner records, the lock state machine and the control projection.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DrawError;

pub const MAX_REEL_ITEMS: usize = 40;
pub const CONFETTI_COLORS: [&str; 7] = [
    "#26ccff", "#a25afd", "#ff5e7e", "#88ff5a", "#fcff42", "#ffa62d", "#ff36ff",
];
pub const REFERENCE_VIEWPORT_WIDTH: f64 = 1100.0;

pub const PRIZE_INDEX_KEY: &str = "PrizeIndex";
pub const WINNER_KEY: &str = "Winner";

pub const CSV_HEADER: &str = "PrizeNo,PrizeName,PersonName";
pub const DONE_LABEL: &str = "Done";

const BUNDLED_PRIZES: &str = include_str!("../prizes.json");

/// Seconds the spin cue (and the reel animation) last for a reel of `reel_items` names.
pub fn spin_duration_secs(reel_items: usize) -> f64 {
    reel_items.saturating_sub(1) as f64 / 10.0
}

/// Ordered, immutable prize names. Index 0 is the lowest prize and is drawn first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrizeCatalog {
    names: Vec<String>,
}

impl PrizeCatalog {
    pub fn new(names: Vec<String>) -> Result<Self, DrawError> {
        if names.is_empty() {
            return Err(DrawError::Catalog("no prizes configured".into()));
        }
        Ok(Self { names })
    }

    pub fn from_json(raw: &str) -> Result<Self, DrawError> {
        let names: Vec<String> =
            serde_json::from_str(raw).map_err(|e| DrawError::Catalog(e.to_string()))?;
        Self::new(names)
    }

    pub fn bundled() -> Result<Self, DrawError> {
        Self::from_json(BUNDLED_PRIZES)
    }

    pub fn total(&self) -> u32 {
        self.names.len() as u32
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.names.get(index as usize).map(String::as_str)
    }
}

/// One confirmed winner. `prize_index` is the cursor value at confirmation time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerRecord {
    #[serde(rename = "PrizeNo")]
    pub prize_index: u32,
    #[serde(rename = "PrizeName", default, deserialize_with = "null_as_empty")]
    pub prize_name: String,
    /// Older lists stored `null` when the reel had no current winner.
    #[serde(rename = "PersonName", default, deserialize_with = "null_as_empty")]
    pub person_name: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockState {
    Idle,
    Spinning,
    AwaitingConfirmation,
    /// Every prize has been awarded; absorbing.
    Exhausted,
}

/// Which controls are interactive. Always derived from a [`LockState`], never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Controls {
    pub draw: bool,
    pub confirm: bool,
    pub settings: bool,
}

impl LockState {
    pub fn controls(self) -> Controls {
        Controls {
            draw: self == LockState::Idle,
            confirm: self == LockState::AwaitingConfirmation,
            settings: self != LockState::Spinning,
        }
    }
}

/// Values shown in the settings panel when it opens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsDraft {
    pub names_text: String,
    pub remove_winner: bool,
    pub sound_enabled: bool,
}

/// What the UI renders from the orchestrator after each action.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawView {
    pub lock: LockState,
    pub controls: Controls,
    pub reel_items: Vec<String>,
    pub reel_visible: bool,
    pub spinning: bool,
    pub spin_secs: f64,
    pub winner: Option<String>,
}

impl Default for DrawView {
    fn default() -> Self {
        Self {
            lock: LockState::Spinning,
            controls: LockState::Spinning.controls(),
            reel_items: Vec::new(),
            reel_visible: false,
            spinning: false,
            spin_secs: 0.0,
            winner: None,
        }
    }
}

/// Result of a draw request.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOutcome {
    /// The reel is spinning; the host settles it after this many seconds.
    Spinning { duration_secs: f64 },
    /// The name pool is empty; the settings panel should open with this draft.
    NeedsNames(SettingsDraft),
}
