pub mod celebration;
pub mod ledger;
pub mod orchestrator;
pub mod reel;
pub mod sequencer;
pub mod storage;

pub use celebration::{Burst, Celebration, FrameHandle, FrameScheduler, ParticleEmitter};
pub use ledger::WinnerLedger;
pub use orchestrator::{AudioCues, CueFuture, DrawOrchestrator, DrawParts};
pub use reel::{ReelSignals, SlotReel};
pub use sequencer::PrizeSequencer;
pub use storage::{BrowserStorage, KeyValueStore, MemoryStore};
