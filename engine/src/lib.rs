//! Boot engine for NEON_CORE - sequencing, typewriter playback and the page model.
//!
//! This crate contains the playback state machine without TUI dependencies.
//!
//! ```text
//! App::start() -> trigger() -> Targets::resolve(page)   (fails fast on a missing mount)
//!                                   |
//!                                   v
//!                    tokio task: Sequencer::run()
//!                      for each line: wait -> append -> Typewriter -> scroll hook
//!                      pause -> reveal
//! ```

mod app;
mod cancel;
mod page;
mod playback;
mod sequencer;
mod surface;
mod typewriter;

pub use app::{App, BootPhase};
pub use cancel::{CancelToken, Cancelled};
pub use page::{LINE_BREAK, Page, PageLine, PageScroll, PageSnapshot, PageSurface, SurfaceState};
pub use playback::{Playback, SequenceError, trigger, trigger_lines};
pub use sequencer::{Outcome, PlaybackTiming, REVEAL_PAUSE, SEQUENCER_CHAR_DELAY, Sequencer};
pub use surface::{LineId, MissingTargetError, Mounts, NoHooks, PlaybackHooks, Surface, Targets};
pub use typewriter::{DEFAULT_CHAR_DELAY, LineTyper, Typewriter, TypewriterPhase};

pub use neon_types::{InvalidScriptError, Script, ScriptLine, StyleTag, SurfaceId};
