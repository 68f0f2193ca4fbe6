//! Plays a [`Script`] against the boot targets.

use std::sync::Arc;
use std::time::Duration;

use neon_types::{InvalidScriptError, Script, ScriptLine};
use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::surface::{PlaybackHooks, Surface, Targets};
use crate::typewriter::Typewriter;

/// Typewriter cadence used during the boot sequence.
pub const SEQUENCER_CHAR_DELAY: Duration = Duration::from_millis(10);
/// Pause between the last line finishing and the reveal.
pub const REVEAL_PAUSE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTiming {
    pub char_delay: Duration,
    pub reveal_pause: Duration,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            char_delay: SEQUENCER_CHAR_DELAY,
            reveal_pause: REVEAL_PAUSE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every line was typed and the reveal happened.
    Completed,
    /// Cancelled before the reveal. `lines_started` lines were appended,
    /// the last of which may be partially typed.
    Cancelled { lines_started: usize },
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    script: Arc<Script>,
    timing: PlaybackTiming,
    cancel: CancelToken,
}

impl Sequencer {
    #[must_use]
    pub fn new(script: Script) -> Self {
        Self {
            script: Arc::new(script),
            timing: PlaybackTiming::default(),
            cancel: CancelToken::new(),
        }
    }

    pub fn from_lines(lines: Vec<ScriptLine>) -> Result<Self, InvalidScriptError> {
        Script::new(lines).map(Self::new)
    }

    #[must_use]
    pub fn with_timing(mut self, timing: PlaybackTiming) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn script(&self) -> &Script {
        &self.script
    }

    #[must_use]
    pub fn timing(&self) -> PlaybackTiming {
        self.timing
    }

    #[must_use]
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Time from start to reveal for an uncancelled run.
    #[must_use]
    pub fn expected_duration(&self) -> Duration {
        let chars: usize = self
            .script
            .lines()
            .iter()
            .map(|line| line.text().chars().count())
            .sum();
        let typing = self.timing.char_delay.saturating_mul(chars as u32);
        self.script.last_offset() + typing + self.timing.reveal_pause
    }

    /// Play the script into `targets.output`, then reveal the logo and main content.
    ///
    /// Lines are strictly sequential: the wait before line N+1 starts only
    /// after line N's typewriter has finished. Cancellation is observed at
    /// every suspension point; a cancelled run never reveals.
    pub async fn run<S, H>(&self, targets: &mut Targets<S>, hooks: &mut H) -> Outcome
    where
        S: Surface,
        H: PlaybackHooks + ?Sized,
    {
        info!(
            lines = self.script.len(),
            char_delay_ms = self.timing.char_delay.as_millis() as u64,
            "Boot sequence started"
        );

        let typewriter = Typewriter::new(self.timing.char_delay).with_cancel(self.cancel.clone());

        for step in self.script.steps() {
            if self.cancel.sleep(step.wait).await.is_err() {
                return self.cancelled(step.index);
            }

            let line = targets.output.append_line(step.line.style());
            debug!(
                index = step.index,
                wait_ms = step.wait.as_millis() as u64,
                style = step.line.style().map(|tag| tag.as_str()),
                "Typing boot line"
            );

            if typewriter
                .type_line(step.line.text(), &mut targets.output, line)
                .await
                .is_err()
            {
                return self.cancelled(step.index + 1);
            }
            hooks.scroll_to_bottom();
        }

        if self.cancel.sleep(self.timing.reveal_pause).await.is_err() {
            return self.cancelled(self.script.len());
        }

        targets.reveal();
        info!("Boot sequence complete, content revealed");
        Outcome::Completed
    }

    fn cancelled(&self, lines_started: usize) -> Outcome {
        info!(lines_started, "Boot sequence cancelled");
        Outcome::Cancelled { lines_started }
    }
}
