//! Application state for the boot screen host.
//!
//! Owns the page, the active playback and the user's requests (skip, replay,
//! quit). The TUI reads snapshots from here and forwards key presses.

use neon_types::{Script, SurfaceId};
use tracing::{info, warn};

use crate::page::{Page, PageScroll, PageSnapshot};
use crate::playback::{Playback, SequenceError, trigger};
use crate::sequencer::{PlaybackTiming, Sequencer};
use crate::surface::Targets;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPhase {
    /// Nothing has been triggered yet.
    Idle,
    /// Lines are being played back.
    Booting,
    /// The logo and main content are shown.
    Revealed,
    /// Playback ended without revealing (cancelled, or its task failed).
    Halted,
}

#[derive(Debug)]
pub struct App {
    script: Script,
    timing: PlaybackTiming,
    page: Page,
    playback: Option<Playback>,
    runs: usize,
    quit: bool,
}

impl App {
    #[must_use]
    pub fn new(script: Script, timing: PlaybackTiming) -> Self {
        Self {
            script,
            timing,
            page: Page::with_boot_mounts(),
            playback: None,
            runs: 0,
            quit: false,
        }
    }

    /// Trigger playback on the current page. Call once the host has mounted
    /// its surfaces; must run inside a tokio runtime.
    pub fn start(&mut self) -> Result<(), SequenceError> {
        if let Some(previous) = self.playback.take() {
            previous.cancel();
        }

        let sequencer = Sequencer::new(self.script.clone()).with_timing(self.timing);
        let playback = trigger(&self.page, sequencer, PageScroll::new(self.page.clone()))?;
        self.playback = Some(playback);
        self.runs += 1;
        info!(run = self.runs, "Boot playback triggered");
        Ok(())
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        self.page.snapshot()
    }

    #[must_use]
    pub fn timing(&self) -> PlaybackTiming {
        self.timing
    }

    /// Number of playbacks triggered so far.
    #[must_use]
    pub fn runs(&self) -> usize {
        self.runs
    }

    #[must_use]
    pub fn phase(&self) -> BootPhase {
        let revealed = self.page.snapshot().is_visible(&SurfaceId::LOGO);
        match &self.playback {
            None => BootPhase::Idle,
            Some(_) if revealed => BootPhase::Revealed,
            Some(playback) if !playback.is_finished() => BootPhase::Booting,
            Some(_) => BootPhase::Halted,
        }
    }

    /// Cancel the running playback and reveal the content immediately.
    pub fn skip(&mut self) -> Result<(), SequenceError> {
        if self.phase() != BootPhase::Booting {
            return Ok(());
        }
        if let Some(playback) = &self.playback {
            playback.cancel();
        }

        let mut targets = Targets::resolve(&self.page)?;
        targets.reveal();
        info!("Boot sequence skipped");
        Ok(())
    }

    /// Replay the boot on a fresh page. Ignored while a boot is running.
    pub fn replay(&mut self) -> Result<(), SequenceError> {
        if self.phase() == BootPhase::Booting {
            warn!("Replay requested while booting; ignoring");
            return Ok(());
        }
        self.page = Page::with_boot_mounts();
        self.start()
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Cancel any in-flight playback and wait for it to settle.
    pub async fn shutdown(&mut self) {
        let Some(playback) = self.playback.take() else {
            return;
        };
        playback.cancel();
        match playback.finish().await {
            Ok(outcome) => info!(?outcome, "Boot playback settled"),
            Err(err) => warn!("Boot playback ended abnormally: {err}"),
        }
    }
}
