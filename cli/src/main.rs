//! NEON_CORE boot screen - binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`neon_engine`] (page model and playback) and [`neon_tui`]
//! (rendering), providing RAII-based terminal management with guaranteed cleanup.
//!
//! ```text
//! main() -> TerminalSession::new() -> run_app() -> App + TUI
//! ```
//!
//! # Event Loop
//!
//! A fixed 16ms render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`neon_tui::InputPump`])
//! 3. Render a snapshot of the page
//! 4. After the first frame, trigger the boot playback (the "page has loaded" point)

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, File, OpenOptions},
    io::{Stdout, stdout},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use neon_config::{BootSettings, NeonConfig, UiSettings};
use neon_engine::{App, BootPhase, PlaybackTiming, Script};
use neon_tui::{InputPump, UiOptions, ViewState, draw, handle_events};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.neon/logs/neon.log
    if let Some(config_path) = NeonConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("neon.log"));
    }

    // Fallback: ./.neon/logs/neon.log (useful in constrained environments)
    candidates.push(PathBuf::from(".neon").join("logs").join("neon.log"));

    candidates
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Enables raw mode, enters the alternate screen and hides the cursor. On drop
/// all of it is undone, so the terminal stays usable after panics or early
/// returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            let _ = execute!(out, LeaveAlternateScreen, Show);
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen, Show);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show);
        let _ = self.terminal.show_cursor();
    }
}

fn load_config() -> Option<NeonConfig> {
    match NeonConfig::load() {
        Ok(config) => config,
        Err(err) => {
            // Already logged by the loader; fall back to built-in settings.
            tracing::warn!(path = %err.path().display(), "Using default settings");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = load_config();
    let boot = BootSettings::from_config(config.as_ref());
    let ui = UiSettings::from_config(config.as_ref());

    let options = UiOptions {
        high_contrast: ui.high_contrast,
        ascii_only: ui.ascii_only,
        reduced_motion: boot.reduced_motion,
    };
    let timing = PlaybackTiming {
        char_delay: boot.char_delay,
        reveal_pause: boot.reveal_pause,
    };
    let mut app = App::new(Script::neon_core(), timing);

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app, options).await
    };

    app.shutdown().await;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

const FRAME_DURATION: Duration = Duration::from_millis(16);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App, options: UiOptions) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut view = ViewState { options, tick: 0 };

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        match handle_events(app, &mut input) {
            Ok(true) => break Ok(()),
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        let snapshot = app.snapshot();
        if let Err(e) = terminal.draw(|frame| draw(frame, &snapshot, &view)) {
            break Err(e.into());
        }
        view.tick = view.tick.wrapping_add(1);

        // The host has mounted its surfaces and painted once: start the boot.
        if app.phase() == BootPhase::Idle
            && let Err(e) = app.start()
        {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
