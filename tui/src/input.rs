//! Input handling for the boot screen.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::debug;

use neon_engine::{App, BootPhase};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 64; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 16; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and queues them for the frame loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a backpressured send unblocks.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain queued input and apply it to `app`. Returns `true` when the user quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let msg = match input.rx.try_recv() {
            Ok(msg) => msg,
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input thread exited"));
            }
        };
        processed += 1;

        let ev = match msg {
            InputMsg::Event(ev) => ev,
            InputMsg::Error(err) => return Err(anyhow!("terminal input failed: {err}")),
        };

        if let Event::Key(key) = ev
            && handle_key(app, key)?
        {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Apply a single key press. Returns `true` when the key quits.
///
/// Skip and replay spawn playback work, so this must run inside a tokio runtime.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return Ok(false);
    }

    let quit = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    };
    if quit {
        debug!("Quit requested");
        app.request_quit();
        return Ok(true);
    }

    match (key.code, app.phase()) {
        (KeyCode::Enter | KeyCode::Char(' '), BootPhase::Booting) => app.skip()?,
        (KeyCode::Char('r'), BootPhase::Revealed | BootPhase::Halted) => app.replay()?,
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
    use neon_engine::{App, BootPhase, PlaybackTiming, Script, SurfaceId};

    use super::handle_key;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(Script::neon_core(), PlaybackTiming::default())
    }

    #[tokio::test(start_paused = true)]
    async fn quit_keys() {
        let mut app = app();
        assert!(handle_key(&mut app, press(KeyCode::Char('q'))).expect("handled"));
        assert!(app.should_quit());

        let mut app = self::app();
        assert!(handle_key(&mut app, press(KeyCode::Esc)).expect("handled"));

        let mut app = self::app();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(handle_key(&mut app, ctrl_c).expect("handled"));

        let mut app = self::app();
        assert!(!handle_key(&mut app, press(KeyCode::Char('c'))).expect("handled"));
        assert!(!app.should_quit());
    }

    #[tokio::test(start_paused = true)]
    async fn enter_skips_while_booting() {
        let mut app = app();
        app.start().expect("mounted");
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(!handle_key(&mut app, press(KeyCode::Enter)).expect("handled"));
        assert_eq!(app.phase(), BootPhase::Revealed);
        assert!(app.snapshot().is_visible(&SurfaceId::LOGO));
    }

    #[tokio::test(start_paused = true)]
    async fn replay_only_after_reveal() {
        let mut app = app();
        app.start().expect("mounted");

        handle_key(&mut app, press(KeyCode::Char('r'))).expect("handled");
        assert_eq!(app.runs(), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(app.phase(), BootPhase::Revealed);
        handle_key(&mut app, press(KeyCode::Char('r'))).expect("handled");
        assert_eq!(app.runs(), 2);
        assert_eq!(app.phase(), BootPhase::Booting);
    }

    #[tokio::test(start_paused = true)]
    async fn key_releases_are_ignored() {
        let mut app = app();
        let mut release = press(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert!(!handle_key(&mut app, release).expect("handled"));
        assert!(!app.should_quit());
    }
}
