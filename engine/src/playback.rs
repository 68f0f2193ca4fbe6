//! Triggering a boot run on the tokio runtime.
//!
//! [`trigger`] resolves the mount points synchronously, so a missing surface
//! is reported before anything has been written, then spawns the sequencer.
//! Each trigger is an independent playback; nothing is deduplicated.

use neon_types::{InvalidScriptError, ScriptLine};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};

use crate::cancel::CancelToken;
use crate::sequencer::{Outcome, PlaybackTiming, Sequencer};
use crate::surface::{MissingTargetError, Mounts, PlaybackHooks, Targets};

#[derive(Debug, Error)]
pub enum SequenceError {
    #[error(transparent)]
    MissingTarget(#[from] MissingTargetError),
    #[error(transparent)]
    InvalidScript(#[from] InvalidScriptError),
    #[error("boot playback task failed: {0}")]
    Join(#[from] JoinError),
}

/// A running boot sequence.
#[derive(Debug)]
pub struct Playback {
    cancel: CancelToken,
    task: JoinHandle<Outcome>,
}

impl Playback {
    /// Ask the playback to stop at its next suspension point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the playback to settle.
    pub async fn finish(self) -> Result<Outcome, SequenceError> {
        Ok(self.task.await?)
    }
}

/// Start `sequencer` against the boot surfaces mounted on `mounts`.
///
/// Must be called from within a tokio runtime.
pub fn trigger<M, H>(mounts: &M, sequencer: Sequencer, mut hooks: H) -> Result<Playback, SequenceError>
where
    M: Mounts,
    M::Surface: 'static,
    H: PlaybackHooks + 'static,
{
    let mut targets = Targets::resolve(mounts).inspect_err(|err| {
        tracing::error!(surface = %err.surface, "Cannot start boot sequence");
    })?;

    let cancel = sequencer.cancel_token().clone();
    let task = tokio::spawn(async move { sequencer.run(&mut targets, &mut hooks).await });

    Ok(Playback { cancel, task })
}

/// Validate `lines` as a script, then [`trigger`] it.
///
/// An invalid script is reported before the mounts are looked up, so
/// nothing on the page is touched.
pub fn trigger_lines<M, H>(
    mounts: &M,
    lines: Vec<ScriptLine>,
    timing: PlaybackTiming,
    hooks: H,
) -> Result<Playback, SequenceError>
where
    M: Mounts,
    M::Surface: 'static,
    H: PlaybackHooks + 'static,
{
    let sequencer = Sequencer::from_lines(lines)
        .inspect_err(|err| tracing::error!("Cannot start boot sequence: {err}"))?
        .with_timing(timing);
    trigger(mounts, sequencer, hooks)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use neon_types::{InvalidScriptError, Script, ScriptLine, SurfaceId};

    use super::{SequenceError, trigger, trigger_lines};
    use crate::page::{Page, PageScroll};
    use crate::sequencer::{Outcome, PlaybackTiming, Sequencer};
    use crate::surface::NoHooks;

    fn short_script() -> Script {
        Script::new(vec![ScriptLine::new("A", 50), ScriptLine::new("OK", 150)])
            .expect("valid script")
    }

    #[tokio::test(start_paused = true)]
    async fn missing_target_aborts_before_any_mutation() {
        let page = Page::with_boot_mounts();
        page.unmount(&SurfaceId::MAIN_CONTENT);

        let err = trigger(&page, Sequencer::new(short_script()), NoHooks).unwrap_err();

        match err {
            SequenceError::MissingTarget(missing) => {
                assert_eq!(missing.surface, SurfaceId::MAIN_CONTENT);
            }
            other => panic!("unexpected error: {other}"),
        }
        tokio::time::sleep(Duration::from_secs(5)).await;
        let snapshot = page.snapshot();
        let output = snapshot.surface(&SurfaceId::OUTPUT).expect("output");
        assert!(output.lines().is_empty());
        assert!(output.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_output_is_reported_first() {
        let page = Page::new();
        page.mount(SurfaceId::LOGO, false);
        page.mount(SurfaceId::MAIN_CONTENT, false);

        let err = trigger(&page, Sequencer::new(short_script()), NoHooks).unwrap_err();

        match err {
            SequenceError::MissingTarget(missing) => {
                assert_eq!(missing.surface, SurfaceId::OUTPUT);
            }
            other => panic!("unexpected error: {other}"),
        }
        tokio::time::sleep(Duration::from_secs(5)).await;
        let snapshot = page.snapshot();
        assert!(!snapshot.is_visible(&SurfaceId::LOGO));
        assert!(!snapshot.is_visible(&SurfaceId::MAIN_CONTENT));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_lines_never_start_playback() {
        let page = Page::with_boot_mounts();
        let lines = vec![ScriptLine::new("late", 300), ScriptLine::new("early", 100)];

        let err = trigger_lines(&page, lines, PlaybackTiming::default(), NoHooks).unwrap_err();

        assert!(matches!(
            err,
            SequenceError::InvalidScript(InvalidScriptError::Decreasing { index: 1, .. })
        ));
        let err = trigger_lines(&page, Vec::new(), PlaybackTiming::default(), NoHooks)
            .unwrap_err();
        assert!(matches!(
            err,
            SequenceError::InvalidScript(InvalidScriptError::Empty)
        ));

        tokio::time::sleep(Duration::from_secs(5)).await;
        let snapshot = page.snapshot();
        let output = snapshot.surface(&SurfaceId::OUTPUT).expect("output");
        assert!(output.lines().is_empty());
        assert!(!snapshot.is_visible(&SurfaceId::LOGO));
    }

    #[tokio::test(start_paused = true)]
    async fn valid_lines_play_like_a_script() {
        let page = Page::with_boot_mounts();
        let lines = vec![ScriptLine::new("A", 50), ScriptLine::new("OK", 150)];

        let playback =
            trigger_lines(&page, lines, PlaybackTiming::default(), NoHooks).expect("valid");

        assert_eq!(playback.finish().await.expect("joins"), Outcome::Completed);
        assert!(page.snapshot().is_visible(&SurfaceId::LOGO));
    }

    #[tokio::test(start_paused = true)]
    async fn triggered_run_completes_and_reveals() {
        let page = Page::with_boot_mounts();
        let playback = trigger(
            &page,
            Sequencer::new(short_script()),
            PageScroll::new(page.clone()),
        )
        .expect("mounted");

        assert_eq!(playback.finish().await.expect("joins"), Outcome::Completed);
        assert!(page.snapshot().is_visible(&SurfaceId::LOGO));
    }

    #[tokio::test(start_paused = true)]
    async fn completed_run_does_not_restart() {
        let page = Page::with_boot_mounts();
        let playback = trigger(&page, Sequencer::new(short_script()), NoHooks).expect("mounted");
        playback.finish().await.expect("joins");

        let before = page.snapshot();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(page.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn two_triggers_run_two_independent_playbacks() {
        let first_page = Page::with_boot_mounts();
        let second_page = Page::with_boot_mounts();

        let first = trigger(&first_page, Sequencer::new(short_script()), NoHooks).expect("mounted");
        let second =
            trigger(&second_page, Sequencer::new(short_script()), NoHooks).expect("mounted");

        first.cancel();
        assert_eq!(
            first.finish().await.expect("joins"),
            Outcome::Cancelled { lines_started: 0 }
        );
        assert_eq!(second.finish().await.expect("joins"), Outcome::Completed);

        let first = first_page.snapshot();
        let second = second_page.snapshot();
        assert!(!first.is_visible(&SurfaceId::LOGO));
        assert!(second.is_visible(&SurfaceId::LOGO));
        assert_eq!(
            second
                .surface(&SurfaceId::OUTPUT)
                .map(|s| s.lines().len()),
            Some(2)
        );
    }
}
