//! Mount points the sequencer writes to.
//!
//! A [`Surface`] is the abstract equivalent of a page element: it can grow
//! child lines, receive text into them, and be shown or hidden. Hosts expose
//! their surfaces through [`Mounts`]; [`Targets::resolve`] looks up the three
//! the boot sequence needs and fails before anything is mutated.

use neon_types::{StyleTag, SurfaceId};
use thiserror::Error;

/// Handle to a child line created by [`Surface::append_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(usize);

impl LineId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

pub trait Surface: Send {
    fn id(&self) -> &SurfaceId;

    /// Create a new, empty child line at the end of this surface.
    fn append_line(&mut self, style: Option<&StyleTag>) -> LineId;

    fn append_char(&mut self, line: LineId, ch: char);

    /// Terminate `line` with a line-break marker.
    fn append_break(&mut self, line: LineId);

    fn set_visible(&mut self, visible: bool);
}

/// Host-side lookup of surfaces by name.
pub trait Mounts {
    type Surface: Surface;

    fn surface(&self, id: &SurfaceId) -> Option<Self::Surface>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("mount point `{surface}` is missing from the host page")]
pub struct MissingTargetError {
    pub surface: SurfaceId,
}

/// The three surfaces a boot run touches.
#[derive(Debug)]
pub struct Targets<S> {
    pub output: S,
    pub logo: S,
    pub main_content: S,
}

impl<S: Surface> Targets<S> {
    /// Look up the output, logo and main-content surfaces on `mounts`.
    ///
    /// The first absent surface (in that order) is reported.
    pub fn resolve<M>(mounts: &M) -> Result<Self, MissingTargetError>
    where
        M: Mounts<Surface = S>,
    {
        let lookup = |id: SurfaceId| {
            mounts
                .surface(&id)
                .ok_or(MissingTargetError { surface: id })
        };

        Ok(Self {
            output: lookup(SurfaceId::OUTPUT)?,
            logo: lookup(SurfaceId::LOGO)?,
            main_content: lookup(SurfaceId::MAIN_CONTENT)?,
        })
    }

    /// Hide the boot log and show the logo and main content.
    pub fn reveal(&mut self) {
        self.output.set_visible(false);
        self.logo.set_visible(true);
        self.main_content.set_visible(true);
    }
}

/// Callbacks the host may provide around playback.
pub trait PlaybackHooks: Send {
    /// Called after each line has finished typing.
    fn scroll_to_bottom(&mut self) {}
}

/// Hooks that do nothing; for hosts without a scrollable view.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl PlaybackHooks for NoHooks {}
