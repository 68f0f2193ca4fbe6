//! In-memory page model shared between playback and rendering.
//!
//! The playback task mutates the page through [`PageSurface`] handles while the
//! render loop reads [`PageSnapshot`]s. Every mutation is a short critical
//! section; a poisoned lock is recovered instead of propagating the panic.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use neon_types::{StyleTag, SurfaceId};

use crate::surface::{LineId, Mounts, PlaybackHooks, Surface};

/// Marker appended when a line is terminated.
pub const LINE_BREAK: char = '\n';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLine {
    style: Option<StyleTag>,
    text: String,
    broken: bool,
}

impl PageLine {
    #[must_use]
    pub fn style(&self) -> Option<&StyleTag> {
        self.style.as_ref()
    }

    /// Characters typed so far, without the break marker.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// The line's full content including its break marker, if any.
    #[must_use]
    pub fn content(&self) -> String {
        let mut out = self.text.clone();
        if self.broken {
            out.push(LINE_BREAK);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceState {
    id: SurfaceId,
    visible: bool,
    lines: Vec<PageLine>,
    scroll_anchor: Option<usize>,
}

impl SurfaceState {
    fn new(id: SurfaceId, visible: bool) -> Self {
        Self {
            id,
            visible,
            lines: Vec::new(),
            scroll_anchor: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn lines(&self) -> &[PageLine] {
        &self.lines
    }

    /// Number of lines that were present at the last scroll-to-bottom request.
    ///
    /// `None` until the host has asked to scroll at least once.
    #[must_use]
    pub fn scroll_anchor(&self) -> Option<usize> {
        self.scroll_anchor
    }

    /// Index of the line currently being typed, if any.
    #[must_use]
    pub fn typing_line(&self) -> Option<usize> {
        match self.lines.last() {
            Some(line) if !line.broken => Some(self.lines.len() - 1),
            _ => None,
        }
    }
}

/// Point-in-time copy of every mounted surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    surfaces: Vec<SurfaceState>,
}

impl PageSnapshot {
    #[must_use]
    pub fn surface(&self, id: &SurfaceId) -> Option<&SurfaceState> {
        self.surfaces.iter().find(|surface| &surface.id == id)
    }

    fn surface_mut(&mut self, id: &SurfaceId) -> Option<&mut SurfaceState> {
        self.surfaces.iter_mut().find(|surface| &surface.id == id)
    }

    /// Whether `id` is mounted and visible.
    #[must_use]
    pub fn is_visible(&self, id: &SurfaceId) -> bool {
        self.surface(id).is_some_and(SurfaceState::is_visible)
    }

    #[must_use]
    pub fn surfaces(&self) -> &[SurfaceState] {
        &self.surfaces
    }
}

/// Shared handle to the page. Clones refer to the same page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    state: Arc<Mutex<PageSnapshot>>,
}

impl Page {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A page with the boot log visible and the logo and main content hidden.
    #[must_use]
    pub fn with_boot_mounts() -> Self {
        let page = Self::new();
        page.mount(SurfaceId::OUTPUT, true);
        page.mount(SurfaceId::LOGO, false);
        page.mount(SurfaceId::MAIN_CONTENT, false);
        page
    }

    fn lock(&self) -> MutexGuard<'_, PageSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mount an empty surface. Remounting an existing id resets it.
    pub fn mount(&self, id: SurfaceId, visible: bool) {
        let mut state = self.lock();
        if let Some(existing) = state.surface_mut(&id) {
            *existing = SurfaceState::new(id, visible);
        } else {
            state.surfaces.push(SurfaceState::new(id, visible));
        }
    }

    /// Remove a surface. Returns whether it was mounted.
    pub fn unmount(&self, id: &SurfaceId) -> bool {
        let mut state = self.lock();
        let before = state.surfaces.len();
        state.surfaces.retain(|surface| &surface.id != id);
        state.surfaces.len() != before
    }

    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        self.lock().clone()
    }

    /// Record a scroll-to-bottom request against `id`'s current line count.
    pub fn scroll_to_bottom(&self, id: &SurfaceId) {
        if let Some(surface) = self.lock().surface_mut(id) {
            surface.scroll_anchor = Some(surface.lines.len());
        }
    }

    fn with_surface<R>(&self, id: &SurfaceId, f: impl FnOnce(&mut SurfaceState) -> R) -> Option<R> {
        let mut state = self.lock();
        let result = state.surface_mut(id).map(f);
        if result.is_none() {
            tracing::trace!(surface = %id, "Write to unmounted surface ignored");
        }
        result
    }
}

impl Mounts for Page {
    type Surface = PageSurface;

    fn surface(&self, id: &SurfaceId) -> Option<PageSurface> {
        self.lock().surface(id)?;
        Some(PageSurface {
            page: self.clone(),
            id: id.clone(),
        })
    }
}

/// A [`Surface`] backed by one mounted surface of a [`Page`].
#[derive(Debug, Clone)]
pub struct PageSurface {
    page: Page,
    id: SurfaceId,
}

impl Surface for PageSurface {
    fn id(&self) -> &SurfaceId {
        &self.id
    }

    fn append_line(&mut self, style: Option<&StyleTag>) -> LineId {
        let index = self.page.with_surface(&self.id, |surface| {
            surface.lines.push(PageLine {
                style: style.cloned(),
                text: String::new(),
                broken: false,
            });
            surface.lines.len() - 1
        });
        LineId::new(index.unwrap_or(usize::MAX))
    }

    fn append_char(&mut self, line: LineId, ch: char) {
        self.page.with_surface(&self.id, |surface| {
            if let Some(line) = surface.lines.get_mut(line.index()) {
                line.text.push(ch);
            }
        });
    }

    fn append_break(&mut self, line: LineId) {
        self.page.with_surface(&self.id, |surface| {
            if let Some(line) = surface.lines.get_mut(line.index()) {
                line.broken = true;
            }
        });
    }

    fn set_visible(&mut self, visible: bool) {
        self.page.with_surface(&self.id, |surface| surface.visible = visible);
    }
}

/// Playback hooks that scroll the page's boot log after every line.
#[derive(Debug, Clone)]
pub struct PageScroll {
    page: Page,
}

impl PageScroll {
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

impl PlaybackHooks for PageScroll {
    fn scroll_to_bottom(&mut self) {
        self.page.scroll_to_bottom(&SurfaceId::OUTPUT);
    }
}
