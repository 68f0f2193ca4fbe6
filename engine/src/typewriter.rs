//! Character-by-character text reveal.
//!
//! [`LineTyper`] is the synchronous per-line state machine
//! (`NotStarted -> Typing(i) -> LineBroken -> Done`); [`Typewriter`] drives
//! it, suspending between characters.

use std::str::Chars;
use std::time::Duration;

use crate::cancel::{CancelToken, Cancelled};
use crate::surface::{LineId, Surface};

/// Cadence used when no explicit speed is given.
pub const DEFAULT_CHAR_DELAY: Duration = Duration::from_millis(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterPhase {
    NotStarted,
    /// Character `index` has just been appended.
    Typing { index: usize },
    /// The break marker has been appended.
    LineBroken,
    Done,
}

/// Types one line into one target, one step per call to [`advance`](Self::advance).
#[derive(Debug, Clone)]
pub struct LineTyper<'t> {
    chars: Chars<'t>,
    typed: usize,
    phase: TypewriterPhase,
}

impl<'t> LineTyper<'t> {
    #[must_use]
    pub fn new(text: &'t str) -> Self {
        Self {
            chars: text.chars(),
            typed: 0,
            phase: TypewriterPhase::NotStarted,
        }
    }

    #[must_use]
    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    /// Perform the next transition, writing to `target` as needed.
    pub fn advance<S>(&mut self, target: &mut S, line: LineId) -> TypewriterPhase
    where
        S: Surface + ?Sized,
    {
        self.phase = match self.phase {
            TypewriterPhase::NotStarted | TypewriterPhase::Typing { .. } => {
                match self.chars.next() {
                    Some(ch) => {
                        target.append_char(line, ch);
                        let index = self.typed;
                        self.typed += 1;
                        TypewriterPhase::Typing { index }
                    }
                    None => {
                        target.append_break(line);
                        TypewriterPhase::LineBroken
                    }
                }
            }
            TypewriterPhase::LineBroken | TypewriterPhase::Done => TypewriterPhase::Done,
        };
        self.phase
    }
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    char_delay: Duration,
    cancel: CancelToken,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(DEFAULT_CHAR_DELAY)
    }
}

impl Typewriter {
    #[must_use]
    pub fn new(char_delay: Duration) -> Self {
        Self {
            char_delay,
            cancel: CancelToken::new(),
        }
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn char_delay(&self) -> Duration {
        self.char_delay
    }

    /// Append `text` to `line` one character at a time, waiting the char delay
    /// after each character, then terminate the line.
    ///
    /// On cancellation the line is left partially typed and unbroken.
    pub async fn type_line<S>(&self, text: &str, target: &mut S, line: LineId) -> Result<(), Cancelled>
    where
        S: Surface + ?Sized,
    {
        let mut typer = LineTyper::new(text);
        loop {
            match typer.advance(target, line) {
                TypewriterPhase::Typing { .. } => self.cancel.sleep(self.char_delay).await?,
                TypewriterPhase::LineBroken => {}
                TypewriterPhase::Done | TypewriterPhase::NotStarted => return Ok(()),
            }
        }
    }
}
