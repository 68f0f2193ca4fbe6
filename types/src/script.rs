//! Boot script: the ordered lines played back by the sequencer.
//!
//! A [`Script`] can only be built from lines whose cumulative offsets never
//! decrease, so every consumer can derive per-line waits by subtraction
//! without re-checking.

use std::iter::Enumerate;
use std::slice::Iter;
use std::time::Duration;

use thiserror::Error;

use crate::StyleTag;

/// One line of the boot script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    text: String,
    cumulative_delay_ms: u64,
    style: Option<StyleTag>,
}

impl ScriptLine {
    #[must_use]
    pub fn new(text: impl Into<String>, cumulative_delay_ms: u64) -> Self {
        Self {
            text: text.into(),
            cumulative_delay_ms,
            style: None,
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: StyleTag) -> Self {
        self.style = Some(style);
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Offset from the start of the sequence at which this line begins.
    #[must_use]
    pub fn cumulative_delay_ms(&self) -> u64 {
        self.cumulative_delay_ms
    }

    #[must_use]
    pub fn style(&self) -> Option<&StyleTag> {
        self.style.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidScriptError {
    #[error("boot script must contain at least one line")]
    Empty,
    #[error(
        "boot script line {index} starts at {offset_ms}ms, before the previous line at {previous_ms}ms"
    )]
    Decreasing {
        index: usize,
        previous_ms: u64,
        offset_ms: u64,
    },
}

/// An ordered, non-empty, immutable list of [`ScriptLine`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    lines: Vec<ScriptLine>,
}

const NEON_CORE_BOOT: [(&str, u64, Option<StyleTag>); 8] = [
    ("Initializing NEON_CORE v0.9.5...", 50, None),
    ("Loading kernel modules... [OK]", 150, None),
    ("Mounting file system... [OK]", 300, None),
    ("Connecting to neural net... [OK]", 500, None),
    ("Decrypting user profile... [OK]", 700, None),
    (
        "WARNING: Unauthorized access detected.",
        1000,
        Some(StyleTag::WARNING),
    ),
    ("Bypassing security protocols...", 1200, None),
    ("Access Granted.", 1500, Some(StyleTag::LOG_ENTRY)),
];

impl Script {
    pub fn new(lines: Vec<ScriptLine>) -> Result<Self, InvalidScriptError> {
        if lines.is_empty() {
            return Err(InvalidScriptError::Empty);
        }

        for (index, pair) in lines.windows(2).enumerate() {
            let previous_ms = pair[0].cumulative_delay_ms;
            let offset_ms = pair[1].cumulative_delay_ms;
            if offset_ms < previous_ms {
                return Err(InvalidScriptError::Decreasing {
                    index: index + 1,
                    previous_ms,
                    offset_ms,
                });
            }
        }

        Ok(Self { lines })
    }

    /// The hardcoded NEON_CORE boot script.
    #[must_use]
    pub fn neon_core() -> Self {
        let lines = NEON_CORE_BOOT
            .into_iter()
            .map(|(text, offset, style)| ScriptLine {
                text: text.to_string(),
                cumulative_delay_ms: offset,
                style,
            })
            .collect();
        // The table is ordered; covered by `neon_core_script_is_valid`.
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[ScriptLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Offset of the last line, i.e. when the final line starts typing.
    #[must_use]
    pub fn last_offset(&self) -> Duration {
        self.lines.last().map_or(Duration::ZERO, |line| {
            Duration::from_millis(line.cumulative_delay_ms)
        })
    }

    /// Iterate lines together with the wait that precedes each one.
    #[must_use]
    pub fn steps(&self) -> Steps<'_> {
        Steps {
            lines: self.lines.iter().enumerate(),
            previous_ms: 0,
        }
    }
}

/// A script line paired with the interval to wait before it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStep<'a> {
    pub index: usize,
    pub wait: Duration,
    pub line: &'a ScriptLine,
}

/// Iterator returned by [`Script::steps`]; keeps a running offset so each
/// wait is the difference to the previous line.
#[derive(Debug, Clone)]
pub struct Steps<'a> {
    lines: Enumerate<Iter<'a, ScriptLine>>,
    previous_ms: u64,
}

impl<'a> Iterator for Steps<'a> {
    type Item = ScriptStep<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, line) = self.lines.next()?;
        let wait_ms = line.cumulative_delay_ms.saturating_sub(self.previous_ms);
        self.previous_ms = line.cumulative_delay_ms;
        Some(ScriptStep {
            index,
            wait: Duration::from_millis(wait_ms),
            line,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.lines.size_hint()
    }
}

impl ExactSizeIterator for Steps<'_> {}
