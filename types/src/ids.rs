use std::borrow::Cow;
use std::fmt;

/// Name of a mount point on the host page.
///
/// The host decides which surfaces exist; the sequencer only refers to them by
/// name and fails fast when one of the names it needs is absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(Cow<'static, str>);

impl SurfaceId {
    /// The terminal log the boot lines are typed into.
    pub const OUTPUT: SurfaceId = SurfaceId::from_static("boot-sequence");
    /// The ASCII logo revealed after the boot completes.
    pub const LOGO: SurfaceId = SurfaceId::from_static("ascii-logo");
    /// The main content revealed after the boot completes.
    pub const MAIN_CONTENT: SurfaceId = SurfaceId::from_static("main-content");

    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Presentation label attached to a script line (`warning`, `log-entry`, ...).
///
/// Tags carry no behavior; the renderer maps them to styles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleTag(Cow<'static, str>);

impl StyleTag {
    pub const WARNING: StyleTag = StyleTag::from_static("warning");
    pub const LOG_ENTRY: StyleTag = StyleTag::from_static("log-entry");

    #[must_use]
    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    /// Build a tag from an arbitrary label. Blank labels mean "no tag".
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Option<Self> {
        let tag = tag.into();
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == tag.len() {
            Some(Self(Cow::Owned(tag)))
        } else {
            Some(Self(Cow::Owned(trimmed.to_string())))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{StyleTag, SurfaceId};

    #[test]
    fn blank_style_tag_is_none() {
        assert!(StyleTag::new("").is_none());
        assert!(StyleTag::new("   ").is_none());
    }

    #[test]
    fn style_tag_is_trimmed() {
        let tag = StyleTag::new(" warning ").expect("non-blank tag");
        assert_eq!(tag, StyleTag::WARNING);
    }

    #[test]
    fn owned_and_static_surface_ids_compare_equal() {
        assert_eq!(SurfaceId::new("boot-sequence"), SurfaceId::OUTPUT);
        assert_eq!(SurfaceId::LOGO.to_string(), "ascii-logo");
    }
}
