//! Byte spans attached to values cut out of inote notation.
//!
//! Segments and parse warnings both remember where in the joined notation they came from, so
//! reports and diagnostics can point back at the text.

use std::ops::Range;

/// A value with the byte span of the notation it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceRangeMixin<T> {
    content: T,
    span: Range<usize>,
}

impl<T> SourceRangeMixin<T> {
    /// Attaches `span` to `content`.
    pub const fn new(content: T, span: Range<usize>) -> Self {
        Self { content, span }
    }

    /// The wrapped value.
    pub const fn content(&self) -> &T {
        &self.content
    }

    /// The first byte of the span.
    pub const fn start(&self) -> usize {
        self.span.start
    }

    /// One past the last byte of the span.
    pub const fn end(&self) -> usize {
        self.span.end
    }

    /// The span, ready for slicing or for `ariadne` labels.
    pub fn range(&self) -> Range<usize> {
        self.span.clone()
    }

    /// The byte length of the span.
    pub fn len(&self) -> usize {
        self.span.len()
    }

    /// Whether the span covers no byte.
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}

impl<T: std::fmt::Display> std::fmt::Display for SourceRangeMixin<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (bytes {}..{})", self.content, self.start(), self.end())
    }
}

/// Wraps any value into a [`SourceRangeMixin`].
pub trait SourceRangeMixinExt: Sized {
    /// Takes the span of another wrapped value, such as the segment a warning was found in.
    fn into_wrapper<W>(self, wrapper: &SourceRangeMixin<W>) -> SourceRangeMixin<Self> {
        SourceRangeMixin::new(self, wrapper.range())
    }

    /// Attaches `span`.
    fn into_wrapper_range(self, span: Range<usize>) -> SourceRangeMixin<Self> {
        SourceRangeMixin::new(self, span)
    }
}

impl<T> SourceRangeMixinExt for T {}
