//! Splitting inote notation into segments.

use crate::mixin::{SourceRangeMixin, SourceRangeMixinExt};

/// The segment text which ends the chart.
pub const END_MARKER: &str = "E";

/// One comma separated unit of notation, with its byte range in the notation.
///
/// The text is not trimmed.
pub type Segment<'a> = SourceRangeMixin<&'a str>;

/// Where a note came from in the segment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SegmentIndex {
    /// The synthetic placeholder at the head of every sequence. It owns no segment.
    Leading,
    /// The index of a real segment.
    At(usize),
}

impl SegmentIndex {
    /// Returns the index of the real segment, if any.
    #[must_use]
    pub const fn get(self) -> Option<usize> {
        match self {
            Self::Leading => None,
            Self::At(index) => Some(index),
        }
    }
}

impl std::fmt::Display for SegmentIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leading => write!(f, "-1"),
            Self::At(index) => write!(f, "{index}"),
        }
    }
}

/// Splits the notation on `,`.
///
/// Empty notation yields one empty segment.
#[must_use]
pub fn tokenize(notation: &str) -> Vec<Segment<'_>> {
    let mut start = 0;
    notation
        .split(',')
        .map(|text| {
            let segment = text.into_wrapper_range(start..start + text.len());
            start = segment.end() + 1;
            segment
        })
        .collect()
}

/// Returns the byte offset of the segment in the notation.
///
/// The leading placeholder resolves to `0`, and an index past the last segment to the end of
/// the notation.
#[must_use]
pub fn segment_offset(notation: &str, index: SegmentIndex) -> usize {
    match index {
        SegmentIndex::Leading => 0,
        SegmentIndex::At(index) => tokenize(notation)
            .get(index)
            .map_or(notation.len(), |segment| segment.start()),
    }
}
