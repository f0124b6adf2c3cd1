//! Parser of maidata inote notation.
//!
//! Raw notation [String] == [`segment::tokenize`] ==> segments == [`directive`] + [`note`] ==>
//! [`Sequence`] (in [`InoteOutput`])
//!
//! The notation is a comma separated list of segments. Each segment may carry a tempo
//! directive `(bpm)` and a subdivision directive `{n}`, which stay in effect until overridden,
//! followed by note text. A segment without note text is a rest, and a literal `E` segment
//! ends the chart.
//!
//! In detail, our policies are:
//!
//! - All timing is exact rational arithmetic, see [`time::Fraction`].
//! - Missing tempo or subdivision context and malformed directive values are fatal.
//! - Malformed hold spans are reported as warnings and skipped.

pub mod directive;
pub mod note;
pub mod segment;
pub mod sequence;
pub mod time;

use thiserror::Error;

use crate::mixin::SourceRangeMixin;

pub use self::sequence::Sequence;

/// A fatal error occurred when parsing inote notation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InoteError {
    /// The segment needs a tempo or a subdivision, but none was declared until it.
    #[error("BPM not set at note {segment}")]
    MissingContext {
        /// The index of the offending segment.
        segment: usize,
    },
    /// The content of a `(bpm)` or `{n}` directive was not a valid value.
    #[error("invalid directive value `{value}` at note {segment}")]
    MalformedDirectiveValue {
        /// The index of the offending segment.
        segment: usize,
        /// The raw directive content.
        value: String,
    },
}

/// A recoverable problem found when parsing inote notation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InoteWarning {
    /// A `[denominator:numerator]` hold span could not be read. It was removed from the note.
    #[error("invalid [{content}] in '{note}'")]
    MalformedHoldSpan {
        /// The note text containing the span.
        note: String,
        /// The content between the brackets.
        content: String,
    },
}

/// An [`InoteWarning`] with the byte range of its segment in the notation.
pub type InoteWarningWithRange = SourceRangeMixin<InoteWarning>;

/// type alias of `core::result::Result<T, InoteError>`
pub(crate) type Result<T> = core::result::Result<T, InoteError>;

/// Output of parsing inote notation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct InoteOutput {
    /// The built sequence.
    pub sequence: Sequence,
    /// Warnings that occurred during parsing.
    pub warnings: Vec<InoteWarningWithRange>,
}

/// Parses inote notation into a [`Sequence`].
///
/// # Example
///
/// ```
/// use maidata_diff::inote::{InoteOutput, parse_inote};
///
/// let InoteOutput { sequence, warnings } = parse_inote("(120){4}1,,2h[4:1],E").unwrap();
/// assert_eq!(sequence.len(), 3);
/// assert!(warnings.is_empty());
/// ```
///
/// # Errors
///
/// Returns [`InoteError`] when a segment lacks tempo or subdivision context, or a directive
/// value is malformed. No partial result is produced.
pub fn parse_inote(notation: &str) -> Result<InoteOutput> {
    Sequence::from_notation(notation)
}
