//! Tempo `(bpm)` and subdivision `{n}` directives.
//!
//! Both directives persist across segments until overridden, so one [`ParseContext`] is
//! threaded through a whole parse.

use std::num::NonZeroU64;

use super::{InoteError, Result};

/// The running tempo and subdivision of one parse.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseContext {
    tempo: Option<u64>,
    subdivision: Option<NonZeroU64>,
}

/// A segment with its directives removed, and the context in effect for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrippedSegment {
    /// The remaining note text, trimmed.
    pub note_text: String,
    /// The tempo in effect.
    pub tempo: u64,
    /// The subdivision in effect.
    pub subdivision: NonZeroU64,
}

impl ParseContext {
    /// Creates a context with neither tempo nor subdivision established.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tempo: None,
            subdivision: None,
        }
    }

    /// The current tempo, if established.
    #[must_use]
    pub const fn tempo(&self) -> Option<u64> {
        self.tempo
    }

    /// The current subdivision, if established.
    #[must_use]
    pub const fn subdivision(&self) -> Option<NonZeroU64> {
        self.subdivision
    }

    /// Removes every directive from `segment`, updating the context with their values.
    ///
    /// Directives are rescanned until a round removes nothing, so repeated directives apply in
    /// order. An opening marker without its closing marker is left in the note text.
    ///
    /// # Errors
    ///
    /// - [`InoteError::MalformedDirectiveValue`] if a value is not an unsigned integer, or the
    ///   subdivision is zero.
    /// - [`InoteError::MissingContext`] if tempo or subdivision is still unknown afterwards.
    pub fn extract_directives(&mut self, segment: &str, index: usize) -> Result<StrippedSegment> {
        let mut text = segment.to_owned();
        loop {
            let tempo = take_directive(&mut text, '(', ')');
            if let Some(value) = &tempo {
                self.tempo = Some(parse_value(value, index)?);
            }
            let subdivision = take_directive(&mut text, '{', '}');
            if let Some(value) = &subdivision {
                let parsed = NonZeroU64::new(parse_value(value, index)?)
                    .ok_or_else(|| malformed(value, index))?;
                self.subdivision = Some(parsed);
            }
            if tempo.is_none() && subdivision.is_none() {
                break;
            }
        }

        let (Some(tempo), Some(subdivision)) = (self.tempo, self.subdivision) else {
            return Err(InoteError::MissingContext { segment: index });
        };
        Ok(StrippedSegment {
            note_text: text.trim().to_owned(),
            tempo,
            subdivision,
        })
    }
}

/// Cuts the first `open`..`close` span out of `text`, returning its content.
fn take_directive(text: &mut String, open: char, close: char) -> Option<String> {
    let start = text.find(open)?;
    let end = start + text[start..].find(close)?;
    let content = text[start + open.len_utf8()..end].to_owned();
    text.replace_range(start..end + close.len_utf8(), "");
    Some(content)
}

fn parse_value(value: &str, index: usize) -> Result<u64> {
    value.trim().parse().map_err(|_| malformed(value, index))
}

fn malformed(value: &str, index: usize) -> InoteError {
    InoteError::MalformedDirectiveValue {
        segment: index,
        value: value.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_and_persists() {
        let mut context = ParseContext::new();
        let first = context.extract_directives("(150){8}1", 0).unwrap();
        assert_eq!(first.note_text, "1");
        assert_eq!(first.tempo, 150);
        assert_eq!(first.subdivision.get(), 8);

        let second = context.extract_directives(" 2/3 ", 1).unwrap();
        assert_eq!(second.note_text, "2/3");
        assert_eq!(second.tempo, 150);
        assert_eq!(second.subdivision.get(), 8);

        let third = context.extract_directives("{16}", 2).unwrap();
        assert_eq!(third.note_text, "");
        assert_eq!(third.subdivision.get(), 16);
        assert_eq!(context.tempo(), Some(150));
    }

    #[test]
    fn repeated_directives_apply_in_order() {
        let mut context = ParseContext::new();
        let stripped = context
            .extract_directives("(100){4}(200){12}5", 0)
            .unwrap();
        assert_eq!(stripped.note_text, "5");
        assert_eq!(stripped.tempo, 200);
        assert_eq!(stripped.subdivision.get(), 12);
    }

    #[test]
    fn directive_in_the_middle() {
        let mut context = ParseContext::new();
        let stripped = context.extract_directives("1{4}h(120)[8:1]", 0).unwrap();
        assert_eq!(stripped.note_text, "1h[8:1]");
    }

    #[test]
    fn unclosed_marker_stays() {
        let mut context = ParseContext::new();
        let stripped = context.extract_directives("(120){4}1(", 0).unwrap();
        assert_eq!(stripped.note_text, "1(");
    }

    #[test]
    fn missing_context() {
        let mut context = ParseContext::new();
        assert_eq!(
            context.extract_directives("{4}1", 0),
            Err(InoteError::MissingContext { segment: 0 })
        );
        assert_eq!(
            ParseContext::new().extract_directives("", 0),
            Err(InoteError::MissingContext { segment: 0 })
        );
    }

    #[test]
    fn malformed_values() {
        let mut context = ParseContext::new();
        assert_eq!(
            context.extract_directives("(12x){4}1", 3),
            Err(InoteError::MalformedDirectiveValue {
                segment: 3,
                value: "12x".into(),
            })
        );
        assert_eq!(
            context.extract_directives("(120){0}1", 4),
            Err(InoteError::MalformedDirectiveValue {
                segment: 4,
                value: "0".into(),
            })
        );
    }
}
