//! Building a [`Sequence`] out of notation.

use std::num::NonZeroU64;

use num::{CheckedAdd, Zero};

use crate::mixin::SourceRangeMixinExt;

use super::{
    InoteError, InoteOutput, Result,
    directive::ParseContext,
    note::{NoteEvent, Slot, parse_segment},
    segment::{END_MARKER, SegmentIndex, tokenize},
    time::{Fraction, step},
};

/// The timeline of one chart level.
///
/// It always starts with a zero length placeholder, and its last real slot always has zero
/// duration, as no gap is measured past the final note.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence {
    slots: Vec<Slot>,
}

impl Sequence {
    /// Parses notation into a sequence.
    ///
    /// Rests are merged into the duration of the slot before them, and everything after an
    /// `E` segment is ignored.
    ///
    /// # Errors
    ///
    /// Returns the first [`super::InoteError`] met. No partial sequence is produced.
    pub fn from_notation(notation: &str) -> Result<InoteOutput> {
        let segments = tokenize(notation);
        let mut context = ParseContext::new();
        let mut slots: Vec<Slot> = vec![];
        let mut warnings = vec![];

        let mut index = 0;
        while let Some(segment) = segments.get(index) {
            if segment.content().trim() == END_MARKER {
                break;
            }
            let stripped = context.extract_directives(segment.content(), index)?;
            if slots.is_empty() {
                slots.push(Slot::Single(NoteEvent::placeholder(
                    stripped.tempo,
                    Fraction::zero(),
                    SegmentIndex::Leading,
                )));
            }

            if !stripped.note_text.is_empty() {
                let mut note_warnings = vec![];
                if let Some(mut slot) = parse_segment(
                    &stripped.note_text,
                    stripped.tempo,
                    stripped.subdivision,
                    &mut note_warnings,
                ) {
                    slot.tag(SegmentIndex::At(index));
                    slots.push(slot);
                }
                warnings.extend(
                    note_warnings
                        .into_iter()
                        .map(|warning| warning.into_wrapper(segment)),
                );
                index += 1;
                continue;
            }

            // A trailing rest has nothing after it to measure.
            if index + 1 >= segments.len() {
                break;
            }
            let mut rest = step(stripped.subdivision);
            let mut next = index + 1;
            while let Some(ahead) = segments.get(next) {
                if ahead.content().trim() == END_MARKER {
                    break;
                }
                let ahead = context.extract_directives(ahead.content(), next)?;
                if !ahead.note_text.is_empty() {
                    break;
                }
                rest = rest
                    .checked_add(&step(ahead.subdivision))
                    .ok_or_else(|| overflow(next, ahead.subdivision))?;
                next += 1;
            }
            // the leading placeholder takes rests before the first note
            if let Some(last) = slots.last_mut() {
                last.extend_duration(rest)
                    .ok_or_else(|| overflow(index, stripped.subdivision))?;
            }
            index = next;
        }

        if let [_, .., last] = slots.as_mut_slice() {
            for event in last.events_mut() {
                if !event.is_placeholder() {
                    event.duration = Fraction::zero();
                }
            }
        }

        Ok(InoteOutput {
            sequence: Self { slots },
            warnings,
        })
    }

    /// The slots in order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The slot at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// The number of slots, the leading placeholder included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot exists, which happens only for notation starting with `E`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates the slots in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    /// Compares slot by slot, ignoring source segments.
    #[must_use]
    pub fn same_timing(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(lhs, rhs)| lhs.same_timing(rhs))
    }
}

/// A duration sum outgrew `u64`, which only absurd subdivisions can cause.
fn overflow(segment: usize, subdivision: NonZeroU64) -> InoteError {
    InoteError::MalformedDirectiveValue {
        segment,
        value: subdivision.to_string(),
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::inote::{InoteWarning, parse_inote};

    use super::*;

    fn durations(sequence: &Sequence) -> Vec<Fraction> {
        sequence
            .iter()
            .map(|slot| slot.events()[0].duration)
            .collect()
    }

    #[test]
    fn leading_rests_go_to_placeholder() {
        let InoteOutput { sequence, .. } = parse_inote("(120){4},,1,2,E").unwrap();
        assert_eq!(
            durations(&sequence),
            vec![Fraction::new(1, 2), Fraction::new(1, 4), Fraction::zero()]
        );
        assert_eq!(sequence.slots()[0].segment(), SegmentIndex::Leading);
        assert_eq!(sequence.slots()[1].segment(), SegmentIndex::At(2));
    }

    #[test]
    fn lookahead_updates_context() {
        let InoteOutput { sequence, .. } = parse_inote("(120){4}1,{8},,(90)2,3,E").unwrap();
        // 1/4 own + 1/8 + 1/8 rests
        assert_eq!(
            durations(&sequence),
            vec![
                Fraction::zero(),
                Fraction::new(1, 2),
                Fraction::new(1, 8),
                Fraction::zero(),
            ]
        );
        assert_eq!(sequence.slots()[2].events()[0].tempo, 90);
        assert_eq!(sequence.slots()[2].segment(), SegmentIndex::At(3));
    }

    #[test]
    fn rests_extend_every_group_member() {
        let InoteOutput { sequence, .. } = parse_inote("(120){4}1/2,,3").unwrap();
        let group = &sequence.slots()[1];
        assert!(
            group
                .events()
                .iter()
                .all(|e| e.duration == Fraction::new(1, 2))
        );
    }

    #[test]
    fn trailing_rest_is_not_measured() {
        let InoteOutput { sequence, .. } = parse_inote("(120){4}1,2,").unwrap();
        assert_eq!(
            durations(&sequence),
            vec![Fraction::zero(), Fraction::new(1, 4), Fraction::zero()]
        );
    }

    #[test]
    fn only_placeholder_keeps_its_duration() {
        let InoteOutput { sequence, .. } = parse_inote("(120){4},,,E").unwrap();
        assert_eq!(sequence.len(), 1);
        assert_eq!(durations(&sequence), vec![Fraction::new(3, 4)]);
    }

    #[test]
    fn empty_note_text_appends_nothing() {
        let InoteOutput { sequence, .. } = parse_inote("(120){4}1,/,2,E").unwrap();
        assert_eq!(sequence.len(), 3);
        assert_eq!(sequence.slots()[1].events()[0].duration, Fraction::new(1, 4));
    }

    #[test]
    fn warnings_carry_segment_range() {
        let InoteOutput { warnings, .. } = parse_inote("(120){4}1,2h[x:1],E").unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].range(), 10..17);
        assert!(matches!(
            warnings[0].content(),
            InoteWarning::MalformedHoldSpan { content, .. } if content == "x:1"
        ));
    }

    #[test]
    fn lookahead_errors_abort() {
        assert_eq!(
            parse_inote("(120){4}1,,(x),2"),
            Err(InoteError::MalformedDirectiveValue {
                segment: 2,
                value: "x".into(),
            })
        );
        assert_eq!(
            parse_inote(",1"),
            Err(InoteError::MissingContext { segment: 0 })
        );
    }

    #[test]
    fn overflowing_rests_abort() {
        assert_eq!(
            parse_inote("(120){4}1,{4294967311},{4294967291},2,E"),
            Err(InoteError::MalformedDirectiveValue {
                segment: 2,
                value: "4294967291".into(),
            })
        );
        // the rests fit, the note they extend does not
        assert_eq!(
            parse_inote("(120){4294967311}1,{4294967291},2,E"),
            Err(InoteError::MalformedDirectiveValue {
                segment: 1,
                value: "4294967291".into(),
            })
        );
    }

    #[test]
    fn end_marker_first() {
        let InoteOutput { sequence, .. } = parse_inote(" E ,(120){4}1").unwrap();
        assert!(sequence.is_empty());
    }
}
