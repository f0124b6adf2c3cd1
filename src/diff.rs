//! Positional comparison of two sequences.
//!
//! Slots are aligned by index, without any edit-distance matching. A pair of slots which
//! differs only by notation synonyms (see [`normalize`]) is not a difference.

pub mod report;

use crate::inote::{
    Sequence,
    note::Slot,
    segment::{SegmentIndex, segment_offset},
};

/// Rewrites applied by [`normalize`], in order.
pub const SYNONYMS: [(&str, &str); 9] = [
    ("c1", "C"),
    ("c2", "C"),
    ("C1", "C"),
    ("xh", "hx"),
    ("xb", "bx"),
    ("hb", "bh"),
    (">", "^"),
    ("<", "^"),
    ("$", ""),
];

/// The rendering of a side which has no slot at the index.
pub const ABSENT: &str = "None";

/// One side of a comparison: a parsed sequence and the notation it came from.
#[derive(Debug, Clone, Copy)]
pub struct DiffInput<'a> {
    /// The parsed sequence.
    pub sequence: &'a Sequence,
    /// The raw notation.
    pub notation: &'a str,
}

impl<'a> DiffInput<'a> {
    /// Pairs a sequence with its notation.
    #[must_use]
    pub const fn new(sequence: &'a Sequence, notation: &'a str) -> Self {
        Self { sequence, notation }
    }

    fn side(&self, index: usize) -> DiffSide {
        let slot = self.sequence.get(index);
        let segment = slot.map_or(SegmentIndex::Leading, Slot::segment);
        DiffSide {
            rendered: slot.map_or_else(|| ABSENT.to_owned(), ToString::to_string),
            segment,
            offset: segment_offset(self.notation, segment),
        }
    }
}

/// One side of a [`DiffRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiffSide {
    /// The slot rendering before normalization.
    pub rendered: String,
    /// The segment of the slot, [`SegmentIndex::Leading`] when absent.
    pub segment: SegmentIndex,
    /// The byte offset of the segment in the notation.
    pub offset: usize,
}

/// A difference which survived normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiffRecord {
    /// The aligned slot index.
    pub index: usize,
    /// The first chart's side.
    pub left: DiffSide,
    /// The second chart's side.
    pub right: DiffSide,
}

impl DiffRecord {
    /// The smaller offset of the two sides, which orders records in a report.
    #[must_use]
    pub fn min_offset(&self) -> usize {
        self.left.offset.min(self.right.offset)
    }
}

/// Replaces notation synonyms with one spelling, until nothing changes.
///
/// ```
/// use maidata_diff::diff::normalize;
///
/// assert_eq!(normalize("'1xh'"), normalize("'1hx'"));
/// assert_eq!(normalize("'3-7$'"), "'3-7'");
/// ```
#[must_use]
pub fn normalize(rendered: &str) -> String {
    let mut current = rendered.to_owned();
    loop {
        let next = SYNONYMS
            .iter()
            .fold(current.clone(), |acc, (from, to)| acc.replace(from, to));
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Walks both sequences by index and collects the differences.
///
/// Returns an empty list if the sequences have the same timing, or every unequal pair of slots
/// renders equally after [`normalize`].
#[must_use]
pub fn compare(left: DiffInput<'_>, right: DiffInput<'_>) -> Vec<DiffRecord> {
    if left.sequence.same_timing(right.sequence) {
        return vec![];
    }
    let len = left.sequence.len().max(right.sequence.len());
    (0..len)
        .filter(|&index| {
            match (left.sequence.get(index), right.sequence.get(index)) {
                (Some(lhs), Some(rhs)) => !lhs.same_timing(rhs),
                (None, None) => false,
                _ => true,
            }
        })
        .filter_map(|index| {
            let record = DiffRecord {
                index,
                left: left.side(index),
                right: right.side(index),
            };
            (normalize(&record.left.rendered) != normalize(&record.right.rendered))
                .then_some(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::inote::parse_inote;

    fn diff(lhs: &str, rhs: &str) -> Vec<DiffRecord> {
        let lhs_seq = parse_inote(lhs).unwrap().sequence;
        let rhs_seq = parse_inote(rhs).unwrap().sequence;
        compare(DiffInput::new(&lhs_seq, lhs), DiffInput::new(&rhs_seq, rhs))
    }

    #[test]
    fn normalize_rules() {
        assert_eq!(normalize("c1 c2 C1"), "C C C");
        assert_eq!(normalize("1xh 2xb 3hb"), "1hx 2bx 3bh");
        assert_eq!(normalize("1-5> 1-5< 1$"), "1-5^ 1-5^ 1");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in ["1xxh", "c11", "hxb$>", "'1bxh[1/4]': bpm-120, delay-0", "xhbhb"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn identical_or_relocated_charts() {
        assert!(diff("(120){4}1,2,E", "(120){4}1,2,E").is_empty());
        assert!(diff("(120){4}1,2,E", "(120){8}1,,(120){4}2").is_empty());
    }

    #[test]
    fn synonyms_are_suppressed() {
        assert!(diff("(120){4}1xh[4:1],5>3,E", "(120){4}1hx[4:1],5<3,E").is_empty());
        assert!(diff("(120){4}C1,1$,E", "(120){4}c2,1,E").is_empty());
    }

    #[test]
    fn real_difference() {
        let records = diff("(120){4}1,2,3,E", "(120){4}1,4,3,E");
        assert_eq!(
            records,
            vec![DiffRecord {
                index: 2,
                left: DiffSide {
                    rendered: "'2': bpm-120, delay-1/4".into(),
                    segment: SegmentIndex::At(1),
                    offset: 10,
                },
                right: DiffSide {
                    rendered: "'4': bpm-120, delay-1/4".into(),
                    segment: SegmentIndex::At(1),
                    offset: 10,
                },
            }]
        );
    }

    #[test]
    fn absent_side() {
        let records = diff("(120){4}1,2,E", "(120){4}1,E");
        // "1" loses its gap on the shorter side, and "2" has no counterpart.
        assert_eq!(records.len(), 2);
        let last = &records[1];
        assert_eq!(last.index, 2);
        assert_eq!(last.right.rendered, ABSENT);
        assert_eq!(last.right.segment, SegmentIndex::Leading);
        assert_eq!(last.right.offset, 0);
        assert_eq!(last.min_offset(), 0);
    }
}
