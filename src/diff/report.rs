//! Grouping differences and printing them with their source context.

use std::ops::Range;

use crate::{chart::InoteBlock, inote::segment::tokenize};

use super::{DiffRecord, DiffSide};

/// The largest offset distance between two records of one group.
///
/// Offsets count UTF-8 bytes, not chars, so non-ASCII notation between two records makes them
/// further apart than its char count suggests.
pub const MAX_GROUP_DISTANCE: usize = 6;
/// The number of context bytes shown around the referenced segments.
///
/// Counted in bytes like the offsets, then widened to char boundaries.
pub const CONTEXT_PADDING: usize = 20;

/// Records close enough in the notation to be shown together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffGroup {
    records: Vec<DiffRecord>,
}

impl DiffGroup {
    /// The records in order of their offsets.
    #[must_use]
    pub fn records(&self) -> &[DiffRecord] {
        &self.records
    }
}

/// Sorts records by [`DiffRecord::min_offset`] and clusters them.
///
/// A record joins the current group if either of its offsets is within `max_distance` of the
/// same side's offset of the group's last record.
#[must_use]
pub fn group_records(mut records: Vec<DiffRecord>, max_distance: usize) -> Vec<DiffGroup> {
    records.sort_by_key(DiffRecord::min_offset);
    let mut groups: Vec<DiffGroup> = vec![];
    for record in records {
        match groups.last_mut() {
            Some(group)
                if group
                    .records
                    .last()
                    .is_some_and(|last| distance(last, &record) <= max_distance) =>
            {
                group.records.push(record);
            }
            _ => groups.push(DiffGroup {
                records: vec![record],
            }),
        }
    }
    groups
}

fn distance(lhs: &DiffRecord, rhs: &DiffRecord) -> usize {
    let left = lhs.left.offset.abs_diff(rhs.left.offset);
    let right = lhs.right.offset.abs_diff(rhs.right.offset);
    left.min(right)
}

/// A slice of notation with a marker line under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    /// The notation text in the window.
    pub text: String,
    /// `^` under every char of a referenced segment, and a space elsewhere.
    pub markers: String,
}

/// Cuts the window showing every side of `sides` in `notation`.
///
/// The window spans from `padding` bytes before the first offset to `padding` bytes after the
/// end of the furthest referenced segment, widened to char boundaries.
#[must_use]
pub fn context_window<'a>(
    notation: &str,
    sides: impl IntoIterator<Item = &'a DiffSide>,
    padding: usize,
) -> ContextWindow {
    let sides: Vec<&DiffSide> = sides.into_iter().collect();
    let (Some(min_offset), Some(max_offset)) = (
        sides.iter().map(|side| side.offset).min(),
        sides.iter().map(|side| side.offset).max(),
    ) else {
        return ContextWindow {
            text: String::new(),
            markers: String::new(),
        };
    };

    let segments = tokenize(notation);
    let marked: Vec<Range<usize>> = sides
        .iter()
        .filter_map(|side| side.segment.get())
        .filter_map(|index| segments.get(index))
        .map(|segment| segment.range())
        .collect();
    let furthest = marked
        .iter()
        .map(|range| range.end)
        .fold(max_offset, usize::max);

    let start = floor_char_boundary(notation, min_offset.saturating_sub(padding));
    let end = ceil_char_boundary(notation, (furthest + padding).min(notation.len()));
    let text = notation.get(start..end).unwrap_or_default();
    let markers = text
        .char_indices()
        .map(|(i, _)| {
            if marked.iter().any(|range| range.contains(&(start + i))) {
                '^'
            } else {
                ' '
            }
        })
        .collect();
    ContextWindow {
        text: text.to_owned(),
        markers,
    }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(s: &str, mut index: usize) -> usize {
    while !s.is_char_boundary(index) {
        index += 1;
    }
    index
}

/// The printable result of comparing two charts.
///
/// Its [`Display`](std::fmt::Display) output is the whole report, ending with
/// `Reach end of inote.`, or `No difference found.` when there is nothing to show.
#[derive(Debug, Clone)]
pub struct DiffReport<'a> {
    left: &'a InoteBlock,
    right: &'a InoteBlock,
    groups: Vec<DiffGroup>,
}

impl<'a> DiffReport<'a> {
    /// Groups `records` of a comparison between the notations of `left` and `right`.
    #[must_use]
    pub fn new(left: &'a InoteBlock, right: &'a InoteBlock, records: Vec<DiffRecord>) -> Self {
        Self {
            left,
            right,
            groups: group_records(records, MAX_GROUP_DISTANCE),
        }
    }

    /// The groups in order of their offsets.
    #[must_use]
    pub fn groups(&self) -> &[DiffGroup] {
        &self.groups
    }

    /// Whether no difference was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn write_side<'s>(
    f: &mut std::fmt::Formatter<'_>,
    block: &InoteBlock,
    group: &'s DiffGroup,
    side: impl Fn(&'s DiffRecord) -> &'s DiffSide,
) -> std::fmt::Result {
    let sides = group.records().iter().map(&side);
    let window = context_window(block.notation(), sides.clone(), CONTEXT_PADDING);
    let line = sides
        .map(|side| side.offset)
        .min()
        .and_then(|offset| block.line_at(offset))
        .unwrap_or_else(|| block.start_line());

    writeln!(f, "  Line {line:<3}: {}", window.text)?;
    writeln!(f, "            {}", window.markers)?;
    for record in group.records() {
        writeln!(f, "    diff{}: {}", record.index, side(record).rendered)?;
    }
    writeln!(f)
}

impl std::fmt::Display for DiffReport<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.groups.is_empty() {
            return writeln!(f, "No difference found.");
        }
        for (number, group) in self.groups.iter().enumerate() {
            writeln!(f, "Error group {}:", number + 1)?;
            write_side(f, self.left, group, |record| &record.left)?;
            write_side(f, self.right, group, |record| &record.right)?;
        }
        writeln!(f, "Reach end of inote.")
    }
}
