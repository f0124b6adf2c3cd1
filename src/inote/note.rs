//! Notes, simultaneous groups and their parsers.

use std::num::NonZeroU64;

use itertools::Itertools;
use num::{CheckedAdd, Zero};

use super::{
    InoteWarning,
    segment::SegmentIndex,
    time::{Fraction, step},
};

/// The symbol of a placeholder, which marks a rest instead of a note.
pub const PLACEHOLDER: &str = "@";

/// A parsed note.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteEvent {
    /// The note text with hold spans removed.
    pub symbol: String,
    /// The tempo in effect when parsed.
    pub tempo: u64,
    /// The gap until the next note, as a fraction of a whole cycle.
    pub duration: Fraction,
    /// The hold length, present only for held notes.
    pub hold: Option<Fraction>,
    /// The segment this note was parsed from.
    pub segment: SegmentIndex,
}

impl NoteEvent {
    /// Creates a placeholder which only contributes its duration.
    #[must_use]
    pub fn placeholder(tempo: u64, duration: Fraction, segment: SegmentIndex) -> Self {
        Self {
            symbol: PLACEHOLDER.to_owned(),
            tempo,
            duration,
            hold: None,
            segment,
        }
    }

    /// Whether this is a placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.symbol == PLACEHOLDER
    }

    /// Compares everything but the source segment.
    #[must_use]
    pub fn same_timing(&self, other: &Self) -> bool {
        self.symbol == other.symbol
            && self.tempo == other.tempo
            && self.duration == other.duration
            && self.hold == other.hold
    }
}

impl std::fmt::Display for NoteEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.hold {
            Some(hold) => write!(
                f,
                "'{}[{}]': bpm-{}, delay-{}",
                self.symbol, hold, self.tempo, self.duration
            ),
            None => write!(
                f,
                "'{}': bpm-{}, delay-{}",
                self.symbol, self.tempo, self.duration
            ),
        }
    }
}

/// One position of a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    /// A lone note.
    Single(NoteEvent),
    /// Notes from one segment beginning together, sorted by symbol.
    Group(Vec<NoteEvent>),
}

impl Slot {
    /// The notes in this slot.
    #[must_use]
    pub fn events(&self) -> &[NoteEvent] {
        match self {
            Self::Single(event) => std::slice::from_ref(event),
            Self::Group(events) => events,
        }
    }

    /// The notes in this slot, mutably.
    pub fn events_mut(&mut self) -> &mut [NoteEvent] {
        match self {
            Self::Single(event) => std::slice::from_mut(event),
            Self::Group(events) => events,
        }
    }

    /// The segment of the first note.
    #[must_use]
    pub fn segment(&self) -> SegmentIndex {
        self.events()
            .first()
            .map_or(SegmentIndex::Leading, |event| event.segment)
    }

    /// Compares the notes in order, ignoring their source segments.
    ///
    /// A single note never equals a group, even a group of one.
    #[must_use]
    pub fn same_timing(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Single(lhs), Self::Single(rhs)) => lhs.same_timing(rhs),
            (Self::Group(lhs), Self::Group(rhs)) => {
                lhs.len() == rhs.len() && lhs.iter().zip(rhs).all(|(l, r)| l.same_timing(r))
            }
            _ => false,
        }
    }

    pub(crate) fn tag(&mut self, segment: SegmentIndex) {
        for event in self.events_mut() {
            event.segment = segment;
        }
    }

    /// Adds `rest` to every note, or returns `None` leaving the slot untouched if a sum does
    /// not fit.
    pub(crate) fn extend_duration(&mut self, rest: Fraction) -> Option<()> {
        let extended: Vec<Fraction> = self
            .events()
            .iter()
            .map(|event| event.duration.checked_add(&rest))
            .collect::<Option<_>>()?;
        for (event, duration) in self.events_mut().iter_mut().zip(extended) {
            event.duration = duration;
        }
        Some(())
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.events().iter().format(", "))
    }
}

/// Parses directive-free note text of one segment.
///
/// - `/`, or its legacy synonym `` ` ``, separates simultaneous notes. The result is a group
///   even if only one note survives.
/// - A bare numeral of 10 or more is shorthand for one note per digit, so `123` is `1/2/3`.
/// - Anything else is a single note.
///
/// Returns `None` for text holding no note.
pub fn parse_segment(
    text: &str,
    tempo: u64,
    subdivision: NonZeroU64,
    warnings: &mut Vec<InoteWarning>,
) -> Option<Slot> {
    if text.is_empty() {
        return None;
    }
    let text = text.replace('`', "/");
    let mut notes: Vec<NoteEvent> = if text.contains('/') {
        text.split('/')
            .filter_map(|note| parse_single_note(note, tempo, subdivision, warnings))
            .collect()
    } else if is_digit_cluster(&text) {
        text.matches(|c: char| c.is_ascii_digit())
            .filter_map(|note| parse_single_note(note, tempo, subdivision, warnings))
            .collect()
    } else {
        return parse_single_note(&text, tempo, subdivision, warnings).map(Slot::Single);
    };
    if notes.is_empty() {
        return None;
    }
    notes.sort_by(|lhs, rhs| lhs.symbol.cmp(&rhs.symbol));
    Some(Slot::Group(notes))
}

fn is_digit_cluster(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit()) && text.trim_start_matches('0').len() >= 2
}

/// Parses one note, reading its `[denominator:numerator]` hold spans.
///
/// Every bracket span is removed from the symbol. Spans which are not `int:int` with a
/// non-zero denominator, or whose length overflows the running hold, are reported to `warnings`
/// and ignored. The duration is always
/// `1/subdivision`.
///
/// Returns `None` for blank text.
pub fn parse_single_note(
    text: &str,
    tempo: u64,
    subdivision: NonZeroU64,
    warnings: &mut Vec<InoteWarning>,
) -> Option<NoteEvent> {
    let note = text.trim();
    if note.is_empty() {
        return None;
    }

    let mut symbol = note.to_owned();
    let mut hold = Fraction::zero();
    while let Some(open) = symbol.find('[') {
        let Some(close) = symbol[open..].find(']').map(|i| open + i) else {
            break;
        };
        let content = symbol[open + 1..close].to_owned();
        match parse_hold_span(&content).and_then(|length| hold.checked_add(&length)) {
            Some(total) => hold = total,
            None => warnings.push(InoteWarning::MalformedHoldSpan {
                note: note.to_owned(),
                content,
            }),
        }
        symbol.replace_range(open..=close, "");
    }

    Some(NoteEvent {
        symbol: symbol.trim().to_owned(),
        tempo,
        duration: step(subdivision),
        hold: (!hold.is_zero()).then_some(hold),
        segment: SegmentIndex::Leading,
    })
}

fn parse_hold_span(content: &str) -> Option<Fraction> {
    let (denominator, numerator) = content.split_once(':')?;
    let denominator: u64 = denominator.trim().parse().ok().filter(|&d| d != 0)?;
    let numerator: u64 = numerator.trim().parse().ok()?;
    Some(Fraction::new(numerator, denominator))
}
