//! Prelude module for the maidata diff tool.
//!
//! This module re-exports commonly used types and functions.

pub use super::{
    Chart, DiffError,
    chart::{InoteBlock, Level, LevelError, LoadError},
    diff::{
        DiffInput, DiffRecord, DiffSide, compare, normalize,
        report::{DiffGroup, DiffReport, context_window, group_records},
    },
    diff_charts,
    inote::{
        InoteError, InoteOutput, InoteWarning, InoteWarningWithRange, Sequence,
        directive::ParseContext,
        note::{NoteEvent, Slot, parse_segment, parse_single_note},
        parse_inote,
        segment::{SegmentIndex, segment_offset, tokenize},
        time::Fraction,
    },
    mixin::{SourceRangeMixin, SourceRangeMixinExt},
};

#[cfg(feature = "cli")]
pub use super::chart::read_chart;

#[cfg(feature = "diagnostics")]
pub use super::diagnostics::{
    NotationReport, SimpleSource, ToAriadne, build_report, collect_inote_reports,
    emit_inote_error, emit_inote_warnings,
};
