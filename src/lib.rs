//! The maidata chart diff tool.
//!
//! Compares the inote notation of one difficulty level in two maidata chart files, and reports
//! musically meaningful differences while ignoring notation synonyms.
//!
//! Raw chart == [`chart`] ==> [`chart::InoteBlock`] == [`inote`] ==> [`inote::Sequence`]
//! == [`diff`] ==> [`diff::DiffRecord`]s == [`diff::report`] ==> printable report
//!
//! - `chart` loads the notation of a level, keeping line numbers of the file.
//! - `inote` parses notation into an ordered sequence of timed notes, in exact rational time.
//! - `diff` aligns two sequences by position, and groups surviving differences with their
//!   source context.
//!
//! # Example
//!
//! ```
//! use maidata_diff::{Chart, chart::Level, diff_charts};
//!
//! let level = Level::try_from(5).unwrap();
//! let left = Chart::load("txt1", "&inote_5=(120){4}1,2,3,E", level).unwrap();
//! let right = Chart::load("txt2", "&inote_5=(120){4}1,2,4,E", level).unwrap();
//!
//! let report = diff_charts(&left, &right);
//! assert_eq!(report.groups().len(), 1);
//! print!("{report}");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod chart;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod diff;
pub mod inote;
pub mod mixin;
pub mod prelude;

use thiserror::Error;

use self::{
    chart::{InoteBlock, Level, LoadError},
    diff::{DiffInput, compare, report::DiffReport},
    inote::{InoteError, InoteOutput, parse_inote},
};

/// A fatal error of one chart, with the label of the chart.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DiffError {
    /// The chart could not be loaded.
    #[error("get_inote error: {source} in {label}")]
    Load {
        /// The label of the chart.
        label: String,
        /// The cause.
        source: LoadError,
    },
    /// The notation could not be parsed.
    #[error("parse error: {source} in {label}")]
    Parse {
        /// The label of the chart.
        label: String,
        /// The cause.
        source: InoteError,
    },
}

/// One loaded and parsed chart level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    /// The label naming this chart in diagnostics.
    pub label: String,
    /// The notation block.
    pub block: InoteBlock,
    /// The parsed sequence and its warnings.
    pub output: InoteOutput,
}

impl Chart {
    /// Extracts and parses the block of `level` from chart source.
    ///
    /// # Errors
    ///
    /// Returns [`DiffError::Load`] if the block is missing, and [`DiffError::Parse`] if its
    /// notation is fatally broken.
    pub fn load(label: impl Into<String>, source: &str, level: Level) -> Result<Self, DiffError> {
        let label = label.into();
        let block = match InoteBlock::extract(source, level) {
            Ok(block) => block,
            Err(source) => return Err(DiffError::Load { label, source }),
        };
        let output = match parse_inote(block.notation()) {
            Ok(output) => output,
            Err(source) => return Err(DiffError::Parse { label, source }),
        };
        Ok(Self {
            label,
            block,
            output,
        })
    }

    /// Pairs the sequence with its notation for [`compare`].
    #[must_use]
    pub fn diff_input(&self) -> DiffInput<'_> {
        DiffInput::new(&self.output.sequence, self.block.notation())
    }
}

/// Compares two charts and groups the differences into a report.
#[must_use]
pub fn diff_charts<'a>(left: &'a Chart, right: &'a Chart) -> DiffReport<'a> {
    let records = compare(left.diff_input(), right.diff_input());
    DiffReport::new(&left.block, &right.block, records)
}
