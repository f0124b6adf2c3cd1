//! Rendering parse problems with `ariadne`.
//!
//! Warnings already carry the byte range of their segment. Fatal errors only know the segment
//! index, so their range is looked up in the notation.
//!
//! # Usage Example
//!
//! ```rust
//! use maidata_diff::{diagnostics::emit_inote_warnings, inote::parse_inote};
//!
//! let notation = "(120){4}1,2h[x:1],E";
//! let output = parse_inote(notation).unwrap();
//!
//! emit_inote_warnings("chart.txt", notation, &output.warnings);
//! ```

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::inote::{InoteError, InoteWarning, InoteWarningWithRange, segment::tokenize};

/// A report whose spans are byte ranges in a named notation.
pub type NotationReport<'a> = Report<'a, (String, Range<usize>)>;

/// The notation being reported on, with the name of the file it came from.
#[derive(Debug, Clone, Copy)]
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Names `text` as `name`.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// The notation.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// The file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    fn cache(&self) -> (String, Source<&'a str>) {
        (self.name.to_owned(), Source::from(self.text))
    }
}

/// Converts a parse problem into an `ariadne` report.
pub trait ToAriadne {
    /// Builds the report against `src`.
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> NotationReport<'a>;
}

/// Builds a report with one colored label.
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> NotationReport<'a> {
    let label = Label::new((src.name().to_owned(), range.clone()))
        .with_message(label_message.to_string())
        .with_color(color);
    Report::build(kind, (src.name().to_owned(), range))
        .with_message(title)
        .with_label(label)
        .finish()
}

impl ToAriadne for InoteWarningWithRange {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> NotationReport<'a> {
        let title = match self.content() {
            InoteWarning::MalformedHoldSpan { .. } => "Malformed hold span",
        };
        build_report(
            src,
            ReportKind::Warning,
            self.range(),
            title,
            self.content(),
            Color::Yellow,
        )
    }
}

impl ToAriadne for InoteError {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> NotationReport<'a> {
        let (title, segment) = match self {
            Self::MissingContext { segment } => ("Missing tempo or subdivision", *segment),
            Self::MalformedDirectiveValue { segment, .. } => ("Malformed directive", *segment),
        };
        let range = tokenize(src.text())
            .get(segment)
            .map_or(0..0, |segment| segment.range());
        build_report(src, ReportKind::Error, range, title, self, Color::Red)
    }
}

/// Prints a report for every warning to stderr.
pub fn emit_inote_warnings<'a>(
    name: &'a str,
    notation: &'a str,
    warnings: impl IntoIterator<Item = &'a InoteWarningWithRange>,
) {
    let src = SimpleSource::new(name, notation);
    for warning in warnings {
        // stderr is gone, nothing left to report to
        let _ = warning.to_report(&src).eprint(src.cache());
    }
}

/// Prints the report of a fatal error to stderr.
pub fn emit_inote_error(name: &str, notation: &str, error: &InoteError) {
    let src = SimpleSource::new(name, notation);
    let _ = error.to_report(&src).eprint(src.cache());
}

/// Builds a report for every warning without printing.
#[must_use]
pub fn collect_inote_reports<'a>(
    name: &'a str,
    notation: &'a str,
    warnings: impl IntoIterator<Item = &'a InoteWarningWithRange>,
) -> Vec<NotationReport<'a>> {
    let src = SimpleSource::new(name, notation);
    warnings
        .into_iter()
        .map(|warning| warning.to_report(&src))
        .collect()
}
