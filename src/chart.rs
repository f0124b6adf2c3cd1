//! Loading inote blocks out of maidata chart files.
//!
//! A chart file holds one `&inote_<level>=` block per difficulty level. Each block may span
//! many lines, which are trimmed and joined into one notation string. Blank lines and `||`
//! comments are skipped.

use std::str::FromStr;

use thiserror::Error;

/// The prefix of every inote block line.
pub const INOTE_PREFIX: &str = "&inote_";
/// The prefix of comment lines.
pub const COMMENT_PREFIX: &str = "||";

/// A difficulty level which has an inote block, from 2 to 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level(u8);

impl Level {
    /// The lowest level.
    pub const MIN: u8 = 2;
    /// The highest level.
    pub const MAX: u8 = 7;

    /// Returns the level number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// The level was not an integer from 2 to 7.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("inote level must be int 2-7, got `{0}`")]
pub struct LevelError(pub String);

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(Self(value))
            .ok_or_else(|| LevelError(value.to_string()))
    }
}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| LevelError(s.to_owned()))
            .and_then(Self::try_from)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An error occurred when loading a chart.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LoadError {
    /// The chart has no block for the level.
    #[error("inote_{level} not found")]
    MissingBlock {
        /// The requested level.
        level: Level,
    },
    /// The chart could not be read.
    #[error("failed to read chart: {0}")]
    Io(#[from] std::io::Error),
    /// The chart is not UTF-8 text.
    #[error("chart is not valid UTF-8")]
    Encoding,
}

/// The notation of one level, with line numbers to point back into the chart file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InoteBlock {
    notation: String,
    start_line: usize,
    /// The line number of every byte of `notation`.
    line_map: Vec<usize>,
}

impl InoteBlock {
    /// Extracts the block of `level` from chart source.
    ///
    /// The block runs from its `&inote_<level>=` line until the next `&inote_` line.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingBlock`] if the chart has no such block.
    pub fn extract(source: &str, level: Level) -> Result<Self, LoadError> {
        let header = format!("{INOTE_PREFIX}{level}=");
        let mut block: Option<Self> = None;
        for (line_number, line) in source
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
        {
            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }
            if let Some(current) = block.as_mut() {
                if line.starts_with(INOTE_PREFIX) {
                    break;
                }
                current.push_line(line, line_number);
            } else if let Some(rest) = line.strip_prefix(&header) {
                let mut found = Self {
                    notation: String::new(),
                    start_line: line_number,
                    line_map: vec![],
                };
                found.push_line(rest.trim(), line_number);
                block = Some(found);
            }
        }
        block.ok_or(LoadError::MissingBlock { level })
    }

    /// Wraps notation which did not come from a file. Every byte maps to line 1.
    #[must_use]
    pub fn from_notation(notation: impl Into<String>) -> Self {
        let notation = notation.into();
        let line_map = vec![1; notation.len()];
        Self {
            notation,
            start_line: 1,
            line_map,
        }
    }

    fn push_line(&mut self, line: &str, line_number: usize) {
        self.notation.push_str(line);
        self.line_map
            .extend(std::iter::repeat_n(line_number, line.len()));
    }

    /// The joined notation.
    #[must_use]
    pub fn notation(&self) -> &str {
        &self.notation
    }

    /// The line number of the `&inote_` line.
    #[must_use]
    pub const fn start_line(&self) -> usize {
        self.start_line
    }

    /// The line number of the notation byte at `offset`.
    #[must_use]
    pub fn line_at(&self, offset: usize) -> Option<usize> {
        self.line_map.get(offset).copied()
    }
}

/// Reads a chart file as UTF-8, stripping a byte order mark.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read, and [`LoadError::Encoding`] if it is
/// not valid UTF-8.
#[cfg(feature = "cli")]
pub fn read_chart(path: impl AsRef<std::path::Path>) -> Result<String, LoadError> {
    let bytes = std::fs::read(path)?;
    let (text, malformed) = encoding_rs::UTF_8.decode_with_bom_removal(&bytes);
    if malformed {
        return Err(LoadError::Encoding);
    }
    Ok(text.into_owned())
}
