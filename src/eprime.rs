use std::fs;
use std::path::Path;

use encoding_rs::UTF_16LE;

use crate::error::ParseError;

/// Line marking the start of one trial's data region.
pub const TRIAL_MARKER: &str = "Procedure: TrialsPROC";
/// Scanner sync pulse; the first occurrence anchors all onsets.
pub const SYNC_ONSET: &str = "SyncSlide.OnsetTime:";

/// One decoded E-Prime log: the lines in file order, original
/// terminators kept, immutable after construction.
pub struct EprimeLog {
    lines: Vec<String>,
}

impl EprimeLog {
    /// Reads and decodes a log file. E-Prime writes UTF-16 with a BOM
    /// (little-endian unless the BOM says otherwise); the decode is
    /// strict, so malformed input aborts instead of being replaced.
    pub fn read(path: &Path) -> Result<Self, ParseError> {
        let bytes = fs::read(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (text, _, had_errors) = UTF_16LE.decode(&bytes);
        if had_errors {
            return Err(ParseError::Decode {
                path: path.to_path_buf(),
            });
        }
        let lines = text.split_inclusive('\n').map(str::to_owned).collect();
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line index of each trial-start marker, in file order.
    pub fn trial_boundaries(&self) -> Vec<usize> {
        find_tagged(&self.lines, TRIAL_MARKER)
            .into_iter()
            .map(|(i, _)| i)
            .collect()
    }

    /// Contiguous per-trial line slices. Block i spans from its marker to
    /// the next marker; the last block runs to end-of-log. No markers
    /// means no trials, not an error.
    pub fn trial_blocks(&self) -> Vec<&[String]> {
        let bounds = self.trial_boundaries();
        bounds
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = bounds.get(i + 1).copied().unwrap_or(self.lines.len());
                &self.lines[start..end]
            })
            .collect()
    }

    /// Millisecond timestamp of the first sync pulse in the log, the
    /// zero point for onset columns. `None` when the log carries no
    /// usable sync line; whether that is fatal depends on whether any
    /// trials were found.
    pub fn sync_baseline_ms(&self) -> Result<Option<i64>, ParseError> {
        let hits = find_tagged(&self.lines, SYNC_ONSET);
        let Some((_, line)) = hits.first() else {
            return Ok(None);
        };
        match tag_value(line, SYNC_ONSET) {
            None => Ok(None),
            Some(value) => value
                .parse::<i64>()
                .map(Some)
                .map_err(|_| ParseError::MalformedValue {
                    tag: SYNC_ONSET,
                    value: value.to_string(),
                }),
        }
    }
}

/// Every `(index, line)` where `tag` occurs as a substring, in file
/// order. The single search primitive behind markers, the sync
/// baseline, and per-block fields.
pub fn find_tagged<'a>(lines: &'a [String], tag: &str) -> Vec<(usize, &'a str)> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(tag))
        .map(|(i, line)| (i, line.as_str()))
        .collect()
}

/// The text after `tag` on a `Label: Value` line, trimmed of
/// whitespace and the line terminator. A line ending right after the
/// colon is explicitly empty.
pub(crate) fn tag_value<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    let pos = line.find(tag)?;
    let value = line[pos + tag.len()..].trim();
    (!value.is_empty()).then_some(value)
}
