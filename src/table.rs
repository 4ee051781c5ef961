use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::WriterBuilder;

use crate::error::ParseError;
use crate::trial::TrialRecord;

/// BIDS null marker, used for every missing value.
const NA: &str = "n/a";

pub const COLUMNS: [&str; 7] = [
    "onset",
    "duration",
    "trial_type",
    "response_time",
    "accuracy",
    "correct_response",
    "participant_response",
];

/// `<dest>/<subject>_FACES.tsv`, with the subject id taken from the
/// log file's parent directory name.
pub fn events_path(input: &Path, dest: &Path) -> Result<PathBuf, ParseError> {
    let subject = input
        .parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .ok_or_else(|| ParseError::NoSubjectId {
            path: input.to_path_buf(),
        })?;
    Ok(dest.join(format!("{subject}_FACES.tsv")))
}

pub fn sidecar_path(events: &Path) -> PathBuf {
    events.with_extension("json")
}

/// Writes the header and one tab-separated row per trial. Callers pass
/// fully assembled records, so a parse failure never leaves a partial
/// table behind.
pub fn write_events_tsv(path: &Path, records: &[TrialRecord]) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(file);
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(&[
            seconds(record.onset),
            seconds(record.duration),
            record
                .trial_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_else(|| NA.into()),
            seconds(record.response_time),
            integer(record.accuracy),
            integer(record.correct_response),
            integer(record.participant_response),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// BIDS column dictionary accompanying the events table.
pub fn write_sidecar_json(path: &Path) -> Result<()> {
    let metadata = serde_json::json!({
        "onset": {
            "Description": "Stimulus onset relative to the first scanner sync pulse",
            "Units": "s",
        },
        "duration": {
            "Description": "Stimulus-to-next-stimulus interval",
            "Units": "s",
        },
        "trial_type": {
            "Description": "Stimulus category of the block the trial belongs to",
            "Levels": {
                "Shapes": "Geometric shape matching",
                "Faces": "Emotional face matching",
            },
        },
        "response_time": {
            "Description": "Time from stimulus onset to the participant's key press",
            "Units": "s",
        },
        "accuracy": {
            "Description": "1 if the response matched the correct response, 0 otherwise",
        },
        "correct_response": {
            "Description": "Expected response button",
            "Levels": { "1": "left button (c)", "2": "right button (d)" },
        },
        "participant_response": {
            "Description": "Button the participant pressed",
            "Levels": { "1": "left button (c)", "2": "right button (d)" },
        },
    });
    fs::write(path, serde_json::to_string_pretty(&metadata)?)
        .with_context(|| format!("creating {}", path.display()))?;
    Ok(())
}

// Fixed-point with millisecond precision; source values are integer
// milliseconds, so nothing is lost and nothing prints as 1.2e3.
fn seconds(value: Option<f64>) -> String {
    value.map_or_else(|| NA.into(), |s| format!("{s:.3}"))
}

fn integer(value: Option<i64>) -> String {
    value.map_or_else(|| NA.into(), |i| i.to_string())
}
