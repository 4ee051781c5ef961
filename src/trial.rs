use serde::Serialize;

use crate::eprime::{find_tagged, tag_value};
use crate::error::ParseError;

pub const STIM_ONSET: &str = "StimSlide.OnsetTime:";
pub const STIM_ONSET_TO_ONSET: &str = "StimSlide.OnsetToOnsetTime:";
pub const STIM_RT: &str = "StimSlide.RT:";
pub const STIM_ACC: &str = "StimSlide.ACC:";
pub const STIM_CRESP: &str = "StimSlide.CRESP:";
pub const STIM_RESP: &str = "StimSlide.RESP:";

const SHAPE_INDICATOR: &str = "ShapeBlock";
const FACE_INDICATOR: &str = "FaceBlock";

/// Stimulus category of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TrialType {
    Shapes,
    Faces,
}

impl TrialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrialType::Shapes => "Shapes",
            TrialType::Faces => "Faces",
        }
    }
}

/// One assembled output row. Time columns are seconds relative to the
/// sync baseline; anything the block did not record stays `None`.
#[derive(Debug, Clone, Serialize)]
pub struct TrialRecord {
    pub onset: Option<f64>,
    pub duration: Option<f64>,
    pub trial_type: Option<TrialType>,
    pub response_time: Option<f64>,
    pub accuracy: Option<i64>,
    pub correct_response: Option<i64>,
    pub participant_response: Option<i64>,
}

impl TrialRecord {
    /// Extracts one trial's fields from its block and converts the
    /// millisecond timestamps to seconds.
    pub fn from_block(block: &[String], baseline_ms: i64) -> Result<Self, ParseError> {
        let onset = field_int(block, STIM_ONSET)?.map(|ms| (ms - baseline_ms) as f64 / 1000.0);
        let duration = field_int(block, STIM_ONSET_TO_ONSET)?.map(ms_to_s);
        let response_time = field_int(block, STIM_RT)?.map(ms_to_s);
        let accuracy = field_int(block, STIM_ACC)?;
        let correct_response = map_response(field_value(block, STIM_CRESP)?)?;
        let participant_response = map_response(field_value(block, STIM_RESP)?)?;

        Ok(Self {
            onset,
            duration,
            trial_type: trial_type(block),
            response_time,
            accuracy,
            correct_response,
            participant_response,
        })
    }
}

fn ms_to_s(ms: i64) -> f64 {
    ms as f64 / 1000.0
}

fn trial_type(block: &[String]) -> Option<TrialType> {
    if block.iter().any(|l| l.contains(SHAPE_INDICATOR)) {
        Some(TrialType::Shapes)
    } else if block.iter().any(|l| l.contains(FACE_INDICATOR)) {
        Some(TrialType::Faces)
    } else {
        None
    }
}

/// The raw value of `tag` within one block. Absent tag or an empty
/// value is `None`; a tag hit on more than one line is fatal, as is a
/// value with anything but ASCII alphanumerics.
pub fn field_value<'a>(block: &'a [String], tag: &'static str) -> Result<Option<&'a str>, ParseError> {
    let hits = find_tagged(block, tag);
    match hits.as_slice() {
        [] => Ok(None),
        [(_, line)] => match tag_value(line, tag) {
            None => Ok(None),
            Some(value) if value.chars().all(|c| c.is_ascii_alphanumeric()) => Ok(Some(value)),
            Some(value) => Err(ParseError::MalformedValue {
                tag,
                value: value.to_string(),
            }),
        },
        _ => Err(ParseError::DuplicateTag {
            tag,
            count: hits.len(),
        }),
    }
}

/// `field_value` narrowed to integer fields (timestamps, accuracy).
pub fn field_int(block: &[String], tag: &'static str) -> Result<Option<i64>, ParseError> {
    match field_value(block, tag)? {
        None => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ParseError::MalformedValue {
                tag,
                value: value.to_string(),
            }),
    }
}

/// Normalizes a response code to its integer form: numeric text passes
/// through, the two response-box keys map to 1 and 2, anything else is
/// an unrecognized encoding.
pub fn map_response(value: Option<&str>) -> Result<Option<i64>, ParseError> {
    let Some(value) = value else {
        return Ok(None);
    };
    if value.chars().all(|c| c.is_ascii_digit()) {
        return value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ParseError::UnknownResponse {
                value: value.to_string(),
            });
    }
    match value {
        "c" => Ok(Some(1)),
        "d" => Ok(Some(2)),
        _ => Err(ParseError::UnknownResponse {
            value: value.to_string(),
        }),
    }
}
