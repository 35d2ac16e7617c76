// ffmpeg concat demuxer
// https://ffmpeg.org/ffmpeg-formats.html#concat-1

use serde::ser::{self, SerializeStruct, Serializer};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("unrecognized timestamp format '{value}': expected MM:SS or HH:MM:SS, got {len} characters")]
    UnrecognizedLength { value: String, len: usize },

    #[error("unrecognized timestamp format '{value}': expected {expected} ':' separated components")]
    WrongShape { value: String, expected: usize },

    #[error("invalid component '{component}' in timestamp '{value}'")]
    InvalidComponent { value: String, component: String },

    #[error("timestamp '{value}' with fuzz {fuzz} is out of range")]
    Overflow { value: String, fuzz: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TimestampFormat {
    MinSec,
    HourMinSec,
}

impl TimestampFormat {
    // seconds per component, most significant first
    fn weights(&self) -> &'static [i64] {
        match self {
            TimestampFormat::MinSec => &[60, 1],
            TimestampFormat::HourMinSec => &[3600, 60, 1],
        }
    }
}

impl TryFrom<&str> for TimestampFormat {
    type Error = TimestampError;

    // format is decided by length alone; M:SS and H:MM:SS leave the leading digit unpadded
    fn try_from(ts: &str) -> Result<Self, Self::Error> {
        match ts.chars().count() {
            4 | 5 => Ok(TimestampFormat::MinSec),
            7 | 8 => Ok(TimestampFormat::HourMinSec),
            len => Err(TimestampError::UnrecognizedLength {
                value: ts.into(),
                len,
            }),
        }
    }
}

/// Convert from `MM:SS` or `HH:MM:SS` to a number of seconds.
///
/// Components are not range checked, so `00:90` is 90 seconds.
pub fn to_seconds(ts: &str) -> Result<i64, TimestampError> {
    let ts = ts.trim();
    let weights = TimestampFormat::try_from(ts)?.weights();
    let components: Vec<&str> = ts.split(':').collect();
    if components.len() != weights.len() {
        return Err(TimestampError::WrongShape {
            value: ts.into(),
            expected: weights.len(),
        });
    }

    components
        .iter()
        .zip(weights)
        .try_fold(0, |acc, (component, weight)| -> Result<i64, TimestampError> {
            let n = component
                .trim()
                .parse::<u32>()
                .map_err(|_| TimestampError::InvalidComponent {
                    value: ts.into(),
                    component: component.to_string(),
                })?;
            Ok(acc + i64::from(n) * weight)
        })
}

/// One clip: a span of `file` between `start` and `stop`, padded outward by `fuzz` seconds.
///
/// `start` and `stop` are kept as written and only parsed when the offsets are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    pub file: String,
    pub start: String,
    pub stop: String,
    pub description: String,
    pub fuzz: i64,
}

impl Timestamp {
    pub fn new(file: &str, start: &str, stop: &str, description: &str, fuzz: i64) -> Self {
        Timestamp {
            file: file.into(),
            start: start.into(),
            stop: stop.into(),
            description: description.into(),
            fuzz,
        }
    }

    pub fn start_secs(&self) -> Result<i64, TimestampError> {
        to_seconds(&self.start)?
            .checked_sub(self.fuzz)
            .ok_or_else(|| self.overflow(&self.start))
    }

    pub fn stop_secs(&self) -> Result<i64, TimestampError> {
        to_seconds(&self.stop)?
            .checked_add(self.fuzz)
            .ok_or_else(|| self.overflow(&self.stop))
    }

    fn overflow(&self, value: &str) -> TimestampError {
        TimestampError::Overflow {
            value: value.trim().into(),
            fuzz: self.fuzz,
        }
    }

    pub fn offsets(&self) -> Result<(i64, i64), TimestampError> {
        Ok((self.start_secs()?, self.stop_secs()?))
    }
}

impl TryFrom<&Timestamp> for String {
    type Error = TimestampError;

    fn try_from(ts: &Timestamp) -> Result<Self, Self::Error> {
        let (inpoint, outpoint) = ts.offsets()?;
        Ok(concat_block(&ts.file, inpoint, outpoint))
    }
}

/// One `file`/`inpoint`/`outpoint` block, file name written verbatim.
pub fn concat_block(file: &str, inpoint: i64, outpoint: i64) -> String {
    format!("file {file}\ninpoint {inpoint}\noutpoint {outpoint}\n")
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let (inpoint, outpoint) = self
            .offsets()
            .map_err(<S::Error as ser::Error>::custom)?;
        let mut state = serializer.serialize_struct("Timestamp", 6)?;
        state.serialize_field("file", &self.file)?;
        state.serialize_field("start", &self.start)?;
        state.serialize_field("stop", &self.stop)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("inpoint", &inpoint)?;
        state.serialize_field("outpoint", &outpoint)?;
        state.end()
    }
}
