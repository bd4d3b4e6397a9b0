//! Errors raised at the JSON and date-text boundaries of the model.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug)]
pub enum CodecError {
    /// Payload is not valid JSON or does not match the expected shape.
    Json(serde_json::Error),
    /// Roster payload parsed but carried no members.
    EmptyRoster,
    /// Date text is not a `YYYY-MM-DD` calendar date.
    InvalidDate(String),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "{err}"),
            Self::EmptyRoster => write!(f, "roster has no family members"),
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::EmptyRoster | Self::InvalidDate(_) => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
