use std::error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PayloadError {
    InvalidTimestamp(std::string::String),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PayloadError::InvalidTimestamp(raw) => write!(f, "Invalid timestamp: {}", raw),
        }
    }
}

impl error::Error for PayloadError {}
