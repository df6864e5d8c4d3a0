use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PayloadError;
use crate::timestamp::parse_timestamp;

/// A plant or measurement type as announced by a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEntity {
    pub id: i32,
    pub name: String,
}

/// Body of a node's `meta` endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetaMessage {
    pub plants: Vec<NodeEntity>,
    pub types: Vec<NodeEntity>,
}

/// One entry of a node's `data` endpoint
///
/// `plant` and `type` reference the node local ids from the `meta` endpoint,
/// `time` is kept as sent and parsed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeReadingMessage {
    pub id: i32,
    pub plant: i32,
    #[serde(rename = "type")]
    pub mm_type: i32,
    pub value: f64,
    pub time: String,
}

/// Body of a node's root endpoint, the current sensor state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLiveMessage {
    /// Moisture as a fraction between 0 and 1
    pub relative: f64,
}

impl NodeReadingMessage {
    pub fn timestamp(&self) -> Result<DateTime<Utc>, PayloadError> {
        parse_timestamp(&self.time)
    }
}
