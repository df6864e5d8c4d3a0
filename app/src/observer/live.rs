use super::{ConcurrentObserver, CONNECTION_ERROR_MSG};
use crate::error::ObserverError;

use std::fmt;
use tracing::warn;

#[derive(Debug, PartialEq, serde::Serialize)]
pub struct LiveMoisture {
    pub node_id: i32,
    /// Percent, 0 to 100
    pub moisture: f64,
}

#[derive(Debug, PartialEq)]
pub enum LiveOutcome {
    Measured(LiveMoisture),
    Unreachable,
}

impl fmt::Display for LiveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LiveOutcome::Measured(live) => write!(f, "{}% moisture", live.moisture),
            LiveOutcome::Unreachable => write!(f, "{}", CONNECTION_ERROR_MSG),
        }
    }
}

impl ConcurrentObserver {
    /// Reads the current moisture straight from the node, nothing is stored
    #[tracing::instrument]
    pub async fn live_moisture(&self, node_id: i32) -> Result<LiveOutcome, ObserverError> {
        match self.node_client.current(node_id).await {
            Ok(live) => Ok(LiveOutcome::Measured(LiveMoisture {
                node_id,
                moisture: live.relative * 100.0,
            })),
            Err(e) if e.is_unreachable() => {
                warn!(node_id, "{}", e);
                Ok(LiveOutcome::Unreachable)
            }
            Err(e) => Err(e.into()),
        }
    }
}
