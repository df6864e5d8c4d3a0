use super::{ConcurrentObserver, CONNECTION_ERROR_MSG};
use crate::error::{DBError, NodeError, ObserverError};
use crate::models::{
    mm_type, plant,
    point::{self, NewPoint},
};

use chrono::{DateTime, Duration, Utc};
use plantmonitor_core::NodeReadingMessage;
use sqlx::{Sqlite, Transaction};
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, PartialEq)]
pub enum FetchOutcome {
    Added(usize),
    /// The node's newest point is younger than the recency window
    Throttled {
        last_point: DateTime<Utc>,
        age: Duration,
    },
    InProgress,
    Unreachable,
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchOutcome::Added(count) => write!(f, "{} datapoints added", count),
            FetchOutcome::Throttled { last_point, age } => write!(
                f,
                "Skipped fetch, last datapoint from {} is only {} minutes old",
                last_point.format("%Y-%m-%d %H:%M:%S"),
                age.num_minutes().max(0)
            ),
            FetchOutcome::InProgress => write!(f, "Fetch already running for this node"),
            FetchOutcome::Unreachable => write!(f, "{}", CONNECTION_ERROR_MSG),
        }
    }
}

/// Some(age) if the checkpoint is too recent to fetch again
///
/// A checkpoint ahead of `now` stems from a node with a fast clock and never throttles.
pub fn throttle_age(
    checkpoint: DateTime<Utc>,
    now: DateTime<Utc>,
    window: Duration,
) -> Option<Duration> {
    let age = now - checkpoint;
    if age >= Duration::zero() && age < window {
        Some(age)
    } else {
        None
    }
}

/// Unix start of the requested range, overlapping the newest known point
pub fn overlap_start(global_latest: Option<DateTime<Utc>>, overlap: Duration) -> Option<i64> {
    global_latest.map(|latest| (latest - overlap).timestamp())
}

impl ConcurrentObserver {
    /// Fetches and stores new readings of a node, unless it was fetched recently
    ///
    /// The checkpoint is the newest point of this node only, while the start of the
    /// requested range is derived from the newest point over all nodes.
    /// All readings of one fetch are committed together, a reading referencing an
    /// unknown plant or type fails the whole fetch.
    #[tracing::instrument]
    pub async fn fetch(
        &self,
        node_id: i32,
        now: DateTime<Utc>,
    ) -> Result<FetchOutcome, ObserverError> {
        let _reservation = match self.fetch_guard.reserve(node_id) {
            Some(reservation) => reservation,
            None => {
                info!(node_id, "Fetch already running");
                return Ok(FetchOutcome::InProgress);
            }
        };

        if let Some(checkpoint) = point::latest_for_node(&self.db_conn, node_id).await? {
            let last_point = checkpoint.time();
            if let Some(age) = throttle_age(last_point, now, self.settings.recency_window) {
                info!(node_id, age_minutes = age.num_minutes(), "Fetch throttled");
                return Ok(FetchOutcome::Throttled { last_point, age });
            }
            if last_point > now {
                warn!(node_id, %last_point, "Newest point lies in the future, node clock is ahead");
            }
        }

        let global_latest = point::latest(&self.db_conn).await?.map(|p| p.time());
        let start = overlap_start(global_latest, self.settings.overlap);
        debug!(node_id, ?start, "Requesting readings");

        let readings = match self.node_client.data(node_id, start).await {
            Ok(readings) => readings,
            Err(e) if e.is_unreachable() => {
                warn!(node_id, "{}", e);
                return Ok(FetchOutcome::Unreachable);
            }
            Err(e) => return Err(e.into()),
        };

        let mut tx = self.db_conn.begin().await?;
        let mut counter = 0;
        for reading in readings.iter() {
            if store_reading(&mut tx, node_id, reading).await? {
                counter += 1;
            }
        }
        tx.commit().await?;

        info!(
            node_id,
            received = readings.len(),
            added = counter,
            "Stored readings"
        );
        Ok(FetchOutcome::Added(counter))
    }
}

/// false if the reading is already stored
async fn store_reading(
    tx: &mut Transaction<'_, Sqlite>,
    node_id: i32,
    reading: &NodeReadingMessage,
) -> Result<bool, ObserverError> {
    if point::find_by_identity(&mut **tx, node_id, reading.id)
        .await?
        .is_some()
    {
        return Ok(false);
    }

    let plant = plant::find_by_identity(&mut **tx, node_id, reading.plant)
        .await?
        .ok_or(DBError::PlantNotFound(node_id, reading.plant))?;
    let mm_type = mm_type::find_by_identity(&mut **tx, node_id, reading.mm_type)
        .await?
        .ok_or(DBError::TypeNotFound(node_id, reading.mm_type))?;
    let time = reading.timestamp().map_err(NodeError::from)?;

    let dao = point::insert(
        &mut **tx,
        &NewPoint {
            node_id,
            node_entity_id: reading.id,
            plant_id: plant.id(),
            type_id: mm_type.id(),
            value: reading.value,
            time,
        },
    )
    .await?;
    debug!(
        point_id = dao.id(),
        node_id = dao.node_id(),
        node_entity_id = dao.node_entity_id(),
        plant_id = dao.plant_id(),
        type_id = dao.type_id(),
        "Staged point"
    );
    Ok(true)
}
