use crate::config::FetchSettings;
use crate::error::ObserverError;
use crate::models::{self, plant, point};
use crate::node::NodeClient;

use sqlx::SqlitePool;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

pub mod fetch;
mod guard;
pub mod live;
pub mod meta;


pub use live::LiveOutcome;
pub use meta::MetaSyncOutcome;

pub const CONNECTION_ERROR_MSG: &str =
    "ConnectionError when requesting node. Maybe node_id is wrong?";

/// Time series of a single plant, ready for charting
#[derive(Debug, serde::Serialize)]
pub struct PlantSeries {
    pub plant: String,
    pub x: Vec<chrono::DateTime<chrono::Utc>>,
    pub y: Vec<f64>,
}

pub struct ConcurrentObserver {
    pub(crate) db_conn: SqlitePool,
    pub(crate) node_client: NodeClient,
    settings: FetchSettings,
    fetch_guard: guard::FetchGuard,
}

impl Debug for ConcurrentObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentObserver").finish()
    }
}

impl ConcurrentObserver {
    pub fn new(db_conn: SqlitePool, node_client: NodeClient, settings: FetchSettings) -> Arc<Self> {
        let observer = ConcurrentObserver {
            db_conn,
            node_client,
            settings,
            fetch_guard: guard::FetchGuard::new(),
        };
        Arc::new(observer)
    }

    pub fn settings(&self) -> FetchSettings {
        self.settings
    }

    pub fn node_ids(&self) -> Vec<i32> {
        self.node_client.nodes().ids()
    }

    pub async fn check_db(&self) -> String {
        match models::check_schema(&self.db_conn).await {
            Ok(_) => "healthy".to_owned(),
            Err(e) => format!("{}", e),
        }
    }

    /// Number of stored points per configured node
    pub async fn point_counts(&self) -> Result<BTreeMap<i32, i64>, ObserverError> {
        let mut counts = BTreeMap::new();
        for node_id in self.node_ids() {
            counts.insert(node_id, point::count_for_node(&self.db_conn, node_id).await?);
        }
        Ok(counts)
    }

    /// All points of a plant, ordered by time
    #[tracing::instrument]
    pub async fn plant_series(&self, plant_id: i32) -> Result<PlantSeries, ObserverError> {
        let plant = plant::get(&self.db_conn, plant_id)
            .await?
            .ok_or(crate::error::DBError::UnknownPlant(plant_id))?;
        let points = point::get_for_plant(&self.db_conn, plant_id).await?;

        let (x, y): (Vec<_>, Vec<_>) = points.iter().map(|p| (p.time(), p.value())).unzip();
        Ok(PlantSeries {
            plant: plant.name().clone(),
            x,
            y,
        })
    }
}
