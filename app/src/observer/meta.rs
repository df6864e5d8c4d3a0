use super::{ConcurrentObserver, CONNECTION_ERROR_MSG};
use crate::error::{DBError, ObserverError};
use crate::models::{mm_type, plant};

use plantmonitor_core::{NodeEntity, NodeMetaMessage};
use sqlx::{Sqlite, Transaction};
use std::fmt;
use tracing::{info, warn};

/// A plant or type as stored, with its database id
#[derive(Debug, PartialEq, serde::Serialize)]
pub struct StoredEntity {
    pub id: i32,
    pub node_id: i32,
    pub node_entity_id: i32,
    pub name: String,
}

impl From<plant::PlantDao> for StoredEntity {
    fn from(dao: plant::PlantDao) -> Self {
        StoredEntity {
            id: dao.id(),
            node_id: dao.node_id(),
            node_entity_id: dao.node_entity_id(),
            name: dao.name().clone(),
        }
    }
}

impl From<mm_type::MMTypeDao> for StoredEntity {
    fn from(dao: mm_type::MMTypeDao) -> Self {
        StoredEntity {
            id: dao.id(),
            node_id: dao.node_id(),
            node_entity_id: dao.node_entity_id(),
            name: dao.name().clone(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct MetaSync {
    pub node_id: i32,
    pub meta: NodeMetaMessage,
    pub new_plants: usize,
    pub new_types: usize,
    /// Everything stored for the node after the sync
    pub stored_plants: Vec<StoredEntity>,
    pub stored_types: Vec<StoredEntity>,
}

#[derive(Debug)]
pub enum MetaSyncOutcome {
    Synced(MetaSync),
    Unreachable,
}

impl fmt::Display for MetaSyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MetaSyncOutcome::Synced(sync) => write!(
                f,
                "{} plants and {} types added",
                sync.new_plants, sync.new_types
            ),
            MetaSyncOutcome::Unreachable => write!(f, "{}", CONNECTION_ERROR_MSG),
        }
    }
}

#[derive(Clone, Copy)]
enum EntityKind {
    Plant,
    MMType,
}

impl ConcurrentObserver {
    /// Inserts all plants and types of the node, which aren't known yet
    #[tracing::instrument]
    pub async fn sync_meta(&self, node_id: i32) -> Result<MetaSyncOutcome, ObserverError> {
        let meta = match self.node_client.meta(node_id).await {
            Ok(meta) => meta,
            Err(e) if e.is_unreachable() => {
                warn!(node_id, "{}", e);
                return Ok(MetaSyncOutcome::Unreachable);
            }
            Err(e) => return Err(e.into()),
        };

        let mut tx = self.db_conn.begin().await?;
        let new_plants = insert_missing(&mut tx, node_id, &meta.plants, EntityKind::Plant).await?;
        let new_types = insert_missing(&mut tx, node_id, &meta.types, EntityKind::MMType).await?;
        let stored_plants = plant::read_for_node(&mut *tx, node_id).await?;
        let stored_types = mm_type::read_for_node(&mut *tx, node_id).await?;
        tx.commit().await?;

        info!(node_id, new_plants, new_types, "Synced node meta");
        Ok(MetaSyncOutcome::Synced(MetaSync {
            node_id,
            meta,
            new_plants,
            new_types,
            stored_plants: stored_plants.into_iter().map(StoredEntity::from).collect(),
            stored_types: stored_types.into_iter().map(StoredEntity::from).collect(),
        }))
    }
}

async fn insert_missing(
    tx: &mut Transaction<'_, Sqlite>,
    node_id: i32,
    entities: &[NodeEntity],
    kind: EntityKind,
) -> Result<usize, DBError> {
    let mut inserted = 0;
    for entity in entities {
        let exists = match kind {
            EntityKind::Plant => plant::find_by_identity(&mut **tx, node_id, entity.id)
                .await?
                .is_some(),
            EntityKind::MMType => mm_type::find_by_identity(&mut **tx, node_id, entity.id)
                .await?
                .is_some(),
        };
        if exists {
            continue;
        }

        match kind {
            EntityKind::Plant => {
                plant::insert(&mut **tx, node_id, entity.id, &entity.name).await?;
            }
            EntityKind::MMType => {
                mm_type::insert(&mut **tx, node_id, entity.id, &entity.name).await?;
            }
        }
        inserted += 1;
    }
    Ok(inserted)
}
