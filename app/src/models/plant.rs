use chrono::NaiveDateTime;
use sqlx::{Executor, Sqlite};

use crate::error::DBError;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PlantDao {
    pub(crate) id: i32,
    pub(crate) node_id: i32,
    pub(crate) node_entity_id: i32,
    pub(crate) name: String,
    #[allow(dead_code)]
    pub(crate) created_at: NaiveDateTime,
}

impl PlantDao {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn node_id(&self) -> i32 {
        self.node_id
    }

    pub fn node_entity_id(&self) -> i32 {
        self.node_entity_id
    }

    pub fn name(&self) -> &String {
        &self.name
    }
}

pub async fn insert<'c, E>(
    conn: E,
    node_id: i32,
    node_entity_id: i32,
    name: &str,
) -> Result<PlantDao, DBError>
where
    E: Executor<'c, Database = Sqlite>,
{
    Ok(sql_stmnt!(
        PlantDao,
        "INSERT INTO plants (node_id, node_entity_id, name) VALUES (?, ?, ?) RETURNING *",
        node_id,
        node_entity_id,
        name
    )
    .fetch_one(conn)
    .await?)
}

pub async fn find_by_identity<'c, E>(
    conn: E,
    node_id: i32,
    node_entity_id: i32,
) -> Result<Option<PlantDao>, DBError>
where
    E: Executor<'c, Database = Sqlite>,
{
    Ok(sql_stmnt!(
        PlantDao,
        "SELECT * FROM plants WHERE node_id = ? AND node_entity_id = ?",
        node_id,
        node_entity_id
    )
    .fetch_optional(conn)
    .await?)
}

pub async fn get<'c, E>(conn: E, plant_id: i32) -> Result<Option<PlantDao>, DBError>
where
    E: Executor<'c, Database = Sqlite>,
{
    Ok(sql_stmnt!(PlantDao, "SELECT * FROM plants WHERE id = ?", plant_id)
        .fetch_optional(conn)
        .await?)
}

// READ plants
pub async fn read_for_node<'c, E>(conn: E, node_id: i32) -> Result<Vec<PlantDao>, DBError>
where
    E: Executor<'c, Database = Sqlite>,
{
    Ok(sql_stmnt!(
        PlantDao,
        "SELECT * FROM plants WHERE node_id = ? ORDER BY node_entity_id ASC",
        node_id
    )
    .fetch_all(conn)
    .await?)
}
