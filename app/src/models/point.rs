use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{Executor, Sqlite};

use super::CountRecord;
use crate::error::DBError;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PointDao {
    pub(crate) id: i32,
    pub(crate) node_id: i32,
    pub(crate) node_entity_id: i32,
    pub(crate) plant_id: i32,
    pub(crate) type_id: i32,
    pub(crate) value: f64,
    pub(crate) time: NaiveDateTime,
    #[allow(dead_code)]
    pub(crate) created_at: NaiveDateTime,
}

impl PointDao {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn node_id(&self) -> i32 {
        self.node_id
    }

    pub fn node_entity_id(&self) -> i32 {
        self.node_entity_id
    }

    pub fn plant_id(&self) -> i32 {
        self.plant_id
    }

    pub fn type_id(&self) -> i32 {
        self.type_id
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn time(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_naive_utc_and_offset(self.time, Utc)
    }
}

/// A resolved reading, ready to be stored
#[derive(Debug, Clone)]
pub struct NewPoint {
    pub node_id: i32,
    pub node_entity_id: i32,
    pub plant_id: i32,
    pub type_id: i32,
    pub value: f64,
    pub time: DateTime<Utc>,
}

pub async fn insert<'c, E>(conn: E, point: &NewPoint) -> Result<PointDao, DBError>
where
    E: Executor<'c, Database = Sqlite>,
{
    Ok(sql_stmnt!(
        PointDao,
        r#"INSERT INTO points (node_id, node_entity_id, plant_id, type_id, value, time)
            VALUES (?, ?, ?, ?, ?, ?) RETURNING *"#,
        point.node_id,
        point.node_entity_id,
        point.plant_id,
        point.type_id,
        point.value,
        point.time.naive_utc()
    )
    .fetch_one(conn)
    .await?)
}

pub async fn find_by_identity<'c, E>(
    conn: E,
    node_id: i32,
    node_entity_id: i32,
) -> Result<Option<PointDao>, DBError>
where
    E: Executor<'c, Database = Sqlite>,
{
    Ok(sql_stmnt!(
        PointDao,
        "SELECT * FROM points WHERE node_id = ? AND node_entity_id = ?",
        node_id,
        node_entity_id
    )
    .fetch_optional(conn)
    .await?)
}

/// Newest point of a single node
pub async fn latest_for_node<'c, E>(conn: E, node_id: i32) -> Result<Option<PointDao>, DBError>
where
    E: Executor<'c, Database = Sqlite>,
{
    Ok(sql_stmnt!(
        PointDao,
        "SELECT * FROM points WHERE node_id = ? ORDER BY time DESC LIMIT 1",
        node_id
    )
    .fetch_optional(conn)
    .await?)
}

/// Newest point over all nodes
pub async fn latest<'c, E>(conn: E) -> Result<Option<PointDao>, DBError>
where
    E: Executor<'c, Database = Sqlite>,
{
    Ok(
        sql_stmnt!(PointDao, "SELECT * FROM points ORDER BY time DESC LIMIT 1")
            .fetch_optional(conn)
            .await?,
    )
}

// READ points
pub async fn get_for_plant<'c, E>(conn: E, plant_id: i32) -> Result<Vec<PointDao>, DBError>
where
    E: Executor<'c, Database = Sqlite>,
{
    Ok(sql_stmnt!(
        PointDao,
        "SELECT * FROM points WHERE plant_id = ? ORDER BY time ASC",
        plant_id
    )
    .fetch_all(conn)
    .await?)
}

pub async fn count_for_node<'c, E>(conn: E, node_id: i32) -> Result<i64, DBError>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows = sql_stmnt!(
        CountRecord,
        "SELECT count(*) as count FROM points WHERE node_id = ?",
        node_id
    )
    .fetch_one(conn)
    .await?;
    Ok(rows.count())
}
