use crate::error::DBError;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

macro_rules! sql_stmnt {
    ($ret:ident, $stmt:expr) => {
        sqlx::query_as::<_, $ret>($stmt)
    };
    ($stmt:expr) => {
        sqlx::query($stmt)
    };
    ($ret:ident, $stmt:expr, $($bind:expr),*) => {
        sqlx::query_as::<_, $ret>($stmt)$(.bind($bind))*
    };
    ($stmt:expr, $($bind:expr),*) => {
        sqlx::query($stmt)$(.bind($bind))*
    };
}

pub async fn establish_db_connection(database_url: &str) -> Result<SqlitePool, DBError> {
    let pool = SqlitePoolOptions::new().connect(database_url).await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Single connection pool, as every connection would open its own database
#[cfg(test)]
pub async fn establish_memory_connection() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    migrate(&pool).await.unwrap();
    pool
}

pub async fn migrate(conn: &SqlitePool) -> Result<(), DBError> {
    sqlx::migrate!("./migrations").run(conn).await?;
    Ok(())
}

pub async fn check_schema(conn: &SqlitePool) -> Result<(), DBError> {
    sql_stmnt!(CountRecord, "SELECT count(*) as count FROM points")
        .fetch_one(conn)
        .await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
pub(crate) struct CountRecord {
    pub count: Option<i64>,
}

impl CountRecord {
    pub fn count(self) -> i64 {
        self.count.unwrap_or(0)
    }
}

pub mod mm_type;
pub mod plant;
pub mod point;

#[cfg(test)]
mod test;
