use plantmonitor_core::error::PayloadError;
use std::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DBError {
    #[error(transparent)]
    SQLError(#[from] sqlx::Error),
    #[error(transparent)]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("Did not find plant {1} of node {0}")]
    PlantNotFound(i32, i32),
    #[error("Did not find type {1} of node {0}")]
    TypeNotFound(i32, i32),
    #[error("Did not find plant: {0}")]
    UnknownPlant(i32),
}

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("No address configured for node {0}")]
    UnknownNode(i32),
    #[error("Connection failed: {0}")]
    Connection(#[source] reqwest::Error),
    #[error("Node responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("Invalid Payload: {0}")]
    Payload(std::string::String),
}

impl NodeError {
    /// Failures which leave the node unreachable from here
    pub fn is_unreachable(&self) -> bool {
        matches!(self, NodeError::UnknownNode(_) | NodeError::Connection(_))
    }
}

impl From<reqwest::Error> for NodeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            NodeError::Payload(err.to_string())
        } else if let Some(status) = err.status() {
            NodeError::Status(status)
        } else {
            NodeError::Connection(err)
        }
    }
}

impl From<PayloadError> for NodeError {
    fn from(err: PayloadError) -> Self {
        NodeError::Payload(err.to_string())
    }
}

#[derive(Debug, Error)]
#[error(transparent)]
pub enum ObserverError {
    User(Box<dyn error::Error + Send + Sync>),
    Internal(Box<dyn error::Error + Send + Sync>),
}

impl From<DBError> for ObserverError {
    fn from(err: DBError) -> Self {
        match err {
            DBError::UnknownPlant(_) => ObserverError::User(Box::from(err)),
            _ => ObserverError::Internal(Box::from(err)),
        }
    }
}

impl From<sqlx::Error> for ObserverError {
    fn from(err: sqlx::Error) -> Self {
        ObserverError::from(DBError::from(err))
    }
}

impl From<NodeError> for ObserverError {
    fn from(err: NodeError) -> Self {
        ObserverError::Internal(Box::from(err))
    }
}
