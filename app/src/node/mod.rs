use crate::config::NodeTable;
use crate::error::NodeError;
use plantmonitor_core::{NodeLiveMessage, NodeMetaMessage, NodeReadingMessage};
use std::time::Duration;
use tracing::debug;

#[cfg(test)]
pub(crate) mod mock;

/// Talks to the root, `meta` and `data` endpoints of the configured nodes
pub struct NodeClient {
    cli: reqwest::Client,
    nodes: NodeTable,
}

impl NodeClient {
    pub fn new(nodes: NodeTable, timeout_ms: u64) -> Result<Self, NodeError> {
        let cli = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(NodeError::Connection)?;
        Ok(NodeClient { cli, nodes })
    }

    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    pub fn node_url(&self, node_id: i32) -> Result<String, NodeError> {
        self.nodes
            .get(node_id)
            .map(|address| address.url())
            .ok_or(NodeError::UnknownNode(node_id))
    }

    /// Current sensor state from the node's root endpoint
    #[tracing::instrument(skip(self))]
    pub async fn current(&self, node_id: i32) -> Result<NodeLiveMessage, NodeError> {
        let url = format!("{}/", self.node_url(node_id)?);
        debug!(url = url.as_str(), "Requesting live value");

        let resp = self.cli.get(&url).send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn meta(&self, node_id: i32) -> Result<NodeMetaMessage, NodeError> {
        let url = format!("{}/meta", self.node_url(node_id)?);
        debug!(url = url.as_str(), "Requesting node meta");

        let resp = self.cli.get(&url).send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }

    /// Requests readings, `start` is a unix timestamp
    #[tracing::instrument(skip(self))]
    pub async fn data(
        &self,
        node_id: i32,
        start: Option<i64>,
    ) -> Result<Vec<NodeReadingMessage>, NodeError> {
        let url = format!("{}/data", self.node_url(node_id)?);
        debug!(url = url.as_str(), "Requesting node data");

        let mut req = self.cli.get(&url);
        if let Some(start) = start {
            req = req.query(&[("start", start.to_string())]);
        }
        let resp = req.send().await?.error_for_status()?;
        Ok(resp.json().await?)
    }
}
