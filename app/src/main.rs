mod config;
mod error;
mod logging;
mod models;
mod node;
mod observer;
mod rest;

use config::CONFIG;
use std::net::SocketAddr;
use tracing::{error, info};

#[tokio::main]
pub async fn main() {
    logging::init();

    let bind_addr: SocketAddr = match CONFIG.bind_addr().parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid BIND_ADDR {}: {}", CONFIG.bind_addr(), e);
            std::process::exit(1);
        }
    };
    let db_conn = match models::establish_db_connection(&CONFIG.database_url()).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("Cannot open database: {}", e);
            std::process::exit(1);
        }
    };
    let node_client = match node::NodeClient::new(CONFIG.nodes(), CONFIG.node_timeout_ms()) {
        Ok(client) => client,
        Err(e) => {
            error!("Cannot build node client: {}", e);
            std::process::exit(1);
        }
    };
    info!(nodes = ?CONFIG.nodes().ids(), "Loaded node table");

    let observer = observer::ConcurrentObserver::new(db_conn, node_client, CONFIG.fetch_settings());

    rest::dispatch_server(observer, bind_addr).await;
}
