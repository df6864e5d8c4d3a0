use parking_lot::Mutex;
use plantmonitor_core::{NodeEntity, NodeLiveMessage, NodeMetaMessage, NodeReadingMessage};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use crate::config::{NodeAddress, NodeTable};

/// Local stand-in for a node, serving the root, `meta` and `data`
pub struct MockNode {
    pub addr: SocketAddr,
    live: Arc<Mutex<NodeLiveMessage>>,
    meta: Arc<Mutex<NodeMetaMessage>>,
    readings: Arc<Mutex<Vec<NodeReadingMessage>>>,
    requested_starts: Arc<Mutex<Vec<Option<String>>>>,
}

impl MockNode {
    pub fn spawn() -> Self {
        let live = Arc::new(Mutex::new(NodeLiveMessage { relative: 0.0 }));
        let meta = Arc::new(Mutex::new(NodeMetaMessage::default()));
        let readings = Arc::new(Mutex::new(Vec::new()));
        let requested_starts = Arc::new(Mutex::new(Vec::new()));

        let live_ref = live.clone();
        let live_route = warp::path::end()
            .and(warp::get())
            .map(move || warp::reply::json(&*live_ref.lock()));

        let meta_ref = meta.clone();
        let meta_route = warp::path!("meta")
            .and(warp::get())
            .map(move || warp::reply::json(&*meta_ref.lock()));

        let readings_ref = readings.clone();
        let starts_ref = requested_starts.clone();
        let data_route = warp::path!("data")
            .and(warp::get())
            .and(warp::query::<HashMap<String, String>>())
            .map(move |query: HashMap<String, String>| {
                starts_ref.lock().push(query.get("start").cloned());
                warp::reply::json(&*readings_ref.lock())
            });

        let (addr, server) =
            warp::serve(live_route.or(meta_route).or(data_route)).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        MockNode {
            addr,
            live,
            meta,
            readings,
            requested_starts,
        }
    }

    pub fn address(&self) -> NodeAddress {
        NodeAddress::new(&self.addr.ip().to_string(), self.addr.port())
    }

    pub fn table(&self, node_id: i32) -> NodeTable {
        NodeTable::new().with_node(node_id, self.address())
    }

    pub fn set_relative(&self, relative: f64) {
        *self.live.lock() = NodeLiveMessage { relative };
    }

    pub fn set_meta(&self, plants: &[(i32, &str)], types: &[(i32, &str)]) {
        *self.meta.lock() = NodeMetaMessage {
            plants: entities(plants),
            types: entities(types),
        };
    }

    pub fn set_readings(&self, readings: Vec<NodeReadingMessage>) {
        *self.readings.lock() = readings;
    }

    pub fn requested_starts(&self) -> Vec<Option<String>> {
        self.requested_starts.lock().clone()
    }
}

fn entities(list: &[(i32, &str)]) -> Vec<NodeEntity> {
    list.iter()
        .map(|(id, name)| NodeEntity {
            id: *id,
            name: name.to_string(),
        })
        .collect()
}

pub fn reading(id: i32, plant: i32, mm_type: i32, time: &str) -> NodeReadingMessage {
    NodeReadingMessage {
        id,
        plant,
        mm_type,
        value: 0.5,
        time: time.to_owned(),
    }
}

/// Address nobody listens on
pub fn unreachable_table(node_id: i32) -> NodeTable {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    NodeTable::new().with_node(node_id, NodeAddress::new("127.0.0.1", port))
}
