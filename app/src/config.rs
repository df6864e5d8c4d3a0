use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::env;
use std::net::Ipv6Addr;

const DEFAULT_NODE_PORT: u16 = 8080;
const NODE_SCHEMA: &str = "http";

/// Address of a single node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeAddress {
    pub host: String,
    pub port: u16,
}

impl NodeAddress {
    pub fn new(host: &str, port: u16) -> Self {
        NodeAddress {
            host: host.to_owned(),
            port,
        }
    }

    /// Base url of the node, IPv6 literals are put into brackets
    pub fn url(&self) -> String {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("{}://[{}]:{}", NODE_SCHEMA, self.host, self.port)
        } else {
            format!("{}://{}:{}", NODE_SCHEMA, self.host, self.port)
        }
    }
}

/// Maps node ids to their address
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    nodes: BTreeMap<i32, NodeAddress>,
}

impl NodeTable {
    pub fn new() -> Self {
        NodeTable::default()
    }

    pub fn with_node(mut self, node_id: i32, address: NodeAddress) -> Self {
        self.nodes.insert(node_id, address);
        self
    }

    pub fn get(&self, node_id: i32) -> Option<&NodeAddress> {
        self.nodes.get(&node_id)
    }

    pub fn ids(&self) -> Vec<i32> {
        self.nodes.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Collects all `NODE<n>` and `NODE<n>_PORT` pairs
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut hosts: BTreeMap<i32, String> = BTreeMap::new();
        let mut ports: BTreeMap<i32, u16> = BTreeMap::new();

        for (key, value) in vars {
            let suffix = match key.strip_prefix("NODE") {
                Some(suffix) => suffix,
                None => continue,
            };
            if let Some(id) = suffix.strip_suffix("_PORT") {
                if let (Ok(id), Ok(port)) = (id.parse(), value.trim().parse()) {
                    ports.insert(id, port);
                }
            } else if let Ok(id) = suffix.parse() {
                hosts.insert(id, value.trim().to_owned());
            }
        }

        hosts.into_iter().fold(NodeTable::new(), |table, (id, host)| {
            let port = ports.get(&id).cloned().unwrap_or(DEFAULT_NODE_PORT);
            table.with_node(id, NodeAddress::new(&host, port))
        })
    }
}

/// Throttle and overlap windows of the data fetch
#[derive(Debug, Clone, Copy)]
pub struct FetchSettings {
    pub recency_window: chrono::Duration,
    pub overlap: chrono::Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            recency_window: chrono::Duration::minutes(120),
            overlap: chrono::Duration::hours(12),
        }
    }
}

pub struct Config {
    inner: RwLock<InnerConfig>,
}

struct InnerConfig {
    database_path: String,
    bind_addr: String,
    nodes: NodeTable,
    node_timeout_ms: u64,
    fetch_settings: FetchSettings,
}

impl Config {
    pub fn database_url(&self) -> String {
        let inner = self.inner.read();
        format!("sqlite://{}?mode=rwc", inner.database_path)
    }

    pub fn bind_addr(&self) -> String {
        let inner = self.inner.read();
        inner.bind_addr.clone()
    }

    pub fn nodes(&self) -> NodeTable {
        let inner = self.inner.read();
        inner.nodes.clone()
    }

    pub fn node_timeout_ms(&self) -> u64 {
        self.inner.read().node_timeout_ms
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        self.inner.read().fetch_settings
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{} has an invalid value: {}", key, value)),
        Err(_) => default,
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv::dotenv().ok();

    let database_path = env::var("DB_SQLITE").expect("DB_SQLITE must be set");
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_owned());
    let nodes = NodeTable::from_vars(env::vars());
    let node_timeout_ms = parse_var("NODE_TIMEOUT_MS", 10_000);
    let fetch_settings = FetchSettings {
        recency_window: chrono::Duration::minutes(parse_var("FETCH_WINDOW_MINUTES", 120)),
        overlap: chrono::Duration::hours(parse_var("FETCH_OVERLAP_HOURS", 12)),
    };

    if nodes.len() == 0 {
        tracing::warn!("No nodes configured, expected NODE<n> variables");
    }

    Config {
        inner: RwLock::new(InnerConfig {
            database_path,
            bind_addr,
            nodes,
            node_timeout_ms,
            fetch_settings,
        }),
    }
});
