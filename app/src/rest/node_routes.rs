use super::{build_response, build_text_response};
use crate::observer::{ConcurrentObserver, LiveOutcome, MetaSyncOutcome};
use std::sync::Arc;
use warp::{Filter, Reply};

pub fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    sync_meta(observer.clone())
        .or(fetch(observer.clone()))
        .or(live(observer.clone()))
}

/// GET getmeta/:node_id
///
/// Stores the plants and measurement types a node announces
///
/// Returns the node's meta data and the insert counts,
/// or a plain connection message if the node can't be reached
fn sync_meta(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("getmeta" / i32))
        .and_then(
            |observer: Arc<ConcurrentObserver>, node_id: i32| async move {
                match observer.sync_meta(node_id).await {
                    Ok(MetaSyncOutcome::Synced(sync)) => build_response(Ok(sync)),
                    Ok(outcome) => Ok(outcome.to_string().into_response()),
                    Err(e) => build_response::<()>(Err(e)),
                }
            },
        )
        .boxed()
}

/// GET fetch/:node_id
///
/// Pulls new readings from a node
///
/// Returns the number of added datapoints as text, or why nothing was fetched
fn fetch(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("fetch" / i32))
        .and_then(
            |observer: Arc<ConcurrentObserver>, node_id: i32| async move {
                let resp = observer.fetch(node_id, chrono::Utc::now()).await;
                build_text_response(resp)
            },
        )
        .boxed()
}

/// GET live/:node_id
///
/// Returns the node's current moisture in percent,
/// or a plain connection message if the node can't be reached
fn live(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("live" / i32))
        .and_then(
            |observer: Arc<ConcurrentObserver>, node_id: i32| async move {
                match observer.live_moisture(node_id).await {
                    Ok(LiveOutcome::Measured(live)) => build_response(Ok(live)),
                    Ok(outcome) => Ok(outcome.to_string().into_response()),
                    Err(e) => build_response::<()>(Err(e)),
                }
            },
        )
        .boxed()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::FetchSettings;
    use crate::models::establish_memory_connection;
    use crate::node::mock::{reading, unreachable_table, MockNode};
    use crate::node::NodeClient;
    use crate::observer::CONNECTION_ERROR_MSG;

    async fn build_mocked_observer(node: &MockNode) -> Arc<ConcurrentObserver> {
        let db_conn = establish_memory_connection().await;
        let node_client = NodeClient::new(node.table(1), 1000).unwrap();
        ConcurrentObserver::new(db_conn, node_client, FetchSettings::default())
    }

    #[tokio::test]
    async fn test_rest_sync_meta() {
        // Prepare
        let node = MockNode::spawn();
        node.set_meta(&[(1, "Basil")], &[(1, "moisture")]);
        let observer = build_mocked_observer(&node).await;
        let routes = routes(&observer);

        // Execute
        let res = warp::test::request()
            .path("/getmeta/1")
            .reply(&routes)
            .await;

        // Validate
        assert_eq!(res.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(1, body["new_plants"]);
        assert_eq!("Basil", body["meta"]["plants"][0]["name"]);
        assert_eq!(1, body["stored_types"][0]["node_entity_id"]);
    }

    #[tokio::test]
    async fn test_rest_live() {
        let node = MockNode::spawn();
        node.set_relative(0.25);
        let observer = build_mocked_observer(&node).await;
        let routes = routes(&observer);

        let res = warp::test::request().path("/live/1").reply(&routes).await;

        assert_eq!(res.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(1, body["node_id"]);
        assert_eq!(25.0, body["moisture"]);

        let res = warp::test::request().path("/live/2").reply(&routes).await;
        assert_eq!(CONNECTION_ERROR_MSG, std::str::from_utf8(res.body()).unwrap());
    }

    #[tokio::test]
    async fn test_rest_fetch() {
        // Prepare
        let node = MockNode::spawn();
        node.set_meta(&[(1, "Basil")], &[(1, "moisture")]);
        node.set_readings(vec![
            reading(1, 1, 1, "2021-05-03T10:00:00"),
            reading(2, 1, 1, "2021-05-03T10:10:00"),
            reading(3, 1, 1, "2021-05-03T10:20:00"),
        ]);
        let observer = build_mocked_observer(&node).await;
        observer.sync_meta(1).await.unwrap();
        let routes = routes(&observer);

        // Execute
        let res = warp::test::request().path("/fetch/1").reply(&routes).await;

        // Validate
        assert_eq!(res.status(), 200);
        assert_eq!("3 datapoints added", std::str::from_utf8(res.body()).unwrap());
    }

    #[tokio::test]
    async fn test_rest_fetch_unreachable() {
        let db_conn = establish_memory_connection().await;
        let node_client = NodeClient::new(unreachable_table(1), 1000).unwrap();
        let observer = ConcurrentObserver::new(db_conn, node_client, FetchSettings::default());
        let routes = routes(&observer);

        for path in ["/fetch/1", "/getmeta/1", "/getmeta/7", "/live/1"] {
            let res = warp::test::request().path(path).reply(&routes).await;
            assert_eq!(res.status(), 200);
            assert_eq!(CONNECTION_ERROR_MSG, std::str::from_utf8(res.body()).unwrap());
        }
    }

    #[tokio::test]
    async fn test_rest_fetch_without_meta_is_internal_error() {
        let node = MockNode::spawn();
        node.set_readings(vec![reading(1, 1, 1, "2021-05-03T10:00:00")]);
        let observer = build_mocked_observer(&node).await;
        let routes = routes(&observer);

        let res = warp::test::request().path("/fetch/1").reply(&routes).await;

        assert_eq!(res.status(), 500);
    }
}
