use super::build_response;
use crate::observer::ConcurrentObserver;
use std::sync::Arc;
use warp::Filter;

pub fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    health(observer.clone())
}

fn health(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::path!("api" / "health"))
        .and_then(|observer: Arc<ConcurrentObserver>| async move {
            let settings = observer.settings();
            let ret = dto::HealthyDto {
                healthy: true,
                database_state: observer.check_db().await,
                nodes: observer.node_ids(),
                point_counts: observer.point_counts().await.unwrap_or_default(),
                fetch_window_minutes: settings.recency_window.num_minutes(),
                fetch_overlap_hours: settings.overlap.num_hours(),
            };
            build_response(Ok(ret))
        })
        .boxed()
}

mod dto {
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Serialize)]
    pub struct HealthyDto {
        pub healthy: bool,
        pub database_state: String,
        pub nodes: Vec<i32>,
        pub point_counts: BTreeMap<i32, i64>,
        pub fetch_window_minutes: i64,
        pub fetch_overlap_hours: i64,
    }
}
