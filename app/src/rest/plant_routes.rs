use super::build_response;
use crate::observer::ConcurrentObserver;
use std::sync::Arc;
use warp::Filter;

pub fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    plant_series(observer.clone())
}

/// GET graph/:plant_id
///
/// Returns the `PlantSeries` of a plant, the x axis holds the timestamps
fn plant_series(
    observer: Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("graph" / i32))
        .and_then(
            |observer: Arc<ConcurrentObserver>, plant_id: i32| async move {
                let resp = observer.plant_series(plant_id).await;
                build_response(resp)
            },
        )
        .boxed()
}
