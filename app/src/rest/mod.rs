use crate::error::ObserverError;
use crate::observer::ConcurrentObserver;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Reply};

mod metric_routes;
mod node_routes;
mod plant_routes;

pub fn routes(
    observer: &Arc<ConcurrentObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    node_routes::routes(observer)
        .or(plant_routes::routes(observer))
        .or(metric_routes::routes(observer))
}

pub async fn dispatch_server(observer: Arc<ConcurrentObserver>, bind_addr: SocketAddr) {
    let routes = routes(&observer).with(warp::trace::request());

    info!(%bind_addr, "Starting webserver");
    warp::serve(routes).run(bind_addr).await;
}

fn build_response<T: serde::Serialize>(
    resp: Result<T, ObserverError>,
) -> Result<Response, warp::Rejection> {
    match resp {
        Ok(data) => Ok(warp::reply::json(&data).into_response()),
        Err(err) => Ok(build_error(err)),
    }
}

fn build_text_response<T: std::fmt::Display>(
    resp: Result<T, ObserverError>,
) -> Result<Response, warp::Rejection> {
    match resp {
        Ok(data) => Ok(data.to_string().into_response()),
        Err(err) => Ok(build_error(err)),
    }
}

fn build_error(err: ObserverError) -> Response {
    match err {
        ObserverError::User(err) => {
            warn!("{}", err);
            let dto = dto::ErrorResponseDto {
                error: format!("{}", err),
            };
            warp::reply::with_status(warp::reply::json(&dto), StatusCode::BAD_REQUEST)
                .into_response()
        }
        ObserverError::Internal(err) => {
            error!("{}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub mod dto {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorResponseDto {
        pub error: String,
    }
}
