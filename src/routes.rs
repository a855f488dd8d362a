//! Route composition for the gateway's HTTP and WebSocket surfaces

use std::convert::Infallible;

use log::info;
use warp::{Filter, Rejection, Reply};

use crate::config::ServerConfig;
use crate::constants::WS_PATH;
use crate::core::push::SharedPushService;
use crate::handlers::{push, websocket};

/// Build the full route tree: WebSocket endpoint, push API, status and
/// health routes, all sharing one push service.
pub fn routes(
    push_service: SharedPushService,
    config: ServerConfig,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let body_limit = config.max_message_size as u64;

    // WebSocket endpoint: ws://host:port/ws/{user_id}
    let ws_route = warp::path(WS_PATH)
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::ws())
        .and(with_push(push_service.clone()))
        .and(with_config(config))
        .map(
            |user_id: String, ws: warp::ws::Ws, push_service, config| {
                info!("New websocket connection for user {}", user_id);
                ws.on_upgrade(move |socket| {
                    websocket::handle_ws_client(socket, user_id, push_service, config)
                })
            },
        );

    let broadcast_route = warp::path!("push" / "broadcast")
        .and(warp::post())
        .and(json_body(body_limit))
        .and(with_push(push_service.clone()))
        .and_then(push::handle_broadcast);

    let unicast_route = warp::path!("push" / "user")
        .and(warp::post())
        .and(json_body(body_limit))
        .and(with_push(push_service.clone()))
        .and_then(push::handle_unicast);

    let multicast_route = warp::path!("push" / "users")
        .and(warp::post())
        .and(json_body(body_limit))
        .and(with_push(push_service.clone()))
        .and_then(push::handle_multicast);

    let status_route = warp::path!("status")
        .and(warp::get())
        .and(with_push(push_service.clone()))
        .and_then(push::handle_status);

    let user_status_route = warp::path!("status" / String)
        .and(warp::get())
        .and(with_push(push_service))
        .and_then(push::handle_user_status);

    let health_route = warp::path("health").map(|| "OK");

    ws_route
        .or(broadcast_route)
        .or(unicast_route)
        .or(multicast_route)
        .or(status_route)
        .or(user_status_route)
        .or(health_route)
}

// Helper filter to include the push service in a request
fn with_push(
    push_service: SharedPushService,
) -> impl Filter<Extract = (SharedPushService,), Error = Infallible> + Clone {
    warp::any().map(move || push_service.clone())
}

// Helper filter to include the server configuration in a request
fn with_config(
    config: ServerConfig,
) -> impl Filter<Extract = (ServerConfig,), Error = Infallible> + Clone {
    warp::any().map(move || config.clone())
}

// JSON body extraction with a size bound
fn json_body<T: serde::de::DeserializeOwned + Send>(
    limit: u64,
) -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(limit).and(warp::body::json())
}
