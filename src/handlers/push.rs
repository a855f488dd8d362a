//! HTTP push API
//! Lets the application layer drive the delivery engine from outside the
//! process: broadcast, unicast, multicast and read-only status queries.

use std::convert::Infallible;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use warp::http::StatusCode;

use crate::core::push::SharedPushService;
use crate::metrics::PushStats;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnicastRequest {
    pub user_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MulticastRequest {
    pub user_ids: Vec<String>,
    pub message: String,
}

/// Push endpoints reply 202 with this body: the message was accepted for
/// submission, nothing is promised about delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedResponse {
    pub accepted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub active_connections: usize,
    pub stats: PushStats,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatusResponse {
    pub user_id: String,
    pub online: bool,
}

fn accepted() -> impl warp::Reply {
    warp::reply::with_status(
        warp::reply::json(&AcceptedResponse { accepted: true }),
        StatusCode::ACCEPTED,
    )
}

// POST /push/broadcast
pub async fn handle_broadcast(
    req: BroadcastRequest,
    push: SharedPushService,
) -> Result<impl warp::Reply, Infallible> {
    debug!("Push API broadcast request");
    push.broadcast(&req.message).await;
    Ok(accepted())
}

// POST /push/user
pub async fn handle_unicast(
    req: UnicastRequest,
    push: SharedPushService,
) -> Result<impl warp::Reply, Infallible> {
    debug!("Push API unicast request for user {}", req.user_id);
    push.send_to_user(&req.user_id, &req.message).await;
    Ok(accepted())
}

// POST /push/users
pub async fn handle_multicast(
    req: MulticastRequest,
    push: SharedPushService,
) -> Result<impl warp::Reply, Infallible> {
    debug!("Push API multicast request for {} users", req.user_ids.len());
    push.send_to_users(&req.user_ids, &req.message).await;
    Ok(accepted())
}

// GET /status
pub async fn handle_status(push: SharedPushService) -> Result<impl warp::Reply, Infallible> {
    let response = StatusResponse {
        active_connections: push.active_count().await,
        stats: push.observer().stats().await,
        timestamp: Utc::now(),
    };
    Ok(warp::reply::json(&response))
}

// GET /status/{user_id}
pub async fn handle_user_status(
    user_id: String,
    push: SharedPushService,
) -> Result<impl warp::Reply, Infallible> {
    let online = push.is_user_online(&user_id).await;
    Ok(warp::reply::json(&UserStatusResponse { user_id, online }))
}
