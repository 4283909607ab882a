//! Best-effort delivery helpers.
//!
//! Fan-out is fire-and-forget: a failed push is logged and never aborts the
//! use case that triggered it.

use crate::domain::{ConnectionId, MessagePusher, Notification};

pub(super) async fn push(
    pusher: &dyn MessagePusher,
    connection_id: &ConnectionId,
    notification: &Notification,
) {
    if let Err(e) = pusher.push_to(connection_id, notification).await {
        tracing::warn!(
            "Failed to push '{}' to '{}': {}",
            notification.event_name(),
            connection_id,
            e
        );
    }
}

pub(super) async fn broadcast(
    pusher: &dyn MessagePusher,
    targets: Vec<ConnectionId>,
    notification: &Notification,
) {
    if let Err(e) = pusher.broadcast(targets, notification).await {
        tracing::warn!(
            "Failed to broadcast '{}': {}",
            notification.event_name(),
            e
        );
    }
}
