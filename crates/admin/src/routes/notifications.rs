//! Notification feed route handlers.
//!
//! Read state is local to this process; marking read persists nothing.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use medina_core::OrderId;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::notifications::Notification;
use crate::state::AppState;

/// The bell payload.
#[derive(Debug, Serialize)]
pub struct NotificationsView {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

/// Current notifications, newest first.
#[instrument(skip(state, _admin))]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Json<NotificationsView> {
    let center = state.notifications();
    Json(NotificationsView {
        notifications: center.list(),
        unread_count: center.unread_count(),
    })
}

/// Mark one notification read.
#[instrument(skip(state, _admin), fields(order_id = %id))]
pub async fn mark_read(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<NotificationsView>> {
    if !state.notifications().mark_read(id) {
        return Err(AppError::NotFound(format!("No notification for order {id}")));
    }

    let center = state.notifications();
    Ok(Json(NotificationsView {
        notifications: center.list(),
        unread_count: center.unread_count(),
    }))
}

/// Mark every notification read.
#[instrument(skip(state, _admin))]
pub async fn mark_all_read(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Json<NotificationsView> {
    let center = state.notifications();
    center.mark_all_read();
    Json(NotificationsView {
        notifications: center.list(),
        unread_count: center.unread_count(),
    })
}
