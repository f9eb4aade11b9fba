// src/handlers/notifications.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::notification::{Notification, NotificationList, NotificationQuery, UnreadCount},
};

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notificações",
    params(NotificationQuery),
    responses(
        (status = 200, description = "Notificações, das mais recentes para as mais antigas", body = NotificationList)
    )
)]
pub async fn list_notifications(
    State(app_state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let list = app_state
        .notification_service
        .list(params.unread_only)
        .await?;
    Ok((StatusCode::OK, Json(list)))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    tag = "Notificações",
    responses(
        (status = 200, description = "Quantidade de notificações não lidas", body = UnreadCount)
    )
)]
pub async fn get_unread_count(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let unread_count = app_state.notification_service.unread_count().await?;
    Ok((StatusCode::OK, Json(UnreadCount { unread_count })))
}

#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    tag = "Notificações",
    params(("id" = Uuid, Path, description = "ID da notificação")),
    responses(
        (status = 200, description = "Notificação marcada como lida", body = Notification),
        (status = 404, description = "Notificação não encontrada")
    )
)]
pub async fn mark_as_read(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let notification = app_state.notification_service.mark_as_read(id).await?;
    Ok((StatusCode::OK, Json(notification)))
}
