// src/handlers/processes.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::process::{
        AdvanceStepRequest, AdvanceStepResult, ConciergeProcess, CreateProcessRequest,
        ProcessDashboard,
    },
};

#[utoipa::path(
    post,
    path = "/api/processes",
    tag = "Concierge",
    request_body = CreateProcessRequest,
    responses(
        (status = 201, description = "Processo aberto na primeira etapa", body = ConciergeProcess),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_process(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProcessRequest>,
) -> Result<impl IntoResponse, AppError> {
    let process = app_state.process_service.create_process(payload).await?;
    Ok((StatusCode::CREATED, Json(process)))
}

#[utoipa::path(
    get,
    path = "/api/processes",
    tag = "Concierge",
    responses(
        (status = 200, description = "Processos de concierge", body = Vec<ConciergeProcess>)
    )
)]
pub async fn list_processes(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let processes = app_state.process_service.list_processes().await?;
    Ok((StatusCode::OK, Json(processes)))
}

#[utoipa::path(
    get,
    path = "/api/processes/{id}",
    tag = "Concierge",
    params(("id" = Uuid, Path, description = "ID do processo")),
    responses(
        (status = 200, description = "Processo", body = ConciergeProcess),
        (status = 404, description = "Processo não encontrado")
    )
)]
pub async fn get_process(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let process = app_state.process_service.get_process(id).await?;
    Ok((StatusCode::OK, Json(process)))
}

#[utoipa::path(
    post,
    path = "/api/processes/{id}/advance",
    tag = "Concierge",
    request_body = AdvanceStepRequest,
    params(("id" = Uuid, Path, description = "ID do processo")),
    responses(
        (status = 200, description = "Etapa concluída e notificação gerada", body = AdvanceStepResult),
        (status = 404, description = "Processo não encontrado")
    )
)]
pub async fn advance_step(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdvanceStepRequest>,
) -> Result<impl IntoResponse, AppError> {
    let result = app_state.process_service.advance_step(id, payload).await?;
    Ok((StatusCode::OK, Json(result)))
}

#[utoipa::path(
    get,
    path = "/api/processes/dashboard",
    tag = "Concierge",
    responses(
        (status = 200, description = "Processos por etapa e taxa de conclusão", body = ProcessDashboard)
    )
)]
pub async fn get_process_dashboard(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let dashboard = app_state.process_service.dashboard().await?;
    Ok((StatusCode::OK, Json(dashboard)))
}
