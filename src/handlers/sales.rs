// src/handlers/sales.rs

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
    models::{
        financial::SalesFilter,
        sale::{NewSale, Sale, UpdateSaleStatusRequest},
    },
};

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Vendas",
    params(SalesFilter),
    responses(
        (status = 200, description = "Vendas que batem com o filtro", body = Vec<Sale>),
        (status = 400, description = "Filtro inválido")
    )
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    Query(filter): Query<SalesFilter>,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sales_service.list_sales(&filter).await?;
    Ok((StatusCode::OK, Json(sales)))
}

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Vendas",
    request_body = NewSale,
    responses(
        (status = 201, description = "Venda registrada", body = Sale),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    Json(payload): Json<NewSale>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sales_service.create_sale(payload).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

// PATCH /api/sales/{id}/status
#[utoipa::path(
    patch,
    path = "/api/sales/{id}/status",
    tag = "Vendas",
    request_body = UpdateSaleStatusRequest,
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Status atualizado", body = Sale),
        (status = 404, description = "Venda não encontrada")
    )
)]
pub async fn update_sale_status(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSaleStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sales_service.update_status(id, payload).await?;
    Ok((StatusCode::OK, Json(sale)))
}
