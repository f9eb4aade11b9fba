// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

// Um único tipo de erro para toda a aplicação.
// Os handlers só precisam devolver `Result<_, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Filtro de consulta inconsistente (ex: data inicial depois da final)
    #[error("Filtro inválido: {0}")]
    InvalidFilter(String),

    // Não há dados cadastrados para o período pedido (ex: meta anual ausente)
    #[error("Sem dados: {0}")]
    NoData(String),

    #[error("Venda não encontrada: {0}")]
    SaleNotFound(Uuid),

    #[error("Processo não encontrado: {0}")]
    ProcessNotFound(Uuid),

    #[error("Notificação não encontrada: {0}")]
    NotificationNotFound(Uuid),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            AppError::NoData(_)
            | AppError::SaleNotFound(_)
            | AppError::ProcessNotFound(_)
            | AppError::NotificationNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match self {
            // Devolve os detalhes da validação campo a campo
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            ref e @ (AppError::InvalidFilter(_)
            | AppError::NoData(_)
            | AppError::SaleNotFound(_)
            | AppError::ProcessNotFound(_)
            | AppError::NotificationNotFound(_)) => e.to_string(),

            // Erros de infraestrutura: loga o detalhe, devolve mensagem genérica
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
