// src/models/sale.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "company", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Company {
    Exclusive,
    Giogio,
    Direta,
}

impl Company {
    pub fn label(&self) -> &'static str {
        match self {
            Company::Exclusive => "Exclusive",
            Company::Giogio => "Giogio",
            Company::Direta => "Direta",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sale_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Pending,   // Aguardando confirmação
    Confirmed, // Reserva confirmada
    Completed, // Estadia concluída
    Cancelled, // Cancelada
}

impl SaleStatus {
    pub const ALL: [SaleStatus; 4] = [
        SaleStatus::Pending,
        SaleStatus::Confirmed,
        SaleStatus::Completed,
        SaleStatus::Cancelled,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sale_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SaleKind {
    Rental,    // Locação de temporada
    HouseSale, // Venda de imóvel
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub company: Company,
    pub status: SaleStatus,
    pub kind: SaleKind,

    // Imóvel
    pub house_id: Option<Uuid>,
    #[schema(example = "Casa Pedra Azul")]
    pub house_name: Option<String>,

    // Cliente (tags demográficas)
    pub client_name: Option<String>,
    #[schema(example = "feminino")]
    pub client_gender: Option<String>,
    #[schema(example = "São Paulo - SP")]
    pub client_location: Option<String>,
    #[schema(example = "instagram")]
    pub origin: Option<String>,

    // Datas
    #[schema(value_type = String, format = Date, example = "2024-01-10")]
    pub check_in: Option<NaiveDate>,
    #[schema(value_type = String, format = Date, example = "2024-01-15")]
    pub check_out: Option<NaiveDate>,

    // Valores
    #[schema(example = "12000.00")]
    pub net_value: Decimal,
    #[schema(example = "1500.00")]
    pub concierge_value: Decimal,
    #[schema(example = "300.00")]
    pub additional_sales: Decimal,
    #[schema(example = "450.00")]
    pub supplier_sales: Decimal,
    #[schema(example = "600.00")]
    pub housekeeper_cost: Decimal,
    #[schema(example = "800.00")]
    pub sales_commission: Decimal,

    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Receita bruta: líquido + concierge + vendas adicionais + comissão de fornecedores.
    pub fn gross_revenue(&self) -> Decimal {
        self.net_value + self.concierge_value + self.additional_sales + self.supplier_sales
    }

    pub fn total_costs(&self) -> Decimal {
        self.housekeeper_cost + self.sales_commission
    }

    pub fn profit(&self) -> Decimal {
        self.gross_revenue() - self.total_costs()
    }
}

/// Maior valor que cabe em `NUMERIC(14, 2)`.
pub fn max_money() -> Decimal {
    Decimal::new(99_999_999_999_999, 2)
}

// Mesmo domínio das colunas NUMERIC(14, 2): não negativo, até 2 casas decimais
pub fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("O valor não pode ser negativo".into());
        return Err(err);
    }
    if *value > max_money() {
        let mut err = ValidationError::new("money_range");
        err.message = Some("O valor excede o máximo permitido (999999999999.99)".into());
        return Err(err);
    }
    if value.round_dp(2) != *value {
        let mut err = ValidationError::new("money_scale");
        err.message = Some("O valor aceita no máximo 2 casas decimais".into());
        return Err(err);
    }
    Ok(())
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub company: Company,
    #[serde(default = "default_status")]
    pub status: SaleStatus,
    #[serde(default = "default_kind")]
    pub kind: SaleKind,

    pub house_id: Option<Uuid>,
    #[validate(length(max = 200, message = "Nome do imóvel muito longo"))]
    pub house_name: Option<String>,

    #[validate(length(max = 200, message = "Nome do cliente muito longo"))]
    pub client_name: Option<String>,
    pub client_gender: Option<String>,
    pub client_location: Option<String>,
    pub origin: Option<String>,

    #[schema(value_type = Option<String>, format = Date, example = "2024-01-10")]
    pub check_in: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date, example = "2024-01-15")]
    pub check_out: Option<NaiveDate>,

    #[serde(default)]
    #[validate(custom(function = "validate_money"))]
    pub net_value: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_money"))]
    pub concierge_value: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_money"))]
    pub additional_sales: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_money"))]
    pub supplier_sales: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_money"))]
    pub housekeeper_cost: Decimal,
    #[serde(default)]
    #[validate(custom(function = "validate_money"))]
    pub sales_commission: Decimal,

    #[validate(length(max = 1000, message = "Observação muito longa"))]
    pub notes: Option<String>,
}

fn default_status() -> SaleStatus {
    SaleStatus::Pending
}

fn default_kind() -> SaleKind {
    SaleKind::Rental
}

impl NewSale {
    /// Monta a venda completa (id e data de criação gerados aqui).
    pub fn into_sale(self) -> Sale {
        Sale {
            id: Uuid::new_v4(),
            company: self.company,
            status: self.status,
            kind: self.kind,
            house_id: self.house_id,
            house_name: self.house_name,
            client_name: self.client_name,
            client_gender: self.client_gender,
            client_location: self.client_location,
            origin: self.origin,
            check_in: self.check_in,
            check_out: self.check_out,
            net_value: self.net_value,
            concierge_value: self.concierge_value,
            additional_sales: self.additional_sales,
            supplier_sales: self.supplier_sales,
            housekeeper_cost: self.housekeeper_cost,
            sales_commission: self.sales_commission,
            notes: self.notes,
            created_at: Utc::now(),
        }
    }
}

// Só status e observações podem mudar depois de criada
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleStatusRequest {
    pub status: SaleStatus,

    #[validate(length(max = 1000, message = "Observação muito longa"))]
    pub notes: Option<String>,
}
