// src/services/test_support.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::sale::{Company, Sale, SaleKind, SaleStatus};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("data de teste inválida")
}

/// Venda confirmada de locação, só com valor líquido.
pub fn sale(check_in: &str, net_value: Decimal) -> Sale {
    Sale {
        id: Uuid::new_v4(),
        company: Company::Exclusive,
        status: SaleStatus::Confirmed,
        kind: SaleKind::Rental,
        house_id: None,
        house_name: None,
        client_name: Some("Cliente Teste".to_string()),
        client_gender: None,
        client_location: None,
        origin: None,
        check_in: Some(date(check_in)),
        check_out: None,
        net_value,
        concierge_value: Decimal::ZERO,
        additional_sales: Decimal::ZERO,
        supplier_sales: Decimal::ZERO,
        housekeeper_cost: Decimal::ZERO,
        sales_commission: Decimal::ZERO,
        notes: None,
        created_at: Utc::now(),
    }
}
