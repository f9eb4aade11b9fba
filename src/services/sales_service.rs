// src/services/sales_service.rs

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::SalesStore,
    models::{
        financial::SalesFilter,
        sale::{NewSale, Sale, UpdateSaleStatusRequest},
    },
    services::aggregation::validate_filter,
};

#[derive(Clone)]
pub struct SalesService {
    store: Arc<dyn SalesStore>,
}

impl SalesService {
    pub fn new(store: Arc<dyn SalesStore>) -> Self {
        Self { store }
    }

    pub async fn list_sales(&self, filter: &SalesFilter) -> Result<Vec<Sale>, AppError> {
        validate_filter(filter)?;
        self.store.list_sales(filter).await
    }

    pub async fn create_sale(&self, input: NewSale) -> Result<Sale, AppError> {
        input.validate()?;

        if let (Some(check_in), Some(check_out)) = (input.check_in, input.check_out) {
            if check_out < check_in {
                return Err(AppError::InvalidFilter(
                    "check-out anterior ao check-in".to_string(),
                ));
            }
        }

        let sale = input.into_sale();
        self.store.insert_sale(&sale).await?;

        tracing::info!("Venda {} registrada ({:?})", sale.id, sale.company);
        Ok(sale)
    }

    /// Depois de criada, a venda só muda de status e observações.
    pub async fn update_status(
        &self,
        id: Uuid,
        input: UpdateSaleStatusRequest,
    ) -> Result<Sale, AppError> {
        input.validate()?;

        self.store
            .update_sale_status(id, input.status, input.notes.as_deref())
            .await?
            .ok_or(AppError::SaleNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::sale::{Company, SaleKind, SaleStatus};
    use crate::services::test_support::date;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn new_sale() -> NewSale {
        NewSale {
            company: Company::Direta,
            status: SaleStatus::Pending,
            kind: SaleKind::Rental,
            house_id: None,
            house_name: Some("Casa da Praia".into()),
            client_name: Some("João".into()),
            client_gender: None,
            client_location: None,
            origin: None,
            check_in: Some(date("2024-05-01")),
            check_out: Some(date("2024-05-05")),
            net_value: dec!(5000),
            concierge_value: dec!(0),
            additional_sales: dec!(0),
            supplier_sales: dec!(0),
            housekeeper_cost: dec!(0),
            sales_commission: dec!(0),
            notes: None,
        }
    }

    #[tokio::test]
    async fn creates_and_lists_sales() {
        let service = SalesService::new(Arc::new(MemoryStore::new()));
        let created = service.create_sale(new_sale()).await.unwrap();

        let all = service.list_sales(&SalesFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, created.id);
    }

    #[tokio::test]
    async fn rejects_negative_values() {
        let service = SalesService::new(Arc::new(MemoryStore::new()));
        let mut input = new_sale();
        input.net_value = dec!(-1);

        let err = service.create_sale(input).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn rejects_amounts_outside_the_money_column() {
        let service = SalesService::new(Arc::new(MemoryStore::new()));

        let mut too_big = new_sale();
        too_big.net_value = Decimal::MAX;
        too_big.concierge_value = dec!(1);
        let err = service.create_sale(too_big).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let mut too_precise = new_sale();
        too_precise.supplier_sales = dec!(10.005);
        let err = service.create_sale(too_precise).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        // Nada foi gravado, então os relatórios continuam somando sem estourar
        let all = service.list_sales(&SalesFilter::default()).await.unwrap();
        assert!(all.is_empty());

        let mut at_limit = new_sale();
        at_limit.net_value = dec!(999999999999.99);
        assert!(service.create_sale(at_limit).await.is_ok());
    }

    #[tokio::test]
    async fn only_status_and_notes_change() {
        let service = SalesService::new(Arc::new(MemoryStore::new()));
        let created = service.create_sale(new_sale()).await.unwrap();

        let updated = service
            .update_status(
                created.id,
                UpdateSaleStatusRequest {
                    status: SaleStatus::Completed,
                    notes: Some("Estadia sem ocorrências".into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, SaleStatus::Completed);
        assert_eq!(updated.notes.as_deref(), Some("Estadia sem ocorrências"));
        assert_eq!(updated.net_value, created.net_value);
    }

    #[tokio::test]
    async fn unknown_sale_is_not_found() {
        let service = SalesService::new(Arc::new(MemoryStore::new()));
        let err = service
            .update_status(
                Uuid::new_v4(),
                UpdateSaleStatusRequest {
                    status: SaleStatus::Cancelled,
                    notes: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SaleNotFound(_)));
    }
}
