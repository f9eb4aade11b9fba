pub mod aggregation;
pub mod sales_service;
pub mod financial_service;
pub mod goals_service;
pub mod process_service;
pub mod notification_service;

#[cfg(test)]
pub(crate) mod test_support;
