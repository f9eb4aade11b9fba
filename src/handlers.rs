pub mod sales;
pub mod financial;
pub mod goals;
pub mod processes;
pub mod notifications;
