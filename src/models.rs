pub mod sale;
pub mod financial;
pub mod goals;
pub mod process;
pub mod notification;
