pub mod store;
pub use store::{GoalStore, NotificationStore, ProcessStore, SalesStore};
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod goals_repo;
pub use goals_repo::GoalsRepository;
pub mod process_repo;
pub use process_repo::ProcessRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;
pub mod memory;
pub use memory::MemoryStore;
