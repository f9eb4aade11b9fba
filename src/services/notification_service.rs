// src/services/notification_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::NotificationStore,
    models::notification::{Notification, NotificationList},
};

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, unread_only: bool) -> Result<NotificationList, AppError> {
        let notifications = self.store.list_notifications(unread_only).await?;
        let unread_count = notifications.iter().filter(|n| !n.read).count();

        Ok(NotificationList {
            unread_count,
            notifications,
        })
    }

    pub async fn unread_count(&self) -> Result<usize, AppError> {
        self.store.count_unread().await
    }

    // Única mudança permitida numa notificação
    pub async fn mark_as_read(&self, id: Uuid) -> Result<Notification, AppError> {
        self.store
            .mark_as_read(id)
            .await?
            .ok_or(AppError::NotificationNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::notification::{NotificationPriority, NotificationType};
    use chrono::{Duration, Utc};

    fn notification(minutes_ago: i64) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            kind: NotificationType::Reminder,
            priority: NotificationPriority::Low,
            title: "Lembrete".into(),
            message: "Conferir check-in".into(),
            read: false,
            scheduled_for: None,
            process_id: None,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn lists_newest_first_and_marks_as_read() {
        let store = Arc::new(MemoryStore::new());
        let old = notification(30);
        let new = notification(1);
        store.insert_notification(&old).await.unwrap();
        store.insert_notification(&new).await.unwrap();

        let svc = NotificationService::new(store);
        let list = svc.list(false).await.unwrap();
        assert_eq!(list.unread_count, 2);
        assert_eq!(list.notifications[0].id, new.id);

        let read = svc.mark_as_read(old.id).await.unwrap();
        assert!(read.read);

        assert_eq!(svc.unread_count().await.unwrap(), 1);

        let unread = svc.list(true).await.unwrap();
        assert_eq!(unread.notifications.len(), 1);
        assert_eq!(unread.notifications[0].id, new.id);
    }

    #[tokio::test]
    async fn unread_count_comes_from_the_store_counter() {
        let store = Arc::new(MemoryStore::new());
        let items: Vec<Notification> = (0..3).map(notification).collect();
        for n in &items {
            store.insert_notification(n).await.unwrap();
        }

        let svc = NotificationService::new(store.clone());
        assert_eq!(svc.unread_count().await.unwrap(), 3);

        svc.mark_as_read(items[1].id).await.unwrap();
        svc.mark_as_read(items[1].id).await.unwrap();
        assert_eq!(store.count_unread().await.unwrap(), 2);
        assert_eq!(svc.unread_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unknown_notification_is_not_found() {
        let svc = NotificationService::new(Arc::new(MemoryStore::new()));
        let err = svc.mark_as_read(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotificationNotFound(_)));
    }
}
