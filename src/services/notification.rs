use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::database::models::{MobileNotification, Progeny, PushDevice, UserAccess, UserGroup, WebNotification};
use crate::database::{DatabaseError, RecordStore, Repository};
use crate::filter::FilterData;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::paging::{page_of, Numbered, Page};

/// Recipient resolution plus the per-user notification inbox
#[derive(Clone)]
pub struct NotificationService {
    user_access: Repository<UserAccess>,
    user_groups: Repository<UserGroup>,
    web: Repository<WebNotification>,
    mobile: Repository<MobileNotification>,
    devices: Repository<PushDevice>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            user_access: Repository::new(store.clone()),
            user_groups: Repository::new(store.clone()),
            web: Repository::new(store.clone()),
            mobile: Repository::new(store.clone()),
            devices: Repository::new(store),
        }
    }

    /// Users whose level admits an item at `item_level`, minus the actor
    pub async fn audience(&self, progeny: &Progeny, item_level: i32, actor: &str) -> Result<Vec<String>, DatabaseError> {
        let mut recipients: Vec<String> = progeny.admins.clone();
        recipients.extend(
            self.user_access
                .select_progeny(progeny.id)
                .await?
                .into_iter()
                .filter(|a| a.access_level <= item_level)
                .map(|a| a.user_id),
        );
        recipients.extend(
            self.user_groups
                .select_progeny(progeny.id)
                .await?
                .into_iter()
                .filter(|g| g.access_level <= item_level)
                .flat_map(|g| g.members),
        );

        let actor = actor.trim().to_lowercase();
        let mut recipients: Vec<String> = recipients
            .into_iter()
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty() && *r != actor)
            .collect();
        recipients.sort();
        recipients.dedup();
        Ok(recipients)
    }

    pub async fn web_inbox(
        &self,
        email: &str,
        page_index: i32,
        page_size: usize,
        unread_only: bool,
    ) -> ServiceResult<Page<Numbered<WebNotification>>> {
        let mut filter = json!({ "to": email });
        if unread_only {
            filter["is_read"] = json!(false);
        }
        let items: Vec<Numbered<WebNotification>> = self
            .web
            .select_any(FilterData::new().where_clause(filter).order("created asc, id asc"))
            .await?
            .into_iter()
            .map(Numbered::from)
            .collect();
        Ok(page_of(items, page_index, page_size, true, |n, i| n.number = i))
    }

    async fn owned_web(&self, id: i32, email: &str) -> ServiceResult<WebNotification> {
        // Someone else's notification reads as missing
        self.web
            .select_id(id)
            .await?
            .filter(|n| n.to.eq_ignore_ascii_case(email))
            .ok_or_else(|| ServiceError::not_found(format!("Notification {} not found", id)))
    }

    pub async fn set_read(&self, id: i32, email: &str, is_read: bool) -> ServiceResult<WebNotification> {
        let mut notification = self.owned_web(id, email).await?;
        notification.is_read = is_read;
        self.web
            .update(&notification)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Notification {} not found", id)))
    }

    pub async fn delete_web(&self, id: i32, email: &str) -> ServiceResult<WebNotification> {
        self.owned_web(id, email).await?;
        self.web
            .delete(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Notification {} not found", id)))
    }

    /// Latest push messages first
    pub async fn mobile_inbox(&self, email: &str, limit: usize) -> ServiceResult<Vec<MobileNotification>> {
        let limit = i32::try_from(limit).unwrap_or(i32::MAX);
        Ok(self
            .mobile
            .select_any(
                FilterData::new()
                    .where_clause(json!({ "user_id": email }))
                    .order("time desc, id desc")
                    .limit(limit.max(1)),
            )
            .await?)
    }

    /// Insert or refresh the device row for `(user, device_id)`
    pub async fn register_device(&self, email: &str, mut device: PushDevice) -> ServiceResult<PushDevice> {
        if device.device_id.trim().is_empty() {
            return Err(ServiceError::validation("device_id is required"));
        }
        device.user_id = email.to_string();
        device.registered = Utc::now();

        let existing = self
            .devices
            .select_one(FilterData::new().where_clause(json!({ "user_id": email, "device_id": device.device_id })))
            .await?;
        match existing {
            Some(existing) => {
                device.id = existing.id;
                self.devices
                    .update(&device)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Device registration vanished"))
            }
            None => Ok(self.devices.insert(&device).await?),
        }
    }

    pub async fn unregister_device(&self, email: &str, device_id: &str) -> ServiceResult<u64> {
        let removed = self
            .devices
            .delete_where(FilterData::new().where_clause(json!({ "user_id": email, "device_id": device_id })))
            .await?;
        if removed == 0 {
            return Err(ServiceError::not_found(format!("Device {} not registered", device_id)));
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryRecordStore;

    #[tokio::test]
    async fn audience_respects_levels_and_skips_actor() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let access = Repository::<UserAccess>::new(store.clone());
        for (user, level) in [("gran@x.com", 1), ("public@x.com", 5)] {
            access
                .insert(&UserAccess { progeny_id: 1, user_id: user.into(), access_level: level, ..Default::default() })
                .await
                .unwrap();
        }
        Repository::<UserGroup>::new(store.clone())
            .insert(&UserGroup { progeny_id: 1, access_level: 2, members: vec!["Aunt@x.com".into()], ..Default::default() })
            .await
            .unwrap();

        let progeny = Progeny { id: 1, admins: vec!["mom@x.com".into(), "dad@x.com".into()], ..Default::default() };
        let service = NotificationService::new(store);

        let recipients = service.audience(&progeny, 2, "mom@x.com").await.unwrap();
        assert_eq!(recipients, vec!["aunt@x.com", "dad@x.com", "gran@x.com"]);

        let recipients = service.audience(&progeny, 0, "dad@x.com").await.unwrap();
        assert_eq!(recipients, vec!["mom@x.com"]);
    }
}
