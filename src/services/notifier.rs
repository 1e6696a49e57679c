use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::NotificationConfig;
use crate::database::models::{MobileNotification, PushDevice, TimeLineItem, UserInfo, WebNotification};
use crate::database::{DatabaseError, RecordStore, Repository};
use crate::filter::FilterData;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Push gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Push gateway returned status {0}")]
    Gateway(u16),
}

/// Mobile push side channel
#[async_trait]
pub trait PushNotifier: Send + Sync {
    async fn progeny_update_notification(
        &self,
        title: &str,
        message: &str,
        item: &TimeLineItem,
        icon_url: &str,
        recipients: &[String],
    ) -> Result<(), NotificationError>;
}

/// Persisted notifications polled by the web client
#[async_trait]
pub trait WebNotifier: Send + Sync {
    async fn send_item_notification(
        &self,
        item: &TimeLineItem,
        actor: &UserInfo,
        title: &str,
        recipients: &[String],
    ) -> Result<(), NotificationError>;
}

/// Records a `MobileNotification` per recipient, then asks the push gateway to
/// deliver to the recipients' registered devices. Without a gateway URL only
/// the records are written.
pub struct GatewayPushNotifier {
    mobile: Repository<MobileNotification>,
    devices: Repository<PushDevice>,
    client: reqwest::Client,
    gateway_url: Option<String>,
    gateway_key: Option<String>,
}

impl GatewayPushNotifier {
    pub fn new(store: Arc<dyn RecordStore>, config: &NotificationConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            mobile: Repository::new(store.clone()),
            devices: Repository::new(store),
            client,
            gateway_url: config.push_gateway_url.clone(),
            gateway_key: config.push_gateway_key.clone(),
        }
    }
}

#[async_trait]
impl PushNotifier for GatewayPushNotifier {
    async fn progeny_update_notification(
        &self,
        title: &str,
        message: &str,
        item: &TimeLineItem,
        icon_url: &str,
        recipients: &[String],
    ) -> Result<(), NotificationError> {
        let now = Utc::now();
        for recipient in recipients {
            self.mobile
                .insert(&MobileNotification {
                    user_id: recipient.clone(),
                    progeny_id: item.progeny_id,
                    title: title.to_string(),
                    message: message.to_string(),
                    icon_link: icon_url.to_string(),
                    item_type: Some(item.item_type),
                    item_id: item.item_id.clone(),
                    language: "en".to_string(),
                    read: false,
                    time: now,
                    ..Default::default()
                })
                .await?;
        }

        let Some(url) = &self.gateway_url else {
            tracing::debug!("No push gateway configured, stored {} mobile notifications", recipients.len());
            return Ok(());
        };

        let devices = self
            .devices
            .select_any(FilterData::new().where_clause(json!({ "user_id": { "$in": recipients } })))
            .await?;
        if devices.is_empty() {
            return Ok(());
        }

        let payload = json!({
            "title": title,
            "message": message,
            "icon": icon_url,
            "tags": recipients.iter().map(|r| format!("userid:{}", r)).collect::<Vec<_>>(),
            "channels": devices.iter().map(|d| json!({ "platform": d.platform, "channel": d.push_channel })).collect::<Vec<_>>(),
            "data": {
                "progeny_id": item.progeny_id,
                "item_type": item.item_type,
                "item_id": item.item_id,
            }
        });

        let mut request = self.client.post(url).json(&payload);
        if let Some(key) = &self.gateway_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(NotificationError::Gateway(response.status().as_u16()));
        }
        tracing::info!("Push sent to {} devices for {} {}", devices.len(), item.item_type, item.item_id);
        Ok(())
    }
}

pub struct StoreWebNotifier {
    repo: Repository<WebNotification>,
    web_base_url: String,
}

impl StoreWebNotifier {
    pub fn new(store: Arc<dyn RecordStore>, config: &NotificationConfig) -> Self {
        Self {
            repo: Repository::new(store),
            web_base_url: config.web_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl WebNotifier for StoreWebNotifier {
    async fn send_item_notification(
        &self,
        item: &TimeLineItem,
        actor: &UserInfo,
        title: &str,
        recipients: &[String],
    ) -> Result<(), NotificationError> {
        let now = Utc::now();
        let link = format!("{}/progeny/{}/{}/{}", self.web_base_url, item.progeny_id, item.item_type, item.item_id);
        for recipient in recipients {
            self.repo
                .insert(&WebNotification {
                    to: recipient.clone(),
                    from: actor.display_name(),
                    title: title.to_string(),
                    message: format!("{} by {}", item.item_type.label(), actor.display_name()),
                    link: link.clone(),
                    icon: actor.profile_picture.clone(),
                    item_type: Some(item.item_type),
                    item_id: item.item_id.clone(),
                    is_read: false,
                    created: now,
                    ..Default::default()
                })
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::TimeLineType;
    use crate::database::MemoryRecordStore;

    fn config() -> NotificationConfig {
        NotificationConfig {
            push_gateway_url: None,
            push_gateway_key: None,
            icon_url: "https://example.com/icon.png".into(),
            web_base_url: "https://web.example.com/".into(),
            detach_async_observers: false,
        }
    }

    fn item() -> TimeLineItem {
        TimeLineItem {
            progeny_id: 1,
            item_id: "7".into(),
            item_type: TimeLineType::Note,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn push_without_gateway_only_records() {
        let store = Arc::new(MemoryRecordStore::new());
        let notifier = GatewayPushNotifier::new(store.clone(), &config());
        notifier
            .progeny_update_notification("t", "m", &item(), "icon", &["a@x.com".into(), "b@x.com".into()])
            .await
            .unwrap();
        assert_eq!(store.count("mobile_notifications").await, 2);
    }

    #[tokio::test]
    async fn web_notifications_link_to_the_item() {
        let store = Arc::new(MemoryRecordStore::new());
        let notifier = StoreWebNotifier::new(store.clone(), &config());
        notifier
            .send_item_notification(&item(), &UserInfo::anonymous("mom@x.com"), "Note added", &["a@x.com".into()])
            .await
            .unwrap();
        let rows: Vec<WebNotification> = Repository::new(store).select_any(FilterData::new()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].link, "https://web.example.com/progeny/1/note/7");
        assert_eq!(rows[0].to, "a@x.com");
    }
}
