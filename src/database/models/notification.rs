use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::timeline::TimeLineType;
use crate::database::record::Record;

/// Persisted notification polled by the web client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebNotification {
    pub id: i32,
    pub to: String,
    pub from: String,
    pub title: String,
    pub message: String,
    pub link: String,
    pub icon: String,
    pub item_type: Option<TimeLineType>,
    pub item_id: String,
    pub is_read: bool,
    pub created: DateTime<Utc>,
}

impl Record for WebNotification {
    const TABLE: &'static str = "web_notifications";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

/// Copy of every push message sent to a user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobileNotification {
    pub id: i32,
    pub user_id: String,
    pub progeny_id: i32,
    pub title: String,
    pub message: String,
    pub icon_link: String,
    pub item_type: Option<TimeLineType>,
    pub item_id: String,
    pub language: String,
    pub read: bool,
    pub time: DateTime<Utc>,
}

impl Record for MobileNotification {
    const TABLE: &'static str = "mobile_notifications";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushDevice {
    pub id: i32,
    pub user_id: String,
    pub device_id: String,
    pub platform: String,
    pub push_channel: String,
    pub registered: DateTime<Utc>,
}

impl Record for PushDevice {
    const TABLE: &'static str = "push_devices";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}
