use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{ContentItem, TimeLineType};
use crate::{content_common, impl_record};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Friend {
    pub id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub author: String,
    pub name: String,
    pub description: String,
    pub friend_type: i32,
    pub friend_since: Option<DateTime<Utc>>,
    pub context: String,
    pub notes: String,
    pub picture_link: String,
    pub tags: String,
    pub friend_added_date: DateTime<Utc>,
}

impl_record!(Friend, "friends");

impl ContentItem for Friend {
    const ITEM_TYPE: TimeLineType = TimeLineType::Friend;

    content_common!();

    fn progeny_time(&self) -> DateTime<Utc> {
        self.friend_since.unwrap_or(self.friend_added_date)
    }

    fn summary(&self) -> String {
        self.name.clone()
    }

    fn tags(&self) -> Option<&str> {
        Some(&self.tags)
    }

    fn set_created(&mut self, now: DateTime<Utc>) {
        self.friend_added_date = now;
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        Ok(())
    }
}
