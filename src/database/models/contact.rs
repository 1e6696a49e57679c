use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{ContentItem, TimeLineType};
use crate::{content_common, impl_record};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub author: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: String,
    pub notes: String,
    pub context: String,
    pub picture_link: String,
    pub tags: String,
    pub active: bool,
    pub date_added: DateTime<Utc>,
}

impl_record!(Contact, "contacts");

impl ContentItem for Contact {
    const ITEM_TYPE: TimeLineType = TimeLineType::Contact;

    content_common!();

    fn progeny_time(&self) -> DateTime<Utc> {
        self.date_added
    }

    fn summary(&self) -> String {
        if self.display_name.is_empty() {
            format!("{} {}", self.first_name, self.last_name).trim().to_string()
        } else {
            self.display_name.clone()
        }
    }

    fn tags(&self) -> Option<&str> {
        Some(&self.tags)
    }

    fn set_created(&mut self, now: DateTime<Utc>) {
        self.date_added = now;
    }
}
