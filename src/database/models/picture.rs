use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{ContentItem, TimeLineType};
use crate::{content_common, impl_record};

/// Photo metadata. Image bytes live in external blob storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Picture {
    pub id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub author: String,
    pub picture_link: String,
    pub thumbnail_link: String,
    pub picture_taken: Option<DateTime<Utc>>,
    pub picture_width: i32,
    pub picture_height: i32,
    pub location: String,
    pub latitude: String,
    pub longitude: String,
    pub tags: String,
    pub created_date: DateTime<Utc>,
}

impl_record!(Picture, "pictures");

impl ContentItem for Picture {
    const ITEM_TYPE: TimeLineType = TimeLineType::Picture;

    content_common!();

    fn progeny_time(&self) -> DateTime<Utc> {
        self.picture_taken.unwrap_or(self.created_date)
    }

    fn summary(&self) -> String {
        match self.picture_taken {
            Some(taken) => format!("Photo taken {}", taken.format("%Y-%m-%d")),
            None => "New photo".to_string(),
        }
    }

    fn tags(&self) -> Option<&str> {
        Some(&self.tags)
    }

    fn set_created(&mut self, now: DateTime<Utc>) {
        self.created_date = now;
    }

    fn validate(&self) -> Result<(), String> {
        if self.picture_link.trim().is_empty() {
            return Err("picture_link is required".to_string());
        }
        Ok(())
    }
}
