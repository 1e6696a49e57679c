use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{ContentItem, TimeLineType};
use crate::{content_common, impl_record};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    pub id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub author: String,
    pub video_link: String,
    pub thumbnail_link: String,
    pub video_type: i32,
    pub video_taken: Option<DateTime<Utc>>,
    /// Seconds
    pub duration: Option<i32>,
    pub location: String,
    pub tags: String,
    pub created_date: DateTime<Utc>,
}

impl_record!(Video, "videos");

impl ContentItem for Video {
    const ITEM_TYPE: TimeLineType = TimeLineType::Video;

    content_common!();

    fn progeny_time(&self) -> DateTime<Utc> {
        self.video_taken.unwrap_or(self.created_date)
    }

    fn summary(&self) -> String {
        match self.video_taken {
            Some(taken) => format!("Video taken {}", taken.format("%Y-%m-%d")),
            None => "New video".to_string(),
        }
    }

    fn tags(&self) -> Option<&str> {
        Some(&self.tags)
    }

    fn set_created(&mut self, now: DateTime<Utc>) {
        self.created_date = now;
    }

    fn validate(&self) -> Result<(), String> {
        if self.video_link.trim().is_empty() {
            return Err("video_link is required".to_string());
        }
        if matches!(self.duration, Some(d) if d < 0) {
            return Err("duration cannot be negative".to_string());
        }
        Ok(())
    }
}
