use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{ContentItem, TimeLineType};
use crate::{content_common, impl_record};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarItem {
    pub id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub author: String,
    pub title: String,
    pub notes: String,
    pub location: String,
    pub context: String,
    pub all_day: bool,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl_record!(CalendarItem, "calendar_items");

impl ContentItem for CalendarItem {
    const ITEM_TYPE: TimeLineType = TimeLineType::Calendar;

    content_common!();

    fn progeny_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    fn summary(&self) -> String {
        format!("{} ({})", self.title, self.start_time.format("%Y-%m-%d %H:%M"))
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.end_time < self.start_time {
            return Err("end_time must not be before start_time".to_string());
        }
        Ok(())
    }
}
