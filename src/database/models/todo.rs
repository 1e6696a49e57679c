use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{ContentItem, TimeLineType};
use crate::{content_common, impl_record};

/// 0 not started, 1 in progress, 2 awaiting, 3 completed, 4 cancelled
pub const TODO_STATUS_MAX: i32 = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoItem {
    pub id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub author: String,
    pub title: String,
    pub description: String,
    pub status: i32,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub location: String,
    pub context: String,
    pub tags: String,
    pub created_time: DateTime<Utc>,
}

impl_record!(TodoItem, "todo_items");

impl ContentItem for TodoItem {
    const ITEM_TYPE: TimeLineType = TimeLineType::Todo;

    content_common!();

    fn progeny_time(&self) -> DateTime<Utc> {
        self.due_date.or(self.start_date).unwrap_or(self.created_time)
    }

    fn summary(&self) -> String {
        self.title.clone()
    }

    fn tags(&self) -> Option<&str> {
        Some(&self.tags)
    }

    fn set_created(&mut self, now: DateTime<Utc>) {
        self.created_time = now;
    }

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if !(0..=TODO_STATUS_MAX).contains(&self.status) {
            return Err(format!("status must be between 0 and {}", TODO_STATUS_MAX));
        }
        Ok(())
    }
}
