use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{ContentItem, TimeLineType};
use crate::{content_common, impl_record};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanbanBoard {
    pub id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub author: String,
    pub title: String,
    pub description: String,
    pub columns: Vec<String>,
    pub tags: String,
    pub created_time: DateTime<Utc>,
}

impl_record!(KanbanBoard, "kanban_boards");

impl ContentItem for KanbanBoard {
    const ITEM_TYPE: TimeLineType = TimeLineType::KanbanBoard;

    content_common!();

    fn progeny_time(&self) -> DateTime<Utc> {
        self.created_time
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
        Ok(())
    }
}

/// Card on a board. Visibility follows the board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KanbanItem {
    pub id: i32,
    pub kanban_board_id: i32,
    pub progeny_id: i32,
    pub todo_item_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub column_index: i32,
    pub row_index: i32,
    pub author: String,
    pub created_time: DateTime<Utc>,
    pub modified_time: DateTime<Utc>,
}

impl_record!(KanbanItem, "kanban_items");
