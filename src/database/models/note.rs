use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{ContentItem, TimeLineType};
use crate::{content_common, impl_record};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    pub id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub author: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: String,
    pub created_date: DateTime<Utc>,
}

impl_record!(Note, "notes");

impl ContentItem for Note {
    const ITEM_TYPE: TimeLineType = TimeLineType::Note;

    content_common!();

    fn progeny_time(&self) -> DateTime<Utc> {
        self.created_date
    }

    fn summary(&self) -> String {
        self.title.clone()
    }

    fn tags(&self) -> Option<&str> {
        Some(&self.tags)
    }

    fn set_created(&mut self, now: DateTime<Utc>) {
        if self.created_date == DateTime::<Utc>::default() {
            self.created_date = now;
        }
    }
}
