use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{ContentItem, TimeLineType};
use crate::{content_common, impl_record};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyItem {
    pub id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub author: String,
    pub word: String,
    pub sounds_like: String,
    pub description: String,
    pub language: String,
    pub date: Option<DateTime<Utc>>,
    pub date_added: DateTime<Utc>,
}

impl_record!(VocabularyItem, "vocabulary");

impl ContentItem for VocabularyItem {
    const ITEM_TYPE: TimeLineType = TimeLineType::Vocabulary;

    content_common!();

    fn progeny_time(&self) -> DateTime<Utc> {
        self.date.unwrap_or(self.date_added)
    }

    fn summary(&self) -> String {
        self.word.clone()
    }

    fn set_created(&mut self, now: DateTime<Utc>) {
        self.date_added = now;
    }

    fn validate(&self) -> Result<(), String> {
        if self.word.trim().is_empty() {
            return Err("word is required".to_string());
        }
        Ok(())
    }
}
