use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{ContentItem, TimeLineType};
use crate::{content_common, impl_record};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sleep {
    pub id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub author: String,
    pub sleep_start: DateTime<Utc>,
    pub sleep_end: DateTime<Utc>,
    pub sleep_rating: i32,
    pub sleep_notes: String,
    pub created_date: DateTime<Utc>,
}

impl Sleep {
    pub fn duration_minutes(&self) -> i64 {
        (self.sleep_end - self.sleep_start).num_minutes().max(0)
    }
}

impl_record!(Sleep, "sleep");

impl ContentItem for Sleep {
    const ITEM_TYPE: TimeLineType = TimeLineType::Sleep;

    content_common!();

    fn progeny_time(&self) -> DateTime<Utc> {
        self.sleep_start
    }

    fn summary(&self) -> String {
        let minutes = self.duration_minutes();
        format!("Slept {}h {}m", minutes / 60, minutes % 60)
    }

    fn set_created(&mut self, now: DateTime<Utc>) {
        self.created_date = now;
    }

    fn validate(&self) -> Result<(), String> {
        if self.sleep_end <= self.sleep_start {
            return Err("sleep_end must be after sleep_start".to_string());
        }
        if !(0..=5).contains(&self.sleep_rating) {
            return Err("sleep_rating must be between 0 and 5".to_string());
        }
        Ok(())
    }
}
