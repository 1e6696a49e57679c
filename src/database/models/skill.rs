use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{ContentItem, TimeLineType};
use crate::{content_common, impl_record};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub author: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub skill_first_observation: DateTime<Utc>,
    pub skill_added_date: DateTime<Utc>,
}

impl_record!(Skill, "skills");

impl ContentItem for Skill {
    const ITEM_TYPE: TimeLineType = TimeLineType::Skill;

    content_common!();

    fn progeny_time(&self) -> DateTime<Utc> {
        self.skill_first_observation
    }

    fn summary(&self) -> String {
        self.name.clone()
    }

    fn set_created(&mut self, now: DateTime<Utc>) {
        self.skill_added_date = now;
    }
}
