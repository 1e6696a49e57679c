use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::TimeLineType;
use crate::impl_record;

/// Comment on a timeline item, addressed by item type and source id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub id: i32,
    pub progeny_id: i32,
    pub item_type: TimeLineType,
    pub item_id: String,
    pub author: String,
    pub comment_text: String,
    pub created: DateTime<Utc>,
}

impl_record!(Comment, "comments");
