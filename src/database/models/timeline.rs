use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::database::record::Record;

/// Discriminates the source table of a timeline entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeLineType {
    #[default]
    Picture,
    Video,
    Calendar,
    Vocabulary,
    Skill,
    Friend,
    Measurement,
    Sleep,
    Note,
    Contact,
    Vaccination,
    Location,
    Todo,
    KanbanBoard,
}

impl TimeLineType {
    pub const ALL: [TimeLineType; 14] = [
        TimeLineType::Picture,
        TimeLineType::Video,
        TimeLineType::Calendar,
        TimeLineType::Vocabulary,
        TimeLineType::Skill,
        TimeLineType::Friend,
        TimeLineType::Measurement,
        TimeLineType::Sleep,
        TimeLineType::Note,
        TimeLineType::Contact,
        TimeLineType::Vaccination,
        TimeLineType::Location,
        TimeLineType::Todo,
        TimeLineType::KanbanBoard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeLineType::Picture => "picture",
            TimeLineType::Video => "video",
            TimeLineType::Calendar => "calendar",
            TimeLineType::Vocabulary => "vocabulary",
            TimeLineType::Skill => "skill",
            TimeLineType::Friend => "friend",
            TimeLineType::Measurement => "measurement",
            TimeLineType::Sleep => "sleep",
            TimeLineType::Note => "note",
            TimeLineType::Contact => "contact",
            TimeLineType::Vaccination => "vaccination",
            TimeLineType::Location => "location",
            TimeLineType::Todo => "todo",
            TimeLineType::KanbanBoard => "kanban_board",
        }
    }

    /// Human label used in notification titles
    pub fn label(&self) -> &'static str {
        match self {
            TimeLineType::Picture => "Photo",
            TimeLineType::Video => "Video",
            TimeLineType::Calendar => "Calendar item",
            TimeLineType::Vocabulary => "Word",
            TimeLineType::Skill => "Skill",
            TimeLineType::Friend => "Friend",
            TimeLineType::Measurement => "Measurement",
            TimeLineType::Sleep => "Sleep",
            TimeLineType::Note => "Note",
            TimeLineType::Contact => "Contact",
            TimeLineType::Vaccination => "Vaccination",
            TimeLineType::Location => "Location",
            TimeLineType::Todo => "To-do",
            TimeLineType::KanbanBoard => "Kanban board",
        }
    }
}

impl fmt::Display for TimeLineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeLineType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeLineType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown item type: {}", s))
    }
}

/// Feed entry mirroring one content row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeLineItem {
    pub id: i32,
    pub progeny_id: i32,
    pub item_id: String,
    pub item_type: TimeLineType,
    pub access_level: i32,
    pub progeny_time: DateTime<Utc>,
    pub created_time: DateTime<Utc>,
    pub created_by: String,
}

impl Record for TimeLineItem {
    const TABLE: &'static str = "timeline_items";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_types_serialize_as_snake_case() {
        assert_eq!(serde_json::to_value(TimeLineType::KanbanBoard).unwrap(), "kanban_board");
        assert_eq!("kanban_board".parse::<TimeLineType>().unwrap(), TimeLineType::KanbanBoard);
        assert!("photo".parse::<TimeLineType>().is_err());
        for t in TimeLineType::ALL {
            assert_eq!(serde_json::to_value(t).unwrap(), t.as_str());
        }
    }
}
