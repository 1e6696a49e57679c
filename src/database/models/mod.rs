pub mod calendar;
pub mod comment;
pub mod contact;
pub mod family;
pub mod friend;
pub mod kanban;
pub mod location;
pub mod measurement;
pub mod note;
pub mod notification;
pub mod picture;
pub mod progeny;
pub mod skill;
pub mod sleep;
pub mod timeline;
pub mod todo;
pub mod user_access;
pub mod user_group;
pub mod user_info;
pub mod vaccination;
pub mod video;
pub mod vocabulary;

pub use calendar::CalendarItem;
pub use comment::Comment;
pub use contact::Contact;
pub use family::Family;
pub use friend::Friend;
pub use kanban::{KanbanBoard, KanbanItem};
pub use location::Location;
pub use measurement::Measurement;
pub use note::Note;
pub use notification::{MobileNotification, PushDevice, WebNotification};
pub use picture::Picture;
pub use progeny::Progeny;
pub use skill::Skill;
pub use sleep::Sleep;
pub use timeline::{TimeLineItem, TimeLineType};
pub use todo::TodoItem;
pub use user_access::UserAccess;
pub use user_group::UserGroup;
pub use user_info::UserInfo;
pub use vaccination::Vaccination;
pub use video::Video;
pub use vocabulary::VocabularyItem;

use chrono::{DateTime, Utc};

use crate::database::record::Record;

/// A progeny-scoped row that is mirrored into the timeline
pub trait ContentItem: Record {
    const ITEM_TYPE: TimeLineType;

    fn progeny_id(&self) -> i32;

    fn access_level(&self) -> i32;

    fn author(&self) -> &str;

    fn set_author(&mut self, author: &str);

    /// Timestamp the item is placed at in the feed
    fn progeny_time(&self) -> DateTime<Utc>;

    /// One-line description used in notification messages
    fn summary(&self) -> String;

    /// Raw comma-delimited tag string, for types that carry one
    fn tags(&self) -> Option<&str> {
        None
    }

    /// Stamp creation-time fields before the first insert
    fn set_created(&mut self, _now: DateTime<Utc>) {}

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Accessor boilerplate shared by every content struct
#[macro_export]
macro_rules! content_common {
    () => {
        fn progeny_id(&self) -> i32 {
            self.progeny_id
        }

        fn access_level(&self) -> i32 {
            self.access_level
        }

        fn author(&self) -> &str {
            &self.author
        }

        fn set_author(&mut self, author: &str) {
            self.author = author.to_string();
        }
    };
}
