pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod record;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;
pub use record::Record;
pub use repository::Repository;
pub use store::{RecordStore, Row};

/// Every table the stores hold, in cascade-delete order
pub const TABLES: &[&str] = &[
    "comments",
    "kanban_items",
    "timeline_items",
    "calendar_items",
    "contacts",
    "friends",
    "locations",
    "measurements",
    "notes",
    "pictures",
    "videos",
    "skills",
    "sleep",
    "vaccinations",
    "vocabulary",
    "todo_items",
    "kanban_boards",
    "user_groups",
    "user_access",
    "families",
    "web_notifications",
    "mobile_notifications",
    "push_devices",
    "user_info",
    "progeny",
];
