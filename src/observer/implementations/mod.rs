// Observer implementations organized by rings

// Ring 1: Input Validation
#[path = "1/access_level_validator.rs"]
pub mod access_level_validator;

// Ring 6: Post-Database - projection and cache sync
#[path = "6/timeline_projector.rs"]
pub mod timeline_projector;
#[path = "6/cache_sync.rs"]
pub mod cache_sync;
#[path = "6/audience_resolver.rs"]
pub mod audience_resolver;

// Ring 7: Audit
#[path = "7/audit_log.rs"]
pub mod audit_log;

// Ring 9: Notification
#[path = "9/push_notification.rs"]
pub mod push_notification;
#[path = "9/web_notification.rs"]
pub mod web_notification;

pub use access_level_validator::*;
pub use audience_resolver::*;
pub use audit_log::*;
pub use cache_sync::*;
pub use push_notification::*;
pub use timeline_projector::*;
pub use web_notification::*;
