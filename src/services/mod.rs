pub mod access;
pub mod cache;
pub mod calendar;
pub mod comment;
pub mod content;
pub mod error;
pub mod family;
pub mod kanban;
pub mod notification;
pub mod notifier;
pub mod paging;
pub mod progeny;
pub mod sleep_stats;
pub mod tags;
pub mod timeline;
pub mod user_access;
pub mod user_group;
pub mod user_info;

pub use access::{AccessError, AccessService, ProgenyAccess, ACCESS_LEVEL_ADMIN, ACCESS_LEVEL_PUBLIC};
pub use cache::{Cache, MemoryCache};
pub use comment::CommentService;
pub use content::ContentService;
pub use error::{ServiceError, ServiceResult};
pub use family::FamilyService;
pub use kanban::KanbanItemService;
pub use notification::NotificationService;
pub use notifier::{GatewayPushNotifier, NotificationError, PushNotifier, StoreWebNotifier, WebNotifier};
pub use paging::{page_of, Numbered, Page, PageRequest};
pub use progeny::ProgenyService;
pub use timeline::TimelineService;
pub use user_access::{UserAccessChanges, UserAccessService};
pub use user_group::UserGroupService;
pub use user_info::UserInfoService;
