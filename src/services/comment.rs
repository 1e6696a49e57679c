use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::database::models::{Comment, Progeny, TimeLineItem, TimeLineType};
use crate::database::{RecordStore, Repository};
use crate::filter::FilterData;
use crate::services::access::AccessService;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::notification::NotificationService;
use crate::services::notifier::{PushNotifier, WebNotifier};
use crate::services::timeline::TimelineService;
use crate::services::user_info::UserInfoService;

/// Comments hang off a timeline item. Anyone who can see the item and may
/// contribute can comment; authors and progeny admins can delete.
#[derive(Clone)]
pub struct CommentService {
    repo: Repository<Comment>,
    access: AccessService,
    timeline: TimelineService,
    notifications: NotificationService,
    users: UserInfoService,
    push: Arc<dyn PushNotifier>,
    web: Arc<dyn WebNotifier>,
    icon_url: String,
}

impl CommentService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn RecordStore>,
        access: AccessService,
        timeline: TimelineService,
        notifications: NotificationService,
        users: UserInfoService,
        push: Arc<dyn PushNotifier>,
        web: Arc<dyn WebNotifier>,
        icon_url: impl Into<String>,
    ) -> Self {
        Self {
            repo: Repository::new(store),
            access,
            timeline,
            notifications,
            users,
            push,
            web,
            icon_url: icon_url.into(),
        }
    }

    pub async fn list(&self, item_type: TimeLineType, item_id: &str, email: &str) -> ServiceResult<Vec<Comment>> {
        self.timeline.get_visible(item_type, item_id, email).await?;
        Ok(self
            .repo
            .select_any(
                FilterData::new()
                    .where_clause(json!({ "item_type": item_type, "item_id": item_id }))
                    .order("created asc, id asc"),
            )
            .await?)
    }

    pub async fn add(&self, item_type: TimeLineType, item_id: &str, text: &str, email: &str) -> ServiceResult<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::validation("comment_text is required"));
        }
        let parent = self.timeline.get_visible(item_type, item_id, email).await?;
        let access = self.access.resolve(parent.progeny_id, email).await?;
        if !access.can_contribute() {
            return Err(ServiceError::unauthorized(format!(
                "Not allowed to comment on progeny {}",
                parent.progeny_id
            )));
        }

        let comment = Comment {
            id: 0,
            progeny_id: parent.progeny_id,
            item_type,
            item_id: item_id.to_string(),
            author: email.to_string(),
            comment_text: text.to_string(),
            created: Utc::now(),
        };
        let stored = self.repo.insert(&comment).await?;
        tracing::info!("Comment {} added to {} {}", stored.id, item_type, item_id);

        if let Err(e) = self.notify(&parent, &access.progeny, &stored).await {
            tracing::warn!("Comment {} notification failed: {}", stored.id, e);
        }
        Ok(stored)
    }

    async fn notify(
        &self,
        parent: &TimeLineItem,
        progeny: &Progeny,
        comment: &Comment,
    ) -> ServiceResult<()> {
        let actor = self.users.profile(&comment.author).await?;
        let recipients = self
            .notifications
            .audience(progeny, parent.access_level, &comment.author)
            .await?;
        let name = if progeny.nick_name.is_empty() { &progeny.name } else { &progeny.nick_name };
        let title = format!("New comment on {} for {}", parent.item_type.label(), name);
        let message = format!("{}: {}", actor.display_name(), comment.comment_text);

        self.push
            .progeny_update_notification(&title, &message, parent, &self.icon_url, &recipients)
            .await?;
        self.web.send_item_notification(parent, &actor, &title, &recipients).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32, email: &str) -> ServiceResult<Comment> {
        let not_found = || ServiceError::not_found(format!("Comment {} not found", id));
        let comment = self.repo.select_id(id).await?.ok_or_else(not_found)?;
        if !comment.author.eq_ignore_ascii_case(email) {
            self.access.require_admin(comment.progeny_id, email).await?;
        }
        self.repo.delete(id).await?.ok_or_else(not_found)
    }
}
