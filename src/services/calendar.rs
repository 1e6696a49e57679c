use chrono::{DateTime, Utc};

use crate::database::models::CalendarItem;
use crate::services::content::ContentService;
use crate::services::error::ServiceResult;

impl ContentService<CalendarItem> {
    /// Visible events still running at `now`, soonest first
    pub async fn upcoming(&self, progeny_id: i32, email: &str, now: DateTime<Utc>, count: usize) -> ServiceResult<Vec<CalendarItem>> {
        let mut items: Vec<CalendarItem> = self
            .list(progeny_id, email, None)
            .await?
            .into_iter()
            .filter(|item| item.end_time >= now)
            .collect();
        items.sort_by_key(|item| (item.start_time, item.id));
        items.truncate(count);
        Ok(items)
    }
}
