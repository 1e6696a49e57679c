use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::database::models::{KanbanBoard, KanbanItem};
use crate::database::{DatabaseError, RecordStore, Repository};
use crate::filter::FilterData;
use crate::services::access::AccessService;
use crate::services::error::{ServiceError, ServiceResult};

/// Cards on a kanban board. The board decides who may see them; edits need
/// admin rights on the board's progeny.
#[derive(Clone)]
pub struct KanbanItemService {
    repo: Repository<KanbanItem>,
    boards: Repository<KanbanBoard>,
    access: AccessService,
}

impl KanbanItemService {
    pub fn new(store: Arc<dyn RecordStore>, access: AccessService) -> Self {
        Self {
            repo: Repository::new(store.clone()),
            boards: Repository::new(store),
            access,
        }
    }

    fn not_found(id: i32) -> ServiceError {
        ServiceError::not_found(format!("Kanban item {} not found", id))
    }

    async fn visible_board(&self, board_id: i32, email: &str) -> ServiceResult<KanbanBoard> {
        let missing = || ServiceError::not_found(format!("Kanban board {} not found", board_id));
        let board = self.boards.select_id(board_id).await?.ok_or_else(missing)?;
        let access = self.access.resolve(board.progeny_id, email).await?;
        if !access.can_view(board.access_level) {
            return Err(missing());
        }
        Ok(board)
    }

    async fn admin_board(&self, board_id: i32, email: &str) -> ServiceResult<KanbanBoard> {
        let board = self
            .boards
            .select_id(board_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Kanban board {} not found", board_id)))?;
        self.access.require_admin(board.progeny_id, email).await?;
        Ok(board)
    }

    fn check_column(board: &KanbanBoard, item: &KanbanItem) -> ServiceResult<()> {
        if item.title.trim().is_empty() {
            return Err(ServiceError::validation("title is required"));
        }
        let in_range = usize::try_from(item.column_index).map_or(false, |c| board.columns.is_empty() || c < board.columns.len());
        if !in_range || item.row_index < 0 {
            return Err(ServiceError::validation(format!(
                "column {} row {} is outside board {}",
                item.column_index, item.row_index, board.id
            )));
        }
        Ok(())
    }

    /// Cards ordered by column, then row
    pub async fn list(&self, board_id: i32, email: &str) -> ServiceResult<Vec<KanbanItem>> {
        self.visible_board(board_id, email).await?;
        Ok(self
            .repo
            .select_any(
                FilterData::new()
                    .where_clause(json!({ "kanban_board_id": board_id }))
                    .order("column_index asc, row_index asc, id asc"),
            )
            .await?)
    }

    pub async fn get(&self, id: i32, email: &str) -> ServiceResult<KanbanItem> {
        let item = self.repo.select_id(id).await?.ok_or_else(|| Self::not_found(id))?;
        self.visible_board(item.kanban_board_id, email).await.map_err(|e| match e {
            ServiceError::NotFound(_) => Self::not_found(id),
            other => other,
        })?;
        Ok(item)
    }

    pub async fn add(&self, mut item: KanbanItem, email: &str) -> ServiceResult<KanbanItem> {
        let board = self.admin_board(item.kanban_board_id, email).await?;
        item.id = 0;
        item.progeny_id = board.progeny_id;
        item.author = email.to_string();
        item.created_time = Utc::now();
        item.modified_time = item.created_time;
        Self::check_column(&board, &item)?;
        Ok(self.repo.insert(&item).await?)
    }

    pub async fn update(&self, id: i32, changes: Value, email: &str) -> ServiceResult<KanbanItem> {
        let existing = self.repo.select_id(id).await?.ok_or_else(|| Self::not_found(id))?;
        self.admin_board(existing.kanban_board_id, email).await?;
        let Value::Object(changes) = changes else {
            return Err(ServiceError::validation("update body must be a JSON object"));
        };
        let mut merged = serde_json::to_value(&existing).map_err(DatabaseError::from)?;
        if let Value::Object(row) = &mut merged {
            for (key, value) in changes
                .into_iter()
                .filter(|(k, _)| !matches!(k.as_str(), "id" | "progeny_id" | "author" | "created_time"))
            {
                row.insert(key, value);
            }
        }
        let mut item: KanbanItem = serde_json::from_value(merged).map_err(|e| ServiceError::validation(e.to_string()))?;
        item.id = id;

        // Moving a card to another board needs rights there too
        let board = if item.kanban_board_id != existing.kanban_board_id {
            self.admin_board(item.kanban_board_id, email).await?
        } else {
            self.admin_board(existing.kanban_board_id, email).await?
        };
        item.progeny_id = board.progeny_id;
        item.modified_time = Utc::now();
        Self::check_column(&board, &item)?;

        self.repo.update(&item).await?.ok_or_else(|| Self::not_found(id))
    }

    pub async fn delete(&self, id: i32, email: &str) -> ServiceResult<KanbanItem> {
        let existing = self.repo.select_id(id).await?.ok_or_else(|| Self::not_found(id))?;
        self.admin_board(existing.kanban_board_id, email).await?;
        self.repo.delete(id).await?.ok_or_else(|| Self::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessConfig;
    use crate::database::models::Progeny;
    use crate::database::MemoryRecordStore;

    async fn setup() -> (KanbanItemService, i32) {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        Repository::<Progeny>::new(store.clone())
            .insert(&Progeny { name: "Kaya".into(), admins: vec!["mom@x.com".into()], ..Default::default() })
            .await
            .unwrap();
        let board = Repository::<KanbanBoard>::new(store.clone())
            .insert(&KanbanBoard {
                progeny_id: 1,
                access_level: 0,
                title: "Chores".into(),
                columns: vec!["todo".into(), "done".into()],
                ..Default::default()
            })
            .await
            .unwrap();
        let access = AccessService::new(
            store.clone(),
            AccessConfig { default_user_email: "guest@x.com".into(), public_progeny_id: 99 },
        );
        (KanbanItemService::new(store, access), board.id)
    }

    #[tokio::test]
    async fn cards_take_progeny_from_board() {
        let (service, board_id) = setup().await;
        let card = KanbanItem { kanban_board_id: board_id, progeny_id: 42, title: "Dishes".into(), ..Default::default() };
        let stored = service.add(card, "mom@x.com").await.unwrap();
        assert_eq!(stored.progeny_id, 1);
        assert_eq!(stored.author, "mom@x.com");

        let moved = service.update(stored.id, json!({ "column_index": 1 }), "mom@x.com").await.unwrap();
        assert_eq!(moved.column_index, 1);

        let err = service.update(stored.id, json!({ "column_index": 2 }), "mom@x.com").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn outsiders_cannot_see_or_edit_cards() {
        let (service, board_id) = setup().await;
        let card = KanbanItem { kanban_board_id: board_id, title: "Dishes".into(), ..Default::default() };
        let stored = service.add(card.clone(), "mom@x.com").await.unwrap();

        assert!(matches!(service.list(board_id, "stranger@x.com").await, Err(ServiceError::Unauthorized(_))));
        assert!(matches!(service.add(card, "stranger@x.com").await, Err(ServiceError::Unauthorized(_))));
        assert!(matches!(service.delete(stored.id, "stranger@x.com").await, Err(ServiceError::Unauthorized(_))));
        assert_eq!(service.list(board_id, "mom@x.com").await.unwrap().len(), 1);
    }
}
