//! Board-view aggregation.
//!
//! Composes the board, column, and task repositories into the denormalized
//! structure the UI renders, and seeds new boards with their default
//! columns. Independent reads run concurrently; this module never returns
//! a partially-assembled view on failure.

mod mock;
mod store;

use std::collections::HashMap;

use db::models::{
    Board, BoardColumn, CreateBoardData, CreateColumnData, DEFAULT_BOARD_COLOR, Task,
};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use mock::MockBoardStore;
pub use store::{BoardStore, PgBoardStore, StoreError};

/// Column titles and sort positions every new board starts with.
pub const DEFAULT_COLUMNS: [(&str, i32); 4] = [
    ("To Do", 0),
    ("In Progress", 1),
    ("Review", 2),
    ("Done", 3),
];

/// A column carrying its tasks in sort order.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnWithTasks {
    #[serde(flatten)]
    pub column: BoardColumn,
    pub tasks: Vec<Task>,
}

/// The denormalized view of one board. Derived, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub board: Board,
    pub columns: Vec<ColumnWithTasks>,
}

/// Caller-facing payload for creating a board. An omitted description
/// stays absent; an omitted color falls back to [`DEFAULT_BOARD_COLOR`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBoard {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub user_id: Uuid,
}

#[derive(Debug, Error)]
pub enum BoardViewError {
    /// The board itself is missing. Distinct from the repository-level
    /// not-found: the column list for the same id legitimately returns
    /// empty, so only the board fetch decides.
    #[error("board {0} not found")]
    BoardNotFound(Uuid),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Aggregation service over a [`BoardStore`].
pub struct BoardViews<S> {
    store: S,
}

impl<S: BoardStore> BoardViews<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The full view of one board: the board row plus its columns, each
    /// carrying its tasks.
    ///
    /// The board fetch and the column list have no ordering dependency and
    /// run concurrently. Task order within a column follows the task
    /// repository's sort-position ordering; no extra sort happens here.
    pub async fn get_board_with_columns(
        &self,
        board_id: Uuid,
    ) -> Result<BoardView, BoardViewError> {
        let (board, columns) = tokio::try_join!(
            self.store.find_board(board_id),
            self.store.list_columns(board_id),
        )?;
        let board = board.ok_or(BoardViewError::BoardNotFound(board_id))?;

        let tasks = self.tasks_for_board(board_id).await?;
        tracing::debug!(
            %board_id,
            columns = columns.len(),
            tasks = tasks.len(),
            "assembled board view"
        );

        Ok(BoardView {
            board,
            columns: attach_tasks(columns, tasks),
        })
    }

    /// Two-phase task lookup: tasks reference columns, not boards, so the
    /// board's column ids are resolved first. A board with no columns
    /// never issues the task query.
    async fn tasks_for_board(&self, board_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let column_ids = self.store.column_ids_for_board(board_id).await?;
        if column_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.store.tasks_in_columns(&column_ids).await
    }

    /// Create a board plus its four default columns, returning only the
    /// board.
    ///
    /// The column inserts run concurrently with no compensation: when one
    /// fails, siblings that already landed stay in place and the error is
    /// reported as-is, leaving the board partially initialized.
    pub async fn create_board_with_defaults(
        &self,
        data: NewBoard,
    ) -> Result<Board, BoardViewError> {
        let board = self
            .store
            .create_board(CreateBoardData {
                title: data.title,
                description: data.description,
                color: data
                    .color
                    .unwrap_or_else(|| DEFAULT_BOARD_COLOR.to_string()),
                user_id: data.user_id,
            })
            .await?;

        let inserts = DEFAULT_COLUMNS.iter().map(|&(title, sort_order)| {
            self.store.create_column(CreateColumnData {
                title: title.to_string(),
                sort_order,
                board_id: board.id,
                user_id: board.user_id,
            })
        });
        if let Err(err) = try_join_all(inserts).await {
            tracing::warn!(
                board_id = %board.id,
                error = %err,
                "default column creation failed; board left partially initialized"
            );
            return Err(err.into());
        }

        Ok(board)
    }
}

/// Single grouping pass: tasks bucketed by column id, then attached to the
/// columns in their existing order. Task order within a bucket follows the
/// input order.
fn attach_tasks(columns: Vec<BoardColumn>, tasks: Vec<Task>) -> Vec<ColumnWithTasks> {
    let mut by_column: HashMap<Uuid, Vec<Task>> = HashMap::new();
    for task in tasks {
        by_column.entry(task.column_id).or_default().push(task);
    }
    columns
        .into_iter()
        .map(|column| {
            let tasks = by_column.remove(&column.id).unwrap_or_default();
            ColumnWithTasks { column, tasks }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use db::models::BoardError;

    use super::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    }

    fn board(user_id: Uuid) -> Board {
        let now = Utc::now();
        Board {
            id: Uuid::new_v4(),
            title: "Sprint 1".to_string(),
            description: None,
            color: DEFAULT_BOARD_COLOR.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn column(board_id: Uuid, user_id: Uuid, title: &str, sort_order: i32) -> BoardColumn {
        BoardColumn {
            id: Uuid::new_v4(),
            title: title.to_string(),
            sort_order,
            board_id,
            user_id,
            created_at: Utc::now(),
        }
    }

    fn task(column_id: Uuid, title: &str, sort_order: i32) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            column_id,
            sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn attach_tasks_groups_by_column_preserving_order() {
        let board_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let a = column(board_id, user_id, "To Do", 0);
        let b = column(board_id, user_id, "Done", 1);
        let t1 = task(a.id, "first", 0);
        let t2 = task(a.id, "second", 1);

        let grouped = attach_tasks(vec![a.clone(), b.clone()], vec![t1.clone(), t2.clone()]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].column.id, a.id);
        assert_eq!(
            grouped[0].tasks.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![t1.id, t2.id]
        );
        assert_eq!(grouped[1].column.id, b.id);
        assert!(grouped[1].tasks.is_empty());
    }

    #[test]
    fn attach_tasks_drops_tasks_without_a_matching_column() {
        let board_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let a = column(board_id, user_id, "To Do", 0);
        let stray = task(Uuid::new_v4(), "orphan", 0);

        let grouped = attach_tasks(vec![a], vec![stray]);
        assert!(grouped[0].tasks.is_empty());
    }

    #[tokio::test]
    async fn view_attaches_tasks_to_their_columns() -> anyhow::Result<()> {
        let store = MockBoardStore::new();
        let user_id = Uuid::new_v4();
        let b = board(user_id);
        let col_a = column(b.id, user_id, "To Do", 0);
        let col_b = column(b.id, user_id, "Done", 1);
        let t1 = task(col_a.id, "write tests", 0);
        let t2 = task(col_a.id, "review tests", 1);
        store.add_board(b.clone());
        store.add_column(col_a.clone());
        store.add_column(col_b.clone());
        store.add_task(t2.clone());
        store.add_task(t1.clone());

        let views = BoardViews::new(store);
        let view = views.get_board_with_columns(b.id).await?;

        assert_eq!(view.board.id, b.id);
        assert_eq!(view.columns.len(), 2);
        assert_eq!(
            view.columns[0].tasks.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![t1.id, t2.id],
            "tasks follow sort order within their column"
        );
        assert!(view.columns[1].tasks.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn view_skips_task_query_for_board_without_columns() -> anyhow::Result<()> {
        let store = MockBoardStore::new();
        let b = board(Uuid::new_v4());
        store.add_board(b.clone());

        let views = BoardViews::new(store.clone());
        let view = views.get_board_with_columns(b.id).await?;

        assert!(view.columns.is_empty());
        assert_eq!(store.task_query_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn view_issues_one_task_query_when_columns_exist() -> anyhow::Result<()> {
        let store = MockBoardStore::new();
        let user_id = Uuid::new_v4();
        let b = board(user_id);
        store.add_board(b.clone());
        store.add_column(column(b.id, user_id, "To Do", 0));

        let views = BoardViews::new(store.clone());
        views.get_board_with_columns(b.id).await?;

        assert_eq!(store.task_query_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn missing_board_is_board_not_found() {
        let store = MockBoardStore::new();
        let missing = Uuid::new_v4();

        let views = BoardViews::new(store);
        let err = views.get_board_with_columns(missing).await.unwrap_err();

        assert!(matches!(err, BoardViewError::BoardNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn create_with_defaults_seeds_four_columns() -> anyhow::Result<()> {
        let store = MockBoardStore::new();
        let user_id = Uuid::new_v4();

        let views = BoardViews::new(store.clone());
        let created = views
            .create_board_with_defaults(NewBoard {
                title: "Sprint 1".to_string(),
                description: None,
                color: None,
                user_id,
            })
            .await?;

        assert_eq!(created.title, "Sprint 1");
        assert_eq!(created.color, DEFAULT_BOARD_COLOR);
        assert_eq!(created.user_id, user_id);
        assert_eq!(store.boards().len(), 1);

        let mut columns = store.columns();
        columns.sort_by_key(|c| c.sort_order);
        let titles: Vec<_> = columns
            .iter()
            .map(|c| (c.title.as_str(), c.sort_order))
            .collect();
        assert_eq!(
            titles,
            vec![("To Do", 0), ("In Progress", 1), ("Review", 2), ("Done", 3)]
        );
        assert!(columns.iter().all(|c| c.board_id == created.id));
        assert!(columns.iter().all(|c| c.user_id == user_id));
        Ok(())
    }

    #[tokio::test]
    async fn create_with_defaults_keeps_explicit_color() -> anyhow::Result<()> {
        let store = MockBoardStore::new();

        let views = BoardViews::new(store);
        let created = views
            .create_board_with_defaults(NewBoard {
                title: "Roadmap".to_string(),
                description: Some("Q3".to_string()),
                color: Some("bg-rose-500".to_string()),
                user_id: Uuid::new_v4(),
            })
            .await?;

        assert_eq!(created.color, "bg-rose-500");
        assert_eq!(created.description.as_deref(), Some("Q3"));
        Ok(())
    }

    #[tokio::test]
    async fn failed_column_insert_leaves_board_and_siblings_in_place() {
        init_tracing();
        let store = MockBoardStore::new();
        store.fail_column_titled("Review");

        let views = BoardViews::new(store.clone());
        let err = views
            .create_board_with_defaults(NewBoard {
                title: "Sprint 2".to_string(),
                description: None,
                color: None,
                user_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BoardViewError::Store(_)));
        // No rollback: the board row and the sibling columns that landed
        // before the failure remain.
        assert_eq!(store.boards().len(), 1);
        assert!(store.columns().iter().all(|c| c.title != "Review"));
    }

    #[tokio::test]
    async fn backend_failure_on_board_fetch_passes_through_unchanged() {
        // A backend-reported failure on the board fetch must keep its
        // identity instead of collapsing into BoardNotFound.
        struct FailingStore(MockBoardStore);

        #[async_trait::async_trait]
        impl BoardStore for FailingStore {
            async fn find_board(&self, _id: Uuid) -> Result<Option<Board>, StoreError> {
                Err(StoreError::Board(BoardError::Database(
                    sqlx::Error::PoolClosed,
                )))
            }
            async fn list_columns(&self, board_id: Uuid) -> Result<Vec<BoardColumn>, StoreError> {
                self.0.list_columns(board_id).await
            }
            async fn column_ids_for_board(&self, board_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
                self.0.column_ids_for_board(board_id).await
            }
            async fn tasks_in_columns(&self, ids: &[Uuid]) -> Result<Vec<Task>, StoreError> {
                self.0.tasks_in_columns(ids).await
            }
            async fn create_board(&self, data: CreateBoardData) -> Result<Board, StoreError> {
                self.0.create_board(data).await
            }
            async fn create_column(
                &self,
                data: CreateColumnData,
            ) -> Result<BoardColumn, StoreError> {
                self.0.create_column(data).await
            }
        }

        let views = BoardViews::new(FailingStore(MockBoardStore::new()));
        let err = views.get_board_with_columns(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(
            err,
            BoardViewError::Store(StoreError::Board(BoardError::Database(_)))
        ));
    }
}
