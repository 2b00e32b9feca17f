//! In-memory implementation of [`BoardStore`] for testing.
//!
//! Stores rows in memory and counts task-table queries so tests can assert
//! the two-phase lookup skips the task fetch for column-less boards.

use std::sync::{
    Arc, RwLock,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;
use db::models::{Board, BoardColumn, ColumnError, CreateBoardData, CreateColumnData, Task};
use uuid::Uuid;

use super::{BoardStore, StoreError};

/// Mock implementation of [`BoardStore`] backed by in-memory rows.
#[derive(Clone, Default)]
pub struct MockBoardStore {
    boards: Arc<RwLock<Vec<Board>>>,
    columns: Arc<RwLock<Vec<BoardColumn>>>,
    tasks: Arc<RwLock<Vec<Task>>>,
    task_queries: Arc<AtomicUsize>,
    fail_column_titled: Arc<RwLock<Option<String>>>,
}

impl MockBoardStore {
    /// Create a new empty MockBoardStore.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a board to the mock.
    pub fn add_board(&self, board: Board) {
        self.boards.write().unwrap().push(board);
    }

    /// Add a column to the mock.
    pub fn add_column(&self, column: BoardColumn) {
        self.columns.write().unwrap().push(column);
    }

    /// Add a task to the mock.
    pub fn add_task(&self, task: Task) {
        self.tasks.write().unwrap().push(task);
    }

    /// Make `create_column` fail for the column with this title.
    pub fn fail_column_titled(&self, title: impl Into<String>) {
        *self.fail_column_titled.write().unwrap() = Some(title.into());
    }

    /// Number of task-table queries issued so far.
    pub fn task_query_count(&self) -> usize {
        self.task_queries.load(Ordering::SeqCst)
    }

    /// Snapshot of the stored boards.
    pub fn boards(&self) -> Vec<Board> {
        self.boards.read().unwrap().clone()
    }

    /// Snapshot of the stored columns.
    pub fn columns(&self) -> Vec<BoardColumn> {
        self.columns.read().unwrap().clone()
    }
}

#[async_trait]
impl BoardStore for MockBoardStore {
    async fn find_board(&self, id: Uuid) -> Result<Option<Board>, StoreError> {
        Ok(self.boards.read().unwrap().iter().find(|b| b.id == id).cloned())
    }

    async fn list_columns(&self, board_id: Uuid) -> Result<Vec<BoardColumn>, StoreError> {
        let mut columns: Vec<_> = self
            .columns
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.board_id == board_id)
            .cloned()
            .collect();
        columns.sort_by_key(|c| c.sort_order);
        Ok(columns)
    }

    async fn column_ids_for_board(&self, board_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .columns
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.board_id == board_id)
            .map(|c| c.id)
            .collect())
    }

    async fn tasks_in_columns(&self, column_ids: &[Uuid]) -> Result<Vec<Task>, StoreError> {
        self.task_queries.fetch_add(1, Ordering::SeqCst);
        let mut tasks: Vec<_> = self
            .tasks
            .read()
            .unwrap()
            .iter()
            .filter(|t| column_ids.contains(&t.column_id))
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.sort_order);
        Ok(tasks)
    }

    async fn create_board(&self, data: CreateBoardData) -> Result<Board, StoreError> {
        let now = Utc::now();
        let board = Board {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            color: data.color,
            user_id: data.user_id,
            created_at: now,
            updated_at: now,
        };
        self.add_board(board.clone());
        Ok(board)
    }

    async fn create_column(&self, data: CreateColumnData) -> Result<BoardColumn, StoreError> {
        if self.fail_column_titled.read().unwrap().as_deref() == Some(data.title.as_str()) {
            return Err(StoreError::Column(ColumnError::Database(
                sqlx::Error::PoolClosed,
            )));
        }
        let column = BoardColumn {
            id: Uuid::new_v4(),
            title: data.title,
            sort_order: data.sort_order,
            board_id: data.board_id,
            user_id: data.user_id,
            created_at: Utc::now(),
        };
        self.add_column(column.clone());
        Ok(column)
    }
}
