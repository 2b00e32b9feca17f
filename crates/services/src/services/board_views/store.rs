//! Store abstraction the board-view service is written against.

use async_trait::async_trait;
use db::{
    Client,
    models::{
        Board, BoardColumn, BoardError, BoardRepository, ColumnError, ColumnRepository,
        CreateBoardData, CreateColumnData, Task, TaskError, TaskRepository,
    },
};
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by a [`BoardStore`]. Backend failures pass through the
/// repository enums unchanged; nothing is wrapped or retried here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Column(#[from] ColumnError),
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// The repository operations the board-view service composes.
///
/// A trait seam so the service can be driven by an in-memory mock in
/// tests; [`PgBoardStore`] is the production implementation.
#[async_trait]
pub trait BoardStore: Send + Sync {
    async fn find_board(&self, id: Uuid) -> Result<Option<Board>, StoreError>;

    /// A board's columns, ordered by sort position.
    async fn list_columns(&self, board_id: Uuid) -> Result<Vec<BoardColumn>, StoreError>;

    /// Just the column ids of a board. First phase of the task lookup.
    async fn column_ids_for_board(&self, board_id: Uuid) -> Result<Vec<Uuid>, StoreError>;

    /// All tasks in the given columns, ordered by sort position.
    async fn tasks_in_columns(&self, column_ids: &[Uuid]) -> Result<Vec<Task>, StoreError>;

    async fn create_board(&self, data: CreateBoardData) -> Result<Board, StoreError>;

    async fn create_column(&self, data: CreateColumnData) -> Result<BoardColumn, StoreError>;
}

/// Production store over a session-bound backend client.
pub struct PgBoardStore {
    client: Client,
}

impl PgBoardStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BoardStore for PgBoardStore {
    async fn find_board(&self, id: Uuid) -> Result<Option<Board>, StoreError> {
        Ok(BoardRepository::find_by_id(self.client.pool(), id).await?)
    }

    async fn list_columns(&self, board_id: Uuid) -> Result<Vec<BoardColumn>, StoreError> {
        Ok(ColumnRepository::list_by_board(self.client.pool(), board_id).await?)
    }

    async fn column_ids_for_board(&self, board_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        Ok(ColumnRepository::list_ids_by_board(self.client.pool(), board_id).await?)
    }

    async fn tasks_in_columns(&self, column_ids: &[Uuid]) -> Result<Vec<Task>, StoreError> {
        Ok(TaskRepository::find_in_columns(self.client.pool(), column_ids).await?)
    }

    async fn create_board(&self, data: CreateBoardData) -> Result<Board, StoreError> {
        Ok(BoardRepository::create(self.client.pool(), data).await?)
    }

    async fn create_column(&self, data: CreateColumnData) -> Result<BoardColumn, StoreError> {
        Ok(ColumnRepository::create(self.client.pool(), data).await?)
    }
}
