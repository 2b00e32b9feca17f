//! Repository for tasks, the units of work inside a column.
//!
//! Tasks reference their column, not their board, so board-scoped reads go
//! through the column ids first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::board_column::ColumnRepository;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub column_id: Uuid,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a task. The id and both timestamps are
/// generated by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskData {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub column_id: Uuid,
    pub sort_order: i32,
}

/// Errors that can occur during task operations.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Column(#[from] super::board_column::ColumnError),
}

/// Repository for task operations.
pub struct TaskRepository;

impl TaskRepository {
    /// All tasks on a board, in sort order.
    ///
    /// Two-phase read: the board's column ids are resolved first, and a
    /// board with no columns returns empty without issuing a task query.
    pub async fn find_by_board(pool: &PgPool, board_id: Uuid) -> Result<Vec<Task>, TaskError> {
        let column_ids = ColumnRepository::list_ids_by_board(pool, board_id).await?;
        if column_ids.is_empty() {
            tracing::debug!(%board_id, "board has no columns; skipping task fetch");
            return Ok(Vec::new());
        }
        Self::find_in_columns(pool, &column_ids).await
    }

    /// All tasks whose column is in `column_ids`, ordered by sort position
    /// across the whole set.
    pub async fn find_in_columns(
        pool: &PgPool,
        column_ids: &[Uuid],
    ) -> Result<Vec<Task>, TaskError> {
        let records = sqlx::query_as::<_, Task>(
            r#"
            SELECT
                id,
                title,
                description,
                column_id,
                sort_order,
                created_at,
                updated_at
            FROM tasks
            WHERE column_id = ANY($1)
            ORDER BY sort_order ASC
            "#,
        )
        .bind(column_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Create a new task and return the persisted row.
    pub async fn create(pool: &PgPool, data: CreateTaskData) -> Result<Task, TaskError> {
        let record = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, column_id, sort_order)
            VALUES ($1, $2, $3, $4)
            RETURNING
                id,
                title,
                description,
                column_id,
                sort_order,
                created_at,
                updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.column_id)
        .bind(data.sort_order)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Move a task to a column position in a single write. Only the column
    /// reference and sort position change; other fields, including
    /// `updated_at`, are untouched.
    pub async fn move_to_column(
        pool: &PgPool,
        task_id: Uuid,
        new_column_id: Uuid,
        new_sort_order: i32,
    ) -> Result<Task, TaskError> {
        let record = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET
                column_id = $2,
                sort_order = $3
            WHERE id = $1
            RETURNING
                id,
                title,
                description,
                column_id,
                sort_order,
                created_at,
                updated_at
            "#,
        )
        .bind(task_id)
        .bind(new_column_id)
        .bind(new_sort_order)
        .fetch_optional(pool)
        .await?;

        record.ok_or(TaskError::NotFound)
    }
}
