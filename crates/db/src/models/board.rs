//! Repository for boards, the top-level kanban containers a user owns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Color tag applied when a board is created without one.
pub const DEFAULT_BOARD_COLOR: &str = "bg-blue-500";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub color: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a board. The id and both timestamps are
/// generated by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoardData {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub color: String,
    pub user_id: Uuid,
}

/// Patch for an existing board. Absent fields are left untouched; present
/// fields cannot clear a column back to NULL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBoardData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Errors that can occur during board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("board not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository for board operations.
pub struct BoardRepository;

impl BoardRepository {
    /// Find a board by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Board>, BoardError> {
        let record = sqlx::query_as::<_, Board>(
            r#"
            SELECT
                id,
                title,
                description,
                color,
                user_id,
                created_at,
                updated_at
            FROM boards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Like [`Self::find_by_id`], but an absent row is an error.
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Board, BoardError> {
        Self::find_by_id(pool, id).await?.ok_or(BoardError::NotFound)
    }

    /// List all boards owned by a user, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Board>, BoardError> {
        let records = sqlx::query_as::<_, Board>(
            r#"
            SELECT
                id,
                title,
                description,
                color,
                user_id,
                created_at,
                updated_at
            FROM boards
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Create a new board and return the persisted row.
    pub async fn create(pool: &PgPool, data: CreateBoardData) -> Result<Board, BoardError> {
        let record = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (title, description, color, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING
                id,
                title,
                description,
                color,
                user_id,
                created_at,
                updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.color)
        .bind(data.user_id)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Merge the present fields of `data` into the row. `updated_at` is
    /// always stamped, even for an empty patch.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateBoardData,
    ) -> Result<Board, BoardError> {
        let record = sqlx::query_as::<_, Board>(
            r#"
            UPDATE boards
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                color = COALESCE($4, color),
                updated_at = now()
            WHERE id = $1
            RETURNING
                id,
                title,
                description,
                color,
                user_id,
                created_at,
                updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.color)
        .fetch_optional(pool)
        .await?;

        record.ok_or(BoardError::NotFound)
    }
}
