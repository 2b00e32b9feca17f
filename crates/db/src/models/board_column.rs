//! Repository for board columns, the ordered lanes within a board.
//!
//! `sort_order` drives display order within a board. Nothing at this layer
//! enforces uniqueness of the key; ties sort in backend order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoardColumn {
    pub id: Uuid,
    pub title: String,
    pub sort_order: i32,
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Data required to create a column. The id and timestamp are generated by
/// the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateColumnData {
    pub title: String,
    pub sort_order: i32,
    pub board_id: Uuid,
    pub user_id: Uuid,
}

/// Errors that can occur during column operations.
#[derive(Debug, Error)]
pub enum ColumnError {
    #[error("column not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Repository for column operations.
pub struct ColumnRepository;

impl ColumnRepository {
    /// List a board's columns in display order.
    pub async fn list_by_board(
        pool: &PgPool,
        board_id: Uuid,
    ) -> Result<Vec<BoardColumn>, ColumnError> {
        let records = sqlx::query_as::<_, BoardColumn>(
            r#"
            SELECT
                id,
                title,
                sort_order,
                board_id,
                user_id,
                created_at
            FROM columns
            WHERE board_id = $1
            ORDER BY sort_order ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Just the ids of a board's columns. First phase of the task lookup,
    /// which scopes tasks through their column.
    pub async fn list_ids_by_board(
        pool: &PgPool,
        board_id: Uuid,
    ) -> Result<Vec<Uuid>, ColumnError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM columns
            WHERE board_id = $1
            "#,
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }

    /// Create a new column and return the persisted row.
    pub async fn create(
        pool: &PgPool,
        data: CreateColumnData,
    ) -> Result<BoardColumn, ColumnError> {
        let record = sqlx::query_as::<_, BoardColumn>(
            r#"
            INSERT INTO columns (title, sort_order, board_id, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING
                id,
                title,
                sort_order,
                board_id,
                user_id,
                created_at
            "#,
        )
        .bind(data.title)
        .bind(data.sort_order)
        .bind(data.board_id)
        .bind(data.user_id)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Patch only the column's title.
    pub async fn update_title(
        pool: &PgPool,
        id: Uuid,
        title: &str,
    ) -> Result<BoardColumn, ColumnError> {
        let record = sqlx::query_as::<_, BoardColumn>(
            r#"
            UPDATE columns
            SET title = $2
            WHERE id = $1
            RETURNING
                id,
                title,
                sort_order,
                board_id,
                user_id,
                created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .fetch_optional(pool)
        .await?;

        record.ok_or(ColumnError::NotFound)
    }
}
