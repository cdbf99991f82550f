//! SQLite-backed implementation of [`BoardDimensionRepository`].

use sqlx::SqlitePool;

use super::helpers::decode_dimension;
use crate::persistence::traits::BoardDimensionRepository;
use crate::persistence::{BoardDimension, BoardDimensionId, PersistenceError};

pub struct SqliteBoardDimensionRepository {
    pool: SqlitePool,
}

impl SqliteBoardDimensionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn decode_row((id, rows, columns): (i64, i64, i64)) -> Result<BoardDimension, PersistenceError> {
    Ok(BoardDimension {
        id,
        rows: decode_dimension("rows", rows)?,
        columns: decode_dimension("columns", columns)?,
    })
}

impl BoardDimensionRepository for SqliteBoardDimensionRepository {
    async fn find_dimension(
        &self,
        rows: u32,
        columns: u32,
    ) -> Result<Option<BoardDimension>, PersistenceError> {
        let row: Option<(i64, i64, i64)> = sqlx::query_as(
            "SELECT id, board_rows, board_columns FROM board_dimensions \
             WHERE board_rows = ? AND board_columns = ?",
        )
        .bind(i64::from(rows))
        .bind(i64::from(columns))
        .fetch_optional(&self.pool)
        .await?;

        row.map(decode_row).transpose()
    }

    async fn get_dimension(
        &self,
        id: BoardDimensionId,
    ) -> Result<Option<BoardDimension>, PersistenceError> {
        let row: Option<(i64, i64, i64)> = sqlx::query_as(
            "SELECT id, board_rows, board_columns FROM board_dimensions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(decode_row).transpose()
    }

    async fn add_dimension(
        &self,
        rows: u32,
        columns: u32,
    ) -> Result<BoardDimensionId, PersistenceError> {
        let inserted: Option<(i64,)> = sqlx::query_as(
            "INSERT INTO board_dimensions (board_rows, board_columns) VALUES (?, ?) \
             ON CONFLICT(board_rows, board_columns) DO NOTHING \
             RETURNING id",
        )
        .bind(i64::from(rows))
        .bind(i64::from(columns))
        .fetch_optional(&self.pool)
        .await?;

        if let Some((id,)) = inserted {
            tracing::info!(id, rows, columns, "Created board dimension");
            return Ok(id);
        }

        self.find_dimension(rows, columns)
            .await?
            .map(|d| d.id)
            .ok_or_else(|| {
                PersistenceError::InvalidRecord(format!("board dimension {rows}x{columns} vanished"))
            })
    }
}
