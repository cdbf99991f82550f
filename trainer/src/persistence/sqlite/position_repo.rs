//! SQLite-backed implementation of [`PositionRepository`].

use goban::Sign;
use sqlx::{Row, SqlitePool};

use super::helpers::{
    decode_dimension, decode_position, encode_sign, PositionRow, POSITION_COLUMNS,
};
use crate::persistence::traits::PositionRepository;
use crate::persistence::{
    NewPosition, PersistenceError, PositionCandidate, PositionId, PositionRecord,
};

pub struct SqlitePositionRepository {
    pool: SqlitePool,
}

impl SqlitePositionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_by_canonical_key(
        &self,
        player: Sign,
        canonical_key: &str,
    ) -> Result<Option<PositionId>, PersistenceError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM positions WHERE player = ? AND canonical_key = ?")
                .bind(encode_sign(player))
                .bind(canonical_key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id,)| id))
    }
}

impl PositionRepository for SqlitePositionRepository {
    async fn get_position(&self, id: PositionId) -> Result<Option<PositionRecord>, PersistenceError> {
        let sql = format!("SELECT {POSITION_COLUMNS} FROM positions p WHERE p.id = ?");
        let row: Option<PositionRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(decode_position).transpose()
    }

    async fn list_positions(&self) -> Result<Vec<PositionRecord>, PersistenceError> {
        let sql = format!("SELECT {POSITION_COLUMNS} FROM positions p ORDER BY p.id");
        let rows: Vec<PositionRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        rows.into_iter().map(decode_position).collect()
    }

    async fn find_by_strings(
        &self,
        strings: &[&str],
        player: Sign,
    ) -> Result<Vec<PositionCandidate>, PersistenceError> {
        if strings.is_empty() {
            return Ok(Vec::new());
        }

        // One statement, so the scan over all variants sees a single snapshot.
        let placeholders = vec!["?"; strings.len()].join(", ");
        let sql = format!(
            "SELECT {POSITION_COLUMNS}, d.board_columns, d.board_rows \
             FROM positions p \
             JOIN board_dimensions d ON d.id = p.board_dimension_id \
             WHERE p.player = ? AND p.position IN ({placeholders}) \
             ORDER BY p.id"
        );

        let mut query = sqlx::query(&sql).bind(encode_sign(player));
        for s in strings {
            query = query.bind(*s);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| -> Result<PositionCandidate, PersistenceError> {
                let position: PositionRow = (
                    row.try_get(0)?,
                    row.try_get(1)?,
                    row.try_get(2)?,
                    row.try_get(3)?,
                    row.try_get(4)?,
                    row.try_get(5)?,
                    row.try_get(6)?,
                    row.try_get(7)?,
                    row.try_get(8)?,
                    row.try_get(9)?,
                );
                let width: i64 = row.try_get(10)?;
                let height: i64 = row.try_get(11)?;
                Ok(PositionCandidate {
                    position: decode_position(position)?,
                    width: decode_dimension("columns", width)? as usize,
                    height: decode_dimension("rows", height)? as usize,
                })
            })
            .collect()
    }

    async fn add_position(&self, position: &NewPosition) -> Result<PositionId, PersistenceError> {
        let inserted: Option<(i64,)> = sqlx::query_as(
            "INSERT INTO positions \
             (board_dimension_id, position, canonical_key, ko_x, ko_y, player) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(player, canonical_key) DO NOTHING \
             RETURNING id",
        )
        .bind(position.board_dimension_id)
        .bind(&position.position)
        .bind(&position.canonical_key)
        .bind(i64::from(position.ko.x))
        .bind(i64::from(position.ko.y))
        .bind(encode_sign(position.player))
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some((id,)) => Ok(id),
            None => {
                tracing::warn!(
                    canonical_key = %position.canonical_key,
                    "Position already stored under its canonical key"
                );
                self.find_by_canonical_key(position.player, &position.canonical_key)
                    .await?
                    .ok_or_else(|| {
                        PersistenceError::InvalidRecord(format!(
                            "position with key {} vanished",
                            position.canonical_key
                        ))
                    })
            }
        }
    }

    async fn update_position_data(
        &self,
        id: PositionId,
        comments: Option<&str>,
        evaluation: Option<&str>,
        tag: Option<&str>,
    ) -> Result<bool, PersistenceError> {
        let result = sqlx::query(
            "UPDATE positions SET \
             comments = COALESCE(?, comments), \
             evaluation = COALESCE(?, evaluation), \
             tag = COALESCE(?, tag) \
             WHERE id = ?",
        )
        .bind(comments)
        .bind(evaluation)
        .bind(tag)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_position(&self, id: PositionId) -> Result<(), PersistenceError> {
        sqlx::query("DELETE FROM positions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
