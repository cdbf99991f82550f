//! SQLite-backed implementation of [`MoveRepository`].

use goban::Sign;
use sqlx::SqlitePool;

use super::helpers::{decode_move, decode_moves, encode_sign, MoveRow, MOVE_COLUMNS};
use crate::persistence::traits::MoveRepository;
use crate::persistence::{MoveId, MoveRecord, NewMove, PersistenceError, PositionId};

/// SQLite implementation of [`MoveRepository`].
pub struct SqliteMoveRepository {
    pool: SqlitePool,
}

impl SqliteMoveRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl MoveRepository for SqliteMoveRepository {
    async fn get_move(&self, id: MoveId) -> Result<Option<MoveRecord>, PersistenceError> {
        let sql = format!("SELECT {MOVE_COLUMNS} FROM moves m WHERE m.id = ?");
        let row: Option<MoveRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(decode_move).transpose()
    }

    async fn list_moves(&self, player: Option<Sign>) -> Result<Vec<MoveRecord>, PersistenceError> {
        let sql = format!(
            "SELECT {MOVE_COLUMNS} FROM moves m \
             JOIN positions p ON p.id = m.position_id \
             WHERE (?1 IS NULL OR p.player = ?1) \
             ORDER BY m.id"
        );
        let rows: Vec<MoveRow> = sqlx::query_as(&sql)
            .bind(player.map(encode_sign))
            .fetch_all(&self.pool)
            .await?;

        decode_moves(rows)
    }

    async fn moves_from(
        &self,
        previous_position_id: Option<PositionId>,
    ) -> Result<Vec<MoveRecord>, PersistenceError> {
        let sql = format!(
            "SELECT {MOVE_COLUMNS} FROM moves m \
             WHERE m.previous_position_id IS ? \
             ORDER BY m.id"
        );
        let rows: Vec<MoveRow> = sqlx::query_as(&sql)
            .bind(previous_position_id)
            .fetch_all(&self.pool)
            .await?;

        decode_moves(rows)
    }

    async fn moves_to(&self, position_id: PositionId) -> Result<Vec<MoveRecord>, PersistenceError> {
        let sql = format!(
            "SELECT {MOVE_COLUMNS} FROM moves m WHERE m.position_id = ? ORDER BY m.id"
        );
        let rows: Vec<MoveRow> = sqlx::query_as(&sql)
            .bind(position_id)
            .fetch_all(&self.pool)
            .await?;

        decode_moves(rows)
    }

    async fn find_edge(
        &self,
        previous_position_id: Option<PositionId>,
        position_id: PositionId,
    ) -> Result<Option<MoveRecord>, PersistenceError> {
        let sql = format!(
            "SELECT {MOVE_COLUMNS} FROM moves m \
             WHERE m.previous_position_id IS ? AND m.position_id = ? \
             ORDER BY m.id LIMIT 1"
        );
        let row: Option<MoveRow> = sqlx::query_as(&sql)
            .bind(previous_position_id)
            .bind(position_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(decode_move).transpose()
    }

    async fn add_move(&self, new_move: &NewMove) -> Result<MoveId, PersistenceError> {
        let inserted: Option<(i64,)> = sqlx::query_as(
            "INSERT INTO moves \
             (point_x, point_y, position_id, previous_position_id, deck, next_session_timestamp) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT DO NOTHING \
             RETURNING id",
        )
        .bind(i64::from(new_move.point.x))
        .bind(i64::from(new_move.point.y))
        .bind(new_move.position_id)
        .bind(new_move.previous_position_id)
        .bind(i64::from(new_move.deck))
        .bind(new_move.next_session_timestamp)
        .fetch_optional(&self.pool)
        .await?;

        if let Some((id,)) = inserted {
            return Ok(id);
        }

        self.find_edge(new_move.previous_position_id, new_move.position_id)
            .await?
            .map(|m| m.id)
            .ok_or_else(|| {
                PersistenceError::InvalidRecord(format!(
                    "move {:?} -> {} vanished",
                    new_move.previous_position_id, new_move.position_id
                ))
            })
    }

    async fn update_move(&self, record: &MoveRecord) -> Result<(), PersistenceError> {
        sqlx::query(
            "UPDATE moves SET \
             comments = ?, deck = ?, next_session_timestamp = ?, \
             number_of_attempts = ?, number_of_successes = ? \
             WHERE id = ?",
        )
        .bind(&record.comments)
        .bind(i64::from(record.deck))
        .bind(record.next_session_timestamp)
        .bind(i64::from(record.number_of_attempts))
        .bind(i64::from(record.number_of_successes))
        .bind(record.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_move(&self, id: MoveId) -> Result<(), PersistenceError> {
        sqlx::query("DELETE FROM moves WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn due_moves(
        &self,
        current_deck: u8,
        until_ms: i64,
        player: Option<Sign>,
    ) -> Result<Vec<MoveRecord>, PersistenceError> {
        let sql = format!(
            "SELECT {MOVE_COLUMNS} FROM moves m \
             JOIN positions p ON p.id = m.position_id \
             WHERE (m.deck = ?1 OR m.next_session_timestamp <= ?2) \
               AND (?3 IS NULL OR p.player = ?3) \
             ORDER BY m.next_session_timestamp, m.id"
        );
        let rows: Vec<MoveRow> = sqlx::query_as(&sql)
            .bind(i64::from(current_deck))
            .bind(until_ms)
            .bind(player.map(encode_sign))
            .fetch_all(&self.pool)
            .await?;

        decode_moves(rows)
    }
}
