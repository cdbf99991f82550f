//! Shared encode/decode helpers for SQLite ↔ domain type conversions.
//!
//! Rows are fetched as plain tuples and turned into records here, so every
//! repository reads columns in the same order as the `*_COLUMNS` constants.

use goban::{Sign, Vertex};

use crate::persistence::{MoveRecord, PersistenceError, PositionRecord};

pub(crate) const POSITION_COLUMNS: &str = "p.id, p.board_dimension_id, p.position, \
     p.canonical_key, p.ko_x, p.ko_y, p.player, p.comments, p.evaluation, p.tag";

pub(crate) type PositionRow = (
    i64,
    i64,
    String,
    String,
    i64,
    i64,
    i64,
    String,
    String,
    String,
);

pub(crate) const MOVE_COLUMNS: &str = "m.id, m.point_x, m.point_y, m.position_id, \
     m.previous_position_id, m.comments, m.deck, m.next_session_timestamp, \
     m.number_of_attempts, m.number_of_successes";

pub(crate) type MoveRow = (
    i64,
    i64,
    i64,
    i64,
    Option<i64>,
    String,
    i64,
    i64,
    i64,
    i64,
);

// ── Sign ───────────────────────────────────────────────────────────────

pub fn encode_sign(sign: Sign) -> i64 {
    i64::from(sign.value())
}

pub fn decode_sign(value: i64) -> Result<Sign, PersistenceError> {
    i8::try_from(value)
        .ok()
        .and_then(|v| Sign::from_value(v).ok())
        .ok_or_else(|| PersistenceError::InvalidRecord(format!("player {value}")))
}

// ── Vertex ─────────────────────────────────────────────────────────────

pub fn decode_vertex(x: i64, y: i64) -> Result<Vertex, PersistenceError> {
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => Ok(Vertex::new(x, y)),
        _ => Err(PersistenceError::InvalidRecord(format!("vertex ({x}, {y})"))),
    }
}

// ── Counters ───────────────────────────────────────────────────────────

fn decode_u8(name: &str, value: i64) -> Result<u8, PersistenceError> {
    u8::try_from(value).map_err(|_| PersistenceError::InvalidRecord(format!("{name} {value}")))
}

fn decode_u32(name: &str, value: i64) -> Result<u32, PersistenceError> {
    u32::try_from(value).map_err(|_| PersistenceError::InvalidRecord(format!("{name} {value}")))
}

pub fn decode_dimension(name: &str, value: i64) -> Result<u32, PersistenceError> {
    decode_u32(name, value)
}

// ── Rows ───────────────────────────────────────────────────────────────

pub fn decode_position(row: PositionRow) -> Result<PositionRecord, PersistenceError> {
    let (id, board_dimension_id, position, canonical_key, ko_x, ko_y, player, comments, evaluation, tag) =
        row;
    Ok(PositionRecord {
        id,
        board_dimension_id,
        position,
        canonical_key,
        ko: decode_vertex(ko_x, ko_y)?,
        player: decode_sign(player)?,
        comments,
        evaluation,
        tag,
        candidate_moves: Vec::new(),
    })
}

pub fn decode_move(row: MoveRow) -> Result<MoveRecord, PersistenceError> {
    let (
        id,
        point_x,
        point_y,
        position_id,
        previous_position_id,
        comments,
        deck,
        next_session_timestamp,
        number_of_attempts,
        number_of_successes,
    ) = row;
    Ok(MoveRecord {
        id,
        point: decode_vertex(point_x, point_y)?,
        position_id,
        previous_position_id,
        comments,
        deck: decode_u8("deck", deck)?,
        next_session_timestamp,
        number_of_attempts: decode_u32("number_of_attempts", number_of_attempts)?,
        number_of_successes: decode_u32("number_of_successes", number_of_successes)?,
    })
}

pub fn decode_moves(rows: Vec<MoveRow>) -> Result<Vec<MoveRecord>, PersistenceError> {
    rows.into_iter().map(decode_move).collect()
}
