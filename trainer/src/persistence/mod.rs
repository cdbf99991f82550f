//! Storage records and repository traits for the repertoire.
//!
//! The service layer only talks to the traits in [`traits`]; [`sqlite`] is the
//! shipped backend.

pub mod sqlite;
pub mod traits;

use goban::{Sign, Vertex};
use serde::{Deserialize, Serialize};

pub type BoardDimensionId = i64;
pub type PositionId = i64;
pub type MoveId = i64;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(String),
    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
}

/// A board size. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDimension {
    pub id: BoardDimensionId,
    pub rows: u32,
    pub columns: u32,
}

/// A stored position, in the orientation it was first saved in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub id: PositionId,
    pub board_dimension_id: BoardDimensionId,
    pub position: String,
    #[serde(skip)]
    pub canonical_key: String,
    /// Ko point in the stored orientation, [`Vertex::PASS`] if none.
    pub ko: Vertex,
    /// The color to move.
    pub player: Sign,
    pub comments: String,
    pub evaluation: String,
    pub tag: String,
    /// Moves leaving this position. Never persisted, filled on read.
    #[serde(default)]
    pub candidate_moves: Vec<MoveRecord>,
}

/// A stored position together with the dimensions of its stored orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionCandidate {
    pub position: PositionRecord,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPosition {
    pub board_dimension_id: BoardDimensionId,
    pub position: String,
    pub canonical_key: String,
    pub ko: Vertex,
    pub player: Sign,
}

/// A move edge between two positions plus its Leitner scheduling state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub id: MoveId,
    /// Relative to the stored orientation of the previous position.
    pub point: Vertex,
    pub position_id: PositionId,
    /// `None` for an opening move.
    pub previous_position_id: Option<PositionId>,
    pub comments: String,
    pub deck: u8,
    /// Milliseconds since the unix epoch.
    pub next_session_timestamp: i64,
    pub number_of_attempts: u32,
    pub number_of_successes: u32,
}

impl MoveRecord {
    /// The previous position id with `0` standing in for "no previous position".
    pub fn previous_position_id_or_zero(&self) -> PositionId {
        self.previous_position_id.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMove {
    pub point: Vertex,
    pub position_id: PositionId,
    pub previous_position_id: Option<PositionId>,
    pub deck: u8,
    pub next_session_timestamp: i64,
}
