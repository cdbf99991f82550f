//! The repertoire service: positions up to symmetry, the moves played from
//! them, and their review schedule.
//!
//! Positions are stored once per symmetry class. Every operation that takes a
//! [`Board`](goban::Board) resolves the transformation between the board as
//! given and the stored orientation, and returns coordinates in the caller's
//! orientation.

mod moves;
mod positions;
mod training;

#[cfg(test)]
pub(crate) mod test_support;

pub use moves::{RemovedLine, SavedMove};
pub use positions::StoredMatch;

use std::sync::Arc;

use goban::{BoardError, Sign};

use crate::clock::{Clock, SystemClock};
use crate::persistence::sqlite::{
    Database, SqliteBoardDimensionRepository, SqliteMoveRepository, SqlitePositionRepository,
};
use crate::persistence::traits::{BoardDimensionRepository, MoveRepository, PositionRepository};
use crate::persistence::{MoveId, PersistenceError, PositionId};

/// Errors surfaced to callers of [`Repertoire`].
#[derive(Debug, thiserror::Error)]
pub enum RepertoireError {
    #[error("Move with id {0} not found")]
    MoveNotFound(MoveId),
    #[error("Position with id {0} not found")]
    PositionNotFound(PositionId),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Configuration for the repertoire service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepertoireConfig {
    /// Only schedule moves leading to positions with this player to move.
    /// `Sign::Empty` trains both colors.
    pub player_focus: Sign,
}

impl RepertoireConfig {
    fn focus(&self) -> Option<Sign> {
        (self.player_focus != Sign::Empty).then_some(self.player_focus)
    }
}

/// Application-facing operations over the three repositories.
///
/// Read-modify-write sequences on one move (training, comments) are not
/// guarded here; callers run one training session at a time.
pub struct Repertoire<B, P, M> {
    boards: B,
    positions: P,
    moves: M,
    config: RepertoireConfig,
    clock: Arc<dyn Clock>,
}

pub type SqliteRepertoire =
    Repertoire<SqliteBoardDimensionRepository, SqlitePositionRepository, SqliteMoveRepository>;

impl<B, P, M> Repertoire<B, P, M>
where
    B: BoardDimensionRepository,
    P: PositionRepository,
    M: MoveRepository,
{
    pub fn new(boards: B, positions: P, moves: M, config: RepertoireConfig) -> Self {
        Self {
            boards,
            positions,
            moves,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall clock, e.g. with a [`FixedClock`](crate::clock::FixedClock).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &RepertoireConfig {
        &self.config
    }
}

impl SqliteRepertoire {
    pub fn from_database(db: &Database, config: RepertoireConfig) -> Self {
        let pool = db.pool();
        Self::new(
            SqliteBoardDimensionRepository::new(pool.clone()),
            SqlitePositionRepository::new(pool.clone()),
            SqliteMoveRepository::new(pool.clone()),
            config,
        )
    }
}
