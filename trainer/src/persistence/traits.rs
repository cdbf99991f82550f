//! Async repository trait definitions for the persistence layer.
//!
//! Each trait abstracts over one table of the repertoire so the service can be
//! driven by any backend via static dispatch (generic service types).
//!
//! Methods return `impl Future + Send` rather than using `async fn` so that
//! the futures are guaranteed `Send` and can be moved onto `tokio::spawn`.
//!
//! No locks are taken here. Single get/put operations are atomic; callers
//! serialize read-modify-write sequences on the same move.

use super::{
    BoardDimension, BoardDimensionId, MoveId, MoveRecord, NewMove, NewPosition, PersistenceError,
    PositionCandidate, PositionId, PositionRecord,
};
use goban::Sign;
use std::future::Future;

/// Repository for board sizes, keyed by `(rows, columns)`.
pub trait BoardDimensionRepository: Send + Sync {
    fn find_dimension(
        &self,
        rows: u32,
        columns: u32,
    ) -> impl Future<Output = Result<Option<BoardDimension>, PersistenceError>> + Send;
    fn get_dimension(
        &self,
        id: BoardDimensionId,
    ) -> impl Future<Output = Result<Option<BoardDimension>, PersistenceError>> + Send;
    /// Insert a size, returning the existing id if it is already known.
    fn add_dimension(
        &self,
        rows: u32,
        columns: u32,
    ) -> impl Future<Output = Result<BoardDimensionId, PersistenceError>> + Send;
}

/// Repository for positions.
///
/// Implementations must enforce uniqueness of `(player, canonical_key)`.
pub trait PositionRepository: Send + Sync {
    fn get_position(
        &self,
        id: PositionId,
    ) -> impl Future<Output = Result<Option<PositionRecord>, PersistenceError>> + Send;
    fn list_positions(
        &self,
    ) -> impl Future<Output = Result<Vec<PositionRecord>, PersistenceError>> + Send;
    /// Every position whose string is one of `strings`, ordered by id.
    ///
    /// Must read a single consistent snapshot.
    fn find_by_strings(
        &self,
        strings: &[&str],
        player: Sign,
    ) -> impl Future<Output = Result<Vec<PositionCandidate>, PersistenceError>> + Send;
    /// Insert a position. On a canonical-key conflict the existing id is
    /// returned and nothing is written.
    fn add_position(
        &self,
        position: &NewPosition,
    ) -> impl Future<Output = Result<PositionId, PersistenceError>> + Send;
    /// Returns `false` if no such position exists.
    fn update_position_data(
        &self,
        id: PositionId,
        comments: Option<&str>,
        evaluation: Option<&str>,
        tag: Option<&str>,
    ) -> impl Future<Output = Result<bool, PersistenceError>> + Send;
    fn delete_position(
        &self,
        id: PositionId,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}

/// Repository for move edges and their scheduling state.
pub trait MoveRepository: Send + Sync {
    fn get_move(
        &self,
        id: MoveId,
    ) -> impl Future<Output = Result<Option<MoveRecord>, PersistenceError>> + Send;
    /// All moves, optionally restricted to those whose resulting position has
    /// `player` to move.
    fn list_moves(
        &self,
        player: Option<Sign>,
    ) -> impl Future<Output = Result<Vec<MoveRecord>, PersistenceError>> + Send;
    /// Moves leaving `previous_position_id` (`None` = opening moves).
    fn moves_from(
        &self,
        previous_position_id: Option<PositionId>,
    ) -> impl Future<Output = Result<Vec<MoveRecord>, PersistenceError>> + Send;
    /// Moves arriving at `position_id`.
    fn moves_to(
        &self,
        position_id: PositionId,
    ) -> impl Future<Output = Result<Vec<MoveRecord>, PersistenceError>> + Send;
    fn find_edge(
        &self,
        previous_position_id: Option<PositionId>,
        position_id: PositionId,
    ) -> impl Future<Output = Result<Option<MoveRecord>, PersistenceError>> + Send;
    /// Insert a move. If the `(previous, position)` edge already exists its
    /// id is returned and nothing is written.
    fn add_move(
        &self,
        new_move: &NewMove,
    ) -> impl Future<Output = Result<MoveId, PersistenceError>> + Send;
    /// Overwrite the mutable fields of an existing move.
    fn update_move(
        &self,
        record: &MoveRecord,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;
    fn delete_move(&self, id: MoveId)
        -> impl Future<Output = Result<(), PersistenceError>> + Send;
    /// Moves in `current_deck` or scheduled at or before `until_ms`.
    fn due_moves(
        &self,
        current_deck: u8,
        until_ms: i64,
        player: Option<Sign>,
    ) -> impl Future<Output = Result<Vec<MoveRecord>, PersistenceError>> + Send;
}
