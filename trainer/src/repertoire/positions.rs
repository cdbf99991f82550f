//! Position lookup and storage up to symmetry.

use std::collections::{HashSet, VecDeque};

use goban::{canonical_key, Board, PositionStrings, Sign, Transformation};

use super::{Repertoire, RepertoireError};
use crate::persistence::traits::{BoardDimensionRepository, MoveRepository, PositionRepository};
use crate::persistence::{BoardDimensionId, NewPosition, PositionId, PositionRecord};

/// A stored position matching a query board.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMatch {
    pub position: PositionRecord,
    /// Maps the query board onto the stored orientation: `stored = t(board)`.
    pub transformation: Transformation,
}

impl<B, P, M> Repertoire<B, P, M>
where
    B: BoardDimensionRepository,
    P: PositionRepository,
    M: MoveRepository,
{
    /// Find the stored position equal to `board` up to symmetry, with the same
    /// player to move and the same ko once mapped into the stored orientation.
    pub async fn find_stored_position(
        &self,
        board: &Board,
        player: Sign,
    ) -> Result<Option<StoredMatch>, RepertoireError> {
        let strings = PositionStrings::of(board);
        self.find_with_strings(board, &strings, player).await
    }

    pub(super) async fn find_with_strings(
        &self,
        board: &Board,
        strings: &PositionStrings,
        player: Sign,
    ) -> Result<Option<StoredMatch>, RepertoireError> {
        let candidates = self
            .positions
            .find_by_strings(&strings.distinct(), player)
            .await?;

        let (width, height) = (board.width(), board.height());
        let ko = board.effective_ko(player);

        let mut matches = candidates.into_iter().filter_map(|candidate| {
            let transformation = strings.matching(&candidate.position.position).find(|t| {
                t.output_dimensions(width, height) == (candidate.width, candidate.height)
                    && t.apply_to_point(ko, width, height) == candidate.position.ko
            })?;
            Some(StoredMatch {
                position: candidate.position,
                transformation,
            })
        });

        let first = matches.next();
        let extra = matches.count();
        if let Some(found) = &first {
            if extra > 0 {
                tracing::warn!(
                    position_id = found.position.id,
                    extra,
                    "Several stored positions match one board, using the first"
                );
            }
            tracing::debug!(
                position_id = found.position.id,
                transformation = %found.transformation,
                "Matched stored position"
            );
        }
        Ok(first)
    }

    async fn dimension_id(&self, board: &Board) -> Result<BoardDimensionId, RepertoireError> {
        let rows = board.height() as u32;
        let columns = board.width() as u32;
        match self.boards.find_dimension(rows, columns).await? {
            Some(dimension) => Ok(dimension.id),
            None => Ok(self.boards.add_dimension(rows, columns).await?),
        }
    }

    /// Resolve `board` to a stored position, inserting it in the board's own
    /// orientation if no symmetric variant is stored yet.
    pub(super) async fn resolve_position(
        &self,
        board: &Board,
        player: Sign,
    ) -> Result<(PositionId, Transformation), RepertoireError> {
        let dimension_id = self.dimension_id(board).await?;
        let strings = PositionStrings::of(board);

        if let Some(found) = self.find_with_strings(board, &strings, player).await? {
            return Ok((found.position.id, found.transformation));
        }

        let new_position = NewPosition {
            board_dimension_id: dimension_id,
            position: strings.original().to_string(),
            canonical_key: canonical_key(board, player),
            ko: board.effective_ko(player),
            player,
        };
        let id = self.positions.add_position(&new_position).await?;
        tracing::info!(
            position_id = id,
            player = %player,
            width = board.width(),
            height = board.height(),
            "Stored new position"
        );
        Ok((id, Transformation::Original))
    }

    /// Store `board` unless a symmetric variant is already stored. Idempotent.
    pub async fn save_position(
        &self,
        board: &Board,
        player: Sign,
    ) -> Result<PositionId, RepertoireError> {
        let (id, _) = self.resolve_position(board, player).await?;
        Ok(id)
    }

    /// The stored position for `board` expressed in `board`'s orientation:
    /// candidate moves and ko are mapped back from the stored orientation and
    /// `position` is the board's own encoding.
    pub async fn get_position_from_board(
        &self,
        board: &Board,
        player: Sign,
    ) -> Result<Option<PositionRecord>, RepertoireError> {
        let strings = PositionStrings::of(board);
        let Some(StoredMatch {
            mut position,
            transformation,
        }) = self.find_with_strings(board, &strings, player).await?
        else {
            return Ok(None);
        };

        let to_board = Transformation::relative(transformation, Transformation::Original);
        let (stored_width, stored_height) =
            transformation.output_dimensions(board.width(), board.height());

        position.candidate_moves = self
            .moves
            .moves_from(Some(position.id))
            .await?
            .into_iter()
            .map(|mut candidate| {
                candidate.point =
                    to_board.apply_to_point(candidate.point, stored_width, stored_height);
                candidate
            })
            .collect();
        position.ko = to_board.apply_to_point(position.ko, stored_width, stored_height);
        position.position = strings.original().to_string();

        Ok(Some(position))
    }

    /// A position in its stored orientation.
    pub async fn get_position_by_id(
        &self,
        id: PositionId,
        with_candidate_moves: bool,
    ) -> Result<Option<PositionRecord>, RepertoireError> {
        let Some(mut position) = self.positions.get_position(id).await? else {
            return Ok(None);
        };
        if with_candidate_moves {
            position.candidate_moves = self.moves.moves_from(Some(id)).await?;
        }
        Ok(Some(position))
    }

    pub async fn list_positions(&self) -> Result<Vec<PositionRecord>, RepertoireError> {
        Ok(self.positions.list_positions().await?)
    }

    /// Update the annotations of a position. `None` leaves a field unchanged.
    pub async fn update_position_data(
        &self,
        id: PositionId,
        comments: Option<&str>,
        evaluation: Option<&str>,
        tag: Option<&str>,
    ) -> Result<(), RepertoireError> {
        if !self
            .positions
            .update_position_data(id, comments, evaluation, tag)
            .await?
        {
            return Err(RepertoireError::PositionNotFound(id));
        }
        Ok(())
    }

    /// Number of distinct positions reachable from `board` through stored
    /// moves, the start position included. Zero if `board` is not stored.
    pub async fn count_reachable_positions(
        &self,
        board: &Board,
        player: Sign,
    ) -> Result<usize, RepertoireError> {
        let Some(start) = self.find_stored_position(board, player).await? else {
            return Ok(0);
        };

        let mut seen = HashSet::from([start.position.id]);
        let mut queue = VecDeque::from([start.position.id]);
        while let Some(id) = queue.pop_front() {
            for next in self.moves.moves_from(Some(id)).await? {
                if seen.insert(next.position_id) {
                    queue.push_back(next.position_id);
                }
            }
        }
        Ok(seen.len())
    }
}
