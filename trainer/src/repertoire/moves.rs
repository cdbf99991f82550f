//! Recording moves between positions and pruning lines.

use std::collections::HashSet;

use goban::{Board, Sign, Vertex};
use serde::Serialize;

use super::{Repertoire, RepertoireError};
use crate::leitner::CURRENT_DECK;
use crate::persistence::traits::{BoardDimensionRepository, MoveRepository, PositionRepository};
use crate::persistence::{MoveId, MoveRecord, NewMove, PositionId};

/// Ids resolved by [`Repertoire::save_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SavedMove {
    pub position_id: PositionId,
    pub move_id: MoveId,
}

/// Everything deleted by [`Repertoire::remove_line`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemovedLine {
    pub moves: Vec<MoveId>,
    pub positions: Vec<PositionId>,
}

impl<B, P, M> Repertoire<B, P, M>
where
    B: BoardDimensionRepository,
    P: PositionRepository,
    M: MoveRepository,
{
    /// Record that `vertex` was played on `previous`, producing `board` with
    /// `player` to move.
    ///
    /// Both positions are resolved up to symmetry and created when missing.
    /// `vertex` is stored relative to the stored orientation of the previous
    /// position. Replaying a known edge returns the existing move unchanged.
    pub async fn save_move(
        &self,
        vertex: Vertex,
        board: &Board,
        player: Sign,
        previous: Option<&Board>,
    ) -> Result<SavedMove, RepertoireError> {
        let (position_id, _) = self.resolve_position(board, player).await?;

        let (previous_position_id, point) = match previous {
            Some(previous) => {
                let (id, transformation) =
                    self.resolve_position(previous, player.opponent()).await?;
                let point =
                    transformation.apply_to_point(vertex, previous.width(), previous.height());
                (Some(id), point)
            }
            None => (None, vertex),
        };

        if let Some(existing) = self
            .moves
            .find_edge(previous_position_id, position_id)
            .await?
        {
            tracing::debug!(move_id = existing.id, "Move already stored");
            return Ok(SavedMove {
                position_id,
                move_id: existing.id,
            });
        }

        let new_move = NewMove {
            point,
            position_id,
            previous_position_id,
            deck: CURRENT_DECK,
            next_session_timestamp: self.clock.now().timestamp_millis(),
        };
        let move_id = self.moves.add_move(&new_move).await?;
        tracing::info!(
            move_id,
            position_id,
            previous_position_id = ?previous_position_id,
            point = %point,
            "Stored new move"
        );
        Ok(SavedMove {
            position_id,
            move_id,
        })
    }

    /// Delete a move and, when it was the only way to reach its resulting
    /// position, that position and every line continuing from it.
    ///
    /// Positions still reachable through another move are kept. Removing an
    /// unknown move is a no-op.
    pub async fn remove_line(&self, move_id: MoveId) -> Result<RemovedLine, RepertoireError> {
        let mut removed = RemovedLine::default();
        let mut visited = HashSet::new();
        let mut stack = vec![move_id];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(record) = self.moves.get_move(id).await? else {
                continue;
            };

            let incoming = self.moves.moves_to(record.position_id).await?;
            if incoming.len() == 1 && !removed.positions.contains(&record.position_id) {
                removed.positions.push(record.position_id);
                let outgoing = self.moves.moves_from(Some(record.position_id)).await?;
                stack.extend(outgoing.iter().map(|next| next.id).rev());
            }

            self.moves.delete_move(id).await?;
            removed.moves.push(id);
        }

        // Every move touching an orphaned position is gone by now.
        for &position_id in &removed.positions {
            self.positions.delete_position(position_id).await?;
        }

        tracing::info!(
            move_id,
            moves = removed.moves.len(),
            positions = removed.positions.len(),
            "Removed line"
        );
        Ok(removed)
    }

    /// Moves leaving a position, in its stored orientation.
    pub async fn get_moves_by_position_id(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<MoveRecord>, RepertoireError> {
        Ok(self.moves.moves_from(Some(position_id)).await?)
    }

    /// Moves arriving at a position.
    pub async fn get_moves_to_reach_position_id(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<MoveRecord>, RepertoireError> {
        Ok(self.moves.moves_to(position_id).await?)
    }

    pub async fn get_move_by_edge(
        &self,
        previous_position_id: Option<PositionId>,
        position_id: PositionId,
    ) -> Result<Option<MoveRecord>, RepertoireError> {
        Ok(self
            .moves
            .find_edge(previous_position_id, position_id)
            .await?)
    }

    /// All moves, filtered by the configured player focus.
    pub async fn list_moves(&self) -> Result<Vec<MoveRecord>, RepertoireError> {
        Ok(self.moves.list_moves(self.config.focus()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::repertoire::test_support::{board, count, harness, harness_with};
    use crate::repertoire::RepertoireConfig;
    use goban::Transformation;

    #[tokio::test]
    async fn test_opening_move_without_previous_board() {
        let h = harness().await;
        let after = board(9, &[(4, 4, Sign::Black)]);

        let saved = h
            .repertoire
            .save_move(Vertex::new(4, 4), &after, Sign::White, None)
            .await
            .unwrap();
        assert_eq!(count(&h.db, "positions").await, 1);
        assert_eq!(count(&h.db, "moves").await, 1);

        let record = h
            .repertoire
            .get_move_by_edge(None, saved.position_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.id, saved.move_id);
        assert_eq!(record.previous_position_id, None);
        assert_eq!(record.previous_position_id_or_zero(), 0);
        assert_eq!(record.point, Vertex::new(4, 4));
        assert_eq!(record.deck, CURRENT_DECK);
        assert_eq!(record.number_of_attempts, 0);
        assert_eq!(
            record.next_session_timestamp,
            h.clock.now().timestamp_millis()
        );

        // Same stone seen rotated is the same edge.
        let again = h
            .repertoire
            .save_move(
                Vertex::new(4, 4),
                &after.transformed(Transformation::Rot90),
                Sign::White,
                None,
            )
            .await
            .unwrap();
        assert_eq!(again, saved);
        assert_eq!(count(&h.db, "moves").await, 1);
    }

    #[tokio::test]
    async fn test_symmetric_moves_share_one_edge() {
        let h = harness().await;
        let empty = board(9, &[]);
        let after = board(9, &[(2, 3, Sign::Black)]);
        let saved = h
            .repertoire
            .save_move(Vertex::new(2, 3), &after, Sign::White, Some(&empty))
            .await
            .unwrap();

        let rotated = after.transformed(Transformation::Rot180);
        assert_eq!(rotated.get(Vertex::new(6, 5)), Some(Sign::Black));
        let again = h
            .repertoire
            .save_move(Vertex::new(6, 5), &rotated, Sign::White, Some(&empty))
            .await
            .unwrap();

        assert_eq!(again, saved);
        assert_eq!(count(&h.db, "positions").await, 2);
        assert_eq!(count(&h.db, "moves").await, 1);
    }

    #[tokio::test]
    async fn test_point_stored_in_previous_orientation() {
        let h = harness().await;
        let previous = board(9, &[(6, 5, Sign::White)]);
        let previous_id = h
            .repertoire
            .save_position(&previous, Sign::Black)
            .await
            .unwrap();

        // Play the same move on a mirrored view of the previous position.
        let t = Transformation::Mirror;
        let view = previous.transformed(t);
        let vertex = t.apply_to_point(Vertex::new(2, 3), 9, 9);
        let mut after = view.clone();
        after.set(vertex, Sign::Black);

        let saved = h
            .repertoire
            .save_move(vertex, &after, Sign::White, Some(&view))
            .await
            .unwrap();
        let moves = h
            .repertoire
            .get_moves_by_position_id(previous_id)
            .await
            .unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].id, saved.move_id);
        assert_eq!(moves[0].point, Vertex::new(2, 3));

        let reaching = h
            .repertoire
            .get_moves_to_reach_position_id(saved.position_id)
            .await
            .unwrap();
        assert_eq!(reaching.len(), 1);
        assert_eq!(reaching[0].previous_position_id, Some(previous_id));
    }

    #[tokio::test]
    async fn test_remove_line_cascades_through_orphans() {
        let h = harness().await;
        let empty = board(9, &[]);
        let a = board(9, &[(2, 2, Sign::Black)]);
        let b = board(9, &[(2, 2, Sign::Black), (6, 6, Sign::White)]);
        let c = board(9, &[(2, 2, Sign::Black), (6, 6, Sign::White), (2, 6, Sign::Black)]);

        let first = h
            .repertoire
            .save_move(Vertex::new(2, 2), &a, Sign::White, Some(&empty))
            .await
            .unwrap();
        let second = h
            .repertoire
            .save_move(Vertex::new(6, 6), &b, Sign::Black, Some(&a))
            .await
            .unwrap();
        let third = h
            .repertoire
            .save_move(Vertex::new(2, 6), &c, Sign::White, Some(&b))
            .await
            .unwrap();
        assert_eq!(count(&h.db, "positions").await, 4);

        let removed = h.repertoire.remove_line(first.move_id).await.unwrap();
        assert_eq!(
            removed.moves,
            vec![first.move_id, second.move_id, third.move_id]
        );
        assert_eq!(
            removed.positions,
            vec![first.position_id, second.position_id, third.position_id]
        );
        assert_eq!(count(&h.db, "moves").await, 0);
        // The starting position has no incoming move and stays.
        assert_eq!(count(&h.db, "positions").await, 1);
    }

    #[tokio::test]
    async fn test_remove_line_keeps_transpositions() {
        let h = harness().await;
        let empty = board(9, &[]);
        let a = board(9, &[(2, 3, Sign::Black)]);
        let b = board(9, &[(2, 3, Sign::Black), (6, 6, Sign::White)]);
        let other_a = board(9, &[(4, 2, Sign::Black)]);
        let other_b = board(9, &[(4, 2, Sign::Black), (6, 6, Sign::White)]);
        let joined = board(
            9,
            &[(2, 3, Sign::Black), (6, 6, Sign::White), (4, 2, Sign::Black)],
        );

        let line = [
            (Vertex::new(2, 3), &a, Sign::White, &empty),
            (Vertex::new(6, 6), &b, Sign::Black, &a),
            (Vertex::new(4, 2), &joined, Sign::White, &b),
        ];
        let mut saved = Vec::new();
        for (vertex, after, player, before) in line {
            saved.push(
                h.repertoire
                    .save_move(vertex, after, player, Some(before))
                    .await
                    .unwrap(),
            );
        }
        h.repertoire
            .save_move(Vertex::new(4, 2), &other_a, Sign::White, Some(&empty))
            .await
            .unwrap();
        h.repertoire
            .save_move(Vertex::new(6, 6), &other_b, Sign::Black, Some(&other_a))
            .await
            .unwrap();
        let transposed = h
            .repertoire
            .save_move(Vertex::new(2, 3), &joined, Sign::White, Some(&other_b))
            .await
            .unwrap();
        assert_eq!(transposed.position_id, saved[2].position_id);

        let removed = h.repertoire.remove_line(saved[0].move_id).await.unwrap();
        assert_eq!(
            removed.moves,
            saved.iter().map(|s| s.move_id).collect::<Vec<_>>()
        );
        assert_eq!(
            removed.positions,
            vec![saved[0].position_id, saved[1].position_id]
        );

        let survivor = h
            .repertoire
            .get_moves_to_reach_position_id(transposed.position_id)
            .await
            .unwrap();
        assert_eq!(survivor.len(), 1);
        assert_eq!(survivor[0].id, transposed.move_id);
        // empty, other_a, other_b, joined
        assert_eq!(count(&h.db, "positions").await, 4);
    }

    #[tokio::test]
    async fn test_remove_unknown_line_is_noop() {
        let h = harness().await;
        let removed = h.repertoire.remove_line(99).await.unwrap();
        assert_eq!(removed, RemovedLine::default());
    }

    #[tokio::test]
    async fn test_list_moves_honours_focus() {
        let h = harness_with(RepertoireConfig {
            player_focus: Sign::White,
        })
        .await;
        let empty = board(9, &[]);
        let a = board(9, &[(2, 2, Sign::Black)]);
        let b = board(9, &[(2, 2, Sign::Black), (6, 6, Sign::White)]);
        let to_white = h
            .repertoire
            .save_move(Vertex::new(2, 2), &a, Sign::White, Some(&empty))
            .await
            .unwrap();
        h.repertoire
            .save_move(Vertex::new(6, 6), &b, Sign::Black, Some(&a))
            .await
            .unwrap();

        let moves = h.repertoire.list_moves().await.unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].id, to_white.move_id);
    }
}
