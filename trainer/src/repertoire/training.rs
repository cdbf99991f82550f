//! Review scheduling for stored moves.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate};

use super::{Repertoire, RepertoireError};
use crate::leitner::{self, TrainingResult, CURRENT_DECK};
use crate::persistence::traits::{BoardDimensionRepository, MoveRepository, PositionRepository};
use crate::persistence::{MoveId, MoveRecord};

impl<B, P, M> Repertoire<B, P, M>
where
    B: BoardDimensionRepository,
    P: PositionRepository,
    M: MoveRepository,
{
    /// Apply one training attempt to a move and reschedule it.
    ///
    /// Returns the updated move, or `None` for [`TrainingResult::Alternate`],
    /// which is not an attempt and leaves the store untouched.
    pub async fn trained_move(
        &self,
        move_id: MoveId,
        result: TrainingResult,
    ) -> Result<Option<MoveRecord>, RepertoireError> {
        let success = match result {
            TrainingResult::Alternate => return Ok(None),
            TrainingResult::Solved => true,
            TrainingResult::Failed => false,
        };

        let mut record = self
            .moves
            .get_move(move_id)
            .await?
            .ok_or(RepertoireError::MoveNotFound(move_id))?;

        let now = self.clock.now();
        let previous_deck = record.deck;
        record.deck = leitner::new_deck(
            success,
            record.deck,
            record.next_session_timestamp,
            now.date_naive(),
        );
        record.next_session_timestamp =
            leitner::next_date_for_deck(record.deck, now).timestamp_millis();
        record.number_of_attempts += 1;
        if success {
            record.number_of_successes += 1;
        }

        self.moves.update_move(&record).await?;
        tracing::info!(
            move_id,
            %result,
            from_deck = previous_deck,
            to_deck = record.deck,
            "Trained move"
        );
        Ok(Some(record))
    }

    pub async fn update_move_comment(
        &self,
        move_id: MoveId,
        comment: &str,
    ) -> Result<MoveRecord, RepertoireError> {
        let mut record = self
            .moves
            .get_move(move_id)
            .await?
            .ok_or(RepertoireError::MoveNotFound(move_id))?;
        record.comments = comment.to_string();
        self.moves.update_move(&record).await?;
        Ok(record)
    }

    /// Moves to review today: the current deck plus everything due by the end
    /// of the day, restricted to the player focus.
    pub async fn get_moves_for_current_session(&self) -> Result<Vec<MoveRecord>, RepertoireError> {
        let until = leitner::end_of_day_ms(self.clock.today());
        let due = self
            .moves
            .due_moves(CURRENT_DECK, until, self.config.focus())
            .await?;
        tracing::debug!(count = due.len(), "Loaded current session");
        Ok(due)
    }

    /// Number of moves due per day, ascending. Overdue moves count for today.
    pub async fn get_move_count_by_session_date(
        &self,
    ) -> Result<Vec<(NaiveDate, usize)>, RepertoireError> {
        let today = self.clock.today();
        let end_of_today = leitner::end_of_day_ms(today);

        let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for record in self.moves.list_moves(self.config.focus()).await? {
            let date = if record.next_session_timestamp <= end_of_today {
                today
            } else {
                local_date(record.next_session_timestamp).unwrap_or(today)
            };
            *counts.entry(date).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

fn local_date(timestamp_ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|at| at.with_timezone(&Local).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::leitner::RETIRED_DECK;
    use crate::repertoire::test_support::{board, day, harness, harness_with, Harness};
    use crate::repertoire::{RepertoireConfig, SavedMove};
    use goban::{Sign, Vertex};

    async fn opening(h: &Harness, x: i32, y: i32) -> SavedMove {
        let empty = board(9, &[]);
        let after = board(9, &[(x, y, Sign::Black)]);
        h.repertoire
            .save_move(Vertex::new(x, y), &after, Sign::White, Some(&empty))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_solving_every_review_retires_the_move() {
        let h = harness().await;
        let saved = opening(&h, 2, 3).await;

        let first = h
            .repertoire
            .trained_move(saved.move_id, TrainingResult::Solved)
            .await
            .unwrap()
            .unwrap();
        let deck = leitner::session_for_date(day());
        assert_eq!(first.deck, deck);
        assert_eq!(first.number_of_attempts, 1);
        assert_eq!(first.number_of_successes, 1);

        assert_eq!(
            local_date(first.next_session_timestamp),
            day().succ_opt()
        );

        // Reviews follow the deck's session offsets 1, 2, 5 and 9.
        for (gap, next_gap) in [(1, 1), (1, 3), (3, 4)] {
            h.clock.advance_days(gap);
            let record = h
                .repertoire
                .trained_move(saved.move_id, TrainingResult::Solved)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(record.deck, deck);
            assert_eq!(
                local_date(record.next_session_timestamp),
                Some(h.clock.today() + chrono::Days::new(next_gap))
            );
        }

        h.clock.advance_days(4);
        let retired = h
            .repertoire
            .trained_move(saved.move_id, TrainingResult::Solved)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retired.deck, RETIRED_DECK);
        assert_eq!(retired.number_of_attempts, 5);
        assert_eq!(retired.number_of_successes, 5);
        assert!(retired.next_session_timestamp > leitner::end_of_day_ms(h.clock.today()));
    }

    #[tokio::test]
    async fn test_failure_returns_to_current_deck() {
        let h = harness().await;
        let saved = opening(&h, 2, 3).await;
        h.repertoire
            .trained_move(saved.move_id, TrainingResult::Solved)
            .await
            .unwrap();

        h.clock.advance_days(1);
        let failed = h
            .repertoire
            .trained_move(saved.move_id, TrainingResult::Failed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(failed.deck, CURRENT_DECK);
        assert_eq!(
            failed.next_session_timestamp,
            h.clock.now().timestamp_millis()
        );
        assert_eq!(failed.number_of_attempts, 2);
        assert_eq!(failed.number_of_successes, 1);
    }

    #[tokio::test]
    async fn test_alternate_changes_nothing() {
        let h = harness().await;
        let saved = opening(&h, 2, 3).await;
        let before = h.repertoire.list_moves().await.unwrap();

        let result = h
            .repertoire
            .trained_move(saved.move_id, TrainingResult::Alternate)
            .await
            .unwrap();
        assert!(result.is_none());
        let after = h.repertoire.list_moves().await.unwrap();
        assert_eq!(before, after);

        // Not even an unknown id is looked up.
        assert!(h
            .repertoire
            .trained_move(999, TrainingResult::Alternate)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_unknown_move_is_reported() {
        let h = harness().await;
        let err = h
            .repertoire
            .trained_move(42, TrainingResult::Solved)
            .await
            .unwrap_err();
        assert!(matches!(err, RepertoireError::MoveNotFound(42)));

        let err = h
            .repertoire
            .update_move_comment(42, "nope")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Move with id 42 not found");
    }

    #[tokio::test]
    async fn test_update_move_comment() {
        let h = harness().await;
        let saved = opening(&h, 2, 3).await;
        let updated = h
            .repertoire
            .update_move_comment(saved.move_id, "approach")
            .await
            .unwrap();
        assert_eq!(updated.comments, "approach");
        assert_eq!(updated.deck, CURRENT_DECK);

        let moves = h.repertoire.list_moves().await.unwrap();
        assert_eq!(moves[0].comments, "approach");
    }

    #[tokio::test]
    async fn test_current_session_contents() {
        let h = harness().await;
        let fresh = opening(&h, 2, 3).await;
        let trained = opening(&h, 2, 4).await;
        h.repertoire
            .trained_move(trained.move_id, TrainingResult::Solved)
            .await
            .unwrap();

        let due: Vec<_> = h
            .repertoire
            .get_moves_for_current_session()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(due, vec![fresh.move_id]);

        h.clock.advance_days(1);
        let due = h.repertoire.get_moves_for_current_session().await.unwrap();
        assert_eq!(due.len(), 2);
    }

    #[tokio::test]
    async fn test_current_session_player_focus() {
        let h = harness_with(RepertoireConfig {
            player_focus: Sign::Black,
        })
        .await;
        let to_white = opening(&h, 2, 3).await;
        let a = board(9, &[(2, 3, Sign::Black)]);
        let b = board(9, &[(2, 3, Sign::Black), (6, 6, Sign::White)]);
        let to_black = h
            .repertoire
            .save_move(Vertex::new(6, 6), &b, Sign::Black, Some(&a))
            .await
            .unwrap();
        assert_ne!(to_white.move_id, to_black.move_id);

        let due = h.repertoire.get_moves_for_current_session().await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, to_black.move_id);
    }

    #[tokio::test]
    async fn test_move_count_by_session_date() {
        let h = harness().await;
        opening(&h, 2, 3).await;
        let later = opening(&h, 2, 4).await;
        let failed = opening(&h, 3, 3).await;
        h.repertoire
            .trained_move(later.move_id, TrainingResult::Solved)
            .await
            .unwrap();
        h.repertoire
            .trained_move(failed.move_id, TrainingResult::Failed)
            .await
            .unwrap();

        let tomorrow = day().succ_opt().unwrap();
        assert_eq!(
            h.repertoire.get_move_count_by_session_date().await.unwrap(),
            vec![(day(), 2), (tomorrow, 1)]
        );

        // Overdue moves are folded into today.
        h.clock.advance_days(3);
        assert_eq!(
            h.repertoire.get_move_count_by_session_date().await.unwrap(),
            vec![(h.clock.today(), 3)]
        );
    }
}
