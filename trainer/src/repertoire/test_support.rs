use std::sync::Arc;

use chrono::NaiveDate;
use goban::{Board, Sign, Vertex};

use super::{RepertoireConfig, SqliteRepertoire};
use crate::clock::FixedClock;
use crate::persistence::sqlite::Database;

pub(crate) struct Harness {
    pub db: Database,
    pub repertoire: SqliteRepertoire,
    pub clock: Arc<FixedClock>,
}

pub(crate) fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
}

pub(crate) async fn harness() -> Harness {
    harness_with(RepertoireConfig::default()).await
}

pub(crate) async fn harness_with(config: RepertoireConfig) -> Harness {
    let db = Database::new_in_memory().await.unwrap();
    let clock = Arc::new(FixedClock::at_noon(day()));
    let repertoire = SqliteRepertoire::from_database(&db, config).with_clock(clock.clone());
    Harness {
        db,
        repertoire,
        clock,
    }
}

/// A board with the given stones.
pub(crate) fn board(size: usize, stones: &[(i32, i32, Sign)]) -> Board {
    let mut board = Board::empty(size, size);
    for &(x, y, sign) in stones {
        board.set(Vertex::new(x, y), sign);
    }
    board
}

pub(crate) async fn count(db: &Database, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await
        .unwrap();
    n
}
