//! SQLite-backed repository implementations.
//!
//! ## Database setup
//!
//! [`Database`] wraps a `sqlx::SqlitePool` configured with:
//! - **WAL mode**: allows one writer and multiple concurrent readers.
//! - **Foreign keys enabled**: moves must point at existing positions.
//! - **Embedded migrations**: `sqlx::migrate!` runs `migrations/001_initial_schema.sql`
//!   automatically when [`Database::open`] is called. The schema is idempotent.
//!
//! ## Repository types
//!
//! Each `Sqlite*Repository` holds a `SqlitePool` and implements the
//! corresponding trait from [`crate::persistence::traits`]:
//!
//! | Type | Trait |
//! |------|-------|
//! | [`SqliteBoardDimensionRepository`] | `BoardDimensionRepository` |
//! | [`SqlitePositionRepository`] | `PositionRepository` |
//! | [`SqliteMoveRepository`] | `MoveRepository` |
//!
//! Signs, decks and vertices are stored as integers and decoded through the
//! shared helpers in [`helpers`]. Uniqueness (board size, canonical position
//! key, move edge) is enforced by unique indexes; inserts that hit one of them
//! resolve to the existing row.

mod board_repo;
mod database;
mod move_repo;
mod position_repo;
pub(crate) mod helpers;

pub use board_repo::SqliteBoardDimensionRepository;
pub use database::Database;
pub use move_repo::SqliteMoveRepository;
pub use position_repo::SqlitePositionRepository;
