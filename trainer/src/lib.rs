//! Go repertoire trainer.
//!
//! Positions are stored once per symmetry class of the board (see
//! [`goban::Transformation`]), moves are edges between stored positions, and
//! every move is reviewed on a Leitner schedule ([`leitner`]).
//!
//! [`repertoire::Repertoire`] is the entry point; it is generic over the
//! repository traits in [`persistence::traits`] and ships with a SQLite
//! backend in [`persistence::sqlite`].

pub mod clock;
pub mod config;
pub mod leitner;
pub mod persistence;
pub mod repertoire;

pub use clock::{Clock, FixedClock, SystemClock};
pub use leitner::TrainingResult;
pub use repertoire::{Repertoire, RepertoireConfig, RepertoireError, SqliteRepertoire};
