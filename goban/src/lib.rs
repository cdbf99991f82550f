pub mod board;
pub mod position_key;
pub mod symmetry;
pub mod types;

pub use board::{Board, BoardError};
pub use position_key::{canonical_key, position_string, PositionStrings};
pub use symmetry::Transformation;
pub use types::{Ko, Sign, Vertex};
