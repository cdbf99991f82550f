//! Go board snapshot: sign map plus ko annotation.

use serde::{Deserialize, Serialize};

use crate::position_key::PositionStrings;
use crate::symmetry::Transformation;
use crate::types::{Ko, Sign, Vertex};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board must have at least one row and one column")]
    Empty,
    #[error("Row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Position string has length {found}, expected {expected}")]
    InvalidLength { expected: usize, found: usize },
    #[error("Invalid position digit: {0}")]
    InvalidDigit(char),
    #[error("Invalid sign value: {0}")]
    InvalidSign(i8),
    #[error("Unknown sign: {0}")]
    UnknownSign(String),
    #[error("Unknown transformation: {0}")]
    UnknownTransformation(String),
}

/// A rectangular board indexed `sign_map[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    sign_map: Vec<Vec<Sign>>,
    ko: Option<Ko>,
}

impl Board {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            sign_map: vec![vec![Sign::Empty; width]; height],
            ko: None,
        }
    }

    /// Build from rows of signs, rejecting empty or ragged input.
    pub fn from_sign_map(sign_map: Vec<Vec<Sign>>) -> Result<Self, BoardError> {
        let height = sign_map.len();
        let width = sign_map.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(BoardError::Empty);
        }
        if let Some((row, r)) = sign_map.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(BoardError::RaggedRow {
                row,
                expected: width,
                found: r.len(),
            });
        }
        Ok(Self {
            width,
            height,
            sign_map,
            ko: None,
        })
    }

    /// Decode a row-major position string of `width * height` digits.
    pub fn from_position_string(
        position: &str,
        width: usize,
        height: usize,
    ) -> Result<Self, BoardError> {
        let cells = position
            .chars()
            .map(Sign::from_digit)
            .collect::<Result<Vec<_>, _>>()?;
        if width == 0 || height == 0 {
            return Err(BoardError::Empty);
        }
        if cells.len() != width * height {
            return Err(BoardError::InvalidLength {
                expected: width * height,
                found: cells.len(),
            });
        }
        let sign_map = cells.chunks(width).map(<[Sign]>::to_vec).collect();
        Ok(Self {
            width,
            height,
            sign_map,
            ko: None,
        })
    }

    pub fn with_ko(mut self, ko: Option<Ko>) -> Self {
        self.ko = ko;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn sign_map(&self) -> &[Vec<Sign>] {
        &self.sign_map
    }

    pub fn ko(&self) -> Option<Ko> {
        self.ko
    }

    pub fn contains(&self, vertex: Vertex) -> bool {
        vertex.x >= 0
            && vertex.y >= 0
            && (vertex.x as usize) < self.width
            && (vertex.y as usize) < self.height
    }

    pub fn get(&self, vertex: Vertex) -> Option<Sign> {
        if !self.contains(vertex) {
            return None;
        }
        Some(self.sign_map[vertex.y as usize][vertex.x as usize])
    }

    /// Set a cell. Returns `false` (and changes nothing) for off-board vertices.
    pub fn set(&mut self, vertex: Vertex, sign: Sign) -> bool {
        if !self.contains(vertex) {
            return false;
        }
        self.sign_map[vertex.y as usize][vertex.x as usize] = sign;
        true
    }

    /// The ko vertex relevant to `player`: the annotated point when the ko
    /// restricts `player`, otherwise [`Vertex::PASS`].
    pub fn effective_ko(&self, player: Sign) -> Vertex {
        match self.ko {
            Some(ko) if ko.sign == player => ko.vertex,
            _ => Vertex::PASS,
        }
    }

    /// Copy of this board in orientation `t`, ko included.
    pub fn transformed(&self, t: Transformation) -> Self {
        let (width, height) = t.output_dimensions(self.width, self.height);
        Self {
            width,
            height,
            sign_map: t.apply_to_grid(&self.sign_map),
            ko: self.ko.map(|ko| Ko {
                sign: ko.sign,
                vertex: t.apply_to_point(ko.vertex, self.width, self.height),
            }),
        }
    }

    /// The transformation mapping `self` onto `other`, if the stones of the
    /// two boards are symmetric variants of each other. Ko is ignored.
    pub fn symmetry_to(&self, other: &Board) -> Option<Transformation> {
        let target = PositionStrings::of(other);
        let target_original = target.original();
        let dims = (other.width, other.height);
        let strings = PositionStrings::of(self);
        let found = strings.iter().find_map(|(t, s)| {
            (s == target_original && t.output_dimensions(self.width, self.height) == dims)
                .then_some(t)
        });
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner_stone() -> Board {
        let mut board = Board::empty(9, 9);
        board.set(Vertex::new(2, 3), Sign::Black);
        board
    }

    #[test]
    fn test_ragged_sign_map_rejected() {
        let rows = vec![vec![Sign::Empty; 3], vec![Sign::Empty; 2]];
        assert_eq!(
            Board::from_sign_map(rows),
            Err(BoardError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(Board::from_sign_map(vec![]), Err(BoardError::Empty));
    }

    #[test]
    fn test_position_string_decode() {
        let board = Board::from_position_string("120111", 3, 2).unwrap();
        assert_eq!(board.get(Vertex::new(1, 0)), Some(Sign::Black));
        assert_eq!(board.get(Vertex::new(2, 0)), Some(Sign::White));
        assert_eq!(board.get(Vertex::new(0, 1)), Some(Sign::Empty));
        assert_eq!(
            Board::from_position_string("1201", 3, 2),
            Err(BoardError::InvalidLength {
                expected: 6,
                found: 4
            })
        );
        assert_eq!(
            Board::from_position_string("12x111", 3, 2),
            Err(BoardError::InvalidDigit('x'))
        );
    }

    #[test]
    fn test_off_board_access() {
        let mut board = Board::empty(5, 5);
        assert_eq!(board.get(Vertex::new(5, 0)), None);
        assert_eq!(board.get(Vertex::PASS), None);
        assert!(!board.set(Vertex::new(0, -1), Sign::Black));
    }

    #[test]
    fn test_effective_ko_depends_on_player() {
        let board = Board::empty(9, 9).with_ko(Some(Ko {
            sign: Sign::White,
            vertex: Vertex::new(3, 3),
        }));
        assert_eq!(board.effective_ko(Sign::White), Vertex::new(3, 3));
        assert_eq!(board.effective_ko(Sign::Black), Vertex::PASS);
        assert_eq!(Board::empty(9, 9).effective_ko(Sign::Black), Vertex::PASS);
    }

    #[test]
    fn test_transformed_moves_stones_and_ko() {
        let board = corner_stone().with_ko(Some(Ko {
            sign: Sign::White,
            vertex: Vertex::new(2, 3),
        }));
        let rotated = board.transformed(Transformation::Rot180);
        assert_eq!(rotated.get(Vertex::new(6, 5)), Some(Sign::Black));
        assert_eq!(rotated.ko().map(|k| k.vertex), Some(Vertex::new(6, 5)));
        assert_eq!(rotated.transformed(Transformation::Rot180), board);
    }

    #[test]
    fn test_symmetry_to() {
        let board = corner_stone();
        for t in Transformation::ALL {
            let variant = board.transformed(t);
            let found = board.symmetry_to(&variant).unwrap();
            assert_eq!(board.transformed(found).sign_map(), variant.sign_map());
        }

        let mut other = Board::empty(9, 9);
        other.set(Vertex::new(4, 4), Sign::Black);
        assert_eq!(board.symmetry_to(&other), None);
    }

    #[test]
    fn test_symmetry_to_rectangular() {
        let mut board = Board::empty(4, 2);
        board.set(Vertex::new(0, 0), Sign::White);
        let rotated = board.transformed(Transformation::Rot90);
        assert_eq!((rotated.width(), rotated.height()), (2, 4));
        let found = board.symmetry_to(&rotated).unwrap();
        assert!(found.swaps_dimensions());
        assert_eq!(board.transformed(found), rotated);
    }
}
