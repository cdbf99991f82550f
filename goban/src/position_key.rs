//! Position strings: the stored encoding of a board and its symmetric variants.
//!
//! A position string is the row-major concatenation of every cell's sign
//! shifted by +1, so each cell is one of the digits `0` (white), `1` (empty)
//! or `2` (black).

use crate::board::Board;
use crate::symmetry::Transformation;
use crate::types::{Sign, Vertex};

/// Encode a grid row by row.
pub fn position_string(grid: &[Vec<Sign>]) -> String {
    grid.iter()
        .flat_map(|row| row.iter().map(|sign| sign.to_digit()))
        .collect()
}

/// The encodings of all eight orientations of one board.
///
/// Computed once per operation and passed along explicitly; nothing is cached
/// between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionStrings {
    strings: [String; 8],
}

impl PositionStrings {
    pub fn of(board: &Board) -> Self {
        let strings = Transformation::ALL
            .map(|t| position_string(&t.apply_to_grid(board.sign_map())));
        Self { strings }
    }

    pub fn get(&self, t: Transformation) -> &str {
        &self.strings[t.index()]
    }

    /// Encoding of the board as given (the stored orientation for new rows).
    pub fn original(&self) -> &str {
        self.get(Transformation::Original)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Transformation, &str)> + '_ {
        Transformation::ALL
            .into_iter()
            .map(move |t| (t, self.get(t)))
    }

    /// Distinct encodings, in transformation order.
    pub fn distinct(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(8);
        for (_, s) in self.iter() {
            if !out.contains(&s) {
                out.push(s);
            }
        }
        out
    }

    /// Every transformation `t` whose encoding equals `stored`, i.e. every `t`
    /// with `stored == t(board)`. Symmetric boards yield more than one.
    pub fn matching<'a>(&'a self, stored: &'a str) -> impl Iterator<Item = Transformation> + 'a {
        self.iter()
            .filter(move |(_, s)| *s == stored)
            .map(|(t, _)| t)
    }

    /// First transformation mapping the board onto `stored`.
    pub fn applied_transformation(&self, stored: &str) -> Option<Transformation> {
        self.matching(stored).next()
    }
}

/// Orientation-independent key of `(board, player, ko)`.
///
/// The smallest `(dimensions, string, ko)` triple over all eight variants, so
/// every symmetric variant of the same position produces the same key.
pub fn canonical_key(board: &Board, player: Sign) -> String {
    let strings = PositionStrings::of(board);
    let ko = board.effective_ko(player);
    let (width, height) = (board.width(), board.height());

    let (dims, string, ko) = strings
        .iter()
        .map(|(t, s)| {
            (
                t.output_dimensions(width, height),
                s,
                t.apply_to_point(ko, width, height),
            )
        })
        .min()
        .unwrap_or(((width, height), strings.original(), ko));

    format!("{}x{}:{}:{},{}", dims.0, dims.1, string, ko.x, ko.y)
}
