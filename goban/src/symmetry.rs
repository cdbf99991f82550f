//! The eight symmetries of a rectangular board (the dihedral group D4).
//!
//! Grids are indexed `grid[row][col]`, points are `(x, y) = (col, row)`.
//! For every transformation the point map is the cell map of the grid
//! transform: the content of `grid[y][x]` ends up at
//! `apply_to_point((x, y))` in the transformed grid.

use std::str::FromStr;

use crate::board::BoardError;
use crate::types::Vertex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Transformation {
    Original,
    Rot90,
    Rot180,
    Rot270,
    Mirror,
    MirrorRot90,
    MirrorRot180,
    MirrorRot270,
}

use Transformation as T;

/// `COMPOSITION[from][to]` maps a grid in orientation `from` onto the same
/// grid in orientation `to`.
#[rustfmt::skip]
const COMPOSITION: [[Transformation; 8]; 8] = [
    [T::Original, T::Rot90, T::Rot180, T::Rot270, T::Mirror, T::MirrorRot90, T::MirrorRot180, T::MirrorRot270],
    [T::Rot270, T::Original, T::Rot90, T::Rot180, T::MirrorRot270, T::Mirror, T::MirrorRot90, T::MirrorRot180],
    [T::Rot180, T::Rot270, T::Original, T::Rot90, T::MirrorRot180, T::MirrorRot270, T::Mirror, T::MirrorRot90],
    [T::Rot90, T::Rot180, T::Rot270, T::Original, T::MirrorRot90, T::MirrorRot180, T::MirrorRot270, T::Mirror],
    [T::Mirror, T::MirrorRot270, T::MirrorRot180, T::MirrorRot90, T::Original, T::Rot270, T::Rot180, T::Rot90],
    [T::MirrorRot90, T::Mirror, T::MirrorRot270, T::MirrorRot180, T::Rot90, T::Original, T::Rot270, T::Rot180],
    [T::MirrorRot180, T::MirrorRot90, T::Mirror, T::MirrorRot270, T::Rot180, T::Rot90, T::Original, T::Rot270],
    [T::MirrorRot270, T::MirrorRot180, T::MirrorRot90, T::Mirror, T::Rot270, T::Rot180, T::Rot90, T::Original],
];

impl Transformation {
    pub const ALL: [Transformation; 8] = [
        T::Original,
        T::Rot90,
        T::Rot180,
        T::Rot270,
        T::Mirror,
        T::MirrorRot90,
        T::MirrorRot180,
        T::MirrorRot270,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            T::Original => "original",
            T::Rot90 => "rot90",
            T::Rot180 => "rot180",
            T::Rot270 => "rot270",
            T::Mirror => "mirror",
            T::MirrorRot90 => "mirrorRot90",
            T::MirrorRot180 => "mirrorRot180",
            T::MirrorRot270 => "mirrorRot270",
        }
    }

    /// Whether the output grid has width and height exchanged.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, T::Rot90 | T::Rot270 | T::MirrorRot90 | T::MirrorRot270)
    }

    /// `(width, height)` of the transformed grid.
    pub fn output_dimensions(self, width: usize, height: usize) -> (usize, usize) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// rot90 and rot270 undo each other; every other element is an involution.
    pub fn inverse(self) -> Self {
        match self {
            T::Rot90 => T::Rot270,
            T::Rot270 => T::Rot90,
            other => other,
        }
    }

    /// The transformation taking orientation `from` to orientation `to`.
    pub fn relative(from: Transformation, to: Transformation) -> Self {
        COMPOSITION[from.index()][to.index()]
    }

    /// `(row, col)` of the source cell that lands at output cell `(i, j)`.
    fn source_cell(self, i: usize, j: usize, width: usize, height: usize) -> (usize, usize) {
        match self {
            T::Original => (i, j),
            T::Rot90 => (j, width - i - 1),
            T::Rot180 => (height - i - 1, width - j - 1),
            T::Rot270 => (height - j - 1, i),
            T::Mirror => (i, width - j - 1),
            T::MirrorRot90 => (height - j - 1, width - i - 1),
            T::MirrorRot180 => (height - i - 1, j),
            T::MirrorRot270 => (j, i),
        }
    }

    /// Apply to a rectangular grid. Ragged input is a caller bug.
    pub fn apply_to_grid<C: Clone>(self, grid: &[Vec<C>]) -> Vec<Vec<C>> {
        let height = grid.len();
        let width = grid.first().map_or(0, Vec::len);
        let (out_width, out_height) = self.output_dimensions(width, height);

        (0..out_height)
            .map(|i| {
                (0..out_width)
                    .map(|j| {
                        let (row, col) = self.source_cell(i, j, width, height);
                        grid[row][col].clone()
                    })
                    .collect()
            })
            .collect()
    }

    /// Apply to a single point of a `width` x `height` grid (dimensions of the
    /// source orientation). [`Vertex::PASS`] is always returned unchanged.
    pub fn apply_to_point(self, vertex: Vertex, width: usize, height: usize) -> Vertex {
        if vertex.is_pass() {
            return vertex;
        }
        let Vertex { x, y } = vertex;
        let w = width as i32;
        let h = height as i32;
        match self {
            T::Original => vertex,
            T::Rot90 => Vertex::new(y, w - x - 1),
            T::Rot180 => Vertex::new(w - x - 1, h - y - 1),
            T::Rot270 => Vertex::new(h - y - 1, x),
            T::Mirror => Vertex::new(w - x - 1, y),
            T::MirrorRot90 => Vertex::new(h - y - 1, w - x - 1),
            T::MirrorRot180 => Vertex::new(x, h - y - 1),
            T::MirrorRot270 => Vertex::new(y, x),
        }
    }
}

impl std::fmt::Display for Transformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transformation {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| BoardError::UnknownTransformation(s.to_string()))
    }
}
