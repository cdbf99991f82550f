//! Canonical stone, coordinate and ko types shared by the whole project.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::board::BoardError;

/// Content of a single intersection, also used as "the color to move".
///
/// `Empty` doubles as "either player" wherever a player filter is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Sign {
    White,
    #[default]
    Empty,
    Black,
}

impl Sign {
    pub fn value(self) -> i8 {
        match self {
            Self::White => -1,
            Self::Empty => 0,
            Self::Black => 1,
        }
    }

    pub fn from_value(value: i8) -> Result<Self, BoardError> {
        match value {
            -1 => Ok(Self::White),
            0 => Ok(Self::Empty),
            1 => Ok(Self::Black),
            other => Err(BoardError::InvalidSign(other)),
        }
    }

    /// The other player. `Empty` has no opponent and maps to itself.
    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Empty => Self::Empty,
            Self::Black => Self::White,
        }
    }

    /// Single printable digit used in position strings (sign shifted by +1).
    pub fn to_digit(self) -> char {
        match self {
            Self::White => '0',
            Self::Empty => '1',
            Self::Black => '2',
        }
    }

    pub fn from_digit(c: char) -> Result<Self, BoardError> {
        match c {
            '0' => Ok(Self::White),
            '1' => Ok(Self::Empty),
            '2' => Ok(Self::Black),
            other => Err(BoardError::InvalidDigit(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Empty => "empty",
            Self::Black => "black",
        }
    }
}

impl From<Sign> for i8 {
    fn from(sign: Sign) -> Self {
        sign.value()
    }
}

impl TryFrom<i8> for Sign {
    type Error = BoardError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Sign::from_value(value)
    }
}

impl FromStr for Sign {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "black" | "b" | "1" => Ok(Self::Black),
            "white" | "w" | "-1" => Ok(Self::White),
            "empty" | "both" | "none" | "0" => Ok(Self::Empty),
            _ => Err(BoardError::UnknownSign(s.to_string())),
        }
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A board coordinate. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

impl Vertex {
    /// Sentinel for a pass (tenuki) or "no ko".
    pub const PASS: Vertex = Vertex { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_pass(self) -> bool {
        self == Self::PASS
    }
}

impl From<(i32, i32)> for Vertex {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Vertex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_pass() {
            write!(f, "pass")
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}

/// The currently forbidden retake point.
///
/// `sign` is the player who may not play at `vertex` on the next turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ko {
    pub sign: Sign,
    pub vertex: Vertex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_shifted_signs() {
        for sign in [Sign::White, Sign::Empty, Sign::Black] {
            let digit = sign.to_digit();
            assert_eq!(digit.to_digit(10), Some((sign.value() + 1) as u32));
            assert_eq!(Sign::from_digit(digit).unwrap(), sign);
        }
        assert!(matches!(
            Sign::from_digit('3'),
            Err(BoardError::InvalidDigit('3'))
        ));
    }

    #[test]
    fn opponent_of_empty_is_empty() {
        assert_eq!(Sign::Black.opponent(), Sign::White);
        assert_eq!(Sign::White.opponent(), Sign::Black);
        assert_eq!(Sign::Empty.opponent(), Sign::Empty);
    }

    #[test]
    fn parse_player_names() {
        assert_eq!("black".parse::<Sign>().unwrap(), Sign::Black);
        assert_eq!("W".parse::<Sign>().unwrap(), Sign::White);
        assert_eq!("both".parse::<Sign>().unwrap(), Sign::Empty);
        assert!("purple".parse::<Sign>().is_err());
    }

    #[test]
    fn pass_vertex() {
        assert!(Vertex::PASS.is_pass());
        assert!(!Vertex::new(0, 0).is_pass());
        assert_eq!(Vertex::PASS.to_string(), "pass");
    }

    #[test]
    fn sign_integer_conversions() {
        assert_eq!(i8::from(Sign::White), -1);
        assert_eq!(Sign::try_from(1i8).unwrap(), Sign::Black);
        assert!(matches!(
            Sign::try_from(2i8),
            Err(BoardError::InvalidSign(2))
        ));
    }
}
