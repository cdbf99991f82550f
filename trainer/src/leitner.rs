//! Leitner scheduling over a ten-day session cycle.
//!
//! Every calendar day maps to one of ten sessions. A move sits in a deck; deck
//! `d` is reviewed in sessions `d`, `d+1`, `d+2`, `d+5` and `d+9` (mod 10),
//! so intervals grow over one cycle. Deck 10 holds new or failed moves that
//! are due immediately, deck 11 holds retired moves.
//!
//! Decks:
//!
//! | deck | sessions  |
//! |------|-----------|
//! | 0    | 0 1 2 5 9 |
//! | 1    | 1 2 3 6 0 |
//! | ...  | ...       |
//! | 9    | 9 0 1 4 8 |
//! | 10   | current   |
//! | 11   | retired   |

use chrono::{DateTime, Days, Local, Months, NaiveDate, TimeDelta};
use std::str::FromStr;

pub const SESSION_COUNT: u8 = 10;
pub const CURRENT_DECK: u8 = 10;
pub const RETIRED_DECK: u8 = 11;

/// Session offsets of a deck, the last one is its final review.
const SESSION_OFFSETS: [u8; 5] = [0, 1, 2, 5, 9];

/// Outcome of one training attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingResult {
    Solved,
    Failed,
    /// The trainee played another known candidate move. Not an attempt.
    Alternate,
}

impl FromStr for TrainingResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "solved" | "success" => Ok(Self::Solved),
            "failed" | "failure" => Ok(Self::Failed),
            "alternate" => Ok(Self::Alternate),
            other => Err(format!("unknown training result: {other}")),
        }
    }
}

impl std::fmt::Display for TrainingResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Solved => "solved",
            Self::Failed => "failed",
            Self::Alternate => "alternate",
        })
    }
}

/// Session slot of a calendar day: days since the unix epoch, modulo 10.
pub fn session_for_date(date: NaiveDate) -> u8 {
    let days = date
        .signed_duration_since(DateTime::UNIX_EPOCH.date_naive())
        .num_days();
    days.rem_euclid(i64::from(SESSION_COUNT)) as u8
}

/// Session slot of the local day containing `timestamp_ms`.
pub fn session_for_timestamp(timestamp_ms: i64) -> Option<u8> {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|utc| session_for_date(utc.with_timezone(&Local).date_naive()))
}

pub fn sessions_for_deck(deck: u8) -> [u8; 5] {
    SESSION_OFFSETS.map(|offset| (deck % SESSION_COUNT + offset) % SESSION_COUNT)
}

/// Decks reviewed in `session`, in offset order.
pub fn decks_for_session(session: u8) -> [u8; 5] {
    SESSION_OFFSETS.map(|offset| deck_at_offset(session, offset))
}

/// The deck whose `index`-th review falls on `session`.
pub fn deck_with_session_at_index(session: u8, index: usize) -> Option<u8> {
    SESSION_OFFSETS
        .get(index)
        .map(|&offset| deck_at_offset(session, offset))
}

fn deck_at_offset(session: u8, offset: u8) -> u8 {
    (i16::from(session) - i16::from(offset)).rem_euclid(i16::from(SESSION_COUNT)) as u8
}

/// Whether `today` is the last review of `deck`. Only numbered decks have one.
pub fn is_final_session(deck: u8, today: NaiveDate) -> bool {
    if deck >= SESSION_COUNT {
        return false;
    }
    sessions_for_deck(deck)[SESSION_OFFSETS.len() - 1] == session_for_date(today)
}

/// Re-home a numbered deck so that today plays the role of the review slot
/// the move was scheduled for.
///
/// `last_timestamp_ms` is the move's scheduled session. If that session is the
/// i-th slot of `deck`, the result is the deck whose i-th slot is today. A
/// schedule that matches none of the deck's slots sends the move back to the
/// current deck.
pub fn switch_to_equivalent_deck(deck: u8, last_timestamp_ms: i64, today: NaiveDate) -> u8 {
    if deck == CURRENT_DECK || deck == RETIRED_DECK {
        return deck;
    }
    let Some(session) = session_for_timestamp(last_timestamp_ms) else {
        return CURRENT_DECK;
    };
    sessions_for_deck(deck)
        .iter()
        .position(|&s| s == session)
        .and_then(|index| deck_with_session_at_index(session_for_date(today), index))
        .unwrap_or(CURRENT_DECK)
}

/// Deck after a training attempt.
pub fn new_deck(success: bool, prev_deck: u8, prev_timestamp_ms: i64, today: NaiveDate) -> u8 {
    if !success {
        return CURRENT_DECK;
    }
    let deck = switch_to_equivalent_deck(prev_deck, prev_timestamp_ms, today);
    if is_final_session(deck, today) {
        RETIRED_DECK
    } else if deck == CURRENT_DECK {
        session_for_date(today)
    } else {
        deck
    }
}

fn add_days(at: DateTime<Local>, days: u64) -> DateTime<Local> {
    at.checked_add_days(Days::new(days))
        .unwrap_or_else(|| at + TimeDelta::days(days as i64))
}

/// When a move in `deck` is next due, counted from `now`.
pub fn next_date_for_deck(deck: u8, now: DateTime<Local>) -> DateTime<Local> {
    match deck {
        CURRENT_DECK => now,
        RETIRED_DECK => now
            .checked_add_months(Months::new(12))
            .unwrap_or_else(|| add_days(now, 365)),
        _ => {
            let sessions = sessions_for_deck(deck);
            let mut proposed = add_days(now, 1);
            for _ in 0..SESSION_COUNT {
                if sessions.contains(&session_for_date(proposed.date_naive())) {
                    break;
                }
                proposed = add_days(proposed, 1);
            }
            proposed
        }
    }
}

/// Local midnight starting `date`, in unix milliseconds.
pub fn start_of_day_ms(date: NaiveDate) -> i64 {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    midnight
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis())
}

/// Last millisecond of `date` in local time.
pub fn end_of_day_ms(date: NaiveDate) -> i64 {
    match date.succ_opt() {
        Some(next) => start_of_day_ms(next) - 1,
        None => i64::MAX,
    }
}
