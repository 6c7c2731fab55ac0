//! Wire protocol between clients and the server.
//!
//! Messages are JSON text frames tagged by a `type` field, one closed enum
//! variant per event. The correct answer of a question is deliberately
//! absent from [`ServerEvent::Question`]; it never crosses the wire.

use crate::board::{Cell, Symbol};
use serde::{Deserialize, Serialize};

/// Inbound events, addressed implicitly by the sending connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Request to be paired with an opponent.
    #[serde(rename_all = "camelCase")]
    Join {
        /// Transient display name for this connection.
        display_name: String,
    },
    /// Answer to the currently open question.
    Answer {
        /// The chosen option, verbatim.
        answer: String,
    },
    /// Move attempt by the authorized player.
    Move {
        /// Target row, 0-2.
        row: usize,
        /// Target column, 0-2.
        col: usize,
        /// The symbol the client believes it plays.
        symbol: Symbol,
    },
}

/// Terminal result carried by a `gameOver` event: the winning symbol, or
/// `"draw"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum GameOutcome {
    /// The given symbol completed a line.
    Winner(Symbol),
    /// Board full with no winner.
    Draw,
}

impl From<GameOutcome> for String {
    fn from(outcome: GameOutcome) -> Self {
        match outcome {
            GameOutcome::Winner(symbol) => symbol.to_string(),
            GameOutcome::Draw => "draw".to_string(),
        }
    }
}

impl TryFrom<String> for GameOutcome {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "draw" {
            return Ok(GameOutcome::Draw);
        }
        value
            .parse::<Symbol>()
            .map(GameOutcome::Winner)
            .map_err(|_| format!("unknown game outcome: {value}"))
    }
}

/// Outbound notifications, delivered per connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Pairing complete; the game begins.
    #[serde(rename_all = "camelCase")]
    Paired {
        /// Display name of the opponent.
        opponent_name: String,
        /// Symbol assigned to the recipient.
        symbol: Symbol,
    },
    /// A new question round opened.
    #[serde(rename_all = "camelCase")]
    Question {
        /// Question text.
        prompt: String,
        /// Answer options, in display order.
        options: Vec<String>,
        /// Seconds until the round times out.
        deadline_secs: u64,
    },
    /// The recipient answered incorrectly and is locked out for the round.
    WrongAnswer {
        /// Human-readable explanation.
        message: String,
    },
    /// The round ended; `authorized` tells the recipient whether it may move.
    RoundResolved {
        /// Whether the recipient holds the move right.
        authorized: bool,
        /// Human-readable rationale.
        message: String,
    },
    /// A move was applied.
    BoardUpdate {
        /// Row-major snapshot; `null` cells are empty.
        board: [[Cell; 3]; 3],
    },
    /// Terminal state reached; the session is over.
    GameOver {
        /// Winning symbol or draw marker.
        outcome: GameOutcome,
    },
    /// The opponent disconnected; the session is over.
    OpponentLeft,
}
