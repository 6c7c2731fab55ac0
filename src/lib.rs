//! Quiztactoe - real-time trivia-gated tic-tac-toe
//!
//! Two anonymous WebSocket clients are paired first-come-first-served; each
//! turn is gated behind a timed trivia question, and the player who answers
//! correctly earns the right to place the next mark.
//!
//! # Architecture
//!
//! - **Gateway**: axum WebSocket endpoint dispatching per-connection events
//! - **Matchmaker**: process-wide pairing registry with a single waiting slot
//! - **Session**: turn-gated state machine with question and move timers
//! - **Board / Questions**: pure game logic and the startup-loaded bank

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod cli;
mod config;
mod gateway;
mod matchmaker;
mod protocol;
mod questions;
mod registry;
mod server;
mod session;

// Crate-level exports - Game types
pub use board::{Board, Cell, MoveError, Outcome, Symbol};

// Crate-level exports - CLI and configuration
pub use cli::Cli;
pub use config::{ConfigError, ServerConfig, Timing};

// Crate-level exports - Matchmaking and sessions
pub use matchmaker::Matchmaker;
pub use session::{Participant, Session, TurnState};

// Crate-level exports - Wire protocol
pub use protocol::{ClientEvent, GameOutcome, ServerEvent};

// Crate-level exports - Question supply
pub use questions::{BankError, Question, QuestionBank};

// Crate-level exports - Server types
pub use registry::{ConnectionId, ConnectionRegistry};
pub use server::{AppState, router, serve};
