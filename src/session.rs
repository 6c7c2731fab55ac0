//! Game session: the turn-gated state machine of one paired match.
//!
//! A session cycles `Idle -> QuestionOpen -> AwaitingMove -> Idle` until the
//! board reaches a terminal state or a participant disconnects. Question and
//! move deadlines are spawned sleeps that capture the session's round
//! generation; every callback re-validates state and generation after
//! waking, so a timer racing its own cancellation is a harmless no-op.

use crate::board::{Board, Outcome, Symbol};
use crate::config::Timing;
use crate::matchmaker::MatchmakerState;
use crate::protocol::{GameOutcome, ServerEvent};
use crate::questions::{Question, QuestionBank};
use crate::registry::{ConnectionId, ConnectionRegistry};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// A player in a session.
#[derive(Debug, Clone)]
pub struct Participant {
    /// Connection this participant joined through.
    pub id: ConnectionId,
    /// Transient display name.
    pub name: String,
    /// Assigned symbol.
    pub symbol: Symbol,
}

/// Turn-gate phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Between rounds; no question open, nobody may move.
    Idle,
    /// A question is open and both players may answer.
    QuestionOpen,
    /// One player answered correctly and holds the move right.
    AwaitingMove,
    /// Terminal; the session is over.
    Finished,
}

/// Mutable session state. Guarded by one mutex, never held across an await.
#[derive(Debug)]
struct SessionState {
    board: Board,
    turn: TurnState,
    question: Option<Question>,
    /// Wrong-answer flags for this round, indexed like `participants`.
    wrong: [bool; 2],
    /// Index of the participant holding the move right.
    active: Option<usize>,
    /// Round generation, bumped at each `start_round`. Timers capture it
    /// and act only if it is unchanged.
    round: u64,
    question_timer: Option<JoinHandle<()>>,
    move_timer: Option<JoinHandle<()>>,
}

#[derive(Debug)]
struct SessionInner {
    id: String,
    participants: [Participant; 2],
    registry: ConnectionRegistry,
    bank: Arc<QuestionBank>,
    timing: Timing,
    matches: Arc<Mutex<MatchmakerState>>,
    state: Mutex<SessionState>,
}

/// Handle to one paired match. Cheap to clone; both participants' registry
/// entries point at the same underlying session.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Creates a session for two freshly paired participants.
    pub(crate) fn new(
        participants: [Participant; 2],
        registry: ConnectionRegistry,
        bank: Arc<QuestionBank>,
        timing: Timing,
        matches: Arc<Mutex<MatchmakerState>>,
    ) -> Self {
        let id = Uuid::new_v4().to_string();
        info!(
            session_id = %id,
            first = %participants[0].name,
            second = %participants[1].name,
            "Creating game session"
        );
        Self {
            inner: Arc::new(SessionInner {
                id,
                participants,
                registry,
                bank,
                timing,
                matches,
                state: Mutex::new(SessionState {
                    board: Board::new(),
                    turn: TurnState::Idle,
                    question: None,
                    wrong: [false, false],
                    active: None,
                    round: 0,
                    question_timer: None,
                    move_timer: None,
                }),
            }),
        }
    }

    /// Session identifier.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The two participants, in pairing order.
    pub fn participants(&self) -> &[Participant; 2] {
        &self.inner.participants
    }

    /// Current turn-gate phase.
    pub fn turn_state(&self) -> TurnState {
        self.state().turn
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.state.lock().expect("session state lock poisoned")
    }

    fn participant_index(&self, conn: &str) -> Option<usize> {
        self.inner.participants.iter().position(|p| p.id == conn)
    }

    fn broadcast(&self, event: &ServerEvent) {
        for participant in &self.inner.participants {
            self.inner.registry.send(&participant.id, event);
        }
    }

    /// Opens a fresh question round.
    ///
    /// Valid only while idle with a non-terminal board; any other state
    /// (including a disconnect that won a race with a grace task) makes
    /// this a no-op.
    #[instrument(skip(self), fields(session_id = %self.inner.id))]
    pub(crate) fn start_round(&self) {
        let mut state = self.state();
        if state.turn != TurnState::Idle {
            debug!(turn = ?state.turn, "round start skipped");
            return;
        }
        if state.board.outcome() != Outcome::InProgress {
            return;
        }
        let question = self.inner.bank.draw().clone();
        state.round += 1;
        state.wrong = [false, false];
        state.turn = TurnState::QuestionOpen;
        let deadline = self.inner.timing.question_deadline();
        self.broadcast(&ServerEvent::Question {
            prompt: question.prompt().clone(),
            options: question.options().clone(),
            deadline_secs: deadline.as_secs(),
        });
        state.question = Some(question);

        let round = state.round;
        let session = self.clone();
        state.question_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            session.question_deadline_elapsed(round);
        }));
        info!(round, "Question round opened");
    }

    /// Records an answer for the currently open question.
    ///
    /// Out-of-state answers, answers from strangers, and repeat answers
    /// after a lockout are protocol noise and ignored without notification.
    #[instrument(skip(self, answer), fields(session_id = %self.inner.id, connection_id = conn))]
    pub fn submit_answer(&self, conn: &str, answer: &str) {
        let mut state = self.state();
        if state.turn != TurnState::QuestionOpen {
            debug!(turn = ?state.turn, "answer outside an open round");
            return;
        }
        let Some(index) = self.participant_index(conn) else {
            warn!("answer from a connection that is not a participant");
            return;
        };
        if state.wrong[index] {
            debug!("repeat answer after lockout ignored");
            return;
        }
        let Some(question) = state.question.as_ref() else {
            return;
        };

        if question.is_correct(answer) {
            if let Some(timer) = state.question_timer.take() {
                timer.abort();
            }
            state.question = None;
            state.active = Some(index);
            state.turn = TurnState::AwaitingMove;

            let winner = &self.inner.participants[index];
            let message = format!("{} answered correctly and may place a mark", winner.name);
            for (i, participant) in self.inner.participants.iter().enumerate() {
                self.inner.registry.send(
                    &participant.id,
                    &ServerEvent::RoundResolved {
                        authorized: i == index,
                        message: message.clone(),
                    },
                );
            }

            let round = state.round;
            let deadline = self.inner.timing.move_deadline();
            let session = self.clone();
            state.move_timer = Some(tokio::spawn(async move {
                tokio::time::sleep(deadline).await;
                session.move_deadline_elapsed(round);
            }));
            info!(winner = %winner.name, "Move window granted");
        } else {
            state.wrong[index] = true;
            self.inner.registry.send(
                conn,
                &ServerEvent::WrongAnswer {
                    message: "Wrong answer, you are locked out for this round".to_string(),
                },
            );
            if state.wrong.iter().all(|wrong| *wrong) {
                if let Some(timer) = state.question_timer.take() {
                    timer.abort();
                }
                state.question = None;
                state.turn = TurnState::Idle;
                self.broadcast(&ServerEvent::RoundResolved {
                    authorized: false,
                    message: "Both answers were wrong, the round is void".to_string(),
                });
                self.schedule_restart(&state);
                info!("Round void, both players answered wrong");
            }
        }
    }

    /// Applies a move for the authorized player.
    ///
    /// Anything violating the gate (wrong phase, non-authorized sender,
    /// mismatched symbol, occupied or out-of-range cell) is silently
    /// ignored and the pending move timer keeps running.
    #[instrument(skip(self), fields(session_id = %self.inner.id, connection_id = conn, row, col))]
    pub fn apply_move(&self, conn: &str, row: usize, col: usize, claimed: Symbol) {
        let mut state = self.state();
        if state.turn != TurnState::AwaitingMove {
            debug!(turn = ?state.turn, "move outside a move window");
            return;
        }
        let Some(index) = self.participant_index(conn) else {
            warn!("move from a connection that is not a participant");
            return;
        };
        if state.active != Some(index) {
            debug!("move from a non-authorized connection");
            return;
        }
        let symbol = self.inner.participants[index].symbol;
        if claimed != symbol {
            debug!(%claimed, assigned = %symbol, "move with a mismatched symbol");
            return;
        }
        if let Err(error) = state.board.apply(row, col, symbol) {
            debug!(%error, "move rejected");
            return;
        }
        if let Some(timer) = state.move_timer.take() {
            timer.abort();
        }
        state.active = None;
        self.broadcast(&ServerEvent::BoardUpdate {
            board: state.board.grid(),
        });

        match state.board.outcome() {
            Outcome::Won(symbol) => self.finish(state, GameOutcome::Winner(symbol)),
            Outcome::Draw => self.finish(state, GameOutcome::Draw),
            Outcome::InProgress => {
                state.turn = TurnState::Idle;
                self.schedule_restart(&state);
                info!(%symbol, "Move applied, next round after the grace delay");
            }
        }
    }

    /// Terminates the session after a participant disconnect.
    ///
    /// Cancels all pending timers and notifies the survivor. Idempotent
    /// once finished.
    #[instrument(skip(self), fields(session_id = %self.inner.id, connection_id = conn))]
    pub(crate) fn disconnect(&self, conn: &str) {
        let mut state = self.state();
        if state.turn == TurnState::Finished {
            return;
        }
        if let Some(timer) = state.question_timer.take() {
            timer.abort();
        }
        if let Some(timer) = state.move_timer.take() {
            timer.abort();
        }
        state.question = None;
        state.active = None;
        state.turn = TurnState::Finished;
        drop(state);

        for participant in self.inner.participants.iter().filter(|p| p.id != conn) {
            self.inner
                .registry
                .send(&participant.id, &ServerEvent::OpponentLeft);
        }
        info!("Session terminated by disconnect");
    }

    /// Question deadline elapsed with no correct answer.
    fn question_deadline_elapsed(&self, round: u64) {
        let mut state = self.state();
        if state.turn != TurnState::QuestionOpen || state.round != round {
            debug!(session_id = %self.inner.id, round, "stale question timer");
            return;
        }
        state.question = None;
        state.question_timer = None;
        state.turn = TurnState::Idle;
        self.broadcast(&ServerEvent::RoundResolved {
            authorized: false,
            message: "Time is up, nobody answered in time".to_string(),
        });
        self.schedule_restart(&state);
        info!(session_id = %self.inner.id, round, "Question round timed out");
    }

    /// Move deadline elapsed; the forfeited move right is not carried over.
    fn move_deadline_elapsed(&self, round: u64) {
        let mut state = self.state();
        if state.turn != TurnState::AwaitingMove || state.round != round {
            debug!(session_id = %self.inner.id, round, "stale move timer");
            return;
        }
        state.active = None;
        state.move_timer = None;
        state.turn = TurnState::Idle;
        drop(state);
        info!(session_id = %self.inner.id, round, "Move window expired, opening a fresh round");
        self.start_round();
    }

    /// Schedules the next round after the grace delay, so the round's
    /// terminal notification is observed before the next question.
    fn schedule_restart(&self, state: &SessionState) {
        let round = state.round;
        let grace = self.inner.timing.grace_delay();
        let session = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            session.restart_if_idle(round);
        });
    }

    fn restart_if_idle(&self, round: u64) {
        {
            let state = self.state();
            if state.turn != TurnState::Idle || state.round != round {
                debug!(session_id = %self.inner.id, round, "stale grace task");
                return;
            }
        }
        self.start_round();
    }

    /// Broadcasts the terminal outcome and removes the session from the
    /// matchmaker's registry.
    fn finish(&self, mut state: MutexGuard<'_, SessionState>, outcome: GameOutcome) {
        if let Some(timer) = state.question_timer.take() {
            timer.abort();
        }
        if let Some(timer) = state.move_timer.take() {
            timer.abort();
        }
        state.turn = TurnState::Finished;
        drop(state);

        self.broadcast(&ServerEvent::GameOver { outcome });
        let mut matches = self
            .inner
            .matches
            .lock()
            .expect("matchmaker state lock poisoned");
        matches.remove_pair(&self.inner.participants[0].id, &self.inner.participants[1].id);
        drop(matches);
        info!(session_id = %self.inner.id, ?outcome, "Session finished");
    }
}
