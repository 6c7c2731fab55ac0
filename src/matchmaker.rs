//! First-come-first-served pairing of connections into sessions.

use crate::board::Symbol;
use crate::config::Timing;
use crate::protocol::ServerEvent;
use crate::questions::QuestionBank;
use crate::registry::{ConnectionId, ConnectionRegistry};
use crate::session::{Participant, Session};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument};

/// A connection waiting to be paired.
#[derive(Debug, Clone)]
struct Waiting {
    id: ConnectionId,
    name: String,
}

/// The single waiting slot and the connection-to-session map, protected as
/// one unit so pairing is atomic: a connection is never matched twice and
/// never silently dropped from the slot.
#[derive(Debug, Default)]
pub(crate) struct MatchmakerState {
    waiting: Option<Waiting>,
    sessions: HashMap<ConnectionId, Session>,
}

impl MatchmakerState {
    /// Removes both participant entries of a terminated session.
    pub(crate) fn remove_pair(&mut self, a: &str, b: &str) {
        let _ = self.sessions.remove(a);
        let _ = self.sessions.remove(b);
    }
}

/// Process-wide matchmaker. Cheap to clone; all clones share one state.
#[derive(Debug, Clone)]
pub struct Matchmaker {
    state: Arc<Mutex<MatchmakerState>>,
    registry: ConnectionRegistry,
    bank: Arc<QuestionBank>,
    timing: Timing,
}

impl Matchmaker {
    /// Creates a matchmaker over the given registry, bank, and timing.
    pub fn new(registry: ConnectionRegistry, bank: Arc<QuestionBank>, timing: Timing) -> Self {
        info!("Creating matchmaker");
        Self {
            state: Arc::new(Mutex::new(MatchmakerState::default())),
            registry,
            bank,
            timing,
        }
    }

    fn state(&self) -> MutexGuard<'_, MatchmakerState> {
        self.state.lock().expect("matchmaker state lock poisoned")
    }

    /// Queues the connection, or pairs it with the one already waiting.
    ///
    /// The earlier-queued connection becomes the first participant and
    /// receives [`Symbol::Circle`]. Joins with an empty name, or from a
    /// connection that is already waiting or paired, are protocol noise and
    /// ignored.
    #[instrument(skip(self, display_name), fields(connection_id = conn))]
    pub fn request_join(&self, conn: &str, display_name: &str) {
        let name = display_name.trim();
        if name.is_empty() {
            debug!("join with an empty display name ignored");
            return;
        }
        let session = {
            let mut state = self.state();
            if state.sessions.contains_key(conn)
                || state.waiting.as_ref().is_some_and(|w| w.id == conn)
            {
                debug!("join from a connection that is already waiting or paired");
                return;
            }
            match state.waiting.take() {
                None => {
                    state.waiting = Some(Waiting {
                        id: conn.to_string(),
                        name: name.to_string(),
                    });
                    info!(name, "Connection queued, waiting for an opponent");
                    return;
                }
                Some(first) => {
                    let participants = [
                        Participant {
                            id: first.id,
                            name: first.name,
                            symbol: Symbol::Circle,
                        },
                        Participant {
                            id: conn.to_string(),
                            name: name.to_string(),
                            symbol: Symbol::Cross,
                        },
                    ];
                    let session = Session::new(
                        participants,
                        self.registry.clone(),
                        Arc::clone(&self.bank),
                        self.timing,
                        Arc::clone(&self.state),
                    );
                    for participant in session.participants() {
                        let _ = state
                            .sessions
                            .insert(participant.id.clone(), session.clone());
                    }
                    session
                }
            }
        };

        let [first, second] = session.participants();
        self.registry.send(
            &first.id,
            &ServerEvent::Paired {
                opponent_name: second.name.clone(),
                symbol: first.symbol,
            },
        );
        self.registry.send(
            &second.id,
            &ServerEvent::Paired {
                opponent_name: first.name.clone(),
                symbol: second.symbol,
            },
        );
        info!(
            session_id = %session.id(),
            first = %first.name,
            second = %second.name,
            "Players paired"
        );
        session.start_round();
    }

    /// Resolves the session owning a connection, if any.
    pub fn session_for(&self, conn: &str) -> Option<Session> {
        self.state().sessions.get(conn).cloned()
    }

    /// Handles a dropped connection.
    ///
    /// Clears the waiting slot when the leaver was queued; otherwise
    /// removes both participants from the session map and terminates the
    /// session, notifying the survivor.
    #[instrument(skip(self), fields(connection_id = conn))]
    pub fn disconnect(&self, conn: &str) {
        let session = {
            let mut state = self.state();
            if state.waiting.as_ref().is_some_and(|w| w.id == conn) {
                state.waiting = None;
                info!("Waiting connection left the queue");
                return;
            }
            let Some(session) = state.sessions.get(conn).cloned() else {
                debug!("disconnect from an untracked connection");
                return;
            };
            let [a, b] = session.participants();
            let (a, b) = (a.id.clone(), b.id.clone());
            state.remove_pair(&a, &b);
            session
        };
        session.disconnect(conn);
    }

    /// Whether a connection is currently queued.
    pub fn has_waiting(&self) -> bool {
        self.state().waiting.is_some()
    }

    /// Number of connection entries currently bound to a session.
    pub fn tracked_connections(&self) -> usize {
        self.state().sessions.len()
    }
}
