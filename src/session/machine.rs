use super::error::{SessionError, SessionResult};
use super::{SessionEvent, SessionState, SessionTransition};

const HISTORY_LIMIT: usize = 64;

#[derive(Debug)]
pub struct SessionMachine {
    state: SessionState,
    generation: u64,
    transition_history: Vec<SessionTransition>,
}

impl SessionMachine {
    pub fn new() -> Self {
        Self {
            state: SessionState::default(),
            generation: 0,
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Counter bumped every time a session opens. Work started under one session is
    /// tagged with it so late results can be told apart from the current session's.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn can_transition(&self, event: &SessionEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: &SessionEvent) -> Option<SessionState> {
        use SessionEvent::*;
        match (&self.state, event) {
            (SessionState::Closed, OpenCompose) => Some(SessionState::Composing),
            (SessionState::Closed, OpenEdit(id)) => Some(SessionState::Editing(id.clone())),
            (SessionState::Composing | SessionState::Editing(_), Cancel | Commit) => {
                Some(SessionState::Closed)
            }
            (_, Dismiss) => Some(SessionState::Closed),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: SessionEvent) -> SessionResult<&SessionState> {
        tracing::debug!(from = ?self.state, event = ?event, "request session transition");
        let Some(next) = self.next_state(&event) else {
            let from = self.state.clone();
            tracing::warn!(from = ?from, event = ?event, "invalid session transition requested");
            return Err(SessionError::InvalidTransition { from, event });
        };

        if !self.state.is_open() && next.is_open() {
            self.generation = self.generation.saturating_add(1);
        }
        let record = SessionTransition::new(self.state.clone(), event, next.clone());
        self.state = next;
        if self.transition_history.len() == HISTORY_LIMIT {
            self.transition_history.remove(0);
        }
        self.transition_history.push(record);

        Ok(&self.state)
    }
}

#[cfg(test)]
impl SessionMachine {
    fn history(&self) -> &[SessionTransition] {
        &self.transition_history
    }
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionState::{:?}", self.state)
    }
}
