// src/quiz/pending.rs

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::quiz::engine::UserId;

/// A question shown to a user and still awaiting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingQuestion {
    pub index: usize,
    pub issued_at: DateTime<Utc>,
}

impl PendingQuestion {
    pub fn is_expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.issued_at >= timeout
    }
}

/// Result of trying to hand out a new question.
#[derive(Debug)]
pub enum Issue<T> {
    /// A live question is still awaiting an answer.
    Blocked,
    /// Nothing left to draw.
    Exhausted,
    Issued(usize, T),
}

/// Tracks the one outstanding prompt per user for the HTTP adapter.
///
/// The engine itself never blocks a draw; this is what stops a client from
/// asking for a new question before answering the current one.
pub struct PendingQuestions {
    timeout: Duration,
    entries: Mutex<HashMap<UserId, PendingQuestion>>,
}

impl PendingQuestions {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Draws and records a new pending question under a single lock.
    ///
    /// At most one live question exists per user; `draw` is not called while
    /// one is outstanding.
    pub fn issue<T>(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
        draw: impl FnOnce() -> Option<(usize, T)>,
    ) -> Issue<T> {
        let mut entries = self.entries.lock();
        if let Some(pending) = entries.get(&user_id) {
            if !pending.is_expired(now, self.timeout) {
                return Issue::Blocked;
            }
            tracing::debug!(user_id, index = pending.index, "Pending question expired");
        }

        match draw() {
            Some((index, item)) => {
                entries.insert(
                    user_id,
                    PendingQuestion {
                        index,
                        issued_at: now,
                    },
                );
                Issue::Issued(index, item)
            }
            None => {
                entries.remove(&user_id);
                Issue::Exhausted
            }
        }
    }

    pub fn set(&self, user_id: UserId, index: usize, now: DateTime<Utc>) {
        self.entries.lock().insert(
            user_id,
            PendingQuestion {
                index,
                issued_at: now,
            },
        );
    }

    /// Removes and returns the marker, expired or not.
    pub fn take(&self, user_id: UserId) -> Option<PendingQuestion> {
        self.entries.lock().remove(&user_id)
    }

    pub fn clear(&self, user_id: UserId) {
        self.entries.lock().remove(&user_id);
    }
}
