//! Error classification and the bounded error history
//!
//! Recoverable failures are funneled through [`ErrorLog`]; it keeps a capped
//! FIFO of recent entries for the overlay and emits a `tracing::error!` per
//! report. Only construction-time failures ([`AppError`]) propagate to the
//! caller.

use std::collections::VecDeque;

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use super::calendar::CalendarError;

/// Construction-time failure - fail-fast, never deferred.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
    #[error("invalid start date: {0}")]
    InvalidStartDate(#[from] CalendarError),
}

/// Classification of a recovered failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// An unparseable or out-of-range input instant (engine-level, recovered
    /// by returning the zero record).
    InvalidInstant,
    /// A per-tick update callback failed.
    UpdateFailure,
    /// A host capability is absent; a substitute behavior is in effect.
    Environment,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInstant => "invalid instant",
            ErrorKind::UpdateFailure => "update failure",
            ErrorKind::Environment => "environment",
        }
    }
}

/// One recorded failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEntry {
    pub kind: ErrorKind,
    pub message: String,
    pub timestamp_ms: f64,
    /// Running error number (1-based), survives eviction.
    pub seq: u64,
}

/// Bounded error history - oldest entry evicted at capacity.
pub struct ErrorLog {
    entries: VecDeque<ErrorEntry>,
    capacity: usize,
    total: u64,
}

impl ErrorLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            total: 0,
        }
    }

    /// Record a failure. Never fails; oldest entry drops at capacity.
    pub fn report(&mut self, kind: ErrorKind, message: impl Into<String>, now_ms: f64) {
        let message = message.into();
        self.total += 1;
        error!(kind = kind.label(), %message, "application error");

        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ErrorEntry {
            kind,
            message,
            timestamp_ms: now_ms,
            seq: self.total,
        });
    }

    /// Recent entries, oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &ErrorEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total failures reported over the log's lifetime, including evicted.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total = 0;
    }
}

impl Default for ErrorLog {
    fn default() -> Self {
        // Matches the retained-history cap of the reference UI.
        Self::new(50)
    }
}
