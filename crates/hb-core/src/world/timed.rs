//! Timed status counters
//!
//! Each status is a remaining duration clamped to `0..=TIMED_MAX`; zero
//! means inactive. Setting a counter reports whether the status switched
//! between active and inactive so callers can narrate exactly once.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::consts::TIMED_MAX;

/// Most statuses a single counter set can hold
pub const MAX_TIMED_KINDS: usize = 8;

/// A status enum usable as a counter index
pub trait TimedKind: Copy {
    fn index(self) -> usize;
}

/// What a counter update did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// inactive -> active
    Started,
    /// active -> inactive
    Ended,
    /// active -> active, or inactive -> inactive
    Unchanged,
}

impl Transition {
    /// True when the status switched on or off
    pub const fn noticed(self) -> bool {
        !matches!(self, Transition::Unchanged)
    }
}

/// Counters for one actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TimedCounters<S> {
    values: [u16; MAX_TIMED_KINDS],
    #[serde(skip)]
    _kind: PhantomData<S>,
}

impl<S> Default for TimedCounters<S> {
    fn default() -> Self {
        Self {
            values: [0; MAX_TIMED_KINDS],
            _kind: PhantomData,
        }
    }
}

impl<S: TimedKind> TimedCounters<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, status: S) -> u16 {
        self.values[status.index()]
    }

    pub fn is_active(&self, status: S) -> bool {
        self.get(status) > 0
    }

    /// Set a counter; negative values clamp to 0, large ones to `TIMED_MAX`
    pub fn set(&mut self, status: S, value: i32) -> Transition {
        let old = self.values[status.index()];
        let new = value.clamp(0, i32::from(TIMED_MAX)) as u16;
        self.values[status.index()] = new;
        match (old > 0, new > 0) {
            (false, true) => Transition::Started,
            (true, false) => Transition::Ended,
            _ => Transition::Unchanged,
        }
    }

    /// Add to a counter (may be negative)
    pub fn add(&mut self, status: S, delta: i32) -> Transition {
        let cur = i32::from(self.get(status));
        self.set(status, cur + delta)
    }

    pub fn clear(&mut self, status: S) -> Transition {
        self.set(status, 0)
    }
}
