//! Deterministic draw streams
//!
//! Every random number the engine consumes comes from one [`DrawStream`].
//! A stream is either seeded (ChaCha8, reproducible from its seed) or
//! scripted (a fixed queue of raw draws, used by tests to pin outcomes).
//! Both kinds can record a trace of every draw for divergence debugging.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A draw trace entry for debugging divergences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngTraceEntry {
    /// Sequence number (0-indexed)
    pub seq: u64,
    /// Caller-supplied label (e.g. "randint0", "randint1")
    pub func: &'static str,
    /// Exclusive upper bound of the draw
    pub bound: u32,
    /// Raw value in `0..bound`
    pub raw: u32,
}

#[derive(Debug, Clone)]
enum Source {
    Seeded { rng: ChaCha8Rng, seed: u64 },
    Scripted { queue: VecDeque<u32>, exhausted: u64 },
}

/// Saved form of a source. Seeded streams keep their seed and how far
/// into the ChaCha keystream they have read.
#[derive(Serialize, Deserialize)]
enum SavedSource {
    Seeded { seed: u64, word_pos: u128 },
    Scripted(Vec<u32>),
}

#[derive(Serialize, Deserialize)]
struct SavedStream {
    source: SavedSource,
    call_count: u64,
}

/// Source of raw uniform draws in `0..bound`.
#[derive(Debug, Clone)]
pub struct DrawStream {
    source: Source,
    /// Total number of draws taken
    call_count: u64,
    /// If true, record all draws into the trace log
    tracing: bool,
    trace: Vec<RngTraceEntry>,
}

impl DrawStream {
    /// Create a stream seeded from a u64.
    pub fn seeded(seed: u64) -> Self {
        Self::from_source(Source::Seeded {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        })
    }

    /// Create a stream that replays `values` in order.
    ///
    /// Each value is a raw zero-based draw; a value at or above the bound of
    /// the draw it answers is clamped to `bound - 1`. Once the script runs
    /// out every further draw yields 0.
    pub fn scripted<I>(values: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        Self::from_source(Source::Scripted {
            queue: values.into_iter().collect(),
            exhausted: 0,
        })
    }

    fn from_source(source: Source) -> Self {
        Self {
            source,
            call_count: 0,
            tracing: false,
            trace: Vec::new(),
        }
    }

    /// Seed of a seeded stream.
    pub fn seed(&self) -> Option<u64> {
        match &self.source {
            Source::Seeded { seed, .. } => Some(*seed),
            Source::Scripted { .. } => None,
        }
    }

    /// Returns a raw value in `[0, bound)`. `bound` must be at least 1.
    pub fn next_below(&mut self, func: &'static str, bound: u32) -> u32 {
        let bound = bound.max(1);
        let raw = match &mut self.source {
            Source::Seeded { rng, .. } => rng.gen_range(0..bound),
            Source::Scripted { queue, exhausted } => match queue.pop_front() {
                Some(v) => v.min(bound - 1),
                None => {
                    *exhausted += 1;
                    tracing::warn!(func, bound, "scripted draw stream exhausted");
                    0
                }
            },
        };
        if self.tracing {
            self.trace.push(RngTraceEntry {
                seq: self.call_count,
                func,
                bound,
                raw,
            });
        }
        self.call_count += 1;
        raw
    }

    /// Number of scripted draws still queued (0 for seeded streams).
    pub fn remaining_script(&self) -> usize {
        match &self.source {
            Source::Scripted { queue, .. } => queue.len(),
            Source::Seeded { .. } => 0,
        }
    }

    /// Number of draws answered after the script ran dry.
    pub fn exhausted_draws(&self) -> u64 {
        match &self.source {
            Source::Scripted { exhausted, .. } => *exhausted,
            Source::Seeded { .. } => 0,
        }
    }

    /// Enable draw tracing (clears any previous trace)
    pub fn enable_tracing(&mut self) {
        self.tracing = true;
        self.trace.clear();
    }

    /// Disable draw tracing
    pub fn disable_tracing(&mut self) {
        self.tracing = false;
    }

    /// Recorded trace
    pub fn trace(&self) -> &[RngTraceEntry] {
        &self.trace
    }

    /// Total number of draws taken
    pub fn call_count(&self) -> u64 {
        self.call_count
    }
}

impl Default for DrawStream {
    fn default() -> Self {
        Self::seeded(0)
    }
}

// Custom serialization: a restored stream continues where it left off.
// The trace is debugging state and is not saved.
impl Serialize for DrawStream {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let source = match &self.source {
            Source::Seeded { rng, seed } => SavedSource::Seeded {
                seed: *seed,
                word_pos: rng.get_word_pos(),
            },
            Source::Scripted { queue, .. } => SavedSource::Scripted(queue.iter().copied().collect()),
        };
        SavedStream {
            source,
            call_count: self.call_count,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DrawStream {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let saved = SavedStream::deserialize(deserializer)?;
        let mut stream = match saved.source {
            SavedSource::Seeded { seed, word_pos } => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_word_pos(word_pos);
                DrawStream::from_source(Source::Seeded { rng, seed })
            }
            SavedSource::Scripted(values) => DrawStream::scripted(values),
        };
        stream.call_count = saved.call_count;
        Ok(stream)
    }
}
