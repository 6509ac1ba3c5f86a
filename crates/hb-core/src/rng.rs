//! Random number generation for the engine
//!
//! All draws go through one [`DrawStream`] so that the order of draws is
//! reproducible. Tests build the generator from a script of raw values with
//! [`GameRng::scripted`]; each raw value answers one draw and is the
//! zero-based result of that draw (so `randint1` returns `raw + 1`).

use hb_rng::{DrawStream, RngTraceEntry};
use serde::{Deserialize, Serialize};

/// Game random number generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameRng {
    stream: DrawStream,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            stream: DrawStream::seeded(seed),
        }
    }

    /// Create an RNG that answers draws from a fixed script
    pub fn scripted<I>(values: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        Self {
            stream: DrawStream::scripted(values),
        }
    }

    /// Seed of a seeded generator
    pub fn seed(&self) -> Option<u64> {
        self.stream.seed()
    }

    /// Returns 0..n-1. Bounds of 1 or less return 0 without drawing.
    pub fn randint0(&mut self, n: i32) -> i32 {
        if n <= 1 {
            return 0;
        }
        self.stream.next_below("randint0", n as u32) as i32
    }

    /// Returns 1..n. Bounds of 1 or less return 1 without drawing.
    pub fn randint1(&mut self, n: i32) -> i32 {
        if n <= 1 {
            return 1;
        }
        self.stream.next_below("randint1", n as u32) as i32 + 1
    }

    /// Returns true with probability 1/n
    pub fn one_in(&mut self, n: i32) -> bool {
        self.randint0(n) == 0
    }

    /// Returns true with probability num/den
    pub fn coin_flip(&mut self, num: i32, den: i32) -> bool {
        self.randint0(den) < num
    }

    /// Roll `num` dice with `sides` sides
    pub fn damroll(&mut self, num: i32, sides: i32) -> i32 {
        if num <= 0 || sides <= 0 {
            return 0;
        }
        (0..num).map(|_| self.randint1(sides)).sum()
    }

    /// Returns `a` spread uniformly by up to `d` either side
    pub fn rand_spread(&mut self, a: i32, d: i32) -> i32 {
        a + self.randint0(1 + 2 * d.max(0)) - d.max(0)
    }

    /// Enable draw tracing (clears any previous trace)
    pub fn enable_tracing(&mut self) {
        self.stream.enable_tracing();
    }

    /// Recorded draw trace
    pub fn trace(&self) -> &[RngTraceEntry] {
        self.stream.trace()
    }

    /// Total draws taken so far
    pub fn call_count(&self) -> u64 {
        self.stream.call_count()
    }

    /// Scripted draws not yet consumed
    pub fn remaining_script(&self) -> usize {
        self.stream.remaining_script()
    }
}
