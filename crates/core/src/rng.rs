//! RNG module - seeded randomness for board generation
//!
//! Provides a simple LCG so a seed reproduces a board exactly, plus the
//! note pool that hands out unique note identifiers without replacement.

use crate::types::{NoteId, NOTE_POOL_MAX, NOTE_POOL_MIN, NOTE_POOL_SIZE};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG have short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current RNG state (re-seeding with it continues the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Bounded pool of note identifiers drawn without replacement.
///
/// A fresh pool is used per layer so notes never collide inside a layer.
#[derive(Debug, Clone)]
pub struct NotePool {
    available: Vec<NoteId>,
}

impl NotePool {
    /// Full pool `NOTE_POOL_MIN..=NOTE_POOL_MAX`.
    pub fn new() -> Self {
        let mut available = Vec::with_capacity(NOTE_POOL_SIZE);
        available.extend((NOTE_POOL_MIN..=NOTE_POOL_MAX).map(NoteId::new));
        Self { available }
    }

    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    /// Draw one note uniformly at random, removing it from the pool.
    pub fn draw(&mut self, rng: &mut SimpleRng) -> Option<NoteId> {
        if self.available.is_empty() {
            return None;
        }
        let i = rng.next_range(self.available.len() as u32) as usize;
        Some(self.available.swap_remove(i))
    }

    /// Draw `pairs` unique notes, duplicate each, and shuffle the result.
    ///
    /// Returns `None` (leaving the pool untouched) if the pool is too small.
    pub fn draw_pairs(&mut self, pairs: usize, rng: &mut SimpleRng) -> Option<Vec<NoteId>> {
        if pairs > self.available.len() {
            return None;
        }

        let mut notes = Vec::with_capacity(pairs * 2);
        for _ in 0..pairs {
            let note = self.draw(rng)?;
            notes.push(note);
            notes.push(note);
        }
        rng.shuffle(&mut notes);
        Some(notes)
    }
}

impl Default for NotePool {
    fn default() -> Self {
        Self::new()
    }
}
