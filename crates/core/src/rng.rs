//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomization algorithm: each bag contains one of
//! each piece (I, J, L, O, S, T, Z), shuffled. Bags are appended to a lookahead
//! queue so the next few pieces are always known in advance for the preview.
//!
//! Also provides a simple LCG for deterministic games and garbage-row holes.

use std::collections::VecDeque;

use crate::types::{PieceKind, MAX_PREVIEW_COUNT};

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
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// 7-bag piece generator with a lookahead queue
#[derive(Debug, Clone)]
pub struct PieceQueue {
    /// Pieces already decided, front = next to spawn
    upcoming: VecDeque<PieceKind>,
    /// RNG for shuffling
    rng: SimpleRng,
    seed: u32,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u32) -> Self {
        let mut queue = Self {
            upcoming: VecDeque::with_capacity(2 * PieceKind::ALL.len()),
            rng: SimpleRng::new(seed),
            seed,
        };
        queue.top_up();
        queue
    }

    /// Keep at least one full preview plus the piece being drawn queued up
    fn top_up(&mut self) {
        while self.upcoming.len() <= MAX_PREVIEW_COUNT {
            let mut bag = PieceKind::ALL;
            self.rng.shuffle(&mut bag);
            self.upcoming.extend(bag);
        }
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> PieceKind {
        // top_up keeps the queue non-empty
        self.upcoming.front().copied().unwrap_or(PieceKind::I)
    }

    /// The next `count` pieces in draw order (capped at [`MAX_PREVIEW_COUNT`])
    pub fn preview(&self, count: usize) -> Vec<PieceKind> {
        self.upcoming
            .iter()
            .take(count.min(MAX_PREVIEW_COUNT))
            .copied()
            .collect()
    }

    /// Draw the next piece from the queue
    pub fn draw(&mut self) -> PieceKind {
        let piece = self.peek();
        self.upcoming.pop_front();
        self.top_up();
        piece
    }

    /// The seed this queue was created with (for restarting with the same sequence)
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}
