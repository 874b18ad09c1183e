//! Fixed-capacity sample ring.
//!
//! Accumulates samples between processing passes.  When full, a push
//! **overwrites the oldest** sample; the number of overwritten samples is
//! counted so telemetry can show how much data the processing cadence lost.
//!
//! ```text
//!  push ──▶ [ s2 | s3 | s4 | s5 ] ──▶ drain (oldest first)
//!             ▲ head (oldest)
//! ```
//!
//! Storage is a plain array sized at compile time, no heap.

use heapless::Vec;

use super::sample::Sample;

/// Ring buffer of [`Sample`]s with capacity `N`.
pub struct SampleRing<const N: usize> {
    slots: [Sample; N],
    /// Index of the oldest sample.
    head: usize,
    len: usize,
    overwritten: u64,
}

impl<const N: usize> Default for SampleRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleRing<N> {
    pub const fn new() -> Self {
        assert!(N > 0, "SampleRing capacity must be non-zero");
        Self {
            slots: [Sample::new(0, 0); N],
            head: 0,
            len: 0,
            overwritten: 0,
        }
    }

    /// Append a sample in O(1).
    ///
    /// Returns `true` if the ring was full and the oldest sample was dropped.
    pub fn push(&mut self, sample: Sample) -> bool {
        if self.len < N {
            let tail = (self.head + self.len) % N;
            self.slots[tail] = sample;
            self.len += 1;
            false
        } else {
            // Full: the oldest slot becomes the newest.
            self.slots[self.head] = sample;
            self.head = (self.head + 1) % N;
            self.overwritten = self.overwritten.saturating_add(1);
            true
        }
    }

    /// Remove and return every buffered sample, oldest first.
    pub fn drain(&mut self) -> Vec<Sample, N> {
        let mut out = Vec::new();
        for i in 0..self.len {
            // Cannot fail: at most N samples are buffered.
            let _ = out.push(self.slots[(self.head + i) % N]);
        }
        self.head = 0;
        self.len = 0;
        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Total samples dropped by overwrite since construction.
    pub fn overwritten(&self) -> u64 {
        self.overwritten
    }
}
