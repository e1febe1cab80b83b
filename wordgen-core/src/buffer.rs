// SPDX-License-Identifier: MIT
//
// Wordgen: Exhaustive Candidate Word Enumeration
// Copyright (c) 2025 Wordgen Contributors

//! Fixed-capacity slot ring with monotonic cursors
//!
//! This module implements the bounded buffer that sits between the producer
//! and its consumers. Slots are allocated once and rewritten in place; the
//! write and read cursors only ever grow and are mapped to slots by masking.

/// Slot storage for produced words
///
/// # Design
///
/// - Capacity is rounded up to a power of two so `cursor & mask` selects a slot
/// - `write` is the next slot to fill, `read` the next slot to hand out
/// - `read <= write <= read + capacity` holds after every operation
/// - Slots keep their allocation between cycles and never grow past the
///   longest word pushed into them
///
/// The ring does no locking of its own; the engine keeps it behind its mutex.
#[derive(Debug)]
pub struct SlotRing {
    slots: Vec<Vec<u8>>,
    mask: u64,
    write: u64,
    read: u64,
}

/// Result of [`SlotRing::try_push_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum PushStatus {
    /// The word was written and the write cursor advanced
    Pushed,
    /// Every slot holds an unread word
    Full,
}

/// Buffer watermark levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatermarkLevel {
    Low,      // < 10%
    Medium,   // 10-80%
    High,     // 80-95%
    Critical, // > 95%
}

impl SlotRing {
    /// Create a ring holding at least `requested` words of up to `slot_len` bytes
    pub fn new(requested: usize, slot_len: usize) -> Self {
        let capacity = round_up_to_power_of_two(requested);
        let slots = (0..capacity).map(|_| Vec::with_capacity(slot_len)).collect();
        Self {
            slots,
            mask: capacity as u64 - 1,
            write: 0,
            read: 0,
        }
    }

    /// Write the next word through `fill`, unless the ring is full
    ///
    /// `fill` receives the slot's previous contents and must overwrite them.
    #[inline]
    pub fn try_push_with<F>(&mut self, fill: F) -> PushStatus
    where
        F: FnOnce(&mut Vec<u8>),
    {
        if self.is_full() {
            return PushStatus::Full;
        }
        let idx = (self.write & self.mask) as usize;
        fill(&mut self.slots[idx]);
        self.write += 1;
        PushStatus::Pushed
    }

    /// Copy `word` into the next free slot, unless the ring is full
    pub fn try_push(&mut self, word: &[u8]) -> PushStatus {
        self.try_push_with(|slot| {
            slot.clear();
            slot.extend_from_slice(word);
        })
    }

    /// Take the oldest unread word
    ///
    /// The returned view borrows the slot; it stays valid until the ring is
    /// mutated again.
    #[inline]
    pub fn try_pop(&mut self) -> Option<&[u8]> {
        if self.is_empty() {
            return None;
        }
        let idx = (self.read & self.mask) as usize;
        self.read += 1;
        Some(self.slots[idx].as_slice())
    }

    /// Number of unread words
    #[inline]
    pub fn len(&self) -> usize {
        (self.write - self.read) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.write == self.read
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.write - self.read > self.mask
    }

    /// Number of slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Total words written since the last reset
    pub fn write_cursor(&self) -> u64 {
        self.write
    }

    /// Total words read since the last reset
    pub fn read_cursor(&self) -> u64 {
        self.read
    }

    /// Get fill percentage (0.0 - 100.0)
    pub fn fill_percent(&self) -> f64 {
        (self.len() as f64 / self.capacity() as f64) * 100.0
    }

    /// Get current watermark level
    pub fn watermark(&self) -> WatermarkLevel {
        watermark_for(self.fill_percent())
    }

    /// Forget all unread words and rewind both cursors
    ///
    /// Slot allocations are kept.
    pub fn reset(&mut self) {
        self.write = 0;
        self.read = 0;
    }
}

/// Classify a fill percentage
pub fn watermark_for(percent: f64) -> WatermarkLevel {
    match percent {
        p if p < 10.0 => WatermarkLevel::Low,
        p if p < 80.0 => WatermarkLevel::Medium,
        p if p < 95.0 => WatermarkLevel::High,
        _ => WatermarkLevel::Critical,
    }
}

/// Smallest power of two that is `>= n`, with a floor of 1
pub fn round_up_to_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}
