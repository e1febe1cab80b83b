// SPDX-License-Identifier: MIT
//
// Wordgen: Exhaustive Candidate Word Enumeration
// Copyright (c) 2025 Wordgen Contributors

//! Lifecycle phases and run statistics

use std::time::{Duration, Instant};

/// Where the engine is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, never started
    Idle,
    /// The producer is filling the buffer
    Running,
    /// Stop was requested or the counter ran out; the producer has not exited yet
    Stopping,
    /// The producer has exited
    Stopped,
}

impl Phase {
    /// True while consumers may still expect new words
    pub fn is_running(self) -> bool {
        self == Phase::Running
    }
}

/// Point-in-time snapshot of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Words written into the buffer during the current run
    ///
    /// A restart resets this to zero along with the buffer cursors.
    pub produced: u64,
    /// Words handed to consumers
    pub consumed: u64,
    /// Words produced but not yet consumed
    pub buffered: u64,
    /// Time from start until now, or until the producer exited
    pub elapsed: Duration,
    pub phase: Phase,
}

impl Stats {
    /// Production rate over the elapsed time
    pub fn words_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.produced as f64 / secs
        } else {
            0.0
        }
    }
}

/// Start and finish instants of the current run
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RunClock {
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
}

impl RunClock {
    pub(crate) fn start(&mut self) {
        self.started_at = Some(Instant::now());
        self.finished_at = None;
    }

    pub(crate) fn finish(&mut self) {
        if self.finished_at.is_none() {
            self.finished_at = Some(Instant::now());
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        match (self.started_at, self.finished_at) {
            (None, _) => Duration::ZERO,
            (Some(start), None) => start.elapsed(),
            (Some(start), Some(end)) => end.duration_since(start),
        }
    }
}
