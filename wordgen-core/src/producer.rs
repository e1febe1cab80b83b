// SPDX-License-Identifier: MIT
//
// Wordgen: Exhaustive Candidate Word Enumeration
// Copyright (c) 2025 Wordgen Contributors

//! Background producer loop
//!
//! One thread per run. Each iteration takes the engine lock once, renders the
//! counter into the next free slot, wakes a consumer and advances the counter.
//! A full buffer is handled by sleeping for the configured backoff and polling
//! again.

use crate::buffer::PushStatus;
use crate::counter::CounterStatus;
use crate::engine::Inner;
use crate::stats::Phase;
use crate::Result;
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

/// Spawn the producer thread for one run
///
/// `done` receives the run's outcome after the phase has moved to
/// [`Phase::Stopped`].
pub(crate) fn spawn(
    inner: Arc<Inner>,
    cancel: CancellationToken,
    done: oneshot::Sender<Result<()>>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("wordgen-producer".to_string())
        .spawn(move || {
            let guard = ExitGuard { inner: &inner };
            let result = run(&inner, &cancel);
            drop(guard);
            // the receiver may have been dropped; nobody is waiting then
            let _ = done.send(result);
        })
}

fn run(inner: &Arc<Inner>, cancel: &CancellationToken) -> Result<()> {
    loop {
        let mut state = inner.state.lock();

        if state.phase.is_running() && cancel.is_cancelled() {
            debug!("cancellation requested");
            state.phase = Phase::Stopping;
        }
        if !state.phase.is_running() {
            debug!(produced = state.ring.write_cursor(), "producer observed stop");
            return Ok(());
        }

        let state_ref = &mut *state;
        let counter = &mut state_ref.counter;
        let status = state_ref
            .ring
            .try_push_with(|slot| counter.decode_into(&inner.charset, slot));

        if status == PushStatus::Full {
            drop(state);
            // only this thread still holds the engine, nobody can drain it
            if Arc::strong_count(inner) == 1 {
                debug!("all handles dropped, stopping producer");
                return Ok(());
            }
            trace!("buffer full, backing off for {:?}", inner.backoff);
            thread::sleep(inner.backoff);
            continue;
        }

        inner.not_empty.notify_one();

        if counter.advance() == CounterStatus::Exhausted {
            state_ref.phase = Phase::Stopping;
            info!(produced = state_ref.ring.write_cursor(), "enumeration exhausted");
            return Ok(());
        }
    }
}

/// Marks the run stopped and wakes every blocked consumer, on return or unwind
struct ExitGuard<'a> {
    inner: &'a Inner,
}

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.inner.state.lock();
        state.phase = Phase::Stopped;
        state.clock.finish();
        drop(state);
        self.inner.not_empty.notify_all();
    }
}
