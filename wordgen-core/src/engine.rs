// SPDX-License-Identifier: MIT
//
// Wordgen: Exhaustive Candidate Word Enumeration
// Copyright (c) 2025 Wordgen Contributors

//! The word generator engine
//!
//! [`WordGen`] owns the counter, the slot ring and the lifecycle state behind a
//! single `parking_lot::Mutex`. A companion `Condvar` parks consumers while the
//! buffer is empty; the producer thread wakes them as it writes.
//!
//! # Example
//!
//! ```no_run
//! use tokio_util::sync::CancellationToken;
//! use wordgen_core::{Config, WordGen};
//!
//! let config = Config {
//!     charset: "abc".to_string(),
//!     min_len: 1,
//!     max_len: 2,
//!     ..Default::default()
//! };
//! let generator = WordGen::new(config)?;
//! let completion = generator.start(CancellationToken::new())?;
//!
//! for word in generator.words() {
//!     println!("{}", String::from_utf8_lossy(&word));
//! }
//! completion.wait()?;
//! # Ok::<(), wordgen_core::Error>(())
//! ```

use crate::buffer::{SlotRing, WatermarkLevel};
use crate::charset::Charset;
use crate::config::Config;
use crate::counter::Counter;
use crate::producer;
use crate::stats::{Phase, RunClock, Stats};
use crate::{Error, Result};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Exhaustive word generator with a bounded, concurrently drained buffer
///
/// Cloning is cheap and every clone drives the same engine, so each consumer
/// thread can hold its own handle.
#[derive(Clone)]
pub struct WordGen {
    inner: Arc<Inner>,
}

pub(crate) struct Inner {
    pub(crate) charset: Charset,
    pub(crate) backoff: Duration,
    pub(crate) state: Mutex<State>,
    pub(crate) not_empty: Condvar,
    initial: Vec<usize>,
    config: Config,
}

/// Everything guarded by the engine lock
pub(crate) struct State {
    pub(crate) ring: SlotRing,
    pub(crate) counter: Counter,
    pub(crate) phase: Phase,
    pub(crate) clock: RunClock,
}

impl WordGen {
    /// Validate `config` and allocate the buffer
    ///
    /// Nothing runs until [`WordGen::start`] is called.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let charset = config.build_charset()?;
        let initial = config.initial_digits(&charset)?;

        let ring = SlotRing::new(config.buffer_size, config.max_len);
        let counter = Counter::new(&initial, charset.radix(), config.max_len);
        debug!(
            radix = charset.radix(),
            capacity = ring.capacity(),
            "word generator created"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                backoff: config.backoff(),
                charset,
                state: Mutex::new(State {
                    ring,
                    counter,
                    phase: Phase::Idle,
                    clock: RunClock::default(),
                }),
                not_empty: Condvar::new(),
                initial,
                config,
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn charset(&self) -> &Charset {
        &self.inner.charset
    }

    /// Buffer capacity in words, after rounding
    pub fn capacity(&self) -> usize {
        self.inner.state.lock().ring.capacity()
    }

    /// Start producing words in a background thread
    ///
    /// Every run begins at the configured initial state with an empty buffer.
    /// Cancelling `cancel` has the same effect as [`WordGen::stop`]. The
    /// returned [`Completion`] resolves once the producer has exited.
    ///
    /// # Errors
    /// - [`Error::AlreadyRunning`] if a producer is still alive; nothing changes
    /// - [`Error::Io`] if the producer thread could not be spawned
    #[instrument(skip(self, cancel), fields(radix = self.inner.charset.radix()))]
    pub fn start(&self, cancel: CancellationToken) -> Result<Completion> {
        let (tx, rx) = oneshot::channel();

        {
            let mut state = self.inner.state.lock();
            if matches!(state.phase, Phase::Running | Phase::Stopping) {
                return Err(Error::AlreadyRunning);
            }
            state.counter = Counter::new(
                &self.inner.initial,
                self.inner.charset.radix(),
                self.inner.config.max_len,
            );
            state.ring.reset();
            state.clock.start();
            state.phase = Phase::Running;
        }

        info!(
            min_len = self.inner.config.min_len,
            max_len = self.inner.config.max_len,
            capacity = self.capacity(),
            "starting word generation"
        );

        if let Err(e) = producer::spawn(Arc::clone(&self.inner), cancel, tx) {
            let mut state = self.inner.state.lock();
            state.phase = Phase::Stopped;
            state.clock.finish();
            drop(state);
            self.inner.not_empty.notify_all();
            return Err(Error::Io(e));
        }

        Ok(Completion { rx })
    }

    /// Ask the producer to stop
    ///
    /// Words already buffered stay available. Calling this more than once, or
    /// on an engine that is not running, does nothing.
    pub fn stop(&self) {
        let mut state = self.inner.state.lock();
        if state.phase.is_running() {
            info!(produced = state.ring.write_cursor(), "stopping word generation");
            state.phase = Phase::Stopping;
        }
        drop(state);
        self.inner.not_empty.notify_all();
    }

    pub fn phase(&self) -> Phase {
        self.inner.state.lock().phase
    }

    /// Snapshot of counters and elapsed time, taken under the engine lock
    pub fn stats(&self) -> Stats {
        let state = self.inner.state.lock();
        Stats {
            produced: state.ring.write_cursor(),
            consumed: state.ring.read_cursor(),
            buffered: state.ring.len() as u64,
            elapsed: state.clock.elapsed(),
            phase: state.phase,
        }
    }

    /// Current buffer fill level
    pub fn watermark(&self) -> WatermarkLevel {
        self.inner.state.lock().ring.watermark()
    }

    /// Take the next word, blocking while the buffer is empty
    ///
    /// Returns `None` once the engine has stopped and every buffered word has
    /// been handed out. From then on every call returns `None` until the
    /// engine is started again.
    pub fn next_word(&self) -> Option<Vec<u8>> {
        let mut word = Vec::with_capacity(self.inner.config.max_len);
        self.next_into(&mut word).then_some(word)
    }

    /// Like [`WordGen::next_word`], writing into `out` instead of allocating
    ///
    /// Returns `false` at the end of the sequence, leaving `out` untouched.
    pub fn next_into(&self, out: &mut Vec<u8>) -> bool {
        let mut state = self.inner.state.lock();
        if !self.wait_for_word(&mut state) {
            return false;
        }
        match state.ring.try_pop() {
            Some(word) => {
                out.clear();
                out.extend_from_slice(word);
                true
            }
            None => false,
        }
    }

    /// Fill `words` with consecutive words, reusing each element's allocation
    ///
    /// Blocks while the buffer is momentarily empty. Returns how many elements
    /// were filled; fewer than `words.len()` means the sequence has ended.
    pub fn batch(&self, words: &mut [Vec<u8>]) -> usize {
        if words.is_empty() {
            return 0;
        }

        let mut state = self.inner.state.lock();
        let mut count = 0;
        for dst in words.iter_mut() {
            if !self.wait_for_word(&mut state) {
                break;
            }
            let Some(word) = state.ring.try_pop() else {
                break;
            };
            dst.clear();
            dst.extend_from_slice(word);
            count += 1;
        }
        count
    }

    /// Blocking iterator over the remaining words
    pub fn words(&self) -> Words<'_> {
        Words { generator: self }
    }

    /// Park until a word is buffered; `false` means the sequence is over
    fn wait_for_word(&self, state: &mut MutexGuard<'_, State>) -> bool {
        while state.ring.is_empty() {
            if !state.phase.is_running() {
                return false;
            }
            self.inner.not_empty.wait(state);
        }
        true
    }
}

/// One-shot signal resolving when a run's producer exits
///
/// Exhaustion and cancellation both resolve to `Ok(())`. Block on it with
/// [`Completion::wait`] or `.await` it from async code.
#[derive(Debug)]
#[must_use = "dropping a Completion does not stop the producer"]
pub struct Completion {
    rx: oneshot::Receiver<Result<()>>,
}

impl Completion {
    /// Block the current thread until the producer exits
    ///
    /// # Panics
    /// Panics when called from within an asynchronous execution context;
    /// `.await` the completion there instead.
    pub fn wait(self) -> Result<()> {
        self.rx.blocking_recv().unwrap_or(Err(Error::ProducerLost))
    }
}

impl Future for Completion {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(Error::ProducerLost)))
    }
}

/// Iterator returned by [`WordGen::words`]
pub struct Words<'a> {
    generator: &'a WordGen,
}

impl Iterator for Words<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        self.generator.next_word()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;
    use std::time::Instant;

    fn abc_config(min_len: usize, max_len: usize, buffer_size: usize) -> Config {
        Config {
            charset: "abc".to_string(),
            min_len,
            max_len,
            buffer_size,
            backoff_ms: 1,
            ..Default::default()
        }
    }

    fn as_strings(words: Vec<Vec<u8>>) -> Vec<String> {
        words
            .into_iter()
            .map(|w| String::from_utf8(w).unwrap())
            .collect()
    }

    fn wait_until(generator: &WordGen, mut ready: impl FnMut(&Stats) -> bool) -> Stats {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            let stats = generator.stats();
            if ready(&stats) {
                return stats;
            }
            assert!(Instant::now() < deadline, "timed out, last stats: {:?}", stats);
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_basic_sequence() {
        let generator = WordGen::new(abc_config(1, 2, 10)).unwrap();
        let completion = generator.start(CancellationToken::new()).unwrap();

        let words = as_strings(generator.words().collect());
        assert_eq!(
            words,
            vec!["a", "b", "c", "aa", "ba", "ca", "ab", "bb", "cb", "ac", "bc", "cc"]
        );

        // end of sequence is final
        assert_eq!(generator.next_word(), None);
        assert_eq!(generator.next_word(), None);
        assert!(completion.wait().is_ok());
    }

    #[test]
    fn test_custom_initial_state() {
        let mut config = abc_config(1, 2, 10);
        config.initial_state = Some("ba".to_string());
        let generator = WordGen::new(config).unwrap();
        let _completion = generator.start(CancellationToken::new()).unwrap();

        let first: Vec<_> = as_strings(generator.words().take(5).collect());
        assert_eq!(first, vec!["ba", "ca", "ab", "bb", "cb"]);
    }

    #[test]
    fn test_counts_match_search_space() {
        for (charset, min_len, max_len, buffer_size) in [
            ("abc", 1, 4, 1),
            ("ab", 3, 6, 4),
            ("xyz01", 2, 3, 1000),
            ("q", 1, 7, 2),
        ] {
            let config = Config {
                charset: charset.to_string(),
                min_len,
                max_len,
                buffer_size,
                backoff_ms: 1,
                ..Default::default()
            };
            let generator = WordGen::new(config).unwrap();
            let completion = generator.start(CancellationToken::new()).unwrap();

            let words: Vec<_> = generator.words().collect();
            let unique: HashSet<_> = words.iter().collect();
            let expected = generator.charset().search_space(min_len, max_len).unwrap();

            assert_eq!(words.len() as u128, expected, "charset {:?}", charset);
            assert_eq!(unique.len(), words.len(), "charset {:?}", charset);
            completion.wait().unwrap();
            assert_eq!(generator.stats().produced as u128, expected);
        }
    }

    #[test]
    fn test_deterministic_order() {
        let run = || {
            let generator = WordGen::new(abc_config(2, 4, 8)).unwrap();
            let _completion = generator.start(CancellationToken::new()).unwrap();
            generator.words().collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_interleaved_next_and_batch() {
        let expected: Vec<_> = {
            let generator = WordGen::new(abc_config(1, 4, 4)).unwrap();
            let _completion = generator.start(CancellationToken::new()).unwrap();
            generator.words().collect()
        };

        let generator = WordGen::new(abc_config(1, 4, 4)).unwrap();
        let _completion = generator.start(CancellationToken::new()).unwrap();
        let mut seen = Vec::new();
        let mut batch = vec![Vec::new(); 7];
        loop {
            match generator.next_word() {
                Some(word) => seen.push(word),
                None => break,
            }
            let n = generator.batch(&mut batch);
            seen.extend(batch[..n].iter().cloned());
            if n < batch.len() {
                break;
            }
        }
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_concurrent_consumers() {
        for consumers in [1, 2, 5, 8] {
            let generator = WordGen::new(abc_config(1, 6, 8)).unwrap();
            let completion = generator.start(CancellationToken::new()).unwrap();

            let handles: Vec<_> = (0..consumers)
                .map(|i| {
                    let generator = generator.clone();
                    thread::spawn(move || {
                        let mut words = Vec::new();
                        if i % 2 == 0 {
                            words.extend(generator.words());
                        } else {
                            let mut batch = vec![Vec::new(); 16];
                            loop {
                                let n = generator.batch(&mut batch);
                                words.extend(batch[..n].iter().cloned());
                                if n < batch.len() {
                                    break;
                                }
                            }
                        }
                        words
                    })
                })
                .collect();

            let mut all = Vec::new();
            for handle in handles {
                all.extend(handle.join().unwrap());
            }
            completion.wait().unwrap();

            let unique: HashSet<_> = all.iter().collect();
            assert_eq!(all.len(), 1092, "{} consumers", consumers);
            assert_eq!(unique.len(), all.len(), "{} consumers", consumers);
        }
    }

    #[test]
    fn test_stop_keeps_buffered_words() {
        let config = Config {
            buffer_size: 8,
            backoff_ms: 1,
            ..Default::default()
        };
        let generator = WordGen::new(config).unwrap();
        let completion = generator.start(CancellationToken::new()).unwrap();

        wait_until(&generator, |s| s.buffered == 8);
        generator.stop();
        generator.stop();
        completion.wait().unwrap();
        assert_eq!(generator.phase(), Phase::Stopped);

        let words: Vec<_> = as_strings(generator.words().collect());
        assert_eq!(words.len(), 8);
        assert_eq!(words[0], "aaaaaaaa");
        assert_eq!(words[1], "baaaaaaa");
        assert_eq!(generator.next_word(), None);
        assert_eq!(generator.stats().produced, 8);
    }

    #[test]
    fn test_cancellation_token() {
        let config = Config {
            buffer_size: 4,
            backoff_ms: 1,
            ..Default::default()
        };
        let generator = WordGen::new(config).unwrap();
        let cancel = CancellationToken::new();
        let completion = generator.start(cancel.clone()).unwrap();

        assert!(generator.next_word().is_some());
        cancel.cancel();
        assert!(completion.wait().is_ok());

        let drained = generator.words().count();
        assert!(drained <= 4);
        assert_eq!(generator.next_word(), None);
    }

    #[test]
    fn test_already_running() {
        let config = Config {
            buffer_size: 2,
            backoff_ms: 1,
            ..Default::default()
        };
        let generator = WordGen::new(config).unwrap();
        let completion = generator.start(CancellationToken::new()).unwrap();

        assert!(matches!(
            generator.start(CancellationToken::new()),
            Err(Error::AlreadyRunning)
        ));
        assert_eq!(generator.phase(), Phase::Running);
        assert_eq!(generator.next_word().as_deref(), Some(&b"aaaaaaaa"[..]));

        generator.stop();
        completion.wait().unwrap();
    }

    #[test]
    fn test_short_batch_signals_end() {
        let generator = WordGen::new(abc_config(1, 1, 16)).unwrap();
        let completion = generator.start(CancellationToken::new()).unwrap();
        completion.wait().unwrap();

        let mut batch = vec![Vec::new(); 10];
        assert_eq!(generator.batch(&mut batch), 3);
        assert_eq!(as_strings(batch[..3].to_vec()), vec!["a", "b", "c"]);
        assert_eq!(generator.batch(&mut batch), 0);
        assert_eq!(generator.batch(&mut []), 0);
    }

    #[test]
    fn test_batch_reuses_destinations() {
        let generator = WordGen::new(abc_config(3, 3, 4)).unwrap();
        let _completion = generator.start(CancellationToken::new()).unwrap();

        let mut batch: Vec<Vec<u8>> = (0..4).map(|_| Vec::with_capacity(32)).collect();
        let before: Vec<_> = batch.iter().map(|w| w.as_ptr()).collect();
        assert_eq!(generator.batch(&mut batch), 4);
        let after: Vec<_> = batch.iter().map(|w| w.as_ptr()).collect();

        assert_eq!(before, after);
        assert_eq!(as_strings(batch), vec!["aaa", "baa", "caa", "aba"]);
    }

    #[test]
    fn test_stats_frozen_after_completion() {
        let generator = WordGen::new(abc_config(1, 2, 16)).unwrap();
        let idle = generator.stats();
        assert_eq!(idle.produced, 0);
        assert_eq!(idle.elapsed, Duration::ZERO);
        assert_eq!(idle.phase, Phase::Idle);

        let completion = generator.start(CancellationToken::new()).unwrap();
        completion.wait().unwrap();

        let stats = generator.stats();
        assert_eq!(stats.produced, 12);
        assert_eq!(stats.consumed, 0);
        assert_eq!(stats.buffered, 12);
        assert_eq!(stats.phase, Phase::Stopped);
        thread::sleep(Duration::from_millis(5));
        assert_eq!(generator.stats().elapsed, stats.elapsed);
    }

    #[test]
    fn test_restart_after_stop() {
        let generator = WordGen::new(abc_config(1, 2, 16)).unwrap();
        let first = generator.start(CancellationToken::new()).unwrap();
        let a: Vec<_> = generator.words().collect();
        first.wait().unwrap();

        let second = generator.start(CancellationToken::new()).unwrap();
        let b: Vec<_> = generator.words().collect();
        second.wait().unwrap();

        assert_eq!(a.len(), 12);
        assert_eq!(a, b);
        // counts restart with each run
        assert_eq!(generator.stats().produced, 12);
    }

    #[test]
    fn test_idle_engine_has_no_words() {
        let generator = WordGen::new(abc_config(1, 2, 4)).unwrap();
        assert_eq!(generator.next_word(), None);
        let mut out = b"keep".to_vec();
        assert!(!generator.next_into(&mut out));
        assert_eq!(out, b"keep");
    }

    #[test]
    fn test_dropping_all_handles_stops_producer() {
        let config = Config {
            buffer_size: 1,
            backoff_ms: 1,
            ..Default::default()
        };
        let generator = WordGen::new(config).unwrap();
        let completion = generator.start(CancellationToken::new()).unwrap();
        drop(generator);
        assert!(completion.wait().is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            WordGen::new(abc_config(3, 1, 4)),
            Err(Error::InvalidLengthRange { .. })
        ));
        let mut config = abc_config(1, 2, 4);
        config.initial_state = Some("zz".to_string());
        assert!(matches!(
            WordGen::new(config),
            Err(Error::UnknownSymbol { symbol: 'z', index: 0 })
        ));
    }

    #[test]
    fn test_oversized_config_fails_before_allocating() {
        assert!(matches!(
            WordGen::new(abc_config(1, 2, usize::MAX)),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            WordGen::new(abc_config(1, usize::MAX, 4)),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_capacity_rounded_up() {
        assert_eq!(WordGen::new(abc_config(1, 2, 10)).unwrap().capacity(), 16);
        assert_eq!(WordGen::new(abc_config(1, 2, 0)).unwrap().capacity(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_async_completion() {
        let generator = WordGen::new(abc_config(1, 3, 4)).unwrap();
        let completion = generator.start(CancellationToken::new()).unwrap();

        let consumer = generator.clone();
        let count = tokio::task::spawn_blocking(move || consumer.words().count())
            .await
            .unwrap();

        assert_eq!(count, 39);
        assert!(completion.await.is_ok());
        assert_eq!(generator.phase(), Phase::Stopped);
    }

    #[test]
    #[ignore = "enumerates 916,132,832 words; run with --ignored in release mode"]
    fn test_all_five_letter_words() {
        let config = Config {
            min_len: 5,
            max_len: 5,
            buffer_size: 1 << 20,
            ..Default::default()
        };
        let generator = WordGen::new(config).unwrap();
        let completion = generator.start(CancellationToken::new()).unwrap();

        let mut batch = vec![Vec::new(); 1000];
        let mut total: u64 = 0;
        let mut last = Vec::new();
        loop {
            let n = generator.batch(&mut batch);
            if n > 0 {
                last.clone_from(&batch[n - 1]);
            }
            total += n as u64;
            if n < batch.len() {
                break;
            }
        }

        completion.wait().unwrap();
        assert_eq!(total, 916_132_832);
        assert_eq!(last, b"99999");
        assert_eq!(generator.stats().produced, 916_132_832);
    }
}
