// SPDX-License-Identifier: MIT
//
// Wordgen: Exhaustive Candidate Word Enumeration
// Copyright (c) 2025 Wordgen Contributors

//! Wordgen Core Library
//!
//! This crate enumerates every word over a fixed charset whose length falls in
//! a configured range, in a deterministic, non-repeating and resumable order.
//! A background producer fills a bounded buffer while any number of consumer
//! threads drain it.
//!
//! # Architecture
//!
//! The library is organized into modules representing core concerns:
//! - `charset`: Validated symbol sets and search space size
//! - `counter`: Mixed-radix odometer defining enumeration order
//! - `buffer`: Power-of-two slot ring with monotonic cursors
//! - `engine`: Consumer API and start/stop lifecycle
//! - `producer`: Background loop feeding the buffer
//! - `stats`: Lifecycle phases and run statistics
//! - `config`: Configuration management with validation
//! - `error`: Unified error types
//!
//! # Guarantees
//!
//! 1. **Exhaustive**: every word of every length in range is produced once
//! 2. **Ordered**: a single consumer sees words in odometer order
//! 3. **Lossless**: concurrent consumers split the sequence without gaps or repeats
//! 4. **Drainable**: words buffered before a stop are still delivered

pub mod buffer;
pub mod charset;
pub mod config;
pub mod counter;
pub mod engine;
pub mod error;
mod producer;
pub mod stats;

pub use charset::Charset;
pub use config::Config;
pub use engine::{Completion, WordGen, Words};
pub use error::{Error, Result};
pub use stats::{Phase, Stats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default buffer capacity in words
pub const DEFAULT_BUFFER_SIZE: usize = 1024;
