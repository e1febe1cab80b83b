// SPDX-License-Identifier: MIT
//
// Wordgen: Exhaustive Candidate Word Enumeration
// Copyright (c) 2025 Wordgen Contributors

//! Error types for the word generator
//!
//! Provides a unified error taxonomy using `thiserror` for ergonomic error handling.
//! Running out of words is not an error: consumers see `None` and the completion
//! signal resolves to `Ok(())`.

pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for word generation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The charset has no symbols
    #[error("charset cannot be empty")]
    EmptyCharset,

    /// The charset repeats a symbol
    #[error("duplicate symbol {symbol:?} in charset at index {index}")]
    DuplicateSymbol { symbol: char, index: usize },

    /// Length bounds are inverted or unusable
    #[error("invalid length range: min {min}, max {max}")]
    InvalidLengthRange { min: usize, max: usize },

    /// Initial state is shorter than the minimum length
    #[error("initial state has {len} symbols, less than min length {min}")]
    InitialStateTooShort { len: usize, min: usize },

    /// Initial state is longer than the maximum length
    #[error("initial state has {len} symbols, more than max length {max}")]
    InitialStateTooLong { len: usize, max: usize },

    /// Initial state uses a symbol outside the charset
    #[error("initial state contains symbol not in charset ({symbol:?}) at index {index}")]
    UnknownSymbol { symbol: char, index: usize },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// `start` was called while a producer is still alive
    #[error("generator is already running")]
    AlreadyRunning,

    /// The producer stopped without reporting completion
    #[error("producer terminated unexpectedly")]
    ProducerLost,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if error was raised while validating configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyCharset
                | Error::DuplicateSymbol { .. }
                | Error::InvalidLengthRange { .. }
                | Error::InitialStateTooShort { .. }
                | Error::InitialStateTooLong { .. }
                | Error::UnknownSymbol { .. }
                | Error::Config(_)
        )
    }
}

impl From<envy::Error> for Error {
    fn from(e: envy::Error) -> Self {
        Error::Config(format!("Failed to parse environment variables: {}", e))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Config(format!("Failed to parse configuration file: {}", e))
    }
}
