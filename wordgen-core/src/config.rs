// SPDX-License-Identifier: MIT
//
// Wordgen: Exhaustive Candidate Word Enumeration
// Copyright (c) 2025 Wordgen Contributors

//! Configuration management for the word generator

use crate::charset::{Charset, DEFAULT_CHARSET};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest accepted `buffer_size`; the ring allocates every slot up front
pub const MAX_BUFFER_SIZE: usize = 1 << 30;

/// Largest accepted `max_len`
pub const MAX_WORD_LEN: usize = 4096;

/// Word generator configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    /// Symbols words are built from, in digit order
    #[serde(default = "default_charset")]
    pub charset: String,

    /// Shortest word length (inclusive)
    #[serde(default = "default_min_len")]
    pub min_len: usize,

    /// Longest word length (inclusive)
    #[serde(default = "default_max_len")]
    pub max_len: usize,

    /// Word to resume from; defaults to the first word of `min_len`
    #[serde(default)]
    pub initial_state: Option<String>,

    /// Requested buffer capacity in words, rounded up to a power of two
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Producer sleep in milliseconds while the buffer is full
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            charset: default_charset(),
            min_len: default_min_len(),
            max_len: default_max_len(),
            initial_state: None,
            buffer_size: default_buffer_size(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config: Self = envy::prefixed("WORDGEN_").from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_yaml_str(&raw)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size > MAX_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "buffer_size must be <= {}, got {}",
                MAX_BUFFER_SIZE, self.buffer_size
            )));
        }

        if self.max_len > MAX_WORD_LEN {
            return Err(Error::Config(format!(
                "max_len must be <= {}, got {}",
                MAX_WORD_LEN, self.max_len
            )));
        }

        let charset = self.build_charset()?;
        self.initial_digits(&charset)?;

        if self.backoff_ms == 0 {
            return Err(Error::Config("backoff_ms must be > 0".to_string()));
        }

        Ok(())
    }

    /// Build the validated charset
    pub fn build_charset(&self) -> Result<Charset> {
        Charset::new(&self.charset)
    }

    /// Digits of the first word to produce
    ///
    /// Checks the length bounds, then the initial state's length, then its
    /// symbols.
    pub fn initial_digits(&self, charset: &Charset) -> Result<Vec<usize>> {
        if self.min_len == 0 || self.min_len > self.max_len {
            return Err(Error::InvalidLengthRange {
                min: self.min_len,
                max: self.max_len,
            });
        }

        match &self.initial_state {
            None => Ok(vec![0; self.min_len]),
            Some(word) => {
                let len = word.len();
                if len < self.min_len {
                    return Err(Error::InitialStateTooShort { len, min: self.min_len });
                }
                if len > self.max_len {
                    return Err(Error::InitialStateTooLong { len, max: self.max_len });
                }
                charset.digits_of(word.as_bytes())
            }
        }
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

// Default value functions
fn default_charset() -> String {
    DEFAULT_CHARSET.to_string()
}

fn default_min_len() -> usize {
    8
}

fn default_max_len() -> usize {
    10
}

fn default_buffer_size() -> usize {
    crate::DEFAULT_BUFFER_SIZE
}

fn default_backoff_ms() -> u64 {
    10
}
