// SPDX-License-Identifier: MIT
//
// Wordgen: Exhaustive Candidate Word Enumeration
// Copyright (c) 2025 Wordgen Contributors

//! Validated symbol sets
//!
//! A [`Charset`] is the ordered alphabet words are built from. Its length is
//! the radix of the odometer; a symbol's position is its digit value.

use crate::{Error, Result};
use num_bigint::BigUint;

/// Default 62-symbol alphanumeric alphabet
pub const DEFAULT_CHARSET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Ordered set of unique single-byte symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    symbols: Vec<u8>,
    // byte -> digit value, u16::MAX when absent
    positions: [u16; 256],
}

const ABSENT: u16 = u16::MAX;

impl Charset {
    /// Validate and build a charset from raw symbols
    ///
    /// Fails on an empty set or on the first repeated symbol, reporting the
    /// index of the repetition.
    pub fn new(symbols: impl AsRef<[u8]>) -> Result<Self> {
        let symbols = symbols.as_ref();
        if symbols.is_empty() {
            return Err(Error::EmptyCharset);
        }

        let mut positions = [ABSENT; 256];
        for (index, &symbol) in symbols.iter().enumerate() {
            let slot = &mut positions[symbol as usize];
            if *slot != ABSENT {
                return Err(Error::DuplicateSymbol {
                    symbol: symbol as char,
                    index,
                });
            }
            // at most 256 distinct bytes, so the index always fits
            *slot = index as u16;
        }

        Ok(Self {
            symbols: symbols.to_vec(),
            positions,
        })
    }

    /// Number of symbols (the counter's radix)
    #[inline]
    pub fn radix(&self) -> usize {
        self.symbols.len()
    }

    /// Symbol for a digit value
    ///
    /// # Panics
    /// Panics if `digit >= self.radix()`.
    #[inline]
    pub fn symbol(&self, digit: usize) -> u8 {
        self.symbols[digit]
    }

    /// Digit value of a symbol, if it belongs to the set
    #[inline]
    pub fn position(&self, symbol: u8) -> Option<usize> {
        match self.positions[symbol as usize] {
            ABSENT => None,
            p => Some(p as usize),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.symbols
    }

    /// Decode a word into digit values, least significant first
    pub fn digits_of(&self, word: &[u8]) -> Result<Vec<usize>> {
        word.iter()
            .enumerate()
            .map(|(index, &symbol)| {
                self.position(symbol).ok_or(Error::UnknownSymbol {
                    symbol: symbol as char,
                    index,
                })
            })
            .collect()
    }

    /// Total number of words with lengths in `min..=max`
    ///
    /// Returns `None` when the sum does not fit in a `u128`.
    pub fn search_space(&self, min: usize, max: usize) -> Option<u128> {
        let radix = self.radix() as u128;
        let mut total: u128 = 0;
        let mut power: u128 = 1;
        for len in 0..=max {
            if len >= min {
                total = total.checked_add(power)?;
            }
            if len < max {
                power = power.checked_mul(radix)?;
            }
        }
        Some(total)
    }

    /// Exact total number of words with lengths in `min..=max`
    pub fn search_space_exact(&self, min: usize, max: usize) -> BigUint {
        let radix = BigUint::from(self.radix());
        let mut total = BigUint::from(0u32);
        let mut power = BigUint::from(1u32);
        for len in 0..=max {
            if len >= min {
                total += &power;
            }
            if len < max {
                power *= &radix;
            }
        }
        total
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::new(DEFAULT_CHARSET).expect("default charset is valid")
    }
}
