// SPDX-License-Identifier: MIT
//
// Wordgen: Exhaustive Candidate Word Enumeration
// Copyright (c) 2025 Wordgen Contributors

//! Mixed-radix odometer defining enumeration order
//!
//! Digit 0 changes fastest. When a carry runs off the last digit a new zero
//! digit is appended, so every word of one length is produced before the
//! first word of the next length.

use crate::charset::Charset;

/// Outcome of [`Counter::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum CounterStatus {
    /// The counter moved to the next state
    Advanced,
    /// The next state would be longer than the maximum length
    Exhausted,
}

/// Odometer over digit values in `0..radix`
#[derive(Debug, Clone)]
pub struct Counter {
    digits: Vec<usize>,
    radix: usize,
    max_len: usize,
    exhausted: bool,
}

impl Counter {
    /// Create a counter positioned at `initial`
    ///
    /// Callers validate `initial` against the charset and length bounds; the
    /// counter only relies on every digit being below `radix`.
    pub fn new(initial: &[usize], radix: usize, max_len: usize) -> Self {
        debug_assert!(radix >= 1);
        debug_assert!(initial.len() <= max_len);
        debug_assert!(initial.iter().all(|&d| d < radix));

        let mut digits = Vec::with_capacity(max_len);
        digits.extend_from_slice(initial);
        Self {
            digits,
            radix,
            max_len,
            exhausted: false,
        }
    }

    /// Current length in digits
    #[inline]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn digits(&self) -> &[usize] {
        &self.digits
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Render the current state into `out`, replacing its contents
    ///
    /// Symbols are written in digit order with no reversal. `out` keeps its
    /// allocation when it is already large enough.
    #[inline]
    pub fn decode_into(&self, charset: &Charset, out: &mut Vec<u8>) {
        out.clear();
        out.extend(self.digits.iter().map(|&d| charset.symbol(d)));
    }

    /// Render the current state as a new word
    pub fn decode(&self, charset: &Charset) -> Vec<u8> {
        let mut word = Vec::with_capacity(self.digits.len());
        self.decode_into(charset, &mut word);
        word
    }

    /// Step to the next state
    ///
    /// Once [`CounterStatus::Exhausted`] is returned the state is left as it
    /// was and every later call returns `Exhausted` again.
    pub fn advance(&mut self) -> CounterStatus {
        if self.exhausted {
            return CounterStatus::Exhausted;
        }

        let top = self.radix - 1;
        match self.digits.iter().position(|&d| d < top) {
            Some(i) => {
                self.digits[..i].fill(0);
                self.digits[i] += 1;
                CounterStatus::Advanced
            }
            // carry runs past the last digit
            None if self.digits.len() >= self.max_len => {
                self.exhausted = true;
                CounterStatus::Exhausted
            }
            None => {
                self.digits.fill(0);
                self.digits.push(0);
                CounterStatus::Advanced
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn collect_all(charset: &Charset, initial: &[usize], max_len: usize) -> Vec<String> {
        let mut counter = Counter::new(initial, charset.radix(), max_len);
        let mut words = Vec::new();
        loop {
            words.push(String::from_utf8(counter.decode(charset)).unwrap());
            if counter.advance() == CounterStatus::Exhausted {
                break;
            }
        }
        words
    }

    #[test]
    fn test_odometer_order() {
        let charset = Charset::new("abc").unwrap();
        let words = collect_all(&charset, &[0], 2);
        assert_eq!(
            words,
            vec!["a", "b", "c", "aa", "ba", "ca", "ab", "bb", "cb", "ac", "bc", "cc"]
        );
    }

    #[test]
    fn test_resume_from_initial_state() {
        let charset = Charset::new("abc").unwrap();
        let initial = charset.digits_of(b"ba").unwrap();
        let words = collect_all(&charset, &initial, 2);
        assert_eq!(words, vec!["ba", "ca", "ab", "bb", "cb", "ac", "bc", "cc"]);
    }

    #[test]
    fn test_exhaustion_is_sticky() {
        let charset = Charset::new("ab").unwrap();
        let mut counter = Counter::new(&[1, 1], charset.radix(), 2);
        assert_eq!(counter.advance(), CounterStatus::Exhausted);
        assert_eq!(counter.advance(), CounterStatus::Exhausted);
        assert!(counter.is_exhausted());
        assert_eq!(counter.decode(&charset), b"bb");
    }

    #[test]
    fn test_initial_state_at_max_length() {
        // no lower bound is re-imposed: a max-length seed just runs to the end
        let charset = Charset::new("abc").unwrap();
        let words = collect_all(&charset, &[2, 1], 2);
        assert_eq!(words, vec!["cb", "ac", "bc", "cc"]);
    }

    #[test]
    fn test_single_symbol_radix() {
        let charset = Charset::new("x").unwrap();
        let words = collect_all(&charset, &[0], 4);
        assert_eq!(words, vec!["x", "xx", "xxx", "xxxx"]);
    }

    #[test]
    fn test_decode_into_reuses_allocation() {
        let charset = Charset::new("abc").unwrap();
        let counter = Counter::new(&[2, 0, 1], charset.radix(), 3);
        let mut out = Vec::with_capacity(16);
        out.extend_from_slice(b"stale contents");
        let ptr = out.as_ptr();
        counter.decode_into(&charset, &mut out);
        assert_eq!(out, b"cab");
        assert_eq!(out.as_ptr(), ptr);
    }

    proptest! {
        #[test]
        fn prop_count_and_distinct(radix in 1usize..5, min in 1usize..4, extra in 0usize..2) {
            let max = min + extra;
            let symbols: Vec<u8> = (b'a'..).take(radix).collect();
            let charset = Charset::new(&symbols).unwrap();
            let words = collect_all(&charset, &vec![0; min], max);

            let expected = charset.search_space(min, max).unwrap();
            prop_assert_eq!(words.len() as u128, expected);

            let unique: HashSet<_> = words.iter().collect();
            prop_assert_eq!(unique.len(), words.len());
            prop_assert!(words.iter().all(|w| (min..=max).contains(&w.len())));
        }
    }
}
