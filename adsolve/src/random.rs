// Adaptive Search
// Copyright (C) 2002-2011 Daniel Diaz, Philippe Codognet and Salvador Abreu
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Random utility
//!
//! Seeded PRNG plus the permutation helpers the engine and the problem models need:
//! generation of a fresh permutation (over `0..n` or over an explicit alphabet), validation, and
//! repair of a vector that has drifted away from being a permutation (duplicate/missing values
//! swapped back into place). Grounded on `tools.h`'s `Random`/`Random_Interval`/`Random_Permut`/
//! `Random_Permut_Repair`/`Random_Permut_Check` prototypes and on `smti-utils.c`'s
//! `SMP_Random_Vector` (Durstenfeld/Fisher-Yates).

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// The integer type used for configuration values throughout the crate.
pub type Value = i64;

/// A seeded source of randomness, plus the permutation helpers built on top of it.
pub struct Random {
    rng: StdRng,
    seed: u32,
}

impl Random {
    /// Create a generator from an explicit seed. Two `Random`s created with the same seed and
    /// driven by calls in the same order produce identical sequences.
    pub fn seeded(seed: u32) -> Self {
        Random { rng: StdRng::seed_from_u64(seed as u64), seed }
    }

    /// Create a generator seeded from the OS entropy source, recording the seed drawn so the run
    /// can be replayed later (mirrors `Randomize`/`-s -1` of the original CLI).
    pub fn from_entropy() -> Self {
        let seed: u32 = rand::thread_rng().gen();
        Self::seeded(seed)
    }

    /// The seed this generator was created with.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Uniform integer in `0..n`.
    ///
    /// # Panics
    /// Panics if `n == 0`.
    pub fn uniform(&mut self, n: usize) -> usize {
        assert!(n > 0, "uniform(0) has no valid result");
        self.rng.gen_range(0, n)
    }

    /// Uniform integer in `lo..hi`.
    ///
    /// # Panics
    /// Panics if `hi <= lo`.
    pub fn interval(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(hi > lo, "empty interval [{}, {})", lo, hi);
        self.rng.gen_range(lo, hi)
    }

    /// Uniform double in `[0, 1)`.
    pub fn double01(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle_in_place<T>(&mut self, a: &mut [T]) {
        a.shuffle(&mut self.rng);
    }

    /// Fill `out` with a random permutation.
    ///
    /// If `alphabet` is `Some(values)`, `out` receives a shuffled copy of `values` (so
    /// `out.len() == values.len()` is required). Otherwise `out[k]` ranges uniformly over
    /// `base..base + out.len()`, each value appearing exactly once.
    pub fn generate_permutation(&mut self, out: &mut [Value], alphabet: Option<&[Value]>, base: Value) {
        match alphabet {
            Some(values) => {
                assert_eq!(values.len(), out.len(), "alphabet size must match output length");
                out.copy_from_slice(values);
            }
            None => {
                for (k, slot) in out.iter_mut().enumerate() {
                    *slot = base + k as Value;
                }
            }
        }
        self.shuffle_in_place(out);
    }

    /// Validate that `v` is a permutation of its declared alphabet (or of `base..base + v.len()`
    /// when `alphabet` is `None`). Returns the index of the first value that breaks the
    /// permutation property (either out of range, or a repeat) on failure.
    pub fn validate_permutation(
        v: &[Value],
        alphabet: Option<&[Value]>,
        base: Value,
    ) -> Result<(), usize> {
        let n = v.len();
        let mut seen = vec![false; n];
        // index_of maps a legal value to its slot in `seen`.
        let index_of = |x: Value| -> Option<usize> {
            match alphabet {
                Some(values) => values.iter().position(|&y| y == x),
                None => {
                    if x >= base && (x - base) < n as Value {
                        Some((x - base) as usize)
                    } else {
                        None
                    }
                }
            }
        };
        for (i, &x) in v.iter().enumerate() {
            match index_of(x) {
                Some(slot) if !seen[slot] => seen[slot] = true,
                _ => return Err(i),
            }
        }
        Ok(())
    }

    /// Repair `v` into a permutation of its declared alphabet by swapping each duplicate value
    /// into one of the slots holding a missing value, in a random order. Mirrors
    /// `Random_Permut_Repair`: the caller is expected to have left "don't care" or duplicated
    /// values in `v`; this restores the permutation invariant deterministically given the RNG
    /// sequence, without otherwise touching positions that already hold a value appearing
    /// exactly once.
    pub fn repair_permutation(&mut self, v: &mut [Value], alphabet: Option<&[Value]>, base: Value) {
        let n = v.len();
        let legal = |k: usize| -> Value {
            match alphabet {
                Some(values) => values[k],
                None => base + k as Value,
            }
        };
        let index_of = |x: Value| -> Option<usize> {
            match alphabet {
                Some(values) => values.iter().position(|&y| y == x),
                None => {
                    if x >= base && (x - base) < n as Value {
                        Some((x - base) as usize)
                    } else {
                        None
                    }
                }
            }
        };

        let mut count = vec![0u32; n];
        for &x in v.iter() {
            if let Some(slot) = index_of(x) {
                count[slot] += 1;
            }
        }

        let mut missing: Vec<usize> =
            (0..n).filter(|&slot| count[slot] == 0).collect();
        self.shuffle_in_place(&mut missing);
        let mut missing = missing.into_iter();

        for i in 0..n {
            let slot = index_of(v[i]);
            let is_dup_or_invalid = match slot {
                Some(s) => count[s] > 1,
                None => true,
            };
            if is_dup_or_invalid {
                if let Some(s) = slot {
                    count[s] -= 1;
                }
                if let Some(fill_slot) = missing.next() {
                    v[i] = legal(fill_slot);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_in_range() {
        let mut r = Random::seeded(1);
        for _ in 0..1000 {
            let x = r.uniform(7);
            assert!(x < 7);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Random::seeded(42);
        let mut b = Random::seeded(42);
        let seq_a: Vec<usize> = (0..50).map(|_| a.uniform(100)).collect();
        let seq_b: Vec<usize> = (0..50).map(|_| b.uniform(100)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn generate_permutation_covers_range_exactly_once() {
        let mut r = Random::seeded(7);
        let mut out = vec![0; 10];
        r.generate_permutation(&mut out, None, 0);
        assert!(Random::validate_permutation(&out, None, 0).is_ok());
    }

    #[test]
    fn generate_permutation_over_alphabet() {
        let mut r = Random::seeded(9);
        let alphabet = vec![3, 7, 11, 13];
        let mut out = vec![0; 4];
        r.generate_permutation(&mut out, Some(&alphabet), 0);
        let mut sorted = out.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![3, 7, 11, 13]);
    }

    #[test]
    fn repair_permutation_fixes_duplicates() {
        let mut r = Random::seeded(3);
        let mut v = vec![0, 0, 2, 2]; // 1 and 3 missing, 0 and 2 duplicated
        r.repair_permutation(&mut v, None, 0);
        assert!(Random::validate_permutation(&v, None, 0).is_ok());
    }

    #[test]
    fn validate_permutation_rejects_repeat() {
        let v = vec![0, 1, 1, 3];
        assert_eq!(Random::validate_permutation(&v, None, 0), Err(2));
    }
}
