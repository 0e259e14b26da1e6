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

//! Module containing all error types

use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// The instance file could not be parsed.
    #[error("malformed instance file {path}: {reason}")]
    Parse {
        /// Path of the offending file.
        path: String,
        /// Human-readable reason.
        reason: String,
    },
    /// The instance file could not be opened or read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path of the offending file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A parameter combination has no solution for structural reasons (e.g. Skolem `N mod 4`).
    #[error("no solution for this size: {0}")]
    NoSolutionForSize(String),
    /// The bit-vector domain order exceeds the maximum representable width.
    #[error("order {order} exceeds the maximum domain width of {max}")]
    OrderTooLarge {
        /// Requested order.
        order: usize,
        /// Maximum supported order.
        max: usize,
    },
    /// All-different preprocessing proved the instance has no completion.
    #[error("all-different preprocessing found the instance unsolvable")]
    AllDifferentUnsolvable,
    /// `σ` failed to validate as a permutation of its declared alphabet.
    #[error("configuration is not a valid permutation at index {0}")]
    InvalidPermutation(usize),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
