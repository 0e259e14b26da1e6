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

#![deny(missing_docs)]

//! # Adaptive Search
//!
//! A generic local-search meta-heuristic solver for constraint-satisfaction problems over
//! permutations, together with five concrete instantiations: All-Interval Series, Langford/Skolem
//! sequences, Quasigroup Completion, Quasigroup With Holes (with an All-Different propagator), and
//! Stable Matching with Ties & Incomplete lists.
//!
//! ## Structure
//!
//! - **[`random`]**: seedable PRNG, uniform draws, permutation generation/repair/validation.
//! - **[`bitset`]**: fixed-width bit-vector domain used by the all-different propagator.
//! - **[`model`]**: the [`model::ProblemModel`] trait every problem instantiation implements.
//! - **[`engine`]**: the [`engine::Solver`], the variable/partner-selection and restart loop.
//! - **[`alldiff`]**: the forward-checking + channeling fixed-point propagator.
//! - **[`problems`]**: the five concrete problem models.
//! - **[`instance`]**: instance-file loaders for the two file-backed problems (QWH, SMTI).
//!
//! ## Usage
//!
//! ```
//! use adsolve::engine::Solver;
//! use adsolve::model::ProblemModel;
//! use adsolve::problems::AllIntervalModel;
//!
//! let mut model = AllIntervalModel::new(12, 1);
//! let mut solver = Solver::new(model.default_params(), 1);
//! let report = solver.solve(&mut model);
//! assert!(report.total_cost >= 0);
//! ```

pub mod alldiff;
pub mod bitset;
pub mod engine;
pub mod error;
pub mod instance;
pub mod model;
pub mod problems;
pub mod random;
#[cfg(test)]
mod test;

pub use error::{Error, Result};
