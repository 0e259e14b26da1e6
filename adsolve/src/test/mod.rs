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

//! Cross-module scenario tests: [`crate::engine::Solver`] driving a concrete
//! [`crate::model::ProblemModel`] end to end, as opposed to the per-file unit tests living next to
//! each module.

#[cfg(test)]
mod test_all_interval;
#[cfg(test)]
mod test_engine_restart;
#[cfg(test)]
mod test_langford_skolem;
#[cfg(test)]
mod test_qwh_preprocessing;
