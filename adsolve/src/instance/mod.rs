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

//! # Instance file loading
//!
//! Whitespace-tolerant ASCII parsers for the two file-backed problem instantiations, grounded on
//! `quasigroup-utils.c`'s board loader and `smti-utils.c`'s ranked-preference loader.

mod qwh_file;
mod smti_file;

pub use qwh_file::load_qwh_board;
pub use smti_file::load_smti_ranks;
