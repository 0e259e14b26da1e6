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

//! QWH board loader: `order K` header, then `order` lines of `order` integers, negative = hole.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::random::Value;

/// Load a QWH board from `path`.
pub fn load_qwh_board(path: impl AsRef<Path>) -> Result<Vec<Vec<Option<Value>>>> {
    let path_ref = path.as_ref();
    let text = fs::read_to_string(path_ref)
        .map_err(|source| Error::Io { path: path_ref.display().to_string(), source })?;
    parse_qwh_board(&text, &path_ref.display().to_string())
}

fn parse_qwh_board(text: &str, path: &str) -> Result<Vec<Vec<Option<Value>>>> {
    let mut tokens = text.split_whitespace();
    let order: usize = tokens
        .next()
        .ok_or_else(|| Error::Parse { path: path.into(), reason: "missing header line".into() })?
        .parse()
        .map_err(|_| Error::Parse { path: path.into(), reason: "header order is not an integer".into() })?;
    let k: usize = tokens
        .next()
        .ok_or_else(|| Error::Parse { path: path.into(), reason: "missing K in header line".into() })?
        .parse()
        .map_err(|_| Error::Parse { path: path.into(), reason: "header K is not an integer".into() })?;
    if k > 64 {
        return Err(Error::OrderTooLarge { order: k, max: 64 });
    }

    let mut board = vec![vec![None; order]; order];
    for r in 0..order {
        for c in 0..order {
            let tok = tokens.next().ok_or_else(|| Error::Parse {
                path: path.into(),
                reason: format!("expected {} cells, ran out at row {} col {}", order * order, r, c),
            })?;
            let v: i64 = tok
                .parse()
                .map_err(|_| Error::Parse { path: path.into(), reason: format!("cell ({}, {}) is not an integer", r, c) })?;
            board[r][c] = if v < 0 { None } else { Some(v as Value) };
        }
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_small_board_with_holes() {
        let text = "4 4\n0 -1 -1 2\n-1 2 0 -1\n2 0 -1 -1\n-1 -1 2 0\n";
        let board = parse_qwh_board(text, "<test>").unwrap();
        assert_eq!(board.len(), 4);
        assert_eq!(board[0], vec![Some(0), None, None, Some(2)]);
        assert_eq!(board[1], vec![None, Some(2), Some(0), None]);
    }

    #[test]
    fn rejects_truncated_input() {
        let text = "3 3\n0 1 2\n1 2 0\n";
        assert!(parse_qwh_board(text, "<test>").is_err());
    }

    #[test]
    fn rejects_domain_width_over_64() {
        let text = "2 65\n0 1\n1 0\n";
        assert!(matches!(parse_qwh_board(text, "<test>"), Err(Error::OrderTooLarge { .. })));
    }
}
