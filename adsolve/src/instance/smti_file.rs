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

//! SMTI ranked-preference loader.
//!
//! Header `N [p1 p2]`, then two `N x N` preference matrices (men, then women). Each row is a list
//! of partner indices in decreasing preference: a positive entry starts a new rank, a negative
//! entry shares the previous entry's rank (a tie), and `0` is a removed/padding slot that is
//! skipped. Partner indices themselves are always 1-based (`0` is reserved for "removed"); the
//! `.dat`-suffixed variant additionally prefixes each row with its own 1-based row index, which is
//! discarded here rather than cross-checked.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

type RankMatrix = Vec<Vec<Option<u32>>>;

/// Load both preference matrices from `path`. Whether rows carry a leading row-index prefix is
/// sniffed from the `.dat` file extension, per the format note above.
pub fn load_smti_ranks(path: impl AsRef<Path>) -> Result<(RankMatrix, RankMatrix)> {
    let path_ref = path.as_ref();
    let text = fs::read_to_string(path_ref)
        .map_err(|source| Error::Io { path: path_ref.display().to_string(), source })?;
    let indexed = path_ref.extension().and_then(|e| e.to_str()) == Some("dat");
    parse_smti_text(&text, indexed, &path_ref.display().to_string())
}

fn parse_smti_text(text: &str, indexed: bool, path: &str) -> Result<(RankMatrix, RankMatrix)> {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let mut it = lines.into_iter();
    let header = it.next().ok_or_else(|| Error::Parse { path: path.into(), reason: "missing header line".into() })?;
    let n: usize = header
        .split_whitespace()
        .next()
        .ok_or_else(|| Error::Parse { path: path.into(), reason: "empty header line".into() })?
        .parse()
        .map_err(|_| Error::Parse { path: path.into(), reason: "header N is not an integer".into() })?;

    let men = parse_pref_matrix(&mut it, n, indexed, path, "men")?;
    let women = parse_pref_matrix(&mut it, n, indexed, path, "women")?;
    Ok((men, women))
}

fn parse_pref_matrix<'a>(
    lines: &mut impl Iterator<Item = &'a str>,
    n: usize,
    indexed: bool,
    path: &str,
    who: &str,
) -> Result<RankMatrix> {
    let mut rank = vec![vec![None; n]; n];
    for row in 0..n {
        let line = lines
            .next()
            .ok_or_else(|| Error::Parse { path: path.into(), reason: format!("{} matrix: missing row {}", who, row) })?;
        let mut tokens = line.split_whitespace();
        if indexed {
            tokens.next();
        }
        let mut current_rank = 0u32;
        for tok in tokens {
            let v: i64 = tok
                .parse()
                .map_err(|_| Error::Parse { path: path.into(), reason: format!("{} matrix row {}: {:?} is not an integer", who, row, tok) })?;
            if v == 0 {
                continue;
            }
            let is_tie = v < 0;
            let partner_one_based = v.unsigned_abs() as usize;
            if partner_one_based == 0 || partner_one_based > n {
                return Err(Error::Parse {
                    path: path.into(),
                    reason: format!("{} matrix row {}: partner index {} out of range 1..={}", who, row, partner_one_based, n),
                });
            }
            if !is_tie || current_rank == 0 {
                current_rank += 1;
            }
            rank[row][partner_one_based - 1] = Some(current_rank);
        }
    }
    Ok(rank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_preference_list_without_ties() {
        let text = "3\n1 2 3\n2 3 1\n3 1 2\n2 3 1\n3 1 2\n1 2 3\n";
        let (men, women) = parse_smti_text(text, false, "<test>").unwrap();
        assert_eq!(men[0], vec![Some(1), Some(2), Some(3)]);
        assert_eq!(men[1], vec![Some(3), Some(1), Some(2)]);
        assert_eq!(women[0], vec![Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn a_negative_entry_shares_the_previous_rank() {
        let text = "2\n1 -2\n2 1\n1 -2\n2 1\n";
        let (men, _) = parse_smti_text(text, false, "<test>").unwrap();
        // Man 0 is indifferent between women 0 and 1 (both rank 1).
        assert_eq!(men[0], vec![Some(1), Some(1)]);
    }

    #[test]
    fn zero_entries_are_skipped_as_removed() {
        let text = "2\n1 0\n0 1\n1 0\n0 1\n";
        let (men, _) = parse_smti_text(text, false, "<test>").unwrap();
        assert_eq!(men[0], vec![Some(1), None]);
        assert_eq!(men[1], vec![None, Some(1)]);
    }

    #[test]
    fn indexed_rows_discard_the_leading_row_number() {
        let text = "2\n1 1 2\n2 2 1\n1 2 1\n2 1 2\n";
        let (men, _) = parse_smti_text(text, true, "<test>").unwrap();
        assert_eq!(men[0], vec![Some(1), Some(2)]);
        assert_eq!(men[1], vec![Some(2), Some(1)]);
    }

    #[test]
    fn out_of_range_partner_index_is_rejected() {
        let text = "2\n1 5\n2 1\n1 2\n2 1\n";
        assert!(parse_smti_text(text, false, "<test>").is_err());
    }
}
