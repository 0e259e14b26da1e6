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

//! # Quasigroup Completion
//!
//! The plain (propagator-free) sibling of [`crate::problems::qwh`]: complete a partially filled
//! `order × order` Latin square, minimizing row/column duplicate occurrences. Grounded on
//! `quasigroup-utils.c`'s board loading and `quasigroup.c`'s cost shape; unlike QWH there is no
//! all-different preprocessing or domain-restriction heuristic, just direct duplicate counting.

use crate::error::{Error, Result};
use crate::model::{ProblemModel, SolverParams};
use crate::random::{Random, Value};

/// Plain Quasigroup (Latin square) Completion.
pub struct QuasigroupModel {
    order: usize,
    /// `board[r][c]` is `Some(v)` for a pre-filled cell, `None` for a hole.
    board: Vec<Vec<Option<Value>>>,
    /// Hole index -> `(row, col)`, numbered row-major (so one row's holes are contiguous).
    hole_pos: Vec<(usize, usize)>,
    /// `row_range[r]` = `[beg, end)` hole-index range for row `r`.
    row_range: Vec<(usize, usize)>,
    /// Values missing from each row (the alphabet each row's holes permute over).
    row_missing: Vec<Vec<Value>>,
    config: Vec<Value>,
    random: Random,
}

impl QuasigroupModel {
    /// Build a model from a fully-specified board (`None` marks a hole). Fails if any row or
    /// column of fixed cells already contains a duplicate (an unsolvable instance).
    pub fn from_board(board: Vec<Vec<Option<Value>>>, seed: u32) -> Result<Self> {
        let order = board.len();
        for row in &board {
            if row.len() != order {
                return Err(Error::Parse {
                    path: "<in-memory board>".into(),
                    reason: "board is not square".into(),
                });
            }
        }

        let mut hole_pos = Vec::new();
        let mut row_range = Vec::with_capacity(order);
        let mut row_missing = Vec::with_capacity(order);
        for r in 0..order {
            let beg = hole_pos.len();
            let mut present = vec![false; order];
            for c in 0..order {
                if let Some(v) = board[r][c] {
                    let v = v as usize;
                    if v >= order || present[v] {
                        return Err(Error::Parse {
                            path: "<in-memory board>".into(),
                            reason: format!("row {} has a duplicate or out-of-range fixed value", r),
                        });
                    }
                    present[v] = true;
                } else {
                    hole_pos.push((r, c));
                }
            }
            row_range.push((beg, hole_pos.len()));
            row_missing.push(
                (0..order as Value).filter(|&v| !present[v as usize]).collect(),
            );
        }

        let n = hole_pos.len();
        Ok(QuasigroupModel {
            order,
            board,
            hole_pos,
            row_range,
            row_missing,
            config: vec![0; n],
            random: Random::seeded(seed),
        })
    }

    fn value_at(&self, r: usize, c: usize) -> Option<Value> {
        self.board[r][c]
    }

    fn hole_index_range(&self, hole: usize) -> (usize, usize) {
        let (r, _) = self.hole_pos[hole];
        self.row_range[r]
    }

    fn board_value(&self, r: usize, c: usize) -> Value {
        if let Some(v) = self.value_at(r, c) {
            v
        } else {
            let (beg, end) = self.row_range[r];
            for h in beg..end {
                if self.hole_pos[h].1 == c {
                    return self.config[h];
                }
            }
            unreachable!("row_range/hole_pos out of sync")
        }
    }

    fn row_excess(&self, r: usize, value: Value) -> i64 {
        let mut count = 0;
        for c in 0..self.order {
            if self.board_value(r, c) == value {
                count += 1;
            }
        }
        (count - 1).max(0)
    }

    fn col_excess(&self, c: usize, value: Value) -> i64 {
        let mut count = 0;
        for r in 0..self.order {
            if self.board_value(r, c) == value {
                count += 1;
            }
        }
        (count - 1).max(0)
    }
}

impl ProblemModel for QuasigroupModel {
    fn size(&self) -> usize {
        self.config.len()
    }

    fn config(&self) -> &[Value] {
        &self.config
    }

    fn config_mut(&mut self) -> &mut [Value] {
        &mut self.config
    }

    fn cost_of_solution(&mut self, _record: bool) -> i64 {
        let mut total = 0i64;
        for r in 0..self.order {
            for v in 0..self.order as Value {
                total += self.row_excess(r, v);
            }
        }
        for c in 0..self.order {
            for v in 0..self.order as Value {
                total += self.col_excess(c, v);
            }
        }
        total
    }

    fn cost_on_variable(&self, i: usize) -> i64 {
        let (r, c) = self.hole_pos[i];
        let v = self.config[i];
        self.row_excess(r, v) + self.col_excess(c, v)
    }

    fn cost_if_swap(&mut self, current_cost: i64, i: usize, j: usize) -> i64 {
        // A row/column excess is shared by every hole holding that value, so a cheap
        // i/j-local delta would miss third-party holes whose excess changes too; recompute in
        // full instead, the same trade-off `qwh.c`'s `Executed_Swap` makes.
        if i == j {
            return current_cost;
        }
        self.config.swap(i, j);
        let cost = self.cost_of_solution(true);
        self.config.swap(i, j);
        cost
    }

    fn executed_swap(&mut self, _i: usize, _j: usize) {}

    fn next_j(&self, i: usize, j: i64, exhaustive: bool) -> i64 {
        let (beg, end) = self.hole_index_range(i);
        let start = if j < 0 {
            if exhaustive {
                (i + 1).max(beg) as i64
            } else {
                beg as i64
            }
        } else {
            j + 1
        };
        if start < end as i64 {
            start
        } else {
            -1
        }
    }

    fn reset(&mut self, n: usize) -> Option<i64> {
        let touched = n.min(self.hole_pos.len());
        let mut rows: Vec<usize> = (0..self.order).collect();
        self.random.shuffle_in_place(&mut rows);
        let mut done = 0usize;
        for r in rows {
            if done >= touched {
                break;
            }
            let (beg, end) = self.row_range[r];
            if beg == end {
                continue;
            }
            let mut slice = self.config[beg..end].to_vec();
            self.random.shuffle_in_place(&mut slice);
            self.config[beg..end].copy_from_slice(&slice);
            done += end - beg;
        }
        None
    }

    fn set_initial_configuration(&mut self) {
        for r in 0..self.order {
            let (beg, end) = self.row_range[r];
            if beg == end {
                continue;
            }
            let alphabet = self.row_missing[r].clone();
            self.random.generate_permutation(&mut self.config[beg..end], Some(&alphabet), 0);
        }
    }

    fn default_params(&self) -> SolverParams {
        SolverParams {
            prob_select_loc_min: Some(6),
            restart_limit: 1_000_000,
            target_cost: 0,
            ..SolverParams::default()
        }
    }

    fn display(&self) -> String {
        let mut s = String::new();
        for r in 0..self.order {
            for c in 0..self.order {
                s.push_str(&format!("{:3}", self.board_value(r, c)));
            }
            s.push('\n');
        }
        s
    }

    fn check_solution(&self) -> bool {
        for r in 0..self.order {
            let mut seen = vec![false; self.order];
            for c in 0..self.order {
                let v = self.board_value(r, c) as usize;
                if v >= self.order || seen[v] {
                    return false;
                }
                seen[v] = true;
            }
        }
        for c in 0..self.order {
            let mut seen = vec![false; self.order];
            for r in 0..self.order {
                let v = self.board_value(r, c) as usize;
                if v >= self.order || seen[v] {
                    return false;
                }
                seen[v] = true;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_board(order: usize) -> Vec<Vec<Option<Value>>> {
        vec![vec![None; order]; order]
    }

    #[test]
    fn set_initial_configuration_is_row_consistent() {
        let mut m = QuasigroupModel::from_board(empty_board(5), 1).unwrap();
        m.set_initial_configuration();
        for r in 0..5 {
            let (beg, end) = m.row_range[r];
            let mut seen = vec![false; 5];
            for h in beg..end {
                seen[m.config[h] as usize] = true;
            }
            assert!(seen.iter().all(|&x| x));
        }
    }

    #[test]
    fn a_completed_latin_square_has_zero_cost() {
        // Cyclic Latin square of order 4: row r is (0..4) rotated by r.
        let mut board = empty_board(4);
        for r in 0..4 {
            for c in 0..4 {
                board[r][c] = Some(((r + c) % 4) as Value);
            }
        }
        let mut m = QuasigroupModel::from_board(board, 1).unwrap();
        assert_eq!(m.cost_of_solution(true), 0);
        assert!(m.check_solution());
    }

    #[test]
    fn duplicate_fixed_value_in_a_row_is_rejected() {
        let mut board = empty_board(3);
        board[0][0] = Some(1);
        board[0][1] = Some(1);
        assert!(QuasigroupModel::from_board(board, 1).is_err());
    }
}
