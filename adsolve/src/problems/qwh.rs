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

//! # Quasigroup With Holes (QWH)
//!
//! [`crate::problems::quasigroup`]'s propagator-assisted sibling. Holes are seeded through an
//! [`AllDiff`] network (rows and columns as groups) before the search starts, so each hole carries
//! a *reachable domain* in addition to the row it belongs to. Grounded on `qwh.c`'s
//! `PLS_Load_Problem` (board/hole loading), its `All_Diff_*` preprocessing block, `Cost_Of_Solution`
//! (duplicate counts plus a reachability penalty), and its two reset strategies
//! (`Reset_Repair` / `Reset_With_All_Diff`).

use crate::alldiff::{AllDiff, TellOutcome};
use crate::bitset::BitSet;
use crate::error::{Error, Result};
use crate::model::{ProblemModel, SolverParams};
use crate::random::{Random, Value};

/// Penalty applied when a hole that propagation bound to a single value is assigned anything else.
const DISPLACEMENT_PENALTY: i64 = 4;

/// How a board cell reads for display purposes, matching `Display_Solution_Color`'s four classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Given by the instance, never reassigned.
    Fixed,
    /// A hole currently holding a value consistent with its row, column, and reachable domain.
    Filled,
    /// A hole holding a value outside the domain preprocessing left it.
    Breach,
    /// A hole holding a value that duplicates another cell in its row or column.
    Duplicate,
}

/// Quasigroup With Holes.
pub struct Qwh {
    order: usize,
    board: Vec<Vec<Option<Value>>>,
    hole_pos: Vec<(usize, usize)>,
    row_range: Vec<(usize, usize)>,
    row_missing: Vec<Vec<Value>>,
    /// Per-hole domain left after all-different preprocessing; a cardinality-1 domain marks a
    /// hole propagation has effectively solved.
    hole_domain: Vec<BitSet>,
    config: Vec<Value>,
    random: Random,
}

impl Qwh {
    /// Build a model from a fully-specified board (`None` marks a hole), running all-different
    /// preprocessing over the rows and columns before returning. Fails if a row's fixed cells
    /// already clash, or if preprocessing proves the instance has no completion
    /// ([`Error::AllDifferentUnsolvable`]).
    pub fn from_board(board: Vec<Vec<Option<Value>>>, seed: u32) -> Result<Self> {
        let order = board.len();
        for row in &board {
            if row.len() != order {
                return Err(Error::Parse { path: "<in-memory board>".into(), reason: "board is not square".into() });
            }
        }

        let mut hole_pos = Vec::new();
        let mut row_range = Vec::with_capacity(order);
        let mut row_missing = Vec::with_capacity(order);
        let mut cols: Vec<Vec<usize>> = vec![Vec::new(); order];
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
                    cols[c].push(hole_pos.len());
                    hole_pos.push((r, c));
                }
            }
            row_range.push((beg, hole_pos.len()));
            row_missing.push((0..order as Value).filter(|&v| !present[v as usize]).collect());
        }
        let n = hole_pos.len();

        let mut domains = Vec::with_capacity(n);
        for &(r, c) in &hole_pos {
            let mut d = BitSet::full(order);
            for cc in 0..order {
                if let Some(v) = board[r][cc] {
                    d.reset(v as usize);
                }
            }
            for rr in 0..order {
                if let Some(v) = board[rr][c] {
                    d.reset(v as usize);
                }
            }
            domains.push(d);
        }

        let mut row_groups: Vec<Vec<usize>> = Vec::with_capacity(order);
        for r in 0..order {
            let (beg, end) = row_range[r];
            row_groups.push((beg..end).collect());
        }
        let mut groups = row_groups;
        groups.extend(cols.into_iter().filter(|g| !g.is_empty()));

        let mut ad = AllDiff::new(domains, groups);
        ad.init_session();
        if !ad.do_propagation() {
            return Err(Error::AllDifferentUnsolvable);
        }
        let hole_domain: Vec<BitSet> = (0..n).map(|h| ad.domain(h)).collect();

        Ok(Qwh {
            order,
            board,
            hole_pos,
            row_range,
            row_missing,
            hole_domain,
            config: vec![0; n],
            random: Random::seeded(seed),
        })
    }

    fn board_value(&self, r: usize, c: usize) -> Value {
        if let Some(v) = self.board[r][c] {
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

    fn hole_index_range(&self, hole: usize) -> (usize, usize) {
        let (r, _) = self.hole_pos[hole];
        self.row_range[r]
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

    /// Board order (side length).
    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of holes (decision variables) in this instance.
    pub fn hole_count(&self) -> usize {
        self.hole_pos.len()
    }

    /// The domain preprocessing left for hole `h`, for callers wanting to inspect or report it
    /// (e.g. a debug-level CLI dump).
    pub fn domain_of_hole(&self, h: usize) -> BitSet {
        self.hole_domain[h]
    }

    /// The value currently occupying board cell `(r, c)`, fixed or hole-assigned alike.
    pub fn value_at(&self, r: usize, c: usize) -> Value {
        self.board_value(r, c)
    }

    /// Classify cell `(r, c)` the way `Display_Solution_Color` does, for a colored printer.
    pub fn classify_cell(&self, r: usize, c: usize) -> CellKind {
        if self.board[r][c].is_some() {
            return CellKind::Fixed;
        }
        let (beg, end) = self.row_range[r];
        let h = (beg..end).find(|&h| self.hole_pos[h].1 == c).expect("row_range/hole_pos out of sync");
        let v = self.config[h];
        if self.breach_penalty(h, v) > 0 {
            CellKind::Breach
        } else if self.row_excess(r, v) > 0 || self.col_excess(c, v) > 0 {
            CellKind::Duplicate
        } else {
            CellKind::Filled
        }
    }

    fn forced_value(&self, h: usize) -> Option<Value> {
        if self.hole_domain[h].cardinality() == 1 {
            self.hole_domain[h].first().map(|x| x as Value)
        } else {
            None
        }
    }

    fn breach_penalty(&self, h: usize, v: Value) -> i64 {
        if self.hole_domain[h].has(v as usize) {
            0
        } else {
            self.order as i64
        }
    }

    fn displacement_penalty(&self, h: usize, v: Value) -> i64 {
        match self.forced_value(h) {
            Some(fv) if fv != v => DISPLACEMENT_PENALTY,
            _ => 0,
        }
    }

    fn variable_penalty(&self, h: usize) -> i64 {
        self.breach_penalty(h, self.config[h]) + self.displacement_penalty(h, self.config[h])
    }

    fn row_has_duplicate(&self, r: usize) -> bool {
        let mut seen = vec![false; self.order];
        for c in 0..self.order {
            let v = self.board_value(r, c) as usize;
            if v >= self.order || seen[v] {
                return true;
            }
            seen[v] = true;
        }
        false
    }

    fn col_has_duplicate(&self, c: usize) -> bool {
        let mut seen = vec![false; self.order];
        for r in 0..self.order {
            let v = self.board_value(r, c) as usize;
            if v >= self.order || seen[v] {
                return true;
            }
            seen[v] = true;
        }
        false
    }

    /// Swaps only ever happen within a row ([`Qwh::next_j`] ranges over `hole_index_range`, which
    /// is a single row), so rows are invariantly duplicate-free once
    /// [`Qwh::set_initial_configuration`] has run: conflicts only ever show up across columns.
    fn count_error_cols(&self) -> usize {
        (0..self.order).filter(|&c| self.col_has_duplicate(c)).count()
    }

    /// Localized repair: reshuffle only the holes of rows currently in conflict, like
    /// [`crate::problems::quasigroup::QuasigroupModel::reset`]. Used when few rows are broken.
    fn reset_repair(&mut self, n: usize) {
        let touched = n.min(self.hole_pos.len());
        let mut rows: Vec<usize> = (0..self.order).filter(|&r| self.row_has_duplicate(r)).collect();
        if rows.is_empty() {
            rows = (0..self.order).collect();
        }
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
    }

    /// Domain-informed reconstruction: re-run the all-different network over the current
    /// assignment, keeping whatever subset of holes still propagates to a fixed point, then
    /// randomly repairing the rest row by row. Used when too many columns are broken for a local
    /// patch to help (`Partial_Repair_FF`).
    fn reset_with_all_diff(&mut self, _n: usize) {
        let mut cols: Vec<Vec<usize>> = vec![Vec::new(); self.order];
        let mut row_groups: Vec<Vec<usize>> = Vec::with_capacity(self.order);
        for r in 0..self.order {
            let (beg, end) = self.row_range[r];
            row_groups.push((beg..end).collect());
            for h in beg..end {
                cols[self.hole_pos[h].1].push(h);
            }
        }
        let mut groups = row_groups;
        groups.extend(cols.into_iter().filter(|g| !g.is_empty()));

        let mut ad = AllDiff::new(self.hole_domain.clone(), groups);

        let n = self.hole_pos.len();
        // First-fail: holes with the smallest reachable domain are told first, so they claim
        // their value before a wider-domain hole can crowd them out.
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&h| self.hole_domain[h].cardinality());

        let mut bound = vec![false; n];
        for h in order {
            let v = self.config[h] as usize;
            if !ad.domain(h).has(v) {
                continue;
            }
            ad.init_session();
            let consistent = !matches!(ad.tell_value(h, v), TellOutcome::Failed) && ad.do_propagation();
            if consistent {
                bound[h] = true;
            } else {
                ad.undo();
            }
        }

        for r in 0..self.order {
            let (beg, end) = self.row_range[r];
            if beg == end {
                continue;
            }
            let mut remaining = self.row_missing[r].clone();
            for h in beg..end {
                if bound[h] {
                    if let Some(pos) = remaining.iter().position(|&v| v == self.config[h]) {
                        remaining.remove(pos);
                    }
                }
            }
            self.random.shuffle_in_place(&mut remaining);
            let mut next = remaining.into_iter();
            for h in beg..end {
                if !bound[h] {
                    self.config[h] = next.next().expect("remaining values match unbound holes");
                }
            }
        }
    }

    /// `n` random intra-row perturbations: pick a row, swap two of its holes three times, repeat
    /// until the budget is spent (`qwh.c`'s trailing top-up loop in `Reset`).
    fn top_up_swaps(&mut self, mut n: usize) {
        while n > 0 {
            let r = self.random.uniform(self.order);
            let (beg, end) = self.row_range[r];
            if end - beg >= 2 {
                for _ in 0..3 {
                    let i = beg + self.random.uniform(end - beg);
                    let j = beg + self.random.uniform(end - beg);
                    self.config.swap(i, j);
                }
            }
            n -= 1;
        }
    }
}

impl ProblemModel for Qwh {
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
        for h in 0..self.config.len() {
            total += self.variable_penalty(h);
        }
        total
    }

    fn cost_on_variable(&self, i: usize) -> i64 {
        let (r, c) = self.hole_pos[i];
        let v = self.config[i];
        self.row_excess(r, v) + self.col_excess(c, v) + self.variable_penalty(i)
    }

    fn cost_if_swap(&mut self, current_cost: i64, i: usize, j: usize) -> i64 {
        // Same reasoning as the plain quasigroup model: row/column excess and the reachability
        // penalties are shared across holes, so an exact answer needs a full recompute.
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
        if self.count_error_cols() < (self.order / 4).max(1) {
            self.reset_repair(n);
        } else {
            self.reset_with_all_diff(n);
        }
        self.top_up_swaps(n);
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
    fn a_completed_latin_square_has_zero_cost() {
        let mut board = empty_board(4);
        for r in 0..4 {
            for c in 0..4 {
                board[r][c] = Some(((r + c) % 4) as Value);
            }
        }
        let mut m = Qwh::from_board(board, 1).unwrap();
        assert_eq!(m.cost_of_solution(true), 0);
        assert!(m.check_solution());
    }

    #[test]
    fn a_hole_with_only_one_reachable_value_is_detected_by_preprocessing() {
        // Order 4, cyclic square (r + c) % 4 with a single hole at (0, 1): row 0 already has
        // {0, 2, 3} fixed, so the hole's row-reachable value is forced to 1, and since column 1
        // already has {2, 3, 0} (rows 1..3, value (r+1)%4) fixed, the hole's domain narrows to
        // exactly {1}.
        let mut board = empty_board(4);
        for r in 0..4 {
            for c in 0..4 {
                board[r][c] = Some(((r + c) % 4) as Value);
            }
        }
        board[0][1] = None;
        let m = Qwh::from_board(board, 1).unwrap();
        assert_eq!(m.hole_pos.len(), 1);
        assert_eq!(m.hole_domain[0].cardinality(), 1);
        assert_eq!(m.hole_domain[0].first(), Some(1));
    }

    #[test]
    fn duplicate_fixed_value_in_a_row_is_rejected() {
        let mut board = empty_board(3);
        board[0][0] = Some(1);
        board[0][1] = Some(1);
        assert!(Qwh::from_board(board, 1).is_err());
    }

    #[test]
    fn set_initial_configuration_is_row_consistent() {
        let mut board = empty_board(5);
        board[0][0] = Some(0);
        let mut m = Qwh::from_board(board, 1).unwrap();
        m.set_initial_configuration();
        for r in 0..5 {
            let (beg, end) = m.row_range[r];
            let mut seen = vec![false; 5];
            seen[0] = r == 0;
            for h in beg..end {
                seen[m.config[h] as usize] = true;
            }
            assert!(seen.iter().all(|&x| x));
        }
    }

    #[test]
    fn reset_picks_the_all_diff_branch_when_columns_are_badly_conflicted() {
        let order = 8;
        let board = empty_board(order);
        let mut m = Qwh::from_board(board, 1).unwrap();
        // Every row holds the same permutation: each column repeats one value `order` times, so
        // every column conflicts and `count_error_cols()` clears the threshold comfortably.
        let row_perm: Vec<Value> = (0..order as Value).collect();
        for r in 0..order {
            let (beg, end) = m.row_range[r];
            m.config[beg..end].copy_from_slice(&row_perm);
        }
        assert!(m.count_error_cols() >= (order / 4).max(1));

        m.reset(4);

        for r in 0..order {
            assert!(!m.row_has_duplicate(r));
        }
    }

    #[test]
    fn reset_with_all_diff_keeps_already_consistent_holes_bound() {
        // A single completed row, broken everywhere else: the propagator should keep that row's
        // holes bound to their current (still domain-consistent) values rather than shuffling
        // them away, and reconstruct the rest as valid row permutations.
        let order = 6;
        let mut board = empty_board(order);
        for c in 0..order {
            board[0][c] = Some(c as Value);
        }
        let mut m = Qwh::from_board(board, 1).unwrap();

        // A derangement of 0..order: no column holds the value row 0 fixed there, so every hole's
        // value in this row lies inside its preprocessed domain.
        let row1_perm: Vec<Value> = (0..order as Value).map(|c| (c + 1) % order as Value).collect();
        let (beg1, end1) = m.row_range[1];
        m.config[beg1..end1].copy_from_slice(&row1_perm);
        for r in 2..order {
            let (beg, end) = m.row_range[r];
            m.config[beg..end].copy_from_slice(&row1_perm);
        }

        m.reset_with_all_diff(order);

        let (beg, end) = m.row_range[1];
        assert_eq!(&m.config[beg..end], &row1_perm[..]);
        for r in 0..order {
            assert!(!m.row_has_duplicate(r));
        }
    }
}
