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

//! # Stable Matching with Ties and Incomplete lists (SMTI)
//!
//! `n` men and `n` women, each ranking a (possibly incomplete) subset of the other side, ties
//! allowed (equal rank = indifference). Grounded on `smti.c`'s blocking-pair cost
//! (`Cost_Of_Solution = count_bp * size + count_singles`) and `smti-utils.c`'s ranked-preference
//! matrix loader.
//!
//! `σ[m]` is man `m`'s assigned partner, drawn from `0..2n`: values `0..n` are real women, values
//! `n..2n` are `n` distinct "single" slots — this keeps every man's assignment literally distinct
//! (a permutation, per the data model) while still letting more than one man go unmatched at
//! once.

use crate::error::{Error, Result};
use crate::model::{ProblemModel, SolverParams};
use crate::random::{Random, Value};

/// A Stable Matching with Ties and Incomplete lists instance.
pub struct SmtiModel {
    n: usize,
    /// `men_rank[m][w]`: man `m`'s rank for woman `w` (lower is preferred), `None` if unacceptable.
    men_rank: Vec<Vec<Option<u32>>>,
    /// `women_rank[w][m]`: woman `w`'s rank for man `m`.
    women_rank: Vec<Vec<Option<u32>>>,
    config: Vec<Value>,
    random: Random,
}

impl SmtiModel {
    /// Build a model from square `n x n` rank matrices.
    pub fn new(men_rank: Vec<Vec<Option<u32>>>, women_rank: Vec<Vec<Option<u32>>>, seed: u32) -> Result<Self> {
        let n = men_rank.len();
        if men_rank.iter().any(|row| row.len() != n) || women_rank.len() != n || women_rank.iter().any(|row| row.len() != n) {
            return Err(Error::Parse {
                path: "<in-memory preference matrices>".into(),
                reason: "men/women preference matrices must both be square and the same size".into(),
            });
        }
        Ok(SmtiModel { n, men_rank, women_rank, config: vec![0; n], random: Random::seeded(seed) })
    }

    /// `n`, the number of men (and women).
    pub fn size_n(&self) -> usize {
        self.n
    }

    fn partner_of_man(&self, m: usize) -> Option<usize> {
        let w = self.config[m] as usize;
        if w < self.n {
            Some(w)
        } else {
            None
        }
    }

    fn partner_of_woman(&self, w: usize) -> Option<usize> {
        self.config.iter().position(|&x| x as usize == w)
    }

    fn is_blocking_pair(&self, m: usize, w: usize) -> bool {
        let mw_rank = match self.men_rank[m][w] {
            Some(r) => r,
            None => return false,
        };
        let wm_rank = match self.women_rank[w][m] {
            Some(r) => r,
            None => return false,
        };
        if self.partner_of_man(m) == Some(w) {
            return false;
        }
        let m_prefers_w = match self.partner_of_man(m) {
            Some(cur_w) => match self.men_rank[m][cur_w] {
                Some(cur_rank) => mw_rank < cur_rank,
                None => true,
            },
            None => true,
        };
        let w_prefers_m = match self.partner_of_woman(w) {
            Some(cur_m) => match self.women_rank[w][cur_m] {
                Some(cur_rank) => wm_rank < cur_rank,
                None => true,
            },
            None => true,
        };
        m_prefers_w && w_prefers_m
    }

    fn compute_cost(&self) -> i64 {
        let count_singles = self.config.iter().filter(|&&w| w as usize >= self.n).count() as i64;
        let mut count_bp = 0i64;
        for m in 0..self.n {
            for w in 0..self.n {
                if self.is_blocking_pair(m, w) {
                    count_bp += 1;
                }
            }
        }
        count_bp * self.n as i64 + count_singles
    }

    fn cost_contribution_of_man(&self, m: usize) -> i64 {
        let mut c = 0i64;
        if self.partner_of_man(m).is_none() {
            c += 1;
        }
        for w in 0..self.n {
            if self.is_blocking_pair(m, w) {
                c += self.n as i64;
            }
        }
        c
    }
}

impl ProblemModel for SmtiModel {
    fn size(&self) -> usize {
        self.n
    }

    fn config(&self) -> &[Value] {
        &self.config
    }

    fn config_mut(&mut self) -> &mut [Value] {
        &mut self.config
    }

    fn cost_of_solution(&mut self, _record: bool) -> i64 {
        self.compute_cost()
    }

    fn cost_on_variable(&self, i: usize) -> i64 {
        self.cost_contribution_of_man(i)
    }

    fn cost_if_swap(&mut self, current_cost: i64, i: usize, j: usize) -> i64 {
        // Blocking-pair status is a relationship between two sides of the market: swapping two
        // men's partners can create or resolve blocking pairs involving third parties who prefer
        // the now-vacated or newly-occupied women. A full recompute is the only exact option.
        if i == j {
            return current_cost;
        }
        self.config.swap(i, j);
        let cost = self.compute_cost();
        self.config.swap(i, j);
        cost
    }

    fn executed_swap(&mut self, _i: usize, _j: usize) {}

    fn set_initial_configuration(&mut self) {
        let mut pool: Vec<Value> = (0..(2 * self.n) as Value).collect();
        self.random.shuffle_in_place(&mut pool);
        self.config.copy_from_slice(&pool[..self.n]);
    }

    fn default_params(&self) -> SolverParams {
        SolverParams {
            prob_select_loc_min: Some(10),
            restart_limit: 1_000_000,
            target_cost: 0,
            ..SolverParams::default()
        }
    }

    fn display(&self) -> String {
        let mut s = String::new();
        for m in 0..self.n {
            match self.partner_of_man(m) {
                Some(w) => s.push_str(&format!("man {} -> woman {}\n", m, w)),
                None => s.push_str(&format!("man {} -> single\n", m)),
            }
        }
        s
    }

    fn check_solution(&self) -> bool {
        self.compute_cost() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two men, two women, both sides agree man k likes woman k best: a trivially stable
    /// matching exists (identity) and any swap introduces a blocking pair.
    fn aligned_preferences(n: usize) -> (Vec<Vec<Option<u32>>>, Vec<Vec<Option<u32>>>) {
        let men = (0..n)
            .map(|m| (0..n).map(|w| Some(((w + n - m) % n) as u32)).collect())
            .collect();
        let women = (0..n)
            .map(|w| (0..n).map(|m| Some(((m + n - w) % n) as u32)).collect())
            .collect();
        (men, women)
    }

    #[test]
    fn identity_matching_is_stable_under_aligned_preferences() {
        let (men, women) = aligned_preferences(4);
        let mut m = SmtiModel::new(men, women, 1).unwrap();
        m.config = vec![0, 1, 2, 3];
        assert_eq!(m.cost_of_solution(true), 0);
        assert!(m.check_solution());
    }

    #[test]
    fn a_swap_away_from_identity_creates_a_blocking_pair() {
        let (men, women) = aligned_preferences(3);
        let mut m = SmtiModel::new(men, women, 1).unwrap();
        m.config = vec![1, 0, 2];
        assert!(m.cost_of_solution(true) > 0);
    }

    #[test]
    fn unmatched_men_are_penalized() {
        let (men, women) = aligned_preferences(2);
        let mut m = SmtiModel::new(men, women, 1).unwrap();
        m.config = vec![2, 3]; // both single
        assert_eq!(m.cost_of_solution(true), 2);
    }

    #[test]
    fn cost_if_swap_matches_full_recompute() {
        let (men, women) = aligned_preferences(4);
        let mut m = SmtiModel::new(men, women, 7).unwrap();
        m.set_initial_configuration();
        let total = m.cost_of_solution(true);
        for i in 0..4 {
            for j in (i + 1)..4 {
                let predicted = m.cost_if_swap(total, i, j);
                m.config.swap(i, j);
                let actual = m.cost_of_solution(true);
                assert_eq!(predicted, actual, "swap({}, {})", i, j);
                m.config.swap(i, j);
            }
        }
    }
}
