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

//! # Adaptive-search engine
//!
//! Variable selection, neighborhood exploration, local-minimum escape, reset and restart,
//! driven by a pluggable [`ProblemModel`]. Grounded on `ad_solver.c`'s `Ad_Solve`,
//! `Select_Var_High_Cost`, `Select_Var_Min_Conflict` and `Select_Vars_To_Swap`. The scratch
//! arrays that `ad_solver.c` exposes as file-level globals (`mark`, `list_i`, `list_j`,
//! `list_ij`) are fields of [`Solver`] here (spec.md §9, "Global mutable state").

use std::io::Write;

use log::{debug, trace, warn};

use crate::model::{ProblemModel, SolverParams};
use crate::random::Random;

/// Sentinel for "no candidate found yet", matching the `BIG = INT_MAX/2` convention of the
/// original (spec.md §9 "Numerics") rather than exposing a magic constant in the public API.
const BIG: i64 = i64::MAX / 2;

/// Final counters and outcome of a [`Solver::solve`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveReport {
    /// Cost of the returned configuration (the best found, across all restarts).
    pub total_cost: i64,
    /// Main-loop iterations in the final restart (including redraws).
    pub nb_iter: u64,
    /// Committed swaps in the final restart.
    pub nb_swap: u64,
    /// Sum of tie-list sizes seen in the final restart (diversity proxy).
    pub nb_same_var: u64,
    /// Resets triggered in the final restart.
    pub nb_reset: u64,
    /// Local minima hit in the final restart.
    pub nb_local_min: u64,
    /// Number of restarts performed (0 if the target was reached on the first attempt).
    pub nb_restart: u64,
    /// Iterations across all restarts.
    pub nb_iter_tot: u64,
    /// Committed swaps across all restarts.
    pub nb_swap_tot: u64,
    /// Tie-list size sum across all restarts.
    pub nb_same_var_tot: u64,
    /// Resets across all restarts.
    pub nb_reset_tot: u64,
    /// Local minima across all restarts.
    pub nb_local_min_tot: u64,
    /// The seed the internal RNG was created with (for reproducing this exact run).
    pub seed: u32,
}

/// The adaptive-search engine.
///
/// Owns the swap counter, the mark vector, and the tie-list scratch space; borrows a
/// [`ProblemModel`] mutably for the duration of [`Solver::solve`] (spec.md §3 "Lifecycle &
/// ownership").
pub struct Solver {
    params: SolverParams,
    rng: Random,

    mark: Vec<u32>,
    list_i: Vec<usize>,
    list_j: Vec<usize>,
    list_ij: Vec<(usize, usize)>,

    nb_iter: u64,
    nb_swap: u64,
    nb_same_var: u64,
    nb_reset: u64,
    nb_local_min: u64,
    nb_restart: u64,

    nb_iter_tot: u64,
    nb_swap_tot: u64,
    nb_same_var_tot: u64,
    nb_reset_tot: u64,
    nb_local_min_tot: u64,

    log_sink: Option<Box<dyn Write>>,
}

impl Solver {
    /// Create a new engine with the given parameters, seeded explicitly.
    pub fn new(params: SolverParams, seed: u32) -> Self {
        Solver {
            params,
            rng: Random::seeded(seed),
            mark: Vec::new(),
            list_i: Vec::new(),
            list_j: Vec::new(),
            list_ij: Vec::new(),
            nb_iter: 0,
            nb_swap: 0,
            nb_same_var: 0,
            nb_reset: 0,
            nb_local_min: 0,
            nb_restart: 0,
            nb_iter_tot: 0,
            nb_swap_tot: 0,
            nb_same_var_tot: 0,
            nb_reset_tot: 0,
            nb_local_min_tot: 0,
            log_sink: None,
        }
    }

    /// Create a new engine seeded from OS entropy, recording the seed for later replay.
    pub fn from_entropy(params: SolverParams) -> Self {
        let rng = Random::from_entropy();
        let seed = rng.seed();
        Solver { rng, ..Solver::new(params, seed) }
    }

    /// Install a sink that receives one line per iteration, per spec.md §6's `LOG_FILE` format.
    /// Each line is flushed immediately (`fflush`-per-line semantics).
    pub fn set_log_sink(&mut self, sink: Box<dyn Write>) {
        self.log_sink = Some(sink);
    }

    /// The seed this engine's RNG was created with.
    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    fn emit_log(&mut self, line: &str) {
        trace!("{}", line);
        if let Some(sink) = self.log_sink.as_mut() {
            let _ = writeln!(sink, "{}", line);
            let _ = sink.flush();
        }
    }

    fn marked(&self, i: usize) -> bool {
        self.mark[i] as u64 > self.nb_swap
    }

    fn mark_var(&mut self, i: usize, horizon: u32) {
        self.mark[i] = self.nb_swap as u32 + horizon;
    }

    fn clear_marks(&mut self) {
        for m in self.mark.iter_mut() {
            *m = 0;
        }
    }

    fn accumulate_totals(&mut self) {
        self.nb_iter_tot += self.nb_iter;
        self.nb_swap_tot += self.nb_swap;
        self.nb_same_var_tot += self.nb_same_var;
        self.nb_reset_tot += self.nb_reset;
        self.nb_local_min_tot += self.nb_local_min;
    }

    fn do_reset(&mut self, model: &mut dyn ProblemModel, n: usize) -> i64 {
        self.emit_log("\tTOO MANY FROZEN VARS - RESET");
        let cost = match model.reset(n) {
            Some(c) => c,
            None => model.cost_of_solution(true),
        };
        if model.full_unmark_at_reset() {
            self.clear_marks();
        }
        self.nb_reset += 1;
        cost
    }

    /// Select the variable with the highest projected cost (phase 1 of non-exhaustive
    /// selection). Returns `(i*, nb_var_marked)`, or `None` if every variable is frozen
    /// (spec.md §4.C: fatal in debug builds, a no-progress signal here).
    fn select_var_high_cost(&mut self, model: &dyn ProblemModel) -> Option<(usize, usize)> {
        self.list_i.clear();
        let mut max = 0i64;
        let mut nb_var_marked = 0usize;
        let mut i: i64 = -1;
        loop {
            i = model.next_i(i);
            if i < 0 || i as usize >= model.size() {
                break;
            }
            let iu = i as usize;
            if self.marked(iu) {
                nb_var_marked += 1;
                continue;
            }
            let x = model.cost_on_variable(iu);
            if x >= max {
                if x > max {
                    max = x;
                    self.list_i.clear();
                }
                self.list_i.push(iu);
            }
        }

        self.nb_same_var += self.list_i.len() as u64;

        if self.list_i.is_empty() {
            debug_assert!(false, "all variables are marked wrt the current swap count");
            return None;
        }
        let idx = self.rng.uniform(self.list_i.len());
        Some((self.list_i[idx], nb_var_marked))
    }

    /// Select the minimum-conflict partner for `max_i` (phase 2 of non-exhaustive selection).
    /// Returns `(i*, j*, new_cost)`. `i*` may differ from the `max_i` passed in: a redraw from
    /// the phase-1 tie list happens when no partner is found for the current candidate
    /// (spec.md §9, "goto-driven control flow" respecified as a bounded inner loop).
    fn select_var_min_conflict(
        &mut self,
        model: &mut dyn ProblemModel,
        total_cost: i64,
        best_cost: i64,
        mut max_i: usize,
    ) -> (usize, usize, i64) {
        let use_prob = self.params.prob_select_loc_min.is_some();
        let max_redraws = self.list_i.len().max(1);

        for _ in 0..max_redraws {
            self.list_j.clear();
            let mut new_cost = total_cost;
            let mut j: i64 = -1;

            loop {
                j = model.next_j(max_i, j, false);
                if j < 0 || j as usize >= model.size() {
                    break;
                }
                let ju = j as usize;
                let marked_j = self.marked(ju);

                if !self.params.ignore_mark_if_best && marked_j {
                    continue;
                }

                let x = if max_i == ju { total_cost } else { model.cost_if_swap(total_cost, ju, max_i) };

                if self.params.ignore_mark_if_best && marked_j && x >= best_cost {
                    continue;
                }

                if use_prob && ju == max_i {
                    continue;
                }

                if x <= new_cost {
                    if x < new_cost {
                        self.list_j.clear();
                        new_cost = x;
                        if self.params.first_best {
                            self.list_j.push(ju);
                            return (max_i, ju, new_cost);
                        }
                    }
                    self.list_j.push(ju);
                }
            }

            if use_prob {
                let prob = self.params.prob_select_loc_min.unwrap();
                if new_cost >= total_cost
                    && (self.rng.uniform(100) < prob as usize
                        || (self.list_i.len() <= 1 && self.list_j.len() <= 1))
                {
                    return (max_i, max_i, new_cost);
                }
                if self.list_j.is_empty() {
                    self.nb_iter += 1;
                    let idx = self.rng.uniform(self.list_i.len());
                    max_i = self.list_i[idx];
                    continue;
                }
            }

            let idx = self.rng.uniform(self.list_j.len());
            return (max_i, self.list_j[idx], new_cost);
        }

        // Redraw budget exhausted: stay put rather than loop forever.
        (max_i, max_i, total_cost)
    }

    /// Exhaustive pairwise selection: a single pass over ordered pairs `(i, j)`, `j > i`.
    /// Returns `(i*, j*, nb_var_marked, new_cost)`.
    fn select_vars_to_swap(
        &mut self,
        model: &mut dyn ProblemModel,
        total_cost: i64,
        best_cost: i64,
    ) -> (usize, usize, usize, i64) {
        let n = model.size();
        if self.list_ij.len() != n {
            self.list_ij = vec![(0, 0); n];
        }
        let mut ring_nb = 0usize;
        let mut new_cost = BIG;
        let mut nb_var_marked = 0usize;

        let mut i: i64 = -1;
        loop {
            i = model.next_i(i);
            if i < 0 || i as usize >= n {
                break;
            }
            let iu = i as usize;
            if self.marked(iu) {
                nb_var_marked += 1;
                if !self.params.ignore_mark_if_best {
                    continue;
                }
            }

            let mut j: i64 = -1;
            loop {
                j = model.next_j(iu, j, true);
                if j < 0 || j as usize >= n {
                    break;
                }
                let ju = j as usize;

                if !self.params.ignore_mark_if_best && self.marked(ju) {
                    continue;
                }

                let x = model.cost_if_swap(total_cost, iu, ju);

                if self.params.ignore_mark_if_best && self.marked(ju) && x >= best_cost {
                    continue;
                }

                if x <= new_cost {
                    if x < new_cost {
                        new_cost = x;
                        ring_nb = 0;
                        if self.params.first_best && x < total_cost {
                            return (iu, ju, nb_var_marked, new_cost);
                        }
                    }
                    self.list_ij[ring_nb] = (iu, ju);
                    ring_nb = (ring_nb + 1) % n;
                }
            }
        }

        self.nb_same_var += ring_nb as u64;

        if new_cost >= total_cost {
            if ring_nb == 0
                || (self.params.prob_select_loc_min.is_some()
                    && self.rng.uniform(100) < self.params.prob_select_loc_min.unwrap() as usize)
            {
                let mut i = 0usize;
                while i < n && self.marked(i) {
                    i += 1;
                }
                if i >= n {
                    debug_assert!(false, "all variables are marked wrt the current swap count");
                    i = 0;
                }
                return (i, i, nb_var_marked, new_cost);
            }

            if self.params.prob_select_loc_min.is_none() {
                let x = self.rng.uniform(ring_nb + n);
                if x < n {
                    return (x, x, nb_var_marked, new_cost);
                }
            }
        }

        let idx = self.rng.uniform(ring_nb);
        let (mi, mj) = self.list_ij[idx];
        (mi, mj, nb_var_marked, new_cost)
    }

    /// Run the engine to completion: halts on `cost <= target_cost`, on exhausting restarts, or
    /// on reaching the restart's iteration cap. Returns the best configuration found, written
    /// back into the model, and a [`SolveReport`] with the observed counters.
    pub fn solve(&mut self, model: &mut dyn ProblemModel) -> SolveReport {
        let n = model.size();
        self.mark = vec![0u32; n];
        if self.params.exhaustive {
            self.list_ij = vec![(0, 0); n];
        } else {
            self.list_i = Vec::with_capacity(n);
            self.list_j = Vec::with_capacity(n);
        }

        let reset_n = std::cmp::max(1, (self.params.reset_percent as usize * n) / 100);

        let mut overall_best_cost = BIG;
        let mut overall_best_config: Option<Vec<crate::random::Value>> = None;

        self.nb_iter_tot = 0;
        self.nb_swap_tot = 0;
        self.nb_same_var_tot = 0;
        self.nb_reset_tot = 0;
        self.nb_local_min_tot = 0;

        let mut restart_idx: i64 = -1;
        let mut first_entry = true;
        let mut total_cost;

        'restarts: loop {
            if !first_entry || !self.params.do_not_init {
                self.accumulate_totals();
                model.set_initial_configuration();
                self.clear_marks();
            }
            first_entry = false;

            restart_idx += 1;
            self.nb_iter = 0;
            self.nb_swap = 0;
            self.nb_same_var = 0;
            self.nb_reset = 0;
            self.nb_local_min = 0;

            let mut nb_in_plateau: u32 = 0;
            total_cost = model.cost_of_solution(true);
            let mut best_cost = total_cost;

            loop {
                if total_cost <= self.params.target_cost {
                    break 'restarts;
                }

                if total_cost < overall_best_cost && total_cost > self.params.target_cost {
                    overall_best_cost = total_cost;
                    if self.params.optim_pb {
                        overall_best_config = Some(model.config().to_vec());
                    }
                }

                self.nb_iter += 1;
                if self.nb_iter >= self.params.restart_limit as u64 {
                    if (restart_idx as u32) < self.params.restart_max {
                        continue 'restarts;
                    }
                    warn!(
                        "restart limit reached without hitting target (cost {} > target {})",
                        total_cost, self.params.target_cost
                    );
                    break 'restarts;
                }

                let (max_i, min_j, nb_var_marked, new_cost) = if !self.params.exhaustive {
                    match self.select_var_high_cost(model) {
                        Some((max_i, nb_var_marked)) => {
                            let (max_i, min_j, new_cost) =
                                self.select_var_min_conflict(model, total_cost, best_cost, max_i);
                            (max_i, min_j, nb_var_marked, new_cost)
                        }
                        None => {
                            total_cost = self.do_reset(model, reset_n);
                            continue;
                        }
                    }
                } else {
                    self.select_vars_to_swap(model, total_cost, best_cost)
                };

                self.emit_log(&format!(
                    "----- iter no: {}, cost: {}, nb marked: {} ---",
                    self.nb_iter, total_cost, nb_var_marked
                ));

                if total_cost != new_cost {
                    if nb_in_plateau > 1 {
                        self.emit_log(&format!("\tend of plateau, length: {}", nb_in_plateau));
                    }
                    nb_in_plateau = 0;
                }
                if new_cost < best_cost {
                    best_cost = new_cost;
                }

                if !self.params.exhaustive {
                    self.emit_log(&format!(
                        "\tswap: {}/{}  nb max/min: {}/{}  new cost: {}",
                        max_i,
                        min_j,
                        self.list_i.len(),
                        self.list_j.len(),
                        new_cost
                    ));
                } else {
                    self.emit_log(&format!(
                        "\tswap: {}/{}  nb pairs: {}  new cost: {}",
                        max_i,
                        min_j,
                        self.list_ij.len(),
                        new_cost
                    ));
                }

                nb_in_plateau += 1;

                if max_i == min_j {
                    self.nb_local_min += 1;
                    self.mark_var(max_i, self.params.freeze_loc_min);
                    if nb_var_marked as u32 + 1 >= self.params.reset_limit {
                        total_cost = self.do_reset(model, reset_n);
                    }
                } else {
                    self.mark_var(max_i, self.params.freeze_swap);
                    self.mark_var(min_j, self.params.freeze_swap);
                    model.config_mut().swap(max_i, min_j);
                    self.nb_swap += 1;
                    total_cost = new_cost;
                    model.executed_swap(max_i, min_j);
                    debug!("swap {}/{} -> cost {}", max_i, min_j, total_cost);
                }
            }
        }

        if overall_best_cost < total_cost {
            if let Some(cfg) = overall_best_config.as_ref() {
                model.config_mut().copy_from_slice(cfg);
            }
            total_cost = overall_best_cost;
        }

        self.accumulate_totals();
        self.nb_restart = restart_idx.max(0) as u64;

        SolveReport {
            total_cost,
            nb_iter: self.nb_iter,
            nb_swap: self.nb_swap,
            nb_same_var: self.nb_same_var,
            nb_reset: self.nb_reset,
            nb_local_min: self.nb_local_min,
            nb_restart: self.nb_restart,
            nb_iter_tot: self.nb_iter_tot,
            nb_swap_tot: self.nb_swap_tot,
            nb_same_var_tot: self.nb_same_var_tot,
            nb_reset_tot: self.nb_reset_tot,
            nb_local_min_tot: self.nb_local_min_tot,
            seed: self.rng.seed(),
        }
    }
}
