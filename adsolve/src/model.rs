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

//! # Problem model interface
//!
//! The engine ([`crate::engine::Solver`]) is polymorphic over the capability set described
//! here, rather than over any concrete problem type (spec.md §9, "polymorphism over problem
//! models" — the original solver achieves this via link-time symbol override; a trait is the
//! natural equivalent). A type implementing [`ProblemModel`] owns the decision configuration
//! `σ` and any model-private working memory; the engine only ever reaches it through this trait.

use crate::random::Value;

/// Tunable heuristic parameters for one `Solve` invocation (spec.md §3 "Problem model").
///
/// `-1`/sentinel-style "let the problem decide" is modeled with `Option` where the original C
/// used an out-of-range integer: a problem model's [`ProblemModel::default_params`] supplies the
/// values appropriate for its own structure (e.g. `qwh.c`'s `Init_Parameters` scales
/// `prob_select_loc_min` with hole density), and a caller (the CLI) may override individual
/// fields afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    /// Pairwise-exhaustive swap selection instead of the two-phase high-cost/min-conflict scan.
    pub exhaustive: bool,
    /// Accept the first strictly-improving candidate instead of collecting the full tie list.
    pub first_best: bool,
    /// Probability (0..=100) of declaring a local-minimum escape even when a strictly-improving
    /// swap exists; `None` is the sentinel disabling probabilistic escape (pure greedy/ties-only).
    pub prob_select_loc_min: Option<u32>,
    /// Freeze horizon (in swaps) applied to a variable chosen as both halves of a local minimum.
    pub freeze_loc_min: u32,
    /// Freeze horizon (in swaps) applied to both variables of a committed swap.
    pub freeze_swap: u32,
    /// Number of frozen variables that triggers a reset.
    pub reset_limit: u32,
    /// Percentage of variables a reset should touch.
    pub reset_percent: u32,
    /// Iteration cap per restart.
    pub restart_limit: u32,
    /// Maximum number of restarts.
    pub restart_max: u32,
    /// Cost at or below which the search halts successfully.
    pub target_cost: i64,
    /// Whether this is an optimization problem (track the best-ever solution across restarts).
    pub optim_pb: bool,
    /// Skip `set_initial_configuration` on the very first restart (caller primed `σ` already).
    pub do_not_init: bool,
    /// Whether `cost_if_swap` mutates shared state and must be re-primed via
    /// `cost_of_solution(false)` after the engine inspects it.
    pub reinit_after_if_swap: bool,
    /// `IGNORE_MARK_IF_BEST` policy: consider a frozen partner anyway when the resulting cost
    /// would beat the best cost seen since the last commit, instead of skipping it outright.
    pub ignore_mark_if_best: bool,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            exhaustive: false,
            first_best: false,
            prob_select_loc_min: None,
            freeze_loc_min: 1,
            freeze_swap: 0,
            reset_limit: 5,
            reset_percent: 10,
            restart_limit: 1_000_000_000,
            restart_max: 0,
            target_cost: 0,
            optim_pb: false,
            do_not_init: false,
            reinit_after_if_swap: false,
            ignore_mark_if_best: false,
        }
    }
}

/// The contract a problem instance must satisfy to be driven by [`crate::engine::Solver`].
///
/// Method-call order within the main loop is fixed (spec.md §5): `cost_on_variable*` (or the
/// exhaustive pair scan's `cost_if_swap*`) → `cost_if_swap*` → `executed_swap` on commit →
/// occasional `reset`/`set_initial_configuration`.
pub trait ProblemModel {
    /// Number of decision variables (length of `σ`).
    fn size(&self) -> usize;

    /// Read-only view of the current configuration `σ`.
    fn config(&self) -> &[Value];

    /// Mutable view of `σ`. The engine swaps two entries directly through this; the model is not
    /// otherwise notified until [`ProblemModel::executed_swap`] is called.
    fn config_mut(&mut self) -> &mut [Value];

    /// Recompute the total cost of the current configuration.
    ///
    /// When `record` is true, the model must also re-prime any private tables used by
    /// [`ProblemModel::cost_on_variable`]/[`ProblemModel::cost_if_swap`] for subsequent calls
    /// (`Cost_Of_Solution(1)` in the original).
    fn cost_of_solution(&mut self, record: bool) -> i64;

    /// Cost contribution attributable to variable `i`, as of the last `cost_of_solution(true)`
    /// or `executed_swap`.
    fn cost_on_variable(&self, i: usize) -> i64;

    /// Cost the configuration would have after swapping `i` and `j`, given the current total is
    /// `current_cost`. May temporarily mutate model-private state, but must restore it before
    /// returning unless [`SolverParams::reinit_after_if_swap`] is asserted — in which case the
    /// engine promises to call `cost_of_solution(false)` again before trusting model state.
    fn cost_if_swap(&mut self, current_cost: i64, i: usize, j: usize) -> i64;

    /// Notify the model that `i` and `j` were actually swapped in `σ`.
    fn executed_swap(&mut self, i: usize, j: usize);

    /// Next variable index to examine in the high-cost scan, given the previous one (`-1` to
    /// start). Default: sequential `i + 1`.
    fn next_i(&self, i: i64) -> i64 {
        i + 1
    }

    /// Next partner index to examine for a swap with `i`, given the previous one (`-1` to
    /// start). Default: sequential `j + 1`, starting at `i + 1` in exhaustive mode.
    fn next_j(&self, i: usize, j: i64, exhaustive: bool) -> i64 {
        if j < 0 {
            if exhaustive {
                i as i64 + 1
            } else {
                0
            }
        } else {
            j + 1
        }
    }

    /// Ask the model to disturb `n` variables to escape a local minimum / frozen plateau.
    ///
    /// Returns the new total cost if the model can report it cheaply, or `None` if the engine
    /// should recompute it via `cost_of_solution(true)`.
    fn reset(&mut self, _n: usize) -> Option<i64> {
        None
    }

    /// How marks should be cleared after a reset: fully (the engine clears every mark), or
    /// partially (the model itself calls back into whatever un-marking it needs — modeled here
    /// by returning `false` and having the model hold no marks of its own, since this crate's
    /// models never need partial unmarking; see spec.md §4.C "Marks may be fully cleared").
    fn full_unmark_at_reset(&self) -> bool {
        true
    }

    /// Write a fresh initial configuration into `σ`.
    fn set_initial_configuration(&mut self);

    /// Heuristic parameter defaults appropriate to this problem instance.
    fn default_params(&self) -> SolverParams {
        SolverParams::default()
    }

    /// Human-readable rendering of the current configuration (spec.md §4.B `display`).
    fn display(&self) -> String;

    /// Independent post-hoc check that the current configuration actually satisfies the
    /// problem's constraints (spec.md §4.B `check_solution`) — not used by the cost function,
    /// only by callers wanting a second opinion.
    fn check_solution(&self) -> bool;
}
