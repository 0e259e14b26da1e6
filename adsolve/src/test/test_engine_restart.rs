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

//! A fixture model whose cost can never reach its target, used to exercise the restart-counter
//! bookkeeping in [`crate::engine::Solver::solve`] without depending on any concrete problem's
//! convergence behavior.

use crate::engine::Solver;
use crate::model::{ProblemModel, SolverParams};
use crate::random::Value;

struct NeverSatisfied {
    config: Vec<Value>,
}

impl ProblemModel for NeverSatisfied {
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
        1
    }

    fn cost_on_variable(&self, _i: usize) -> i64 {
        1
    }

    fn cost_if_swap(&mut self, _current_cost: i64, _i: usize, _j: usize) -> i64 {
        1
    }

    fn executed_swap(&mut self, _i: usize, _j: usize) {}

    fn set_initial_configuration(&mut self) {
        for (i, slot) in self.config.iter_mut().enumerate() {
            *slot = i as Value;
        }
    }

    fn display(&self) -> String {
        format!("{:?}", self.config)
    }

    fn check_solution(&self) -> bool {
        false
    }
}

#[test]
fn restart_limit_and_restart_max_bound_an_unreachable_target() {
    let mut model = NeverSatisfied { config: (0..4).collect() };
    let params = SolverParams {
        restart_limit: 100,
        restart_max: 2,
        target_cost: 0,
        ..SolverParams::default()
    };
    let mut solver = Solver::new(params, 1);
    let report = solver.solve(&mut model);

    assert_eq!(report.nb_restart, 2);
    assert!(report.nb_iter_tot >= 200);
    assert_eq!(report.total_cost, 1);
}
