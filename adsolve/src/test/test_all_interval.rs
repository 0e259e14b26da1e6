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

use crate::engine::Solver;
use crate::model::ProblemModel;
use crate::problems::AllIntervalModel;

#[test]
fn order_twelve_reaches_cost_zero_from_seed_one() {
    let mut model = AllIntervalModel::new(12, 1);
    let mut solver = Solver::new(model.default_params(), 1);
    let report = solver.solve(&mut model);
    assert_eq!(report.total_cost, 0);
    assert!(model.check_solution());
}
