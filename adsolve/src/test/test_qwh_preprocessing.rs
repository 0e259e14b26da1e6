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

use crate::bitset::BitSet;
use crate::engine::Solver;
use crate::model::ProblemModel;
use crate::problems::Qwh;

fn board() -> Vec<Vec<Option<i64>>> {
    vec![
        vec![Some(0), None, None, Some(2)],
        vec![None, Some(2), Some(0), None],
        vec![Some(1), Some(0), Some(2), Some(3)],
        vec![Some(2), Some(1), Some(3), Some(0)],
    ]
}

#[test]
fn a_hole_pinned_by_row_and_column_fixed_cells_resolves_to_one_value() {
    let model = Qwh::from_board(board(), 1).unwrap();
    assert_eq!(model.hole_count(), 4);

    let mut expected = BitSet::EMPTY;
    expected.set(3);
    assert_eq!(model.domain_of_hole(0), expected);
}

#[test]
fn the_preprocessed_instance_solves_to_cost_zero() {
    let mut model = Qwh::from_board(board(), 1).unwrap();
    let mut solver = Solver::new(model.default_params(), 1);
    let report = solver.solve(&mut model);
    assert_eq!(report.total_cost, 0);
    assert!(model.check_solution());
}
