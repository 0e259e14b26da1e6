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

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use adsolve::engine::Solver;
use adsolve::instance::{load_qwh_board, load_smti_ranks};
use adsolve::model::{ProblemModel, SolverParams};
use adsolve::problems::{
    AllIntervalModel, CellKind, LangfordSkolemModel, LangfordVariant, Qwh, QuasigroupModel, SmtiModel,
};
use adsolve::random::Random;

use clap::{Parser, Subcommand};
use log::info;

/// Flags forwarded to `SolverParams`, matching `AdData`'s command-line surface.
#[derive(Parser, Debug)]
#[clap(name = "adsolve_cli", author = "Daniel Diaz, Philippe Codognet, Salvador Abreu")]
struct CommandLineArguments {
    /// Number of independent executions (`-b`).
    #[clap(short = 'b', long, default_value = "1", global = true)]
    execs: u32,
    /// RNG seed, or `-1` to draw one from entropy (`-s`).
    #[clap(short = 's', long, default_value = "-1", global = true)]
    seed: i64,
    /// Probability (0..=100) of a local-minimum escape (`-p`); unset lets the problem decide.
    #[clap(short = 'p', long, global = true)]
    prob: Option<u32>,
    /// Freeze horizon for a local-minimum swap (`-f`).
    #[clap(short = 'f', long, global = true)]
    freeze_loc_min: Option<u32>,
    /// Freeze horizon for a committed swap (`-F`).
    #[clap(short = 'F', long, global = true)]
    freeze_swap: Option<u32>,
    /// Frozen-variable count that triggers a reset (`-l`).
    #[clap(short = 'l', long, global = true)]
    reset_limit: Option<u32>,
    /// Percentage of variables touched by a reset (`-L`).
    #[clap(short = 'L', long, global = true)]
    reset_percent: Option<u32>,
    /// Iteration cap per restart (`-x`).
    #[clap(short = 'x', long, global = true)]
    restart_limit: Option<u32>,
    /// Maximum number of restarts (`-X`).
    #[clap(short = 'X', long, global = true)]
    restart_max: Option<u32>,
    /// Cost at or below which the search halts successfully (`-t`).
    #[clap(short = 't', long, global = true)]
    target: Option<i64>,
    /// Track the best-ever solution across restarts (`-T`).
    #[clap(short = 'T', long, global = true)]
    optim: bool,
    /// Skip `set_initial_configuration` on the very first restart (`-i`).
    #[clap(short = 'i', long, global = true)]
    do_not_init: bool,
    /// Verbosity level forwarded to `RUST_LOG` (`-d[LEVEL]`).
    #[clap(short = 'd', long, global = true)]
    debug: Option<u8>,

    #[clap(subcommand)]
    problem: ProblemCommand,
}

#[derive(Subcommand, Debug)]
enum ProblemCommand {
    /// All-Interval Series of the given order.
    AllInterval {
        /// Number of distinct interval values.
        n: usize,
    },
    /// Langford sequence of the given size.
    Langford {
        /// Number of distinct values.
        n: usize,
    },
    /// Skolem sequence of the given size.
    Skolem {
        /// Number of distinct values.
        n: usize,
    },
    /// Quasigroup Completion from a board file.
    Quasigroup {
        /// Instance file (`order K` header, then the board, negative cells are holes).
        file: PathBuf,
    },
    /// Quasigroup With Holes from a board file.
    Qwh {
        /// Instance file (`order K` header, then the board, negative cells are holes).
        file: PathBuf,
    },
    /// Stable Matching with Ties & Incomplete lists from a preference-list file.
    Smti {
        /// Instance file (`N [p1 p2]` header, then the two preference matrices).
        file: PathBuf,
    },
}

fn override_params(mut params: SolverParams, args: &CommandLineArguments) -> SolverParams {
    if let Some(p) = args.prob {
        params.prob_select_loc_min = Some(p);
    }
    if let Some(v) = args.freeze_loc_min {
        params.freeze_loc_min = v;
    }
    if let Some(v) = args.freeze_swap {
        params.freeze_swap = v;
    }
    if let Some(v) = args.reset_limit {
        params.reset_limit = v;
    }
    if let Some(v) = args.reset_percent {
        params.reset_percent = v;
    }
    if let Some(v) = args.restart_limit {
        params.restart_limit = v;
    }
    if let Some(v) = args.restart_max {
        params.restart_max = v;
    }
    if let Some(v) = args.target {
        params.target_cost = v;
    }
    params.optim_pb = params.optim_pb || args.optim;
    params.do_not_init = params.do_not_init || args.do_not_init;
    params
}

fn resolve_seed(args: &CommandLineArguments) -> u32 {
    if args.seed < 0 {
        let seed = Random::from_entropy().seed();
        info!("drew seed {} from entropy", seed);
        seed
    } else {
        args.seed as u32
    }
}

fn open_log_sink() -> Option<Box<dyn std::io::Write>> {
    let path = std::env::var("LOG_FILE").ok()?;
    match File::create(&path) {
        Ok(f) => Some(Box::new(f)),
        Err(e) => {
            eprintln!("warning: could not open LOG_FILE {}: {}", path, e);
            None
        }
    }
}

fn run_once(params: SolverParams, seed: u32, model: &mut dyn ProblemModel) -> adsolve::engine::SolveReport {
    let mut solver = Solver::new(params, seed);
    if let Some(sink) = open_log_sink() {
        solver.set_log_sink(sink);
    }
    solver.solve(model)
}

fn best_execution<M: ProblemModel>(
    execs: u32,
    params: SolverParams,
    seed: u32,
    make_model: impl Fn(u32) -> adsolve::Result<M>,
) -> adsolve::Result<(M, adsolve::engine::SolveReport)> {
    let mut best: Option<(M, adsolve::engine::SolveReport)> = None;
    for run in 0..execs.max(1) {
        let run_seed = seed.wrapping_add(run);
        let mut model = make_model(run_seed)?;
        let report = run_once(params, run_seed, &mut model);
        info!(
            "run {}/{}: cost {} in {} iterations ({} restarts)",
            run + 1,
            execs.max(1),
            report.total_cost,
            report.nb_iter_tot,
            report.nb_restart
        );
        if best.as_ref().map_or(true, |(_, b)| report.total_cost < b.total_cost) {
            best = Some((model, report));
        }
    }
    Ok(best.expect("execs is clamped to at least 1"))
}

fn print_qwh_board(model: &Qwh, color: bool) {
    for r in 0..model.order() {
        for c in 0..model.order() {
            let v = model.value_at(r, c);
            if color {
                let code = match model.classify_cell(r, c) {
                    CellKind::Fixed => "37",
                    CellKind::Filled => "32",
                    CellKind::Breach => "31",
                    CellKind::Duplicate => "33",
                };
                print!("\x1b[{}m{:3}\x1b[0m", code, v);
            } else {
                print!("{:3}", v);
            }
        }
        println!();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = CommandLineArguments::parse();

    let log_level = match args.debug.unwrap_or(0) {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", log_level);
    }
    pretty_env_logger::init();

    let seed = resolve_seed(&args);
    let color = std::env::var("COLOR").is_ok();

    match &args.problem {
        ProblemCommand::AllInterval { n } => {
            let n = *n;
            let params = override_params(AllIntervalModel::new(n, seed).default_params(), &args);
            let (model, report) = best_execution(args.execs, params, seed, move |s| Ok(AllIntervalModel::new(n, s)))?;
            println!("{}", model.display());
            println!("cost: {}, valid: {}", report.total_cost, model.check_solution());
            std::process::exit(if report.total_cost == 0 { 0 } else { 1 });
        }
        ProblemCommand::Langford { n } | ProblemCommand::Skolem { n } => {
            let n = *n;
            let variant = if matches!(args.problem, ProblemCommand::Langford { .. }) {
                LangfordVariant::Langford
            } else {
                LangfordVariant::Skolem
            };
            let seed_model = LangfordSkolemModel::new(n, variant, seed)?;
            let params = override_params(seed_model.default_params(), &args);
            let (model, report) = best_execution(args.execs, params, seed, move |s| LangfordSkolemModel::new(n, variant, s))?;
            println!("{}", model.display());
            println!("cost: {}, valid: {}", report.total_cost, model.check_solution());
            std::process::exit(if report.total_cost == 0 { 0 } else { 1 });
        }
        ProblemCommand::Quasigroup { file } => {
            let board = load_qwh_board(file)?;
            let seed_model = QuasigroupModel::from_board(board.clone(), seed)?;
            let params = override_params(seed_model.default_params(), &args);
            let (model, report) =
                best_execution(args.execs, params, seed, move |s| QuasigroupModel::from_board(board.clone(), s))?;
            println!("{}", model.display());
            println!("cost: {}, valid: {}", report.total_cost, model.check_solution());
            std::process::exit(if report.total_cost == 0 { 0 } else { 1 });
        }
        ProblemCommand::Qwh { file } => {
            let board = load_qwh_board(file)?;
            let seed_model = Qwh::from_board(board.clone(), seed)?;
            let params = override_params(seed_model.default_params(), &args);
            let (model, report) = best_execution(args.execs, params, seed, move |s| Qwh::from_board(board.clone(), s))?;
            print_qwh_board(&model, color);
            println!("cost: {}, valid: {}", report.total_cost, model.check_solution());
            std::process::exit(if report.total_cost == 0 { 0 } else { 1 });
        }
        ProblemCommand::Smti { file } => {
            let (men, women) = load_smti_ranks(file)?;
            let seed_model = SmtiModel::new(men.clone(), women.clone(), seed)?;
            let params = override_params(seed_model.default_params(), &args);
            let (model, report) =
                best_execution(args.execs, params, seed, move |s| SmtiModel::new(men.clone(), women.clone(), s))?;
            println!("{}", model.display());
            println!("cost: {}, valid: {}", report.total_cost, model.check_solution());
            std::process::exit(if report.total_cost == 0 { 0 } else { 1 });
        }
    }
}
