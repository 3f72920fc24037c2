//! isoclone benchmark CLI
//!
//! Runs every selected subgraph matching strategy against every target graph
//! and prints a per-target report of results and timings.

#[global_allocator]
/// Global allocator using jemalloc for better performance in parallel workloads.
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

mod args;
mod graph_file;
mod scenarios;

use clap::Parser;
use isoclone_bench::{BenchmarkReport, BenchmarkScheduler};
use tracing::info;

use args::Args;
use scenarios::Run;

/// Executes the benchmark.
///
/// This function:
/// 1. Initializes logging
/// 2. Parses command-line arguments
/// 3. Loads the query and targets, or picks the built-in scenarios
/// 4. Runs the scheduler for each query
/// 5. Prints the reports and optionally writes CSV
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let config = args.to_config();
    config.validate()?;
    let scheduler = BenchmarkScheduler::new(config).with_roster(args.roster());

    let runs = if args.targets.is_empty() {
        info!("no targets given, running built-in scenarios");
        scenarios::builtin()
    } else {
        vec![load_run(&args)?]
    };

    let mut combined = BenchmarkReport::new();
    for run in runs {
        info!(
            "query '{}': {} nodes against {} target(s)",
            run.title,
            run.query.node_count(),
            run.targets.len()
        );
        let report = scheduler.run(&run.query, run.targets)?;

        println!("\n##### {} #####", run.title);
        println!("{report}");

        for (target, record) in report.iter() {
            combined.push(target, record.clone());
        }
    }

    if let Some(path) = &args.csv {
        combined.to_csv(path)?;
        info!("wrote {} rows to {}", combined.len(), path.display());
    }

    Ok(())
}

fn load_run(args: &Args) -> Result<Run, graph_file::LoadError> {
    let (title, query) = match &args.query {
        Some(path) => graph_file::load(path)?,
        None => ("chain-4".to_owned(), scenarios::default_query()),
    };
    let targets = args
        .targets
        .iter()
        .map(|path| graph_file::load(path))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Run {
        title,
        query,
        targets,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use isoclone_bench::MatchResult;
    use isoclone_subgraph::SolverKind;

    use super::*;

    fn fixture(name: &str) -> String {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join(name)
            .display()
            .to_string()
    }

    fn exact_results(semantics: &str) -> Vec<(String, bool)> {
        let query = fixture("query_chain4.json");
        let first = fixture("resolve_and_install.json");
        let second = fixture("verify_environment.json");
        let args = Args::parse_from([
            "isoclone",
            "--query",
            query.as_str(),
            "--target",
            first.as_str(),
            "--target",
            second.as_str(),
            "--solver",
            "branch-and-bound",
            "--solver",
            "constraint-propagation",
            "--solver",
            "ullmann",
            "--time-limit",
            "5",
            "--semantics",
            semantics,
        ]);
        let run = load_run(&args).unwrap();
        assert_eq!(run.title, "site-packages-loop");

        let report = BenchmarkScheduler::new(args.to_config())
            .with_roster(args.roster())
            .run(&run.query, run.targets)
            .unwrap();
        report
            .iter()
            .map(|(target, r)| {
                assert!(r.solver.is_exact());
                assert_ne!(r.result, MatchResult::Timeout);
                (target.to_owned(), r.result.is_found())
            })
            .collect()
    }

    #[test]
    fn loop_back_edge_blocks_only_induced_matches() {
        let induced = exact_results("induced");
        assert_eq!(induced.len(), 6);
        for (target, found) in &induced {
            assert_eq!(*found, target == "resolve_and_install", "{target}");
        }

        let relaxed = exact_results("monomorphism");
        assert!(relaxed.iter().all(|(_, found)| *found), "{relaxed:?}");
    }

    #[test]
    fn builtin_scenarios_cover_all_exact_solvers() {
        let scheduler = BenchmarkScheduler::new(
            Args::parse_from(["isoclone", "--time-limit", "5", "--seed", "1"]).to_config(),
        )
        .with_roster([SolverKind::BranchAndBound, SolverKind::ConstraintPropagation]);
        let found: Vec<bool> = scenarios::builtin()
            .into_iter()
            .map(|run| {
                scheduler
                    .run(&run.query, run.targets)
                    .unwrap()
                    .iter()
                    .all(|(_, r)| r.result.is_found())
            })
            .collect();
        assert_eq!(found, vec![true, false, true]);
    }
}
