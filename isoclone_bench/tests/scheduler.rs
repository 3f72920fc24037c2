#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use isoclone_bench::{BenchError, BenchmarkScheduler, BenchmarkTask, Executor, MatchResult};
use isoclone_common::{AnnealingParams, Config};
use isoclone_subgraph::test_harness::{chain, quick_config, setup_test_logging};
use isoclone_subgraph::{Deadline, Mapping, SearchOutcome, SolverError, SolverKind};
use rstest::rstest;

fn two_targets() -> Vec<(&'static str, isoclone_subgraph::Graph)> {
    vec![("chain-5", chain(5)), ("chain-4", chain(4))]
}

#[test]
fn plan_is_target_outer_solver_inner() {
    let config = Config::builder().seed(100).build();
    let scheduler = BenchmarkScheduler::new(config)
        .with_roster([SolverKind::BranchAndBound, SolverKind::Ullmann]);
    let tasks = scheduler.plan(&chain(3), two_targets()).unwrap();

    let shape: Vec<(usize, &str, SolverKind, u64)> = tasks
        .iter()
        .map(|t| (t.index, t.target_name.as_str(), t.solver, t.seed))
        .collect();
    assert_eq!(
        shape,
        vec![
            (0, "chain-5", SolverKind::BranchAndBound, 100),
            (1, "chain-5", SolverKind::Ullmann, 101),
            (2, "chain-4", SolverKind::BranchAndBound, 102),
            (3, "chain-4", SolverKind::Ullmann, 103),
        ]
    );
    assert!(tasks.iter().all(|t| t.query == chain(3)));
}

#[rstest]
#[case::empty_roster(Vec::new(), two_targets(), "EmptyRoster")]
#[case::no_targets(SolverKind::ROSTER.to_vec(), Vec::new(), "NoTargets")]
#[case::duplicate(
    SolverKind::ROSTER.to_vec(),
    vec![("t", chain(3)), ("t", chain(4))],
    "DuplicateTarget"
)]
fn plan_rejects_bad_input(
    #[case] roster: Vec<SolverKind>,
    #[case] targets: Vec<(&'static str, isoclone_subgraph::Graph)>,
    #[case] variant: &str,
) {
    let scheduler = BenchmarkScheduler::new(Config::default()).with_roster(roster);
    let err = scheduler.plan(&chain(2), targets).unwrap_err();
    assert!(format!("{err:?}").starts_with(variant), "{err:?}");
}

#[test]
fn plan_rejects_invalid_config() {
    let mut config = Config::default();
    config.annealing = AnnealingParams {
        cooling_rate: 1.5,
        ..AnnealingParams::default()
    };
    let err = BenchmarkScheduler::new(config)
        .plan(&chain(2), two_targets())
        .unwrap_err();
    assert!(matches!(err, BenchError::Config(_)));
}

#[test]
fn chain_scenario_through_the_scheduler() {
    setup_test_logging();
    let scheduler = BenchmarkScheduler::new(quick_config(Duration::from_secs(5)));
    let report = scheduler.run(&chain(3), [("chain-5", chain(5))]).unwrap();

    let records = report.records("chain-5");
    assert_eq!(records.len(), SolverKind::ROSTER.len());
    assert_eq!(
        records.iter().map(|r| r.solver).collect::<Vec<_>>(),
        SolverKind::ROSTER.to_vec()
    );
    for r in records.iter().filter(|r| r.solver.is_exact()) {
        let m = r
            .result
            .mapping()
            .unwrap_or_else(|| panic!("{}: {}", r.solver, r.result));
        assert!(m.is_contiguous());
    }
    for r in records {
        assert_ne!(r.result, MatchResult::Timeout, "{}", r.solver);
        assert!(!matches!(r.result, MatchResult::Error(_)), "{}", r.solver);
    }
}

#[test]
fn oversized_query_is_not_found_for_every_solver() {
    setup_test_logging();
    let scheduler = BenchmarkScheduler::new(quick_config(Duration::from_secs(30)));
    let started = Instant::now();
    let report = scheduler.run(&chain(5), [("small", chain(3))]).unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(
        report
            .records("small")
            .iter()
            .all(|r| r.result == MatchResult::NotFound)
    );
}

#[test]
fn placeholders_are_reported_as_unimplemented() {
    setup_test_logging();
    let scheduler = BenchmarkScheduler::new(quick_config(Duration::from_secs(1)))
        .with_roster(SolverKind::ALL);
    let report = scheduler.run(&chain(5), [("small", chain(3))]).unwrap();

    for (_, r) in report.iter() {
        if r.solver.is_placeholder() {
            assert_eq!(r.result, MatchResult::Unimplemented);
        } else {
            assert_eq!(r.result, MatchResult::NotFound);
        }
    }
}

#[test]
fn errors_and_panics_do_not_abort_the_batch() {
    setup_test_logging();
    let executor: Executor = Arc::new(|task: &BenchmarkTask, _deadline: &Deadline| {
        match task.solver {
            SolverKind::BranchAndBound => Err(SolverError::Internal("bad state".into())),
            SolverKind::ConstraintPropagation => panic!("solver bug"),
            _ => Ok(SearchOutcome::NotFound),
        }
    });
    let scheduler = BenchmarkScheduler::new(quick_config(Duration::from_secs(1)))
        .with_roster([
            SolverKind::BranchAndBound,
            SolverKind::ConstraintPropagation,
            SolverKind::Ullmann,
        ])
        .with_executor(executor);
    let report = scheduler.run(&chain(2), two_targets()).unwrap();

    assert_eq!(report.len(), 6);
    for target in ["chain-5", "chain-4"] {
        let results: Vec<&MatchResult> = report.records(target).iter().map(|r| &r.result).collect();
        assert_eq!(
            results,
            vec![
                &MatchResult::Error("internal solver error: bad state".into()),
                &MatchResult::Error("panic: solver bug".into()),
                &MatchResult::NotFound,
            ]
        );
    }
}

#[test]
fn hard_deadline_interrupts_a_stuck_solver() {
    setup_test_logging();
    let observed = Arc::new(AtomicBool::new(false));
    let seen = Arc::clone(&observed);
    let executor: Executor = Arc::new(move |_task: &BenchmarkTask, deadline: &Deadline| {
        // Ignores the cooperative budget, only stops once cancelled.
        while !deadline.token().is_cancelled() {
            thread::sleep(Duration::from_millis(5));
        }
        seen.store(true, Ordering::SeqCst);
        Ok(SearchOutcome::Found(Mapping::empty()))
    });
    let config = Config::builder()
        .time_limit(Duration::from_millis(20))
        .hard_timeout_grace(Duration::from_millis(30))
        .seed(1)
        .build();
    let scheduler = BenchmarkScheduler::new(config)
        .with_roster([SolverKind::BranchAndBound])
        .with_executor(executor);

    let report = scheduler.run(&chain(2), [("t", chain(3))]).unwrap();
    let record = &report.records("t")[0];
    assert_eq!(record.result, MatchResult::Timeout);
    assert!(record.elapsed < Duration::from_secs(2));

    let waited = Instant::now();
    while !observed.load(Ordering::SeqCst) && waited.elapsed() < Duration::from_secs(2) {
        thread::sleep(Duration::from_millis(5));
    }
    assert!(observed.load(Ordering::SeqCst), "worker never saw the cancellation");
}

#[test]
fn seeded_runs_are_reproducible() {
    setup_test_logging();
    let config = quick_config(Duration::from_millis(300));
    let roster = [SolverKind::SimulatedAnnealing, SolverKind::RandomWalk];
    let first = BenchmarkScheduler::new(config.clone())
        .with_roster(roster)
        .run(&chain(3), two_targets())
        .unwrap();
    let second = BenchmarkScheduler::new(config)
        .with_roster(roster)
        .run(&chain(3), two_targets())
        .unwrap();

    let results = |report: &isoclone_bench::BenchmarkReport| {
        report
            .iter()
            .map(|(t, r)| (t.to_owned(), r.seed, r.result.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(results(&first), results(&second));
}

#[test]
fn parallel_flag_keeps_task_order() {
    setup_test_logging();
    let config = Config::builder()
        .time_limit(Duration::from_secs(2))
        .seed(3)
        .parallel(true)
        .build();
    let report = BenchmarkScheduler::new(config)
        .run(&chain(3), two_targets())
        .unwrap();

    let indices: Vec<usize> = report.iter().map(|(_, r)| r.index).collect();
    assert_eq!(indices, (0..2 * SolverKind::ROSTER.len()).collect::<Vec<_>>());
}

#[test]
fn csv_export_writes_one_row_per_task() {
    let scheduler = BenchmarkScheduler::new(quick_config(Duration::from_secs(1)))
        .with_roster([SolverKind::BranchAndBound, SolverKind::LinearRelaxation]);
    let report = scheduler.run(&chain(2), two_targets()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    report.to_csv(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 1 + report.len());
    assert!(text.contains("chain-4,lp-relaxation,unimplemented"));
}
