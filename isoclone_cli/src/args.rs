use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use isoclone_common::{Config, EdgeSemantics};
use isoclone_subgraph::SolverKind;

/// isoclone - compare subgraph matching strategies for clone detection
#[derive(Parser, Debug)]
#[command(name = "isoclone")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Query graph (JSON). Defaults to a four-node chain
    #[arg(short = 'q', long)]
    pub query: Option<PathBuf>,

    /// Target graph (JSON), repeatable. Without targets the built-in scenarios run
    #[arg(short = 't', long = "target")]
    pub targets: Vec<PathBuf>,

    /// Solver to run, repeatable. Defaults to every working solver
    #[arg(short = 's', long = "solver")]
    pub solvers: Vec<SolverKind>,

    /// Also list the unimplemented LP and MILP strategies in the report
    #[arg(long, default_value_t = false)]
    pub include_placeholders: bool,

    /// Cooperative time limit per task, in seconds
    #[arg(long, value_parser = parse_seconds, default_value = "59")]
    pub time_limit: Duration,

    /// Extra time before a task is forcibly abandoned, in seconds
    #[arg(long, value_parser = parse_seconds, default_value = "1")]
    pub grace: Duration,

    /// Base seed for randomized solvers
    #[arg(long)]
    pub seed: Option<u64>,

    /// Edge semantics checked by every solver
    #[arg(long, value_enum, default_value = "induced")]
    pub semantics: SemanticsArg,

    /// Run tasks in parallel
    #[arg(short = 'p', long, default_value_t = false)]
    pub parallel: bool,

    /// Also write the report as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl Args {
    /// Convert command-line arguments into internal configuration
    pub fn to_config(&self) -> Config {
        Config::builder()
            .time_limit(self.time_limit)
            .hard_timeout_grace(self.grace)
            .maybe_seed(self.seed)
            .semantics(self.semantics.clone().into())
            .parallel(self.parallel)
            .build()
    }

    /// Solvers in report order.
    pub fn roster(&self) -> Vec<SolverKind> {
        if !self.solvers.is_empty() {
            self.solvers.clone()
        } else if self.include_placeholders {
            SolverKind::ALL.to_vec()
        } else {
            SolverKind::ROSTER.to_vec()
        }
    }
}

fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{e}"))
}

/// Command-line argument wrapper for EdgeSemantics
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum SemanticsArg {
    /// Edges and non-edges must both be preserved
    #[value(name = "induced")]
    Induced,
    /// Only query edges must be preserved
    #[value(name = "monomorphism")]
    Monomorphism,
}

impl From<SemanticsArg> for EdgeSemantics {
    fn from(arg: SemanticsArg) -> Self {
        match arg {
            SemanticsArg::Induced => Self::Induced,
            SemanticsArg::Monomorphism => Self::Monomorphism,
        }
    }
}
