//! Per-task outcome as it appears in a benchmark report.

use std::fmt;

use isoclone_subgraph::{Mapping, SearchOutcome, SolverError};

/// Normalized result of one benchmark task.
///
/// Unlike [`SearchOutcome`] this also covers failures the scheduler absorbs,
/// so a single bad task never aborts the batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchResult {
    /// The solver returned a verified embedding.
    Found(Mapping),
    /// The solver finished without an embedding.
    NotFound,
    /// The cooperative or the hard deadline expired.
    Timeout,
    /// The strategy has no implementation.
    Unimplemented,
    /// The solver failed or panicked.
    Error(String),
}

impl MatchResult {
    /// Folds a solver call into a report entry.
    ///
    /// Placeholders become [`MatchResult::Unimplemented`]; every other
    /// error becomes [`MatchResult::Error`].
    #[must_use]
    pub fn from_attempt(attempt: Result<SearchOutcome, SolverError>) -> Self {
        match attempt {
            Ok(outcome) => outcome.into(),
            Err(SolverError::Unimplemented(_)) => Self::Unimplemented,
            Err(e) => Self::Error(e.to_string()),
        }
    }

    /// Short lowercase label, stable across releases.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NotFound => "not found",
            Self::Timeout => "timeout",
            Self::Unimplemented => "unimplemented",
            Self::Error(_) => "error",
        }
    }

    /// Returns true for [`MatchResult::Found`].
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The mapping, if one was found.
    #[must_use]
    pub const fn mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Found(m) => Some(m),
            _ => None,
        }
    }
}

impl From<SearchOutcome> for MatchResult {
    fn from(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Found(m) => Self::Found(m),
            SearchOutcome::NotFound => Self::NotFound,
            SearchOutcome::Timeout => Self::Timeout,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(m) => write!(f, "found {m}"),
            Self::Error(msg) => write!(f, "error: {msg}"),
            other => f.write_str(other.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Ok(SearchOutcome::NotFound), MatchResult::NotFound)]
    #[case(Ok(SearchOutcome::Timeout), MatchResult::Timeout)]
    #[case(Err(SolverError::Unimplemented("milp")), MatchResult::Unimplemented)]
    #[case(
        Err(SolverError::Numerical("residual is NaN".into())),
        MatchResult::Error("numerical failure: residual is NaN".into())
    )]
    fn normalizes_attempts(
        #[case] attempt: Result<SearchOutcome, SolverError>,
        #[case] expected: MatchResult,
    ) {
        assert_eq!(MatchResult::from_attempt(attempt), expected);
    }

    #[test]
    fn displays_mapping_for_found() {
        let m = Mapping::new(vec![2, 3]).unwrap();
        assert_eq!(MatchResult::Found(m).to_string(), "found {0->2, 1->3}");
        assert_eq!(MatchResult::Unimplemented.to_string(), "unimplemented");
    }
}
