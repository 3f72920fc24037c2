//! Configuration for a benchmark run.
//!
//! A [`Config`] is constructed once per run and handed explicitly to every
//! component that needs it. There is no process-wide state.
//!
//! Quick examples
//!
//! Defaults (59 s cooperative budget, induced semantics, OS-seeded RNG):
//! ```
//! use isoclone_common::Config;
//! let cfg = Config::default();
//! ```
//!
//! Short, reproducible runs that only require query edges to be present:
//! ```
//! use std::time::Duration;
//! use isoclone_common::{Config, EdgeSemantics};
//! let cfg = Config::builder()
//!     .time_limit(Duration::from_millis(250))
//!     .seed(7)
//!     .semantics(EdgeSemantics::Monomorphism)
//!     .build();
//! assert_eq!(cfg.seed, Some(7));
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing or validating configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The edge semantics name was not recognised.
    #[error("unknown edge semantics '{0}' (expected 'induced' or 'monomorphism')")]
    UnknownSemantics(String),
    /// A numeric parameter is outside its admissible range.
    #[error("invalid value for {name}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Human readable explanation.
        reason: &'static str,
    },
}

/// How the absence of a query edge constrains the target.
///
/// - Induced:
///     an edge exists between two query nodes if and only if it exists between
///     their images in the target, in both directions and for self-loops.
/// - Monomorphism:
///     every query edge must exist between the images; extra target edges are
///     allowed.
///
/// Both satisfy the basic embedding guarantee (every query edge has a target
/// counterpart). Induced is the stricter of the two.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeSemantics {
    /// Edge presence must match exactly between mapped pairs.
    #[default]
    Induced,
    /// Query edges must be present; target may have extra edges.
    Monomorphism,
}

impl EdgeSemantics {
    /// Returns true if a query relation `query_edge` is satisfied by a target
    /// relation `target_edge` under these semantics.
    #[must_use]
    pub const fn admits(self, query_edge: bool, target_edge: bool) -> bool {
        match self {
            Self::Induced => query_edge == target_edge,
            Self::Monomorphism => !query_edge || target_edge,
        }
    }
}

impl fmt::Display for EdgeSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Induced => write!(f, "induced"),
            Self::Monomorphism => write!(f, "monomorphism"),
        }
    }
}

impl FromStr for EdgeSemantics {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "induced" | "strict" => Ok(Self::Induced),
            "monomorphism" | "mono" => Ok(Self::Monomorphism),
            other => Err(ConfigError::UnknownSemantics(other.to_owned())),
        }
    }
}

/// Parameters for the simulated annealing strategy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnealingParams {
    /// Starting temperature.
    pub initial_temperature: f64,
    /// Multiplicative decay applied after every iteration.
    pub cooling_rate: f64,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        Self {
            initial_temperature: 10.0,
            cooling_rate: 0.99,
        }
    }
}

/// Parameters for the continuous gradient relaxation strategy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientParams {
    /// Fixed step size.
    pub learning_rate: f64,
    /// Maximum number of descent steps.
    pub max_steps: usize,
    /// Residual norm below which the relaxation is considered converged.
    pub residual_threshold: f64,
}

impl Default for GradientParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            max_steps: 500,
            residual_threshold: 0.1,
        }
    }
}

/// Global run configuration.
///
/// - time_limit: cooperative budget handed to every solver call.
/// - hard_timeout_grace: extra time the scheduler waits before it forcibly
///   abandons a solver that ignored its deadline.
/// - seed: base seed for randomized strategies. `None` draws a fresh seed
///   from the operating system for each task.
/// - semantics: edge semantics enforced by every consistency check.
/// - annealing / gradient: strategy specific knobs.
/// - parallel: execute tasks on the rayon pool (requires the `rayon` feature
///   of `isoclone_bench`, otherwise ignored).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Cooperative per-task budget.
    pub time_limit: Duration,
    /// Grace period added on top of `time_limit` for the external deadline.
    pub hard_timeout_grace: Duration,
    /// Base seed for randomized strategies.
    pub seed: Option<u64>,
    /// Edge semantics for all consistency checks.
    pub semantics: EdgeSemantics,
    /// Simulated annealing parameters.
    pub annealing: AnnealingParams,
    /// Gradient relaxation parameters.
    pub gradient: GradientParams,
    /// Whether tasks may run concurrently.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(59),
            hard_timeout_grace: Duration::from_secs(1),
            seed: None,
            semantics: EdgeSemantics::default(),
            annealing: AnnealingParams::default(),
            gradient: GradientParams::default(),
            parallel: false,
        }
    }
}

impl Config {
    /// Starts a builder seeded with the default configuration.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// The external deadline applied by the scheduler.
    #[must_use]
    pub fn hard_deadline(&self) -> Duration {
        self.time_limit.saturating_add(self.hard_timeout_grace)
    }

    /// Checks that numeric parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.annealing;
        if !(a.initial_temperature.is_finite() && a.initial_temperature > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "annealing.initial_temperature",
                reason: "must be a positive finite number",
            });
        }
        if !(a.cooling_rate > 0.0 && a.cooling_rate <= 1.0) {
            return Err(ConfigError::InvalidParameter {
                name: "annealing.cooling_rate",
                reason: "must lie in (0, 1]",
            });
        }

        let g = &self.gradient;
        if !(g.learning_rate.is_finite() && g.learning_rate > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "gradient.learning_rate",
                reason: "must be a positive finite number",
            });
        }
        if !(g.residual_threshold.is_finite() && g.residual_threshold > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "gradient.residual_threshold",
                reason: "must be a positive finite number",
            });
        }
        Ok(())
    }
}

/// Builder for [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    inner: Config,
}

impl ConfigBuilder {
    /// Sets the cooperative per-task budget.
    #[must_use]
    pub const fn time_limit(mut self, limit: Duration) -> Self {
        self.inner.time_limit = limit;
        self
    }

    /// Sets the grace period before the external deadline fires.
    #[must_use]
    pub const fn hard_timeout_grace(mut self, grace: Duration) -> Self {
        self.inner.hard_timeout_grace = grace;
        self
    }

    /// Fixes the base seed so randomized strategies are reproducible.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.inner.seed = Some(seed);
        self
    }

    /// Sets the seed from an optional value.
    #[must_use]
    pub const fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.inner.seed = seed;
        self
    }

    /// Selects the edge semantics.
    #[must_use]
    pub const fn semantics(mut self, semantics: EdgeSemantics) -> Self {
        self.inner.semantics = semantics;
        self
    }

    /// Convenience: induced semantics.
    #[must_use]
    pub const fn induced(self) -> Self {
        self.semantics(EdgeSemantics::Induced)
    }

    /// Convenience: monomorphism semantics.
    #[must_use]
    pub const fn monomorphism(self) -> Self {
        self.semantics(EdgeSemantics::Monomorphism)
    }

    /// Replaces the annealing parameters.
    #[must_use]
    pub const fn annealing(mut self, params: AnnealingParams) -> Self {
        self.inner.annealing = params;
        self
    }

    /// Replaces the gradient relaxation parameters.
    #[must_use]
    pub const fn gradient(mut self, params: GradientParams) -> Self {
        self.inner.gradient = params;
        self
    }

    /// Enables or disables concurrent task execution.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.inner.parallel = parallel;
        self
    }

    /// Finishes the builder without validation.
    #[must_use]
    pub fn build(self) -> Config {
        self.inner
    }

    /// Finishes the builder, validating numeric parameters.
    ///
    /// # Errors
    ///
    /// See [`Config::validate`].
    pub fn try_build(self) -> Result<Config, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
