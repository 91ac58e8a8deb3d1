//! # gantry-selector
//!
//! System selectors: operator-supplied placement rules, and the scoring that
//! turns them into a host fitness value for the scheduler.
//!
//! ## Rules
//!
//! A [`Match`] is a pair of boolean expressions. `select` decides whether the
//! rule applies to a (task, host) pair; `match` decides whether the host is a
//! good fit under that rule. Rules are grouped into [`SystemSelector`]s:
//!
//! - `should` rules feed the [`FitnessScorer`] (soft preference)
//! - `must` rules feed the [`MustConstraint`] (hard constraint)
//!
//! ## Collaborators
//!
//! The expression language is not part of this crate. Scoring is written
//! against three traits, passed in at construction:
//!
//! - [`ExpressionEvaluator`]: evaluates one expression against a [`Context`]
//! - [`MatchProvider`]: the currently active rules
//! - [`ContextBuilder`]: assembles the [`Context`] for a (task, host) pair
//!
//! ## Failure policy
//!
//! A broken rule never fails placement. Evaluator errors are logged at debug
//! and the rule contributes nothing to the score.

mod builder;
mod config;
mod constraint;
mod context;
mod error;
mod evaluator;
mod fitness;
mod model;
mod store;

pub use builder::DefaultContextBuilder;
pub use config::SchedulerConfig;
pub use constraint::{ConstraintResult, MustConstraint, CONSTRAINT_EVALUATOR_NAME};
pub use context::Context;
pub use error::{EvaluatorError, SelectorError};
pub use evaluator::{ContextBuilder, ExpressionEvaluator, MatchProvider};
pub use fitness::{FitnessScorer, FITNESS_CALCULATOR_NAME, NO_MATCH_SCORE};
pub use model::{ClusterFacts, HostState, InstanceGroupFacts, Match, Score, SystemSelector, TaskRequest};
pub use store::InMemorySelectorStore;

/// Result type for selector store operations.
pub type SelectorResult<T> = Result<T, SelectorError>;
