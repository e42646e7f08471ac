//! Hard gates: typed model, catalogue, criteria evaluation, and scoring.

pub mod catalogue;
pub mod evaluator;
pub mod recommendations;
pub mod relevance;
pub mod result;
pub mod scoring;
pub mod types;

pub use catalogue::{GateCatalogue, SUPPORTED_CATALOGUE_MAJOR};
pub use evaluator::{CriteriaEvaluator, Evaluation, EvaluationLimits};
pub use result::{
    ConditionKind, ConditionResult, Confidence, Degradation, GateEvidence, GateResult,
    GateStatus, PatternMatch, RejectedPattern, Termination,
};
pub use scoring::{ScoreBasis, ScoreInput, ScoreOutcome, Scorer};
pub use types::{
    CoveragePolicy, CriteriaGroup, CriteriaNode, EstimateConfidence, ExpectedCoverage, Gate,
    Operator, PatternCondition, PatternSet, Priority, ScoringPolicy, SecurityPolicy,
    ViolationCount, WeightedPattern,
};
