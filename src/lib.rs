//! Rapport Algo - compatibility and divorce-risk scoring for paired questionnaires
//!
//! Two respondents answer the same questionnaire. Their answers are averaged
//! per relationship domain, compared, and classified into a labelled outcome
//! with a score and an explanation.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{aggregate, aggregate_pair, classify, score_pair, PairMetrics};
pub use models::{Answer, ClassificationResult, Domain, DomainScoreMap, Outcome, RelationshipStatus, Respondent};
