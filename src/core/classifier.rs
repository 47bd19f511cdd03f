use crate::core::explanation::build_explanation;
use crate::models::{ClassificationResult, Domain, DomainScoreMap, Outcome, RelationshipStatus};

/// Highest weight a single answer can carry
pub const MAX_WEIGHT: f64 = 4.0;

/// Share of the combined score taken from absolute answer levels
pub const HEALTH_WEIGHT: f64 = 0.6;

/// Share of the combined score taken from partner similarity
pub const SIMILARITY_WEIGHT: f64 = 0.4;

/// Domain average below which a domain is flagged
pub const PROBLEM_AVG_THRESHOLD: f64 = 2.5;

/// Partner gap above which a domain is flagged
pub const PROBLEM_DIFF_THRESHOLD: f64 = 2.0;

const UNMARRIED_TIERS: &[(f64, Outcome)] = &[
    (0.75, Outcome::ExcellentCompatibility),
    (0.60, Outcome::GoodCompatibility),
    (0.45, Outcome::ModerateCompatibility),
];

const MARRIED_TIERS: &[(f64, Outcome)] = &[
    (0.70, Outcome::LowDivorceRisk),
    (0.55, Outcome::ModerateDivorceRisk),
    (0.40, Outcome::HighDivorceRisk),
];

/// Numeric comparison of two respondents, before any labelling
#[derive(Debug, Clone, PartialEq)]
pub struct PairMetrics {
    pub total_first: f64,
    pub total_second: f64,
    pub avg_score: f64,
    pub total_diff: f64,
    pub max_diff: f64,
    /// `1 - total_diff / max_diff`, deliberately left unclamped
    pub similarity: f64,
    pub combined_score: f64,
    pub problem_domains: Vec<Domain>,
    pub strength_domains: Vec<Domain>,
}

/// Compute the status-independent metrics for a pair
///
/// Missing domains read as zero on either side, so a domain one partner
/// never answered counts its full value as difference.
pub fn score_pair(first: &DomainScoreMap, second: &DomainScoreMap) -> PairMetrics {
    let domain_count = Domain::COUNT as f64;

    let total_first = first.total();
    let total_second = second.total();
    let avg_score = (total_first + total_second) / 2.0;

    let total_diff: f64 = Domain::ALL
        .iter()
        .map(|&d| (first.get_or_zero(d) - second.get_or_zero(d)).abs())
        .sum();
    let max_diff = domain_count * MAX_WEIGHT;
    let similarity = 1.0 - (total_diff / max_diff);

    let combined_score = (avg_score / (domain_count * 8.0)) * HEALTH_WEIGHT
        + similarity * SIMILARITY_WEIGHT;

    let (problem_domains, strength_domains): (Vec<Domain>, Vec<Domain>) = Domain::ALL
        .iter()
        .partition(|&&d| is_problem_domain(first.get_or_zero(d), second.get_or_zero(d)));

    PairMetrics {
        total_first,
        total_second,
        avg_score,
        total_diff,
        max_diff,
        similarity,
        combined_score,
        problem_domains,
        strength_domains,
    }
}

/// A domain is a problem when it is weak on average or the partners diverge
#[inline]
pub fn is_problem_domain(first: f64, second: f64) -> bool {
    let avg_domain = (first + second) / 2.0;
    let diff = (first - second).abs();
    avg_domain < PROBLEM_AVG_THRESHOLD || diff > PROBLEM_DIFF_THRESHOLD
}

/// Pick the outcome tier for `combined_score`
///
/// Thresholds always apply to the uninverted combined score.
pub fn outcome_for(combined_score: f64, status: RelationshipStatus) -> Outcome {
    let (tiers, fallback) = match status {
        RelationshipStatus::Unmarried => (UNMARRIED_TIERS, Outcome::LowCompatibility),
        RelationshipStatus::Married => (MARRIED_TIERS, Outcome::CriticalDivorceRisk),
    };

    tiers
        .iter()
        .find(|(min, _)| combined_score >= *min)
        .map(|(_, outcome)| *outcome)
        .unwrap_or(fallback)
}

/// Reported probability: compatibility for unmarried pairs, risk for married ones
#[inline]
pub fn probability_for(combined_score: f64, status: RelationshipStatus) -> f64 {
    match status {
        RelationshipStatus::Unmarried => combined_score,
        RelationshipStatus::Married => 1.0 - combined_score,
    }
}

/// Round a 0..1 probability to a percentage with one decimal place
#[inline]
pub fn to_percentage(probability: f64) -> f64 {
    (probability * 100.0 * 10.0).round() / 10.0
}

/// Classify a pair of domain score maps
pub fn classify(
    first: &DomainScoreMap,
    second: &DomainScoreMap,
    status: RelationshipStatus,
) -> ClassificationResult {
    let metrics = score_pair(first, second);
    let outcome = outcome_for(metrics.combined_score, status);
    let probability = probability_for(metrics.combined_score, status);

    tracing::debug!(
        "Classified pair: combined={:.4}, similarity={:.4}, problems={}, outcome={}",
        metrics.combined_score,
        metrics.similarity,
        metrics.problem_domains.len(),
        outcome
    );

    ClassificationResult {
        outcome,
        label: outcome.label().to_string(),
        score: to_percentage(probability),
        explanation: build_explanation(outcome, &metrics),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(score: f64) -> DomainScoreMap {
        Domain::ALL.iter().map(|&d| (d, score)).collect()
    }

    #[test]
    fn test_identical_full_marks() {
        let metrics = score_pair(&uniform(4.0), &uniform(4.0));

        assert_eq!(metrics.avg_score, 28.0);
        assert_eq!(metrics.total_diff, 0.0);
        assert_eq!(metrics.similarity, 1.0);
        assert!((metrics.combined_score - 0.7).abs() < 1e-12);
        assert!(metrics.problem_domains.is_empty());
        assert_eq!(metrics.strength_domains, Domain::ALL.to_vec());
    }

    #[test]
    fn test_opposite_extremes() {
        let metrics = score_pair(&uniform(4.0), &uniform(1.0));

        assert_eq!(metrics.total_diff, 21.0);
        assert_eq!(metrics.max_diff, 28.0);
        assert_eq!(metrics.similarity, 0.25);
        assert_eq!(metrics.avg_score, 17.5);
        assert!((metrics.combined_score - 0.2875).abs() < 1e-12);
        // diff of 3 everywhere
        assert_eq!(metrics.problem_domains, Domain::ALL.to_vec());
    }

    #[test]
    fn test_empty_maps_degrade_to_zero() {
        let empty = DomainScoreMap::default();
        let metrics = score_pair(&empty, &empty);

        assert_eq!(metrics.avg_score, 0.0);
        assert_eq!(metrics.total_diff, 0.0);
        assert_eq!(metrics.similarity, 1.0);
        assert_eq!(metrics.combined_score, 0.4);
    }

    #[test]
    fn test_problem_domain_disjuncts() {
        // low average, no gap
        assert!(is_problem_domain(2.4, 2.4));
        // healthy average, wide gap
        assert!(is_problem_domain(4.5, 1.5));
        // healthy average, small gap
        assert!(!is_problem_domain(3.5, 2.5));
        // boundaries are not flagged
        assert!(!is_problem_domain(2.5, 2.5));
        assert!(!is_problem_domain(3.5, 1.5));
    }

    #[test]
    fn test_unmarried_thresholds() {
        let s = RelationshipStatus::Unmarried;
        assert_eq!(outcome_for(0.75, s), Outcome::ExcellentCompatibility);
        assert_eq!(outcome_for(0.7499, s), Outcome::GoodCompatibility);
        assert_eq!(outcome_for(0.60, s), Outcome::GoodCompatibility);
        assert_eq!(outcome_for(0.45, s), Outcome::ModerateCompatibility);
        assert_eq!(outcome_for(0.4499, s), Outcome::LowCompatibility);
        assert_eq!(outcome_for(-1.0, s), Outcome::LowCompatibility);
    }

    #[test]
    fn test_married_thresholds() {
        let s = RelationshipStatus::Married;
        assert_eq!(outcome_for(0.95, s), Outcome::LowDivorceRisk);
        assert_eq!(outcome_for(0.70, s), Outcome::LowDivorceRisk);
        assert_eq!(outcome_for(0.55, s), Outcome::ModerateDivorceRisk);
        assert_eq!(outcome_for(0.40, s), Outcome::HighDivorceRisk);
        assert_eq!(outcome_for(0.3999, s), Outcome::CriticalDivorceRisk);
    }

    #[test]
    fn test_probability_is_inverted_only_for_married() {
        assert_eq!(probability_for(0.8, RelationshipStatus::Unmarried), 0.8);
        assert!((probability_for(0.8, RelationshipStatus::Married) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(to_percentage(1.0), 100.0);
        assert_eq!(to_percentage(0.0), 0.0);
        assert_eq!(to_percentage(0.12345), 12.3);
        assert_eq!(to_percentage(0.6666), 66.7);
    }

    #[test]
    fn test_classify_sets_label_from_outcome() {
        let result = classify(&uniform(4.0), &uniform(1.0), RelationshipStatus::Married);
        assert_eq!(result.outcome, Outcome::CriticalDivorceRisk);
        assert_eq!(result.label, "Critical Divorce Risk");
        assert_eq!(result.score, 71.3);
    }
}
