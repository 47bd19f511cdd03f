use crate::core::classifier::PairMetrics;
use crate::models::{Domain, Outcome};

/// Lower tiers only name this many problem domains
const MAX_NAMED_PROBLEMS: usize = 3;

/// Assemble the human-readable explanation for an outcome
///
/// Pure formatting over already computed metrics. The wording is fixed per
/// tier; problem and strength domains keep the fixed domain order.
pub fn build_explanation(outcome: Outcome, metrics: &PairMetrics) -> String {
    let problems = &metrics.problem_domains;
    let named = if outcome.is_top_tier() {
        join_domains(problems)
    } else {
        join_domains(&problems[..problems.len().min(MAX_NAMED_PROBLEMS)])
    };

    let mut explanation = match outcome {
        Outcome::ExcellentCompatibility => {
            let mut text = format!(
                "You both show strong alignment across {} out of {} key relationship domains. ",
                Domain::COUNT - problems.len(),
                Domain::COUNT
            );
            if problems.is_empty() {
                text.push_str("Keep nurturing your connection!");
            } else {
                text.push_str(&format!("Consider discussing: {} for even better harmony.", named));
            }
            text
        }
        Outcome::GoodCompatibility => {
            let mut text =
                String::from("You have a solid foundation with good alignment in most areas. ");
            if !problems.is_empty() {
                text.push_str(&format!(
                    "Work together on: {} to strengthen your relationship.",
                    named
                ));
            }
            text
        }
        Outcome::ModerateCompatibility => format!(
            "Your relationship has potential, but requires effort. \
             Focus on improving: {} through open communication and compromise.",
            named
        ),
        Outcome::LowCompatibility => format!(
            "Significant differences detected in: {}. \
             Consider couples counseling or have honest conversations about long-term compatibility.",
            named
        ),
        Outcome::LowDivorceRisk => {
            let mut text = String::from("Your marriage shows strong health across key areas. ");
            if problems.is_empty() {
                text.push_str("Keep investing in your relationship!");
            } else {
                text.push_str(&format!(
                    "Continue working on: {} to maintain this positive trajectory.",
                    named
                ));
            }
            text
        }
        Outcome::ModerateDivorceRisk => format!(
            "Your marriage has areas of concern. Priority areas to address: {}. \
             Consider marriage counseling to strengthen your bond.",
            named
        ),
        Outcome::HighDivorceRisk => format!(
            "Your marriage shows significant stress in: {}. \
             Professional intervention is strongly recommended. \
             Many marriages can be saved with proper support.",
            named
        ),
        Outcome::CriticalDivorceRisk => format!(
            "Your marriage faces serious challenges across multiple domains: {}. \
             Immediate professional help is crucial. \
             Both partners must be committed to making changes.",
            named
        ),
    };

    if !metrics.strength_domains.is_empty() {
        explanation.push_str(&format!(
            "\n\nStrengths: {}.",
            join_domains(&metrics.strength_domains)
        ));
    }

    explanation
}

fn join_domains(domains: &[Domain]) -> String {
    domains
        .iter()
        .map(Domain::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
