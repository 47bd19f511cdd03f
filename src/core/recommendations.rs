use crate::models::Outcome;

const EXCELLENT: &[&str] = &[
    "Continue building on your strong foundation",
    "Discuss long-term goals and values regularly",
    "Consider pre-marital counseling to prepare for marriage",
];

const GOOD: &[&str] = &[
    "Have deep conversations about identified concern areas",
    "Set aside quality time for each other weekly",
    "Consider couples workshops or relationship coaching",
];

const MODERATE: &[&str] = &[
    "Seek couples counseling before making long-term commitments",
    "Work on communication skills together",
    "Take time to understand each other's perspectives",
];

const LOW: &[&str] = &[
    "Have honest conversations about compatibility",
    "Consider whether this relationship meets both your needs",
    "Seek individual and couples therapy if moving forward",
];

const LOW_RISK: &[&str] = &[
    "Continue your positive relationship habits",
    "Schedule regular check-ins about your relationship",
    "Don't take your strong bond for granted",
];

const MODERATE_RISK: &[&str] = &[
    "Start marriage counseling to address concerns",
    "Commit to working on specific problem areas together",
    "Increase quality time and positive interactions",
];

const HIGH_RISK: &[&str] = &[
    "Seek immediate professional marriage counseling",
    "Both partners must commit to making changes",
    "Consider intensive therapy or marriage retreat programs",
    "Focus on rebuilding trust and communication",
];

/// Actionable next steps for an outcome tier
pub fn recommendations(outcome: Outcome) -> &'static [&'static str] {
    match outcome {
        Outcome::ExcellentCompatibility => EXCELLENT,
        Outcome::GoodCompatibility => GOOD,
        Outcome::ModerateCompatibility => MODERATE,
        Outcome::LowCompatibility => LOW,
        Outcome::LowDivorceRisk => LOW_RISK,
        Outcome::ModerateDivorceRisk => MODERATE_RISK,
        Outcome::HighDivorceRisk | Outcome::CriticalDivorceRisk => HIGH_RISK,
    }
}
