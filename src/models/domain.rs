use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Relationship domain a question belongs to
///
/// Declaration order is the fixed evaluation order used by the classifier
/// and by every explanation string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Communication,
    Trust,
    Finance,
    Intimacy,
    Family,
    PersonalGrowth,
    Commitment,
}

impl Domain {
    /// The fixed domain set, in evaluation order
    pub const ALL: [Domain; 7] = [
        Domain::Communication,
        Domain::Trust,
        Domain::Finance,
        Domain::Intimacy,
        Domain::Family,
        Domain::PersonalGrowth,
        Domain::Commitment,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Communication => "communication",
            Domain::Trust => "trust",
            Domain::Finance => "finance",
            Domain::Intimacy => "intimacy",
            Domain::Family => "family",
            Domain::PersonalGrowth => "personal_growth",
            Domain::Commitment => "commitment",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown domain: {0}")]
pub struct DomainParseError(pub String);

impl FromStr for Domain {
    type Err = DomainParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| DomainParseError(s.to_string()))
    }
}

/// Which side of a pairing an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Respondent {
    First,
    Second,
}

impl Respondent {
    /// Storage representation (1 or 2)
    pub fn number(&self) -> i16 {
        match self {
            Respondent::First => 1,
            Respondent::Second => 2,
        }
    }

    pub fn from_number(n: i16) -> Option<Self> {
        match n {
            1 => Some(Respondent::First),
            2 => Some(Respondent::Second),
            _ => None,
        }
    }
}

/// A single answered question, reduced to what scoring needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub respondent: Respondent,
    #[serde(rename = "questionId")]
    pub question_id: i64,
    pub domain: Domain,
    /// Weight of the chosen option, nominally 1..=4
    pub weight: i32,
}

/// Per-respondent mean answer weight for each answered domain
///
/// Built by the aggregator and never mutated afterwards. Domains without answers are absent and
/// read as zero through [`DomainScoreMap::get_or_zero`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainScoreMap {
    scores: BTreeMap<Domain, f64>,
}

impl DomainScoreMap {
    pub fn from_scores(scores: BTreeMap<Domain, f64>) -> Self {
        Self { scores }
    }

    pub fn get(&self, domain: Domain) -> Option<f64> {
        self.scores.get(&domain).copied()
    }

    /// Score for `domain`, or 0.0 when the respondent answered nothing there
    #[inline]
    pub fn get_or_zero(&self, domain: Domain) -> f64 {
        self.get(domain).unwrap_or(0.0)
    }

    /// Sum of every present domain score
    pub fn total(&self) -> f64 {
        self.scores.values().sum()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Domain, f64)> + '_ {
        self.scores.iter().map(|(d, s)| (*d, *s))
    }
}

impl FromIterator<(Domain, f64)> for DomainScoreMap {
    fn from_iter<I: IntoIterator<Item = (Domain, f64)>>(iter: I) -> Self {
        Self::from_scores(iter.into_iter().collect())
    }
}

/// Relationship status chosen when the pairing is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipStatus {
    Married,
    Unmarried,
}

impl RelationshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipStatus::Married => "married",
            RelationshipStatus::Unmarried => "unmarried",
        }
    }
}

impl fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("relationship status must be 'married' or 'unmarried', got '{0}'")]
pub struct StatusParseError(pub String);

impl FromStr for RelationshipStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "married" => Ok(RelationshipStatus::Married),
            "unmarried" => Ok(RelationshipStatus::Unmarried),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

/// Respondent gender, used only to pick gender-specific questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("gender must be 'male' or 'female', got '{0}'")]
pub struct GenderParseError(pub String);

impl FromStr for Gender {
    type Err = GenderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(GenderParseError(other.to_string())),
        }
    }
}

/// Labelled outcome tier
///
/// The first four apply to unmarried couples, the last four to married ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    ExcellentCompatibility,
    GoodCompatibility,
    ModerateCompatibility,
    LowCompatibility,
    LowDivorceRisk,
    ModerateDivorceRisk,
    HighDivorceRisk,
    CriticalDivorceRisk,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::ExcellentCompatibility => "Excellent Compatibility",
            Outcome::GoodCompatibility => "Good Compatibility",
            Outcome::ModerateCompatibility => "Moderate Compatibility",
            Outcome::LowCompatibility => "Low Compatibility",
            Outcome::LowDivorceRisk => "Low Divorce Risk",
            Outcome::ModerateDivorceRisk => "Moderate Divorce Risk",
            Outcome::HighDivorceRisk => "High Divorce Risk",
            Outcome::CriticalDivorceRisk => "Critical Divorce Risk",
        }
    }

    /// Top tiers name every problem domain; the rest name at most three
    pub fn is_top_tier(&self) -> bool {
        matches!(
            self,
            Outcome::ExcellentCompatibility | Outcome::GoodCompatibility | Outcome::LowDivorceRisk
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final classification for one pairing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    #[serde(skip)]
    pub outcome: Outcome,
    pub label: String,
    /// Percentage with one decimal place
    pub score: f64,
    pub explanation: String,
}

/// Shared context linking the two respondents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pairing {
    pub id: i64,
    #[serde(rename = "linkToken")]
    pub link_token: String,
    pub status: RelationshipStatus,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
}

/// Which respondents a question is shown to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderScope {
    Male,
    Female,
    Both,
}

impl FromStr for GenderScope {
    type Err = GenderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(GenderScope::Male),
            "female" => Ok(GenderScope::Female),
            "both" => Ok(GenderScope::Both),
            other => Err(GenderParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: i64,
    #[serde(rename = "questionId")]
    pub question_id: i64,
    pub text: String,
    pub weight: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    pub domain: Domain,
    #[serde(rename = "genderSpecific")]
    pub gender_specific: GenderScope,
    pub options: Vec<AnswerOption>,
}

/// A persisted classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResult {
    pub id: i64,
    #[serde(rename = "pairingId")]
    pub pairing_id: i64,
    pub label: String,
    pub score: f64,
    pub explanation: String,
    #[serde(rename = "predictedAt")]
    pub predicted_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_round_trips_through_name() {
        for domain in Domain::ALL {
            assert_eq!(domain.as_str().parse::<Domain>(), Ok(domain));
        }
        assert!("loyalty".parse::<Domain>().is_err());
    }

    #[test]
    fn test_domain_order_matches_fixed_set() {
        let mut sorted = Domain::ALL;
        sorted.sort();
        assert_eq!(sorted, Domain::ALL);
        assert_eq!(Domain::COUNT, 7);
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        assert_eq!("married".parse(), Ok(RelationshipStatus::Married));
        assert_eq!("unmarried".parse(), Ok(RelationshipStatus::Unmarried));
        assert!("Married".parse::<RelationshipStatus>().is_err());
        assert!("engaged".parse::<RelationshipStatus>().is_err());
    }

    #[test]
    fn test_missing_domain_reads_as_zero() {
        let map = DomainScoreMap::from_scores(BTreeMap::from([(Domain::Trust, 3.5)]));
        assert_eq!(map.get_or_zero(Domain::Trust), 3.5);
        assert_eq!(map.get_or_zero(Domain::Finance), 0.0);
        assert_eq!(map.get(Domain::Finance), None);
    }

    #[test]
    fn test_score_map_serializes_by_domain_name() {
        let map = DomainScoreMap::from_scores(BTreeMap::from([(Domain::PersonalGrowth, 2.0)]));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"personal_growth":2.0}"#);
    }

    #[test]
    fn test_respondent_numbers() {
        assert_eq!(Respondent::from_number(Respondent::First.number()), Some(Respondent::First));
        assert_eq!(Respondent::from_number(2), Some(Respondent::Second));
        assert_eq!(Respondent::from_number(3), None);
    }
}
