use serde::{Deserialize, Serialize};
use crate::models::domain::{DomainScoreMap, Pairing, Question, RelationshipStatus, StoredResult};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionnaireResponse {
    pub questions: Vec<Question>,
    pub total: usize,
}

/// Returned to the first respondent once their answers are stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingCreatedResponse {
    #[serde(rename = "linkToken")]
    pub link_token: String,
    /// Link to hand to the partner
    #[serde(rename = "partnerLink")]
    pub partner_link: String,
    pub status: RelationshipStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingResponse {
    #[serde(flatten)]
    pub pairing: Pairing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswersResponse {
    pub complete: bool,
    pub recorded: usize,
}

/// Freshly computed classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultResponse {
    pub label: String,
    pub score: f64,
    pub explanation: String,
    pub recommendations: Vec<String>,
    pub status: RelationshipStatus,
    #[serde(rename = "firstScores")]
    pub first_scores: DomainScoreMap,
    #[serde(rename = "secondScores")]
    pub second_scores: DomainScoreMap,
    #[serde(rename = "resultId")]
    pub result_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultHistoryResponse {
    pub results: Vec<StoredResult>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_created_wire_names() {
        let body = serde_json::to_value(PairingCreatedResponse {
            link_token: "abc".to_string(),
            partner_link: "http://localhost:8080/partner/abc".to_string(),
            status: RelationshipStatus::Married,
        })
        .unwrap();

        assert_eq!(body["linkToken"], "abc");
        assert_eq!(body["partnerLink"], "http://localhost:8080/partner/abc");
        assert_eq!(body["status"], "married");
        assert!(body.get("partnerPath").is_none());
    }

    #[test]
    fn test_submit_answers_reports_recorded_count() {
        let body = serde_json::to_value(SubmitAnswersResponse {
            complete: true,
            recorded: 15,
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({"complete": true, "recorded": 15}));
    }
}
