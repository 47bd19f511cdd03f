use serde::{Deserialize, Serialize};
use validator::Validate;

/// One selected option, as submitted by a respondent
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmittedAnswer {
    #[validate(range(min = 1))]
    #[serde(alias = "question_id", rename = "questionId")]
    pub question_id: i64,
    #[validate(range(min = 1))]
    #[serde(alias = "option_id", rename = "optionId")]
    pub option_id: i64,
}

/// First respondent's submission; creates the pairing
///
/// `status` and `gender` stay strings here so unknown values produce a
/// readable 400 instead of a generic JSON error.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePairingRequest {
    #[validate(length(min = 1))]
    pub status: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[validate(length(min = 1), nested)]
    pub answers: Vec<SubmittedAnswer>,
}

/// Second respondent's submission against an existing link token
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitAnswersRequest {
    #[validate(length(min = 1), nested)]
    pub answers: Vec<SubmittedAnswer>,
}

/// Query string for the questionnaire endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsQuery {
    pub gender: Option<String>,
}
