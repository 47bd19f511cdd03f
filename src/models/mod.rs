// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Answer, AnswerOption, ClassificationResult, Domain, DomainScoreMap, Gender, GenderScope,
    Outcome, Pairing, Question, RelationshipStatus, Respondent, StoredResult,
};
pub use requests::{CreatePairingRequest, QuestionsQuery, SubmitAnswersRequest, SubmittedAnswer};
pub use responses::{
    ErrorResponse, HealthResponse, PairingCreatedResponse, PairingResponse, QuestionnaireResponse,
    ResultHistoryResponse, ResultResponse, SubmitAnswersResponse,
};
