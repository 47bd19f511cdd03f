use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::LinkSettings;
use crate::core::{aggregate_pair, classify, recommendations};
use crate::models::{
    CreatePairingRequest, ErrorResponse, Gender, HealthResponse, PairingCreatedResponse,
    PairingResponse, QuestionnaireResponse, QuestionsQuery, RelationshipStatus,
    ResultHistoryResponse, ResultResponse, SubmitAnswersRequest, SubmitAnswersResponse,
};
use crate::services::{PostgresClient, PostgresError};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub links: LinkSettings,
}

/// Configure all pairing-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/questions", web::get().to(list_questions))
        .route("/pairings", web::post().to(create_pairing))
        .route("/pairings/{token}", web::get().to(get_pairing))
        .route("/pairings/{token}/questions", web::get().to(partner_questions))
        .route("/pairings/{token}/answers", web::post().to(submit_partner_answers))
        .route("/pairings/{token}/result", web::post().to(compute_result))
        .route("/pairings/{token}/results", web::get().to(list_results));
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

/// Map a store error onto an HTTP response
fn store_error(context: &str, err: PostgresError) -> HttpResponse {
    match err {
        PostgresError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Invalid link".to_string(),
            message: err.to_string(),
            status_code: 404,
        }),
        PostgresError::AlreadyComplete(_) => HttpResponse::Conflict().json(ErrorResponse {
            error: "This link has already been used".to_string(),
            message: err.to_string(),
            status_code: 409,
        }),
        PostgresError::Incomplete(_) => HttpResponse::Conflict().json(ErrorResponse {
            error: "Pairing not complete".to_string(),
            message: err.to_string(),
            status_code: 409,
        }),
        PostgresError::InvalidInput(_) => bad_request("Invalid answers", err.to_string()),
        _ => {
            tracing::error!("{}: {}", context, err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: context.to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Questionnaire for the first respondent
///
/// GET /api/v1/questions?gender=male|female
async fn list_questions(
    state: web::Data<AppState>,
    query: web::Query<QuestionsQuery>,
) -> impl Responder {
    let gender = match query.gender.as_deref().map(str::parse::<Gender>).transpose() {
        Ok(gender) => gender,
        Err(e) => return bad_request("Invalid gender", e.to_string()),
    };

    match state.postgres.list_questions(gender).await {
        Ok(questions) => HttpResponse::Ok().json(QuestionnaireResponse {
            total: questions.len(),
            questions,
        }),
        Err(e) => store_error("Failed to load questions", e),
    }
}

/// Store the first respondent's answers and hand back a partner link
///
/// POST /api/v1/pairings
///
/// Request body:
/// ```json
/// {
///   "status": "married|unmarried",
///   "gender": "male|female",
///   "answers": [{"questionId": 1, "optionId": 2}]
/// }
/// ```
async fn create_pairing(
    state: web::Data<AppState>,
    req: web::Json<CreatePairingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_pairing request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let status = match req.status.parse::<RelationshipStatus>() {
        Ok(status) => status,
        Err(e) => return bad_request("Invalid relationship status", e.to_string()),
    };

    if let Some(Err(e)) = req.gender.as_deref().map(str::parse::<Gender>) {
        return bad_request("Invalid gender", e.to_string());
    }

    match state.postgres.create_pairing(status, &req.answers).await {
        Ok(pairing) => HttpResponse::Created().json(PairingCreatedResponse {
            partner_link: state.links.partner_link(&pairing.link_token),
            link_token: pairing.link_token,
            status: pairing.status,
        }),
        Err(e) => store_error("Failed to create pairing", e),
    }
}

/// Pairing summary
///
/// GET /api/v1/pairings/{token}
async fn get_pairing(state: web::Data<AppState>, token: web::Path<String>) -> impl Responder {
    match state.postgres.get_pairing(&token).await {
        Ok(pairing) => HttpResponse::Ok().json(PairingResponse { pairing }),
        Err(e) => store_error("Failed to fetch pairing", e),
    }
}

/// Full questionnaire for the partner, while the link is still unused
///
/// GET /api/v1/pairings/{token}/questions
async fn partner_questions(
    state: web::Data<AppState>,
    token: web::Path<String>,
) -> impl Responder {
    let pairing = match state.postgres.get_pairing(&token).await {
        Ok(pairing) => pairing,
        Err(e) => return store_error("Failed to fetch pairing", e),
    };

    if pairing.is_complete {
        return store_error(
            "Failed to fetch pairing",
            PostgresError::AlreadyComplete(pairing.link_token),
        );
    }

    match state.postgres.list_questions(None).await {
        Ok(questions) => HttpResponse::Ok().json(QuestionnaireResponse {
            total: questions.len(),
            questions,
        }),
        Err(e) => store_error("Failed to load questions", e),
    }
}

/// Store the partner's answers and close the pairing
///
/// POST /api/v1/pairings/{token}/answers
async fn submit_partner_answers(
    state: web::Data<AppState>,
    token: web::Path<String>,
    req: web::Json<SubmitAnswersRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    match state.postgres.submit_partner_answers(&token, &req.answers).await {
        Ok(_) => HttpResponse::Ok().json(SubmitAnswersResponse {
            complete: true,
            recorded: req.answers.len(),
        }),
        Err(e) => store_error("Failed to record partner answers", e),
    }
}

/// Compute, persist and return a fresh classification
///
/// POST /api/v1/pairings/{token}/result
///
/// Every call inserts a new result row; earlier rows are kept as history.
async fn compute_result(state: web::Data<AppState>, token: web::Path<String>) -> impl Responder {
    let pairing = match state.postgres.get_pairing(&token).await {
        Ok(pairing) => pairing,
        Err(e) => return store_error("Failed to fetch pairing", e),
    };

    if !pairing.is_complete {
        return store_error(
            "Failed to compute result",
            PostgresError::Incomplete(pairing.link_token),
        );
    }

    let answers = match state.postgres.get_answers(pairing.id).await {
        Ok(answers) => answers,
        Err(e) => return store_error("Failed to load answers", e),
    };

    let (first_scores, second_scores) = aggregate_pair(&answers);
    let result = classify(&first_scores, &second_scores, pairing.status);

    let stored = match state.postgres.insert_result(pairing.id, &result).await {
        Ok(stored) => stored,
        Err(e) => return store_error("Failed to store result", e),
    };

    tracing::info!(
        "Pairing {} classified as '{}' ({}%)",
        pairing.id,
        result.label,
        result.score
    );

    HttpResponse::Ok().json(ResultResponse {
        recommendations: recommendations(result.outcome)
            .iter()
            .map(|r| r.to_string())
            .collect(),
        label: result.label,
        score: result.score,
        explanation: result.explanation,
        status: pairing.status,
        first_scores,
        second_scores,
        result_id: stored.id,
    })
}

/// Stored result history, newest first
///
/// GET /api/v1/pairings/{token}/results
async fn list_results(state: web::Data<AppState>, token: web::Path<String>) -> impl Responder {
    let pairing = match state.postgres.get_pairing(&token).await {
        Ok(pairing) => pairing,
        Err(e) => return store_error("Failed to fetch pairing", e),
    };

    match state.postgres.list_results(pairing.id).await {
        Ok(results) => HttpResponse::Ok().json(ResultHistoryResponse {
            count: results.len(),
            results,
        }),
        Err(e) => store_error("Failed to fetch results", e),
    }
}
