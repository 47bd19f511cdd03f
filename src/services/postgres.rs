use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    Answer, AnswerOption, ClassificationResult, Domain, Gender, GenderScope, Pairing, Question,
    RelationshipStatus, Respondent, StoredResult, SubmittedAnswer,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Pairing {0} already has both respondents")]
    AlreadyComplete(String),

    #[error("Pairing {0} is still waiting for the second respondent")]
    Incomplete(String),
}

/// PostgreSQL store for pairings, the questionnaire, responses and results
///
/// Owns the incomplete -> complete transition of a pairing: the flip is a
/// guarded UPDATE inside the same transaction as the partner's responses,
/// so a retried or concurrent submission never records a second answer set.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup (schema + reference questionnaire)
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Wrap an existing pool; the caller owns migrations
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a client whose pool connects on first use, without running migrations
    pub fn connect_lazy(database_url: &str) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// List questions with their options, ordered by id
    ///
    /// With a gender, only questions for that gender or for both are kept.
    pub async fn list_questions(&self, gender: Option<Gender>) -> Result<Vec<Question>, PostgresError> {
        let query = r#"
            SELECT id, question_text, domain, gender_specific
            FROM questions
            WHERE $1::TEXT IS NULL OR gender_specific = 'both' OR gender_specific = $1
            ORDER BY id
        "#;

        let rows = sqlx::query(query)
            .bind(gender.map(|g| g.as_str()))
            .fetch_all(&self.pool)
            .await?;

        let option_rows = sqlx::query(
            r#"
            SELECT id, question_id, option_text, weight
            FROM options
            ORDER BY question_id, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut options: HashMap<i64, Vec<AnswerOption>> = HashMap::new();
        for row in &option_rows {
            let option = AnswerOption {
                id: row.get("id"),
                question_id: row.get("question_id"),
                text: row.get("option_text"),
                weight: row.get("weight"),
            };
            options.entry(option.question_id).or_default().push(option);
        }

        let questions = rows
            .iter()
            .map(|row| {
                let id: i64 = row.get("id");
                let domain: String = row.get("domain");
                let scope: String = row.get("gender_specific");
                Ok(Question {
                    id,
                    text: row.get("question_text"),
                    domain: parse_domain(&domain)?,
                    gender_specific: scope
                        .parse::<GenderScope>()
                        .map_err(|e| PostgresError::InvalidInput(e.to_string()))?,
                    options: options.remove(&id).unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, PostgresError>>()?;

        tracing::debug!("Loaded {} questions (gender: {:?})", questions.len(), gender);

        Ok(questions)
    }

    /// Create a pairing and store the first respondent's answers
    pub async fn create_pairing(
        &self,
        status: RelationshipStatus,
        answers: &[SubmittedAnswer],
    ) -> Result<Pairing, PostgresError> {
        let link_token = uuid::Uuid::new_v4().simple().to_string();

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO pairings (link_token, relationship_status, created_at, is_complete)
            VALUES ($1, $2, NOW(), FALSE)
            RETURNING id, link_token, relationship_status, created_at, is_complete
            "#,
        )
        .bind(&link_token)
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let pairing = pairing_from_row(&row)?;

        insert_responses(&mut tx, pairing.id, Respondent::First, answers).await?;

        tx.commit().await?;

        tracing::info!(
            "Created pairing {} ({}) with {} answers",
            pairing.id,
            status,
            answers.len()
        );

        Ok(pairing)
    }

    /// Look up a pairing by its link token
    pub async fn get_pairing(&self, link_token: &str) -> Result<Pairing, PostgresError> {
        let row = sqlx::query(
            r#"
            SELECT id, link_token, relationship_status, created_at, is_complete
            FROM pairings
            WHERE link_token = $1
            "#,
        )
        .bind(link_token)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| PostgresError::NotFound(format!("pairing {}", link_token)))?;

        pairing_from_row(&row)
    }

    /// Store the second respondent's answers and mark the pairing complete
    ///
    /// Fails with `AlreadyComplete`, writing nothing, if the pairing was
    /// completed before.
    pub async fn submit_partner_answers(
        &self,
        link_token: &str,
        answers: &[SubmittedAnswer],
    ) -> Result<Pairing, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            UPDATE pairings
            SET is_complete = TRUE
            WHERE link_token = $1 AND is_complete = FALSE
            RETURNING id, link_token, relationship_status, created_at, is_complete
            "#,
        )
        .bind(link_token)
        .fetch_optional(&mut *tx)
        .await?;

        let pairing = match row {
            Some(row) => pairing_from_row(&row)?,
            None => {
                tx.rollback().await?;
                // Distinguish an unknown token from a used one
                let existing = self.get_pairing(link_token).await?;
                return Err(PostgresError::AlreadyComplete(existing.link_token));
            }
        };

        insert_responses(&mut tx, pairing.id, Respondent::Second, answers).await?;

        tx.commit().await?;

        tracing::info!(
            "Pairing {} completed with {} partner answers",
            pairing.id,
            answers.len()
        );

        Ok(pairing)
    }

    /// All answers for a pairing, joined with question domain and option weight
    pub async fn get_answers(&self, pairing_id: i64) -> Result<Vec<Answer>, PostgresError> {
        let query = r#"
            SELECT r.respondent, r.question_id, q.domain, o.weight
            FROM responses r
            JOIN options o ON r.option_id = o.id
            JOIN questions q ON r.question_id = q.id
            WHERE r.pairing_id = $1
            ORDER BY r.respondent, r.question_id
        "#;

        let rows = sqlx::query(query).bind(pairing_id).fetch_all(&self.pool).await?;

        let answers = rows
            .iter()
            .map(|row| {
                let number: i16 = row.get("respondent");
                let domain: String = row.get("domain");
                Ok(Answer {
                    respondent: Respondent::from_number(number).ok_or_else(|| {
                        PostgresError::InvalidInput(format!("respondent number {}", number))
                    })?,
                    question_id: row.get("question_id"),
                    domain: parse_domain(&domain)?,
                    weight: row.get("weight"),
                })
            })
            .collect::<Result<Vec<_>, PostgresError>>()?;

        tracing::debug!("Pairing {} has {} stored answers", pairing_id, answers.len());

        Ok(answers)
    }

    /// Persist a classification as a new history row
    pub async fn insert_result(
        &self,
        pairing_id: i64,
        result: &ClassificationResult,
    ) -> Result<StoredResult, PostgresError> {
        let row = sqlx::query(
            r#"
            INSERT INTO results (pairing_id, prediction_label, probability_score, explanation, predicted_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, pairing_id, prediction_label, probability_score, explanation, predicted_at
            "#,
        )
        .bind(pairing_id)
        .bind(&result.label)
        .bind(result.score)
        .bind(&result.explanation)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored_result_from_row(&row))
    }

    /// Result history for a pairing, newest first
    pub async fn list_results(&self, pairing_id: i64) -> Result<Vec<StoredResult>, PostgresError> {
        let rows = sqlx::query(
            r#"
            SELECT id, pairing_id, prediction_label, probability_score, explanation, predicted_at
            FROM results
            WHERE pairing_id = $1
            ORDER BY predicted_at DESC, id DESC
            "#,
        )
        .bind(pairing_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(stored_result_from_row).collect())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Insert one respondent's answers after checking each option belongs to its question
async fn insert_responses(
    tx: &mut Transaction<'_, Postgres>,
    pairing_id: i64,
    respondent: Respondent,
    answers: &[SubmittedAnswer],
) -> Result<(), PostgresError> {
    for answer in answers {
        let belongs: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM options WHERE id = $1 AND question_id = $2)",
        )
        .bind(answer.option_id)
        .bind(answer.question_id)
        .fetch_one(&mut **tx)
        .await?;

        if !belongs {
            return Err(PostgresError::InvalidInput(format!(
                "option {} is not an answer to question {}",
                answer.option_id, answer.question_id
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO responses (pairing_id, respondent, question_id, option_id, responded_at)
            VALUES ($1, $2, $3, $4, NOW())
            "#,
        )
        .bind(pairing_id)
        .bind(respondent.number())
        .bind(answer.question_id)
        .bind(answer.option_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

fn parse_domain(name: &str) -> Result<Domain, PostgresError> {
    name.parse::<Domain>()
        .map_err(|e| PostgresError::InvalidInput(e.to_string()))
}

fn pairing_from_row(row: &sqlx::postgres::PgRow) -> Result<Pairing, PostgresError> {
    let status: String = row.get("relationship_status");
    Ok(Pairing {
        id: row.get("id"),
        link_token: row.get("link_token"),
        status: status
            .parse()
            .map_err(|e: crate::models::domain::StatusParseError| {
                PostgresError::InvalidInput(e.to_string())
            })?,
        created_at: row.get("created_at"),
        is_complete: row.get("is_complete"),
    })
}

fn stored_result_from_row(row: &sqlx::postgres::PgRow) -> StoredResult {
    StoredResult {
        id: row.get("id"),
        pairing_id: row.get("pairing_id"),
        label: row.get("prediction_label"),
        score: row.get("probability_score"),
        explanation: row.get("explanation"),
        predicted_at: row.get("predicted_at"),
    }
}
