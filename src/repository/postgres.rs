//! PostgreSQL gateway: pool construction, table bootstrap and the repository impls.

use crate::config::PostgresConfig;
use crate::domain::{Answer, NewAnswer, Question, User};
use crate::error::StoreError;
use crate::repository::{QnaRepository, UserRepository};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR(100) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS questions (
        id BIGSERIAL PRIMARY KEY,
        text TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS answers (
        id BIGSERIAL PRIMARY KEY,
        question_id BIGINT NOT NULL REFERENCES questions (id) ON DELETE CASCADE,
        user_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        text TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS answers_question_id_idx ON answers (question_id)",
    "CREATE INDEX IF NOT EXISTS answers_user_id_idx ON answers (user_id)",
];

/// Open a bounded pool from discrete connection settings. The first connection is
/// established eagerly so a bad host or credentials fail at startup.
pub async fn connect(cfg: &PostgresConfig) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .password(&cfg.password)
        .database(&cfg.database)
        .ssl_mode(cfg.ssl_mode);
    PgPoolOptions::new()
        .max_connections(cfg.pool_max_conns)
        .max_lifetime(cfg.pool_max_conn_lifetime)
        .idle_timeout(cfg.pool_max_conn_idle_time)
        .connect_with(options)
        .await
}

/// Create tables and foreign keys if they do not exist. Cascading deletes live here.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    for ddl in DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(FromRow)]
struct QuestionRow {
    id: i64,
    text: String,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Question {
            id: row.id,
            text: row.text,
        }
    }
}

#[derive(FromRow)]
struct AnswerRow {
    id: i64,
    question_id: i64,
    user_id: Uuid,
    text: String,
}

impl From<AnswerRow> for Answer {
    fn from(row: AnswerRow) -> Self {
        Answer {
            id: row.id,
            question_id: row.question_id,
            user_id: row.user_id,
            text: row.text,
        }
    }
}

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        PgRepository { pool }
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn create_user(&self, name: &str) -> Result<Uuid, StoreError> {
        let id = sqlx::query_scalar::<_, Uuid>("INSERT INTO users (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn read_users(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT id, name FROM users ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user", id));
        }
        Ok(())
    }
}

#[async_trait]
impl QnaRepository for PgRepository {
    async fn create_question(&self, text: &str) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>("INSERT INTO questions (text) VALUES ($1) RETURNING id")
            .bind(text)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn read_questions(&self) -> Result<Vec<Question>, StoreError> {
        let rows = sqlx::query_as::<_, QuestionRow>("SELECT id, text FROM questions ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Question::from).collect())
    }

    async fn read_question_and_answers(&self, id: i64) -> Result<(Question, Vec<Answer>), StoreError> {
        let question = sqlx::query_as::<_, QuestionRow>("SELECT id, text FROM questions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("question", id))?;
        let answers = sqlx::query_as::<_, AnswerRow>(
            "SELECT id, question_id, user_id, text FROM answers WHERE question_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok((question.into(), answers.into_iter().map(Answer::from).collect()))
    }

    async fn delete_question_and_answers(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("question", id));
        }
        Ok(())
    }

    async fn create_answer_to_question(&self, answer: &NewAnswer) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO answers (question_id, user_id, text) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(answer.question_id)
        .bind(answer.user_id)
        .bind(&answer.text)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn read_answer(&self, id: i64) -> Result<Answer, StoreError> {
        let row = sqlx::query_as::<_, AnswerRow>("SELECT id, question_id, user_id, text FROM answers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("answer", id))?;
        Ok(row.into())
    }

    async fn delete_answer(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM answers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("answer", id));
        }
        Ok(())
    }
}
