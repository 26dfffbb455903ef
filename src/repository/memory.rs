//! In-memory gateway for tests. Mirrors the Postgres contract, including cascades.

use crate::domain::{Answer, NewAnswer, Question, User};
use crate::error::StoreError;
use crate::repository::{QnaRepository, UserRepository};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    next_question_id: i64,
    next_answer_id: i64,
}

#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of gateway operations invoked so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent operation fail like a lost connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<std::sync::MutexGuard<'_, Tables>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        self.tables
            .lock()
            .map_err(|_| StoreError::Database(sqlx::Error::PoolClosed))
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn create_user(&self, name: &str) -> Result<Uuid, StoreError> {
        let mut t = self.enter()?;
        let id = Uuid::new_v4();
        t.users.push(User {
            id,
            name: name.to_string(),
        });
        Ok(id)
    }

    async fn read_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.enter()?.users.clone())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        let mut t = self.enter()?;
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        if t.users.len() == before {
            return Err(StoreError::not_found("user", id));
        }
        t.answers.retain(|a| a.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl QnaRepository for MemoryRepository {
    async fn create_question(&self, text: &str) -> Result<i64, StoreError> {
        let mut t = self.enter()?;
        t.next_question_id += 1;
        let id = t.next_question_id;
        t.questions.push(Question {
            id,
            text: text.to_string(),
        });
        Ok(id)
    }

    async fn read_questions(&self) -> Result<Vec<Question>, StoreError> {
        Ok(self.enter()?.questions.clone())
    }

    async fn read_question_and_answers(&self, id: i64) -> Result<(Question, Vec<Answer>), StoreError> {
        let t = self.enter()?;
        let question = t
            .questions
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("question", id))?;
        let answers = t.answers.iter().filter(|a| a.question_id == id).cloned().collect();
        Ok((question, answers))
    }

    async fn delete_question_and_answers(&self, id: i64) -> Result<(), StoreError> {
        let mut t = self.enter()?;
        let before = t.questions.len();
        t.questions.retain(|q| q.id != id);
        if t.questions.len() == before {
            return Err(StoreError::not_found("question", id));
        }
        t.answers.retain(|a| a.question_id != id);
        Ok(())
    }

    async fn create_answer_to_question(&self, answer: &NewAnswer) -> Result<i64, StoreError> {
        let mut t = self.enter()?;
        // Foreign keys: the Postgres store rejects these with a constraint violation.
        let question_exists = t.questions.iter().any(|q| q.id == answer.question_id);
        let user_exists = t.users.iter().any(|u| u.id == answer.user_id);
        if !question_exists || !user_exists {
            return Err(StoreError::Database(sqlx::Error::Protocol(
                "foreign key violation".into(),
            )));
        }
        t.next_answer_id += 1;
        let id = t.next_answer_id;
        t.answers.push(Answer {
            id,
            question_id: answer.question_id,
            user_id: answer.user_id,
            text: answer.text.clone(),
        });
        Ok(id)
    }

    async fn read_answer(&self, id: i64) -> Result<Answer, StoreError> {
        self.enter()?
            .answers
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("answer", id))
    }

    async fn delete_answer(&self, id: i64) -> Result<(), StoreError> {
        let mut t = self.enter()?;
        let before = t.answers.len();
        t.answers.retain(|a| a.id != id);
        if t.answers.len() == before {
            return Err(StoreError::not_found("answer", id));
        }
        Ok(())
    }
}
