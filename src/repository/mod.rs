//! Persistence gateway. The use-case layer only sees these traits.
//!
//! Contract shared by every implementation: a mutation that affects zero rows
//! fails with [`StoreError::NotFound`], as does a by-id read that matches nothing.
//! Deleting a question or user removes the answers that reference it.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use crate::domain::{Answer, NewAnswer, Question, User};
use crate::error::StoreError;
use async_trait::async_trait;
use uuid::Uuid;

pub use postgres::PgRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, name: &str) -> Result<Uuid, StoreError>;
    async fn read_users(&self) -> Result<Vec<User>, StoreError>;
    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait QnaRepository: Send + Sync {
    async fn create_question(&self, text: &str) -> Result<i64, StoreError>;
    async fn read_questions(&self) -> Result<Vec<Question>, StoreError>;
    async fn read_question_and_answers(&self, id: i64) -> Result<(Question, Vec<Answer>), StoreError>;
    async fn delete_question_and_answers(&self, id: i64) -> Result<(), StoreError>;
    async fn create_answer_to_question(&self, answer: &NewAnswer) -> Result<i64, StoreError>;
    async fn read_answer(&self, id: i64) -> Result<Answer, StoreError>;
    async fn delete_answer(&self, id: i64) -> Result<(), StoreError>;
}
