//! QnaService: delegates to the repositories and tags failures with the operation name.

use crate::domain::{Answer, NewAnswer, Question, User};
use crate::error::{ServiceError, StoreError};
use crate::repository::{QnaRepository, UserRepository};
use std::sync::Arc;
use uuid::Uuid;

fn wrap(op: &'static str) -> impl FnOnce(StoreError) -> ServiceError {
    move |source| ServiceError { op, source }
}

#[derive(Clone)]
pub struct QnaService {
    qna: Arc<dyn QnaRepository>,
    users: Arc<dyn UserRepository>,
}

impl QnaService {
    pub fn new(qna: Arc<dyn QnaRepository>, users: Arc<dyn UserRepository>) -> Self {
        QnaService { qna, users }
    }

    pub async fn create_user(&self, name: &str) -> Result<Uuid, ServiceError> {
        self.users
            .create_user(name)
            .await
            .map_err(wrap("QnaService::create_user"))
    }

    pub async fn get_users(&self) -> Result<Vec<User>, ServiceError> {
        self.users.read_users().await.map_err(wrap("QnaService::get_users"))
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), ServiceError> {
        self.users
            .delete_user(id)
            .await
            .map_err(wrap("QnaService::delete_user"))
    }

    pub async fn get_questions(&self) -> Result<Vec<Question>, ServiceError> {
        self.qna
            .read_questions()
            .await
            .map_err(wrap("QnaService::get_questions"))
    }

    pub async fn create_question(&self, text: &str) -> Result<i64, ServiceError> {
        self.qna
            .create_question(text)
            .await
            .map_err(wrap("QnaService::create_question"))
    }

    /// Question plus all of its answers, ordered by answer id.
    pub async fn get_question_and_answers(&self, id: i64) -> Result<(Question, Vec<Answer>), ServiceError> {
        self.qna
            .read_question_and_answers(id)
            .await
            .map_err(wrap("QnaService::get_question_and_answers"))
    }

    pub async fn delete_question_and_answers(&self, id: i64) -> Result<(), ServiceError> {
        self.qna
            .delete_question_and_answers(id)
            .await
            .map_err(wrap("QnaService::delete_question_and_answers"))
    }

    pub async fn create_answer_to_question(&self, answer: &NewAnswer) -> Result<i64, ServiceError> {
        self.qna
            .create_answer_to_question(answer)
            .await
            .map_err(wrap("QnaService::create_answer_to_question"))
    }

    pub async fn get_answer(&self, id: i64) -> Result<Answer, ServiceError> {
        self.qna.read_answer(id).await.map_err(wrap("QnaService::get_answer"))
    }

    pub async fn delete_answer(&self, id: i64) -> Result<(), ServiceError> {
        self.qna
            .delete_answer(id)
            .await
            .map_err(wrap("QnaService::delete_answer"))
    }
}
