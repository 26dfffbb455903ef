//! Users, questions and answers. Trailing slashes on the collection paths are part of the route.

use crate::handlers::{
    create_answer_to_question, create_question, create_user, delete_answer, delete_question_and_answers,
    delete_user, get_answer, get_question_and_answers, get_questions, get_users,
};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn qna_routes(state: AppState) -> Router {
    Router::new()
        .route("/users/", post(create_user).get(get_users))
        .route("/users/:id", delete(delete_user))
        .route("/questions/", get(get_questions).post(create_question))
        .route(
            "/questions/:id",
            get(get_question_and_answers).delete(delete_question_and_answers),
        )
        .route("/questions/:id/answers/", post(create_answer_to_question))
        .route("/answers/:id", get(get_answer).delete(delete_answer))
        .with_state(state)
}
