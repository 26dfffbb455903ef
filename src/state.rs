//! Shared application state for all routes. Holds no mutable in-process data.

use crate::service::QnaService;

#[derive(Clone)]
pub struct AppState {
    pub service: QnaService,
}
