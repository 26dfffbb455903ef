//! QnA service: users post questions and answer them over an HTTP JSON API backed by PostgreSQL.

pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod repository;
pub mod response;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

pub use config::{AppConfig, PostgresConfig, RestConfig};
pub use error::{AppError, ConfigError, ErrorKind, ServiceError, StoreError};
pub use repository::{PgRepository, QnaRepository, UserRepository};
pub use response::{Envelope, ErrorCode};
pub use routes::{app, qna_routes};
pub use service::QnaService;
pub use state::AppState;
