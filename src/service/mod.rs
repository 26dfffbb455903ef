//! Use-case layer: one method per client-visible operation, delegating to the gateway.

mod qna;
pub use qna::QnaService;
