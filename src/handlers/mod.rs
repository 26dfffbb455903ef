//! HTTP handlers for users, questions and answers.

pub mod extract;
pub mod users;
pub mod questions;
pub mod answers;

pub use users::*;
pub use questions::*;
pub use answers::*;

#[cfg(test)]
mod tests;
