//! Query refinement module
//!
//! Optionally rewrites a user query with a chat completion model before it
//! is searched. Failures never escape [`QueryRefiner::refine`].

mod chat;
mod refiner;

pub use chat::{ChatClient, OpenAiChat};
pub use refiner::{QueryRefiner, FALLBACK_WARNING, SYSTEM_PROMPT};

use thiserror::Error;

/// Refinement failures, all of which fall back to the original query
#[derive(Debug, Error)]
pub enum RefineError {
    #[error("Chat request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Chat request returned status {0}")]
    Status(u16),
    #[error("Malformed chat response: {0}")]
    Malformed(String),
}
