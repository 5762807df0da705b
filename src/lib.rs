//! Brave Agent: an interactive terminal search agent
//!
//! Reads a query, optionally rewrites it with a chat completion model,
//! searches the Brave web search API and renders the hits.

pub mod agent;
pub mod config;
pub mod network;
pub mod refine;
pub mod render;
pub mod search;
pub mod terminal;

pub use agent::{Agent, AgentError};
pub use config::Settings;
pub use search::{SearchResultItem, SearchResultSet};
pub use terminal::Console;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
