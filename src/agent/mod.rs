//! Interactive agent loop
//!
//! Reads queries one line at a time and runs each through refinement,
//! search and rendering before reading the next.

mod input;
mod runner;

pub use input::{stdin_reader, BufferedInput, LineReader, Readline};
pub use runner::{is_exit, Agent, AgentError, AgentState, EXIT_SENTINEL};
