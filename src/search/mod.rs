//! Web search module
//!
//! Issues queries against the Brave Search API and decodes the ordered
//! result set.

mod client;
mod models;

pub use client::{BraveSearch, SearchError};
pub use models::*;
