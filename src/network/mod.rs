//! HTTP networking module
//!
//! Provides the HTTP client shared by the search and chat clients.

mod client;
mod request;

pub use client::HttpClient;
pub use request::{ApiRequest, ApiResponse, HttpMethod};
