//! Query refinement with fallback to the original text

use super::{ChatClient, RefineError};
use crate::terminal::Console;
use std::sync::Arc;
use tracing::{debug, warn};

/// System instruction sent with every refinement request
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that improves search queries.";

/// Shown when refinement fails and the original query is used
pub const FALLBACK_WARNING: &str =
    "Warning: Could not process query with OpenAI. Using original query.";

/// Rewrites queries with an optional chat client
pub struct QueryRefiner {
    chat: Option<Arc<dyn ChatClient>>,
    console: Console,
}

impl QueryRefiner {
    pub fn new(chat: Option<Arc<dyn ChatClient>>, console: Console) -> Self {
        Self { chat, console }
    }

    pub fn is_enabled(&self) -> bool {
        self.chat.is_some()
    }

    /// Ask the model for a better query. Without a chat client the query is
    /// returned as-is and nothing is sent.
    pub async fn try_refine(&self, query: &str) -> Result<String, RefineError> {
        let Some(chat) = &self.chat else {
            return Ok(query.to_string());
        };

        let prompt = user_prompt(query);
        let refined = chat.complete(SYSTEM_PROMPT, &prompt).await?;
        debug!(original = query, refined = %refined, model = chat.model(), "Refined query");
        Ok(refined)
    }

    /// Refine `query`, falling back to it unchanged on any error
    pub async fn refine(&self, query: &str) -> String {
        match self.try_refine(query).await {
            Ok(refined) => refined,
            Err(e) => {
                warn!(error = %e, "Query refinement failed");
                if let Err(io) = self.console.warning(FALLBACK_WARNING) {
                    debug!("Could not write refinement warning: {}", io);
                }
                query.to_string()
            }
        }
    }
}

fn user_prompt(query: &str) -> String {
    format!("Improve this search query for better results: {}", query)
}
