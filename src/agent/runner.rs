//! The interactive refine → search → render loop

use super::input::LineReader;
use crate::config::{ConfigError, Settings};
use crate::network::HttpClient;
use crate::refine::{ChatClient, OpenAiChat, QueryRefiner};
use crate::render::{RenderError, Renderer};
use crate::search::{BraveSearch, SearchError, SearchResultSet};
use crate::terminal::Console;
use console::Style;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Input that ends the loop, compared ignoring ASCII case
pub const EXIT_SENTINEL: &str = "exit";

const BANNER: &str = "Brave AI Search Agent";
const PROMPT: &str = "Enter your search query: ";

/// Errors reaching the loop boundary
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Startup(#[from] ConfigError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Could not read input: {0}")]
    Input(#[source] std::io::Error),
}

impl AgentError {
    /// Per-query failures are reported and the loop continues
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AgentError::Search(_) | AgentError::Render(_))
    }
}

impl From<std::io::Error> for AgentError {
    fn from(e: std::io::Error) -> Self {
        AgentError::Render(RenderError::Io(e))
    }
}

/// Loop states
#[derive(Debug, Clone, PartialEq)]
pub enum AgentState {
    AwaitingInput,
    Refining(String),
    Searching(String),
    Rendering(SearchResultSet),
    Exited,
}

/// Whether `line` is the exit sentinel
pub fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case(EXIT_SENTINEL)
}

/// The search agent: refiner, search client and renderer over one console
pub struct Agent {
    refiner: QueryRefiner,
    search: BraveSearch,
    renderer: Renderer,
    console: Console,
}

impl Agent {
    pub fn new(
        refiner: QueryRefiner,
        search: BraveSearch,
        renderer: Renderer,
        console: Console,
    ) -> Self {
        Self {
            refiner,
            search,
            renderer,
            console,
        }
    }

    /// Build all components from settings. Fails if the search key is missing.
    pub fn from_settings(settings: &Settings, console: Console) -> Result<Self, AgentError> {
        let credentials = settings.credentials()?;
        let client = HttpClient::with_settings(&settings.outgoing).map_err(ConfigError::from)?;

        let search = BraveSearch::new(client.clone(), &settings.search, credentials.brave_api_key)?;
        debug!("Requesting {} results per query", search.count());

        let chat = match credentials.openai_api_key {
            Some(key) => {
                let chat = OpenAiChat::new(client, &settings.refiner, key)?;
                info!(
                    "Query refinement enabled with model {} at {}",
                    chat.model(),
                    chat.endpoint()
                );
                Some(Arc::new(chat) as Arc<dyn ChatClient>)
            }
            None => {
                info!("No OpenAI API key configured, query refinement disabled");
                None
            }
        };

        Ok(Self::new(
            QueryRefiner::new(chat, console.clone()),
            search,
            Renderer::new(console.clone()),
            console,
        ))
    }

    /// Run until the exit sentinel or end of input
    pub async fn run(&self, input: &mut dyn LineReader) -> Result<(), AgentError> {
        self.console
            .line(self.console.paint(BANNER, Style::new().bold().blue()))?;
        self.console.line(format!("Type '{}' to quit", EXIT_SENTINEL))?;
        self.console.blank()?;

        let mut state = AgentState::AwaitingInput;
        while state != AgentState::Exited {
            state = match self.step(state, input).await {
                Ok(next) => next,
                Err(err) if err.is_recoverable() => {
                    self.report(&err)?;
                    AgentState::AwaitingInput
                }
                Err(err) => return Err(err),
            };
        }

        debug!("Agent exited");
        Ok(())
    }

    /// Advance the state machine by one transition
    pub async fn step(
        &self,
        state: AgentState,
        input: &mut dyn LineReader,
    ) -> Result<AgentState, AgentError> {
        let next = match state {
            AgentState::AwaitingInput => {
                let prompt = self.console.paint(PROMPT, Style::new().bold().green());
                match input.read_line(&prompt).map_err(AgentError::Input)? {
                    Some(line) if is_exit(&line) => AgentState::Exited,
                    Some(line) => AgentState::Refining(line),
                    None => AgentState::Exited,
                }
            }
            AgentState::Refining(query) => {
                let refined = self.refiner.refine(&query).await;
                if refined != query {
                    self.console.line(format!(
                        "{} {}",
                        self.console.paint("Improved query:", Style::new().cyan()),
                        refined
                    ))?;
                    self.console.blank()?;
                }
                AgentState::Searching(refined)
            }
            AgentState::Searching(query) => AgentState::Rendering(self.search.search(&query).await?),
            AgentState::Rendering(results) => {
                self.renderer.render(&results)?;
                AgentState::AwaitingInput
            }
            AgentState::Exited => AgentState::Exited,
        };
        Ok(next)
    }

    fn report(&self, err: &AgentError) -> Result<(), AgentError> {
        debug!(error = ?err, "Query failed");
        self.console.error("Error:", err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::BufferedInput;
    use crate::config::SearchSettings;
    use crate::refine::RefineError;
    use crate::terminal::CaptureBuffer;
    use async_trait::async_trait;
    use std::io::Cursor;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct FixedChat(&'static str);

    #[async_trait]
    impl ChatClient for FixedChat {
        fn model(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _system: &str, _user: &str) -> Result<String, RefineError> {
            Ok(self.0.to_string())
        }
    }

    fn agent(server: &MockServer, chat: Option<Arc<dyn ChatClient>>) -> (Agent, CaptureBuffer) {
        let (console, buffer) = Console::capture();
        let settings = SearchSettings {
            endpoint: format!("{}/search", server.uri()),
            ..Default::default()
        };
        let search = BraveSearch::new(HttpClient::new().unwrap(), &settings, "token").unwrap();
        let agent = Agent::new(
            QueryRefiner::new(chat, console.clone()),
            search,
            Renderer::new(console.clone()),
            console,
        );
        (agent, buffer)
    }

    fn hits(titles: &[&str]) -> ResponseTemplate {
        let results: Vec<_> = titles
            .iter()
            .map(|t| serde_json::json!({ "title": t, "description": "d", "url": "https://e.example" }))
            .collect();
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "web": { "results": results } }))
    }

    #[test]
    fn test_exit_sentinel_any_case() {
        assert!(is_exit("exit"));
        assert!(is_exit("EXIT"));
        assert!(is_exit("ExIt"));
        assert!(!is_exit(" exit"));
        assert!(!is_exit("exit now"));
        assert!(!is_exit(""));
    }

    #[tokio::test]
    async fn test_exit_stops_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(hits(&["never"]))
            .expect(0)
            .mount(&server)
            .await;

        let (agent, buffer) = agent(&server, None);
        let mut input = BufferedInput::new(Cursor::new("Exit\nrust\n"));
        agent.run(&mut input).await.unwrap();

        assert_eq!(
            buffer.contents(),
            "Brave AI Search Agent\nType 'exit' to quit\n\n"
        );
    }

    #[tokio::test]
    async fn test_empty_line_still_runs_pipeline() {
        let server = MockServer::start().await;
        Mock::given(query_param("q", ""))
            .respond_with(hits(&["empty"]))
            .expect(1)
            .mount(&server)
            .await;

        let (agent, buffer) = agent(&server, None);
        let mut input = BufferedInput::new(Cursor::new("\nexit\n"));
        agent.run(&mut input).await.unwrap();

        assert!(buffer.contents().contains("│ empty"));
    }

    #[tokio::test]
    async fn test_search_error_is_reported_and_loop_continues() {
        let server = MockServer::start().await;
        Mock::given(query_param("q", "limited"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(query_param("q", "fine"))
            .respond_with(hits(&["Recovered"]))
            .expect(1)
            .mount(&server)
            .await;

        let (agent, buffer) = agent(&server, None);
        let mut input = BufferedInput::new(Cursor::new("limited\nfine\nexit\n"));
        agent.run(&mut input).await.unwrap();

        let output = buffer.contents();
        let error = output
            .find("Error: Search failed with status code: 429")
            .unwrap();
        let recovered = output.find("│ Recovered").unwrap();
        assert!(error < recovered);
    }

    #[tokio::test]
    async fn test_refined_query_is_announced_and_searched() {
        let server = MockServer::start().await;
        Mock::given(query_param("q", "rust ownership guide"))
            .respond_with(hits(&["Ownership"]))
            .expect(1)
            .mount(&server)
            .await;

        let chat: Arc<dyn ChatClient> = Arc::new(FixedChat("rust ownership guide"));
        let (agent, buffer) = agent(&server, Some(chat));
        let mut input = BufferedInput::new(Cursor::new("ownership\n"));
        agent.run(&mut input).await.unwrap();

        let output = buffer.contents();
        assert!(output.contains("Improved query: rust ownership guide\n\n"));
        assert!(output.contains("│ Ownership"));
    }

    #[tokio::test]
    async fn test_unchanged_refinement_is_not_announced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let chat: Arc<dyn ChatClient> = Arc::new(FixedChat("same"));
        let (agent, buffer) = agent(&server, Some(chat));
        let mut input = BufferedInput::new(Cursor::new("same\n"));
        agent.run(&mut input).await.unwrap();

        let output = buffer.contents();
        assert!(!output.contains("Improved query"));
        assert!(output.ends_with("No results found\n"));
    }

    #[tokio::test]
    async fn test_step_transitions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(hits(&["One", "Two"]))
            .mount(&server)
            .await;

        let (agent, _buffer) = agent(&server, None);
        let mut input = BufferedInput::new(Cursor::new("query\n"));

        let state = agent.step(AgentState::AwaitingInput, &mut input).await.unwrap();
        assert_eq!(state, AgentState::Refining("query".to_string()));

        let state = agent.step(state, &mut input).await.unwrap();
        assert_eq!(state, AgentState::Searching("query".to_string()));

        let state = agent.step(state, &mut input).await.unwrap();
        let AgentState::Rendering(ref results) = state else {
            panic!("expected rendering state, got {:?}", state);
        };
        assert_eq!(results.items().len(), 2);

        let state = agent.step(state, &mut input).await.unwrap();
        assert_eq!(state, AgentState::AwaitingInput);

        // end of input
        let state = agent.step(state, &mut input).await.unwrap();
        assert_eq!(state, AgentState::Exited);
    }

    #[test]
    fn test_missing_search_key_is_startup_error() {
        let (console, _buffer) = Console::capture();
        let err = Agent::from_settings(&Settings::default(), console)
            .err()
            .unwrap();

        assert!(matches!(err, AgentError::Startup(ConfigError::MissingSearchKey)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_from_settings_without_llm_key() {
        let (console, _buffer) = Console::capture();
        let mut settings = Settings::default();
        settings.search.api_key = Some("token".to_string());

        let agent = Agent::from_settings(&settings, console).unwrap();
        assert!(!agent.refiner.is_enabled());
        assert_eq!(agent.search.count(), 10);
    }

    #[test]
    fn test_from_settings_with_llm_key() {
        let (console, _buffer) = Console::capture();
        let mut settings = Settings::default();
        settings.search.api_key = Some("token".to_string());
        settings.refiner.api_key = Some("sk-test".to_string());

        let agent = Agent::from_settings(&settings, console).unwrap();
        assert!(agent.refiner.is_enabled());
    }
}
