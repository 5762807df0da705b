//! Terminal rendering of search results

use crate::search::{SearchResultItem, SearchResultSet};
use crate::terminal::Console;
use console::Style;
use scraper::Html;
use thiserror::Error;

/// Printed when the provider returned no `web` section
pub const NO_RESULTS: &str = "No results found";

const MIN_PANEL_WIDTH: usize = 20;
const MAX_PANEL_WIDTH: usize = 100;

/// Rendering failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Could not write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes result sets to a console, one bordered panel per hit
pub struct Renderer {
    console: Console,
}

impl Renderer {
    pub fn new(console: Console) -> Self {
        Self { console }
    }

    /// Render every item in response order
    pub fn render(&self, results: &SearchResultSet) -> Result<(), RenderError> {
        let Some(web) = &results.web else {
            self.console
                .line(self.console.paint(NO_RESULTS, Style::new().red()))?;
            return Ok(());
        };

        for item in &web.results {
            self.render_item(item)?;
        }
        Ok(())
    }

    fn render_item(&self, item: &SearchResultItem) -> Result<(), RenderError> {
        let width = self
            .console
            .width()
            .clamp(MIN_PANEL_WIDTH, MAX_PANEL_WIDTH);
        let border = Style::new().blue();
        let rule = "─".repeat(width - 2);
        let bar = self.console.paint("│", border.clone());

        self.console
            .line(self.console.paint(format!("╭{}╮", rule), border.clone()))?;

        let title = self.console.paint(&item.title, Style::new().bold());
        let link = format!(
            "{} {}",
            self.console.paint("Link:", Style::new().cyan()),
            self.console.paint(&item.url, Style::new().underlined())
        );
        let description = html_to_text(&item.description);

        let mut body = vec![title.as_str(), ""];
        let start = body.len();
        body.extend(description.lines().map(str::trim_end));
        if body.len() == start {
            body.push("");
        }
        body.extend(["", link.as_str()]);

        for line in body {
            if line.is_empty() {
                self.console.line(&bar)?;
            } else {
                self.console.line(format!("{} {}", bar, line))?;
            }
        }

        self.console
            .line(self.console.paint(format!("╰{}╯", rule), border))?;
        self.console.blank()?;
        Ok(())
    }
}

/// Strip inline markup such as `<strong>` and decode entities
pub fn html_to_text(fragment: &str) -> String {
    if !fragment.contains('<') && !fragment.contains('&') {
        return fragment.to_string();
    }
    let html = Html::parse_fragment(fragment);
    let text: String = html.root_element().text().collect();
    text
}
