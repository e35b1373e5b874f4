use super::BrowserSession;
use crate::error::{Result, StatsError};
use scraper::{Html, Selector};
use std::time::Duration;

/// Static markup standing in for a live page. Nothing renders, so selector
/// waits return immediately.
#[derive(Debug, Clone)]
pub struct HtmlSnapshot {
    content: String,
}

impl HtmlSnapshot {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        Html::parse_document(&self.content)
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    }
}

impl BrowserSession for HtmlSnapshot {
    async fn query_texts(&self, selector: &str, _wait: Duration) -> Result<Vec<String>> {
        let parsed =
            Selector::parse(selector).map_err(|e| StatsError::Selector(e.to_string()))?;
        let document = Html::parse_document(&self.content);

        let texts: Vec<String> = document
            .select(&parsed)
            .map(|el| el.text().collect::<String>())
            .collect();

        if texts.is_empty() {
            return Err(StatsError::Selector(format!(
                "no elements match `{selector}`"
            )));
        }
        Ok(texts)
    }

    async fn content(&self) -> Result<String> {
        Ok(self.content.clone())
    }

    async fn close(self) {}
}
