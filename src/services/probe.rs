use crate::domain::Stats;
use crate::error::Result;
use crate::infrastructure::{HtmlSnapshot, StatExtractor};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

static NUMBERISH: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d,]+").expect("valid pattern"));

/// What a plain HTTP fetch of the page reveals, without rendering.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub status: u16,
    pub title: Option<String>,
    pub content_length: usize,
    pub sample_numbers: Vec<String>,
    pub stats: Option<Stats>,
}

impl ProbeReport {
    pub async fn from_markup(status: u16, markup: String) -> Self {
        let sample_numbers = NUMBERISH
            .find_iter(&markup)
            .map(|m| m.as_str())
            .filter(|token| token.chars().any(|c| c.is_ascii_digit()))
            .take(10)
            .map(str::to_string)
            .collect();
        let content_length = markup.chars().count();

        let snapshot = HtmlSnapshot::new(markup);
        let stats = StatExtractor::new(Duration::ZERO, Duration::ZERO)
            .extract(&snapshot)
            .await;

        Self {
            status,
            title: snapshot.title(),
            content_length,
            sample_numbers,
            stats,
        }
    }

    pub fn render(&self) -> String {
        let stats = match &self.stats {
            Some(stats) => format!("{stats:?}"),
            None => "none found without rendering".to_string(),
        };
        format!(
            "HTTP status: {}\nPage title: {}\nPage content length: {} characters\nSome numbers found in page: {:?}\nStats: {}",
            self.status,
            self.title.as_deref().unwrap_or("<none>"),
            self.content_length,
            self.sample_numbers,
            stats
        )
    }
}

pub async fn probe(client: &Client, url: &str) -> Result<ProbeReport> {
    info!("Testing connection to {}", url);
    let response = client.get(url).send().await?;
    let status = response.status().as_u16();
    let markup = response.text().await?;
    info!("Connected to {} ({})", url, status);

    Ok(ProbeReport::from_markup(status, markup).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn report_collects_title_numbers_and_stats() {
        let markup = r#"<html><head><title>moltbook</title></head><body>
            <div class="stats-grid">
              <b class="stat-value">12,000</b><b class="stat-value">300</b>
              <b class="stat-value">45,678</b><b class="stat-value">901</b>
            </div></body></html>"#;

        let report = ProbeReport::from_markup(200, markup.to_string()).await;

        assert_eq!(report.title.as_deref(), Some("moltbook"));
        assert_eq!(report.sample_numbers, vec!["12,000", "300", "45,678", "901"]);
        assert_eq!(
            report.stats,
            Some(Stats {
                ai_agents: 12000,
                submolts: 300,
                posts: 45678,
                comments: 901
            })
        );
        assert!(report.render().contains("HTTP status: 200"));
    }

    #[tokio::test]
    async fn unrendered_shell_reports_no_stats() {
        let report = ProbeReport::from_markup(200, "<div id=\"root\"></div>".to_string()).await;
        assert_eq!(report.stats, None);
        assert!(report.render().contains("none found without rendering"));
    }
}
