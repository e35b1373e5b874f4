use crate::domain::Stats;
use crate::infrastructure::browser::BrowserSession;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

pub(crate) mod numbers;

/// Locators for the homepage's stat cards, most specific first.
pub const STAT_CARD_SELECTORS: &[&str] = &[
    "div.gap-6 div > div.text-2xl",
    "div.stat-card div.text-2xl",
    "div.stats-container div.text-2xl",
    "#stats-section div.text-2xl",
    ".stats-grid .stat-value",
    ".dashboard-stats .count",
    "div.gap-6 span",
    "div.gap-6 strong",
    ".stat-item .value",
    "[data-stat-value]",
];

/// Broader locators for anything bold or number-like.
pub const NUMBER_LIKE_SELECTORS: &[&str] = &[
    "div.font-bold",
    ".count",
    ".number",
    "span.font-bold",
    ".stats-number",
    ".MuiTypography-body1",
    ".text-3xl",
    ".text-2xl",
];

/// One way of reading the counters off a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One counter per matched element.
    StatCards(&'static [&'static str]),
    /// Every number inside the matched elements.
    NumberLike(&'static [&'static str]),
    /// Key/value and bare-number patterns over the raw markup.
    PageText,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::StatCards(_) => "stat cards",
            Strategy::NumberLike(_) => "number-like elements",
            Strategy::PageText => "page text",
        }
    }

    async fn run<S: BrowserSession>(&self, session: &S, wait: Duration) -> Option<Stats> {
        match self {
            Strategy::StatCards(selectors) => {
                for selector in selectors.iter() {
                    let texts = match session.query_texts(selector, wait).await {
                        Ok(texts) => texts,
                        Err(e) => {
                            debug!("Selector {} failed: {}", selector, e);
                            continue;
                        }
                    };
                    if texts.len() < 4 {
                        continue;
                    }

                    let values: Vec<u64> =
                        texts.iter().filter_map(|t| numbers::card_value(t)).collect();
                    if let Some(stats) = Stats::from_positional(&values) {
                        debug!("Selector {} matched", selector);
                        return Some(stats);
                    }
                }
                None
            }
            Strategy::NumberLike(selectors) => {
                for selector in selectors.iter() {
                    let texts = match session.query_texts(selector, wait).await {
                        Ok(texts) => texts,
                        Err(e) => {
                            debug!("Alt selector {} failed: {}", selector, e);
                            continue;
                        }
                    };

                    let values: Vec<u64> = texts
                        .iter()
                        .flat_map(|t| numbers::number_tokens(t))
                        .collect();
                    if let Some(stats) = Stats::from_positional(&values) {
                        debug!("Alt selector {} matched", selector);
                        return Some(stats);
                    }
                }
                None
            }
            Strategy::PageText => match session.content().await {
                Ok(content) => Stats::from_positional(&numbers::page_numbers(&content)),
                Err(e) => {
                    debug!("Text pattern extraction failed: {}", e);
                    None
                }
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatExtractor {
    strategies: Vec<Strategy>,
    warmup: Duration,
    selector_wait: Duration,
}

impl StatExtractor {
    pub fn new(warmup: Duration, selector_wait: Duration) -> Self {
        Self {
            strategies: vec![
                Strategy::StatCards(STAT_CARD_SELECTORS),
                Strategy::NumberLike(NUMBER_LIKE_SELECTORS),
                Strategy::PageText,
            ],
            warmup,
            selector_wait,
        }
    }

    /// Runs each strategy in order and returns the first complete result.
    pub async fn extract<S: BrowserSession>(&self, session: &S) -> Option<Stats> {
        if !self.warmup.is_zero() {
            sleep(self.warmup).await;
        }

        for strategy in &self.strategies {
            if let Some(stats) = strategy.run(session, self.selector_wait).await {
                info!("Extracted {:?} using {}", stats, strategy.name());
                return Some(stats);
            }
            debug!("Strategy '{}' found nothing", strategy.name());
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::browser::snapshot::HtmlSnapshot;

    fn extractor() -> StatExtractor {
        StatExtractor::new(Duration::ZERO, Duration::ZERO)
    }

    #[tokio::test]
    async fn stat_cards_are_assigned_in_page_order() {
        let page = HtmlSnapshot::new(
            r#"<div class="gap-6">
                <div><div class="text-2xl">1,234</div></div>
                <div><div class="text-2xl">56</div></div>
                <div><div class="text-2xl">789</div></div>
                <div><div class="text-2xl">10</div></div>
            </div>"#,
        );

        let stats = extractor().extract(&page).await.unwrap();
        assert_eq!(
            stats,
            Stats {
                ai_agents: 1234,
                submolts: 56,
                posts: 789,
                comments: 10
            }
        );
    }

    #[tokio::test]
    async fn later_stat_card_locators_are_tried() {
        let page = HtmlSnapshot::new(
            r#"<div class="stats-grid">
                <span class="stat-value">4</span>
                <span class="stat-value">3</span>
                <span class="stat-value">2</span>
                <span class="stat-value">1</span>
            </div>"#,
        );

        let stats = extractor().extract(&page).await.unwrap();
        assert_eq!(stats.ai_agents, 4);
        assert_eq!(stats.comments, 1);
    }

    #[tokio::test]
    async fn too_few_cards_fall_through_to_number_like_elements() {
        let page = HtmlSnapshot::new(
            r#"<div class="stat-card"><div class="text-2xl">7</div></div>
               <div class="font-bold">Agents 1,500 / Submolts 40</div>
               <div class="font-bold">Posts 9,001 and 12 comments</div>"#,
        );

        let stats = extractor().extract(&page).await.unwrap();
        assert_eq!(
            stats,
            Stats {
                ai_agents: 1500,
                submolts: 40,
                posts: 9001,
                comments: 12
            }
        );
    }

    #[tokio::test]
    async fn cards_without_digits_do_not_count() {
        let page = HtmlSnapshot::new(
            r#"<div class="stat-item"><p class="value">1</p></div>
               <div class="stat-item"><p class="value">n/a</p></div>
               <div class="stat-item"><p class="value">3</p></div>
               <div class="stat-item"><p class="value">4</p></div>"#,
        );

        assert_eq!(extractor().extract(&page).await, None);
    }

    #[tokio::test]
    async fn page_text_is_the_last_resort() {
        let page = HtmlSnapshot::new(
            r#"<script>window.__STATS__ = {"ai_agents_count": 321, "submolts_count": 45,
               "posts_count": 6789, "comments_count": 12345}</script>"#,
        );

        let stats = extractor().extract(&page).await.unwrap();
        assert_eq!(
            stats,
            Stats {
                ai_agents: 321,
                submolts: 45,
                posts: 6789,
                comments: 12345
            }
        );
    }

    #[tokio::test]
    async fn nothing_found_yields_none() {
        let page = HtmlSnapshot::new("<html><body><p>Loading…</p></body></html>");
        assert_eq!(extractor().extract(&page).await, None);
    }
}
