use once_cell::sync::Lazy;
use regex::Regex;

/// Values at or above this are not counters we expect on the page.
pub const PLAUSIBLE_LIMIT: u64 = 1_000_000;

static NUMBER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,3}(?:,\d{3})*(?:\.\d+)?|\d+").expect("valid number pattern"));

static PAGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#""ai_agents_count":\s*(\d+)"#,
        r#""submolts_count":\s*(\d+)"#,
        r#""posts_count":\s*(\d+)"#,
        r#""comments_count":\s*(\d+)"#,
        r#"ai_agents["']?\s*[:=]\s*["']?(\d+)"#,
        r#"submolts["']?\s*[:=]\s*["']?(\d+)"#,
        r#"posts["']?\s*[:=]\s*["']?(\d+)"#,
        r#"comments["']?\s*[:=]\s*["']?(\d+)"#,
        r">\s*(\d+)\s*<[^>]*>AI Agents?",
        r">\s*(\d+)\s*<[^>]*>Submolts?",
        r">\s*(\d+)\s*<[^>]*>Posts?",
        r">\s*(\d+)\s*<[^>]*>Comments?",
        r"(\d+)\D*s*(?:ai\s*agents?)",
        r"(\d+)\D*s*(?:submolts?)",
        r"(\d+)\D*s*(?:posts?)",
        r"(\d+)\D*s*(?:comments?)",
    ]
    .iter()
    .map(|pattern| Regex::new(&format!("(?i){pattern}")).expect("valid page pattern"))
    .collect()
});

static BARE_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""(\d{3,})"|>(\d{3,})<"#).expect("valid digits pattern"));

fn parse_digits(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Reads a stat card such as `"1,234"` or `"1,234 agents"`. Everything but
/// digits is discarded, so `"v2 5"` reads as 25.
pub fn card_value(text: &str) -> Option<u64> {
    let digits: String = text.trim().chars().filter(char::is_ascii_digit).collect();
    parse_digits(&digits)
}

/// Every number-looking token in `text`, with separators and decimal points
/// dropped (`"1.5K"` reads as 15).
pub fn number_tokens(text: &str) -> Vec<u64> {
    let compact = text.replace(' ', "");
    NUMBER_TOKEN
        .find_iter(&compact)
        .filter_map(|m| parse_digits(&m.as_str().replace([',', '.'], "")))
        .collect()
}

/// Numbers found in raw page markup, in pattern order, limited to
/// plausible counter values.
pub fn page_numbers(content: &str) -> Vec<u64> {
    let mut found = Vec::new();

    for pattern in PAGE_PATTERNS.iter() {
        for caps in pattern.captures_iter(content) {
            if let Some(value) = caps.get(1).and_then(|m| parse_digits(m.as_str())) {
                found.push(value);
            }
        }
    }

    for caps in BARE_DIGITS.captures_iter(content) {
        for group in [caps.get(1), caps.get(2)].into_iter().flatten() {
            if let Some(value) = parse_digits(group.as_str()) {
                found.push(value);
            }
        }
    }

    found.retain(|&value| value < PLAUSIBLE_LIMIT);
    found
}
