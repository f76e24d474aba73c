//! Candidate extraction from raw social-evidence text
//!
//! Each matcher is independently swappable. Matchers return candidate names
//! with a type guess and a confidence hint; they never decide trust.

use regex::Regex;

use crate::domain::{ActivityKind, SeasonalWindow};
use crate::providers::RawPost;

/// A candidate pulled out of one post by one matcher
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedCandidate {
    pub name: String,
    pub kind: ActivityKind,
    /// Matcher's own confidence in this being a real place/activity name
    pub confidence_hint: f64,
    /// Seasonal window detected in the surrounding text, if any
    pub season: Option<SeasonalWindow>,
}

/// A pattern matcher that extracts candidate names from a post
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, post: &RawPost) -> Vec<ExtractedCandidate>;
}

/// The standard matcher set
pub fn default_extractors() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(RecommendationMatcher::new()),
        Box::new(WorthItMatcher::new()),
        Box::new(ListItemMatcher::new()),
    ]
}

// Proper-noun-ish phrase: capitalized words, allowing connectives
const NAME_PATTERN: &str = r"([A-Z][\w'&-]*(?:\s+(?:[A-Z][\w'&-]*|de|del|la|el|of|the)){0,5})";

/// Matches recommendation phrasing: "check out X", "I recommend X", ...
pub struct RecommendationMatcher {
    re: Regex,
}

impl RecommendationMatcher {
    pub fn new() -> Self {
        let re = Regex::new(&format!(
            r"(?i:recommend|check out|don't miss|do not miss|must[- ]see|must[- ]do|head to|loved)\s+(?i:the\s+)?{}",
            NAME_PATTERN
        ))
        .expect("recommendation pattern is valid");
        Self { re }
    }
}

impl Default for RecommendationMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for RecommendationMatcher {
    fn name(&self) -> &'static str {
        "recommendation"
    }

    fn extract(&self, post: &RawPost) -> Vec<ExtractedCandidate> {
        extract_with(&self.re, post, 0.6)
    }
}

/// Matches "X is (totally) worth it/a visit" phrasing
pub struct WorthItMatcher {
    re: Regex,
}

impl WorthItMatcher {
    pub fn new() -> Self {
        let re = Regex::new(&format!(
            r"{}\s+(?:is|was|are)\s+(?:totally\s+|definitely\s+|so\s+)?worth",
            NAME_PATTERN
        ))
        .expect("worth-it pattern is valid");
        Self { re }
    }
}

impl Default for WorthItMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for WorthItMatcher {
    fn name(&self) -> &'static str {
        "worth_it"
    }

    fn extract(&self, post: &RawPost) -> Vec<ExtractedCandidate> {
        extract_with(&self.re, post, 0.5)
    }
}

/// Matches list items: "- X" or "3. X" at line start
pub struct ListItemMatcher {
    re: Regex,
}

impl ListItemMatcher {
    pub fn new() -> Self {
        let re = Regex::new(&format!(r"(?m)^\s*(?:[-*]|\d+[.)])\s+{}", NAME_PATTERN))
            .expect("list-item pattern is valid");
        Self { re }
    }
}

impl Default for ListItemMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for ListItemMatcher {
    fn name(&self) -> &'static str {
        "list_item"
    }

    fn extract(&self, post: &RawPost) -> Vec<ExtractedCandidate> {
        extract_with(&self.re, post, 0.4)
    }
}

fn extract_with(re: &Regex, post: &RawPost, confidence_hint: f64) -> Vec<ExtractedCandidate> {
    let text = format!("{}\n{}", post.title, post.body);
    let season = detect_season(&text);
    re.captures_iter(&text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| is_plausible_name(name))
        .map(|name| {
            let kind = classify_kind(&name, &text);
            ExtractedCandidate {
                name,
                kind,
                confidence_hint,
                season,
            }
        })
        .collect()
}

/// False-positive filters: bad length, no proper-noun shape, or
/// first/second-person sentence fragments are not places.
pub fn is_plausible_name(name: &str) -> bool {
    let len = name.chars().count();
    if !(3..=60).contains(&len) {
        return false;
    }
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.is_empty() || words.len() > 6 {
        return false;
    }
    // Must start with a proper-noun shape
    let first = words[0];
    if !first.chars().next().is_some_and(|c| c.is_uppercase()) {
        return false;
    }
    // First/second-person fragments are sentences, not names
    const PRONOUNS: [&str; 9] = ["i", "we", "you", "my", "our", "your", "me", "us", "i'm"];
    if words.iter().any(|w| PRONOUNS.contains(&w.to_lowercase().as_str())) {
        return false;
    }
    true
}

/// Guess an activity kind from the name and surrounding text
fn classify_kind(name: &str, context: &str) -> ActivityKind {
    let haystack = format!("{} {}", name, context).to_lowercase();
    const HINTS: [(&str, ActivityKind); 14] = [
        ("surf", ActivityKind::Surf),
        ("hike", ActivityKind::Hike),
        ("trail", ActivityKind::Hike),
        ("beach", ActivityKind::Beach),
        ("snorkel", ActivityKind::Beach),
        ("taco", ActivityKind::Food),
        ("restaurant", ActivityKind::Food),
        ("museum", ActivityKind::Culture),
        ("mission", ActivityKind::Culture),
        ("gallery", ActivityKind::Culture),
        ("whale", ActivityKind::Wildlife),
        ("turtle", ActivityKind::Wildlife),
        ("market", ActivityKind::Shopping),
        ("yoga", ActivityKind::Wellness),
    ];
    for (needle, kind) in HINTS {
        if haystack.contains(needle) {
            return kind;
        }
    }
    ActivityKind::Other
}

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september", "october", "november",
    "december",
];

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    MONTHS
        .iter()
        .position(|m| m.starts_with(&lower) || lower.starts_with(&m[..3]))
        .map(|i| i as u32 + 1)
}

/// Detect a "November to March" style availability window in post text
fn detect_season(text: &str) -> Option<SeasonalWindow> {
    let re = Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december)\s*(?:to|through|until|-|–)\s*(january|february|march|april|may|june|july|august|september|october|november|december)\b",
    )
    .expect("season pattern is valid");
    let caps = re.captures(text)?;
    let start_month = month_number(caps.get(1)?.as_str())?;
    let end_month = month_number(caps.get(2)?.as_str())?;
    Some(SeasonalWindow { start_month, end_month })
}
