//! Offline resume draft used when the AI call fails or returns something unusable.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::resume::{
    Experience, Resume, ThemeConfig, DEFAULT_COLOR, DEFAULT_PAPER_SIZE, DEFAULT_TEMPLATE,
};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email pattern is valid")
});

// 11-digit mainland mobile number not embedded in a longer digit run.
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9])(1[3-9][0-9]{9})(?:[^0-9]|$)").expect("phone pattern is valid")
});

const DEFAULT_TITLE: &str = "Engineer";

/// Role keywords, checked in order; a later match overrides an earlier one.
const ROLE_KEYWORDS: &[(&str, &[&str])] = &[
    ("Backend Engineer", &["后端", "backend", "back-end"]),
    ("Frontend Engineer", &["前端", "frontend", "front-end"]),
    ("Product Manager", &["产品", "product manager"]),
];

/// Builds a minimal resume from free text: the text becomes the summary and the
/// description of a single experience entry dated `today` (`YYYY-MM`).
pub fn resume_from_text(input: &str, today: NaiveDate) -> Resume {
    let email = EMAIL
        .find(input)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let phone = PHONE
        .captures(input)
        .map(|c| c[1].to_string())
        .unwrap_or_default();

    Resume {
        email,
        phone,
        summary: input.trim().to_string(),
        experience: vec![Experience {
            title: guess_title(input).to_string(),
            company: String::new(),
            date: today.format("%Y-%m").to_string(),
            description: input.to_string(),
        }],
        education: Vec::new(),
        config: ThemeConfig {
            template: DEFAULT_TEMPLATE.to_string(),
            color: DEFAULT_COLOR.to_string(),
            paper_size: DEFAULT_PAPER_SIZE.to_string(),
            ..ThemeConfig::default()
        },
        ..Resume::default()
    }
}

fn guess_title(input: &str) -> &'static str {
    let lowered = input.to_lowercase();
    ROLE_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(title, _)| *title)
        .last()
        .unwrap_or(DEFAULT_TITLE)
}
