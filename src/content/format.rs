//! 展示辅助：日期、语言配色、项目类别、截断

use chrono::{DateTime, NaiveDate};

/// 语言 → GitHub 配色
const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#3178c6"),
    ("Python", "#3572A5"),
    ("C++", "#f34b7d"),
    ("C", "#555555"),
    ("HTML", "#e34c26"),
    ("CSS", "#563d7c"),
    ("Java", "#b07219"),
    ("Go", "#00ADD8"),
    ("Rust", "#dea584"),
    ("Ruby", "#701516"),
];

const DEFAULT_LANGUAGE_COLOR: &str = "#6366f1";

const CATEGORY_LABELS: &[(&str, &str)] = &[
    ("full_stack", "Full Stack"),
    ("backend", "Backend"),
    ("frontend", "Frontend"),
    ("mobile", "Mobile"),
    ("ml_ai", "ML / AI"),
    ("iot", "IoT"),
    ("dsa", "DSA"),
    ("personal", "Personal"),
];

/// None → "Present"；RFC 3339 或 YYYY-MM-DD → "Jan 2024"；无法解析时原样返回
pub fn format_date(date: Option<&str>) -> String {
    let Some(raw) = date.map(str::trim).filter(|s| !s.is_empty()) else {
        return "Present".to_string();
    };
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .or_else(|_| {
            // 后端 datetime 不带时区：2024-05-01T10:00:00.123456
            raw.get(..10)
                .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
                .unwrap_or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        });
    match parsed {
        Ok(d) => d.format("%b %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn language_color(language: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_LANGUAGE_COLOR)
}

/// 把 "#rrggbb" 解析为 RGB 三元组
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

pub fn category_label(category: Option<&str>) -> &'static str {
    let category = category.unwrap_or_default();
    CATEGORY_LABELS
        .iter()
        .find(|(key, _)| *key == category)
        .map(|(_, label)| *label)
        .unwrap_or("Project")
}

/// 按字符截断，超长时以 "..." 结尾，结果不超过 max_len 个字符
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    if max_len < 3 {
        return text.chars().take(max_len).collect();
    }
    let keep = max_len.saturating_sub(3);
    let head: String = text.chars().take(keep).collect();
    format!("{head}...")
}
