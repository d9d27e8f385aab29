// src/utils.rs
use chrono::{Duration, NaiveDate};

/// Collapse whitespace runs and drop blank lines from scraped text
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Salary figures pulled out of a free-text salary chip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalaryRange {
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub currency: Option<String>,
}

/// Parse salary text such as "$100,000 - $120,000 a year" or "Up to £40K".
///
/// A bare `$` resolves to `dollar_currency`, since it is ambiguous across
/// countries. Text without any figure yields an empty range.
pub fn parse_salary_range(text: &str, dollar_currency: &str) -> SalaryRange {
    let amounts = extract_amounts(text);
    if amounts.is_empty() {
        return SalaryRange::default();
    }

    let currency = detect_currency(text, dollar_currency);
    let lower = text.to_lowercase();

    let (min_amount, max_amount) = match amounts.as_slice() {
        [single] if lower.contains("up to") => (None, Some(*single)),
        [single] if lower.contains("from") => (Some(*single), None),
        [single] => (Some(*single), Some(*single)),
        [first, second, ..] => (Some(first.min(*second)), Some(first.max(*second))),
        [] => (None, None),
    };

    SalaryRange {
        min_amount,
        max_amount,
        currency,
    }
}

fn detect_currency(text: &str, dollar_currency: &str) -> Option<String> {
    let explicit = ["USD", "CAD", "AUD", "GBP", "EUR", "INR"];
    if let Some(code) = explicit.iter().find(|code| text.contains(*code)) {
        return Some(code.to_string());
    }

    if text.contains('£') {
        Some("GBP".to_string())
    } else if text.contains('€') {
        Some("EUR".to_string())
    } else if text.contains('₹') {
        Some("INR".to_string())
    } else if text.contains('$') {
        Some(dollar_currency.to_string())
    } else {
        None
    }
}

fn extract_amounts(text: &str) -> Vec<f64> {
    let mut amounts = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == ',' || chars[i] == '.')
        {
            i += 1;
        }

        let raw: String = chars[start..i]
            .iter()
            .filter(|c| **c != ',')
            .collect::<String>()
            .trim_end_matches('.')
            .to_string();

        if let Ok(mut value) = raw.parse::<f64>() {
            if i < chars.len() && (chars[i] == 'K' || chars[i] == 'k') {
                value *= 1000.0;
                i += 1;
            }
            amounts.push(value);
        }
    }

    amounts
}

/// Convert board phrasing like "Posted 3 days ago" into a calendar date
pub fn parse_relative_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lower = text.to_lowercase();

    if lower.contains("just posted") || lower.contains("today") || lower.contains("hour") {
        return Some(today);
    }

    if !lower.contains("day") {
        return None;
    }

    let days: i64 = lower
        .split(|c: char| !c.is_ascii_digit())
        .find(|chunk| !chunk.is_empty())?
        .parse()
        .ok()?;

    today.checked_sub_signed(Duration::try_days(days)?)
}

/// Map board job-type labels onto the short forms used in listings
pub fn normalize_job_type(label: &str) -> Option<String> {
    let compact: String = label
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();

    let job_type = match compact.as_str() {
        "fulltime" => "fulltime",
        "parttime" => "parttime",
        "contract" | "contractor" => "contract",
        "temporary" | "temp" => "temporary",
        "internship" | "intern" => "internship",
        _ => return None,
    };

    Some(job_type.to_string())
}
