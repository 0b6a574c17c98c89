use chrono::{DateTime, NaiveDate};

const DESCRIPTION_MAX_CHARS: usize = 160;
const WORDS_PER_MINUTE: usize = 200;

/// Derives a short description from a markdown body: the first non-blank
/// line, trimmed, capped at 160 characters with an ellipsis marker when
/// truncated. A body with no non-blank line yields an empty string.
pub fn derive_description(markdown: &str) -> String {
    let first_line = markdown.lines().map(str::trim).find(|line| !line.is_empty());

    let Some(line) = first_line else {
        return String::new();
    };

    if line.chars().count() > DESCRIPTION_MAX_CHARS {
        let head: String = line.chars().take(DESCRIPTION_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        line.to_string()
    }
}

/// Parses the date attached to a record. The source emits either a plain
/// date or a full RFC 3339 timestamp, depending on whether the editor set
/// a time of day.
pub fn parse_source_date(buf: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(buf, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(buf).ok().map(|dt| dt.date_naive())
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y. %m. %d").to_string()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Display string for the estimated reading time, assuming 200 words per
/// minute. Anything shorter than a minute still reads as one.
pub fn reading_time(words: usize) -> String {
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{} min read", minutes)
}
