use std::fmt;
use std::fmt::Formatter;

use chrono::NaiveDate;

/// Identifier of a record in the remote content database.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flat, normalized representation of one published entry.
///
/// Everything here is recomputed from the remote source on every fetch.
/// There is no local identity beyond the lifetime of a single render.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: RecordId,
    pub title: String,
    pub slug: String,
    pub cover_image: Option<String>,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub content: String,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, slug={}, title={}", self.id, self.slug, self.title)
    }
}
