//! Content document model.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};

use crate::frontmatter::{FieldValue, FrontMatter, split_front_matter};

/// Reading speed used to estimate the read-time label.
const WORDS_PER_MINUTE: usize = 200;

const READ_TIME_KEYS: &[&str] = &["read_time", "readTime", "read-time"];
const IMAGE_KEYS: &[&str] = &["image", "cover"];

/// A content document: front-matter metadata plus Markdown body.
///
/// Built fresh from the backing text on every lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// URL-safe identifier.
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    /// Date as written in the front matter.
    pub date: Option<String>,
    /// Parsed publication date, when `date` is recognizable.
    pub published: Option<NaiveDate>,
    pub author: Option<String>,
    /// Cover image path or URL.
    pub image: Option<String>,
    /// Read-time label, e.g. `"5 min read"`.
    pub read_time: String,
    pub tags: Vec<String>,
    front_matter: FrontMatter,
}

impl Document {
    /// Build a document from raw file text.
    ///
    /// `stem` stands in for the slug when the front matter has none.
    #[must_use]
    pub fn parse(stem: &str, raw: &str) -> Self {
        let front_matter = split_front_matter(raw);

        let slug = front_matter
            .text(&["slug"])
            .map(|s| s.trim_matches('/'))
            .filter(|s| !s.is_empty())
            .unwrap_or(stem)
            .to_owned();
        let title = front_matter
            .text(&["title"])
            .map_or_else(|| slug.clone(), str::to_owned);
        let date = front_matter.text(&["date"]).map(str::to_owned);
        let published = date.as_deref().and_then(parse_date);
        let read_time = front_matter
            .text(READ_TIME_KEYS)
            .map_or_else(|| estimate_read_time(front_matter.body()), str::to_owned);
        let tags = front_matter
            .get("tags")
            .map(|value| value.texts().into_iter().map(str::to_owned).collect())
            .unwrap_or_default();

        Self {
            description: front_matter.text(&["description"]).map(str::to_owned),
            author: front_matter.text(&["author"]).map(str::to_owned),
            image: front_matter.text(IMAGE_KEYS).map(str::to_owned),
            slug,
            title,
            date,
            published,
            read_time,
            tags,
            front_matter,
        }
    }

    /// Markdown body without the metadata block.
    #[must_use]
    pub fn body(&self) -> &str {
        self.front_matter.body()
    }

    /// Decoded front matter, including keys without a dedicated field.
    #[must_use]
    pub fn front_matter(&self) -> &FrontMatter {
        &self.front_matter
    }

    /// Raw value of an arbitrary front-matter key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.front_matter.get(key)
    }

    /// All front-matter fields.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        self.front_matter.fields()
    }

    /// Human-readable date: `January 5, 2024` when parsed, raw text otherwise.
    #[must_use]
    pub fn display_date(&self) -> Option<String> {
        match self.published {
            Some(date) => Some(date.format("%B %-d, %Y").to_string()),
            None => self.date.clone(),
        }
    }
}

/// Parse the date formats commonly found in front matter.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            text.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
        .or_else(|| NaiveDate::parse_from_str(text, "%B %d, %Y").ok())
        .or_else(|| NaiveDate::parse_from_str(text, "%b %d, %Y").ok())
}

/// Estimate a read-time label from the body word count.
fn estimate_read_time(body: &str) -> String {
    let words = body.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}
