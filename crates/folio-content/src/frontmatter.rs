//! Front-matter splitting for content files.
//!
//! A content file may open with a fenced metadata block:
//!
//! ```text
//! ---
//! title: Hello
//! slug: hello
//! ---
//! ## Section One
//! ```
//!
//! `---` fences hold YAML (closed by `---` or `...`), `+++` fences hold TOML.
//! Anything else, including a block that fails to decode, leaves the whole
//! text as body with an empty field mapping.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// Metadata block syntax.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `---` fenced YAML.
    Yaml,
    /// `+++` fenced TOML.
    Toml,
}

/// A front-matter value.
///
/// Scalars of every type are kept as text; only lists and nested tables
/// keep structure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Text content, if this is a scalar.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Scalar items of a list. A bare scalar counts as a one-item list.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Self::Text(text) => vec![text.as_str()],
            Self::List(items) => items.iter().filter_map(Self::as_text).collect(),
            Self::Map(_) => Vec::new(),
        }
    }
}

impl From<serde_yaml::Value> for FieldValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        match value {
            Value::Null => Self::Text(String::new()),
            Value::Bool(b) => Self::Text(b.to_string()),
            Value::Number(n) => Self::Text(n.to_string()),
            Value::String(s) => Self::Text(s),
            Value::Sequence(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Mapping(mapping) => Self::Map(yaml_mapping(mapping)),
            Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

impl From<toml::Value> for FieldValue {
    fn from(value: toml::Value) -> Self {
        use toml::Value;

        match value {
            Value::String(s) => Self::Text(s),
            Value::Integer(i) => Self::Text(i.to_string()),
            Value::Float(f) => Self::Text(f.to_string()),
            Value::Boolean(b) => Self::Text(b.to_string()),
            Value::Datetime(dt) => Self::Text(dt.to_string()),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Table(table) => Self::Map(
                table
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Result of splitting a content file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: BTreeMap<String, FieldValue>,
    body: String,
    format: Option<Format>,
}

impl FrontMatter {
    /// No metadata; the whole text is body.
    fn plain(text: &str) -> Self {
        Self {
            fields: BTreeMap::new(),
            body: text.to_owned(),
            format: None,
        }
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Non-blank text value of the first present key among `keys`.
    #[must_use]
    pub fn text(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.fields.get(*key)?.as_text())
            .map(str::trim)
            .find(|text| !text.is_empty())
    }

    /// All decoded fields.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Document body following the metadata block.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Syntax of the metadata block, `None` when the text had none.
    #[must_use]
    pub fn format(&self) -> Option<Format> {
        self.format
    }

    /// Whether no fields were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize the fields back to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        if self.fields.is_empty() {
            return Ok(String::new());
        }
        serde_yaml::to_string(&self.fields)
    }
}

/// Split raw document text into front matter and body.
///
/// Never fails: a missing, unterminated, or undecodable block yields an
/// empty mapping and the original text as body.
#[must_use]
pub fn split_front_matter(raw: &str) -> FrontMatter {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let Some((format, block, body)) = find_block(text) else {
        return FrontMatter::plain(raw);
    };

    match decode(format, block) {
        Some(fields) => FrontMatter {
            fields,
            body: body.to_owned(),
            format: Some(format),
        },
        None => {
            tracing::debug!(?format, "Malformed front matter, using whole text as body");
            FrontMatter::plain(raw)
        }
    }
}

/// Locate the fenced block. Returns (format, block, body).
fn find_block(text: &str) -> Option<(Format, &str, &str)> {
    let (first, rest) = text.split_once('\n')?;
    let format = match first.trim_end() {
        "---" => Format::Yaml,
        "+++" => Format::Toml,
        _ => return None,
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let closes = match format {
            Format::Yaml => matches!(line.trim_end(), "---" | "..."),
            Format::Toml => line.trim_end() == "+++",
        };
        if closes {
            return Some((format, &rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

fn decode(format: Format, block: &str) -> Option<BTreeMap<String, FieldValue>> {
    if block.trim().is_empty() {
        return Some(BTreeMap::new());
    }

    let block = dedupe_keys(format, block);
    match format {
        Format::Yaml => match serde_yaml::from_str(&block).ok()? {
            serde_yaml::Value::Mapping(mapping) => Some(yaml_mapping(mapping)),
            serde_yaml::Value::Null => Some(BTreeMap::new()),
            _ => None,
        },
        Format::Toml => {
            let table: toml::Table = toml::from_str(&block).ok()?;
            Some(
                table
                    .into_iter()
                    .map(|(key, value)| (key, FieldValue::from(value)))
                    .collect(),
            )
        }
    }
}

fn yaml_mapping(mapping: serde_yaml::Mapping) -> BTreeMap<String, FieldValue> {
    mapping
        .into_iter()
        .filter_map(|(key, value)| {
            let key = match key {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key, FieldValue::from(value)))
        })
        .collect()
}

/// Drop earlier occurrences of repeated top-level keys.
///
/// Both decoders reject duplicate keys outright, so the block is rewritten
/// to keep only the last entry for each key. Continuation lines (nested
/// values, comments) travel with the entry above them.
fn dedupe_keys(format: Format, block: &str) -> Cow<'_, str> {
    let mut entries: Vec<(Option<&str>, String)> = Vec::new();
    let mut in_tables = false;

    for line in block.split_inclusive('\n') {
        if format == Format::Toml && line.trim_start().starts_with('[') {
            in_tables = true;
        }
        let key = if in_tables {
            None
        } else {
            top_level_key(format, line)
        };
        if key.is_none()
            && let Some(last) = entries.last_mut()
        {
            last.1.push_str(line);
        } else {
            entries.push((key, line.to_owned()));
        }
    }

    let mut last_index: HashMap<&str, usize> = HashMap::new();
    for (index, (key, _)) in entries.iter().enumerate() {
        if let Some(key) = key {
            last_index.insert(*key, index);
        }
    }

    let keyed = entries.iter().filter(|(key, _)| key.is_some()).count();
    if keyed == last_index.len() {
        return Cow::Borrowed(block);
    }

    Cow::Owned(
        entries
            .iter()
            .enumerate()
            .filter(|(index, (key, _))| key.is_none_or(|k| last_index[k] == *index))
            .map(|(_, (_, text))| text.as_str())
            .collect(),
    )
}

fn top_level_key(format: Format, line: &str) -> Option<&str> {
    let first = line.chars().next()?;
    if first.is_whitespace() || matches!(first, '#' | '-' | '[' | '{') {
        return None;
    }

    let separator = match format {
        Format::Yaml => ':',
        Format::Toml => '=',
    };
    let (key, rest) = if matches!(first, '"' | '\'') {
        // Quoted keys may contain the separator.
        let close = line[1..].find(first)? + 1;
        let rest = line[close + 1..]
            .trim_start_matches([' ', '\t'])
            .strip_prefix(separator)?;
        (&line[1..close], rest)
    } else {
        let (key, rest) = line.split_once(separator)?;
        (key.trim(), rest)
    };
    if format == Format::Yaml && !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
        return None;
    }

    (!key.is_empty()).then_some(key)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use super::*;

    fn text(value: &str) -> FieldValue {
        FieldValue::Text(value.to_owned())
    }

    #[test]
    fn test_yaml_block() {
        let fm = split_front_matter("---\ntitle: \"Hello\"\nslug: hello\n---\n## Section One\nSome text");
        assert_eq!(fm.format(), Some(Format::Yaml));
        assert_eq!(fm.get("title"), Some(&text("Hello")));
        assert_eq!(fm.get("slug"), Some(&text("hello")));
        assert_eq!(fm.body(), "## Section One\nSome text");
    }

    #[test]
    fn test_yaml_block_closed_by_dots() {
        let fm = split_front_matter("---\ntitle: Dots\n...\nBody");
        assert_eq!(fm.text(&["title"]), Some("Dots"));
        assert_eq!(fm.body(), "Body");
    }

    #[test]
    fn test_toml_block() {
        let fm = split_front_matter("+++\ntitle = \"Toml\"\ndraft = false\ntags = [\"a\", \"b\"]\n+++\nBody");
        assert_eq!(fm.format(), Some(Format::Toml));
        assert_eq!(fm.text(&["title"]), Some("Toml"));
        assert_eq!(fm.get("draft"), Some(&text("false")));
        assert_eq!(fm.get("tags"), Some(&FieldValue::List(vec![text("a"), text("b")])));
        assert_eq!(fm.body(), "Body");
    }

    #[test]
    fn test_crlf_line_endings() {
        let fm = split_front_matter("---\r\ntitle: Windows\r\n---\r\nBody\r\n");
        assert_eq!(fm.text(&["title"]), Some("Windows"));
        assert_eq!(fm.body(), "Body\r\n");
    }

    #[test]
    fn test_bom_is_skipped() {
        let fm = split_front_matter("\u{feff}---\ntitle: Bom\n---\nBody");
        assert_eq!(fm.text(&["title"]), Some("Bom"));
        assert_eq!(fm.body(), "Body");
    }

    #[test]
    fn test_no_front_matter() {
        let raw = "# Just markdown\n\nNo metadata.";
        let fm = split_front_matter(raw);
        assert!(fm.is_empty());
        assert_eq!(fm.format(), None);
        assert_eq!(fm.body(), raw);
    }

    #[test]
    fn test_delimiter_must_be_first_line() {
        let raw = "\n---\ntitle: Late\n---\nBody";
        let fm = split_front_matter(raw);
        assert!(fm.is_empty());
        assert_eq!(fm.body(), raw);
    }

    #[test]
    fn test_unterminated_block_is_body() {
        let raw = "---\ntitle: Open\nno closing fence";
        let fm = split_front_matter(raw);
        assert!(fm.is_empty());
        assert_eq!(fm.body(), raw);
    }

    #[test]
    fn test_malformed_yaml_is_body() {
        let raw = "---\ntitle: [unclosed\n---\nBody";
        let fm = split_front_matter(raw);
        assert!(fm.is_empty());
        assert_eq!(fm.format(), None);
        assert_eq!(fm.body(), raw);
    }

    #[test]
    fn test_non_mapping_yaml_is_body() {
        let raw = "---\n- a\n- b\n---\nBody";
        let fm = split_front_matter(raw);
        assert!(fm.is_empty());
        assert_eq!(fm.body(), raw);
    }

    #[test]
    fn test_malformed_toml_is_body() {
        let raw = "+++\ntitle = \n+++\nBody";
        let fm = split_front_matter(raw);
        assert!(fm.is_empty());
        assert_eq!(fm.body(), raw);
    }

    #[test]
    fn test_empty_block() {
        let fm = split_front_matter("---\n---\nBody");
        assert!(fm.is_empty());
        assert_eq!(fm.format(), Some(Format::Yaml));
        assert_eq!(fm.body(), "Body");
    }

    #[test]
    fn test_duplicate_yaml_keys_last_wins() {
        let fm = split_front_matter("---\ntitle: First\nauthor: Sam\ntitle: Second\n---\nBody");
        assert_eq!(fm.text(&["title"]), Some("Second"));
        assert_eq!(fm.text(&["author"]), Some("Sam"));
    }

    #[test]
    fn test_duplicate_yaml_keys_with_nested_values() {
        let fm = split_front_matter(
            "---\ntags:\n  - old\ntitle: T\ntags:\n  - new\n  - newer\n---\nBody",
        );
        assert_eq!(fm.get("tags").unwrap().texts(), vec!["new", "newer"]);
        assert_eq!(fm.text(&["title"]), Some("T"));
    }

    #[test]
    fn test_duplicate_toml_keys_last_wins() {
        let fm = split_front_matter("+++\ntitle = \"a\"\ntitle = \"b\"\n[extra]\nx = 1\n+++\n");
        assert_eq!(fm.text(&["title"]), Some("b"));
        assert!(matches!(fm.get("extra"), Some(FieldValue::Map(_))));
    }

    #[test]
    fn test_scalars_become_text() {
        let fm = split_front_matter("---\ncount: 3\nratio: 0.5\nfeatured: true\nempty:\n---\n");
        assert_eq!(fm.get("count"), Some(&text("3")));
        assert_eq!(fm.get("ratio"), Some(&text("0.5")));
        assert_eq!(fm.get("featured"), Some(&text("true")));
        assert_eq!(fm.get("empty"), Some(&text("")));
    }

    #[test]
    fn test_nested_mapping_kept() {
        let fm = split_front_matter("---\nseo:\n  keywords: rust\n---\n");
        let Some(FieldValue::Map(seo)) = fm.get("seo") else {
            panic!("expected nested map");
        };
        assert_eq!(seo.get("keywords"), Some(&text("rust")));
    }

    #[test]
    fn test_text_skips_blank_and_uses_aliases() {
        let fm = split_front_matter("---\nread_time: \"  \"\nreadTime: 4 min read\n---\n");
        assert_eq!(fm.text(&["read_time", "readTime"]), Some("4 min read"));
        assert_eq!(fm.text(&["missing"]), None);
    }

    #[test]
    fn test_reserialized_key_set_matches() {
        let raw = "---\ntitle: Hello\nslug: hello\ndate: 2024-03-01\nauthor: Sam\nimage: /img/a.png\nreadTime: 3 min read\ntags: [rust, web]\n---\nBody";
        let fm = split_front_matter(raw);

        let yaml = fm.to_yaml().unwrap();
        let reparsed = split_front_matter(&format!("---\n{yaml}---\n"));

        let original: BTreeSet<_> = fm.fields().keys().collect();
        let roundtrip: BTreeSet<_> = reparsed.fields().keys().collect();
        assert_eq!(original, roundtrip);
        assert_eq!(original.len(), 7);
    }

    #[test]
    fn test_to_yaml_empty() {
        let fm = split_front_matter("Body only");
        assert_eq!(fm.to_yaml().unwrap(), "");
    }

    #[test]
    fn test_dedupe_borrows_when_unique() {
        let block = "a: 1\nb: 2\n";
        assert!(matches!(dedupe_keys(Format::Yaml, block), Cow::Borrowed(_)));
    }

    #[test]
    fn test_top_level_key_detection() {
        assert_eq!(top_level_key(Format::Yaml, "title: x\n"), Some("title"));
        assert_eq!(top_level_key(Format::Yaml, "\"quoted\": x\n"), Some("quoted"));
        assert_eq!(top_level_key(Format::Yaml, "  nested: x\n"), None);
        assert_eq!(top_level_key(Format::Yaml, "- item\n"), None);
        assert_eq!(top_level_key(Format::Yaml, "url:http\n"), None);
        assert_eq!(top_level_key(Format::Yaml, "\"a:b\": x\n"), Some("a:b"));
        assert_eq!(top_level_key(Format::Yaml, "'a: b' : x\n"), Some("a: b"));
        assert_eq!(top_level_key(Format::Toml, "title = \"x\"\n"), Some("title"));
        assert_eq!(top_level_key(Format::Toml, "\"a=b\" = 1\n"), Some("a=b"));
    }

    #[test]
    fn test_quoted_key_with_colon_survives_dedupe() {
        let fm = split_front_matter("---\ntitle: one\n\"a:b\": x\ntitle: two\n---\nBody");

        assert_eq!(fm.get("a:b"), Some(&text("x")));
        assert_eq!(fm.get("title"), Some(&text("two")));
        assert_eq!(fm.body(), "Body");
    }
}
