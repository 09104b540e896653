//! Core types for Bookshelf

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{BookshelfError, Result};

/// A catalog entry
///
/// `id` is assigned by the remote book service; a book created locally has no
/// id until the service answers. Every other field is free text, including
/// `pages` and `year`, so partial input survives a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub country: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub language: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub link: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub pages: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: String,
}

impl Book {
    /// Returns true if both books carry the same service-assigned id
    pub fn same_id(&self, other: &Book) -> bool {
        matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

/// Accepts strings, numbers, booleans and null for a text field
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

/// Accepts an integer id, a numeric string, or null
fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("book id out of range: {}", n))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("book id is not an integer: {:?}", s))),
        other => Err(serde::de::Error::custom(format!("unexpected book id: {}", other))),
    }
}

// ============================================================================
// Query Types
// ============================================================================

/// Sort direction understood by the book service's `DIR` parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// The other direction
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(format!(
                "Invalid sort direction: '{}'. Valid options: asc, desc",
                s
            )),
        }
    }
}

/// Identifies one cache slot: the raw search text plus the sort direction
///
/// Two keys are equal only if the text matches exactly (case-sensitive,
/// untrimmed) and the direction matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub query: String,
    pub direction: SortDirection,
}

impl QueryKey {
    pub fn new(query: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            query: query.into(),
            direction,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.query, self.direction)
    }
}

// ============================================================================
// Form Types
// ============================================================================

/// Editable fields of a book, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    Author,
    Year,
    Pages,
    Language,
    Country,
    Link,
}

impl BookField {
    pub const ALL: [BookField; 7] = [
        BookField::Title,
        BookField::Author,
        BookField::Year,
        BookField::Pages,
        BookField::Language,
        BookField::Country,
        BookField::Link,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Year => "Year",
            BookField::Pages => "Pages",
            BookField::Language => "Language",
            BookField::Country => "Country",
            BookField::Link => "Link",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, BookField::Link)
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Add/edit form contents
///
/// A draft with an `id` edits an existing book; without one it creates a new
/// book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDraft {
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    pub country: String,
    pub language: String,
    pub link: String,
    pub pages: String,
    pub year: String,
}

impl BookDraft {
    /// Blank draft for creating a book
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill a draft from an existing book
    pub fn from_book(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            country: book.country.clone(),
            language: book.language.clone(),
            link: book.link.clone(),
            pages: book.pages.clone(),
            year: book.year.clone(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn field(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Year => &self.year,
            BookField::Pages => &self.pages,
            BookField::Language => &self.language,
            BookField::Country => &self.country,
            BookField::Link => &self.link,
        }
    }

    pub fn field_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
            BookField::Year => &mut self.year,
            BookField::Pages => &mut self.pages,
            BookField::Language => &mut self.language,
            BookField::Country => &mut self.country,
            BookField::Link => &mut self.link,
        }
    }

    /// Check required fields and the link format without consuming the draft
    ///
    /// Returns one message per problem, in form order.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for field in BookField::ALL {
            let value = self.field(field).trim();
            if field.is_required() && value.is_empty() {
                problems.push(format!("{} is required", field.label()));
            }
        }

        let link = self.link.trim();
        if !link.is_empty() && reqwest::Url::parse(link).is_err() {
            problems.push(format!("Link is not a valid URL: {}", link));
        }

        problems
    }

    /// Trim every field and turn the draft into the book body sent to the
    /// service
    ///
    /// # Errors
    ///
    /// Returns `BookshelfError::InvalidInput` listing every problem found by
    /// [`BookDraft::problems`].
    pub fn into_submission(self) -> Result<Book> {
        let problems = self.problems();
        if !problems.is_empty() {
            return Err(BookshelfError::InvalidInput(problems.join("; ")));
        }

        Ok(Book {
            id: self.id,
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            country: self.country.trim().to_string(),
            language: self.language.trim().to_string(),
            link: self.link.trim().to_string(),
            pages: self.pages.trim().to_string(),
            year: self.year.trim().to_string(),
        })
    }
}
