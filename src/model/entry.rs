// src/model/entry.rs
//! Database rows and the entries built from them.

use super::{ContentBlock, PropertyValue};
use crate::error::AppError;
use crate::types::{NotionId, PropertyName};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Property names tried, in order, for each entry field.
pub mod aliases {
    pub const TITLE: &[&str] = &["title", "Title", "Name", "titile"];
    pub const ID: &[&str] = &["ID", "id"];
    pub const TAGS: &[&str] = &["tags", "Tags"];
    pub const DESCRIPTION: &[&str] = &["description", "Description"];
    pub const WEATHER: &[&str] = &["weather", "Weather"];
    pub const PUBLISHED_AT: &[&str] = &["publishedAt", "published_at"];
    pub const DRAFT: &[&str] = &["draft", "Draft"];
}

/// Which kind of database an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Blog,
    Diary,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Blog => write!(f, "blog"),
            Category::Diary => write!(f, "diary"),
        }
    }
}

/// One fetched database row.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    pub id: NotionId,
    pub created_time: DateTime<Utc>,
    pub properties: HashMap<PropertyName, PropertyValue>,
}

impl PageRecord {
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// First alias whose value `extract` accepts.
    pub fn lookup<T, F>(&self, names: &[&str], extract: F) -> Option<T>
    where
        F: Fn(&PropertyValue) -> Option<T>,
    {
        names
            .iter()
            .filter_map(|name| self.property(name))
            .find_map(extract)
    }

    /// Value of a checkbox column; absent or non-checkbox reads as unchecked.
    pub fn checkbox(&self, name: &str) -> bool {
        self.property(name)
            .and_then(PropertyValue::as_checkbox)
            .unwrap_or(false)
    }

    /// First non-blank title alias. Rows without one cannot be exported.
    pub fn title(&self) -> Result<String, AppError> {
        self.lookup(aliases::TITLE, |value| {
            value
                .as_text()
                .filter(|text| !text.trim().is_empty())
                .map(str::to_string)
        })
        .ok_or_else(|| AppError::MissingTitle {
            page_id: self.id.to_hyphenated(),
        })
    }
}

/// Body of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    Blocks(Vec<ContentBlock>),
    /// Fetching the page's blocks failed.
    Unavailable,
}

impl EntryContent {
    pub fn blocks(&self) -> &[ContentBlock] {
        match self {
            EntryContent::Blocks(blocks) => blocks,
            EntryContent::Unavailable => &[],
        }
    }
}

/// A database record ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Value of the `ID` column, else the page id.
    pub id: String,
    pub page_id: NotionId,
    pub title: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub category: Category,
    pub content: EntryContent,
    pub description: Option<String>,
    pub weather: Option<String>,
    pub published_at: Option<NaiveDate>,
    pub draft: bool,
}

impl Entry {
    /// Maps a fetched row to an entry. Rows without a title are rejected.
    pub fn from_record(
        record: &PageRecord,
        category: Category,
        content: EntryContent,
    ) -> Result<Entry, AppError> {
        let title = record.title()?;

        let id = record
            .lookup(aliases::ID, PropertyValue::as_identifier)
            .unwrap_or_else(|| record.id.to_hyphenated());

        let non_empty_text = |value: &PropertyValue| {
            value
                .as_text()
                .filter(|text| !text.is_empty())
                .map(str::to_string)
        };

        Ok(Entry {
            id,
            page_id: record.id.clone(),
            title,
            tags: record
                .lookup(aliases::TAGS, PropertyValue::as_names)
                .unwrap_or_default(),
            created_at: record.created_time,
            category,
            content,
            description: record.lookup(aliases::DESCRIPTION, non_empty_text),
            weather: record.lookup(aliases::WEATHER, non_empty_text),
            published_at: record.lookup(aliases::PUBLISHED_AT, PropertyValue::as_date),
            draft: record
                .lookup(aliases::DRAFT, PropertyValue::as_checkbox)
                .unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(properties: Vec<(&str, PropertyValue)>) -> PageRecord {
        PageRecord {
            id: NotionId::parse("550e8400e29b41d4a716446655440000").unwrap(),
            created_time: Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap(),
            properties: properties
                .into_iter()
                .map(|(name, value)| (PropertyName::new(name), value))
                .collect(),
        }
    }

    fn blog(record: &PageRecord) -> Result<Entry, AppError> {
        Entry::from_record(record, Category::Blog, EntryContent::Blocks(Vec::new()))
    }

    #[test]
    fn test_title_aliases_in_priority_order() {
        let entry = blog(&record(vec![
            ("Name", PropertyValue::Title("From Name".to_string())),
            ("Title", PropertyValue::Title("From Title".to_string())),
        ]))
        .unwrap();
        assert_eq!(entry.title, "From Title");

        let entry = blog(&record(vec![(
            "titile",
            PropertyValue::Title("Typo column".to_string()),
        )]))
        .unwrap();
        assert_eq!(entry.title, "Typo column");
    }

    #[test]
    fn test_empty_title_falls_through_to_next_alias() {
        let entry = blog(&record(vec![
            ("title", PropertyValue::Title(String::new())),
            ("Name", PropertyValue::Title("Fallback".to_string())),
        ]))
        .unwrap();
        assert_eq!(entry.title, "Fallback");
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let err = blog(&record(vec![(
            "Title",
            PropertyValue::Title("   ".to_string()),
        )]))
        .unwrap_err();
        assert!(matches!(err, AppError::MissingTitle { .. }));
    }

    #[test]
    fn test_record_title_without_entry() {
        let titled = record(vec![("Name", PropertyValue::Title("Row".to_string()))]);
        assert_eq!(titled.title().unwrap(), "Row");

        let untitled = record(vec![("done", PropertyValue::Checkbox(true))]);
        assert!(matches!(
            untitled.title(),
            Err(AppError::MissingTitle { page_id }) if page_id == "550e8400-e29b-41d4-a716-446655440000"
        ));
    }

    #[test]
    fn test_id_column_wins_over_page_id() {
        let entry = blog(&record(vec![
            ("title", PropertyValue::Title("T".to_string())),
            (
                "ID",
                PropertyValue::UniqueId {
                    prefix: None,
                    number: 12,
                },
            ),
        ]))
        .unwrap();
        assert_eq!(entry.id, "12");

        let entry = blog(&record(vec![("title", PropertyValue::Title("T".to_string()))])).unwrap();
        assert_eq!(entry.id, "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_optional_fields() {
        let entry = Entry::from_record(
            &record(vec![
                ("title", PropertyValue::Title("Day".to_string())),
                (
                    "Tags",
                    PropertyValue::MultiSelect(vec!["life".to_string(), "travel".to_string()]),
                ),
                ("weather", PropertyValue::RichText("sunny".to_string())),
                ("Description", PropertyValue::RichText(String::new())),
                (
                    "publishedAt",
                    PropertyValue::Date(NaiveDate::from_ymd_opt(2024, 2, 1)),
                ),
                ("Draft", PropertyValue::Checkbox(true)),
            ]),
            Category::Diary,
            EntryContent::Unavailable,
        )
        .unwrap();

        assert_eq!(entry.tags, vec!["life", "travel"]);
        assert_eq!(entry.weather.as_deref(), Some("sunny"));
        assert_eq!(entry.description, None);
        assert_eq!(entry.published_at, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert!(entry.draft);
        assert_eq!(entry.content, EntryContent::Unavailable);
    }

    #[test]
    fn test_checkbox_defaults_to_unchecked() {
        let record = record(vec![("done", PropertyValue::Checkbox(true))]);
        assert!(record.checkbox("done"));
        assert!(!record.checkbox("published"));
    }
}
