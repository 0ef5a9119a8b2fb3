use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reduced view of a database property value.
///
/// Only the shapes the exporter reads are kept; everything else collapses
/// into `Other` with the Notion type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Title(String),
    RichText(String),
    MultiSelect(Vec<String>),
    Select(Option<String>),
    Checkbox(bool),
    Number(Option<f64>),
    UniqueId { prefix: Option<String>, number: i64 },
    Date(Option<NaiveDate>),
    Other(String),
}

impl PropertyValue {
    /// Returns the Notion API type name for this property value.
    pub fn type_name(&self) -> &str {
        match self {
            PropertyValue::Title(_) => "title",
            PropertyValue::RichText(_) => "rich_text",
            PropertyValue::MultiSelect(_) => "multi_select",
            PropertyValue::Select(_) => "select",
            PropertyValue::Checkbox(_) => "checkbox",
            PropertyValue::Number(_) => "number",
            PropertyValue::UniqueId { .. } => "unique_id",
            PropertyValue::Date(_) => "date",
            PropertyValue::Other(type_name) => type_name,
        }
    }

    /// Text content of title and rich-text properties.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Title(text) | PropertyValue::RichText(text) => Some(text),
            _ => None,
        }
    }

    /// Text rendering used for identifier columns.
    ///
    /// Unique IDs render as the bare number (the prefix is display-only in Notion).
    pub fn as_identifier(&self) -> Option<String> {
        match self {
            PropertyValue::UniqueId { number, .. } => Some(number.to_string()),
            PropertyValue::Number(Some(n)) if n.fract() == 0.0 => Some(format!("{}", *n as i64)),
            PropertyValue::Number(Some(n)) => Some(n.to_string()),
            PropertyValue::Title(text) | PropertyValue::RichText(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            _ => None,
        }
    }

    pub fn as_checkbox(&self) -> Option<bool> {
        match self {
            PropertyValue::Checkbox(checked) => Some(*checked),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            PropertyValue::Date(date) => *date,
            _ => None,
        }
    }

    /// Option names of a multi-select (or the single option of a select).
    pub fn as_names(&self) -> Option<Vec<String>> {
        match self {
            PropertyValue::MultiSelect(names) => Some(names.clone()),
            PropertyValue::Select(Some(name)) => Some(vec![name.clone()]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_rendering() {
        let unique = PropertyValue::UniqueId {
            prefix: Some("BLOG".to_string()),
            number: 42,
        };
        assert_eq!(unique.as_identifier().as_deref(), Some("42"));
        assert_eq!(
            PropertyValue::Number(Some(7.0)).as_identifier().as_deref(),
            Some("7")
        );
        assert_eq!(
            PropertyValue::RichText("  abc ".to_string())
                .as_identifier()
                .as_deref(),
            Some("abc")
        );
        assert_eq!(PropertyValue::Number(None).as_identifier(), None);
        assert_eq!(PropertyValue::RichText(String::new()).as_identifier(), None);
    }

    #[test]
    fn test_type_name_of_other() {
        assert_eq!(PropertyValue::Other("people".to_string()).type_name(), "people");
    }
}
