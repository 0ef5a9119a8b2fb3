// src/formatting/frontmatter.rs
//! Fixed-shape frontmatter serialization.
//!
//! This is not a YAML emitter: keys always appear in the same order, values are
//! written verbatim, and empty optional fields are left out.

use crate::error::AppError;
use std::fmt::Write;

/// Metadata block written above the Markdown body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`
    pub published_at: Option<String>,
    /// `YYYY-MM-DD`
    pub date: String,
    pub tags: Vec<String>,
    pub draft: bool,
    pub weather: Option<String>,
}

/// Serializes in the order `id, title, description, publishedAt, date, tags, draft, weather`.
///
/// `title` is always written. Other string fields appear only when non-empty,
/// `tags` only when non-empty (inline `["a", "b"]` form) and `draft` only when true.
pub fn serialize(frontmatter: &Frontmatter) -> Result<String, AppError> {
    let mut out = String::new();

    write_if_present(&mut out, "id", Some(frontmatter.id.as_str()))?;
    writeln!(out, "title: {}", frontmatter.title)?;
    write_if_present(&mut out, "description", frontmatter.description.as_deref())?;
    write_if_present(&mut out, "publishedAt", frontmatter.published_at.as_deref())?;
    write_if_present(&mut out, "date", Some(frontmatter.date.as_str()))?;

    if !frontmatter.tags.is_empty() {
        let quoted: Vec<String> = frontmatter
            .tags
            .iter()
            .map(|tag| format!("\"{}\"", tag))
            .collect();
        writeln!(out, "tags: [{}]", quoted.join(", "))?;
    }

    if frontmatter.draft {
        writeln!(out, "draft: true")?;
    }

    write_if_present(&mut out, "weather", frontmatter.weather.as_deref())?;

    Ok(out)
}

fn write_if_present(out: &mut String, key: &str, value: Option<&str>) -> Result<(), AppError> {
    match value {
        Some(value) if !value.is_empty() => writeln!(out, "{}: {}", key, value)?,
        _ => {}
    }
    Ok(())
}
