// src/formatting/document.rs
//! Turns an [`Entry`] into the exact bytes of its Markdown file.

use super::block_renderer::{render_blocks, ImageResolver};
use super::frontmatter::{self, Frontmatter};
use super::text::{
    collapse_empty_lines, collapse_whitespace, strip_markdown_links, truncate_to_char_count,
};
use crate::constants::{DATE_FORMAT, DESCRIPTION_ELLIPSIS, DESCRIPTION_MAX_CHARS, PLACEHOLDER_BODY};
use crate::error::AppError;
use crate::model::{Category, Entry, EntryContent};

/// Receives notices raised while converting an entry.
pub trait ConversionReporter {
    fn notice(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Forwards notices to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ConversionReporter for LogReporter {
    fn notice(&self, message: &str) {
        log::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }
}

/// A fully assembled document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub frontmatter: String,
    pub body: String,
}

impl RenderedDocument {
    /// File content: delimited frontmatter, a blank line, the body, then blank-line normalization.
    pub fn file_content(&self) -> String {
        collapse_empty_lines(&format!("---\n{}---\n\n{}", self.frontmatter, self.body))
    }
}

/// Renders the body, derives the frontmatter and serializes both.
pub fn assemble(
    entry: &Entry,
    images: &dyn ImageResolver,
    reporter: &dyn ConversionReporter,
) -> Result<RenderedDocument, AppError> {
    let body = match &entry.content {
        EntryContent::Blocks(blocks) => render_blocks(blocks, images),
        EntryContent::Unavailable => PLACEHOLDER_BODY.to_string(),
    };

    let description = match (&entry.description, entry.category) {
        (Some(explicit), _) => Some(strip_markdown_links(explicit)),
        (None, Category::Blog) if body.is_empty() => {
            reporter.notice(&format!(
                "Not setting description for blog entry: {} (empty content)",
                entry.title
            ));
            None
        }
        (None, Category::Blog) => Some(derive_description(&body)),
        (None, Category::Diary) => None,
    };

    let frontmatter = Frontmatter {
        id: entry.id.clone(),
        title: entry.title.clone(),
        description,
        published_at: entry
            .published_at
            .map(|date| date.format(DATE_FORMAT).to_string()),
        date: entry.created_at.format(DATE_FORMAT).to_string(),
        tags: entry.tags.clone(),
        draft: entry.draft,
        weather: entry.weather.clone(),
    };

    Ok(RenderedDocument {
        frontmatter: frontmatter::serialize(&frontmatter)?,
        body,
    })
}

/// Blog description from the rendered body: links stripped, whitespace
/// collapsed, cut to the character limit with an ellipsis when longer.
pub fn derive_description(body: &str) -> String {
    let text = collapse_whitespace(&strip_markdown_links(body));
    if text.chars().count() > DESCRIPTION_MAX_CHARS {
        let mut cut = truncate_to_char_count(&text, DESCRIPTION_MAX_CHARS);
        cut.push_str(DESCRIPTION_ELLIPSIS);
        cut
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::block_renderer::NoImages;
    use crate::model::{ContentBlock, TextBlockContent};
    use crate::types::NotionId;
    use chrono::{NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingReporter {
        notices: RefCell<Vec<String>>,
    }

    impl ConversionReporter for RecordingReporter {
        fn notice(&self, message: &str) {
            self.notices.borrow_mut().push(message.to_string());
        }

        fn warn(&self, message: &str) {
            self.notices.borrow_mut().push(message.to_string());
        }
    }

    fn entry(category: Category, blocks: Vec<ContentBlock>) -> Entry {
        Entry {
            id: "abc".to_string(),
            page_id: NotionId::parse("550e8400e29b41d4a716446655440000").unwrap(),
            title: "First Post".to_string(),
            tags: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap(),
            category,
            content: EntryContent::Blocks(blocks),
            description: None,
            weather: None,
            published_at: None,
            draft: false,
        }
    }

    fn paragraph(text: &str) -> ContentBlock {
        ContentBlock::Paragraph(TextBlockContent::plain(text))
    }

    #[test]
    fn test_first_post() {
        let entry = entry(Category::Blog, vec![paragraph("Hello world.")]);
        let reporter = RecordingReporter::default();
        let document = assemble(&entry, &NoImages, &reporter).unwrap();

        assert_eq!(
            document.frontmatter,
            "id: abc\ntitle: First Post\ndescription: Hello world.\ndate: 2023-01-01\n"
        );
        assert_eq!(document.body, "Hello world.  \n\n");
        assert_eq!(
            document.file_content(),
            "---\nid: abc\ntitle: First Post\ndescription: Hello world.\ndate: 2023-01-01\n---\n\nHello world.  \n"
        );
        assert!(reporter.notices.borrow().is_empty());
    }

    #[test]
    fn test_long_blog_description_is_truncated_with_ellipsis() {
        let body = "これは70文字を超える長い日本語のブログ記事です。日本語は1文字が複数バイトで表現されるため、バイト数ではなく文字数でカウントする必要があります。このテストでは、70文字を超える部分が正しく切り取られることを確認します。";
        let entry = entry(Category::Blog, vec![paragraph(body)]);
        let document = assemble(&entry, &NoImages, &LogReporter).unwrap();

        assert!(document.frontmatter.contains(
            "description: これは70文字を超える長い日本語のブログ記事です。日本語は1文字が複数バイトで表現されるため、バイト数ではなく文字数でカウントする必要があり...\n"
        ));
    }

    #[test]
    fn test_description_strips_links_and_newlines() {
        assert_eq!(
            derive_description("[aaa](https://x.com/)は  \n\n[bbb](https://y.com)だ  \n\n"),
            "aaaは bbbだ"
        );
        let exactly_seventy = "a".repeat(70);
        assert_eq!(derive_description(&exactly_seventy), exactly_seventy);
    }

    #[test]
    fn test_empty_blog_body_leaves_description_unset() {
        let entry = entry(Category::Blog, Vec::new());
        let reporter = RecordingReporter::default();
        let document = assemble(&entry, &NoImages, &reporter).unwrap();

        assert!(!document.frontmatter.contains("description"));
        assert_eq!(reporter.notices.borrow().len(), 1);
        assert!(reporter.notices.borrow()[0].contains("First Post"));
    }

    #[test]
    fn test_explicit_description_has_links_stripped() {
        let mut entry = entry(Category::Diary, vec![paragraph("Body text")]);
        entry.description = Some("Went to [the park](https://park.example)".to_string());
        entry.weather = Some("cloudy".to_string());
        let document = assemble(&entry, &NoImages, &LogReporter).unwrap();

        assert_eq!(
            document.frontmatter,
            "id: abc\ntitle: First Post\ndescription: Went to the park\ndate: 2023-01-01\nweather: cloudy\n"
        );
    }

    #[test]
    fn test_diary_without_description() {
        let entry = entry(Category::Diary, vec![paragraph("Today was long.")]);
        let document = assemble(&entry, &NoImages, &LogReporter).unwrap();
        assert!(!document.frontmatter.contains("description"));
    }

    #[test]
    fn test_unavailable_content_uses_placeholder() {
        let mut entry = entry(Category::Blog, Vec::new());
        entry.content = EntryContent::Unavailable;
        let document = assemble(&entry, &NoImages, &LogReporter).unwrap();

        assert_eq!(document.body, PLACEHOLDER_BODY);
        assert!(document.frontmatter.contains(
            "description: This content was imported from Notion, but the content could not be re...\n"
        ));
    }

    #[test]
    fn test_published_at_tags_and_draft() {
        let mut entry = entry(Category::Blog, vec![paragraph("x")]);
        entry.published_at = NaiveDate::from_ymd_opt(2023, 2, 3);
        entry.tags = vec!["rust".to_string(), "notion".to_string()];
        entry.draft = true;
        let document = assemble(&entry, &NoImages, &LogReporter).unwrap();

        assert_eq!(
            document.frontmatter,
            "id: abc\ntitle: First Post\ndescription: x\npublishedAt: 2023-02-03\ndate: 2023-01-01\ntags: [\"rust\", \"notion\"]\ndraft: true\n"
        );
    }
}
