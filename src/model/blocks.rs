use serde::{Deserialize, Serialize};

/// One run of inline text, optionally hyperlinked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextSpan {
    pub plain_text: String,
    pub link: Option<String>,
}

impl RichTextSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            link: None,
        }
    }

    pub fn linked(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            link: Some(url.into()),
        }
    }
}

/// Text content shared by every text-bearing block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextBlockContent {
    pub rich_text: Vec<RichTextSpan>,
}

impl TextBlockContent {
    pub fn new(rich_text: Vec<RichTextSpan>) -> Self {
        Self { rich_text }
    }

    /// Single unlinked span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            rich_text: vec![RichTextSpan::plain(text)],
        }
    }

    /// Concatenated plain text of all spans, ignoring links.
    pub fn plain_text(&self) -> String {
        self.rich_text
            .iter()
            .map(|span| span.plain_text.as_str())
            .collect()
    }
}

/// To-do block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToDoBlock {
    pub content: TextBlockContent,
    pub checked: bool,
}

/// Code block. `language` is Notion's identifier as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub content: TextBlockContent,
    pub language: String,
}

/// Where an image block's bytes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    External { url: String },
    /// Notion-hosted upload; the URL is signed and expires.
    File { url: String },
}

impl ImageSource {
    pub fn url(&self) -> &str {
        match self {
            ImageSource::External { url } | ImageSource::File { url } => url,
        }
    }
}

/// Image block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub source: ImageSource,
}

/// Block kinds without a Markdown rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsupportedBlock {
    pub block_type: String,
}

/// One typed unit of page content, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentBlock {
    Paragraph(TextBlockContent),
    Heading1(TextBlockContent),
    Heading2(TextBlockContent),
    Heading3(TextBlockContent),
    BulletedListItem(TextBlockContent),
    NumberedListItem(TextBlockContent),
    ToDo(ToDoBlock),
    Code(CodeBlock),
    Quote(TextBlockContent),
    Divider,
    Image(ImageBlock),
    Unsupported(UnsupportedBlock),
}

impl ContentBlock {
    /// Get block type name
    pub fn block_type(&self) -> &str {
        match self {
            ContentBlock::Paragraph(_) => "paragraph",
            ContentBlock::Heading1(_) => "heading_1",
            ContentBlock::Heading2(_) => "heading_2",
            ContentBlock::Heading3(_) => "heading_3",
            ContentBlock::BulletedListItem(_) => "bulleted_list_item",
            ContentBlock::NumberedListItem(_) => "numbered_list_item",
            ContentBlock::ToDo(_) => "to_do",
            ContentBlock::Code(_) => "code",
            ContentBlock::Quote(_) => "quote",
            ContentBlock::Divider => "divider",
            ContentBlock::Image(_) => "image",
            ContentBlock::Unsupported(block) => &block.block_type,
        }
    }

    /// Image URL of an image block, if any.
    pub fn image_url(&self) -> Option<&str> {
        match self {
            ContentBlock::Image(image) => Some(image.source.url()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_ignores_links() {
        let content = TextBlockContent::new(vec![
            RichTextSpan::plain("see "),
            RichTextSpan::linked("docs", "https://example.com"),
        ]);
        assert_eq!(content.plain_text(), "see docs");
    }

    #[test]
    fn test_block_type_names() {
        assert_eq!(ContentBlock::Divider.block_type(), "divider");
        assert_eq!(
            ContentBlock::Unsupported(UnsupportedBlock {
                block_type: "toggle".to_string()
            })
            .block_type(),
            "toggle"
        );
    }

    #[test]
    fn test_image_url() {
        let block = ContentBlock::Image(ImageBlock {
            source: ImageSource::File {
                url: "https://files.example/a.png".to_string(),
            },
        });
        assert_eq!(block.image_url(), Some("https://files.example/a.png"));
        assert_eq!(ContentBlock::Divider.image_url(), None);
    }
}
