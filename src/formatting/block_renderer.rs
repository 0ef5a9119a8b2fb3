// src/formatting/block_renderer.rs
//! Block rendering: one content block in, one Markdown fragment out.
//!
//! Every text line ends with the two-space hard break marker. Block-level
//! elements (paragraphs, headings, quotes, code, dividers, images) are followed
//! by a blank line; list items and to-dos are not, so consecutive items stay
//! in one list.

use super::rich_text::render_spans;
use crate::constants::CHARS_PER_BLOCK_ESTIMATE;
use crate::error::ImageError;
use crate::model::{CodeBlock, ContentBlock, ImageBlock, TextBlockContent, ToDoBlock};

const HARD_BREAK: &str = "  \n";
const BLOCK_END: &str = "  \n\n";

// --- Core Types ---

/// Something that can map a remote image URL to the URL the page should use.
pub trait ImageResolver {
    fn resolve(&self, remote_url: &str) -> Result<String, ImageError>;
}

/// Resolver that never localizes; every image keeps its remote URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageResolver for NoImages {
    fn resolve(&self, remote_url: &str) -> Result<String, ImageError> {
        Err(ImageError::NotLocalized(remote_url.to_string()))
    }
}

// --- Public API ---

/// Renders a slice of blocks into Markdown, in order.
pub fn render_blocks(blocks: &[ContentBlock], images: &dyn ImageResolver) -> String {
    let mut output = String::with_capacity(blocks.len() * CHARS_PER_BLOCK_ESTIMATE);
    for block in blocks {
        output.push_str(&render_block(block, images));
    }
    output
}

/// Renders one block. Unsupported blocks render as nothing.
pub fn render_block(block: &ContentBlock, images: &dyn ImageResolver) -> String {
    match block {
        ContentBlock::Paragraph(content) => block_line("", content),
        ContentBlock::Heading1(content) => block_line("# ", content),
        ContentBlock::Heading2(content) => block_line("## ", content),
        ContentBlock::Heading3(content) => block_line("### ", content),
        ContentBlock::BulletedListItem(content) => list_line("- ", content),
        // Always `1.`, items are not counted.
        ContentBlock::NumberedListItem(content) => list_line("1. ", content),
        ContentBlock::ToDo(todo) => render_to_do(todo),
        ContentBlock::Code(code) => render_code(code),
        ContentBlock::Quote(content) => block_line("> ", content),
        ContentBlock::Divider => format!("---{}", BLOCK_END),
        ContentBlock::Image(image) => render_image(image, images),
        ContentBlock::Unsupported(_) => String::new(),
    }
}

// --- Block Renderers ---

fn block_line(prefix: &str, content: &TextBlockContent) -> String {
    format!("{}{}{}", prefix, render_spans(&content.rich_text), BLOCK_END)
}

fn list_line(marker: &str, content: &TextBlockContent) -> String {
    format!("{}{}{}", marker, render_spans(&content.rich_text), HARD_BREAK)
}

fn render_to_do(todo: &ToDoBlock) -> String {
    let marker = if todo.checked { "- [x] " } else { "- [ ] " };
    list_line(marker, &todo.content)
}

fn render_code(code: &CodeBlock) -> String {
    format!(
        "```{}{}{}{}```{}",
        code.language,
        HARD_BREAK,
        render_spans(&code.content.rich_text),
        HARD_BREAK,
        BLOCK_END
    )
}

fn render_image(image: &ImageBlock, images: &dyn ImageResolver) -> String {
    let remote_url = image.source.url();
    if remote_url.is_empty() {
        return String::new();
    }

    let url = images
        .resolve(remote_url)
        .unwrap_or_else(|_| remote_url.to_string());
    format!("![Image]({}){}", url, BLOCK_END)
}
