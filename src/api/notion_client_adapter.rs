// src/api/notion_client_adapter.rs
//! Adapter layer for converting notion-client types to our domain model.
//!
//! Only the block and property shapes the exporter renders are mapped in
//! detail; everything else is kept as a named `Unsupported`/`Other` marker.

use crate::error::AppError;
use crate::model::{
    CodeBlock, ContentBlock, ImageBlock, ImageSource, PageRecord, PropertyValue, RichTextSpan,
    TextBlockContent, ToDoBlock, UnsupportedBlock,
};
use crate::types::{NotionId, PropertyName};
use notion_client::objects::block::{Block as NcBlock, BlockType};
use notion_client::objects::file::File as NcFile;
use notion_client::objects::page::{DateOrDateTime, Page as NcPage, PageProperty};
use notion_client::objects::rich_text::RichText as NcRichText;
use std::collections::HashMap;

/// Convert a notion-client Page (a database row) to a `PageRecord`.
pub fn convert_page(notion_page: NcPage) -> Result<PageRecord, AppError> {
    let id = NotionId::parse(&notion_page.id)?;

    Ok(PageRecord {
        id,
        created_time: notion_page.created_time,
        properties: convert_page_properties(notion_page.properties),
    })
}

/// Convert a notion-client Block to a `ContentBlock`.
pub fn convert_block(notion_block: NcBlock) -> Result<ContentBlock, AppError> {
    let block = match notion_block.block_type {
        BlockType::Paragraph { paragraph } => {
            ContentBlock::Paragraph(convert_text_block_content(paragraph.rich_text))
        }
        BlockType::Heading1 { heading_1 } => {
            ContentBlock::Heading1(convert_text_block_content(heading_1.rich_text))
        }
        BlockType::Heading2 { heading_2 } => {
            ContentBlock::Heading2(convert_text_block_content(heading_2.rich_text))
        }
        BlockType::Heading3 { heading_3 } => {
            ContentBlock::Heading3(convert_text_block_content(heading_3.rich_text))
        }
        BlockType::BulletedListItem { bulleted_list_item } => ContentBlock::BulletedListItem(
            convert_text_block_content(bulleted_list_item.rich_text),
        ),
        BlockType::NumberedListItem { numbered_list_item } => ContentBlock::NumberedListItem(
            convert_text_block_content(numbered_list_item.rich_text),
        ),
        BlockType::ToDo { to_do } => ContentBlock::ToDo(ToDoBlock {
            content: convert_text_block_content(to_do.rich_text),
            checked: to_do.checked.unwrap_or(false),
        }),
        BlockType::Code { code } => ContentBlock::Code(CodeBlock {
            language: language_identifier(&code.language),
            content: convert_text_block_content(code.rich_text),
        }),
        BlockType::Quote { quote } => {
            ContentBlock::Quote(convert_text_block_content(quote.rich_text))
        }
        BlockType::Divider { .. } => ContentBlock::Divider,
        BlockType::Image { image } => ContentBlock::Image(ImageBlock {
            source: convert_file_object(image.file_type),
        }),
        other => ContentBlock::Unsupported(UnsupportedBlock {
            block_type: wire_type_name(&other),
        }),
    };

    Ok(block)
}

/// Plain-text title of a database, segments joined.
pub fn database_title(rich_text: Vec<NcRichText>) -> String {
    rich_text
        .into_iter()
        .map(convert_rich_text)
        .map(|span| span.plain_text)
        .collect()
}

fn convert_text_block_content(rich_text: Vec<NcRichText>) -> TextBlockContent {
    TextBlockContent::new(convert_rich_text_array(rich_text))
}

fn convert_rich_text_array(rich_texts: Vec<NcRichText>) -> Vec<RichTextSpan> {
    rich_texts.into_iter().map(convert_rich_text).collect()
}

/// Convert single rich text item. Mentions and equations keep their display text.
fn convert_rich_text(rich_text: NcRichText) -> RichTextSpan {
    match rich_text {
        NcRichText::Text {
            text,
            plain_text,
            href,
            ..
        } => RichTextSpan {
            plain_text: plain_text.unwrap_or(text.content),
            link: href.or_else(|| text.link.map(|link| link.url)),
        },
        NcRichText::Mention {
            plain_text, href, ..
        } => RichTextSpan {
            plain_text,
            link: href,
        },
        NcRichText::Equation {
            plain_text, href, ..
        } => RichTextSpan {
            plain_text,
            link: href,
        },
        _ => RichTextSpan::plain(String::new()),
    }
}

fn convert_file_object(file: NcFile) -> ImageSource {
    match file {
        NcFile::External { external } => ImageSource::External { url: external.url },
        NcFile::File { file } => ImageSource::File { url: file.url },
    }
}

/// Notion's language identifier as it appears on the wire (`rust`, `plain text`).
fn language_identifier<L: serde::Serialize + std::fmt::Debug>(language: &L) -> String {
    serde_json::to_value(language)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{:?}", language).to_lowercase())
}

/// The `type` tag a notion-client value serializes with.
fn wire_type_name<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

fn convert_page_properties(
    properties: HashMap<String, PageProperty>,
) -> HashMap<PropertyName, PropertyValue> {
    properties
        .into_iter()
        .map(|(name, property)| (PropertyName::new(name), convert_page_property(property)))
        .collect()
}

fn resolve_date(dod: DateOrDateTime) -> chrono::NaiveDate {
    match dod {
        DateOrDateTime::Date(d) => d,
        DateOrDateTime::DateTime(dt) => dt.date_naive(),
    }
}

fn joined_plain_text(rich_text: Vec<NcRichText>) -> String {
    rich_text
        .into_iter()
        .map(|rt| convert_rich_text(rt).plain_text)
        .collect()
}

fn convert_page_property(property: PageProperty) -> PropertyValue {
    match property {
        PageProperty::Title { title, .. } => PropertyValue::Title(joined_plain_text(title)),
        PageProperty::RichText { rich_text, .. } => {
            PropertyValue::RichText(joined_plain_text(rich_text))
        }
        PageProperty::Number { number, .. } => {
            PropertyValue::Number(number.and_then(|n| n.as_f64()))
        }
        PageProperty::Checkbox { checkbox, .. } => PropertyValue::Checkbox(checkbox),
        PageProperty::Select { select, .. } | PageProperty::Status { status: select, .. } => {
            PropertyValue::Select(select.and_then(|option| option.name))
        }
        PageProperty::MultiSelect { multi_select, .. } => PropertyValue::MultiSelect(
            multi_select
                .into_iter()
                .filter_map(|option| option.name)
                .collect(),
        ),
        PageProperty::Date { date, .. } => {
            PropertyValue::Date(date.and_then(|d| d.start).map(resolve_date))
        }
        PageProperty::UniqueID { unique_id, .. } => match unique_id {
            Some(uid) => match uid.number.and_then(|n| n.as_i64()) {
                Some(number) => PropertyValue::UniqueId {
                    prefix: uid.prefix,
                    number,
                },
                None => PropertyValue::Other("unique_id".to_string()),
            },
            None => PropertyValue::Other("unique_id".to_string()),
        },
        other => PropertyValue::Other(wire_type_name(&other)),
    }
}
