// src/lib.rs
//! notion2astro library: exports Notion database rows as Markdown files with
//! YAML frontmatter for an Astro site.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`, `ImageError`
//! - **Configuration**: `PipelineConfig`, `ExportTarget`, `ImageSettings`
//! - **Domain model**: `ContentBlock`, `RichTextSpan`, `PageRecord`, `Entry`
//! - **API client**: `NotionRepository`, `NotionHttpClient`, parsers
//! - **Formatting**: `render_blocks`, `assemble`, `RenderedDocument`
//! - **Export**: `BatchExporter`, `ImageStore`, `ExportReport`

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod error_recovery;
pub mod export;
pub mod formatting;
pub mod images;
pub mod model;
pub mod output;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, DatabaseFetchFailure, ImageError};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ExportKind, ExportTarget, ImageSettings, PipelineConfig};

// --- Domain Model ---
pub use crate::model::{
    Category, CodeBlock, ContentBlock, Entry, EntryContent, ImageBlock, ImageSource, PageRecord,
    PropertyValue, RichTextSpan, TextBlockContent, ToDoBlock, UnsupportedBlock,
};

// --- Domain Types ---
pub use crate::types::{ApiKey, NotionId, PropertyName};

// --- API Client ---
pub use crate::api::{
    client::ApiResponse,
    parser::{
        parse_block_response, parse_blocks_pagination, parse_database_title,
        parse_page_response, parse_pages_pagination,
    },
    NotionHttpClient, NotionRepository, PublicationFilter,
};

// --- Formatting ---
pub use crate::formatting::{
    assemble, render_blocks, ConversionReporter, ImageResolver, LogReporter, NoImages,
    RenderedDocument,
};

// --- Images & Export ---
pub use crate::export::{BatchExporter, ExportReport};
pub use crate::images::{ImageLocalizer, ImageStore, ResolvedImages};
