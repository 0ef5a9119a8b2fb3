// src/api/mod.rs
//! Notion API interaction: reading database rows and page content.
//!
//! Business logic depends on [`NotionRepository`], never on HTTP details.

pub mod client;
pub mod filter;
pub mod notion_client_adapter;
pub mod parser;
mod responses;
mod simple_pagination;
pub mod types;

use crate::error::AppError;
use crate::model::{ContentBlock, PageRecord};
use crate::types::NotionId;

/// The ability to read an export database from a Notion workspace.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// Plain-text title of the database.
    async fn retrieve_database_title(&self, database: &NotionId) -> Result<String, AppError>;

    /// All rows admitted by `filter`, across every result page, in API order.
    async fn query_entries(
        &self,
        database: &NotionId,
        filter: &filter::PublicationFilter,
    ) -> Result<Vec<PageRecord>, AppError>;

    /// Top-level child blocks of a page, across every result page.
    async fn retrieve_children(&self, page: &NotionId) -> Result<Vec<ContentBlock>, AppError>;
}

pub use client::{ApiResponse, NotionHttpClient};
pub use filter::PublicationFilter;
pub use simple_pagination::fetch_all_pages_simple;
