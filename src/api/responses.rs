// src/api/responses.rs
//! API response types backed by the notion-client crate.

use super::types::PaginatedResponse;
use crate::error::AppError;
use crate::model::{ContentBlock, PageRecord};

pub use notion_client::objects::{
    block::Block as NotionBlock, database::Database as NotionDatabase, error::Error as NotionError,
    page::Page as NotionPage,
};

/// Database query response using notion-client types
pub type QueryDatabaseResponse = PaginatedResponse<NotionPage>;

/// Block children response using notion-client types
pub type RetrieveBlockChildrenResponse = PaginatedResponse<NotionBlock>;

/// Trait for converting notion-client types to domain types
pub trait ToDomain<T> {
    fn to_domain(self) -> Result<T, AppError>;
}

impl ToDomain<PageRecord> for NotionPage {
    fn to_domain(self) -> Result<PageRecord, AppError> {
        super::notion_client_adapter::convert_page(self)
    }
}

impl ToDomain<ContentBlock> for NotionBlock {
    fn to_domain(self) -> Result<ContentBlock, AppError> {
        super::notion_client_adapter::convert_block(self)
    }
}

impl<S, T> ToDomain<PaginatedResponse<T>> for PaginatedResponse<S>
where
    S: ToDomain<T>,
{
    fn to_domain(self) -> Result<PaginatedResponse<T>, AppError> {
        Ok(PaginatedResponse {
            object: self.object,
            results: self
                .results
                .into_iter()
                .map(ToDomain::to_domain)
                .collect::<Result<_, _>>()?,
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        })
    }
}
