// src/api/parser.rs
//! Response parsing using notion-client's serde types.

use super::client::ApiResponse;
use super::responses::{
    NotionBlock, NotionDatabase, NotionError, NotionPage, QueryDatabaseResponse,
    RetrieveBlockChildrenResponse, ToDomain,
};
use super::types::PaginatedResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionClientError, NotionErrorCode};
use crate::model::{ContentBlock, PageRecord};
use reqwest::StatusCode;

/// Parse any Notion API response using notion-client types
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_with_notion_client(&result.data, &result.url)
    } else {
        parse_error_with_notion_client(&result.data, result.status, &result.url)
    }
}

/// Parse successful response using notion-client's parsing
fn parse_with_notion_client<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);

        NotionClientError::Deserialization {
            source: e,
            body: preview(body),
        }
        .into()
    })
}

/// Parse error response using notion-client error types
fn parse_error_with_notion_client<T>(
    body: &str,
    status: StatusCode,
    url: &str,
) -> Result<T, AppError> {
    if let Ok(notion_error) = serde_json::from_str::<NotionError>(body) {
        return Err(NotionClientError::NotionApi {
            status: notion_error.status,
            code: notion_error.code,
            message: notion_error.message,
            request_id: notion_error.request_id,
        }
        .into());
    }

    // Fallback to generic error with HTTP status code
    Err(AppError::NotionService {
        code: NotionErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}: {}", status, url, preview(body)),
        status,
    })
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

/// Parse a database object and return its plain-text title
pub fn parse_database_title(result: ApiResponse<String>) -> Result<String, AppError> {
    let database: NotionDatabase = parse_api_response(result)?;
    Ok(super::notion_client_adapter::database_title(database.title))
}

/// Parse a page object into a database row
pub fn parse_page_response(result: ApiResponse<String>) -> Result<PageRecord, AppError> {
    let notion_page: NotionPage = parse_api_response(result)?;
    notion_page.to_domain()
}

/// Parse a single block object
pub fn parse_block_response(result: ApiResponse<String>) -> Result<ContentBlock, AppError> {
    let notion_block: NotionBlock = parse_api_response(result)?;
    notion_block.to_domain()
}

/// Parse one page of database query results
pub fn parse_pages_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<PageRecord>, AppError> {
    let response: QueryDatabaseResponse = parse_api_response(result)?;
    response.to_domain()
}

/// Parse one page of block children
pub fn parse_blocks_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<ContentBlock>, AppError> {
    let response: RetrieveBlockChildrenResponse = parse_api_response(result)?;
    response.to_domain()
}
