// src/api/client.rs
//! HTTP client wrapper for the Notion API.
//!
//! Handles authentication and raw request/response exchange. Parsing lives in
//! [`super::parser`].

use super::filter::PublicationFilter;
use super::parser;
use super::simple_pagination::fetch_all_pages_simple;
use crate::constants::{NOTION_API_BASE_URL, NOTION_API_VERSION};
use crate::error::AppError;
use crate::model::{ContentBlock, PageRecord};
use crate::types::{ApiKey, NotionId};
use reqwest::{header, Client, Response};
use serde::Serialize;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        Self::with_base_url(api_key, NOTION_API_BASE_URL)
    }

    /// Creates a client against a different API root.
    pub fn with_base_url(api_key: &ApiKey, base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Makes a GET request to the specified endpoint with query parameters.
    pub async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response, AppError> {
        let url = self.url(endpoint);
        log::debug!("GET {}", url);
        Ok(self.client.get(url).query(query).send().await?)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = self.url(endpoint);
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }
}

#[async_trait::async_trait]
impl super::NotionRepository for NotionHttpClient {
    async fn retrieve_database_title(&self, database: &NotionId) -> Result<String, AppError> {
        let endpoint = format!("databases/{}", database.to_hyphenated());
        let response = self.get(&endpoint, &[]).await?;
        parser::parse_database_title(extract_response_text(response).await?)
    }

    async fn query_entries(
        &self,
        database: &NotionId,
        filter: &PublicationFilter,
    ) -> Result<Vec<PageRecord>, AppError> {
        let endpoint = format!("databases/{}/query", database.to_hyphenated());
        let filter = filter.to_query_filter();
        let result = fetch_all_pages_simple(
            |page_size, cursor| {
                let endpoint = endpoint.clone();
                let mut body = serde_json::json!({
                    "filter": filter,
                    "page_size": page_size,
                });
                if let Some(cursor) = cursor {
                    body["start_cursor"] = serde_json::json!(cursor);
                }
                async move {
                    let response = self.post(&endpoint, &body).await?;
                    parser::parse_pages_pagination(extract_response_text(response).await?)
                }
            },
            None,
        )
        .await?;

        log::debug!(
            "Database {} query returned {} rows in {} pages",
            database,
            result.total_fetched,
            result.pages_fetched
        );
        Ok(result.items)
    }

    async fn retrieve_children(&self, page: &NotionId) -> Result<Vec<ContentBlock>, AppError> {
        let endpoint = format!("blocks/{}/children", page.to_hyphenated());
        let result = fetch_all_pages_simple(
            |page_size, cursor| {
                let endpoint = endpoint.clone();
                let mut query = vec![("page_size", page_size.to_string())];
                if let Some(cursor) = cursor {
                    query.push(("start_cursor", cursor));
                }
                async move {
                    let response = self.get(&endpoint, &query).await?;
                    parser::parse_blocks_pagination(extract_response_text(response).await?)
                }
            },
            None,
        )
        .await?;
        Ok(result.items)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
