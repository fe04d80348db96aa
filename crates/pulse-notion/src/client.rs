//! HTTP client for the Notion REST API.
//!
//! Wraps `reqwest` with bearer auth, the pinned `Notion-Version` header and
//! typed response deserialization. Any non-2xx status surfaces as
//! [`NotionError::Status`] with the response body attached.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, Method, Url};
use serde_json::{json, Value};

use crate::error::NotionError;
use crate::types::{InsightType, Page, Properties, QueryResponse};

pub const NOTION_VERSION: &str = "2022-06-28";

/// Client for the Notion REST API.
///
/// Use [`NotionClient::new`] for production or [`NotionClient::with_base_url`]
/// to point at a mock server in tests.
pub struct NotionClient {
    client: Client,
    token: String,
    base_url: Url,
}

impl NotionClient {
    /// Creates a new client pointed at the production Notion API.
    ///
    /// # Errors
    ///
    /// Returns [`NotionError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, NotionError> {
        Self::with_base_url(token, timeout_secs, pulse_core::DEFAULT_NOTION_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`NotionError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`NotionError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, NotionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("pulse/0.1 (insights-publisher)")
            .build()?;

        // Exactly one trailing slash, so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| NotionError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url,
        })
    }

    /// Finds the page of `insight_type` dated `day`, if any.
    ///
    /// # Errors
    ///
    /// - [`NotionError::Status`] on a non-2xx response.
    /// - [`NotionError::Http`] on network failure.
    /// - [`NotionError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn query_by_type_and_date(
        &self,
        database_id: &str,
        insight_type: InsightType,
        day: NaiveDate,
    ) -> Result<Option<Page>, NotionError> {
        let day = day.format("%Y-%m-%d").to_string();
        let body = json!({
            "filter": {
                "and": [
                    { "property": "Insight Type", "select": { "equals": insight_type.as_str() } },
                    { "property": "Date", "date": { "on_or_after": day } },
                    { "property": "Date", "date": { "on_or_before": day } }
                ]
            },
            "page_size": 1,
            "sorts": [{ "property": "Date", "direction": "descending" }]
        });

        let response: QueryResponse = self.query_database(database_id, &body).await?;
        Ok(response.results.into_iter().next())
    }

    /// Creates a page in `database_id`.
    ///
    /// # Errors
    ///
    /// - [`NotionError::Status`] on a non-2xx response.
    /// - [`NotionError::Http`] on network failure.
    /// - [`NotionError::Deserialize`] if the response is not a page.
    pub async fn create_page(
        &self,
        database_id: &str,
        properties: &Properties,
    ) -> Result<Page, NotionError> {
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });
        let value = self.send(Method::POST, "pages", &body).await?;
        decode(value, "create page")
    }

    /// Replaces the given properties on an existing page.
    ///
    /// # Errors
    ///
    /// - [`NotionError::Status`] on a non-2xx response.
    /// - [`NotionError::Http`] on network failure.
    /// - [`NotionError::Deserialize`] if the response is not a page.
    pub async fn update_page(
        &self,
        page_id: &str,
        properties: &Properties,
    ) -> Result<Page, NotionError> {
        let body = json!({ "properties": properties });
        let value = self
            .send(Method::PATCH, &format!("pages/{page_id}"), &body)
            .await?;
        decode(value, &format!("update page {page_id}"))
    }

    /// Lists every page with `Status` = `Published`, newest first.
    ///
    /// Follows `next_cursor` until Notion reports no more results.
    ///
    /// # Errors
    ///
    /// - [`NotionError::Status`] on a non-2xx response.
    /// - [`NotionError::Http`] on network failure.
    /// - [`NotionError::Deserialize`] if a response does not match the
    ///   expected shape.
    pub async fn list_published(&self, database_id: &str) -> Result<Vec<Page>, NotionError> {
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({
                "filter": { "property": "Status", "select": { "equals": "Published" } },
                "sorts": [{ "property": "Date", "direction": "descending" }]
            });
            if let Some(c) = &cursor {
                body["start_cursor"] = Value::String(c.clone());
            }

            let response: QueryResponse = self.query_database(database_id, &body).await?;
            pages.extend(response.results);

            match response.next_cursor {
                Some(next) if response.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(pages)
    }

    async fn query_database(
        &self,
        database_id: &str,
        body: &Value,
    ) -> Result<QueryResponse, NotionError> {
        let path = format!("databases/{database_id}/query");
        let value = self.send(Method::POST, &path, body).await?;
        decode(value, &format!("query database {database_id}"))
    }

    /// Sends an authenticated JSON request and returns the parsed body.
    ///
    /// # Errors
    ///
    /// Returns [`NotionError::Status`] for non-2xx responses,
    /// [`NotionError::Http`] on network failure and
    /// [`NotionError::Deserialize`] if the body is not JSON.
    async fn send(&self, method: Method, path: &str, body: &Value) -> Result<Value, NotionError> {
        let url = self.endpoint(path)?;
        let response = self
            .client
            .request(method, url.clone())
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(NotionError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| NotionError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, NotionError> {
        self.base_url
            .join(path)
            .map_err(|e| NotionError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value, context: &str) -> Result<T, NotionError> {
    serde_json::from_value(value).map_err(|e| NotionError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}
