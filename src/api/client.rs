//! Azure DevOps work item client.
//!
//! Wraps a single `reqwest::Client` carrying the `Accept` and Basic
//! `Authorization` default headers, and exposes create/get/patch against
//! `_apis/wit/workitems` at API version 6.0.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use secrecy::ExposeSecret;
use tracing::{debug, trace, warn};
use url::Url;

use super::credential::PatCredential;
use super::traits::WorkItemOperations;
use crate::error::{ApiError, ApiResult, ConfigError, WorkItemsResult};
use crate::models::{
    ClientConfig, DEFAULT_WORK_ITEM_TYPE, PatchOperation, StatusCheck, WorkItemResponse,
};

const API_QUERY: &str = "api-version=6.0&expand=Fields";
const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// Azure DevOps work item client.
///
/// Construction performs no network I/O. The client holds no mutable state,
/// so one instance can serve any number of concurrent calls through `&self`.
/// The HTTP context is released when the client is dropped or closed.
///
/// # Example
///
/// ```rust,no_run
/// use ado_workitems::{ClientConfig, PatchOperation, WorkItemClient};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = WorkItemClient::new(ClientConfig::new("my-pat", "my-org", "my-project"))?;
///
/// let created = client
///     .create_work_item(&[PatchOperation::add("/fields/System.Title", "Login page")])
///     .await?;
/// println!("created #{}", created["id"]);
///
/// client.close();
/// # Ok(())
/// # }
/// ```
pub struct WorkItemClient {
    client: Client,
    base_url: Url,
    organization: String,
    project: String,
    status_check: StatusCheck,
}

impl WorkItemClient {
    /// Creates a new work item client.
    ///
    /// Fails with [`ConfigError::InvalidValue`] when the token, organization or
    /// project is blank, and with [`ApiError::InvalidUrl`] when the base URL is
    /// not an absolute http(s) URL.
    pub fn new(config: ClientConfig) -> WorkItemsResult<Self> {
        for (field, value) in [
            ("pat", config.token.expose_secret()),
            ("organization", config.organization.as_str()),
            ("project", config.project.as_str()),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "must not be empty".to_string(),
                }
                .into());
            }
        }

        let base_url = parse_base_url(&config.base_url)?;

        let credential = PatCredential::new(config.token);
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            credential.header_value().map_err(ApiError::from)?,
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::from)?;

        debug!(
            organization = %config.organization,
            project = %config.project,
            base_url = %base_url,
            "work item client created"
        );

        Ok(Self {
            client,
            base_url,
            organization: config.organization,
            project: config.project,
            status_check: config.status_check,
        })
    }

    /// Returns the organization name.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Returns the project name.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Returns the service root requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn status_check(&self) -> StatusCheck {
        self.status_check
    }

    /// URL addressing a single work item.
    pub fn work_item_url(&self, id: i32) -> ApiResult<Url> {
        self.work_items_url(&id.to_string())
    }

    /// URL for creating a work item of the given type (`$<type>` segment).
    pub fn create_url(&self, work_item_type: &str) -> ApiResult<Url> {
        self.work_items_url(&format!("${}", work_item_type))
    }

    fn work_items_url(&self, resource: &str) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                message: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend([
                self.organization.as_str(),
                self.project.as_str(),
                "_apis",
                "wit",
                "workitems",
                resource,
            ]);
        url.set_query(Some(API_QUERY));
        Ok(url)
    }

    /// Creates a user story from a JSON Patch document.
    pub async fn create_work_item(
        &self,
        operations: &[PatchOperation],
    ) -> ApiResult<WorkItemResponse> {
        self.create_work_item_of_type(DEFAULT_WORK_ITEM_TYPE, operations)
            .await
    }

    /// Creates a work item of any type from a JSON Patch document.
    pub async fn create_work_item_of_type(
        &self,
        work_item_type: &str,
        operations: &[PatchOperation],
    ) -> ApiResult<WorkItemResponse> {
        let url = self.create_url(work_item_type)?;
        self.send_patch(Method::POST, url, operations).await
    }

    /// Fetches a work item with all fields expanded.
    pub async fn get_work_item(&self, id: i32) -> ApiResult<WorkItemResponse> {
        let url = self.work_item_url(id)?;
        debug!(method = "GET", %url, "sending work item request");
        self.execute(self.client.get(url)).await
    }

    /// Applies a JSON Patch document to an existing work item.
    pub async fn patch_work_item(
        &self,
        id: i32,
        operations: &[PatchOperation],
    ) -> ApiResult<WorkItemResponse> {
        let url = self.work_item_url(id)?;
        self.send_patch(Method::PATCH, url, operations).await
    }

    /// Releases the underlying HTTP context.
    ///
    /// Equivalent to dropping the client; provided so call sites can make
    /// the end of the client's life explicit.
    pub fn close(self) {
        drop(self);
    }

    async fn send_patch(
        &self,
        method: Method,
        url: Url,
        operations: &[PatchOperation],
    ) -> ApiResult<WorkItemResponse> {
        let body = serde_json::to_vec(operations).map_err(ApiError::Serialize)?;
        debug!(
            %method,
            %url,
            operations = operations.len(),
            "sending work item request"
        );
        let request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE)
            .body(body);
        self.execute(request).await
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> ApiResult<WorkItemResponse> {
        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "received work item response");

        let text = response.text().await?;

        if !status.is_success() {
            match self.status_check {
                StatusCheck::Strict => {
                    return Err(ApiError::RequestFailed {
                        status: status.as_u16(),
                        message: text,
                    });
                }
                StatusCheck::Permissive => {
                    warn!(
                        status = status.as_u16(),
                        "work item request returned a non-success status, parsing body anyway"
                    );
                }
            }
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Parse {
            status: status.as_u16(),
            message: e.to_string(),
        })
    }
}

impl Drop for WorkItemClient {
    fn drop(&mut self) {
        trace!(
            organization = %self.organization,
            project = %self.project,
            "releasing work item client"
        );
    }
}

impl std::fmt::Debug for WorkItemClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkItemClient")
            .field("base_url", &self.base_url.as_str())
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("status_check", &self.status_check)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WorkItemOperations for WorkItemClient {
    async fn create_work_item_of_type(
        &self,
        work_item_type: &str,
        operations: &[PatchOperation],
    ) -> ApiResult<WorkItemResponse> {
        WorkItemClient::create_work_item_of_type(self, work_item_type, operations).await
    }

    async fn get_work_item(&self, id: i32) -> ApiResult<WorkItemResponse> {
        WorkItemClient::get_work_item(self, id).await
    }

    async fn patch_work_item(
        &self,
        id: i32,
        operations: &[PatchOperation],
    ) -> ApiResult<WorkItemResponse> {
        WorkItemClient::patch_work_item(self, id, operations).await
    }
}

fn parse_base_url(base_url: &str) -> ApiResult<Url> {
    let url = Url::parse(base_url.trim()).map_err(|e| ApiError::InvalidUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl {
            url: base_url.to_string(),
            message: "expected an absolute http or https URL".to_string(),
        });
    }

    Ok(url)
}
