//! Azure DevOps work item API client module.
//!
//! This module provides a client for creating, reading and patching work
//! items through the `_apis/wit/workitems` REST endpoints.
//!
//! ## Features
//!
//! - JSON Patch document bodies (`application/json-patch+json`)
//! - Basic authentication with a Personal Access Token
//! - Responses returned as untyped JSON
//! - Optional strict status checking
//!
//! ## Example
//!
//! ```rust,no_run
//! use ado_workitems::api::WorkItemClient;
//! use ado_workitems::ClientConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WorkItemClient::new(ClientConfig::new("my-pat", "my-org", "my-project"))?;
//!
//! let work_item = client.get_work_item(42).await?;
//! println!("{}", work_item["fields"]["System.Title"]);
//! # Ok(())
//! # }
//! ```

mod client;
mod credential;
mod traits;

// Re-export the client and its public items
pub use client::WorkItemClient;
pub use credential::PatCredential;
pub use traits::WorkItemOperations;
