//! # ado-workitems
//!
//! A typed client for the Azure DevOps work item REST API (v6.0).
//! This library provides:
//!
//! - Work item create, get and patch with JSON Patch bodies
//! - Basic authentication with a Personal Access Token
//! - Layered configuration (file, environment, CLI)
//! - Optional tracing-based logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ado_workitems::{ClientConfig, PatchOperation, WorkItemClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WorkItemClient::new(ClientConfig::new("my-pat", "my-org", "my-project"))?;
//!
//! let patched = client
//!     .patch_work_item(42, &[PatchOperation::replace("/fields/System.State", "Active")])
//!     .await?;
//! println!("now at revision {}", patched["rev"]);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod parsed_property;

// Re-export commonly used types for convenience
pub use api::{WorkItemClient, WorkItemOperations};
pub use config::Config;
pub use models::{ClientConfig, Op, PatchOperation, StatusCheck, WorkItemResponse};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
