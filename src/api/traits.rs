//! Traits for Azure DevOps work item operations.
//!
//! These traits abstract the work item API so the command runner can be
//! driven by the real client or by test doubles.

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{PatchOperation, WorkItemResponse};

/// Trait for work item operations.
#[async_trait]
pub trait WorkItemOperations: Send + Sync {
    /// Creates a work item of the given type from a JSON Patch document.
    ///
    /// # Arguments
    ///
    /// * `work_item_type` - Type name, e.g. "User Story" or "Bug"
    /// * `operations` - JSON patch operations describing the initial fields
    async fn create_work_item_of_type(
        &self,
        work_item_type: &str,
        operations: &[PatchOperation],
    ) -> ApiResult<WorkItemResponse>;

    /// Fetches a work item by ID.
    async fn get_work_item(&self, id: i32) -> ApiResult<WorkItemResponse>;

    /// Applies a JSON Patch document to a work item.
    ///
    /// # Arguments
    ///
    /// * `id` - Work item ID
    /// * `operations` - JSON patch operations to apply
    async fn patch_work_item(
        &self,
        id: i32,
        operations: &[PatchOperation],
    ) -> ApiResult<WorkItemResponse>;
}
