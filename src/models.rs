use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Service root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://dev.azure.com";

/// Work item type used by [`crate::WorkItemClient::create_work_item`].
pub const DEFAULT_WORK_ITEM_TYPE: &str = "User Story";

/// Work item payload as returned by the API.
///
/// The client does not model work item fields; callers read the tree directly,
/// e.g. `response["fields"]["System.Title"]`.
pub type WorkItemResponse = Value;

/// JSON Patch (RFC 6902) operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Op {
    Add,
    Remove,
    Replace,
    Test,
    Move,
    Copy,
}

impl Op {
    /// Wire name of the operation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
            Self::Test => "test",
            Self::Move => "move",
            Self::Copy => "copy",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a JSON Patch document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: Op,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Source pointer for `move` and `copy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl PatchOperation {
    /// Creates an operation without a `from` pointer.
    #[must_use]
    pub fn new(op: Op, path: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            op,
            path: path.into(),
            value,
            from: None,
        }
    }

    #[must_use]
    pub fn add(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(Op::Add, path, Some(value.into()))
    }

    #[must_use]
    pub fn replace(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(Op::Replace, path, Some(value.into()))
    }

    #[must_use]
    pub fn test(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(Op::Test, path, Some(value.into()))
    }

    #[must_use]
    pub fn remove(path: impl Into<String>) -> Self {
        Self::new(Op::Remove, path, None)
    }

    #[must_use]
    pub fn move_from(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            ..Self::new(Op::Move, path, None)
        }
    }

    #[must_use]
    pub fn copy_from(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            ..Self::new(Op::Copy, path, None)
        }
    }

    /// JSON pointer for a work item field, e.g. `System.Title` -> `/fields/System.Title`.
    #[must_use]
    pub fn field(reference_name: &str) -> String {
        format!("/fields/{}", reference_name)
    }
}

/// How the client treats non-success HTTP statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusCheck {
    /// Parse every body as JSON regardless of status.
    #[default]
    Permissive,
    /// Fail with [`crate::error::ApiError::RequestFailed`] on any non-2xx status.
    Strict,
}

/// Connection settings for a [`crate::WorkItemClient`].
///
/// The token is kept in a [`SecretString`] and never appears in `Debug` output.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub token: SecretString,
    pub organization: String,
    pub project: String,
    pub base_url: String,
    pub status_check: StatusCheck,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(
        token: impl Into<String>,
        organization: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            token: SecretString::from(token.into()),
            organization: organization.into(),
            project: project.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            status_check: StatusCheck::default(),
            timeout: None,
        }
    }

    /// Points the client at another service root (Azure DevOps Server, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_status_check(mut self, status_check: StatusCheck) -> Self {
        self.status_check = status_check;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
