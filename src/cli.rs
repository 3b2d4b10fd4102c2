//! Command line surface for the `ado-workitems` binary.

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use crate::api::WorkItemOperations;
use crate::models::{DEFAULT_WORK_ITEM_TYPE, Op, PatchOperation, WorkItemResponse};

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Connection arguments shared by all commands
#[derive(ClapArgs, Clone, Default, Debug)]
pub struct ConnectionArgs {
    /// Azure DevOps organization name
    #[arg(short, long, global = true, help_heading = "Azure DevOps Connection")]
    pub organization: Option<String>,

    /// Azure DevOps project name
    #[arg(short, long, global = true, help_heading = "Azure DevOps Connection")]
    pub project: Option<String>,

    /// Personal Access Token for Azure DevOps API authentication
    #[arg(short = 't', long, global = true, help_heading = "Azure DevOps Connection")]
    pub pat: Option<String>,

    /// Service root [default: https://dev.azure.com]
    #[arg(long, global = true, help_heading = "Azure DevOps Connection")]
    pub base_url: Option<String>,

    /// Fail on non-success HTTP statuses instead of parsing the body
    #[arg(long, global = true, help_heading = "Behavior")]
    pub strict_status: bool,

    /// Request timeout in seconds, 0 disables it [default: 30]
    #[arg(long, global = true, help_heading = "Behavior")]
    pub timeout_secs: Option<u64>,
}

/// Logging arguments.
///
/// These are read from raw argv before clap runs (see
/// [`crate::logging::parse_early_log_config`]); they are declared here so
/// clap accepts them and lists them in `--help`.
#[derive(ClapArgs, Clone, Default, Debug)]
pub struct LogArgs {
    /// Log level: trace, debug, info, warn, error [env: ADO_WORKITEMS_LOG_LEVEL]
    #[arg(long, global = true, help_heading = "Logging")]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stderr [env: ADO_WORKITEMS_LOG_FILE]
    #[arg(long, global = true, help_heading = "Logging")]
    pub log_file: Option<PathBuf>,

    /// Log format: text or json [env: ADO_WORKITEMS_LOG_FORMAT]
    #[arg(long, global = true, help_heading = "Logging")]
    pub log_format: Option<String>,
}

/// JSON Patch operations given on the command line.
///
/// PATH is a JSON pointer (`/fields/System.Title`) or a bare field reference
/// name (`System.Title`), which is expanded to `/fields/<name>`. VALUE is
/// parsed as JSON and falls back to a plain string.
#[derive(ClapArgs, Clone, Default, Debug)]
pub struct PatchArgs {
    /// Add a value
    #[arg(long, value_name = "PATH=VALUE", help_heading = "Patch Operations")]
    pub add: Vec<String>,

    /// Replace a value
    #[arg(long, value_name = "PATH=VALUE", help_heading = "Patch Operations")]
    pub replace: Vec<String>,

    /// Test that a value matches before applying the rest
    #[arg(long, value_name = "PATH=VALUE", help_heading = "Patch Operations")]
    pub test: Vec<String>,

    /// Remove a value
    #[arg(long, value_name = "PATH", help_heading = "Patch Operations")]
    pub remove: Vec<String>,

    /// JSON file holding an array of patch operations, applied first
    #[arg(long, value_name = "FILE", help_heading = "Patch Operations")]
    pub file: Option<PathBuf>,
}

impl PatchArgs {
    /// Collect the operations in application order: file, add, replace, test, remove.
    pub fn to_operations(&self) -> Result<Vec<PatchOperation>> {
        let mut operations = match &self.file {
            Some(path) => read_operations_file(path)?,
            None => Vec::new(),
        };

        for (op, assignments) in [
            (Op::Add, &self.add),
            (Op::Replace, &self.replace),
            (Op::Test, &self.test),
        ] {
            for assignment in assignments {
                let (path, value) = parse_assignment(assignment)?;
                operations.push(PatchOperation::new(op, path, Some(value)));
            }
        }

        for path in &self.remove {
            let path = path.trim();
            if path.is_empty() {
                anyhow::bail!("--remove expects a field path");
            }
            operations.push(PatchOperation::remove(normalize_path(path)));
        }

        Ok(operations)
    }
}

/// Available commands
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Fetch a work item with all fields
    #[command(
        visible_alias = "g",
        after_help = "EXAMPLES:\n    \
            ado-workitems get 42 -o myorg -p myproject -t <PAT>"
    )]
    Get {
        /// Work item ID
        id: i32,
    },

    /// Create a work item from patch operations
    #[command(
        visible_alias = "c",
        after_help = "EXAMPLES:\n    \
            # Create a user story with a title and priority\n    \
            ado-workitems create --add System.Title=\"Login page\" \\\n      \
            --add Microsoft.VSTS.Common.Priority=2\n\n    \
            # Create a bug from a prepared patch document\n    \
            ado-workitems create --type Bug --file bug.json"
    )]
    Create {
        /// Work item type
        #[arg(long = "type", default_value = DEFAULT_WORK_ITEM_TYPE)]
        work_item_type: String,

        #[command(flatten)]
        patch: PatchArgs,
    },

    /// Apply patch operations to an existing work item
    #[command(
        visible_alias = "p",
        after_help = "EXAMPLES:\n    \
            # Move a work item to Active and drop its tags\n    \
            ado-workitems patch 42 --replace System.State=Active --remove System.Tags"
    )]
    Patch {
        /// Work item ID
        id: i32,

        #[command(flatten)]
        patch: PatchArgs,
    },
}

#[derive(Parser, Clone, Debug)]
#[command(
    name = "ado-workitems",
    author,
    version = LONG_VERSION,
    about = "Create, read and patch Azure DevOps work items",
    long_about = "Create, read and patch Azure DevOps work items through the REST API.\n\n\
        Responses are printed to stdout as pretty JSON.\n\n\
        Configuration can be provided via CLI arguments, environment variables (ADO_WORKITEMS_*),\n\
        or config file (~/.config/ado-workitems/config.toml)."
)]
pub struct Args {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub logging: LogArgs,

    /// Create a sample configuration file and exit
    #[arg(long)]
    pub create_config: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Run one command against the given work item API.
pub async fn execute(
    client: &dyn WorkItemOperations,
    command: &Commands,
) -> Result<WorkItemResponse> {
    match command {
        Commands::Get { id } => client
            .get_work_item(*id)
            .await
            .with_context(|| format!("Failed to fetch work item {}", id)),
        Commands::Create {
            work_item_type,
            patch,
        } => {
            let operations = non_empty_operations(patch)?;
            client
                .create_work_item_of_type(work_item_type, &operations)
                .await
                .with_context(|| format!("Failed to create {} work item", work_item_type))
        }
        Commands::Patch { id, patch } => {
            let operations = non_empty_operations(patch)?;
            client
                .patch_work_item(*id, &operations)
                .await
                .with_context(|| format!("Failed to patch work item {}", id))
        }
    }
}

fn non_empty_operations(patch: &PatchArgs) -> Result<Vec<PatchOperation>> {
    let operations = patch.to_operations()?;
    if operations.is_empty() {
        anyhow::bail!(
            "No patch operations given (use --add, --replace, --test, --remove or --file)"
        );
    }
    Ok(operations)
}

fn read_operations_file(path: &std::path::Path) -> Result<Vec<PatchOperation>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read patch file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse patch file: {}", path.display()))
}

/// Parse a "path=value" argument.
fn parse_assignment(input: &str) -> Result<(String, Value)> {
    let (path, value) = input
        .split_once('=')
        .with_context(|| format!("expected 'PATH=VALUE', got '{}'", input))?;

    let path = path.trim();
    if path.is_empty() {
        anyhow::bail!("expected 'PATH=VALUE', got '{}'", input);
    }

    let value_str = value.trim();
    let value =
        serde_json::from_str(value_str).unwrap_or_else(|_| Value::String(value_str.to_string()));

    Ok((normalize_path(path), value))
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        PatchOperation::field(path)
    }
}
