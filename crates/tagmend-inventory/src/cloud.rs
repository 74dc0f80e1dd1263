//! Azure CLI adapter for inventory enumeration and tag mutation.
//!
//! This client is intentionally thin: it shells out to `az` and keeps no
//! reconciliation policy. Each call is one process invocation; the active
//! subscription is CLI-global state, which is why callers run sequentially.

use crate::error::InventoryError;
use crate::types::{Boundary, Resource, TagMap, TagOperation};
use crate::{InventorySource, TagMutator};
use serde::Deserialize;
use std::process::Command;

/// Thin client around the `az` CLI.
#[derive(Debug, Clone, Default)]
pub struct AzCliClient;

#[derive(Debug, Deserialize)]
struct AzAccount {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AzResource {
    id: String,
    name: String,
    #[serde(rename = "type")]
    resource_type: String,
    #[serde(default, rename = "resourceGroup")]
    resource_group: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    tags: Option<TagMap>,
}

impl AzCliClient {
    pub fn new() -> Self {
        Self
    }

    /// Returns true if `az` is available in PATH.
    pub fn is_available() -> bool {
        Command::new("az")
            .arg("version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

impl InventorySource for AzCliClient {
    fn list_boundaries(&mut self) -> Result<Vec<Boundary>, InventoryError> {
        let stdout = run_az(&["account", "list", "--output", "json"])?;
        let accounts: Vec<AzAccount> = serde_json::from_str(&stdout)
            .map_err(|e| InventoryError::Parse(format!("account list: {e}")))?;
        Ok(accounts
            .into_iter()
            .map(|account| Boundary::new(account.id, account.name))
            .collect())
    }

    fn set_active_boundary(&mut self, id: &str) -> Result<(), InventoryError> {
        run_az(&["account", "set", "--subscription", id])
            .map(|_| ())
            .map_err(|err| classify_boundary_failure(id, err))
    }

    fn list_tagged_resources(&mut self) -> Result<Vec<Resource>, InventoryError> {
        let stdout = run_az(&["resource", "list", "--output", "json"])?;
        let raw: Vec<AzResource> = serde_json::from_str(&stdout)
            .map_err(|e| InventoryError::Parse(format!("resource list: {e}")))?;
        Ok(raw.into_iter().filter_map(into_tagged_resource).collect())
    }
}

impl TagMutator for AzCliClient {
    fn mutate_tag(
        &mut self,
        resource_id: &str,
        key: &str,
        value: &str,
        op: TagOperation,
    ) -> Result<(), InventoryError> {
        let operation = match op {
            TagOperation::Delete => "delete",
            TagOperation::Merge => "merge",
        };
        let pair = format!("{key}={value}");
        run_az(&[
            "tag",
            "update",
            "--resource-id",
            resource_id,
            "--operation",
            operation,
            "--tags",
            &pair,
        ])
        .map(|_| ())
        .map_err(|err| classify_mutation_failure(resource_id, key, op, err))
    }
}

fn into_tagged_resource(raw: AzResource) -> Option<Resource> {
    let tags = raw.tags.unwrap_or_default();
    if tags.is_empty() {
        return None;
    }
    Some(Resource {
        id: raw.id,
        name: raw.name,
        resource_type: raw.resource_type,
        group: raw.resource_group,
        location: raw.location,
        tags,
    })
}

fn run_az(args: &[&str]) -> Result<String, InventoryError> {
    let output = Command::new("az").args(args).output().map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            InventoryError::NotInstalled
        } else {
            InventoryError::CommandFailed {
                args: args.join(" "),
                message: err.to_string(),
            }
        }
    })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            "unknown error".to_string()
        } else {
            stderr
        };
        Err(InventoryError::CommandFailed {
            args: args.join(" "),
            message,
        })
    }
}

/// Reclassify a raw CLI failure for a boundary switch into the typed
/// error kinds callers dispatch on.
fn classify_boundary_failure(boundary: &str, err: InventoryError) -> InventoryError {
    let InventoryError::CommandFailed { args, message } = err else {
        return err;
    };
    if is_authorization_message(&message) {
        return InventoryError::Authorization {
            boundary: boundary.to_string(),
            message,
        };
    }
    if is_not_found_message(&message) {
        return InventoryError::NotFound(format!("boundary {boundary}: {message}"));
    }
    InventoryError::CommandFailed { args, message }
}

fn classify_mutation_failure(
    resource_id: &str,
    key: &str,
    op: TagOperation,
    err: InventoryError,
) -> InventoryError {
    let InventoryError::CommandFailed { message, .. } = err else {
        return err;
    };
    if is_not_found_message(&message) {
        return InventoryError::NotFound(format!("resource {resource_id}: {message}"));
    }
    InventoryError::Mutation {
        resource_id: resource_id.to_string(),
        key: key.to_string(),
        op,
        message,
    }
}

fn is_authorization_message(message: &str) -> bool {
    message.contains("AuthorizationFailed") || message.contains("does not have authorization")
}

fn is_not_found_message(message: &str) -> bool {
    message.contains("ResourceNotFound")
        || message.contains("SubscriptionNotFound")
        || message.contains("was not found")
        || message.contains("could not be found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_list_parse_keeps_only_tagged_resources() {
        let payload = r#"[
            {"id": "/sub/s1/rg/app/vm-a", "name": "vm-a", "type": "virtualMachines",
             "resourceGroup": "app", "location": "westeurope",
             "tags": {"Dept": "Finance"}},
            {"id": "/sub/s1/rg/app/vm-b", "name": "vm-b", "type": "virtualMachines",
             "resourceGroup": "app", "location": "westeurope", "tags": null},
            {"id": "/sub/s1/rg/app/vm-c", "name": "vm-c", "type": "virtualMachines",
             "resourceGroup": "app", "location": "westeurope"}
        ]"#;
        let raw: Vec<AzResource> = serde_json::from_str(payload).expect("fixture parses");
        let resources: Vec<Resource> = raw.into_iter().filter_map(into_tagged_resource).collect();

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].name, "vm-a");
        assert_eq!(resources[0].tags.get("Dept").map(String::as_str), Some("Finance"));
    }

    #[test]
    fn boundary_failure_classifies_authorization() {
        let err = classify_boundary_failure(
            "s2",
            InventoryError::CommandFailed {
                args: "account set --subscription s2".to_string(),
                message: "AuthorizationFailed: the client does not have authorization".to_string(),
            },
        );
        assert!(matches!(err, InventoryError::Authorization { ref boundary, .. } if boundary == "s2"));
    }

    #[test]
    fn boundary_failure_classifies_not_found() {
        let err = classify_boundary_failure(
            "s9",
            InventoryError::CommandFailed {
                args: "account set --subscription s9".to_string(),
                message: "The subscription of 's9' was not found.".to_string(),
            },
        );
        assert!(matches!(err, InventoryError::NotFound(_)));
    }

    #[test]
    fn mutation_failure_wraps_resource_context() {
        let err = classify_mutation_failure(
            "/sub/s1/rg/app/vm-a",
            "Dept",
            TagOperation::Delete,
            InventoryError::CommandFailed {
                args: "tag update".to_string(),
                message: "conflict".to_string(),
            },
        );
        match err {
            InventoryError::Mutation { resource_id, key, op, .. } => {
                assert_eq!(resource_id, "/sub/s1/rg/app/vm-a");
                assert_eq!(key, "Dept");
                assert_eq!(op, TagOperation::Delete);
            }
            other => panic!("expected mutation error, got {other:?}"),
        }
    }
}
