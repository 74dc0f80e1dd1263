//! Deterministic in-memory inventory.
//!
//! Backs tests and scripted scenarios with the same trait surface the
//! `az` client offers, plus failure-injection knobs: boundaries that deny
//! access and tag mutations that fail on demand.

use crate::error::InventoryError;
use crate::types::{Boundary, Resource, TagMap, TagOperation};
use crate::{InventorySource, TagMutator};
use std::collections::BTreeSet;

/// In-memory inventory over a fixed set of boundaries.
#[derive(Debug, Clone, Default)]
pub struct MemoryInventory {
    boundaries: Vec<(Boundary, Vec<Resource>)>,
    active: Option<String>,
    denied: BTreeSet<String>,
    failing_mutations: BTreeSet<(String, String)>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a boundary and its resources. Enumeration order is insertion
    /// order, matching the deterministic-ordering contract of the scan.
    pub fn with_boundary(mut self, boundary: Boundary, resources: Vec<Resource>) -> Self {
        self.boundaries.push((boundary, resources));
        self
    }

    /// Make `set_active_boundary(id)` fail with an authorization error.
    pub fn deny_boundary(mut self, id: impl Into<String>) -> Self {
        self.denied.insert(id.into());
        self
    }

    /// Make any mutation of `key` on `resource_id` fail.
    pub fn fail_mutation(mut self, resource_id: impl Into<String>, key: impl Into<String>) -> Self {
        self.failing_mutations.insert((resource_id.into(), key.into()));
        self
    }

    /// Current tag map of a resource, searched across all boundaries.
    pub fn tags_of(&self, resource_id: &str) -> Option<&TagMap> {
        self.boundaries
            .iter()
            .flat_map(|(_, resources)| resources.iter())
            .find(|resource| resource.id == resource_id)
            .map(|resource| &resource.tags)
    }

    fn active_resources_mut(&mut self) -> Result<&mut Vec<Resource>, InventoryError> {
        let active = self
            .active
            .clone()
            .ok_or_else(|| InventoryError::NotFound("no active boundary".to_string()))?;
        self.boundaries
            .iter_mut()
            .find(|(boundary, _)| boundary.id == active)
            .map(|(_, resources)| resources)
            .ok_or(InventoryError::NotFound(active))
    }
}

impl InventorySource for MemoryInventory {
    fn list_boundaries(&mut self) -> Result<Vec<Boundary>, InventoryError> {
        Ok(self
            .boundaries
            .iter()
            .map(|(boundary, _)| boundary.clone())
            .collect())
    }

    fn set_active_boundary(&mut self, id: &str) -> Result<(), InventoryError> {
        if self.denied.contains(id) {
            return Err(InventoryError::Authorization {
                boundary: id.to_string(),
                message: "access denied".to_string(),
            });
        }
        if !self.boundaries.iter().any(|(boundary, _)| boundary.id == id) {
            return Err(InventoryError::NotFound(format!("boundary {id}")));
        }
        self.active = Some(id.to_string());
        Ok(())
    }

    fn list_tagged_resources(&mut self) -> Result<Vec<Resource>, InventoryError> {
        let resources = self.active_resources_mut()?;
        Ok(resources
            .iter()
            .filter(|resource| resource.has_tags())
            .cloned()
            .collect())
    }
}

impl TagMutator for MemoryInventory {
    fn mutate_tag(
        &mut self,
        resource_id: &str,
        key: &str,
        value: &str,
        op: TagOperation,
    ) -> Result<(), InventoryError> {
        if self
            .failing_mutations
            .contains(&(resource_id.to_string(), key.to_string()))
        {
            return Err(InventoryError::Mutation {
                resource_id: resource_id.to_string(),
                key: key.to_string(),
                op,
                message: "injected failure".to_string(),
            });
        }

        let resources = self.active_resources_mut()?;
        let resource = resources
            .iter_mut()
            .find(|resource| resource.id == resource_id)
            .ok_or_else(|| InventoryError::NotFound(format!("resource {resource_id}")))?;

        match op {
            TagOperation::Delete => {
                resource.tags.remove(key);
            }
            TagOperation::Merge => {
                resource.tags.insert(key.to_string(), value.to_string());
            }
        }
        Ok(())
    }
}
