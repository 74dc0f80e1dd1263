//! # tagmend-inventory
//!
//! Inventory access layer for tag governance.
//!
//! This crate provides:
//! - `Boundary` and `Resource` types (the scanned inventory model)
//! - `InventorySource` / `TagMutator` traits (the typed client seams)
//! - `AzCliClient` (shell-out transport over the `az` CLI)
//! - `MemoryInventory` (deterministic in-memory inventory for tests)
//!
//! It intentionally carries no reconciliation policy. What counts as an
//! inconsistent tag, and what to do about it, lives in `tagmend-core`.

pub mod cloud;
pub mod error;
pub mod memory;
pub mod types;

pub use cloud::AzCliClient;
pub use error::InventoryError;
pub use memory::MemoryInventory;
pub use types::{Boundary, Resource, TagMap, TagOperation};

/// Enumeration side of the inventory.
///
/// Implementations are stateful: `set_active_boundary` selects the scope
/// that subsequent `list_tagged_resources` calls enumerate. The active
/// boundary is a single-writer context; callers are expected to run
/// sequentially and switch immediately before operating in a boundary.
pub trait InventorySource {
    /// Enumerate the boundaries the operator can reach.
    fn list_boundaries(&mut self) -> Result<Vec<Boundary>, InventoryError>;

    /// Make `id` the active boundary for subsequent resource operations.
    ///
    /// Fails with `InventoryError::Authorization` when the boundary is
    /// inaccessible and `InventoryError::NotFound` when it does not exist.
    fn set_active_boundary(&mut self, id: &str) -> Result<(), InventoryError>;

    /// Enumerate resources carrying at least one tag in the active boundary.
    fn list_tagged_resources(&mut self) -> Result<Vec<Resource>, InventoryError>;
}

/// Mutation side of the inventory.
///
/// One tag operation per call. No atomic multi-tag-update primitive is
/// assumed; a delete and a following merge are independent calls.
pub trait TagMutator {
    fn mutate_tag(
        &mut self,
        resource_id: &str,
        key: &str,
        value: &str,
        op: TagOperation,
    ) -> Result<(), InventoryError>;
}
