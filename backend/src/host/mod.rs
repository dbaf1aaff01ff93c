//! Host platform layer: the course/category/module tables, metadata
//! lookups, role assignments, and the backup/restore engine facade.
//!
//! Everything above this module (the HTTP services) treats these functions
//! as the platform's own API surface: metadata reads, provisioning, scoped
//! role grants, and the backup/restore operations the copy orchestrator
//! sequences.

pub mod backup;
pub mod db;
pub mod error;
pub mod metadata;
pub mod provision;
pub mod roles;
