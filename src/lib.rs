//! eduID affiliation connector
//!
//! Exposes the affiliation records of an eduID SCIM-like REST API to a
//! provisioning engine through generic, schema-described attribute sets.
//!
//! - [`framework`] - Types the host engine speaks
//! - [`affiliation`] - Catalog, mapping and CRUD operations
//! - [`scim`] - HTTP transport and error classification
//! - [`config`] - Connection settings
//! - [`error`] - Error taxonomy

pub mod affiliation;
pub mod config;
pub mod error;
pub mod framework;
pub mod scim;

/// Version injected at compile time via EDUID_CONNECTOR_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("EDUID_CONNECTOR_VERSION") {
    Some(v) => v,
    None => "dev",
};
