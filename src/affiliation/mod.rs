//! Affiliation resource
//!
//! Everything specific to the one resource type this connector manages:
//! the attribute catalog, both directions of the JSON mapping, query
//! translation and the CRUD operations built on top of them.
//!
//! # Architecture
//!
//! - [`catalog`] - Field table driving the mapping and the host schema
//! - [`marshal`] - Attribute set to request document
//! - [`unmarshal`] - Response document to connector object
//! - [`filter`] - Host filter to identifier lookup
//! - [`connector`] - `AffiliationConnector`, the operations the host calls
//!
//! # Example
//!
//! ```ignore
//! use eduid_connector::affiliation::{AffiliationConnector, OBJECT_CLASS};
//! use eduid_connector::config::ConnectorConfig;
//! use eduid_connector::framework::Uid;
//!
//! async fn show(uid: &str) -> eduid_connector::error::ConnectorResult<()> {
//!     let config = ConnectorConfig::new("https://eduid.example.org/scim")
//!         .with_basic_auth("admin", "secret");
//!     let connector = AffiliationConnector::new(config)?;
//!     let object = connector.get(&Uid::new(uid)).await?;
//!     println!("{:?}", object);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod connector;
pub mod filter;
pub mod marshal;
pub mod unmarshal;

pub use catalog::{OBJECT_CLASS, SCHEMA_URN, UID_FIELD};
pub use connector::AffiliationConnector;
pub use filter::{translate, LookupKey};
pub use marshal::{marshal, ResourceDocument};
pub use unmarshal::unmarshal;
