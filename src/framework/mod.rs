//! Host provisioning framework interfaces
//!
//! The generic types the host engine speaks: typed attribute sets, opaque
//! identifiers, filter expressions, schema descriptors and the result
//! callback used by queries.
//!
//! # Module Structure
//!
//! - [`attribute`] - Attribute values, attribute sets, `Uid` and connector objects
//! - [`filter`] - Query filter expressions
//! - [`schema`] - Object class and attribute descriptors

pub mod attribute;
pub mod filter;
pub mod schema;

pub use attribute::{AttributeSet, AttributeValue, ConnectorObject, Uid};
pub use filter::Filter;
pub use schema::{AttributeInfo, ObjectClassInfo, ScalarKind, Schema};

/// Special attribute name addressing the connector identifier.
pub const UID_ATTRIBUTE: &str = "__UID__";

/// Special attribute name addressing the object's name.
pub const NAME_ATTRIBUTE: &str = "__NAME__";

/// Receives objects produced by a query.
///
/// Returning `false` asks the connector to stop producing results.
pub trait ResultsHandler {
    fn handle(&mut self, object: ConnectorObject) -> bool;
}

impl<F> ResultsHandler for F
where
    F: FnMut(ConnectorObject) -> bool,
{
    fn handle(&mut self, object: ConnectorObject) -> bool {
        self(object)
    }
}
