//! SCIM API interaction module
//!
//! Transport plumbing shared by every connector operation: authentication,
//! request execution and response error classification.
//!
//! # Module Structure
//!
//! - [`auth`] - Basic authentication header built from the guarded password
//! - [`errors`] - Classification of non-2xx responses
//! - [`http`] - HTTP client for SCIM REST calls

pub mod auth;
pub mod errors;
pub mod http;

pub use http::ScimHttpClient;
