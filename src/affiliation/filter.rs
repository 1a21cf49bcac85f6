//! Query Translator
//!
//! The affiliation API can only fetch a record by its identifier, so the only
//! filter it understands is a plain equality on `__UID__` or `__NAME__`.

use crate::framework::{Filter, NAME_ATTRIBUTE, UID_ATTRIBUTE};

/// What a query can be turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    /// Fetch the record with this identifier
    ByUid(String),
    /// The API cannot answer this query
    Unsupported,
}

/// Translate a host filter; `None` (list everything) is unsupported.
pub fn translate(filter: Option<&Filter>) -> LookupKey {
    let key = match filter {
        Some(Filter::Equals { attribute, values })
            if attribute == UID_ATTRIBUTE || attribute == NAME_ATTRIBUTE =>
        {
            match values.first() {
                Some(value) if !value.is_null() => LookupKey::ByUid(value.to_string()),
                _ => LookupKey::Unsupported,
            }
        }
        _ => LookupKey::Unsupported,
    };

    tracing::debug!("translated filter {:?} into {:?}", filter, key);
    key
}
