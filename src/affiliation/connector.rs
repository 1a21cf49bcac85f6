//! Affiliation Connector
//!
//! Sequences the HTTP calls behind each host operation. Every call runs to
//! completion on its own; the connector keeps nothing between calls except
//! its configuration and the pooled HTTP client.

use super::catalog::{self, ENDPOINT, OBJECT_CLASS, SERVICE_PROVIDER_CONFIG};
use super::filter::{translate, LookupKey};
use super::marshal::{marshal, ResourceDocument};
use super::unmarshal::{extract_uid, unmarshal};
use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, ConnectorResult};
use crate::framework::{AttributeSet, ConnectorObject, Filter, ResultsHandler, Schema, Uid};
use crate::scim::ScimHttpClient;
use std::sync::Arc;

/// Connector for eduID affiliation records
#[derive(Clone)]
pub struct AffiliationConnector {
    config: Arc<ConnectorConfig>,
    http: ScimHttpClient,
}

impl AffiliationConnector {
    /// Validate the configuration and build the HTTP client
    pub fn new(config: ConnectorConfig) -> ConnectorResult<Self> {
        config.validate()?;
        tracing::info!("configuration: {}", config);

        let config = Arc::new(config);
        let http = ScimHttpClient::new(Arc::clone(&config))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Probe the service by reading its ServiceProviderConfig
    pub async fn test(&self) -> ConnectorResult<()> {
        tracing::debug!("test - reading {}", SERVICE_PROVIDER_CONFIG);
        let response = self.http.get(&self.http.url(SERVICE_PROVIDER_CONFIG)).await?;
        tracing::debug!("test - returned {} keys", response.len());
        Ok(())
    }

    /// Same probe as [`AffiliationConnector::test`], used by connection pools
    pub async fn check_alive(&self) -> ConnectorResult<()> {
        self.test().await
    }

    pub fn schema(&self) -> Schema {
        Schema {
            object_classes: vec![catalog::object_class_info()],
        }
    }

    /// Create a record, returning the identifier assigned by the server.
    ///
    /// An empty attribute set is ignored and yields `None`.
    pub async fn create(
        &self,
        object_class: &str,
        attributes: &AttributeSet,
    ) -> ConnectorResult<Option<Uid>> {
        check_object_class(object_class)?;
        tracing::debug!("create affiliation, attributes: {:?}", attribute_names(attributes));

        if attributes.is_empty() {
            tracing::debug!("request ignored, empty attributes");
            return Ok(None);
        }

        let document = marshal(None, attributes)?;
        let response = self.http.post(&self.collection_url(), &document).await?;

        let uid = extract_uid(&response)?;
        tracing::info!("created affiliation, response UID: {}", uid);
        Ok(Some(uid))
    }

    /// Replace a record with the stored document overlaid by `attributes`.
    ///
    /// Returns the identifier from the server's response, which may differ
    /// from `uid`. An empty attribute set is ignored and returns `uid`.
    pub async fn update(
        &self,
        object_class: &str,
        uid: &Uid,
        attributes: &AttributeSet,
    ) -> ConnectorResult<Uid> {
        check_object_class(object_class)?;
        tracing::debug!(
            "update affiliation {}, attributes: {:?}",
            uid,
            attribute_names(attributes)
        );

        if attributes.is_empty() {
            tracing::debug!("request ignored, empty attributes");
            return Ok(uid.clone());
        }

        let existing = self.fetch(uid).await?;
        let document = marshal(Some(&existing), attributes)?;
        let response = self.http.put(&self.record_url(uid), &document).await?;

        let new_uid = extract_uid(&response)?;
        tracing::info!("updated affiliation {}, response UID: {}", uid, new_uid);
        Ok(new_uid)
    }

    pub async fn delete(&self, object_class: &str, uid: &Uid) -> ConnectorResult<()> {
        check_object_class(object_class)?;
        tracing::debug!("delete affiliation, Uid: {}", uid);
        self.http.delete(&self.record_url(uid)).await
    }

    /// Fetch one record by identifier
    pub async fn get(&self, uid: &Uid) -> ConnectorResult<ConnectorObject> {
        let document = self.fetch(uid).await?;
        unmarshal(&document)
    }

    /// Run a query, handing each result to `handler`.
    ///
    /// Only identifier lookups are possible; the API has no listing.
    pub async fn execute_query<H>(
        &self,
        object_class: &str,
        filter: Option<&Filter>,
        handler: &mut H,
    ) -> ConnectorResult<()>
    where
        H: ResultsHandler + ?Sized,
    {
        check_object_class(object_class)?;
        tracing::debug!("executeQuery on {}, filter: {:?}", object_class, filter);

        match translate(filter) {
            LookupKey::ByUid(id) => {
                let object = self.get(&Uid::new(id)).await?;
                handler.handle(object);
                Ok(())
            }
            LookupKey::Unsupported => Err(ConnectorError::Unsupported(format!(
                "listing or searching affiliations is not supported by the SCIM API, filter: {:?}",
                filter
            ))),
        }
    }

    async fn fetch(&self, uid: &Uid) -> ConnectorResult<ResourceDocument> {
        self.http
            .get(&self.record_url(uid))
            .await
            .map_err(|err| match err {
                ConnectorError::UnknownUid(_) => {
                    ConnectorError::UnknownUid(format!("Affiliation with ID {} does not exist", uid))
                }
                other => other,
            })
    }

    fn collection_url(&self) -> String {
        self.http.url(ENDPOINT)
    }

    fn record_url(&self, uid: &Uid) -> String {
        self.http
            .url(&format!("{}/{}", ENDPOINT, urlencoding::encode(uid.value())))
    }
}

fn check_object_class(object_class: &str) -> ConnectorResult<()> {
    if object_class == OBJECT_CLASS {
        Ok(())
    } else {
        Err(ConnectorError::Unsupported(format!(
            "Unsupported object class {}",
            object_class
        )))
    }
}

/// Attribute names only; values may hold passwords
fn attribute_names(attributes: &AttributeSet) -> Vec<&str> {
    let mut names: Vec<&str> = attributes.names().collect();
    names.sort_unstable();
    names
}
