//! Integration tests for the affiliation connector using wiremock
//!
//! These tests run every connector operation against a mocked SCIM endpoint,
//! checking the requests sent and how each response is classified.

use eduid_connector::affiliation::{AffiliationConnector, OBJECT_CLASS, SCHEMA_URN};
use eduid_connector::config::ConnectorConfig;
use eduid_connector::error::ConnectorError;
use eduid_connector::framework::{
    AttributeSet, AttributeValue, ConnectorObject, Filter, Uid, NAME_ATTRIBUTE, UID_ATTRIBUTE,
};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{basic_auth, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connector(server: &MockServer) -> AffiliationConnector {
    let config = ConnectorConfig::new(format!("{}/scim/", server.uri()))
        .with_basic_auth("admin", "secret");
    AffiliationConnector::new(config).expect("config should be valid")
}

fn barbara() -> AttributeSet {
    AttributeSet::new()
        .with("id", "1")
        .with("givenName", "Barbara")
        .with("surname", "Smith")
        .with("swissEduIDAffiliationStatus", "current")
        .with("swissEduIDAffiliationPeriodBegin", "2018-01-01")
        .with("swissEduPersonUniqueID", "1")
        .with("swissEduID", "uuid-x")
        .with_values("eduPersonAffiliation", ["student"])
        .with_values("email", ["b@example.com"])
}

async fn request_body(server: &MockServer, http_method: &str) -> Value {
    let requests = server.received_requests().await.expect("recording enabled");
    let request = requests
        .iter()
        .find(|r| r.method.as_str() == http_method)
        .expect("request should have been sent");
    serde_json::from_slice(&request.body).expect("body should be JSON")
}

/// Test module for the liveness probe
mod probe_tests {
    use super::*;

    #[tokio::test]
    async fn test_service_provider_config_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/scim/ServiceProviderConfig"))
            .and(header("Content-Type", "application/scim+json"))
            .and(basic_auth("admin", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "schemas": ["urn:ietf:params:scim:schemas:core:2.0:ServiceProviderConfig"],
                "patch": {"supported": false}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let connector = connector(&server);
        assert_ok!(connector.test().await);
        assert_ok!(connector.check_alive().await);
    }

    #[tokio::test]
    async fn test_unparseable_probe_body_is_transport() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/scim/ServiceProviderConfig"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = assert_err!(connector(&server).test().await);
        assert!(matches!(err, ConnectorError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport() {
        // Nothing listens on port 1
        let config = ConnectorConfig::new("http://127.0.0.1:1/scim").with_basic_auth("admin", "secret");
        let connector = AffiliationConnector::new(config).unwrap();

        let err = assert_err!(connector.test().await);
        assert!(matches!(err, ConnectorError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_no_authorization_without_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/scim/ServiceProviderConfig"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let connector =
            AffiliationConnector::new(ConnectorConfig::new(format!("{}/scim", server.uri())))
                .unwrap();
        assert_ok!(connector.test().await);

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }
}

/// Test module for create
mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_posts_full_document_and_returns_server_uid() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/scim/Affiliations"))
            .and(header("Content-Type", "application/scim+json"))
            .and(basic_auth("admin", "secret"))
            .and(body_partial_json(json!({
                "schemas": [SCHEMA_URN],
                "givenName": "Barbara",
                "swissEduPersonUniqueID": "1"
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"swissEduPersonUniqueID": "1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let uid = connector(&server)
            .create(OBJECT_CLASS, &barbara())
            .await
            .expect("create should succeed");
        assert_eq!(uid, Some(Uid::new("1")));

        let body = request_body(&server, "POST").await;
        assert_eq!(
            body,
            json!({
                "schemas": [SCHEMA_URN],
                "id": "1",
                "givenName": "Barbara",
                "surname": "Smith",
                "swissEduIDAffiliationStatus": "current",
                "swissEduIDAffiliationPeriodBegin": "2018-01-01",
                "swissEduPersonUniqueID": "1",
                "swissEduID": "uuid-x",
                "eduPersonAffiliation": ["student"],
                "email": ["b@example.com"]
            })
        );
    }

    #[tokio::test]
    async fn test_uid_comes_from_response_not_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/scim/Affiliations"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"swissEduPersonUniqueID": "9001"})),
            )
            .mount(&server)
            .await;

        let uid = connector(&server).create(OBJECT_CLASS, &barbara()).await.unwrap();
        assert_eq!(uid, Some(Uid::new("9001")));
    }

    #[tokio::test]
    async fn test_missing_given_name_fails_before_any_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let mut attrs = barbara();
        attrs.remove("givenName");

        let err = assert_err!(connector(&server).create(OBJECT_CLASS, &attrs).await);
        match err {
            ConnectorError::InvalidValue(msg) => assert!(msg.contains("givenName")),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_email_fails_before_any_request() {
        let server = MockServer::start().await;

        let attrs = barbara().with_values("email", Vec::<AttributeValue>::new());

        let err = assert_err!(connector(&server).create(OBJECT_CLASS, &attrs).await);
        match err {
            ConnectorError::InvalidValue(msg) => assert!(msg.contains("email")),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_attribute_set_sends_nothing() {
        let server = MockServer::start().await;

        let uid = connector(&server)
            .create(OBJECT_CLASS, &AttributeSet::new())
            .await
            .unwrap();
        assert_eq!(uid, None);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_conflict_uniqueness_is_already_exists() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/scim/Affiliations"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "detail": "duplicate id",
                "scimType": "uniqueness"
            })))
            .mount(&server)
            .await;

        let err = assert_err!(connector(&server).create(OBJECT_CLASS, &barbara()).await);
        match err {
            ConnectorError::AlreadyExists(detail) => assert_eq!(detail, "duplicate id"),
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_conflict_with_other_scim_type_is_transport() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/scim/Affiliations"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "detail": "version mismatch",
                "scimType": "mutability"
            })))
            .mount(&server)
            .await;

        let err = assert_err!(connector(&server).create(OBJECT_CLASS, &barbara()).await);
        match err {
            ConnectorError::Transport { message, .. } => assert!(message.contains("mutability")),
            other => panic!("expected Transport, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparseable_conflict_body_is_transport() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/scim/Affiliations"))
            .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
            .mount(&server)
            .await;

        let err = assert_err!(connector(&server).create(OBJECT_CLASS, &barbara()).await);
        assert!(matches!(err, ConnectorError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_response_without_uid_is_transport() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/scim/Affiliations"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "1"})))
            .mount(&server)
            .await;

        let err = assert_err!(connector(&server).create(OBJECT_CLASS, &barbara()).await);
        assert!(matches!(err, ConnectorError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_unknown_object_class_is_unsupported() {
        let server = MockServer::start().await;

        let err = assert_err!(connector(&server).create("__ACCOUNT__", &barbara()).await);
        assert!(matches!(err, ConnectorError::Unsupported(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

/// Test module for update
mod update_tests {
    use super::*;

    async fn mount_existing(server: &MockServer, document: Value) {
        Mock::given(method("GET"))
            .and(path("/scim/Affiliations/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(document))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_update_preserves_unsent_fields() {
        let server = MockServer::start().await;

        mount_existing(
            &server,
            json!({
                "schemas": [SCHEMA_URN],
                "swissEduPersonUniqueID": "1",
                "givenName": "Barbara",
                "surname": "Smith",
                "ou": ["staff"]
            }),
        )
        .await;

        Mock::given(method("PUT"))
            .and(path("/scim/Affiliations/1"))
            .and(header("Content-Type", "application/scim+json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"swissEduPersonUniqueID": "1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let attrs = AttributeSet::new().with("surname", "Jones");
        let uid = connector(&server)
            .update(OBJECT_CLASS, &Uid::new("1"), &attrs)
            .await
            .expect("update should succeed");
        assert_eq!(uid, Uid::new("1"));

        let body = request_body(&server, "PUT").await;
        assert_eq!(body["surname"], "Jones");
        assert_eq!(body["givenName"], "Barbara");
        assert_eq!(body["ou"], json!(["staff"]));
        assert_eq!(body["schemas"], json!([SCHEMA_URN]));
    }

    #[tokio::test]
    async fn test_update_returns_uid_from_response() {
        let server = MockServer::start().await;

        mount_existing(&server, json!({"swissEduPersonUniqueID": "1"})).await;

        Mock::given(method("PUT"))
            .and(path("/scim/Affiliations/1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"swissEduPersonUniqueID": "2"})),
            )
            .mount(&server)
            .await;

        let uid = connector(&server)
            .update(OBJECT_CLASS, &Uid::new("1"), &AttributeSet::new().with("swissEduPersonUniqueID", "2"))
            .await
            .unwrap();
        assert_eq!(uid, Uid::new("2"));
    }

    #[tokio::test]
    async fn test_update_of_missing_record_is_unknown_uid() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/scim/Affiliations/404"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "detail": "Resource 404 not found",
                "status": "404"
            })))
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = assert_err!(
            connector(&server)
                .update(OBJECT_CLASS, &Uid::new("404"), &AttributeSet::new().with("surname", "x"))
                .await
        );
        match err {
            ConnectorError::UnknownUid(msg) => assert!(msg.contains("404")),
            other => panic!("expected UnknownUid, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_value_on_update() {
        let server = MockServer::start().await;

        mount_existing(&server, json!({"swissEduPersonUniqueID": "1"})).await;

        Mock::given(method("PUT"))
            .and(path("/scim/Affiliations/1"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "detail": "bad date",
                "scimType": "invalidValue"
            })))
            .mount(&server)
            .await;

        let attrs = AttributeSet::new().with("swissEduIDAffiliationPeriodBegin", "yesterday");
        let err = assert_err!(
            connector(&server)
                .update(OBJECT_CLASS, &Uid::new("1"), &attrs)
                .await
        );
        match err {
            ConnectorError::InvalidValue(detail) => assert_eq!(detail, "bad date"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_local_validation_failure_skips_put() {
        let server = MockServer::start().await;

        mount_existing(&server, json!({"swissEduPersonUniqueID": "1"})).await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let attrs = AttributeSet::new().with_values("swissEduPersonStaffCategory", ["ten"]);
        let err = assert_err!(
            connector(&server)
                .update(OBJECT_CLASS, &Uid::new("1"), &attrs)
                .await
        );
        assert!(matches!(err, ConnectorError::InvalidValue(_)));
    }

    #[tokio::test]
    async fn test_empty_update_sends_nothing() {
        let server = MockServer::start().await;

        let uid = connector(&server)
            .update(OBJECT_CLASS, &Uid::new("1"), &AttributeSet::new())
            .await
            .unwrap();
        assert_eq!(uid, Uid::new("1"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

/// Test module for delete
mod delete_tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/scim/Affiliations/1"))
            .and(basic_auth("admin", "secret"))
            .respond_with(ResponseTemplate::new(204))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/scim/Affiliations/1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "detail": "Resource 1 not found",
                "status": "404"
            })))
            .mount(&server)
            .await;

        let connector = connector(&server);
        assert_ok!(connector.delete(OBJECT_CLASS, &Uid::new("1")).await);

        let err = assert_err!(connector.delete(OBJECT_CLASS, &Uid::new("1")).await);
        assert!(matches!(err, ConnectorError::UnknownUid(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_transport() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/scim/Affiliations/1"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = assert_err!(connector(&server).delete(OBJECT_CLASS, &Uid::new("1")).await);
        match err {
            ConnectorError::Transport { message, .. } => {
                assert!(message.starts_with("HTTP error 503"));
                assert!(message.contains("unavailable"));
            }
            other => panic!("expected Transport, got {:?}", other),
        }
    }
}

/// Test module for queries
mod query_tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_by_uid_calls_handler_once() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/scim/Affiliations/2470"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "schemas": [SCHEMA_URN],
                "swissEduPersonUniqueID": "2470",
                "givenName": "Barbara",
                "ou": "staff",
                "swissEduPersonStaffCategory": [3]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut results: Vec<ConnectorObject> = Vec::new();
        let filter = Filter::eq(UID_ATTRIBUTE, "2470");
        connector(&server)
            .execute_query(OBJECT_CLASS, Some(&filter), &mut |object: ConnectorObject| {
                results.push(object);
                true
            })
            .await
            .expect("query should succeed");

        assert_eq!(results.len(), 1);
        let object = &results[0];
        assert_eq!(object.uid, Uid::new("2470"));
        assert_eq!(object.name, "2470");
        assert_eq!(object.attributes.get_string("givenName"), Some("Barbara"));
        assert_eq!(object.attributes.get("ou").unwrap(), &[AttributeValue::from("staff")]);
        assert_eq!(
            object.attributes.get("swissEduPersonStaffCategory").unwrap(),
            &[AttributeValue::Integer(3)]
        );
    }

    #[tokio::test]
    async fn test_lookup_by_name() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/scim/Affiliations/7"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"swissEduPersonUniqueID": "7"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut count = 0;
        let filter = Filter::eq(NAME_ATTRIBUTE, "7");
        connector(&server)
            .execute_query(OBJECT_CLASS, Some(&filter), &mut |_: ConnectorObject| {
                count += 1;
                true
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_lookup_of_missing_record_is_unknown_uid() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/scim/Affiliations/2470"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let filter = Filter::eq(UID_ATTRIBUTE, "2470");
        let err = assert_err!(
            connector(&server)
                .execute_query(OBJECT_CLASS, Some(&filter), &mut |_: ConnectorObject| true)
                .await
        );
        assert!(matches!(err, ConnectorError::UnknownUid(_)));
    }

    #[tokio::test]
    async fn test_unsupported_filters_fail_without_requests() {
        let server = MockServer::start().await;
        let connector = connector(&server);

        let filters = [
            Some(Filter::eq("surname", "Smith")),
            Some(Filter::negate(Filter::eq(UID_ATTRIBUTE, "2470"))),
            None,
        ];

        for filter in &filters {
            let mut called = false;
            let err = assert_err!(
                connector
                    .execute_query(OBJECT_CLASS, filter.as_ref(), &mut |_: ConnectorObject| {
                        called = true;
                        true
                    })
                    .await
            );
            assert!(matches!(err, ConnectorError::Unsupported(_)));
            assert!(!called);
        }

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_with_malformed_multi_value() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/scim/Affiliations/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "swissEduPersonUniqueID": "1",
                "email": {"primary": "b@example.com"}
            })))
            .mount(&server)
            .await;

        let err = assert_err!(connector(&server).get(&Uid::new("1")).await);
        match err {
            ConnectorError::InvalidValue(msg) => assert!(msg.contains("email")),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }
}
