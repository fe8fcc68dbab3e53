//! Graph-backed directory client tests against a mock Graph server.

mod common;

use azuread_directory::{DirectoryClient, DirectoryError, DirectoryObject};
use common::*;
use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_create_group_posts_security_group() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1.0/groups"))
        .and(header("authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
        .and(body_partial_json(json!({
            "displayName": "Platform Admins",
            "mailEnabled": false,
            "securityEnabled": true
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(create_test_group(GROUP_ID, "Platform Admins")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let directory = directory_for(&server);
    let id = directory.create_group("Platform Admins").await.unwrap();

    assert_eq!(id, GROUP_ID);
}

#[tokio::test]
async fn test_get_group_parses_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1.0/groups/{}", GROUP_ID)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(create_test_group(GROUP_ID, "Platform Admins")),
        )
        .mount(&server)
        .await;

    let group = directory_for(&server).get_group(GROUP_ID).await.unwrap();

    assert_eq!(group.id, GROUP_ID);
    assert_eq!(group.display_name, "Platform Admins");
    assert!(group.security_enabled);
    assert!(!group.mail_enabled);
}

#[tokio::test]
async fn test_get_missing_group_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1.0/groups/{}", GROUP_ID)))
        .respond_with(ResponseTemplate::new(404).set_body_json(create_odata_error(
            "Request_ResourceNotFound",
            "Resource does not exist or one of its queried reference-property objects are not present.",
        )))
        .mount(&server)
        .await;

    let err = directory_for(&server).get_group(GROUP_ID).await.unwrap_err();

    assert!(matches!(err, DirectoryError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_group() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/v1.0/groups/{}", GROUP_ID)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    directory_for(&server).delete_group(GROUP_ID).await.unwrap();
}

#[tokio::test]
async fn test_owner_ids_follow_next_link_and_keep_principals() {
    let server = MockServer::start().await;
    let next_link = format!("{}{}?$skiptoken=page2", server.uri(), owners_path(GROUP_ID));

    Mock::given(method("GET"))
        .and(path(owners_path(GROUP_ID)))
        .and(query_param("$top", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_odata_response(
            vec![
                create_user_object(USER_A, "ada"),
                create_device_object("d0d0d0d0-0000-4000-8000-000000000000"),
            ],
            Some(&next_link),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(owners_path(GROUP_ID)))
        .and(query_param("$skiptoken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_odata_response(
            vec![create_service_principal_object(SERVICE_PRINCIPAL, "app-1")],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let owners = directory_with_page_size(&server, 2)
        .owner_ids(GROUP_ID)
        .await
        .unwrap();

    assert_eq!(owners, vec![USER_A.to_string(), SERVICE_PRINCIPAL.to_string()]);
}

#[tokio::test]
async fn test_list_owners_fetches_pages_on_demand() {
    let server = MockServer::start().await;
    let next_link = format!("{}{}?$skiptoken=page2", server.uri(), owners_path(GROUP_ID));

    Mock::given(method("GET"))
        .and(path(owners_path(GROUP_ID)))
        .and(query_param("$top", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_odata_response(
            vec![create_user_object(USER_A, "ada")],
            Some(&next_link),
        )))
        .expect(1)
        .mount(&server)
        .await;

    // Never reached: the consumer stops after the first owner.
    Mock::given(method("GET"))
        .and(path(owners_path(GROUP_ID)))
        .and(query_param("$skiptoken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_odata_response(vec![], None)))
        .expect(0)
        .mount(&server)
        .await;

    let directory = directory_with_page_size(&server, 1);
    let mut owners = directory.list_owners(GROUP_ID);
    let first = owners.next().await.unwrap().unwrap();

    assert_eq!(first, DirectoryObject::User {
        id: USER_A.to_string(),
        display_name: Some("Test User ada".to_string()),
        user_principal_name: Some("ada@test.onmicrosoft.com".to_string()),
    });
}

#[tokio::test]
async fn test_list_owners_restarts_on_every_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(owners_path(GROUP_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_odata_response(
            vec![create_user_object(USER_A, "ada"), create_user_object(USER_B, "bob")],
            None,
        )))
        .expect(2)
        .mount(&server)
        .await;

    let directory = directory_for(&server);
    let first = directory.owner_ids(GROUP_ID).await.unwrap();
    let second = directory.owner_ids(GROUP_ID).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn test_list_owners_surfaces_failure_mid_enumeration() {
    let server = MockServer::start().await;
    let next_link = format!("{}{}?$skiptoken=page2", server.uri(), owners_path(GROUP_ID));

    Mock::given(method("GET"))
        .and(path(owners_path(GROUP_ID)))
        .and(query_param("$top", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_odata_response(
            vec![create_user_object(USER_A, "ada")],
            Some(&next_link),
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(owners_path(GROUP_ID)))
        .and(query_param("$skiptoken", "page2"))
        .respond_with(ResponseTemplate::new(503).set_body_json(create_odata_error(
            "serviceUnavailable",
            "The service is temporarily unavailable.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let err = directory_with_page_size(&server, 1)
        .owner_ids(GROUP_ID)
        .await
        .unwrap_err();

    assert!(matches!(err, DirectoryError::GraphApi { status: 503, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_add_owner_posts_directory_object_reference() {
    let server = MockServer::start().await;
    let reference = format!("{}/v1.0/directoryObjects/{}", server.uri(), USER_A);

    Mock::given(method("POST"))
        .and(path(format!("/v1.0/groups/{}/owners/$ref", GROUP_ID)))
        .and(body_partial_json(json!({ "@odata.id": reference })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    directory_for(&server).add_owner(GROUP_ID, USER_A).await.unwrap();
}

#[tokio::test]
async fn test_add_unknown_principal_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1.0/groups/{}/owners/$ref", GROUP_ID)))
        .respond_with(ResponseTemplate::new(404).set_body_json(create_odata_error(
            "Request_ResourceNotFound",
            "Resource '6f1c0b9e' does not exist.",
        )))
        .mount(&server)
        .await;

    let err = directory_for(&server).add_owner(GROUP_ID, USER_A).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_remove_owner_deletes_reference() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/v1.0/groups/{}/owners/{}/$ref", GROUP_ID, USER_B)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    directory_for(&server).remove_owner(GROUP_ID, USER_B).await.unwrap();
}

#[tokio::test]
async fn test_remove_absent_owner_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/v1.0/groups/{}/owners/{}/$ref", GROUP_ID, USER_B)))
        .respond_with(ResponseTemplate::new(404).set_body_json(create_odata_error(
            "Request_ResourceNotFound",
            "Resource does not exist.",
        )))
        .mount(&server)
        .await;

    let err = directory_for(&server).remove_owner(GROUP_ID, USER_B).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_last_owner_rejection_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/v1.0/groups/{}/owners/{}/$ref", GROUP_ID, USER_A)))
        .respond_with(ResponseTemplate::new(400).set_body_json(create_odata_error(
            "Request_BadRequest",
            "The group must have at least one owner, hence this owner cannot be removed.",
        )))
        .mount(&server)
        .await;

    let err = directory_for(&server).remove_owner(GROUP_ID, USER_A).await.unwrap_err();

    assert!(matches!(
        err,
        DirectoryError::GraphApi { status: 400, ref code, .. } if code == "Request_BadRequest"
    ));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_throttling_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/v1.0/groups/{}/owners/$ref", GROUP_ID)))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "1")
                .set_body_json(create_odata_error(
                    "TooManyRequests",
                    "Too many requests. Please retry after 1 seconds.",
                )),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = directory_for(&server).add_owner(GROUP_ID, USER_A).await.unwrap_err();

    assert!(matches!(err, DirectoryError::GraphApi { status: 429, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_forbidden_is_permission_denied() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/v1.0/groups/{}", GROUP_ID)))
        .respond_with(ResponseTemplate::new(403).set_body_json(create_odata_error(
            "Authorization_RequestDenied",
            "Insufficient privileges to complete the operation.",
        )))
        .mount(&server)
        .await;

    let err = directory_for(&server).delete_group(GROUP_ID).await.unwrap_err();

    assert!(matches!(err, DirectoryError::PermissionDenied(_)));
}
