//! Common test utilities for azuread-directory integration tests.

#![allow(dead_code)]

use azuread_directory::{DirectorySettings, GraphDirectory};
use secrecy::SecretString;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Access token the mock server expects.
pub const TEST_TOKEN: &str = "mock-access-token";

pub const GROUP_ID: &str = "2d1f6c1e-8b52-4a8b-9f0e-7c3b1a2d4e5f";
pub const USER_A: &str = "6f1c0b9e-2f4e-4a53-9a8c-3e1f0d7c5b21";
pub const USER_B: &str = "9a7e3d2c-1b0f-4e8d-a6c5-b4a3f2e1d0c9";
pub const SERVICE_PRINCIPAL: &str = "c0ffee00-1234-4abc-8def-0123456789ab";

/// Test data factory for a user owner entry.
pub fn create_user_object(id: &str, upn_prefix: &str) -> Value {
    json!({
        "@odata.type": "#microsoft.graph.user",
        "id": id,
        "displayName": format!("Test User {}", upn_prefix),
        "userPrincipalName": format!("{}@test.onmicrosoft.com", upn_prefix)
    })
}

/// Test data factory for a service principal owner entry.
pub fn create_service_principal_object(id: &str, app_id: &str) -> Value {
    json!({
        "@odata.type": "#microsoft.graph.servicePrincipal",
        "id": id,
        "displayName": "Deployment Pipeline",
        "appId": app_id
    })
}

/// Test data factory for an owner entry that is not a principal.
pub fn create_device_object(id: &str) -> Value {
    json!({
        "@odata.type": "#microsoft.graph.device",
        "id": id,
        "displayName": "Build Agent 07"
    })
}

/// Test data factory for a group.
pub fn create_test_group(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "displayName": name,
        "description": format!("Test group: {}", name),
        "mailNickname": "0f3c9a4e-5d1b-4c7e-8a2f-6b9d0e1c2a3b",
        "securityEnabled": true,
        "mailEnabled": false,
        "groupTypes": []
    })
}

/// Wraps items in an OData response format.
pub fn create_odata_response(items: Vec<Value>, next_link: Option<&str>) -> Value {
    let mut response = json!({ "value": items });
    if let Some(link) = next_link {
        response["@odata.nextLink"] = json!(link);
    }
    response
}

/// Creates an OData error response.
pub fn create_odata_error(code: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

/// Builds a `GraphDirectory` pointed at the mock server.
pub fn directory_for(server: &MockServer) -> GraphDirectory {
    directory_with_page_size(server, 100)
}

/// Builds a `GraphDirectory` pointed at the mock server with a custom page size.
pub fn directory_with_page_size(server: &MockServer, page_size: u32) -> GraphDirectory {
    let settings = DirectorySettings::default()
        .with_graph_endpoint(server.uri())
        .with_page_size(page_size);
    GraphDirectory::new(&settings, SecretString::from(TEST_TOKEN.to_string()))
        .expect("valid test settings")
}

/// Owners collection path for a group.
pub fn owners_path(group_id: &str) -> String {
    format!("/v1.0/groups/{}/owners", group_id)
}
