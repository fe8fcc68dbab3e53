//! Common test utilities for azuread-provider integration tests.

#![allow(dead_code)]

use azuread_directory::{DirectoryCall, InMemoryDirectory};

pub const GROUP_ID: &str = "2d1f6c1e-8b52-4a8b-9f0e-7c3b1a2d4e5f";

pub const U1: &str = "11111111-1111-4111-8111-111111111111";
pub const U2: &str = "22222222-2222-4222-8222-222222222222";
pub const U3: &str = "33333333-3333-4333-8333-333333333333";
pub const U4: &str = "44444444-4444-4444-8444-444444444444";
pub const SERVICE_PRINCIPAL: &str = "c0ffee00-1234-4abc-8def-0123456789ab";

/// A directory holding one group owned by `owners`, with every test
/// principal registered.
pub async fn directory_with_group(owners: &[&str]) -> InMemoryDirectory {
    let directory = InMemoryDirectory::new();
    for user in [U1, U2, U3, U4] {
        directory.add_user(user).await;
    }
    directory.add_service_principal(SERVICE_PRINCIPAL).await;
    directory.insert_group(GROUP_ID, "Platform Admins", owners).await;
    directory
}

pub fn add(owner_id: &str) -> DirectoryCall {
    DirectoryCall::AddOwner {
        group_id: GROUP_ID.to_string(),
        owner_id: owner_id.to_string(),
    }
}

pub fn remove(owner_id: &str) -> DirectoryCall {
    DirectoryCall::RemoveOwner {
        group_id: GROUP_ID.to_string(),
        owner_id: owner_id.to_string(),
    }
}

/// Asserts that no removal precedes an addition.
pub fn assert_adds_before_removes(calls: &[DirectoryCall]) {
    let first_remove = calls
        .iter()
        .position(|c| matches!(c, DirectoryCall::RemoveOwner { .. }));
    let last_add = calls
        .iter()
        .rposition(|c| matches!(c, DirectoryCall::AddOwner { .. }));

    if let (Some(first_remove), Some(last_add)) = (first_remove, last_add) {
        assert!(
            last_add < first_remove,
            "add at {last_add} issued after remove at {first_remove}: {calls:?}"
        );
    }
}
