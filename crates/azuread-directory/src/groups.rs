//! Group and group-owner operations against Microsoft Graph.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use secrecy::SecretString;
use tracing::{debug, info, instrument};

use crate::directory::{DirectoryClient, DirectoryObject, Group, NewGroup, OwnerStream};
use crate::graph_client::{GraphClient, ODataResponse};
use crate::{DirectoryError, DirectoryResult, DirectorySettings};

const GROUP_SELECT: &str = "id,displayName,description,mailNickname,securityEnabled,mailEnabled";

/// `DirectoryClient` backed by the Microsoft Graph REST API.
#[derive(Debug)]
pub struct GraphDirectory {
    client: GraphClient,
    page_size: u32,
}

impl GraphDirectory {
    /// Creates a Graph-backed directory client.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the HTTP client cannot be created.
    pub fn new(settings: &DirectorySettings, access_token: SecretString) -> DirectoryResult<Self> {
        Ok(Self {
            client: GraphClient::new(settings, access_token)?,
            page_size: settings.page_size,
        })
    }

    /// Returns the underlying Graph client.
    #[must_use]
    pub fn graph_client(&self) -> &GraphClient {
        &self.client
    }

    fn group_url(&self, group_id: &str) -> String {
        format!(
            "{}/groups/{}",
            self.client.base_url(),
            urlencoding::encode(group_id)
        )
    }

    fn directory_object_url(&self, object_id: &str) -> String {
        format!(
            "{}/directoryObjects/{}",
            self.client.base_url(),
            urlencoding::encode(object_id)
        )
    }
}

#[async_trait]
impl DirectoryClient for GraphDirectory {
    #[instrument(skip(self))]
    async fn create_group(&self, display_name: &str) -> DirectoryResult<String> {
        let url = format!("{}/groups", self.client.base_url());
        let request = NewGroup::security(display_name);

        let created: serde_json::Value = self.client.post(&url, &request).await?;
        let group = Group::from_json(&created)?;

        info!(group_id = %group.id, "Group created");
        Ok(group.id)
    }

    #[instrument(skip(self))]
    async fn get_group(&self, group_id: &str) -> DirectoryResult<Group> {
        let url = format!("{}?$select={}", self.group_url(group_id), GROUP_SELECT);
        let value: serde_json::Value = self.client.get(&url).await?;
        Group::from_json(&value)
    }

    #[instrument(skip(self))]
    async fn delete_group(&self, group_id: &str) -> DirectoryResult<()> {
        self.client.delete(&self.group_url(group_id)).await?;
        info!(group_id, "Group deleted");
        Ok(())
    }

    fn list_owners<'a>(&'a self, group_id: &'a str) -> OwnerStream<'a> {
        let first_page = format!(
            "{}/owners?$top={}",
            self.group_url(group_id),
            self.page_size
        );
        let client = &self.client;

        stream::try_unfold(Some(first_page), move |next| async move {
            let Some(url) = next else {
                return Ok::<_, DirectoryError>(None);
            };
            let page: ODataResponse<serde_json::Value> = client.get_page(&url).await?;
            debug!(group_id, owners = page.value.len(), "Fetched owner page");
            Ok(Some((page.value, page.next_link)))
        })
        .map_ok(|values| stream::iter(values.into_iter().map(|v| DirectoryObject::from_json(&v))))
        .try_flatten()
        .boxed()
    }

    #[instrument(skip(self))]
    async fn add_owner(&self, group_id: &str, owner_id: &str) -> DirectoryResult<()> {
        let url = format!("{}/owners/$ref", self.group_url(group_id));
        let body = serde_json::json!({
            "@odata.id": self.directory_object_url(owner_id)
        });

        self.client.post_no_content(&url, &body).await?;

        info!(group_id, owner_id, "Owner added");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_owner(&self, group_id: &str, owner_id: &str) -> DirectoryResult<()> {
        let url = format!(
            "{}/owners/{}/$ref",
            self.group_url(group_id),
            urlencoding::encode(owner_id)
        );

        self.client.delete(&url).await?;

        info!(group_id, owner_id, "Owner removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> GraphDirectory {
        let settings = DirectorySettings::default().with_graph_endpoint("https://graph.example.test");
        GraphDirectory::new(&settings, SecretString::from("token".to_string())).unwrap()
    }

    #[test]
    fn test_group_url() {
        assert_eq!(
            directory().group_url("0b6d4c4e-7f56-4a6c-9d3b-0f1a2b3c4d5e"),
            "https://graph.example.test/v1.0/groups/0b6d4c4e-7f56-4a6c-9d3b-0f1a2b3c4d5e"
        );
    }

    #[test]
    fn test_ids_are_escaped_in_paths() {
        assert_eq!(
            directory().group_url("a/../b"),
            "https://graph.example.test/v1.0/groups/a%2F..%2Fb"
        );
    }

    #[test]
    fn test_directory_object_url() {
        assert_eq!(
            directory().directory_object_url("u1"),
            "https://graph.example.test/v1.0/directoryObjects/u1"
        );
    }
}
