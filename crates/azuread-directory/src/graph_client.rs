//! Microsoft Graph API HTTP client.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{DirectoryError, DirectoryResult, DirectorySettings, RESOURCE_NOT_FOUND_CODE};

/// `OData` error response from Microsoft Graph.
#[derive(Debug, Deserialize)]
pub struct ODataError {
    pub error: ODataErrorBody,
}

/// `OData` error body.
#[derive(Debug, Deserialize)]
pub struct ODataErrorBody {
    pub code: String,
    pub message: String,
    #[serde(rename = "innerError")]
    pub inner_error: Option<serde_json::Value>,
}

/// Response wrapper for paginated Graph API responses.
#[derive(Debug, Deserialize)]
pub struct ODataResponse<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Microsoft Graph API client.
///
/// Every method issues exactly one request. Throttling and transient failures
/// are returned to the caller as errors.
#[derive(Debug)]
pub struct GraphClient {
    http_client: reqwest::Client,
    access_token: SecretString,
    base_url: String,
}

impl GraphClient {
    /// Creates a new Graph client.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the HTTP client cannot be created.
    pub fn new(settings: &DirectorySettings, access_token: SecretString) -> DirectoryResult<Self> {
        settings.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| DirectoryError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            access_token,
            base_url: settings.base_url(),
        })
    }

    /// Returns the base URL for Graph API requests.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs a GET request and decodes the JSON body.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> DirectoryResult<T> {
        let response = self.send(reqwest::Method::GET, url, None::<&()>).await?;
        response.json().await.map_err(DirectoryError::from)
    }

    /// Performs a POST request and decodes the JSON body.
    #[instrument(skip(self, body))]
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> DirectoryResult<T> {
        let response = self.send(reqwest::Method::POST, url, Some(body)).await?;
        response.json().await.map_err(DirectoryError::from)
    }

    /// Performs a POST request whose response has no body (`204 No Content`).
    #[instrument(skip(self, body))]
    pub async fn post_no_content<B: serde::Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> DirectoryResult<()> {
        self.send(reqwest::Method::POST, url, Some(body)).await?;
        Ok(())
    }

    /// Performs a DELETE request.
    #[instrument(skip(self))]
    pub async fn delete(&self, url: &str) -> DirectoryResult<()> {
        self.send(reqwest::Method::DELETE, url, None::<&()>).await?;
        Ok(())
    }

    /// Fetches one page of a collection.
    pub async fn get_page<T: DeserializeOwned>(&self, url: &str) -> DirectoryResult<ODataResponse<T>> {
        debug!("Fetching page: {}", url);
        self.get(url).await
    }

    async fn send<B: serde::Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&B>,
    ) -> DirectoryResult<reqwest::Response> {
        let mut request = self
            .http_client
            .request(method, url)
            .bearer_auth(self.access_token.expose_secret());

        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(error_from_response(status.as_u16(), &error_body))
    }
}

/// Maps a non-success Graph response onto a `DirectoryError`.
pub(crate) fn error_from_response(status: u16, body: &str) -> DirectoryError {
    let (code, message, inner_error) = match serde_json::from_str::<ODataError>(body) {
        Ok(odata) => (
            odata.error.code,
            odata.error.message,
            odata.error.inner_error.map(|v| v.to_string()),
        ),
        Err(_) => (status.to_string(), body.to_string(), None),
    };

    if status == 404 || code == RESOURCE_NOT_FOUND_CODE {
        return DirectoryError::NotFound(message);
    }
    if status == 403 {
        return DirectoryError::PermissionDenied(message);
    }

    DirectoryError::GraphApi {
        status,
        code,
        message,
        inner_error,
    }
}
