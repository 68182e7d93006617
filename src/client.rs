//! Marketplace HTTP client
//!
//! Sends one upload as a `multipart/form-data` POST. The response is handed
//! back untouched; interpreting it is the job of [`crate::report`].

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;

use crate::config::{
    default_timeout, ApiKey, API_KEY_HEADER, ARCHIVE_FIELD, DEFAULT_CONNECT_TIMEOUT_SECS,
    MARKETPLACE_URL, UPLOAD_METHOD,
};
use crate::error::{CliError, Result};
use crate::request::Payload;

/// Status and body of a marketplace response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

/// Blocking client for the marketplace upload endpoint
#[derive(Debug)]
pub struct MarketplaceClient {
    http: Client,
    endpoint: String,
    api_key: ApiKey,
}

/// Build the HTTP client used for uploads
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn create_upload_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("marketplace-publish/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(default_timeout()))
        .build()
        .map_err(|e| CliError::Transport(format!("failed to create HTTP client: {e}")))
}

impl MarketplaceClient {
    /// Client for the public marketplace endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(api_key: ApiKey) -> Result<Self> {
        Ok(Self::with_http(create_upload_client()?, MARKETPLACE_URL, api_key))
    }

    pub(crate) fn with_http(http: Client, endpoint: &str, api_key: ApiKey) -> Self {
        Self {
            http,
            endpoint: endpoint.to_string(),
            api_key,
        }
    }

    /// Endpoint uploads are sent to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload `archive` with the payload fields
    ///
    /// The archive goes first under the `zip` field, followed by one text part
    /// per payload field. Any HTTP status is returned as-is.
    ///
    /// # Errors
    ///
    /// - [`CliError::FileUnreadable`] if the archive can no longer be opened
    /// - [`CliError::Transport`] on network, DNS or TLS failure
    pub fn submit(&self, payload: &Payload, archive: &Path) -> Result<RawResponse> {
        let form = build_form(payload, archive)?;

        tracing::debug!(
            "POST {}?{}={} with {} field(s)",
            self.endpoint,
            UPLOAD_METHOD.0,
            UPLOAD_METHOD.1,
            payload.fields().len()
        );

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[UPLOAD_METHOD])
            .header(API_KEY_HEADER, self.api_key.expose())
            .multipart(form)
            .send()?;

        let status = response.status().as_u16();
        let body = response.text()?;
        tracing::debug!("marketplace answered HTTP {status} ({} bytes)", body.len());

        Ok(RawResponse { status, body })
    }
}

fn build_form(payload: &Payload, archive: &Path) -> Result<Form> {
    let archive_part = Part::file(archive).map_err(|e| CliError::FileUnreadable {
        path: archive.to_path_buf(),
        reason: e.to_string(),
    })?;

    let form = Form::new().part(ARCHIVE_FIELD, archive_part);
    Ok(payload
        .fields()
        .iter()
        .fold(form, |form, (key, value)| form.text(key.clone(), value.clone())))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::test_support::one_shot_server;
    use std::fs;
    use std::net::TcpListener;
    use tempfile::TempDir;

    fn test_client(endpoint: &str, key: &str) -> MarketplaceClient {
        let http = Client::builder().no_proxy().build().unwrap();
        MarketplaceClient::with_http(http, endpoint, ApiKey::new(key).unwrap())
    }

    fn payload() -> Payload {
        Payload::default()
            .with("id_product", "42")
            .with("type_upgrade", "new")
            .with("change_log", "Fixed the cart hook")
    }

    #[test]
    fn test_default_endpoint() {
        let client = MarketplaceClient::new(ApiKey::new("abc").unwrap()).unwrap();
        assert_eq!(client.endpoint(), MARKETPLACE_URL);
    }

    #[test]
    fn test_submit_sends_multipart_upload() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("blockwishlist.zip");
        fs::write(&archive, b"PK\x03\x04fake-archive-bytes").unwrap();

        let (url, server) = one_shot_server(
            "200 OK",
            r#"{"success":true,"productUpload":{"version":"1.2.0"}}"#,
        );
        let response = test_client(&url, "secret-key").submit(&payload(), &archive).unwrap();
        let request = String::from_utf8_lossy(&server.join().unwrap()).into_owned();

        assert_eq!(response.status, 200);
        assert!(response.body.contains("productUpload"));

        assert!(request.starts_with("POST /request/index.php?method=module_push HTTP/1.1\r\n"));
        assert!(request.to_ascii_lowercase().contains("api-key: secret-key\r\n"));
        assert!(request.to_ascii_lowercase().contains("content-type: multipart/form-data; boundary="));
        assert!(request.contains("name=\"zip\"; filename=\"blockwishlist.zip\""));
        assert!(request.contains("fake-archive-bytes"));
        assert!(request.contains("name=\"id_product\"\r\n\r\n42\r\n"));
        assert!(request.contains("name=\"type_upgrade\"\r\n\r\nnew\r\n"));
        assert!(request.contains("name=\"change_log\"\r\n\r\nFixed the cart hook\r\n"));

        let zip_at = request.find("name=\"zip\"").unwrap();
        let id_at = request.find("name=\"id_product\"").unwrap();
        assert!(zip_at < id_at);
    }

    #[test]
    fn test_submit_returns_error_status_untouched() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("module.zip");
        fs::write(&archive, b"zip").unwrap();

        let (url, server) = one_shot_server(
            "422 Unprocessable Entity",
            r#"{"success": false, "error": "bad archive"}"#,
        );
        let response = test_client(&url, "k").submit(&payload(), &archive).unwrap();
        let _ = server.join().unwrap();

        assert_eq!(response.status, 422);
        assert_eq!(response.body, r#"{"success": false, "error": "bad archive"}"#);
    }

    #[test]
    fn test_connection_refused_is_transport_error() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("module.zip");
        fs::write(&archive, b"zip").unwrap();

        // bind then drop to get a port nothing listens on
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}/request/index.php");

        let err = test_client(&url, "k").submit(&payload(), &archive).unwrap_err();
        assert!(matches!(err, CliError::Transport(_)));
    }

    #[test]
    fn test_vanished_archive() {
        let dir = TempDir::new().unwrap();
        let err = build_form(&payload(), &dir.path().join("gone.zip")).unwrap_err();
        assert!(matches!(err, CliError::FileUnreadable { .. }));
    }
}
