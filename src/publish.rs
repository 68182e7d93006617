//! The publish command
//!
//! One invocation walks VALIDATING → SENDING → REPORTING once, in order:
//! options are resolved into an upload request, the request is optionally
//! displayed, sent, and the marketplace answer is rendered. Nothing is retried.

use std::io::Write;

use console::style;

use crate::client::MarketplaceClient;
use crate::config::{ApiKey, Environment, PublishOptions, ResolvedUpload, MARKETPLACE_URL};
use crate::error::{CliError, Result};
use crate::file_reader::SearchRoots;
use crate::report::UploadResult;
use crate::request::{Payload, UploadRequest};
use crate::table::Table;

/// Pre-flight inspection switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishFlags {
    /// Show the request and stop before sending it
    pub dry_run: bool,
    /// Show the request, then send it
    pub debug: bool,
}

/// Validate the options and upload the archive
///
/// Output for the operator goes to `out`. With `dry_run` set the request is
/// displayed and nothing is sent.
///
/// # Errors
///
/// - any validation error from [`PublishOptions::resolve`]
/// - [`CliError::Transport`] if the request could not be sent
/// - [`CliError::UpstreamFailure`] if the marketplace did not answer HTTP 200,
///   after its answer has been written to `out`
pub fn publish(
    options: &PublishOptions,
    flags: PublishFlags,
    env: &impl Environment,
    roots: &SearchRoots,
    out: &mut impl Write,
) -> Result<()> {
    let ResolvedUpload { api_key, request } = options.resolve(env, roots)?;
    let payload = request.payload();

    if flags.dry_run || flags.debug {
        display_request(out, &api_key, &request, &payload)?;
    }
    if flags.dry_run {
        tracing::info!("dry run, nothing sent");
        return Ok(());
    }

    let client = MarketplaceClient::new(api_key)?;
    send(&client, &request, &payload, out)
}

/// Send a validated request and report the answer
///
/// # Errors
///
/// See [`publish`].
pub fn send(
    client: &MarketplaceClient,
    request: &UploadRequest,
    payload: &Payload,
    out: &mut impl Write,
) -> Result<()> {
    let product = request
        .product_id()
        .map_or_else(|| "?".to_string(), |id| id.to_string());
    write!(
        out,
        "{} The archive ({}) for product #{product} is being uploaded... ",
        style("→").cyan(),
        request.update_type
    )?;
    out.flush()?;

    let response = match client.submit(payload, &request.archive_path) {
        Ok(response) => response,
        Err(e) => {
            writeln!(out, "{}", style("✗").red())?;
            return Err(e);
        }
    };
    writeln!(out, "{}", style("Done!").green())?;
    writeln!(out)?;

    let result = UploadResult::from_response(response);
    result.render(out)?;

    if result.is_accepted() {
        Ok(())
    } else {
        Err(CliError::UpstreamFailure {
            status: result.http_status,
        })
    }
}

fn display_request(
    out: &mut impl Write,
    api_key: &ApiKey,
    request: &UploadRequest,
    payload: &Payload,
) -> Result<()> {
    writeln!(out, "Marketplace endpoint: {MARKETPLACE_URL}")?;
    writeln!(out, "File to send: {}", request.archive_path.display())?;
    writeln!(out, "API Key: {}", api_key.masked())?;
    writeln!(out)?;

    Table::new("Key", "Value")
        .rows(payload.fields().iter().cloned())
        .render(out)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::API_KEY_ENV;
    use crate::test_support::one_shot_server;
    use reqwest::blocking::Client;
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("module.zip"), b"PK\x03\x04").unwrap();
            fs::write(
                dir.path().join("meta.json"),
                r#"{"id_product": 42, "name": "blockwishlist"}"#,
            )
            .unwrap();
            Self { dir }
        }

        fn roots(&self) -> SearchRoots {
            SearchRoots {
                cwd: self.dir.path().to_path_buf(),
                install_root: self.dir.path().to_path_buf(),
            }
        }

        fn options(&self) -> PublishOptions {
            PublishOptions {
                api_key: Some("flag-key-0123456789".to_string()),
                changelog: Some("Compatibility with 8.1".to_string()),
                changelog_file: None,
                metadata_json: Some(PathBuf::from("meta.json")),
                archive: Some(self.dir.path().join("module.zip")),
                update_type: "new".to_string(),
            }
        }

        fn request(&self) -> UploadRequest {
            self.options()
                .resolve(&HashMap::<String, String>::new(), &self.roots())
                .unwrap()
                .request
        }
    }

    fn local_client(url: &str) -> MarketplaceClient {
        let http = Client::builder().no_proxy().build().unwrap();
        MarketplaceClient::with_http(http, url, ApiKey::new("abc").unwrap())
    }

    #[test]
    fn test_dry_run_shows_request_without_sending() {
        let ws = Workspace::new();
        let env = HashMap::from([(API_KEY_ENV.to_string(), "env-key-abcdefgh".to_string())]);
        let flags = PublishFlags {
            dry_run: true,
            debug: false,
        };
        let mut out = Vec::new();

        publish(&ws.options(), flags, &env, &ws.roots(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains(&format!("Marketplace endpoint: {MARKETPLACE_URL}")));
        assert!(text.contains("module.zip"));
        assert!(text.contains("API Key: ************efgh"));
        assert!(text.contains("| id_product   | 42                     |"));
        assert!(text.contains("| type_upgrade | new                    |"));
        assert!(text.contains("| change_log   | Compatibility with 8.1 |"));
        assert!(!text.contains("being uploaded"));
    }

    #[test]
    fn test_validation_failure_stops_before_output() {
        let ws = Workspace::new();
        let options = PublishOptions {
            update_type: "patch".to_string(),
            ..ws.options()
        };
        let mut out = Vec::new();

        let err = publish(
            &options,
            PublishFlags::default(),
            &HashMap::<String, String>::new(),
            &ws.roots(),
            &mut out,
        )
        .unwrap_err();

        assert!(matches!(err, CliError::InvalidUpdateType { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_send_reports_success() {
        let ws = Workspace::new();
        let request = ws.request();
        let (url, server) = one_shot_server(
            "200 OK",
            r#"{"success": true, "productUpload": {"version": "1.2.0"}}"#,
        );
        let mut out = Vec::new();

        send(&local_client(&url), &request, &request.payload(), &mut out).unwrap();
        let _ = server.join().unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("The archive (new) for product #42 is being uploaded... "));
        assert!(text.contains("Done!"));
        assert!(text.contains("successfully uploaded"));
        assert!(text.contains("| version  | 1.2.0 |"));
    }

    #[test]
    fn test_send_rejected_upload() {
        let ws = Workspace::new();
        let request = ws.request();
        let body = r#"{"success": false, "error": "bad archive"}"#;
        let (url, server) = one_shot_server("422 Unprocessable Entity", body);
        let mut out = Vec::new();

        let err = send(&local_client(&url), &request, &request.payload(), &mut out).unwrap_err();
        let _ = server.join().unwrap();
        let text = String::from_utf8(out).unwrap();

        match err {
            CliError::UpstreamFailure { status } => assert_eq!(status, 422),
            other => panic!("expected UpstreamFailure, got {other}"),
        }
        assert!(text.ends_with(&format!("{body}\n")));
        assert!(!text.contains("successfully uploaded"));
    }
}
