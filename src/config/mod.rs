//! Option resolution for a publish run
//!
//! Turns the raw command-line values into a validated [`UploadRequest`] plus
//! the [`ApiKey`] to send it with. Every check runs here, before any network
//! access; the first failing check aborts the run.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};
use crate::file_reader::{self, SearchRoots};
use crate::request::{Metadata, UpdateType, UploadRequest};

pub mod auth;
pub mod defaults;

pub use auth::{resolve_api_key, ApiKey, Environment, ProcessEnv};
pub use defaults::*;

/// Raw option values as given on the command line
///
/// Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOptions {
    /// `--api-key`
    pub api_key: Option<String>,
    /// `--changelog`
    pub changelog: Option<String>,
    /// `--changelog-file`
    pub changelog_file: Option<PathBuf>,
    /// `--metadata-json`
    pub metadata_json: Option<PathBuf>,
    /// `--archive`
    pub archive: Option<PathBuf>,
    /// `--update-type`
    pub update_type: String,
}

/// Outcome of option resolution
#[derive(Debug, Clone)]
pub struct ResolvedUpload {
    /// Credential for the request header
    pub api_key: ApiKey,
    /// The validated upload
    pub request: UploadRequest,
}

impl PublishOptions {
    /// Validate the options and load the files they point to
    ///
    /// # Errors
    ///
    /// - [`CliError::MissingCredential`] if no API key is available
    /// - [`CliError::MissingRequiredOption`] if archive, metadata or changelog is missing
    /// - [`CliError::FileNotFound`] / [`CliError::FileUnreadable`] for bad paths
    /// - [`CliError::InvalidMetadataJson`] if the metadata file is unusable
    /// - [`CliError::InvalidUpdateType`] if the update type is unknown
    pub fn resolve(&self, env: &impl Environment, roots: &SearchRoots) -> Result<ResolvedUpload> {
        let api_key = resolve_api_key(env, non_empty_str(self.api_key.as_ref()))?;

        let archive = required(self.archive.as_ref(), "--archive")?;
        let metadata_json = required(self.metadata_json.as_ref(), "--metadata-json")?;

        let changelog_file = non_empty_path(self.changelog_file.as_ref());
        let changelog = match (changelog_file, non_empty_str(self.changelog.as_ref())) {
            (Some(file), _) => file_reader::read_to_string(file, roots)?,
            (None, Some(text)) => text.to_string(),
            (None, None) => {
                return Err(CliError::MissingRequiredOption(
                    "--changelog or --changelog-file".to_string(),
                ))
            }
        };

        check_archive(archive)?;

        let metadata = Metadata::parse(&file_reader::read_to_string(metadata_json, roots)?)?;
        let update_type: UpdateType = self.update_type.parse()?;

        tracing::debug!(
            "resolved upload: archive={}, {} metadata field(s), update type {update_type}",
            archive.display(),
            metadata.len()
        );

        Ok(ResolvedUpload {
            api_key,
            request: UploadRequest {
                metadata,
                changelog,
                update_type,
                archive_path: archive.to_path_buf(),
            },
        })
    }
}

fn non_empty_str(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

fn non_empty_path(value: Option<&PathBuf>) -> Option<&Path> {
    value
        .map(PathBuf::as_path)
        .filter(|p| !p.as_os_str().is_empty())
}

fn required<'a>(value: Option<&'a PathBuf>, flag: &str) -> Result<&'a Path> {
    non_empty_path(value).ok_or_else(|| CliError::MissingRequiredOption(flag.to_string()))
}

/// The archive must exist and open for reading as a regular file
fn check_archive(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CliError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(CliError::FileUnreadable {
            path: path.to_path_buf(),
            reason: "not a regular file".to_string(),
        });
    }

    File::open(path)
        .map(drop)
        .map_err(|e| CliError::FileUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}
