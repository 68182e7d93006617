//! Command-line interface argument parsing
//!
//! Defines the single publish command and its options using Clap.

use std::path::PathBuf;

use clap::Parser;

use crate::config::PublishOptions;
use crate::publish::PublishFlags;

/// Marketplace publisher - upload an extension archive with its metadata and changelog
#[derive(Parser, Debug)]
#[command(name = "marketplace-publish")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Publish an extension to the marketplace")]
#[command(long_about = concat!(
    "Marketplace publisher (v", env!("CARGO_PKG_VERSION"), ")\n",
    "Uploads an extension archive together with its product metadata and changelog.\n\n",
    "Examples:\n",
    "  MARKETPLACE_API_KEY=... marketplace-publish --archive module.zip \\\n",
    "      --metadata-json product.json --changelog-file CHANGELOG.md --update-type updatemaj\n",
    "  marketplace-publish --api-key KEY --archive module.zip --metadata-json product.json \\\n",
    "      --changelog \"Fix hook registration\" --dry-run"
))]
pub struct Cli {
    /// API Key of the marketplace (optional if MARKETPLACE_API_KEY is set, which takes precedence)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Content of the changelog of the version to upload
    #[arg(long, value_name = "TEXT")]
    pub changelog: Option<String>,

    /// Path to the changelog of the version to upload (wins over --changelog)
    #[arg(long, value_name = "PATH")]
    pub changelog_file: Option<PathBuf>,

    /// Path to the JSON file describing the product
    #[arg(long, value_name = "PATH")]
    pub metadata_json: Option<PathBuf>,

    /// Path to the archive to upload
    #[arg(long, value_name = "PATH")]
    pub archive: Option<PathBuf>,

    /// Type of upgrade: updatemin, updatemaj or new
    #[arg(long, value_name = "TYPE", default_value = "updatemin")]
    pub update_type: String,

    /// Display the request that would be sent, without sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Display the request before sending it, with debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse command-line arguments
    ///
    /// # Returns
    ///
    /// Parsed CLI arguments
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Option values for validation
    #[must_use]
    pub fn options(&self) -> PublishOptions {
        PublishOptions {
            api_key: self.api_key.clone(),
            changelog: self.changelog.clone(),
            changelog_file: self.changelog_file.clone(),
            metadata_json: self.metadata_json.clone(),
            archive: self.archive.clone(),
            update_type: self.update_type.clone(),
        }
    }

    /// Pre-flight switches
    #[must_use]
    pub const fn flags(&self) -> PublishFlags {
        PublishFlags {
            dry_run: self.dry_run,
            debug: self.debug,
        }
    }
}
