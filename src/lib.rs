#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

//! # Marketplace publisher
//!
//! Uploads a packaged extension, its product metadata and a changelog to the
//! marketplace API in a single multipart request, then reports the result.
//!
//! ## Architecture
//!
//! - **[`error`]** - Error types and exit codes
//! - **[`config`]** - Option validation, API key resolution and protocol constants
//! - **[`file_reader`]** - Path resolution and loading of changelog/metadata files
//! - **[`request`]** - Validated upload request and the form payload derived from it
//! - **[`client`]** - Blocking HTTP client for the upload endpoint
//! - **[`report`]** - Interpretation and rendering of the marketplace answer
//! - **[`publish`]** - The command itself: validate, send, report
//!
//! ## Quick Start
//!
//! ```bash
//! export MARKETPLACE_API_KEY=...
//! marketplace-publish --archive module.zip --metadata-json product.json \
//!     --changelog-file CHANGELOG.md --update-type updatemin
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod file_reader;
pub mod publish;
pub mod report;
pub mod request;
pub mod table;

#[cfg(test)]
mod test_support;

/// Error type alias for convenience
pub use error::{CliError, Result};

/// Options type alias for convenience
pub use config::PublishOptions;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = "marketplace-publish";
