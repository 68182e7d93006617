//! Fixed values of the marketplace protocol and client defaults

/// Marketplace upload endpoint
pub const MARKETPLACE_URL: &str = "https://api.addons.prestashop.com/request/index.php";

/// Query parameter selecting the upload operation
pub const UPLOAD_METHOD: (&str, &str) = ("method", "module_push");

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "api-key";

/// Environment variable holding the API key (takes precedence over `--api-key`)
pub const API_KEY_ENV: &str = "MARKETPLACE_API_KEY";

/// Multipart field holding the archive
pub const ARCHIVE_FIELD: &str = "zip";

/// Payload field holding the update type
pub const UPDATE_TYPE_FIELD: &str = "type_upgrade";

/// Payload field holding the changelog text
pub const CHANGELOG_FIELD: &str = "change_log";

/// Metadata field identifying the product in progress messages
pub const PRODUCT_ID_FIELD: &str = "id_product";

/// Default request timeout in seconds
pub const fn default_timeout() -> u64 {
    300 // 5 minutes, archives can be large
}

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
