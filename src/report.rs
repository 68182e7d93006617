//! Result reporting
//!
//! A response counts as a successful upload only when its body is a JSON
//! object with `"success": true`. Anything else is shown to the operator
//! verbatim. The exit code depends on the HTTP status alone.

use std::io::{self, Write};

use console::style;
use serde_json::{Map, Value};

use crate::client::RawResponse;
use crate::table::Table;

/// What the marketplace answered
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// `success: true`, with the `productUpload` record
    Success(Map<String, Value>),
    /// Anything else, kept as received
    Raw(String),
}

/// Interpreted response of one upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    /// HTTP status code
    pub http_status: u16,
    /// Parsed or raw body
    pub body: ResponseBody,
}

impl UploadResult {
    /// Interpret a raw response; never fails
    #[must_use]
    pub fn from_response(response: RawResponse) -> Self {
        let body = match serde_json::from_str::<Value>(&response.body) {
            Ok(Value::Object(mut object)) if object.get("success") == Some(&Value::Bool(true)) => {
                match object.remove("productUpload") {
                    Some(Value::Object(record)) => ResponseBody::Success(record),
                    _ => ResponseBody::Success(Map::new()),
                }
            }
            _ => ResponseBody::Raw(response.body),
        };

        Self {
            http_status: response.status,
            body,
        }
    }

    /// Whether the body reported `success: true`
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.body, ResponseBody::Success(_))
    }

    /// Whether the marketplace accepted the request (HTTP 200)
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        self.http_status == 200
    }

    /// Process exit code for this result
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.is_accepted() {
            0
        } else {
            1
        }
    }

    /// Write the result for the operator
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        match &self.body {
            ResponseBody::Raw(text) => writeln!(out, "{text}"),
            ResponseBody::Success(record) => {
                writeln!(
                    out,
                    "{}",
                    style("[OK] The archive has been successfully uploaded.")
                        .green()
                        .bold()
                )?;
                writeln!(out)?;
                writeln!(out, "Product upload details:")?;
                Table::new("Property", "Value")
                    .rows(record.iter().map(|(k, v)| (k.clone(), display_value(v))))
                    .render(out)
            }
        }
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
