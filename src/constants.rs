// Constants used in the project. These are "convention over configuration" for now.

pub const SERVICE_NAME: &str = "tiny-crud-sqlite";

/// Top-level paths advertised by the service descriptor at `GET /`.
pub const ENDPOINTS: &[&str] = &["/items"];

/// Format of `created_at`/`updated_at`, identical to what SQLite's `datetime('now')` produces.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const NOT_FOUND_MSG: &str = "Not found";
pub const NAME_REQUIRED_MSG: &str = "Field \"name\" is required (string).";
pub const DESCRIPTION_NOT_STRING_MSG: &str = "Field \"description\" must be a string.";
pub const METHOD_NOT_ALLOWED_MSG: &str = "Method not allowed";
pub const INTERNAL_ERROR_MSG: &str = "Internal server error";
