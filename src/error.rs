use crate::constants;
use warp::http::status::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq, Eq)]
pub struct Error {
    pub code: StatusCode,
    pub msg: String,
}

impl Error {
    pub fn not_found() -> Error {
        Error {
            code: StatusCode::NOT_FOUND,
            msg: constants::NOT_FOUND_MSG.to_string(),
        }
    }

    pub fn bad_request(msg: &str) -> Error {
        Error {
            code: StatusCode::BAD_REQUEST,
            msg: msg.to_string(),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let canon = self.code.canonical_reason().unwrap_or("");
        write!(f, "Error {} {}, {}", self.code.as_str(), canon, self.msg)
    }
}

impl std::error::Error for Error {}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Error {
        let msg = format!("Database rusqlite error {}", err);
        Error {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            msg,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        let msg = format!("Invalid JSON in request body, {}", err);
        Error {
            code: StatusCode::BAD_REQUEST,
            msg,
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(err: std::sync::PoisonError<T>) -> Error {
        let msg = format!(
            "Failed to acquire database lock because it was poisoned {}",
            err
        );
        Error {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            msg,
        }
    }
}

pub trait ErrorContext<T> {
    fn context<F>(self, context_add: F) -> Result<T>
    where
        F: FnOnce() -> String;
    fn context_str(self, context_add: &str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context<F>(self, context_add: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| append_context(err.into(), &context_add()))
    }
    fn context_str(self, context_add: &str) -> Result<T> {
        self.map_err(|err| append_context(err.into(), context_add))
    }
}

fn append_context(err: Error, context_add: &str) -> Error {
    let code = err.code;
    let mut msg = err.msg;
    msg.push_str(", ");
    msg.push_str(context_add);
    Error { code, msg }
}
