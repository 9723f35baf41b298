extern crate tiny_crud_sqlite;

use serde_json::Value;
use tiny_crud_sqlite::database_init;
use tiny_crud_sqlite::database_init::SharedConnection;
use warp::http::StatusCode;
use warp::Filter;
use warp::Reply;

/// Fresh in-memory database per test, so tests can run in parallel.
pub fn new_database() -> SharedConnection {
    database_init::open_in_memory_database().expect("Failed to open in-memory database")
}

/// Send a request through the filter and decode the JSON answer.
/// An empty response body is returned as `Value::Null`.
#[allow(dead_code)]
pub async fn call<F>(api: &F, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value)
where
    F: Filter + 'static,
    F::Extract: Reply + Send,
{
    let mut request = warp::test::request().method(method).path(path);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.reply(api).await;
    let status = response.status();
    let json = if response.body().is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(response.body()).expect("Response body is not valid JSON")
    };
    (status, json)
}
