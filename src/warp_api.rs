use crate::api_model::ErrorResponse;
use crate::command_line_interface::CliOptions;
use crate::constants;
use crate::database_api::ItemId;
use crate::database_init::SharedConnection;
use crate::error::Error;
use crate::error::Result;
use crate::warp_endpoints;
use bytes::Bytes;
use log::error;
use log::info;
use serde::Serialize;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reject::MethodNotAllowed;
use warp::Filter;
use warp::Rejection;
use warp::Reply;

/// Start web framework with specified APIs, until Ctrl+C or SIGTERM is received.
pub async fn run_server(cli_options: &CliOptions, conn: SharedConnection) -> Result<()> {
    let package_name = env!("CARGO_PKG_NAME").to_uppercase();
    info!("Starting {} HTTP server", package_name);

    let addr = cli_options.socket_addr();
    let (bound, server) = warp::serve(routes(conn))
        .try_bind_with_graceful_shutdown(addr, shutdown_signal())
        .map_err(|err| Error {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            msg: format!("Failed to listen on {}, {}", addr, err),
        })?;
    info!("Tiny CRUD running on http://{}", bound);
    server.await;
    info!("Server shutdown complete");
    Ok(())
}

/// All routes of the service, with JSON error replies for unmatched requests.
pub fn routes(
    conn: SharedConnection,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    // Liveness/discovery probe.
    let service_info = warp::path::end()
        .and(warp::get())
        .map(|| Box::new(warp::reply::json(&warp_endpoints::service_info())) as Box<dyn Reply>);

    // GET all items, most recently created first.
    let conn_ref = conn.clone();
    let list_items = warp::path!("items").and(warp::get()).map(move || {
        let result = warp_endpoints::list_items(&conn_ref);
        reply_json(result, StatusCode::OK)
    });

    // GET a single item.
    // Parameter:
    //     id: id of requested item, signed 8-byte (64bit) integer.
    // Ids that don't parse as integers do not match, and end up as 404 as well.
    let conn_ref = conn.clone();
    let get_item = warp::path!("items" / ItemId)
        .and(warp::get())
        .map(move |id: ItemId| {
            let result = warp_endpoints::get_item(&conn_ref, id);
            reply_json(result, StatusCode::OK)
        });

    // POST a new item.
    // Input: json with "name" (required) and "description" (optional).
    // Return the created item, including its generated id and timestamps.
    let conn_ref = conn.clone();
    let create_item = warp::path!("items")
        .and(warp::post())
        .and(warp::body::bytes())
        .map(move |body: Bytes| {
            let result = warp_endpoints::create_item(&conn_ref, &body);
            reply_json(result, StatusCode::CREATED)
        });

    // PUT (full update) a single item, same body as POST.
    let conn_ref = conn.clone();
    let update_item = warp::path!("items" / ItemId)
        .and(warp::put())
        .and(warp::body::bytes())
        .map(move |id: ItemId, body: Bytes| {
            let result = warp_endpoints::update_item(&conn_ref, id, &body);
            reply_json(result, StatusCode::OK)
        });

    // DELETE a single item, replying with an empty body.
    let conn_ref = conn;
    let delete_item = warp::path!("items" / ItemId)
        .and(warp::delete())
        .map(move |id: ItemId| {
            let boxed: Box<dyn Reply> = match warp_endpoints::delete_item(&conn_ref, id) {
                Ok(()) => Box::new(StatusCode::NO_CONTENT),
                Err(err) => error_reply(err),
            };
            boxed
        });

    service_info
        .or(list_items)
        .or(get_item)
        .or(create_item)
        .or(update_item)
        .or(delete_item)
        .recover(handle_rejection)
        .with(warp::log("tiny_crud_sqlite::access"))
}

fn reply_json<T: Serialize>(result: Result<T>, success: StatusCode) -> Box<dyn Reply> {
    match result {
        Ok(value) => Box::new(warp::reply::with_status(warp::reply::json(&value), success)),
        Err(err) => error_reply(err),
    }
}

/// Client errors are sent as is. Server errors are logged,
/// and the client only gets a generic message.
fn error_reply(err: Error) -> Box<dyn Reply> {
    let msg = if err.code.is_server_error() {
        error!("{}", err);
        constants::INTERNAL_ERROR_MSG.to_string()
    } else {
        err.msg
    };
    Box::new(error_json(msg, err.code))
}

fn error_json(error: String, code: StatusCode) -> impl Reply {
    warp::reply::with_status(warp::reply::json(&ErrorResponse { error }), code)
}

async fn handle_rejection(
    rejection: Rejection,
) -> std::result::Result<impl Reply, Infallible> {
    let (code, msg) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, constants::NOT_FOUND_MSG)
    } else if rejection.find::<MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, constants::METHOD_NOT_ALLOWED_MSG)
    } else {
        error!("Unhandled rejection {:?}", rejection);
        (StatusCode::INTERNAL_SERVER_ERROR, constants::INTERNAL_ERROR_MSG)
    };
    Ok(error_json(msg.to_string(), code))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C, {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM, {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
