use crate::api_model::ItemDto;
use crate::api_model::ItemInput;
use crate::api_model::ServiceInfo;
use crate::constants;
use crate::database_api;
use crate::database_api::ItemId;
use crate::error::Error;
use crate::error::Result;
use rusqlite::Connection;
use rusqlite::Transaction;
use std::sync::Mutex;

pub fn list_items(conn: &Mutex<Connection>) -> Result<Vec<ItemDto>> {
    let items = in_transaction(conn, database_api::list_items)?;
    Ok(items.into_iter().map(ItemDto::from).collect())
}

pub fn get_item(conn: &Mutex<Connection>, id: ItemId) -> Result<ItemDto> {
    in_transaction(conn, |tx| database_api::get_item(tx, id)).map(ItemDto::from)
}

pub fn create_item(conn: &Mutex<Connection>, body: &[u8]) -> Result<ItemDto> {
    let input = ItemInput::from_body(body)?;
    in_transaction(conn, |tx| {
        database_api::insert_item(tx, &input.name, &input.description)
    })
    .map(ItemDto::from)
}

pub fn update_item(conn: &Mutex<Connection>, id: ItemId, body: &[u8]) -> Result<ItemDto> {
    let input = ItemInput::from_body(body)?;
    in_transaction(conn, |tx| {
        database_api::update_item(tx, id, &input.name, &input.description)
    })
    .map(ItemDto::from)
}

pub fn delete_item(conn: &Mutex<Connection>, id: ItemId) -> Result<()> {
    let removed = in_transaction(conn, |tx| database_api::delete_item(tx, id))?;
    if removed == 0 {
        Err(Error::not_found())
    } else {
        Ok(())
    }
}

pub fn service_info() -> ServiceInfo {
    ServiceInfo {
        ok: true,
        service: constants::SERVICE_NAME,
        endpoints: constants::ENDPOINTS,
    }
}

//
// helper functions:
//

/// Lock the shared connection and run `func` in a transaction,
/// committing only if it succeeded (the transaction rolls back on drop otherwise).
fn in_transaction<T, F: FnOnce(&Transaction) -> Result<T>>(
    conn: &Mutex<Connection>,
    func: F,
) -> Result<T> {
    let mut conn = conn.lock()?;
    let tx = conn.transaction()?;
    let result = func(&tx)?;
    tx.commit()?;
    Ok(result)
}
