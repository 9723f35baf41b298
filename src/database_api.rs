use crate::constants;
use crate::error::Error;
use crate::error::ErrorContext;
use crate::error::Result;
use chrono::Utc;
use log::debug;
use rusqlite::params;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction as Tx;

pub type ItemId = i64;
pub type DBTime = String;

/// An `items` row exactly as stored, with storage column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub created_at: DBTime,
    pub updated_at: DBTime,
}

impl ItemRecord {
    fn from_row(row: &Row) -> rusqlite::Result<ItemRecord> {
        Ok(ItemRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

const SELECT_ITEM_COLUMNS: &str = "SELECT id, name, description, created_at, updated_at FROM items";

/// Current UTC time in the text format stored in `created_at`/`updated_at`.
pub fn current_db_time() -> DBTime {
    Utc::now().format(constants::TIMESTAMP_FORMAT).to_string()
}

/// All items, most recently created first.
pub fn list_items(tx: &Tx) -> Result<Vec<ItemRecord>> {
    let sql = format!("{} ORDER BY id DESC;", SELECT_ITEM_COLUMNS);
    let mut stmt = tx.prepare_cached(&sql)?;
    let rows = stmt.query_map([], ItemRecord::from_row)?;
    let mut result = Vec::new();
    for row in rows {
        result.push(row?);
    }
    debug!("Listed {} items", result.len());
    Ok(result)
}

pub fn get_item(tx: &Tx, id: ItemId) -> Result<ItemRecord> {
    debug!("Getting item {}", id);
    let sql = format!("{} WHERE id = ?;", SELECT_ITEM_COLUMNS);
    let mut stmt = tx.prepare_cached(&sql)?;
    stmt.query_row(params![id], ItemRecord::from_row)
        .optional()
        .context(|| format!("Failed to read item {}", id))?
        .ok_or_else(Error::not_found)
}

/// Insert a new item. Both timestamps get the same value, the id is assigned by SQLite.
pub fn insert_item(tx: &Tx, name: &str, description: &str) -> Result<ItemRecord> {
    let now = current_db_time();
    let mut stmt = tx
        .prepare_cached(
            "INSERT INTO items (name, description, created_at, updated_at) VALUES (?, ?, ?, ?);",
        )
        .context_str("Failed to prepare/compile INSERT statement")?;
    let id = stmt
        .insert(params![name, description, now, now])
        .context_str("Failed to execute insert_item with parameters")?;
    debug!("Inserted item {}", id);
    get_item(tx, id)
}

/// Overwrite name and description, refreshing `updated_at` in the same statement.
/// `updated_at` never drops below `created_at`, even if the wall clock went backwards.
pub fn update_item(tx: &Tx, id: ItemId, name: &str, description: &str) -> Result<ItemRecord> {
    let now = current_db_time();
    let mut stmt = tx
        .prepare_cached(
            "UPDATE items SET name = ?, description = ?, updated_at = max(created_at, ?) \
            WHERE id = ?;",
        )
        .context_str("Failed to prepare/compile UPDATE statement")?;
    let changed = stmt
        .execute(params![name, description, now, id])
        .context(|| format!("Failed to execute update_item for item {}", id))?;
    debug!("Updated item {}, {} row(s) changed", id, changed);
    if changed == 0 {
        return Err(Error::not_found());
    }
    get_item(tx, id)
}

/// Hard delete. Returns the number of removed rows, 0 if the item did not exist.
pub fn delete_item(tx: &Tx, id: ItemId) -> Result<usize> {
    let mut stmt = tx.prepare_cached("DELETE FROM items WHERE id = ?;")?;
    let removed = stmt
        .execute(params![id])
        .context(|| format!("Failed to execute delete_item for item {}", id))?;
    debug!("Deleted item {}, {} row(s) removed", id, removed);
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::super::database_init;
    use super::super::error::Result;
    use super::*;
    use rusqlite::Connection;
    use warp::http::StatusCode;

    fn new_conn() -> Connection {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        database_init::init_schema(&conn).expect("Failed to create schema");
        conn
    }

    #[test]
    fn test_insert_item() -> Result<()> {
        let mut conn = new_conn();
        let tx = conn.transaction()?;
        let item = insert_item(&tx, "first", "")?;
        assert_eq!(item.name, "first");
        assert_eq!(item.description, "");
        assert_eq!(item.created_at, item.updated_at);
        assert_eq!(get_item(&tx, item.id)?, item);
        Ok(())
    }

    #[test]
    fn test_list_newest_first() -> Result<()> {
        let mut conn = new_conn();
        let tx = conn.transaction()?;
        assert!(list_items(&tx)?.is_empty());
        let a = insert_item(&tx, "A", "")?;
        let b = insert_item(&tx, "B", "")?;
        let c = insert_item(&tx, "C", "")?;
        let ids: Vec<ItemId> = list_items(&tx)?.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
        Ok(())
    }

    #[test]
    fn test_get_missing_item() -> Result<()> {
        let mut conn = new_conn();
        let tx = conn.transaction()?;
        let err = get_item(&tx, 42).unwrap_err();
        assert_eq!(err.code, StatusCode::NOT_FOUND);
        assert_eq!(err.msg, "Not found");
        Ok(())
    }

    #[test]
    fn test_update_item() -> Result<()> {
        let mut conn = new_conn();
        let tx = conn.transaction()?;
        let item = insert_item(&tx, "old", "old description")?;
        tx.execute(
            "UPDATE items SET created_at = ?, updated_at = ? WHERE id = ?;",
            params!["2000-01-01 00:00:00", "2000-01-01 00:00:00", item.id],
        )?;

        let updated = update_item(&tx, item.id, "new", "")?;
        assert_eq!(updated.id, item.id);
        assert_eq!(updated.name, "new");
        assert_eq!(updated.description, "");
        assert_eq!(updated.created_at, "2000-01-01 00:00:00");
        assert!(updated.updated_at > updated.created_at);
        Ok(())
    }

    #[test]
    fn test_update_never_precedes_creation() -> Result<()> {
        let mut conn = new_conn();
        let tx = conn.transaction()?;
        let item = insert_item(&tx, "from the future", "")?;
        tx.execute(
            "UPDATE items SET created_at = ?, updated_at = ? WHERE id = ?;",
            params!["2999-01-01 00:00:00", "2999-01-01 00:00:00", item.id],
        )?;

        let updated = update_item(&tx, item.id, "renamed", "")?;
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.created_at, "2999-01-01 00:00:00");
        assert_eq!(updated.updated_at, updated.created_at);
        Ok(())
    }

    #[test]
    fn test_update_missing_item() -> Result<()> {
        let mut conn = new_conn();
        let tx = conn.transaction()?;
        let err = update_item(&tx, 7, "name", "").unwrap_err();
        assert_eq!(err.code, StatusCode::NOT_FOUND);
        assert!(list_items(&tx)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_delete_item() -> Result<()> {
        let mut conn = new_conn();
        let tx = conn.transaction()?;
        let item = insert_item(&tx, "doomed", "")?;
        assert_eq!(delete_item(&tx, item.id)?, 1);
        assert_eq!(delete_item(&tx, item.id)?, 0);
        assert_eq!(get_item(&tx, item.id).unwrap_err().code, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[test]
    fn test_ids_not_reused_after_delete() -> Result<()> {
        let mut conn = new_conn();
        let tx = conn.transaction()?;
        let first = insert_item(&tx, "first", "")?;
        delete_item(&tx, first.id)?;
        let second = insert_item(&tx, "second", "")?;
        assert!(second.id > first.id);
        Ok(())
    }

    #[test]
    fn test_current_db_time_format() {
        let now = current_db_time();
        assert_eq!(now.len(), "2021-01-01 00:00:00".len());
        assert_eq!(&now[4..5], "-");
        assert_eq!(&now[10..11], " ");
    }
}
