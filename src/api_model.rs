use crate::constants;
use crate::database_api::DBTime;
use crate::database_api::ItemId;
use crate::database_api::ItemRecord;
use crate::error::Error;
use crate::error::Result;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Public JSON shape of an item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub created_at: DBTime,
    pub updated_at: DBTime,
}

impl From<ItemRecord> for ItemDto {
    fn from(record: ItemRecord) -> Self {
        ItemDto {
            id: record.id,
            name: record.name,
            description: record.description,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Validated body of `POST /items` and `PUT /items/:id`.
#[derive(Debug, PartialEq, Eq)]
pub struct ItemInput {
    pub name: String,
    pub description: String,
}

impl ItemInput {
    /// Parse and validate a raw request body.
    ///
    /// An empty body counts as `{}`. `name` must be a non-empty string.
    /// `description` may be absent or `null` (stored as `""`), otherwise it must be a string.
    pub fn from_body(body: &[u8]) -> Result<ItemInput> {
        let json: Value = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(body)?
        };
        ItemInput::from_json(&json)
    }

    pub fn from_json(json: &Value) -> Result<ItemInput> {
        let name = match json.get("name") {
            Some(Value::String(name)) if !name.is_empty() => name.clone(),
            _ => return Err(Error::bad_request(constants::NAME_REQUIRED_MSG)),
        };
        let description = match json.get("description") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(description)) => description.clone(),
            Some(_) => return Err(Error::bad_request(constants::DESCRIPTION_NOT_STRING_MSG)),
        };
        Ok(ItemInput { name, description })
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `GET /`, a liveness and discovery probe.
#[derive(Serialize, Debug)]
pub struct ServiceInfo {
    pub ok: bool,
    pub service: &'static str,
    pub endpoints: &'static [&'static str],
}
