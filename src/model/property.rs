//! Builders for the remote property value shapes
//!
//! Each function returns the JSON value the remote API expects for one
//! property of the given kind. Writes replace the whole property value, so
//! relation builders always carry the complete identifier list.

use chrono::NaiveDate;
use serde_json::{Value, json};

pub fn title(text: &str) -> Value {
    json!({ "title": [{ "text": { "content": text } }] })
}

pub fn rich_text(text: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": text } }] })
}

pub fn select(name: &str) -> Value {
    json!({ "select": { "name": name } })
}

pub fn relation(ids: &[String]) -> Value {
    let entries: Vec<Value> = ids.iter().map(|id| json!({ "id": id })).collect();
    json!({ "relation": entries })
}

pub fn checkbox(value: bool) -> Value {
    json!({ "checkbox": value })
}

pub fn number(value: f64) -> Value {
    json!({ "number": value })
}

pub fn date(value: NaiveDate) -> Value {
    json!({ "date": { "start": value.to_string() } })
}
