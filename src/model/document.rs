use serde::Deserialize;
use serde_json::Value;

/// A document fetched from the remote store.
///
/// Properties keep the remote wire shape; the typed extractors below pull
/// out the handful of value kinds this tool reads. Unknown or differently
/// typed properties are simply ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, properties: serde_json::Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            properties,
        }
    }

    /// Plain text of a title property (first fragment only).
    pub fn title_text(&self, property: &str) -> Option<String> {
        let fragment = self.properties.get(property)?.get("title")?.as_array()?.first()?;
        fragment
            .get("plain_text")
            .and_then(Value::as_str)
            .or_else(|| {
                fragment
                    .get("text")
                    .and_then(|t| t.get("content"))
                    .and_then(Value::as_str)
            })
            .map(str::to_string)
    }

    /// Selected option name of a select property.
    pub fn select_name(&self, property: &str) -> Option<&str> {
        self.properties
            .get(property)?
            .get("select")?
            .get("name")?
            .as_str()
    }

    /// Identifiers held by a relation property, in stored order.
    ///
    /// A missing property reads as the empty relation.
    pub fn relation_ids(&self, property: &str) -> Vec<String> {
        self.properties
            .get(property)
            .and_then(|v| v.get("relation"))
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.get("id").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn checkbox(&self, property: &str) -> Option<bool> {
        self.properties.get(property)?.get("checkbox")?.as_bool()
    }

    pub fn number(&self, property: &str) -> Option<f64> {
        self.properties.get(property)?.get("number")?.as_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        let value = json!({
            "id": "page-1",
            "properties": {
                "Task": {"title": [{"plain_text": "Review notes", "text": {"content": "Review notes"}}]},
                "Priority": {"select": {"name": "Urgent"}},
                "Related Goals": {"relation": [{"id": "g-1"}, {"id": "g-2"}]},
                "Completed": {"checkbox": false},
                "Time Estimate": {"number": 45}
            }
        });
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn extracts_title_select_and_relation() {
        let doc = sample();
        assert_eq!(doc.title_text("Task").as_deref(), Some("Review notes"));
        assert_eq!(doc.select_name("Priority"), Some("Urgent"));
        assert_eq!(doc.relation_ids("Related Goals"), vec!["g-1", "g-2"]);
        assert_eq!(doc.checkbox("Completed"), Some(false));
        assert_eq!(doc.number("Time Estimate"), Some(45.0));
    }

    #[test]
    fn missing_relation_reads_as_empty() {
        let doc = sample();
        assert!(doc.relation_ids("Related Todos").is_empty());
        assert!(doc.select_name("Status").is_none());
    }

    #[test]
    fn title_falls_back_to_text_content() {
        let value = json!({
            "id": "page-2",
            "properties": {
                "Name": {"title": [{"text": {"content": "Athletics & Health"}}]}
            }
        });
        let doc: Document = serde_json::from_value(value).unwrap();
        assert_eq!(doc.title_text("Name").as_deref(), Some("Athletics & Health"));
    }
}
