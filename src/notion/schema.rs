//! Remote schema patching
//!
//! Adds the relation properties that tie the two collections together,
//! plus the goal-tracking properties on Todos. Re-sending an existing
//! property definition is accepted by the remote API, so the whole
//! operation can be re-run safely.

use super::NotionStore;
use crate::error::SyncResult;
use crate::model::fields;
use crate::store::Collection;
use serde_json::json;
use tracing::info;

impl NotionStore {
    /// Ensure both collections carry the relation and goal-tracking
    /// properties. Single-property relations: each side shows one field
    /// pointing at the opposite collection.
    pub async fn ensure_relation_properties(&self) -> SyncResult<()> {
        let goals_properties = json!({
            (fields::GOAL_RELATED_TODOS): {
                "relation": {
                    "database_id": self.database_id(Collection::Todos),
                    "single_property": {}
                }
            }
        });
        self.http()
            .patch(
                &format!("databases/{}", self.database_id(Collection::Goals)),
                &json!({ "properties": goals_properties }),
            )
            .await?;
        info!("added '{}' relation to Goals", fields::GOAL_RELATED_TODOS);

        let todos_properties = json!({
            (fields::TODO_RELATED_GOALS): {
                "relation": {
                    "database_id": self.database_id(Collection::Goals),
                    "single_property": {}
                }
            },
            (fields::TODO_IMPACT): {
                "select": {
                    "options": [
                        { "name": "High", "color": "red" },
                        { "name": "Medium", "color": "yellow" },
                        { "name": "Low", "color": "green" }
                    ]
                }
            },
            (fields::TODO_MILESTONE): { "checkbox": {} },
            (fields::TODO_CONTRIBUTION): { "number": { "format": "percent" } }
        });
        self.http()
            .patch(
                &format!("databases/{}", self.database_id(Collection::Todos)),
                &json!({ "properties": todos_properties }),
            )
            .await?;
        info!(
            "added '{}' relation and goal-tracking properties to Todos",
            fields::TODO_RELATED_GOALS
        );

        Ok(())
    }
}
