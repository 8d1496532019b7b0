//! Bidirectional relation reconciliation between Goals and Todos
//!
//! The remote store replaces whole property values on write and offers no
//! field-level append or compare-and-swap. Every link therefore follows the
//! same shape: fetch both sides, merge the counterpart identifier into each
//! existing relation list, and patch back only the sides that changed. A
//! concurrent writer touching the same relation property between our fetch
//! and our patch can be lost; the remote API gives us nothing to detect
//! that with, so the window is documented here rather than papered over.

use crate::error::{Side, SyncError, SyncResult};
use crate::model::{Document, ProgressImpact, TodoPriority, fields, property};
use crate::store::{Collection, PageStore, PropertyMap};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Caller-supplied knobs for the goal-tracking properties written at link
/// time. Impact is not here: it is always derived from the todo's priority.
#[derive(Debug, Clone, Copy)]
pub struct LinkOptions {
    pub milestone: bool,
    pub contribution: i64,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            milestone: false,
            contribution: 15,
        }
    }
}

/// Result of one successful `link` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// At least one side was written.
    Created,
    /// Both sides already held the link; nothing was sent.
    AlreadyLinked,
}

/// Outcome of a `repair` pass.
#[derive(Debug, Default)]
pub struct RepairReport {
    /// Todo->Goal references that were checked.
    pub checked: usize,
    /// Goal-side back-links that were written.
    pub repaired: usize,
    pub failed: Vec<RepairFailure>,
}

#[derive(Debug)]
pub struct RepairFailure {
    pub goal_id: String,
    pub todo_id: String,
    pub reason: String,
}

impl RepairReport {
    /// True when every checked reference was already symmetric.
    pub fn converged(&self) -> bool {
        self.repaired == 0 && self.failed.is_empty()
    }
}

/// Merge a counterpart identifier into an existing relation list.
///
/// Returns the new list only when a write is needed; existing entries keep
/// their stored order and are never dropped.
fn merge_relation(existing: &[String], counterpart: &str) -> Option<Vec<String>> {
    if existing.iter().any(|id| id == counterpart) {
        return None;
    }
    let mut merged = existing.to_vec();
    merged.push(counterpart.to_string());
    Some(merged)
}

pub struct Reconciler<'a, S: PageStore> {
    store: &'a S,
}

impl<'a, S: PageStore> Reconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Ensure the goal and the todo reference each other exactly once.
    ///
    /// Both documents must already exist; if either fetch fails the
    /// operation fails before any write. The todo side is written first so
    /// that a failure on the goal side leaves the todo->goal direction
    /// intact for a later `repair` pass; that case surfaces as
    /// `SyncError::PartialLink`, never as success.
    pub async fn link(
        &self,
        goal_id: &str,
        todo_id: &str,
        options: &LinkOptions,
    ) -> SyncResult<LinkOutcome> {
        let goal = self.store.fetch(Collection::Goals, goal_id).await?;
        let todo = self.store.fetch(Collection::Todos, todo_id).await?;

        let goal_links = goal.relation_ids(fields::GOAL_RELATED_TODOS);
        let todo_links = todo.relation_ids(fields::TODO_RELATED_GOALS);

        let merged_goal_side = merge_relation(&goal_links, todo_id);
        let merged_todo_side = merge_relation(&todo_links, goal_id);

        if merged_goal_side.is_none() && merged_todo_side.is_none() {
            debug!(goal_id, todo_id, "already linked on both sides");
            return Ok(LinkOutcome::AlreadyLinked);
        }

        let mut todo_written = false;
        if let Some(ids) = &merged_todo_side {
            let mut properties = PropertyMap::new();
            properties.insert(fields::TODO_RELATED_GOALS.to_string(), property::relation(ids));
            // Goal-tracking properties are set once, when the link lands on
            // the todo, and not re-derived afterwards.
            let priority = todo
                .select_name(fields::TODO_PRIORITY)
                .and_then(|name| name.parse::<TodoPriority>().ok())
                .unwrap_or_default();
            properties.insert(
                fields::TODO_IMPACT.to_string(),
                property::select(ProgressImpact::from_priority(priority).as_str()),
            );
            properties.insert(
                fields::TODO_MILESTONE.to_string(),
                property::checkbox(options.milestone),
            );
            properties.insert(
                fields::TODO_CONTRIBUTION.to_string(),
                property::number(options.contribution as f64),
            );
            self.store
                .patch(Collection::Todos, todo_id, properties)
                .await?;
            todo_written = true;
        }

        if let Some(ids) = &merged_goal_side {
            let mut properties = PropertyMap::new();
            properties.insert(fields::GOAL_RELATED_TODOS.to_string(), property::relation(ids));
            self.store
                .patch(Collection::Goals, goal_id, properties)
                .await
                .map_err(|source| {
                    if todo_written {
                        SyncError::PartialLink {
                            goal_id: goal_id.to_string(),
                            todo_id: todo_id.to_string(),
                            side: Side::Goal,
                            source: Box::new(source),
                        }
                    } else {
                        source
                    }
                })?;
        }

        info!(goal_id, todo_id, "linked");
        Ok(LinkOutcome::Created)
    }

    /// Make every Todo->Goal reference symmetric again.
    ///
    /// Walks the given snapshots; whenever a todo references a goal that
    /// does not list it back, the goal side is patched with the merged
    /// list. Back-links for the same goal are accumulated and written in
    /// one patch, so a goal missing several todos converges in a single
    /// write. Running the pass twice performs no writes the second time.
    pub async fn repair(&self, goals: &[Document], todos: &[Document]) -> RepairReport {
        let mut report = RepairReport::default();

        let goals_by_id: HashMap<&str, &Document> =
            goals.iter().map(|g| (g.id.as_str(), g)).collect();

        // goal id -> todo ids to append, in the order they were found
        let mut additions: Vec<(String, Vec<String>)> = Vec::new();
        let mut addition_index: HashMap<String, usize> = HashMap::new();

        for todo in todos {
            for goal_id in todo.relation_ids(fields::TODO_RELATED_GOALS) {
                report.checked += 1;

                let Some(goal) = goals_by_id.get(goal_id.as_str()) else {
                    warn!(goal_id = %goal_id, todo_id = %todo.id, "referenced goal not in collection");
                    report.failed.push(RepairFailure {
                        goal_id: goal_id.clone(),
                        todo_id: todo.id.clone(),
                        reason: format!("goal '{}' not found in Goals collection", goal_id),
                    });
                    continue;
                };

                let back_links = goal.relation_ids(fields::GOAL_RELATED_TODOS);
                if back_links.iter().any(|id| *id == todo.id) {
                    continue;
                }

                let slot = *addition_index.entry(goal_id.clone()).or_insert_with(|| {
                    additions.push((goal_id.clone(), Vec::new()));
                    additions.len() - 1
                });
                if !additions[slot].1.contains(&todo.id) {
                    additions[slot].1.push(todo.id.clone());
                }
            }
        }

        for (goal_id, missing) in additions {
            let goal = goals_by_id[goal_id.as_str()];
            let mut merged = goal.relation_ids(fields::GOAL_RELATED_TODOS);
            merged.extend(missing.iter().cloned());

            let mut properties = PropertyMap::new();
            properties.insert(
                fields::GOAL_RELATED_TODOS.to_string(),
                property::relation(&merged),
            );
            match self.store.patch(Collection::Goals, &goal_id, properties).await {
                Ok(()) => {
                    info!(goal_id = %goal_id, count = missing.len(), "repaired goal back-links");
                    report.repaired += missing.len();
                }
                Err(err) => {
                    warn!(goal_id = %goal_id, error = %err, "failed to repair goal back-links");
                    for todo_id in missing {
                        report.failed.push(RepairFailure {
                            goal_id: goal_id.clone(),
                            todo_id,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        report
    }
}
