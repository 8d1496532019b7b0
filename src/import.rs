//! Batch import driver
//!
//! Sequences todo creation and goal linking for a batch of intended
//! associations, then aggregates an operator-facing summary. One bad pair
//! never aborts the rest of the batch.

use crate::error::{SyncError, SyncResult};
use crate::model::{GoalDraft, TodoDraft};
use crate::reconcile::{LinkOptions, LinkOutcome, Reconciler};
use crate::store::{Collection, PageStore};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// Project-name -> goal-title mapping used when a batch item carries no
/// explicit goal target. Passed in at construction so tests and alternate
/// deployments can substitute their own table.
#[derive(Debug, Clone, Default)]
pub struct GoalMap {
    entries: HashMap<String, String>,
}

impl GoalMap {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn goal_title_for(&self, project: &str) -> Option<&str> {
        self.entries.get(project).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<HashMap<String, String>> for GoalMap {
    fn from(entries: HashMap<String, String>) -> Self {
        Self::new(entries)
    }
}

/// One intended (todo, goal) association in a batch.
///
/// The goal target is resolved in this order: explicit `goal_id`, explicit
/// `goal_title`, then the goal map keyed by the draft's project.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportItem {
    #[serde(flatten)]
    pub todo: TodoDraft,
    pub goal_id: Option<String>,
    pub goal_title: Option<String>,
}

impl ImportItem {
    pub fn new(todo: TodoDraft) -> Self {
        Self {
            todo,
            goal_id: None,
            goal_title: None,
        }
    }
}

/// Aggregated outcome of one import batch, for operator reporting only.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub created: usize,
    pub already_linked: usize,
    pub failed: Vec<LinkFailure>,
}

#[derive(Debug)]
pub struct LinkFailure {
    pub todo: String,
    pub goal: String,
    pub reason: String,
}

impl BatchSummary {
    /// True only when a non-empty batch produced not a single usable link.
    /// This is the one case that warrants a non-zero exit.
    pub fn total_failure(&self) -> bool {
        !self.failed.is_empty() && self.created == 0 && self.already_linked == 0
    }
}

/// Outcome of goal pre-creation for a batch.
#[derive(Debug, Default)]
pub struct GoalSetup {
    pub created: usize,
    pub existing: usize,
    pub failed: Vec<(String, String)>,
}

pub struct ImportDriver<'a, S: PageStore> {
    store: &'a S,
    reconciler: Reconciler<'a, S>,
    goal_map: GoalMap,
    // title -> stable id, pinned after the first lookup so later pairs and
    // duplicate titles never re-resolve by title
    resolved: HashMap<String, String>,
}

impl<'a, S: PageStore> ImportDriver<'a, S> {
    pub fn new(store: &'a S, goal_map: GoalMap) -> Self {
        Self {
            store,
            reconciler: Reconciler::new(store),
            goal_map,
            resolved: HashMap::new(),
        }
    }

    /// Create any batch-declared goals that do not exist yet.
    ///
    /// Goals already present remotely are reused and their identifiers
    /// pinned for the rest of the run.
    pub async fn ensure_goals(&mut self, drafts: &[GoalDraft]) -> GoalSetup {
        let mut setup = GoalSetup::default();

        for draft in drafts {
            if self.resolved.contains_key(&draft.title) {
                setup.existing += 1;
                continue;
            }
            match self.store.find_by_title(Collection::Goals, &draft.title).await {
                Ok(existing) => {
                    self.resolved.insert(draft.title.clone(), existing.id);
                    setup.existing += 1;
                }
                Err(err) if err.is_not_found() => {
                    match self.store.create(Collection::Goals, draft.to_properties()).await {
                        Ok(created) => {
                            info!(title = %draft.title, id = %created.id, "created goal");
                            self.resolved.insert(draft.title.clone(), created.id);
                            setup.created += 1;
                        }
                        Err(err) => {
                            warn!(title = %draft.title, error = %err, "failed to create goal");
                            setup.failed.push((draft.title.clone(), err.to_string()));
                        }
                    }
                }
                Err(err) => {
                    warn!(title = %draft.title, error = %err, "failed to resolve goal");
                    setup.failed.push((draft.title.clone(), err.to_string()));
                }
            }
        }

        setup
    }

    /// Run the batch: create each todo, resolve its goal, link the pair.
    pub async fn run(&mut self, items: &[ImportItem]) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for item in items {
            let goal_label = self.goal_label(item);

            let todo = match self.store.create(Collection::Todos, item.todo.to_properties()).await {
                Ok(todo) => todo,
                Err(err) => {
                    warn!(todo = %item.todo.title, error = %err, "failed to create todo");
                    summary.failed.push(LinkFailure {
                        todo: item.todo.title.clone(),
                        goal: goal_label,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            info!(todo = %item.todo.title, id = %todo.id, "created todo");

            let goal_id = match self.resolve_goal(item).await {
                Ok(id) => id,
                Err(err) => {
                    warn!(todo = %item.todo.title, error = %err, "failed to resolve goal");
                    summary.failed.push(LinkFailure {
                        todo: item.todo.title.clone(),
                        goal: goal_label,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let options = LinkOptions {
                milestone: item.todo.milestone.unwrap_or(false),
                contribution: item.todo.contribution.unwrap_or(15),
            };
            match self.reconciler.link(&goal_id, &todo.id, &options).await {
                Ok(LinkOutcome::Created) => summary.created += 1,
                Ok(LinkOutcome::AlreadyLinked) => summary.already_linked += 1,
                Err(err) => {
                    warn!(todo = %item.todo.title, goal = %goal_id, error = %err, "link failed");
                    summary.failed.push(LinkFailure {
                        todo: item.todo.title.clone(),
                        goal: goal_label,
                        reason: err.to_string(),
                    });
                }
            }
        }

        summary
    }

    /// Resolve the stable goal identifier for one batch item.
    ///
    /// Title lookups happen at most once per title per run; afterwards the
    /// pinned identifier is reused, so duplicate remote titles cannot make
    /// two pairs land on different documents.
    async fn resolve_goal(&mut self, item: &ImportItem) -> SyncResult<String> {
        if let Some(ref id) = item.goal_id {
            return Ok(id.clone());
        }

        let title = match (&item.goal_title, &item.todo.project) {
            (Some(title), _) => title.clone(),
            (None, Some(project)) => match self.goal_map.goal_title_for(project) {
                Some(title) => title.to_string(),
                None => {
                    return Err(SyncError::NotFound(format!(
                        "no goal mapping for project '{}'",
                        project
                    )));
                }
            },
            (None, None) => {
                return Err(SyncError::NotFound(
                    "no goal target: item has neither goal_id, goal_title, nor project".to_string(),
                ));
            }
        };

        if let Some(id) = self.resolved.get(&title) {
            return Ok(id.clone());
        }

        let goal = self
            .store
            .find_by_title(Collection::Goals, &title)
            .await
            .map_err(|err| {
                if err.is_not_found() {
                    SyncError::NotFound(format!("goal '{}' not found", title))
                } else {
                    err
                }
            })?;
        self.resolved.insert(title, goal.id.clone());
        Ok(goal.id)
    }

    fn goal_label(&self, item: &ImportItem) -> String {
        if let Some(ref id) = item.goal_id {
            return id.clone();
        }
        if let Some(ref title) = item.goal_title {
            return title.clone();
        }
        match &item.todo.project {
            Some(project) => self
                .goal_map
                .goal_title_for(project)
                .unwrap_or(project)
                .to_string(),
            None => "<unmapped>".to_string(),
        }
    }
}
