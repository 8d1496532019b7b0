//! Operator-facing report formatting
//!
//! Every command ends by printing one of these text reports. They are for
//! humans; nothing downstream parses them.

use crate::import::{BatchSummary, GoalSetup};
use crate::model::Document;
use crate::reconcile::RepairReport;
use crate::store::Collection;
use std::collections::HashMap;

/// Per-collection relation counts gathered from full snapshots.
#[derive(Debug, Default)]
pub struct RelationSummary {
    /// (goal title, linked todo titles)
    pub goals: Vec<(String, Vec<String>)>,
    /// (todo title, linked goal titles)
    pub todos: Vec<(String, Vec<String>)>,
}

impl RelationSummary {
    pub fn gather(goals: &[Document], todos: &[Document]) -> Self {
        let goal_titles: HashMap<&str, String> = goals
            .iter()
            .map(|g| (g.id.as_str(), display_title(g, Collection::Goals)))
            .collect();
        let todo_titles: HashMap<&str, String> = todos
            .iter()
            .map(|t| (t.id.as_str(), display_title(t, Collection::Todos)))
            .collect();

        let resolve = |titles: &HashMap<&str, String>, id: &str| {
            titles.get(id).cloned().unwrap_or_else(|| id.to_string())
        };

        Self {
            goals: goals
                .iter()
                .map(|goal| {
                    let linked = goal
                        .relation_ids(Collection::Goals.relation_property())
                        .iter()
                        .map(|id| resolve(&todo_titles, id))
                        .collect();
                    (display_title(goal, Collection::Goals), linked)
                })
                .collect(),
            todos: todos
                .iter()
                .map(|todo| {
                    let linked = todo
                        .relation_ids(Collection::Todos.relation_property())
                        .iter()
                        .map(|id| resolve(&goal_titles, id))
                        .collect();
                    (display_title(todo, Collection::Todos), linked)
                })
                .collect(),
        }
    }

    pub fn goals_linked(&self) -> usize {
        self.goals.iter().filter(|(_, l)| !l.is_empty()).count()
    }

    pub fn todos_linked(&self) -> usize {
        self.todos.iter().filter(|(_, l)| !l.is_empty()).count()
    }

    pub fn total_links(&self) -> usize {
        self.goals.iter().map(|(_, l)| l.len()).sum()
    }
}

fn display_title(doc: &Document, collection: Collection) -> String {
    doc.title_text(collection.title_property())
        .unwrap_or_else(|| "Untitled".to_string())
}

pub fn format_batch_summary(setup: &GoalSetup, summary: &BatchSummary) -> String {
    let mut result = String::from("Import summary:\n");
    if setup.created + setup.existing + setup.failed.len() > 0 {
        result.push_str(&format!(
            "  Goals: {} created, {} already present\n",
            setup.created, setup.existing
        ));
        for (title, reason) in &setup.failed {
            result.push_str(&format!("  Goal '{}' failed: {}\n", title, reason));
        }
    }
    result.push_str(&format!(
        "  Links: {} created, {} already linked, {} failed\n",
        summary.created,
        summary.already_linked,
        summary.failed.len()
    ));
    for failure in &summary.failed {
        result.push_str(&format!(
            "  Failed: '{}' -> '{}': {}\n",
            failure.todo, failure.goal, failure.reason
        ));
    }
    result
}

pub fn format_repair_report(report: &RepairReport) -> String {
    let mut result = format!(
        "Repair summary: {} reference(s) checked, {} back-link(s) written, {} failed\n",
        report.checked,
        report.repaired,
        report.failed.len()
    );
    if report.converged() {
        result.push_str("  All relations are already symmetric\n");
    }
    for failure in &report.failed {
        result.push_str(&format!(
            "  Failed: goal {} <- todo {}: {}\n",
            failure.goal_id, failure.todo_id, failure.reason
        ));
    }
    result
}

pub fn format_relation_summary(summary: &RelationSummary) -> String {
    let mut result = format!(
        "Found {} goal(s) and {} todo(s)\n\nGoals and their related todos:\n",
        summary.goals.len(),
        summary.todos.len()
    );
    for (title, linked) in &summary.goals {
        result.push_str(&format!("- {}: {} related todo(s)\n", title, linked.len()));
        for todo in linked {
            result.push_str(&format!("    {}\n", todo));
        }
    }
    result.push_str("\nTodos and their related goals:\n");
    for (title, linked) in &summary.todos {
        result.push_str(&format!("- {}: {} related goal(s)\n", title, linked.len()));
        for goal in linked {
            result.push_str(&format!("    {}\n", goal));
        }
    }
    result.push_str(&format!(
        "\nGoals with related todos: {}/{}\nTodos with related goals: {}/{}\nTotal goal->todo links: {}\n",
        summary.goals_linked(),
        summary.goals.len(),
        summary.todos_linked(),
        summary.todos.len(),
        summary.total_links()
    ));
    result
}
