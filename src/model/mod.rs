//! Domain models for the two remote collections
//!
//! This module contains the typed views over remote documents and their
//! property wire shapes. It is split into submodules:
//! - `document`: generic remote document plus typed property extractors
//! - `property`: builders for the remote property value shapes
//! - `goal`: Goal drafts and enums
//! - `todo`: Todo drafts, enums, and the derived goal-tracking mapping

mod document;
mod goal;
pub mod property;
mod todo;

pub use document::Document;
pub use goal::{GoalDraft, GoalPriority, GoalStatus};
pub use todo::{ProgressImpact, TodoDraft, TodoPriority, TodoStatus};

/// Property names as stored in the remote schemas.
pub mod fields {
    pub const GOAL_TITLE: &str = "Name";
    pub const GOAL_DESCRIPTION: &str = "Description";
    pub const GOAL_STATUS: &str = "Status";
    pub const GOAL_PRIORITY: &str = "Priority";
    pub const GOAL_CATEGORY: &str = "Category";
    pub const GOAL_PROGRESS: &str = "Progress";
    pub const GOAL_TARGET_DATE: &str = "Target Date";
    pub const GOAL_RELATED_TODOS: &str = "Related Todos";

    pub const TODO_TITLE: &str = "Task";
    pub const TODO_STATUS: &str = "Status";
    pub const TODO_PRIORITY: &str = "Priority";
    pub const TODO_PROJECT: &str = "Project";
    pub const TODO_DUE_DATE: &str = "Due Date";
    pub const TODO_COMPLETED: &str = "Completed";
    pub const TODO_TIME_ESTIMATE: &str = "Time Estimate";
    pub const TODO_CONTEXT: &str = "Context";
    pub const TODO_RELATED_GOALS: &str = "Related Goals";
    pub const TODO_IMPACT: &str = "Goal Progress Impact";
    pub const TODO_MILESTONE: &str = "Goal Milestone";
    pub const TODO_CONTRIBUTION: &str = "Estimated Goal Contribution";
}
