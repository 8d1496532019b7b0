use crate::model::{fields, property};
use crate::store::PropertyMap;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Todo workflow status as stored in the remote select property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TodoStatus {
    #[default]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Todo => "Todo",
            TodoStatus::InProgress => "In Progress",
            TodoStatus::Done => "Done",
        }
    }
}

/// Todo priority as stored in the remote select property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TodoPriority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
}

impl TodoPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoPriority::Urgent => "Urgent",
            TodoPriority::High => "High",
            TodoPriority::Medium => "Medium",
            TodoPriority::Low => "Low",
        }
    }
}

impl FromStr for TodoPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Urgent" => Ok(TodoPriority::Urgent),
            "High" => Ok(TodoPriority::High),
            "Medium" => Ok(TodoPriority::Medium),
            "Low" => Ok(TodoPriority::Low),
            _ => Err(format!(
                "Invalid priority '{}'. Valid options are: Urgent, High, Medium, Low",
                s
            )),
        }
    }
}

/// How strongly a todo drives progress on its linked goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressImpact {
    High,
    Medium,
    Low,
}

impl ProgressImpact {
    /// Fixed priority-to-impact mapping applied once at link time.
    pub fn from_priority(priority: TodoPriority) -> Self {
        match priority {
            TodoPriority::Urgent | TodoPriority::High => ProgressImpact::High,
            TodoPriority::Medium => ProgressImpact::Medium,
            TodoPriority::Low => ProgressImpact::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressImpact::High => "High",
            ProgressImpact::Medium => "Medium",
            ProgressImpact::Low => "Low",
        }
    }
}

/// A todo to be created by the import driver.
///
/// `milestone` and `contribution` feed the goal-tracking properties written
/// at link time; left unset they fall back to the defaults (false, 15%).
#[derive(Debug, Clone, Deserialize)]
pub struct TodoDraft {
    pub title: String,
    #[serde(default)]
    pub priority: TodoPriority,
    pub project: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub time_estimate: Option<i64>,
    pub context: Option<String>,
    pub milestone: Option<bool>,
    pub contribution: Option<i64>,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>, priority: TodoPriority) -> Self {
        Self {
            title: title.into(),
            priority,
            project: None,
            due_date: None,
            time_estimate: None,
            context: None,
            milestone: None,
            contribution: None,
        }
    }

    /// Property map for creating the remote document.
    ///
    /// New todos always start in the `Todo` status, not completed; the
    /// relation and goal-tracking properties are written later by the
    /// reconciler, not at creation.
    pub fn to_properties(&self) -> PropertyMap {
        let mut properties = PropertyMap::new();
        properties.insert(fields::TODO_TITLE.to_string(), property::title(&self.title));
        properties.insert(
            fields::TODO_PRIORITY.to_string(),
            property::select(self.priority.as_str()),
        );
        properties.insert(
            fields::TODO_STATUS.to_string(),
            property::select(TodoStatus::Todo.as_str()),
        );
        properties.insert(fields::TODO_COMPLETED.to_string(), property::checkbox(false));

        if let Some(ref project) = self.project {
            properties.insert(fields::TODO_PROJECT.to_string(), property::select(project));
        }
        if let Some(due_date) = self.due_date {
            properties.insert(fields::TODO_DUE_DATE.to_string(), property::date(due_date));
        }
        if let Some(minutes) = self.time_estimate {
            properties.insert(
                fields::TODO_TIME_ESTIMATE.to_string(),
                property::number(minutes as f64),
            );
        }
        if let Some(ref context) = self.context {
            properties.insert(fields::TODO_CONTEXT.to_string(), property::select(context));
        }

        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_follows_priority_mapping() {
        assert_eq!(
            ProgressImpact::from_priority(TodoPriority::Urgent),
            ProgressImpact::High
        );
        assert_eq!(
            ProgressImpact::from_priority(TodoPriority::High),
            ProgressImpact::High
        );
        assert_eq!(
            ProgressImpact::from_priority(TodoPriority::Medium),
            ProgressImpact::Medium
        );
        assert_eq!(
            ProgressImpact::from_priority(TodoPriority::Low),
            ProgressImpact::Low
        );
    }

    #[test]
    fn new_todos_start_unfinished() {
        let draft = TodoDraft::new("Review ML course notes", TodoPriority::High);
        let properties = draft.to_properties();
        assert_eq!(properties["Status"]["select"]["name"], "Todo");
        assert_eq!(properties["Completed"]["checkbox"], false);
        assert_eq!(properties["Priority"]["select"]["name"], "High");
        assert!(!properties.contains_key("Related Goals"));
    }

    #[test]
    fn optional_fields_only_sent_when_set() {
        let mut draft = TodoDraft::new("Strength training", TodoPriority::Medium);
        assert!(!draft.to_properties().contains_key("Project"));

        draft.project = Some("Health".to_string());
        draft.time_estimate = Some(60);
        let properties = draft.to_properties();
        assert_eq!(properties["Project"]["select"]["name"], "Health");
        assert_eq!(properties["Time Estimate"]["number"], 60.0);
    }

    #[test]
    fn priority_parses_from_remote_select_name() {
        assert_eq!("Urgent".parse::<TodoPriority>(), Ok(TodoPriority::Urgent));
        assert!("Critical".parse::<TodoPriority>().is_err());
    }
}
