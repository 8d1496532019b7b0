use crate::model::{fields, property};
use crate::store::PropertyMap;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Goal lifecycle status as stored in the remote select property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GoalStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::NotStarted => "Not Started",
            GoalStatus::InProgress => "In Progress",
            GoalStatus::Completed => "Completed",
            GoalStatus::OnHold => "On Hold",
        }
    }
}

/// Goal priority as stored in the remote select property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GoalPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl GoalPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalPriority::High => "High",
            GoalPriority::Medium => "Medium",
            GoalPriority::Low => "Low",
        }
    }
}

/// A goal to be created when an import batch names one that does not exist
/// yet. Titles are the lookup key for first-time creation; after that the
/// driver pins the stable identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct GoalDraft {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default)]
    pub priority: GoalPriority,
    pub category: Option<String>,
    #[serde(default)]
    pub progress: i64,
    pub target_date: Option<NaiveDate>,
}

impl GoalDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: GoalStatus::NotStarted,
            priority: GoalPriority::Medium,
            category: None,
            progress: 0,
            target_date: None,
        }
    }

    pub fn to_properties(&self) -> PropertyMap {
        let mut properties = PropertyMap::new();
        properties.insert(fields::GOAL_TITLE.to_string(), property::title(&self.title));
        properties.insert(
            fields::GOAL_STATUS.to_string(),
            property::select(self.status.as_str()),
        );
        properties.insert(
            fields::GOAL_PRIORITY.to_string(),
            property::select(self.priority.as_str()),
        );
        properties.insert(
            fields::GOAL_PROGRESS.to_string(),
            property::number(self.progress as f64),
        );

        if let Some(ref description) = self.description {
            properties.insert(
                fields::GOAL_DESCRIPTION.to_string(),
                property::rich_text(description),
            );
        }
        if let Some(ref category) = self.category {
            properties.insert(fields::GOAL_CATEGORY.to_string(), property::select(category));
        }
        if let Some(target_date) = self.target_date {
            properties.insert(
                fields::GOAL_TARGET_DATE.to_string(),
                property::date(target_date),
            );
        }

        properties
    }
}
