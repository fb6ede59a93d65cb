use serde::{Deserialize, Serialize};

use crate::model::ApplicationEntry;
use crate::provider::{LaunchAction, LaunchResult};
use crate::usage::UsageTracker;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionDto {
    LaunchApp { identity: String, command: String },
    CopyText { text: String },
    OpenUrl { url: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResultDto {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub icon: String,
    pub score: u32,
    pub action: ActionDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResultDto>,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionResponse {
    pub query: String,
    pub completion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaunchResponse {
    pub launched: Option<SearchResultDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppDto {
    pub name: String,
    pub identity: String,
    pub launch_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppListResponse {
    pub apps: Vec<AppDto>,
}

impl From<LaunchAction> for ActionDto {
    fn from(value: LaunchAction) -> Self {
        match value {
            LaunchAction::LaunchApp {
                identity, command, ..
            } => Self::LaunchApp { identity, command },
            LaunchAction::CopyText(text) => Self::CopyText { text },
            LaunchAction::OpenUrl(url) => Self::OpenUrl { url },
        }
    }
}

impl From<LaunchResult> for SearchResultDto {
    fn from(value: LaunchResult) -> Self {
        Self {
            id: value.id,
            title: value.title,
            subtitle: value.subtitle,
            icon: value.icon,
            score: value.score,
            action: value.action.into(),
        }
    }
}

impl AppDto {
    pub fn from_entry(entry: &ApplicationEntry, usage: &UsageTracker) -> Self {
        Self {
            name: entry.display_name().to_string(),
            identity: entry.identity().to_string(),
            launch_count: usage.launch_count(entry.identity()),
        }
    }
}
