use serde::{Deserialize, Serialize};

/// Kind of a content item as reported by the content API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemType {
    Folder,
    Dashboard,
    Search,
    Other(String),
}

impl From<String> for ItemType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Folder" => ItemType::Folder,
            "Dashboard" => ItemType::Dashboard,
            "Search" => ItemType::Search,
            _ => ItemType::Other(value),
        }
    }
}

impl From<ItemType> for String {
    fn from(value: ItemType) -> Self {
        match value {
            ItemType::Folder => "Folder".to_string(),
            ItemType::Dashboard => "Dashboard".to_string(),
            ItemType::Search => "Search".to_string(),
            ItemType::Other(other) => other,
        }
    }
}

/// Folder, dashboard, saved search or any other item in the content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub item_type: ItemType,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub children: Vec<ContentItem>,
}

impl ContentItem {
    pub fn is_folder(&self) -> bool {
        self.item_type == ItemType::Folder
    }
}

/// Variable declared on a dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardVariable {
    pub name: String,
    #[serde(default)]
    pub default_value: Option<String>,
}

/// Dashboard as listed by the dashboards API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: String,
    pub content_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub variables: Vec<DashboardVariable>,
}

/// One page of the dashboards listing
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardPage {
    #[serde(default)]
    pub dashboards: Vec<Dashboard>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Response to starting an asynchronous job
#[derive(Debug, Clone, Deserialize)]
pub struct JobHandle {
    pub id: String,
}

/// Response of a job status endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusBody {
    pub status: String,
    #[serde(default)]
    pub status_message: Option<String>,
}

/// Query part of an exported saved search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub query_text: String,
    #[serde(default)]
    pub default_time_range: String,
    #[serde(default)]
    pub by_receipt_time: Option<bool>,
    #[serde(default)]
    pub parsing_mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBoundary {
    #[serde(default)]
    pub relative_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseableTimeRange {
    #[serde(default)]
    pub from: Option<TimeBoundary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threshold {
    pub count: i64,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub threshold_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleNotification {
    #[serde(default)]
    pub view_name: Option<String>,
}

/// Schedule attached to a saved search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSchedule {
    #[serde(default)]
    pub cron_expression: String,
    #[serde(default)]
    pub displayable_time_range: String,
    #[serde(default)]
    pub time_zone: String,
    #[serde(default)]
    pub mute_error_emails: Option<bool>,
    #[serde(default)]
    pub schedule_type: Option<String>,
    #[serde(default)]
    pub parseable_time_range: Option<ParseableTimeRange>,
    #[serde(default)]
    pub threshold: Option<Threshold>,
    #[serde(default)]
    pub notification: Option<ScheduleNotification>,
}

impl SearchSchedule {
    /// Relative start of the parseable time range, empty when absent
    pub fn relative_from(&self) -> &str {
        self.parseable_time_range
            .as_ref()
            .and_then(|range| range.from.as_ref())
            .and_then(|from| from.relative_time.as_deref())
            .unwrap_or("")
    }
}

/// Full definition of a saved search as returned by a content export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub search: SearchQuery,
    #[serde(default)]
    pub search_schedule: Option<SearchSchedule>,
}
