//! Terraform text generation for folders, variables, saved searches and outputs

pub mod folders;
pub mod outputs;
pub mod registry;
pub mod searches;
pub mod slug;
pub mod variables;

pub use folders::render_folders;
pub use outputs::{OutputNames, render_outputs};
pub use registry::ResourceNameRegistry;
pub use searches::render_searches;
pub use slug::slugify_name;
pub use variables::render_variables;

pub const FOLDER_RESOURCE: &str = "sumologic_folder";
pub const SEARCH_RESOURCE: &str = "sumologic_log_search";
pub const DASHBOARD_RESOURCE: &str = "sumologic_dashboard";

pub const FOLDER_SUFFIX: &str = "_folder";
/// Stem of the folder resource generated for the import root
pub const INTEGRATION_STEM: &str = "integration";

pub const SEARCH_NOTIFICATION_SUBJECT: &str =
    "Search Alert: {{TriggerCondition}} found for {{SearchName}}";

/// Reference to the integration root folder resource
pub fn integration_folder_reference() -> String {
    format!("{}.{}{}.id", FOLDER_RESOURCE, INTEGRATION_STEM, FOLDER_SUFFIX)
}
