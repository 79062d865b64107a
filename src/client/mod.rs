pub mod content;
pub mod endpoints;
pub mod http;
pub mod ids;
pub mod jobs;
pub mod model;

pub use content::ContentClient;
pub use endpoints::{Endpoints, resolve_base_api_url};
pub use http::{Credentials, HttpClient, ReqwestClient};
pub use ids::normalize_content_id;
pub use jobs::{PollSettings, wait_for_job};
pub use model::{ContentItem, Dashboard, ItemType, SearchDefinition};

#[cfg(test)]
pub use http::MockHttpClient;
