use url::Url;

use crate::error::{ExportError, ExportResult};

/// Base API URL for a named deployment, e.g. `us2` -> `https://us2-api.sumologic.net/api/`
pub fn resolve_base_api_url(deployment: &str) -> String {
    format!("https://{}-api.sumologic.net/api/", deployment)
}

/// Resolves every remote API path against one base URL
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Create endpoints for an explicit base URL (a trailing slash is added when missing)
    pub fn new(base_url: &str) -> ExportResult<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        let base = Url::parse(&normalized).map_err(|e| {
            ExportError::Config(format!("Invalid API base URL '{}': {}", base_url, e))
        })?;

        Ok(Self { base })
    }

    /// Create endpoints for a named deployment
    pub fn for_deployment(deployment: &str) -> ExportResult<Self> {
        Self::new(&resolve_base_api_url(deployment))
    }

    fn path(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn folder(&self, folder_id: &str) -> String {
        self.path(&format!("v2/content/folders/{}", folder_id))
    }

    pub fn dashboards(&self) -> String {
        self.path("v2/dashboards/")
    }

    pub fn export(&self, content_id: &str) -> String {
        self.path(&format!("v2/content/{}/export", content_id))
    }

    pub fn export_status(&self, content_id: &str, job_id: &str) -> String {
        self.path(&format!("v2/content/{}/export/{}/status", content_id, job_id))
    }

    pub fn export_result(&self, content_id: &str, job_id: &str) -> String {
        self.path(&format!("v2/content/{}/export/{}/result", content_id, job_id))
    }

    pub fn report_jobs(&self) -> String {
        self.path("v2/dashboards/reportJobs")
    }

    pub fn report_job_status(&self, job_id: &str) -> String {
        self.path(&format!("v2/dashboards/reportJobs/{}/status", job_id))
    }

    pub fn report_job_result(&self, job_id: &str) -> String {
        self.path(&format!("v2/dashboards/reportJobs/{}/result", job_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployment_base_url() {
        let endpoints = Endpoints::for_deployment("stag").unwrap();
        assert_eq!(
            endpoints.folder("personal"),
            "https://stag-api.sumologic.net/api/v2/content/folders/personal"
        );
    }

    #[test]
    fn test_export_paths() {
        let endpoints = Endpoints::new("http://localhost:8080/api").unwrap();
        assert_eq!(
            endpoints.export("C1"),
            "http://localhost:8080/api/v2/content/C1/export"
        );
        assert_eq!(
            endpoints.export_status("C1", "J1"),
            "http://localhost:8080/api/v2/content/C1/export/J1/status"
        );
        assert_eq!(
            endpoints.export_result("C1", "J1"),
            "http://localhost:8080/api/v2/content/C1/export/J1/result"
        );
        assert_eq!(
            endpoints.report_job_result("R9"),
            "http://localhost:8080/api/v2/dashboards/reportJobs/R9/result"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = Endpoints::new("not a url").unwrap_err();
        assert!(matches!(err, ExportError::Config(_)));
    }
}
