use std::collections::HashSet;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::endpoints::Endpoints;
use super::http::{HttpClient, HttpResponse};
use super::jobs::{JobStatusReport, PollSettings, wait_for_job};
use super::model::{
    ContentItem, Dashboard, DashboardPage, JobHandle, JobStatusBody, SearchDefinition,
};
use crate::error::{ExportError, ExportResult};

/// Typed operations against the content and dashboards API
pub struct ContentClient {
    http: Arc<dyn HttpClient>,
    endpoints: Endpoints,
    export_poll: PollSettings,
}

impl ContentClient {
    pub fn new(http: Arc<dyn HttpClient>, endpoints: Endpoints) -> Self {
        Self {
            http,
            endpoints,
            export_poll: PollSettings::export_default(),
        }
    }

    /// Override the export poll interval/deadline
    pub fn with_export_poll(mut self, settings: PollSettings) -> Self {
        self.export_poll = settings;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch a folder with its direct children
    pub fn get_folder(&self, folder_id: &str) -> ExportResult<ContentItem> {
        let response = self.get(&self.endpoints.folder(folder_id), &[])?;

        if response.status == 404 {
            return Err(ExportError::NotFound {
                id: folder_id.to_string(),
            });
        }

        expect_ok(&response, || format!("Get folder {}", folder_id))?;
        parse_json(&response)
    }

    pub fn get_personal_folder(&self) -> ExportResult<ContentItem> {
        self.get_folder("personal")
    }

    /// Fetch the dashboards whose content ids are in `content_ids`.
    ///
    /// Pages are followed until every requested id is resolved or the server
    /// returns no continuation token.
    pub fn list_dashboards(&self, content_ids: &HashSet<String>) -> ExportResult<Vec<Dashboard>> {
        let url = self.endpoints.dashboards();
        let mut dashboards = Vec::new();
        let mut seen = HashSet::new();
        let mut token: Option<String> = None;

        while dashboards.len() < content_ids.len() {
            let query: Vec<(&str, &str)> = match token.as_deref() {
                Some(t) => vec![("token", t)],
                None => Vec::new(),
            };

            let response = self.get(&url, &query)?;
            expect_ok(&response, || "Fetch dashboards".to_string())?;
            let page: DashboardPage = parse_json(&response)?;

            for dashboard in page.dashboards {
                if content_ids.contains(&dashboard.content_id)
                    && seen.insert(dashboard.content_id.clone())
                {
                    dashboards.push(dashboard);
                }
            }

            match page.next {
                Some(next) if !next.is_empty() => token = Some(next),
                _ => break,
            }
        }

        Ok(dashboards)
    }

    /// Export the full definition of a saved search.
    ///
    /// Starts an export job, polls its status until it settles, then fetches
    /// the result.
    pub fn export_search(&self, content_id: &str) -> ExportResult<SearchDefinition> {
        let response = self.post(&self.endpoints.export(content_id), None)?;
        expect_ok(&response, || {
            format!("Create export job for {}", content_id)
        })?;
        let job: JobHandle = parse_json(&response)?;

        let status_url = self.endpoints.export_status(content_id, &job.id);
        let outcome = wait_for_job(
            &format!("Exporting content id={}", content_id),
            || self.job_status(&status_url),
            "success",
            "failed",
            self.export_poll,
        )?;

        if !outcome.ok {
            return Err(ExportError::JobFailed {
                job_id: job.id,
                message: outcome.message,
            });
        }

        let response = self.get(&self.endpoints.export_result(content_id, &job.id), &[])?;
        expect_ok(&response, || {
            format!("Get export result for {}", content_id)
        })?;
        parse_json(&response)
    }

    /// One poll of a job status endpoint
    pub fn job_status(&self, status_url: &str) -> ExportResult<JobStatusReport> {
        let response = self.get(status_url, &[])?;
        expect_ok(&response, || "Get job status".to_string())?;
        let body: JobStatusBody = parse_json(&response)?;

        Ok(JobStatusReport {
            status: body.status,
            message: body.status_message.unwrap_or_else(|| response.text()),
        })
    }

    pub(crate) fn get(&self, url: &str, query: &[(&str, &str)]) -> ExportResult<HttpResponse> {
        self.http.get(url, query).map_err(|e| transport_failure(url, e))
    }

    pub(crate) fn post(
        &self,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> ExportResult<HttpResponse> {
        self.http
            .post_json(url, body)
            .map_err(|e| transport_failure(url, e))
    }
}

/// Connection-level failures carry no status; they are reported as status 0
fn transport_failure(url: &str, err: anyhow::Error) -> ExportError {
    ExportError::Transport {
        context: format!("Request to {}", url),
        status: 0,
        body: format!("{:#}", err),
    }
}

pub(crate) fn expect_ok(
    response: &HttpResponse,
    context: impl FnOnce() -> String,
) -> ExportResult<()> {
    if response.is_ok() {
        return Ok(());
    }

    Err(ExportError::Transport {
        context: context(),
        status: response.status,
        body: response.text(),
    })
}

pub(crate) fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> ExportResult<T> {
    Ok(serde_json::from_slice(&response.body)?)
}
